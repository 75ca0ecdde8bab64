use crate::models::ticket::Ticket;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Fixed key the whole collection lives under.
const STORAGE_KEY: &str = "reworkflow_tickets";

/// Single-file key-value store backing the ticket collection. The entire
/// collection is (de)serialized as one JSON blob under one fixed key; no
/// partial writes, no versioning, no migration path.
pub struct TicketStorage {
    conn: Connection,
}

impl TicketStorage {
    pub fn open(path: &Path) -> Result<Self, String> {
        let conn = Connection::open(path).map_err(|e| format!("DB error: {e}"))?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Throwaway store for tests and ephemeral sessions.
    pub fn in_memory() -> Result<Self, String> {
        let conn = Connection::open_in_memory().map_err(|e| format!("DB error: {e}"))?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Load the persisted collection. Fails soft: a missing, unreadable, or
    /// unparseable blob yields an empty collection, never an error.
    pub fn load(&self) -> Vec<Ticket> {
        let raw: Option<String> = match self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![STORAGE_KEY],
                |row| row.get(0),
            )
            .optional()
        {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Failed to read stored tickets: {e}");
                return Vec::new();
            }
        };

        match raw {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                log::warn!("Failed to parse stored tickets, starting empty: {e}");
                Vec::new()
            }),
            None => Vec::new(),
        }
    }

    /// Serialize the full collection and overwrite whatever was stored.
    pub fn save(&self, tickets: &[Ticket]) -> Result<(), String> {
        let raw = serde_json::to_string(tickets).map_err(|e| format!("Serialize error: {e}"))?;
        self.conn
            .execute(
                "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![STORAGE_KEY, raw],
            )
            .map_err(|e| format!("Write error: {e}"))?;
        Ok(())
    }
}

fn initialize_schema(conn: &Connection) -> Result<(), String> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         CREATE TABLE IF NOT EXISTS kv_store (
             key TEXT PRIMARY KEY,
             value TEXT NOT NULL
         );",
    )
    .map_err(|e| format!("Schema error: {e}"))
}
