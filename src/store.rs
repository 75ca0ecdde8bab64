use crate::models::ticket::{NewTicket, Status, Ticket};
use crate::storage::TicketStorage;
use chrono::Utc;
use uuid::Uuid;

/// Callback invoked with the full collection after every successful mutation.
pub type Listener = Box<dyn Fn(&[Ticket]) + Send>;

/// In-memory source of truth for the ticket collection, newest-first.
/// Every mutation syncs the persistence layer and notifies subscribers, so
/// observable and stored state never diverge outside one synchronous step.
pub struct TicketStore {
    tickets: Vec<Ticket>,
    storage: TicketStorage,
    listeners: Vec<Listener>,
}

impl TicketStore {
    /// Build a store over the given storage, loading whatever it holds.
    pub fn open(storage: TicketStorage) -> Self {
        let tickets = storage.load();
        Self {
            tickets,
            storage,
            listeners: Vec::new(),
        }
    }

    /// Current collection in stored order (newest-first).
    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn get(&self, id: &str) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.id == id)
    }

    /// Register a state-transition listener (UI layers subscribe here).
    pub fn subscribe(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    /// Create a ticket from form fields. The identifier and creation
    /// timestamp are assigned here and never change afterwards. Validation
    /// happens at the point of entry; the store trusts its caller.
    pub fn create(&mut self, fields: NewTicket) -> &Ticket {
        let ticket = Ticket {
            id: Uuid::new_v4().to_string(),
            title: fields.title,
            description: fields.description,
            department: fields.department,
            priority: fields.priority,
            status: fields.status,
            cost: fields.cost,
            hours: fields.hours,
            created_at: Utc::now().to_rfc3339(),
            root_cause: None,
        };

        self.tickets.insert(0, ticket);
        self.sync();
        &self.tickets[0]
    }

    /// Replace the status of the matching ticket, leaving every other field
    /// untouched. Unknown ids are a no-op.
    pub fn update_status(&mut self, id: &str, status: Status) {
        let Some(ticket) = self.tickets.iter_mut().find(|t| t.id == id) else {
            return;
        };
        ticket.status = status;
        self.sync();
    }

    /// Remove the matching ticket. Returns false for unknown ids.
    /// Confirmation UX is the caller's concern.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.tickets.len();
        self.tickets.retain(|t| t.id != id);
        if self.tickets.len() == before {
            return false;
        }
        self.sync();
        true
    }

    fn sync(&self) {
        // A failed write is logged, not propagated: the in-memory collection
        // stays authoritative for the rest of the session.
        if let Err(e) = self.storage.save(&self.tickets) {
            log::warn!("Failed to persist tickets: {e}");
        }
        for listener in &self.listeners {
            listener(&self.tickets);
        }
    }
}
