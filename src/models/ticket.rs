use serde::{Deserialize, Serialize};

/// Departments offered by the intake form. Stored verbatim on tickets;
/// aggregation groups by the literal string.
pub const DEPARTMENTS: [&str; 6] = [
    "Assembly",
    "Welding",
    "Machining",
    "Paint",
    "Quality Control",
    "Packaging",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
    Cancelled,
}

/// One logged rework incident. `id` and `created_at` are assigned by the
/// store at creation and never change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub title: String,
    pub description: String,
    pub department: String,
    pub priority: Priority,
    pub status: Status,
    pub cost: f64,
    pub hours: f64,
    pub created_at: String, // RFC 3339
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_cause: Option<String>,
}

/// Caller-supplied fields for ticket creation; everything except the
/// assigned identifier and timestamp.
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub title: String,
    pub description: String,
    pub department: String,
    pub priority: Priority,
    pub status: Status,
    pub cost: f64,
    pub hours: f64,
}

impl NewTicket {
    /// Point-of-entry form validation. The store trusts its caller, so this
    /// is the one place rejecting empty text and negative numbers.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Title is required".to_string());
        }
        if self.description.trim().is_empty() {
            return Err("Description is required".to_string());
        }
        if self.cost < 0.0 {
            return Err("Cost must be non-negative".to_string());
        }
        if self.hours < 0.0 {
            return Err("Hours must be non-negative".to_string());
        }
        Ok(())
    }
}
