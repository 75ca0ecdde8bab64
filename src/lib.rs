pub mod gateway;
pub mod models;
pub mod session;
pub mod stats;
pub mod storage;
pub mod store;

pub use gateway::{AiError, AiGateway};
pub use models::analysis::{AiAnalysis, RiskLevel};
pub use models::ticket::{NewTicket, Priority, Status, Ticket, DEPARTMENTS};
pub use session::{AnalysisSession, RequestState, TicketAnalysis};
pub use stats::{compute_stats, DashboardStats};
pub use storage::TicketStorage;
pub use store::TicketStore;
