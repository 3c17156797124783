//! obra-core: libro de avance y motor de flujos de aprobación/procura
pub mod config;
pub mod errors;
pub mod ledger;
pub mod notify;
pub mod ports;
pub mod workflow;

pub use config::EngineConfig;
pub use errors::EngineError;
pub use ledger::{LedgerSnapshot, ProgressLedger, ReservationToken};
pub use notify::{ChangeEvent, ChangeNotifier, EntityType, EventTransport, InMemoryTransport};
pub use ports::{CatalogStore, EvidenceStore, RoleProvider};
pub use workflow::{DailyLogSubmission, DailyLogWorkflow, RequisitionRequest, RequisitionWorkflow};
