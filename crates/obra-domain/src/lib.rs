// obra-domain library entry point
pub mod boq_item;
pub mod catalog;
pub mod daily_log;
pub mod error;
pub mod requisition;
pub mod roles;
pub mod units;
pub use boq_item::BoqItem;
pub use catalog::{Machine, Material, PersonnelType};
pub use daily_log::{DailyLog, LaborEntry, LogStatus, MachineryEntry, MaterialEntry};
pub use error::DomainError;
pub use requisition::{PurchaseEvidence, Requisition, RequisitionStatus, Urgency};
pub use roles::Role;
pub use units::UnitOfMeasure;
