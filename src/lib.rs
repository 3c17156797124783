//! OBRAFLOW Rust Library
//!
//! Este crate actúa como la fachada de OBRAFLOW:
//! - `obra-domain` aporta las entidades de obra y sus invariantes.
//! - `obra-core` aporta el libro de avance, las máquinas de estado y el
//!   notificador de cambios.
//! - `obra-adapters` aporta colaboradores en memoria para armar el motor.
//!
//! Puede usarse desde `main.rs` o por otros crates/clientes.

pub use obra_adapters::{InMemoryCatalog, InMemoryEvidenceStore, StaticRoleProvider};
pub use obra_core::{CatalogStore, ChangeEvent, ChangeNotifier, DailyLogSubmission,
                    DailyLogWorkflow, EngineConfig, EngineError, EntityType, EventTransport,
                    EvidenceStore, InMemoryTransport, LedgerSnapshot, ProgressLedger,
                    RequisitionRequest, RequisitionWorkflow, RoleProvider};
pub use obra_domain::{BoqItem, DailyLog, DomainError, LogStatus, PurchaseEvidence, Requisition,
                      RequisitionStatus, Role, UnitOfMeasure, Urgency};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_error_messages_are_actionable() {
        let e = EngineError::MissingRequiredEvidence.to_string();
        assert_eq!(e, "evidencia obligatoria ausente: factura");
    }

    #[test]
    fn domain_error_messages_are_actionable() {
        let d = DomainError::Validation("x".into()).to_string();
        assert_eq!(d, "Error de validación: x");
    }
}
