//! Almacén de evidencias en memoria: sólo registra referencias.
//!
//! La carga real de archivos es responsabilidad de un colaborador
//! externo; el motor únicamente pregunta por existencia.

use dashmap::DashSet;
use obra_core::EvidenceStore;

#[derive(Default)]
pub struct InMemoryEvidenceStore {
    refs: DashSet<String>,
}

impl InMemoryEvidenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra una referencia ya "subida".
    pub fn put(&self, evidence_ref: impl Into<String>) {
        self.refs.insert(evidence_ref.into());
    }
}

impl EvidenceStore for InMemoryEvidenceStore {
    fn exists(&self, evidence_ref: &str) -> bool {
        self.refs.contains(evidence_ref)
    }
}
