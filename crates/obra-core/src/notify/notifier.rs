use chrono::Utc;
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use super::{ChangeEvent, EntityType, EventTransport};
use crate::errors::EngineError;

/// Difusor de cambios comprometidos.
///
/// Asigna un `seq` monótono por entidad y publica el snapshot completo a
/// través del transporte. Las máquinas de estado lo invocan únicamente
/// después de que su mutación quedó comprometida.
pub struct ChangeNotifier {
    transport: Arc<dyn EventTransport>,
    seqs: DashMap<Uuid, u64>,
}

impl ChangeNotifier {
    pub fn new(transport: Arc<dyn EventTransport>) -> Self {
        Self { transport,
               seqs: DashMap::new() }
    }

    /// Publica el estado completo de una entidad a los suscriptores de su
    /// proyecto. El guard de la entrada de `seqs` serializa publicaciones
    /// concurrentes de la misma entidad, preservando el orden por entidad.
    pub fn publish<T: Serialize>(&self,
                                 entity_type: EntityType,
                                 entity_id: Uuid,
                                 project_id: Uuid,
                                 state: &T)
                                 -> Result<(), EngineError> {
        let new_state = serde_json::to_value(state).map_err(|e| EngineError::Validation(format!("snapshot no serializable: {e}")))?;
        let mut seq = self.seqs.entry(entity_id).or_insert(0);
        *seq += 1;
        let event = ChangeEvent { seq: *seq,
                                  entity_type,
                                  entity_id,
                                  project_id,
                                  new_state,
                                  ts: Utc::now() };
        self.transport.publish(event);
        Ok(())
    }
}
