//! Tipos de evento publicados por el motor.
//!
//! Rol en el motor:
//! - Tras cada mutación comprometida, el `ChangeNotifier` publica un
//!   `ChangeEvent` con el estado completo de la entidad (nunca deltas):
//!   los consumidores reconcilian reemplazando su copia local.
//! - `seq` es monótono POR ENTIDAD; no existe orden entre entidades.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tipo de entidad afectada por el evento.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    DailyLog,
    Requisition,
    BoqItem,
}

/// Evento de cambio comprometido, dirigido a los suscriptores del
/// proyecto afectado. Entrega al menos una vez.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub seq: u64, // monótono por entidad (orden de commit)
    pub entity_type: EntityType,
    pub entity_id: Uuid,
    pub project_id: Uuid,
    pub new_state: serde_json::Value,
    pub ts: DateTime<Utc>, // metadato de publicación
}
