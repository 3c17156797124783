//! Máquinas de estado de partes diarios y requisiciones.
//!
//! Ambas comparten el mismo guardián: cada transición verifica la
//! capacidad del actor (puerto de identidad) antes de tocar estado, y el
//! guard de la entrada del `DashMap` serializa transiciones concurrentes
//! sobre la misma entidad (gana el primer escritor; el perdedor observa
//! `InvalidTransition`).

mod daily_log;
mod requisition;

pub use daily_log::{DailyLogSubmission, DailyLogWorkflow};
pub use requisition::{RequisitionRequest, RequisitionWorkflow};

use crate::errors::EngineError;
use crate::ports::RoleProvider;
use obra_domain::Role;
use uuid::Uuid;

/// Resuelve el rol del actor y exige la capacidad indicada.
pub(crate) fn require_capability<R>(roles: &R,
                                    actor_id: Uuid,
                                    action: &str,
                                    allowed: fn(&Role) -> bool)
                                    -> Result<Role, EngineError>
    where R: RoleProvider
{
    let role = roles.role_of(actor_id)
                    .ok_or(EngineError::Forbidden { actor: actor_id,
                                                    action: action.to_string() })?;
    if !allowed(&role) {
        return Err(EngineError::Forbidden { actor: actor_id,
                                            action: action.to_string() });
    }
    Ok(role)
}
