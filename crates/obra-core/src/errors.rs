//! Errores del motor: la taxonomía observable por los adaptadores.
//!
//! Todos se retornan como valores; ninguna operación deja mutación parcial
//! al fallar. La capa de adaptación es responsable de traducirlos a
//! mensajes accionables para el usuario.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum EngineError {
    /// El metrado solicitado excede el saldo presupuestado. Recuperable
    /// reduciendo la cantidad.
    #[error("metrado excede el presupuesto: solicitado {requested}, disponible {available}")]
    OverBudget { requested: Decimal, available: Decimal },

    /// La operación no está permitida desde el estado actual. Recuperable
    /// re-consultando el estado.
    #[error("transición inválida: '{attempted}' desde '{from}'")]
    InvalidTransition { from: String, attempted: String },

    /// Falta la factura al registrar la compra.
    #[error("evidencia obligatoria ausente: factura")]
    MissingRequiredEvidence,

    /// Token de reserva desconocido o consumido por la operación opuesta.
    /// Indica un error de secuenciamiento del llamador; el ledger lo
    /// registra como error de integridad.
    #[error("token de reserva inválido")]
    InvalidToken,

    /// Contención transitoria sobre la partida. Reintentar con backoff.
    #[error("partida ocupada, reintentar")]
    Busy,

    /// Entrada inválida: cantidades no positivas, motivo vacío,
    /// referencias de catálogo o evidencia desconocidas.
    #[error("validación: {0}")]
    Validation(String),

    /// El actor no posee la capacidad requerida para la operación.
    #[error("actor {actor} no autorizado para '{action}'")]
    Forbidden { actor: Uuid, action: String },

    /// Parte, requisición o partida inexistente.
    #[error("entidad desconocida: {0}")]
    UnknownEntity(Uuid),
}

impl From<obra_domain::DomainError> for EngineError {
    fn from(e: obra_domain::DomainError) -> Self {
        EngineError::Validation(e.to_string())
    }
}
