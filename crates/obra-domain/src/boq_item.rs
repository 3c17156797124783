// boq_item.rs
use crate::{DomainError, UnitOfMeasure};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Partida del presupuesto de obra (línea del BOQ): un trabajo valorizado
/// con unidad de medida, metrado presupuestado y precio unitario.
///
/// Las cantidades derivadas (aprobado / pendiente) NO viven aquí: son
/// propiedad exclusiva del libro de avance (`ProgressLedger`), que las
/// publica en sus snapshots. La partida nunca se elimina, sólo se
/// desactiva.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoqItem {
    id: Uuid,
    project_id: Uuid,
    code: String,
    description: String,
    unit: UnitOfMeasure,
    budgeted_quantity: Decimal,
    unit_price: Decimal,
    active: bool,
}

impl BoqItem {
    /// Crea una partida nueva, activa.
    ///
    /// # Errores
    /// Retorna `DomainError::Validation` si el código está vacío o si el
    /// metrado presupuestado o el precio unitario son negativos.
    pub fn new(project_id: Uuid,
               code: impl Into<String>,
               description: impl Into<String>,
               unit: UnitOfMeasure,
               budgeted_quantity: Decimal,
               unit_price: Decimal)
               -> Result<Self, DomainError> {
        let code = code.into();
        if code.trim().is_empty() {
            return Err(DomainError::Validation("el código de partida no puede estar vacío".to_string()));
        }
        if budgeted_quantity < Decimal::ZERO {
            return Err(DomainError::Validation(format!("metrado presupuestado negativo: {}", budgeted_quantity)));
        }
        if unit_price < Decimal::ZERO {
            return Err(DomainError::Validation(format!("precio unitario negativo: {}", unit_price)));
        }
        Ok(BoqItem { id: Uuid::new_v4(),
                     project_id,
                     code,
                     description: description.into(),
                     unit,
                     budgeted_quantity,
                     unit_price,
                     active: true })
    }

    /// Crea una copia desactivada de la partida (las partidas no se
    /// eliminan).
    pub fn deactivated(&self) -> Self {
        let mut item = self.clone();
        item.active = false;
        item
    }

    /// Valorización presupuestada: `metrado × precio unitario`.
    /// Cualquier cálculo más allá de esta multiplicación queda fuera del
    /// núcleo.
    pub fn budgeted_value(&self) -> Decimal {
        self.budgeted_quantity * self.unit_price
    }

    // Getters
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn project_id(&self) -> Uuid {
        self.project_id
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn unit(&self) -> UnitOfMeasure {
        self.unit
    }

    pub fn budgeted_quantity(&self) -> Decimal {
        self.budgeted_quantity
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl fmt::Display for BoqItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f,
               "BoqItem(code: {}, unit: {}, budgeted: {})",
               self.code, self.unit, self.budgeted_quantity)
    }
}
