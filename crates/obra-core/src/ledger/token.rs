//! Token de reserva: el vínculo entre un parte diario y su incremento de
//! metrado pendiente.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Manejador opaco devuelto por `reserve`, consumido exactamente una vez
/// por `commit` o `release`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationToken {
    id: Uuid,
    boq_item_id: Uuid,
    amount: Decimal,
}

impl ReservationToken {
    pub(crate) fn new(boq_item_id: Uuid, amount: Decimal) -> Self {
        Self { id: Uuid::new_v4(),
               boq_item_id,
               amount }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn boq_item_id(&self) -> Uuid {
        self.boq_item_id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }
}

/// Estado interno del token para garantizar idempotencia.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenState {
    Pending,
    Committed,
    Released,
}

#[derive(Debug)]
pub(crate) struct TokenRecord {
    pub boq_item_id: Uuid,
    pub amount: Decimal,
    pub state: TokenState,
}
