//! Libro de avance (`ProgressLedger`).
//!
//! Rol en el motor:
//! - Mantiene por partida el metrado presupuestado y los acumulados
//!   aprobado / pendiente.
//! - `reserve` es el único punto donde una carrera es fatal: la lectura
//!   del saldo y el incremento de `pending` forman un paso atómico bajo
//!   el candado de la entrada de la partida.
//! - Invariante, para toda partida y bajo acceso concurrente:
//!   `approved + pending <= budgeted`.

mod token;

pub use token::ReservationToken;
use token::{TokenRecord, TokenState};

use crate::config::EngineConfig;
use crate::errors::EngineError;
use dashmap::try_result::TryResult;
use dashmap::DashMap;
use log::warn;
use obra_domain::BoqItem;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use uuid::Uuid;

/// Cuenta interna de una partida. Sólo el ledger escribe estos campos.
#[derive(Debug)]
struct ItemAccount {
    budgeted: Decimal,
    approved: Decimal,
    pending: Decimal,
    active: bool,
}

impl ItemAccount {
    fn available(&self) -> Decimal {
        self.budgeted - self.approved - self.pending
    }
}

/// Vista de sólo lectura de una cuenta, para capas de presentación.
/// No se garantiza linealizable frente a reservas concurrentes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub boq_item_id: Uuid,
    pub budgeted: Decimal,
    pub approved: Decimal,
    pub pending: Decimal,
    pub available: Decimal,
    pub active: bool,
}

/// Libro de avance concurrente. Las cuentas viven en un `DashMap`; el
/// guard de cada entrada serializa el check-and-increment por partida.
#[derive(Debug, Default)]
pub struct ProgressLedger {
    accounts: DashMap<Uuid, ItemAccount>,
    tokens: DashMap<Uuid, TokenRecord>,
    config: EngineConfig,
}

impl ProgressLedger {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self { accounts: DashMap::new(),
               tokens: DashMap::new(),
               config }
    }

    /// Registra la cuenta de una partida a partir de sus datos de
    /// catálogo. Operación del actor de planificación.
    ///
    /// # Errores
    /// `Validation` si la partida ya está registrada.
    pub fn register_item(&self, item: &BoqItem) -> Result<(), EngineError> {
        match self.accounts.entry(item.id()) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                Err(EngineError::Validation(format!("partida ya registrada en el ledger: {}", item.code())))
            }
            dashmap::mapref::entry::Entry::Vacant(v) => {
                v.insert(ItemAccount { budgeted: item.budgeted_quantity(),
                                       approved: Decimal::ZERO,
                                       pending: Decimal::ZERO,
                                       active: item.is_active() });
                Ok(())
            }
        }
    }

    /// Desactiva la cuenta: las reservas futuras se rechazan, los tokens
    /// vivos conservan su ciclo commit/release.
    pub fn deactivate_item(&self, boq_item_id: Uuid) -> Result<(), EngineError> {
        let mut acc = self.accounts
                          .get_mut(&boq_item_id)
                          .ok_or(EngineError::UnknownEntity(boq_item_id))?;
        acc.active = false;
        Ok(())
    }

    /// Reserva metrado pendiente contra una partida.
    ///
    /// Check-and-increment atómico: el guard de la entrada serializa las
    /// reservas concurrentes sobre la misma partida, de modo que ninguna
    /// observe un saldo obsoleto. La espera por el candado está acotada
    /// por `EngineConfig::reserve_timeout`; al vencer retorna `Busy`.
    ///
    /// # Errores
    /// - `Validation` si la cantidad no es positiva o la partida está
    ///   desactivada.
    /// - `UnknownEntity` si la partida no está registrada.
    /// - `OverBudget { requested, available }` si excede el saldo; sin
    ///   mutación alguna.
    /// - `Busy` si no se obtuvo el candado dentro del plazo.
    pub fn reserve(&self, boq_item_id: Uuid, quantity: Decimal) -> Result<ReservationToken, EngineError> {
        if quantity <= Decimal::ZERO {
            return Err(EngineError::Validation(format!("la cantidad a reservar debe ser positiva: {}", quantity)));
        }

        let deadline = Instant::now() + self.config.reserve_timeout;
        let mut acc = loop {
            match self.accounts.try_get_mut(&boq_item_id) {
                TryResult::Present(guard) => break guard,
                TryResult::Absent => return Err(EngineError::UnknownEntity(boq_item_id)),
                TryResult::Locked => {
                    if Instant::now() >= deadline {
                        return Err(EngineError::Busy);
                    }
                    std::thread::sleep(self.config.reserve_backoff);
                }
            }
        };

        if !acc.active {
            return Err(EngineError::Validation(format!("partida desactivada: {}", boq_item_id)));
        }
        let available = acc.available();
        if quantity > available {
            return Err(EngineError::OverBudget { requested: quantity,
                                                 available });
        }
        acc.pending += quantity;
        drop(acc);

        // El token se publica después de soltar el guard de la cuenta:
        // nadie puede consumirlo antes de que `reserve` retorne, y así
        // reserve nunca sostiene ambos candados a la vez.
        let token = ReservationToken::new(boq_item_id, quantity);
        self.tokens.insert(token.id(),
                           TokenRecord { boq_item_id,
                                         amount: quantity,
                                         state: TokenState::Pending });
        Ok(token)
    }

    /// Mueve el monto reservado de `pending` a `approved`.
    ///
    /// Idempotente: un segundo `commit` del mismo token es un no-op.
    /// `InvalidToken` si el token es desconocido o ya fue liberado.
    pub fn commit(&self, token: &ReservationToken) -> Result<(), EngineError> {
        let mut rec = match self.tokens.get_mut(&token.id()) {
            Some(rec) => rec,
            None => {
                warn!("commit con token desconocido: {}", token.id());
                return Err(EngineError::InvalidToken);
            }
        };
        match rec.state {
            TokenState::Committed => return Ok(()), // idempotente
            TokenState::Released => {
                warn!("commit sobre token ya liberado: {}", token.id());
                return Err(EngineError::InvalidToken);
            }
            TokenState::Pending => {}
        }
        {
            let mut acc = match self.accounts.get_mut(&rec.boq_item_id) {
                Some(acc) => acc,
                None => {
                    warn!("token {} apunta a partida inexistente {}", token.id(), rec.boq_item_id);
                    return Err(EngineError::InvalidToken);
                }
            };
            acc.pending -= rec.amount;
            acc.approved += rec.amount;
        }
        rec.state = TokenState::Committed;
        Ok(())
    }

    /// Quita el monto reservado de `pending` sin aprobarlo (rechazo).
    ///
    /// Idempotente: un segundo `release` es un no-op. `InvalidToken` si
    /// el token es desconocido o ya fue confirmado.
    pub fn release(&self, token: &ReservationToken) -> Result<(), EngineError> {
        let mut rec = match self.tokens.get_mut(&token.id()) {
            Some(rec) => rec,
            None => {
                warn!("release con token desconocido: {}", token.id());
                return Err(EngineError::InvalidToken);
            }
        };
        match rec.state {
            TokenState::Released => return Ok(()), // idempotente
            TokenState::Committed => {
                warn!("release sobre token ya confirmado: {}", token.id());
                return Err(EngineError::InvalidToken);
            }
            TokenState::Pending => {}
        }
        {
            let mut acc = match self.accounts.get_mut(&rec.boq_item_id) {
                Some(acc) => acc,
                None => {
                    warn!("token {} apunta a partida inexistente {}", token.id(), rec.boq_item_id);
                    return Err(EngineError::InvalidToken);
                }
            };
            acc.pending -= rec.amount;
        }
        rec.state = TokenState::Released;
        Ok(())
    }

    /// Saldo disponible de la partida. Lectura advisoria, apta para
    /// presentación.
    pub fn available_quantity(&self, boq_item_id: Uuid) -> Result<Decimal, EngineError> {
        self.accounts
            .get(&boq_item_id)
            .map(|acc| acc.available())
            .ok_or(EngineError::UnknownEntity(boq_item_id))
    }

    /// Snapshot completo de la cuenta de una partida.
    pub fn snapshot(&self, boq_item_id: Uuid) -> Result<LedgerSnapshot, EngineError> {
        self.accounts
            .get(&boq_item_id)
            .map(|acc| LedgerSnapshot { boq_item_id,
                                        budgeted: acc.budgeted,
                                        approved: acc.approved,
                                        pending: acc.pending,
                                        available: acc.available(),
                                        active: acc.active })
            .ok_or(EngineError::UnknownEntity(boq_item_id))
    }
}
