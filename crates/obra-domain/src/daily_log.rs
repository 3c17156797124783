//! Parte diario de ejecución contra una partida del presupuesto.
//!
//! Ciclo de vida: `pending` al crearse → `approved` o `rejected` por un
//! revisor, una sola vez. El campo `status` lo escribe exclusivamente la
//! máquina de estados de partes diarios (`obra-core`); los mutadores de
//! este módulo asumen ese guardián.

use crate::{DomainError, UnitOfMeasure};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Cuadrilla empleada: tipo de personal, cantidad y horas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaborEntry {
    pub personnel_type_id: Uuid,
    pub count: u32,
    pub hours: Decimal,
}

/// Material consumido en la jornada.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialEntry {
    pub material_id: Uuid,
    pub quantity: Decimal,
    pub unit: UnitOfMeasure,
}

/// Maquinaria empleada y sus horas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineryEntry {
    pub machine_id: Uuid,
    pub hours: Decimal,
}

/// Estado de un parte diario.
///
/// Las transiciones válidas son:
/// - `Pending` -> `Approved`
/// - `Pending` -> `Rejected`
///
/// Ambos destinos son terminales; no se permiten reversiones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogStatus {
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for LogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogStatus::Pending => "pending",
            LogStatus::Approved => "approved",
            LogStatus::Rejected => "rejected",
        };
        write!(f, "{}", s)
    }
}

/// Parte diario: una cuadrilla reporta metrado ejecutado contra
/// exactamente una partida.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyLog {
    id: Uuid,
    boq_item_id: Uuid,
    submitter_id: Uuid,
    date: NaiveDate,
    quantity: Decimal,
    labor_entries: Vec<LaborEntry>,
    material_entries: Vec<MaterialEntry>,
    machinery_entries: Vec<MachineryEntry>,
    evidence_refs: Vec<String>,
    notes: Option<String>,
    status: LogStatus,
    reviewer_id: Option<Uuid>,
    reviewed_at: Option<DateTime<Utc>>,
    rejection_reason: Option<String>,
    created_at: DateTime<Utc>,
}

impl DailyLog {
    /// Crea un parte diario en estado `pending`.
    ///
    /// # Errores
    /// Retorna `DomainError::Validation` si el metrado no es positivo o si
    /// alguna entrada de cuadrilla/material/maquinaria declara cantidades
    /// u horas no positivas.
    #[allow(clippy::too_many_arguments)]
    pub fn new(boq_item_id: Uuid,
               submitter_id: Uuid,
               date: NaiveDate,
               quantity: Decimal,
               labor_entries: Vec<LaborEntry>,
               material_entries: Vec<MaterialEntry>,
               machinery_entries: Vec<MachineryEntry>,
               evidence_refs: Vec<String>,
               notes: Option<String>)
               -> Result<Self, DomainError> {
        if quantity <= Decimal::ZERO {
            return Err(DomainError::Validation(format!("el metrado del parte debe ser positivo: {}", quantity)));
        }
        for e in &labor_entries {
            if e.count == 0 || e.hours <= Decimal::ZERO {
                return Err(DomainError::Validation("entrada de cuadrilla con cantidad u horas no positivas".to_string()));
            }
        }
        for e in &material_entries {
            if e.quantity <= Decimal::ZERO {
                return Err(DomainError::Validation("entrada de material con cantidad no positiva".to_string()));
            }
        }
        for e in &machinery_entries {
            if e.hours <= Decimal::ZERO {
                return Err(DomainError::Validation("entrada de maquinaria con horas no positivas".to_string()));
            }
        }
        Ok(DailyLog { id: Uuid::new_v4(),
                      boq_item_id,
                      submitter_id,
                      date,
                      quantity,
                      labor_entries,
                      material_entries,
                      machinery_entries,
                      evidence_refs,
                      notes,
                      status: LogStatus::Pending,
                      reviewer_id: None,
                      reviewed_at: None,
                      rejection_reason: None,
                      created_at: Utc::now() })
    }

    /// Marca el parte como aprobado. Sólo la máquina de estados invoca
    /// este mutador, tras verificar que el parte sigue `pending`.
    pub fn mark_approved(&mut self, reviewer_id: Uuid, at: DateTime<Utc>) {
        self.status = LogStatus::Approved;
        self.reviewer_id = Some(reviewer_id);
        self.reviewed_at = Some(at);
    }

    /// Marca el parte como rechazado con su motivo. Mismo guardián que
    /// `mark_approved`.
    pub fn mark_rejected(&mut self, reviewer_id: Uuid, reason: String, at: DateTime<Utc>) {
        self.status = LogStatus::Rejected;
        self.reviewer_id = Some(reviewer_id);
        self.reviewed_at = Some(at);
        self.rejection_reason = Some(reason);
    }

    // Getters
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn boq_item_id(&self) -> Uuid {
        self.boq_item_id
    }

    pub fn submitter_id(&self) -> Uuid {
        self.submitter_id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn labor_entries(&self) -> &[LaborEntry] {
        &self.labor_entries
    }

    pub fn material_entries(&self) -> &[MaterialEntry] {
        &self.material_entries
    }

    pub fn machinery_entries(&self) -> &[MachineryEntry] {
        &self.machinery_entries
    }

    pub fn evidence_refs(&self) -> &[String] {
        &self.evidence_refs
    }

    pub fn notes(&self) -> Option<&String> {
        self.notes.as_ref()
    }

    pub fn status(&self) -> LogStatus {
        self.status
    }

    pub fn reviewer_id(&self) -> Option<Uuid> {
        self.reviewer_id
    }

    pub fn reviewed_at(&self) -> Option<DateTime<Utc>> {
        self.reviewed_at
    }

    pub fn rejection_reason(&self) -> Option<&String> {
        self.rejection_reason.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl fmt::Display for DailyLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f,
               "DailyLog(id: {}, partida: {}, metrado: {}, status: {})",
               self.id, self.boq_item_id, self.quantity, self.status)
    }
}
