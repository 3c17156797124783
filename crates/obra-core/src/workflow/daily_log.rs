//! Máquina de estados de partes diarios.
//!
//! Estados: `pending` (inicial) -> `approved` | `rejected` (terminales).
//! El registro reserva metrado en el ledger de forma atómica con la
//! creación: si la reserva falla, el parte nunca existe. La aprobación y
//! el rechazo son los únicos caminos que escriben cantidades derivadas,
//! siempre a través del ledger.

use chrono::Utc;
use dashmap::DashMap;
use log::error;
use obra_domain::{DailyLog, LaborEntry, LogStatus, MachineryEntry, MaterialEntry};
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use crate::errors::EngineError;
use crate::ledger::{ProgressLedger, ReservationToken};
use crate::notify::{ChangeNotifier, EntityType};
use crate::ports::{CatalogStore, EvidenceStore, RoleProvider};
use crate::workflow::require_capability;

/// Datos de entrada de un parte diario.
#[derive(Debug, Clone)]
pub struct DailyLogSubmission {
    pub boq_item_id: Uuid,
    pub submitter_id: Uuid,
    pub date: chrono::NaiveDate,
    pub quantity: Decimal,
    pub labor_entries: Vec<LaborEntry>,
    pub material_entries: Vec<MaterialEntry>,
    pub machinery_entries: Vec<MachineryEntry>,
    pub evidence_refs: Vec<String>,
    pub notes: Option<String>,
}

/// Parte almacenado junto a su token de reserva y proyecto.
struct LogSlot {
    log: DailyLog,
    token: ReservationToken,
    project_id: Uuid,
}

/// Máquina de estados de partes diarios.
pub struct DailyLogWorkflow<C, R, E>
    where C: CatalogStore,
          R: RoleProvider,
          E: EvidenceStore
{
    ledger: Arc<ProgressLedger>,
    notifier: Arc<ChangeNotifier>,
    catalog: C,
    roles: R,
    evidence: E,
    logs: DashMap<Uuid, LogSlot>,
}

impl<C, R, E> DailyLogWorkflow<C, R, E>
    where C: CatalogStore,
          R: RoleProvider,
          E: EvidenceStore
{
    pub fn new(ledger: Arc<ProgressLedger>, notifier: Arc<ChangeNotifier>, catalog: C, roles: R, evidence: E) -> Self {
        Self { ledger,
               notifier,
               catalog,
               roles,
               evidence,
               logs: DashMap::new() }
    }

    /// Registra un parte diario: valida referencias, reserva metrado y
    /// crea el parte `pending` en un solo camino sin estado parcial.
    ///
    /// # Errores
    /// - `Forbidden` si el actor no puede registrar partes.
    /// - `Validation` si alguna referencia de catálogo o evidencia es
    ///   desconocida, o los datos del parte son inválidos.
    /// - `OverBudget { requested, available }` si el metrado no cabe en
    ///   el saldo de la partida; el parte no se crea.
    /// - `Busy` por contención transitoria sobre la partida.
    pub fn submit(&self, submission: DailyLogSubmission) -> Result<DailyLog, EngineError> {
        require_capability(&self.roles,
                           submission.submitter_id,
                           "submit_daily_log",
                           obra_domain::Role::can_submit_logs)?;

        let item = self.catalog
                       .get_boq_item(submission.boq_item_id)
                       .ok_or_else(|| EngineError::Validation(format!("partida desconocida: {}", submission.boq_item_id)))?;
        if !item.is_active() {
            return Err(EngineError::Validation(format!("partida desactivada: {}", item.code())));
        }
        self.check_catalog_refs(&submission)?;
        for evidence_ref in &submission.evidence_refs {
            if !self.evidence.exists(evidence_ref) {
                return Err(EngineError::Validation(format!("evidencia desconocida: {}", evidence_ref)));
            }
        }

        // Construir primero: así una entrada inválida no deja reserva
        // huérfana en el ledger.
        let log = DailyLog::new(submission.boq_item_id,
                                submission.submitter_id,
                                submission.date,
                                submission.quantity,
                                submission.labor_entries,
                                submission.material_entries,
                                submission.machinery_entries,
                                submission.evidence_refs,
                                submission.notes)?;

        let token = self.ledger.reserve(submission.boq_item_id, submission.quantity)?;

        let project_id = item.project_id();
        self.logs.insert(log.id(),
                         LogSlot { log: log.clone(),
                                   token,
                                   project_id });
        self.emit(&log, project_id);
        self.emit_item_balance(log.boq_item_id(), project_id);
        Ok(log)
    }

    /// Aprueba un parte `pending`: confirma la reserva en el ledger y
    /// fija revisor y timestamp.
    pub fn approve(&self, log_id: Uuid, reviewer_id: Uuid) -> Result<DailyLog, EngineError> {
        require_capability(&self.roles, reviewer_id, "approve_daily_log", obra_domain::Role::can_review_logs)?;

        let mut slot = self.logs.get_mut(&log_id).ok_or(EngineError::UnknownEntity(log_id))?;
        if slot.log.status() != LogStatus::Pending {
            return Err(EngineError::InvalidTransition { from: slot.log.status().to_string(),
                                                        attempted: "approve".to_string() });
        }
        self.ledger.commit(&slot.token)?;
        slot.log.mark_approved(reviewer_id, Utc::now());

        let (log, project_id) = (slot.log.clone(), slot.project_id);
        drop(slot);
        self.emit(&log, project_id);
        self.emit_item_balance(log.boq_item_id(), project_id);
        Ok(log)
    }

    /// Rechaza un parte `pending` con motivo obligatorio: libera la
    /// reserva sin aprobar metrado.
    pub fn reject(&self, log_id: Uuid, reviewer_id: Uuid, reason: impl Into<String>) -> Result<DailyLog, EngineError> {
        require_capability(&self.roles, reviewer_id, "reject_daily_log", obra_domain::Role::can_review_logs)?;
        let reason = reason.into();
        if reason.trim().is_empty() {
            return Err(EngineError::Validation("el motivo de rechazo es obligatorio".to_string()));
        }

        let mut slot = self.logs.get_mut(&log_id).ok_or(EngineError::UnknownEntity(log_id))?;
        if slot.log.status() != LogStatus::Pending {
            return Err(EngineError::InvalidTransition { from: slot.log.status().to_string(),
                                                        attempted: "reject".to_string() });
        }
        self.ledger.release(&slot.token)?;
        slot.log.mark_rejected(reviewer_id, reason, Utc::now());

        let (log, project_id) = (slot.log.clone(), slot.project_id);
        drop(slot);
        self.emit(&log, project_id);
        self.emit_item_balance(log.boq_item_id(), project_id);
        Ok(log)
    }

    /// Copia actual de un parte.
    pub fn get(&self, log_id: Uuid) -> Result<DailyLog, EngineError> {
        self.logs
            .get(&log_id)
            .map(|slot| slot.log.clone())
            .ok_or(EngineError::UnknownEntity(log_id))
    }

    fn check_catalog_refs(&self, submission: &DailyLogSubmission) -> Result<(), EngineError> {
        for e in &submission.labor_entries {
            if self.catalog.get_personnel_type(e.personnel_type_id).is_none() {
                return Err(EngineError::Validation(format!("tipo de personal desconocido: {}", e.personnel_type_id)));
            }
        }
        for e in &submission.material_entries {
            if self.catalog.get_material(e.material_id).is_none() {
                return Err(EngineError::Validation(format!("material desconocido: {}", e.material_id)));
            }
        }
        for e in &submission.machinery_entries {
            if self.catalog.get_machine(e.machine_id).is_none() {
                return Err(EngineError::Validation(format!("maquinaria desconocida: {}", e.machine_id)));
            }
        }
        Ok(())
    }

    // La mutación ya está comprometida cuando se publica: un fallo del
    // notificador se registra, no revierte la transición.
    fn emit(&self, log: &DailyLog, project_id: Uuid) {
        if let Err(e) = self.notifier.publish(EntityType::DailyLog, log.id(), project_id, log) {
            error!("no se pudo publicar el cambio del parte {}: {e}", log.id());
        }
    }

    // Toda mutación del ledger cambia los acumulados de la partida: se
    // publica su snapshot completo junto al evento del parte.
    fn emit_item_balance(&self, boq_item_id: Uuid, project_id: Uuid) {
        match self.ledger.snapshot(boq_item_id) {
            Ok(snap) => {
                if let Err(e) = self.notifier.publish(EntityType::BoqItem, boq_item_id, project_id, &snap) {
                    error!("no se pudo publicar el saldo de la partida {boq_item_id}: {e}");
                }
            }
            Err(e) => error!("no se pudo leer el saldo de la partida {boq_item_id}: {e}"),
        }
    }
}
