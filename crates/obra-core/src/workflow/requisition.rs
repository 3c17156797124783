//! Máquina de estados de requisiciones (pipeline de procura).
//!
//! ```text
//! pending_pm --[PM/Ingeniero: aprobar]----------------> to_buy
//! pending_pm --[PM/Ingeniero: rechazar]---------------> rejected
//! to_buy     --[Logística: comprar, factura requerida]-> in_transit
//! in_transit --[Solicitante/Almacén: recibir]----------> completed
//! ```
//!
//! Toda transición fuera de estas aristas falla `InvalidTransition` sin
//! actualización parcial. El pipeline no toca el libro de avance.

use chrono::Utc;
use dashmap::DashMap;
use log::error;
use obra_domain::{PurchaseEvidence, Requisition, RequisitionStatus, UnitOfMeasure, Urgency};
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use crate::errors::EngineError;
use crate::notify::{ChangeNotifier, EntityType};
use crate::ports::{CatalogStore, EvidenceStore, RoleProvider};
use crate::workflow::require_capability;

/// Datos de entrada de una requisición.
#[derive(Debug, Clone)]
pub struct RequisitionRequest {
    pub project_id: Uuid,
    pub requester_id: Uuid,
    /// Referencia de catálogo; `None` para ítems de texto libre.
    pub material_id: Option<Uuid>,
    pub item_name: String,
    pub quantity: Decimal,
    pub unit: UnitOfMeasure,
    pub urgency: Urgency,
    pub notes: Option<String>,
}

/// Máquina de estados de requisiciones.
pub struct RequisitionWorkflow<C, R, E>
    where C: CatalogStore,
          R: RoleProvider,
          E: EvidenceStore
{
    notifier: Arc<ChangeNotifier>,
    catalog: C,
    roles: R,
    evidence: E,
    requisitions: DashMap<Uuid, Requisition>,
}

impl<C, R, E> RequisitionWorkflow<C, R, E>
    where C: CatalogStore,
          R: RoleProvider,
          E: EvidenceStore
{
    pub fn new(notifier: Arc<ChangeNotifier>, catalog: C, roles: R, evidence: E) -> Self {
        Self { notifier,
               catalog,
               roles,
               evidence,
               requisitions: DashMap::new() }
    }

    /// Crea una requisición en `pending_pm`.
    ///
    /// # Errores
    /// - `Forbidden` si el actor no puede crear requisiciones.
    /// - `Validation` si la cantidad no es positiva, el nombre está vacío
    ///   o el material referenciado no existe en el catálogo.
    pub fn create(&self, request: RequisitionRequest) -> Result<Requisition, EngineError> {
        require_capability(&self.roles,
                           request.requester_id,
                           "create_requisition",
                           obra_domain::Role::can_create_requisitions)?;
        if let Some(material_id) = request.material_id {
            if self.catalog.get_material(material_id).is_none() {
                return Err(EngineError::Validation(format!("material desconocido: {}", material_id)));
            }
        }
        let req = Requisition::new(request.project_id,
                                   request.requester_id,
                                   request.material_id,
                                   request.item_name,
                                   request.quantity,
                                   request.unit,
                                   request.urgency,
                                   request.notes)?;
        self.requisitions.insert(req.id(), req.clone());
        self.emit(&req);
        Ok(req)
    }

    /// `pending_pm -> to_buy`. Capacidad: aprobar requisiciones.
    pub fn approve_for_purchase(&self, req_id: Uuid, approver_id: Uuid) -> Result<Requisition, EngineError> {
        require_capability(&self.roles,
                           approver_id,
                           "approve_requisition",
                           obra_domain::Role::can_approve_requisitions)?;

        let mut req = self.requisitions.get_mut(&req_id).ok_or(EngineError::UnknownEntity(req_id))?;
        Self::expect_status(&req, RequisitionStatus::PendingPm, "approve_for_purchase")?;
        req.mark_approved(approver_id, Utc::now());

        let snapshot = req.clone();
        drop(req);
        self.emit(&snapshot);
        Ok(snapshot)
    }

    /// `pending_pm -> rejected`, con motivo obligatorio.
    pub fn reject_request(&self, req_id: Uuid, approver_id: Uuid, reason: impl Into<String>) -> Result<Requisition, EngineError> {
        require_capability(&self.roles,
                           approver_id,
                           "reject_requisition",
                           obra_domain::Role::can_approve_requisitions)?;
        let reason = reason.into();
        if reason.trim().is_empty() {
            return Err(EngineError::Validation("el motivo de rechazo es obligatorio".to_string()));
        }

        let mut req = self.requisitions.get_mut(&req_id).ok_or(EngineError::UnknownEntity(req_id))?;
        Self::expect_status(&req, RequisitionStatus::PendingPm, "reject_request")?;
        req.mark_rejected(approver_id, reason, Utc::now());

        let snapshot = req.clone();
        drop(req);
        self.emit(&snapshot);
        Ok(snapshot)
    }

    /// `to_buy -> in_transit`. Capacidad: registrar compras. La factura
    /// es obligatoria y debe existir en el almacén de evidencias; guía y
    /// foto son opcionales.
    ///
    /// # Errores
    /// - `MissingRequiredEvidence` si la factura está ausente, en blanco
    ///   o no corresponde a un artefacto almacenado.
    /// - `Validation` si la guía o la foto referencian artefactos
    ///   inexistentes.
    pub fn record_purchase(&self, req_id: Uuid, purchaser_id: Uuid, evidence: PurchaseEvidence) -> Result<Requisition, EngineError> {
        require_capability(&self.roles,
                           purchaser_id,
                           "record_purchase",
                           obra_domain::Role::can_record_purchase)?;

        let invoice = evidence.invoice_ref().ok_or(EngineError::MissingRequiredEvidence)?;
        if !self.evidence.exists(invoice) {
            return Err(EngineError::MissingRequiredEvidence);
        }
        for optional_ref in [evidence.waybill.as_deref(), evidence.photo.as_deref()].into_iter().flatten() {
            if !self.evidence.exists(optional_ref) {
                return Err(EngineError::Validation(format!("evidencia desconocida: {}", optional_ref)));
            }
        }

        let mut req = self.requisitions.get_mut(&req_id).ok_or(EngineError::UnknownEntity(req_id))?;
        Self::expect_status(&req, RequisitionStatus::ToBuy, "record_purchase")?;
        req.mark_purchased(purchaser_id, evidence, Utc::now());

        let snapshot = req.clone();
        drop(req);
        self.emit(&snapshot);
        Ok(snapshot)
    }

    /// `in_transit -> completed` (nombre terminal canónico). Puede
    /// confirmar quien posea la capacidad de recepción o el propio
    /// solicitante.
    pub fn confirm_receipt(&self, req_id: Uuid, receiver_id: Uuid) -> Result<Requisition, EngineError> {
        let is_requester = self.requisitions
                               .get(&req_id)
                               .map(|r| r.requester_id() == receiver_id)
                               .unwrap_or(false);
        if !is_requester {
            require_capability(&self.roles,
                               receiver_id,
                               "confirm_receipt",
                               obra_domain::Role::can_confirm_receipt)?;
        }

        let mut req = self.requisitions.get_mut(&req_id).ok_or(EngineError::UnknownEntity(req_id))?;
        Self::expect_status(&req, RequisitionStatus::InTransit, "confirm_receipt")?;
        req.mark_completed(receiver_id, Utc::now());

        let snapshot = req.clone();
        drop(req);
        self.emit(&snapshot);
        Ok(snapshot)
    }

    /// Copia actual de una requisición.
    pub fn get(&self, req_id: Uuid) -> Result<Requisition, EngineError> {
        self.requisitions
            .get(&req_id)
            .map(|r| r.clone())
            .ok_or(EngineError::UnknownEntity(req_id))
    }

    fn expect_status(req: &Requisition, expected: RequisitionStatus, attempted: &str) -> Result<(), EngineError> {
        if req.status() != expected {
            return Err(EngineError::InvalidTransition { from: req.status().to_string(),
                                                        attempted: attempted.to_string() });
        }
        Ok(())
    }

    // La mutación ya está comprometida cuando se publica: un fallo del
    // notificador se registra, no revierte la transición.
    fn emit(&self, req: &Requisition) {
        if let Err(e) = self.notifier.publish(EntityType::Requisition, req.id(), req.project_id(), req) {
            error!("no se pudo publicar el cambio de la requisición {}: {e}", req.id());
        }
    }
}
