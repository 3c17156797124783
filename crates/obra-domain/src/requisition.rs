//! Requisición de materiales y su pipeline de procura.
//!
//! Estados: `pending_pm -> to_buy -> in_transit -> completed`, más el
//! terminal `rejected` desde `pending_pm`. El nombre canónico del estado
//! terminal de recepción es `completed` (no se usa `received`). Cada
//! transición hacia adelante fija exactamente su par actor/timestamp; la
//! máquina de estados de `obra-core` es la única escritora de `status`.

use crate::{DomainError, UnitOfMeasure};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Urgencia declarada por el solicitante.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Urgency::Low => "low",
            Urgency::Medium => "medium",
            Urgency::High => "high",
            Urgency::Critical => "critical",
        };
        write!(f, "{}", s)
    }
}

/// Estado de una requisición en el pipeline de procura.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequisitionStatus {
    /// Esperando aprobación del jefe de proyecto / ingeniero.
    PendingPm,
    /// Aprobada, pendiente de compra por logística.
    ToBuy,
    /// Comprada, en tránsito hacia la obra.
    InTransit,
    /// Recibida en obra. Estado terminal.
    Completed,
    /// Rechazada en la aprobación. Estado terminal.
    Rejected,
}

impl fmt::Display for RequisitionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RequisitionStatus::PendingPm => "pending_pm",
            RequisitionStatus::ToBuy => "to_buy",
            RequisitionStatus::InTransit => "in_transit",
            RequisitionStatus::Completed => "completed",
            RequisitionStatus::Rejected => "rejected",
        };
        write!(f, "{}", s)
    }
}

/// Evidencia estructurada de la compra. La factura es obligatoria antes
/// de salir de `to_buy`; guía de remisión y foto son opcionales.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PurchaseEvidence {
    pub invoice: Option<String>,
    pub waybill: Option<String>,
    pub photo: Option<String>,
}

impl PurchaseEvidence {
    /// Referencia de factura, si fue provista y no está en blanco.
    pub fn invoice_ref(&self) -> Option<&str> {
        self.invoice.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// Requisición: una solicitud de procura de material, con ítems de
/// catálogo o de texto libre.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Requisition {
    id: Uuid,
    project_id: Uuid,
    material_id: Option<Uuid>,
    item_name: String,
    quantity: Decimal,
    unit: UnitOfMeasure,
    urgency: Urgency,
    status: RequisitionStatus,
    notes: Option<String>,
    requester_id: Uuid,
    approver_id: Option<Uuid>,
    purchaser_id: Option<Uuid>,
    receiver_id: Option<Uuid>,
    evidence: Option<PurchaseEvidence>,
    rejection_reason: Option<String>,
    created_at: DateTime<Utc>,
    approved_at: Option<DateTime<Utc>>,
    purchased_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    rejected_at: Option<DateTime<Utc>>,
}

impl Requisition {
    /// Crea una requisición en estado `pending_pm`.
    ///
    /// # Errores
    /// Retorna `DomainError::Validation` si la cantidad no es positiva o
    /// el nombre del ítem está vacío.
    pub fn new(project_id: Uuid,
               requester_id: Uuid,
               material_id: Option<Uuid>,
               item_name: impl Into<String>,
               quantity: Decimal,
               unit: UnitOfMeasure,
               urgency: Urgency,
               notes: Option<String>)
               -> Result<Self, DomainError> {
        let item_name = item_name.into();
        if item_name.trim().is_empty() {
            return Err(DomainError::Validation("el nombre del ítem no puede estar vacío".to_string()));
        }
        if quantity <= Decimal::ZERO {
            return Err(DomainError::Validation(format!("la cantidad solicitada debe ser positiva: {}", quantity)));
        }
        Ok(Requisition { id: Uuid::new_v4(),
                         project_id,
                         material_id,
                         item_name,
                         quantity,
                         unit,
                         urgency,
                         status: RequisitionStatus::PendingPm,
                         notes,
                         requester_id,
                         approver_id: None,
                         purchaser_id: None,
                         receiver_id: None,
                         evidence: None,
                         rejection_reason: None,
                         created_at: Utc::now(),
                         approved_at: None,
                         purchased_at: None,
                         completed_at: None,
                         rejected_at: None })
    }

    /// `pending_pm -> to_buy`: fija aprobador y timestamp de aprobación.
    pub fn mark_approved(&mut self, approver_id: Uuid, at: DateTime<Utc>) {
        self.status = RequisitionStatus::ToBuy;
        self.approver_id = Some(approver_id);
        self.approved_at = Some(at);
    }

    /// `pending_pm -> rejected`: fija aprobador, motivo y timestamp.
    pub fn mark_rejected(&mut self, approver_id: Uuid, reason: String, at: DateTime<Utc>) {
        self.status = RequisitionStatus::Rejected;
        self.approver_id = Some(approver_id);
        self.rejection_reason = Some(reason);
        self.rejected_at = Some(at);
    }

    /// `to_buy -> in_transit`: fija comprador, evidencia y timestamp.
    pub fn mark_purchased(&mut self, purchaser_id: Uuid, evidence: PurchaseEvidence, at: DateTime<Utc>) {
        self.status = RequisitionStatus::InTransit;
        self.purchaser_id = Some(purchaser_id);
        self.evidence = Some(evidence);
        self.purchased_at = Some(at);
    }

    /// `in_transit -> completed`: fija receptor y timestamp de recepción.
    pub fn mark_completed(&mut self, receiver_id: Uuid, at: DateTime<Utc>) {
        self.status = RequisitionStatus::Completed;
        self.receiver_id = Some(receiver_id);
        self.completed_at = Some(at);
    }

    // Getters
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn project_id(&self) -> Uuid {
        self.project_id
    }

    pub fn material_id(&self) -> Option<Uuid> {
        self.material_id
    }

    pub fn item_name(&self) -> &str {
        &self.item_name
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn unit(&self) -> UnitOfMeasure {
        self.unit
    }

    pub fn urgency(&self) -> Urgency {
        self.urgency
    }

    pub fn status(&self) -> RequisitionStatus {
        self.status
    }

    pub fn notes(&self) -> Option<&String> {
        self.notes.as_ref()
    }

    pub fn requester_id(&self) -> Uuid {
        self.requester_id
    }

    pub fn approver_id(&self) -> Option<Uuid> {
        self.approver_id
    }

    pub fn purchaser_id(&self) -> Option<Uuid> {
        self.purchaser_id
    }

    pub fn receiver_id(&self) -> Option<Uuid> {
        self.receiver_id
    }

    pub fn evidence(&self) -> Option<&PurchaseEvidence> {
        self.evidence.as_ref()
    }

    pub fn rejection_reason(&self) -> Option<&String> {
        self.rejection_reason.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn approved_at(&self) -> Option<DateTime<Utc>> {
        self.approved_at
    }

    pub fn purchased_at(&self) -> Option<DateTime<Utc>> {
        self.purchased_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn rejected_at(&self) -> Option<DateTime<Utc>> {
        self.rejected_at
    }
}

impl fmt::Display for Requisition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f,
               "Requisition(id: {}, item: {}, cantidad: {} {}, status: {})",
               self.id, self.item_name, self.quantity, self.unit, self.status)
    }
}
