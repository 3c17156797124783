use chrono::{NaiveDate, Utc};
use obra_domain::{BoqItem, DailyLog, LogStatus, PurchaseEvidence, Requisition, RequisitionStatus,
                  Role, UnitOfMeasure, Urgency};
use rust_decimal::Decimal;
use uuid::Uuid;

#[test]
fn test_boq_item_value_is_plain_multiplication() {
    // Valorización = metrado x precio unitario, sin redondeos ocultos
    let item = BoqItem::new(Uuid::new_v4(),
                            "01.02",
                            "Excavación masiva",
                            UnitOfMeasure::M3,
                            Decimal::new(1255, 1),  // 125.5
                            Decimal::new(4830, 2))  // 48.30
                           .unwrap();
    assert_eq!(item.budgeted_value(), Decimal::new(606165, 2)); // 6061.65
}

#[test]
fn test_daily_log_one_way_marks() {
    let mut log = DailyLog::new(Uuid::new_v4(),
                                Uuid::new_v4(),
                                NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
                                Decimal::from(8),
                                vec![],
                                vec![],
                                vec![],
                                vec!["foto-001".to_string()],
                                Some("vaciado de losa".to_string())).unwrap();
    let reviewer = Uuid::new_v4();
    log.mark_approved(reviewer, Utc::now());
    assert_eq!(log.status(), LogStatus::Approved);
    assert_eq!(log.reviewer_id(), Some(reviewer));
    assert!(log.reviewed_at().is_some());
}

#[test]
fn test_requisition_free_text_item_without_material() {
    let req = Requisition::new(Uuid::new_v4(),
                               Uuid::new_v4(),
                               None,
                               "Cinta señalizadora",
                               Decimal::from(3),
                               UnitOfMeasure::Und,
                               Urgency::Low,
                               None).unwrap();
    assert!(req.material_id().is_none());
    assert_eq!(req.status(), RequisitionStatus::PendingPm);
}

#[test]
fn test_purchase_evidence_invoice_trimming() {
    let ev = PurchaseEvidence { invoice: Some(" F001-777 ".to_string()),
                                waybill: Some("G-12".to_string()),
                                photo: None };
    assert_eq!(ev.invoice_ref(), Some("F001-777"));
}

#[test]
fn test_role_capabilities_are_logical_not_literal() {
    // La aprobación de partes y requisiciones es una capacidad, no un
    // nombre de rol: ingeniero y jefe de proyecto la comparten.
    assert!(Role::Engineer.can_review_logs());
    assert!(Role::ProjectManager.can_review_logs());
    assert!(!Role::FieldWorker.can_review_logs());
    assert!(Role::Logistics.can_record_purchase());
    assert!(!Role::Logistics.can_approve_requisitions());
    assert!(Role::Warehouse.can_confirm_receipt());
}
