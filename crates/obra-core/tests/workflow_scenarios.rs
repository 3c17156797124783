//! Escenarios de extremo a extremo del motor: ledger + máquinas de estado +
//! notificador, contra los adaptadores en memoria.

use chrono::NaiveDate;
use obra_adapters::{InMemoryCatalog, InMemoryEvidenceStore, StaticRoleProvider};
use obra_core::{CatalogStore, ChangeNotifier, DailyLogSubmission, DailyLogWorkflow, EngineError,
                EntityType, InMemoryTransport, ProgressLedger, RequisitionRequest,
                RequisitionWorkflow};
use obra_domain::{BoqItem, LogStatus, PurchaseEvidence, RequisitionStatus, Role, UnitOfMeasure,
                  Urgency};
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

type Catalog = Arc<InMemoryCatalog>;
type Roles = Arc<StaticRoleProvider>;
type Evidence = Arc<InMemoryEvidenceStore>;

struct Fixture {
    project_id: Uuid,
    item_id: Uuid,
    worker: Uuid,
    engineer: Uuid,
    logistics: Uuid,
    warehouse: Uuid,
    ledger: Arc<ProgressLedger>,
    transport: Arc<InMemoryTransport>,
    logs: DailyLogWorkflow<Catalog, Roles, Evidence>,
    requisitions: RequisitionWorkflow<Catalog, Roles, Evidence>,
    evidence: Evidence,
}

/// Obra con una partida de 50 m3 y un actor por rol.
fn fixture() -> Fixture {
    let project_id = Uuid::new_v4();
    let catalog = Arc::new(InMemoryCatalog::new());
    let item = BoqItem::new(project_id,
                            "03.02.01",
                            "Concreto f'c=210 en columnas",
                            UnitOfMeasure::M3,
                            Decimal::from(50),
                            Decimal::from(420)).unwrap();
    let item_id = item.id();
    catalog.add_boq_item(item);

    let roles = Arc::new(StaticRoleProvider::new());
    let worker = roles.register(Role::FieldWorker);
    let engineer = roles.register(Role::Engineer);
    let logistics = roles.register(Role::Logistics);
    let warehouse = roles.register(Role::Warehouse);

    let evidence = Arc::new(InMemoryEvidenceStore::new());
    let transport = Arc::new(InMemoryTransport::new());
    let notifier = Arc::new(ChangeNotifier::new(transport.clone()));
    let ledger = Arc::new(ProgressLedger::new());
    ledger.register_item(&catalog.get_boq_item(item_id).unwrap()).unwrap();

    let logs = DailyLogWorkflow::new(ledger.clone(),
                                     notifier.clone(),
                                     catalog.clone(),
                                     roles.clone(),
                                     evidence.clone());
    let requisitions = RequisitionWorkflow::new(notifier, catalog, roles.clone(), evidence.clone());

    Fixture { project_id,
              item_id,
              worker,
              engineer,
              logistics,
              warehouse,
              ledger,
              transport,
              logs,
              requisitions,
              evidence }
}

fn submission(fx: &Fixture, quantity: i64) -> DailyLogSubmission {
    DailyLogSubmission { boq_item_id: fx.item_id,
                         submitter_id: fx.worker,
                         date: NaiveDate::from_ymd_opt(2024, 9, 10).unwrap(),
                         quantity: Decimal::from(quantity),
                         labor_entries: vec![],
                         material_entries: vec![],
                         machinery_entries: vec![],
                         evidence_refs: vec![],
                         notes: None }
}

fn requisition_request(fx: &Fixture, requester: Uuid) -> RequisitionRequest {
    RequisitionRequest { project_id: fx.project_id,
                         requester_id: requester,
                         material_id: None,
                         item_name: "Cemento Portland tipo I".to_string(),
                         quantity: Decimal::from(80),
                         unit: UnitOfMeasure::Bls,
                         urgency: Urgency::High,
                         notes: None }
}

#[test]
fn second_log_over_budget_is_refused_without_mutation() {
    let fx = fixture();
    let log = fx.logs.submit(submission(&fx, 30)).unwrap();
    assert_eq!(log.status(), LogStatus::Pending);
    assert_eq!(fx.ledger.available_quantity(fx.item_id).unwrap(), Decimal::from(20));

    let err = fx.logs.submit(submission(&fx, 25)).unwrap_err();
    assert_eq!(err,
               EngineError::OverBudget { requested: Decimal::from(25),
                                         available: Decimal::from(20) });
    let snap = fx.ledger.snapshot(fx.item_id).unwrap();
    assert_eq!(snap.pending, Decimal::from(30));
    assert_eq!(snap.approved, Decimal::ZERO);
}

#[test]
fn approval_commits_the_reservation() {
    let fx = fixture();
    let log = fx.logs.submit(submission(&fx, 30)).unwrap();
    let approved = fx.logs.approve(log.id(), fx.engineer).unwrap();
    assert_eq!(approved.status(), LogStatus::Approved);
    assert_eq!(approved.reviewer_id(), Some(fx.engineer));

    let snap = fx.ledger.snapshot(fx.item_id).unwrap();
    assert_eq!(snap.approved, Decimal::from(30));
    assert_eq!(snap.pending, Decimal::ZERO);
    assert_eq!(snap.available, Decimal::from(20));
}

#[test]
fn rejection_releases_the_reservation() {
    let fx = fixture();
    let log = fx.logs.submit(submission(&fx, 30)).unwrap();
    let rejected = fx.logs.reject(log.id(), fx.engineer, "metrado no sustentado").unwrap();
    assert_eq!(rejected.status(), LogStatus::Rejected);
    assert_eq!(rejected.rejection_reason().map(String::as_str), Some("metrado no sustentado"));

    let snap = fx.ledger.snapshot(fx.item_id).unwrap();
    assert_eq!(snap.approved, Decimal::ZERO);
    assert_eq!(snap.pending, Decimal::ZERO);
    assert_eq!(snap.available, Decimal::from(50));
}

#[test]
fn approved_log_is_terminal_and_ledger_stays_put() {
    let fx = fixture();
    let log = fx.logs.submit(submission(&fx, 10)).unwrap();
    fx.logs.approve(log.id(), fx.engineer).unwrap();

    let err = fx.logs.approve(log.id(), fx.engineer).unwrap_err();
    assert_eq!(err,
               EngineError::InvalidTransition { from: "approved".to_string(),
                                                attempted: "approve".to_string() });
    let err = fx.logs.reject(log.id(), fx.engineer, "tarde").unwrap_err();
    assert!(matches!(err, EngineError::InvalidTransition { .. }));

    let snap = fx.ledger.snapshot(fx.item_id).unwrap();
    assert_eq!(snap.approved, Decimal::from(10));
    assert_eq!(snap.pending, Decimal::ZERO);
}

#[test]
fn rejection_reason_is_mandatory() {
    let fx = fixture();
    let log = fx.logs.submit(submission(&fx, 10)).unwrap();
    assert!(matches!(fx.logs.reject(log.id(), fx.engineer, "   "),
                     Err(EngineError::Validation(_))));
    // El parte sigue pendiente y la reserva viva.
    assert_eq!(fx.logs.get(log.id()).unwrap().status(), LogStatus::Pending);
    assert_eq!(fx.ledger.snapshot(fx.item_id).unwrap().pending, Decimal::from(10));
}

#[test]
fn field_worker_cannot_review_logs() {
    let fx = fixture();
    let log = fx.logs.submit(submission(&fx, 10)).unwrap();
    let err = fx.logs.approve(log.id(), fx.worker).unwrap_err();
    assert!(matches!(err, EngineError::Forbidden { .. }));
    assert_eq!(fx.logs.get(log.id()).unwrap().status(), LogStatus::Pending);
}

#[test]
fn submit_with_unknown_evidence_never_reserves() {
    let fx = fixture();
    let mut sub = submission(&fx, 10);
    sub.evidence_refs = vec!["no-subida".to_string()];
    assert!(matches!(fx.logs.submit(sub), Err(EngineError::Validation(_))));
    assert_eq!(fx.ledger.available_quantity(fx.item_id).unwrap(), Decimal::from(50));
}

#[test]
fn concurrent_review_of_same_log_first_writer_wins() {
    let fx = fixture();
    let log = fx.logs.submit(submission(&fx, 10)).unwrap();
    let Fixture { logs, ledger, item_id, engineer, .. } = fx;
    let logs = Arc::new(logs);
    let id = log.id();

    let a = {
        let logs = Arc::clone(&logs);
        std::thread::spawn(move || logs.approve(id, engineer))
    };
    let b = {
        let logs = Arc::clone(&logs);
        std::thread::spawn(move || logs.reject(id, engineer, "duplicado".to_string()))
    };
    let ra = a.join().unwrap();
    let rb = b.join().unwrap();
    // Exactamente uno gana; el otro observa InvalidTransition.
    assert!(ra.is_ok() ^ rb.is_ok(), "ra={:?} rb={:?}", ra, rb);
    let loser = if ra.is_ok() { rb } else { ra };
    assert!(matches!(loser, Err(EngineError::InvalidTransition { .. })));

    let snap = ledger.snapshot(item_id).unwrap();
    assert!(snap.approved + snap.pending <= snap.budgeted);
    assert_eq!(snap.pending, Decimal::ZERO);
}

#[test]
fn requisition_happy_path_reaches_completed() {
    let fx = fixture();
    fx.evidence.put("factura-F001-555");
    let req = fx.requisitions.create(requisition_request(&fx, fx.engineer)).unwrap();
    assert_eq!(req.status(), RequisitionStatus::PendingPm);

    let req = fx.requisitions.approve_for_purchase(req.id(), fx.engineer).unwrap();
    assert_eq!(req.status(), RequisitionStatus::ToBuy);

    let req = fx.requisitions
                .record_purchase(req.id(),
                                 fx.logistics,
                                 PurchaseEvidence { invoice: Some("factura-F001-555".to_string()),
                                                    waybill: None,
                                                    photo: None })
                .unwrap();
    assert_eq!(req.status(), RequisitionStatus::InTransit);
    assert_eq!(req.purchaser_id(), Some(fx.logistics));

    let req = fx.requisitions.confirm_receipt(req.id(), fx.warehouse).unwrap();
    assert_eq!(req.status(), RequisitionStatus::Completed);
    assert_eq!(req.receiver_id(), Some(fx.warehouse));
    assert!(req.completed_at().is_some());
}

#[test]
fn record_purchase_from_pending_pm_is_invalid_transition() {
    let fx = fixture();
    fx.evidence.put("factura-F001-001");
    let req = fx.requisitions.create(requisition_request(&fx, fx.engineer)).unwrap();
    let err = fx.requisitions
                .record_purchase(req.id(),
                                 fx.logistics,
                                 PurchaseEvidence { invoice: Some("factura-F001-001".to_string()),
                                                    waybill: None,
                                                    photo: None })
                .unwrap_err();
    assert_eq!(err,
               EngineError::InvalidTransition { from: "pending_pm".to_string(),
                                                attempted: "record_purchase".to_string() });
    assert_eq!(fx.requisitions.get(req.id()).unwrap().status(), RequisitionStatus::PendingPm);
}

#[test]
fn purchase_without_invoice_keeps_to_buy() {
    let fx = fixture();
    let req = fx.requisitions.create(requisition_request(&fx, fx.engineer)).unwrap();
    let req = fx.requisitions.approve_for_purchase(req.id(), fx.engineer).unwrap();

    let err = fx.requisitions
                .record_purchase(req.id(), fx.logistics, PurchaseEvidence::default())
                .unwrap_err();
    assert_eq!(err, EngineError::MissingRequiredEvidence);
    let current = fx.requisitions.get(req.id()).unwrap();
    assert_eq!(current.status(), RequisitionStatus::ToBuy);
    assert!(current.purchaser_id().is_none());
}

#[test]
fn requisition_rejection_requires_reason_and_is_terminal() {
    let fx = fixture();
    let req = fx.requisitions.create(requisition_request(&fx, fx.engineer)).unwrap();
    assert!(matches!(fx.requisitions.reject_request(req.id(), fx.engineer, ""),
                     Err(EngineError::Validation(_))));

    let req = fx.requisitions.reject_request(req.id(), fx.engineer, "sin stock presupuestal").unwrap();
    assert_eq!(req.status(), RequisitionStatus::Rejected);
    assert!(req.rejected_at().is_some());

    let err = fx.requisitions.approve_for_purchase(req.id(), fx.engineer).unwrap_err();
    assert!(matches!(err, EngineError::InvalidTransition { .. }));
}

#[test]
fn requester_may_confirm_receipt_without_warehouse_role() {
    let fx = fixture();
    fx.evidence.put("factura-F002-100");
    let req = fx.requisitions.create(requisition_request(&fx, fx.engineer)).unwrap();
    fx.requisitions.approve_for_purchase(req.id(), fx.engineer).unwrap();
    fx.requisitions
      .record_purchase(req.id(),
                       fx.logistics,
                       PurchaseEvidence { invoice: Some("factura-F002-100".to_string()),
                                          waybill: None,
                                          photo: None })
      .unwrap();

    // El ingeniero solicitante confirma su propia requisición.
    let req = fx.requisitions.confirm_receipt(req.id(), fx.engineer).unwrap();
    assert_eq!(req.status(), RequisitionStatus::Completed);
}

#[test]
fn logistics_cannot_approve_requisitions() {
    let fx = fixture();
    let req = fx.requisitions.create(requisition_request(&fx, fx.engineer)).unwrap();
    let err = fx.requisitions.approve_for_purchase(req.id(), fx.logistics).unwrap_err();
    assert!(matches!(err, EngineError::Forbidden { .. }));
}

#[test]
fn notifier_publishes_snapshots_in_per_entity_order() {
    let fx = fixture();
    let log = fx.logs.submit(submission(&fx, 10)).unwrap();
    fx.logs.approve(log.id(), fx.engineer).unwrap();

    let events: Vec<_> = fx.transport
                           .events_for(fx.project_id)
                           .into_iter()
                           .filter(|e| e.entity_id == log.id())
                           .collect();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].seq, 1);
    assert_eq!(events[1].seq, 2);
    assert_eq!(events[0].entity_type, EntityType::DailyLog);
    assert_eq!(events[0].new_state["status"], "pending");
    assert_eq!(events[1].new_state["status"], "approved");
}

#[test]
fn ledger_mutations_publish_item_balance_snapshots() {
    let fx = fixture();
    let log = fx.logs.submit(submission(&fx, 30)).unwrap();
    fx.logs.approve(log.id(), fx.engineer).unwrap();

    // Cada mutación del ledger (reserva y commit) publica el snapshot
    // completo de la partida, no sólo el del parte.
    let events: Vec<_> = fx.transport
                           .events_for(fx.project_id)
                           .into_iter()
                           .filter(|e| e.entity_type == EntityType::BoqItem)
                           .collect();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].entity_id, fx.item_id);
    assert_eq!(events[0].new_state["pending"], "30");
    assert_eq!(events[0].new_state["approved"], "0");
    assert_eq!(events[1].new_state["pending"], "0");
    assert_eq!(events[1].new_state["approved"], "30");
    assert_eq!(events[1].new_state["available"], "20");
    assert!(events[0].seq < events[1].seq);
}

#[test]
fn rejection_publishes_the_restored_item_balance() {
    let fx = fixture();
    let log = fx.logs.submit(submission(&fx, 30)).unwrap();
    fx.logs.reject(log.id(), fx.engineer, "metrado no sustentado").unwrap();

    let events: Vec<_> = fx.transport
                           .events_for(fx.project_id)
                           .into_iter()
                           .filter(|e| e.entity_type == EntityType::BoqItem)
                           .collect();
    let last = events.last().unwrap();
    assert_eq!(last.new_state["pending"], "0");
    assert_eq!(last.new_state["available"], "50");
}
