//! Demostración del motor OBRAFLOW: libro de avance, aprobación de
//! partes diarios y pipeline de procura, con colaboradores en memoria.

use chrono::NaiveDate;
use obra_core::CatalogStore;
use obraflow_rust::{BoqItem, ChangeNotifier, DailyLogSubmission, DailyLogWorkflow, EngineConfig,
                    InMemoryCatalog, InMemoryEvidenceStore, InMemoryTransport, ProgressLedger,
                    PurchaseEvidence, RequisitionRequest, RequisitionWorkflow, Role,
                    StaticRoleProvider, UnitOfMeasure, Urgency};
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

fn main() {
    obra_core::config::init_dotenv();

    let project_id = Uuid::new_v4();
    let catalog = Arc::new(InMemoryCatalog::new());
    let item = BoqItem::new(project_id,
                            "03.02.01",
                            "Concreto f'c=210 en columnas",
                            UnitOfMeasure::M3,
                            Decimal::from(50),
                            Decimal::from(420)).expect("partida válida");
    let item_id = item.id();
    println!("Partida registrada: {} (valorización presupuestada: S/ {})",
             item,
             item.budgeted_value());
    catalog.add_boq_item(item);

    let roles = Arc::new(StaticRoleProvider::new());
    let capataz = roles.register(Role::FieldWorker);
    let residente = roles.register(Role::Engineer);
    let logistica = roles.register(Role::Logistics);
    let almacen = roles.register(Role::Warehouse);

    let evidence = Arc::new(InMemoryEvidenceStore::new());
    evidence.put("factura-F001-000123");

    let transport = Arc::new(InMemoryTransport::new());
    let notifier = Arc::new(ChangeNotifier::new(transport.clone()));
    let ledger = Arc::new(ProgressLedger::with_config(EngineConfig::from_env()));
    let item = catalog.get_boq_item(item_id).expect("partida en catálogo");
    ledger.register_item(&item).expect("cuenta registrada");

    let logs = DailyLogWorkflow::new(ledger.clone(),
                                     notifier.clone(),
                                     catalog.clone(),
                                     roles.clone(),
                                     evidence.clone());
    let requisitions = RequisitionWorkflow::new(notifier, catalog, roles.clone(), evidence.clone());

    // --- Partes diarios: reserva, sobre-presupuesto y aprobación ---
    let date = NaiveDate::from_ymd_opt(2024, 9, 10).expect("fecha válida");
    let parte = logs.submit(DailyLogSubmission { boq_item_id: item_id,
                                                 submitter_id: capataz,
                                                 date,
                                                 quantity: Decimal::from(30),
                                                 labor_entries: vec![],
                                                 material_entries: vec![],
                                                 machinery_entries: vec![],
                                                 evidence_refs: vec![],
                                                 notes: Some("vaciado eje A".to_string()) })
                    .expect("primer parte dentro del presupuesto");
    println!("Parte registrado: {}", parte);

    let sobregiro = logs.submit(DailyLogSubmission { boq_item_id: item_id,
                                                     submitter_id: capataz,
                                                     date,
                                                     quantity: Decimal::from(25),
                                                     labor_entries: vec![],
                                                     material_entries: vec![],
                                                     machinery_entries: vec![],
                                                     evidence_refs: vec![],
                                                     notes: None });
    println!("Segundo parte (25 m3 sobre saldo 20): {:?}", sobregiro.err());

    logs.approve(parte.id(), residente).expect("aprobación del residente");
    let snap = ledger.snapshot(item_id).expect("snapshot");
    println!("Avance de la partida: aprobado={} pendiente={} disponible={}",
             snap.approved, snap.pending, snap.available);

    // --- Requisición: pipeline completo hasta `completed` ---
    let req = requisitions.create(RequisitionRequest { project_id,
                                                       requester_id: residente,
                                                       material_id: None,
                                                       item_name: "Cemento Portland tipo I".to_string(),
                                                       quantity: Decimal::from(80),
                                                       unit: UnitOfMeasure::Bls,
                                                       urgency: Urgency::High,
                                                       notes: None })
                          .expect("requisición creada");
    let req = requisitions.approve_for_purchase(req.id(), residente).expect("aprobada");
    let req = requisitions.record_purchase(req.id(),
                                           logistica,
                                           PurchaseEvidence { invoice: Some("factura-F001-000123".to_string()),
                                                              waybill: None,
                                                              photo: None })
                          .expect("compra registrada");
    let req = requisitions.confirm_receipt(req.id(), almacen).expect("recibida en obra");
    println!("Requisición final: {}", req);

    let events = transport.events_for(project_id);
    println!("Eventos publicados para el proyecto: {}", events.len());
    for e in &events {
        println!("  seq={} {:?} {} -> {}",
                 e.seq,
                 e.entity_type,
                 e.entity_id,
                 e.new_state["status"]);
    }
}
