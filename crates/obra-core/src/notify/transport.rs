use dashmap::DashMap;
use std::sync::mpsc::{channel, Receiver, Sender};
use uuid::Uuid;

use super::ChangeEvent;

/// Transporte externo de eventos. El motor decide qué publicar y cuándo;
/// el transporte hace la entrega real y es libre de protocolo.
pub trait EventTransport: Send + Sync {
    /// Entrega el evento a los suscriptores del proyecto afectado.
    fn publish(&self, event: ChangeEvent);
}

/// Transporte en memoria: registra lo publicado por proyecto y lo
/// reenvía a los suscriptores conectados. Útil para tests y para el
/// binario de demostración.
#[derive(Default)]
pub struct InMemoryTransport {
    log: DashMap<Uuid, Vec<ChangeEvent>>,
    subscribers: DashMap<Uuid, Vec<Sender<ChangeEvent>>>,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra un suscriptor para un proyecto y retorna su receptor.
    pub fn subscribe(&self, project_id: Uuid) -> Receiver<ChangeEvent> {
        let (tx, rx) = channel();
        self.subscribers.entry(project_id).or_default().push(tx);
        rx
    }

    /// Eventos publicados para un proyecto (orden de publicación).
    pub fn events_for(&self, project_id: Uuid) -> Vec<ChangeEvent> {
        self.log.get(&project_id).map(|v| v.value().clone()).unwrap_or_default()
    }
}

impl EventTransport for InMemoryTransport {
    fn publish(&self, event: ChangeEvent) {
        self.log.entry(event.project_id).or_default().push(event.clone());
        if let Some(mut subs) = self.subscribers.get_mut(&event.project_id) {
            // descarta suscriptores desconectados
            subs.retain(|tx| tx.send(event.clone()).is_ok());
        }
    }
}
