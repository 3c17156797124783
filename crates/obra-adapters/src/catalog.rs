//! Catálogo en memoria: partidas, materiales, personal y maquinaria.

use dashmap::DashMap;
use obra_core::CatalogStore;
use obra_domain::{BoqItem, Machine, Material, PersonnelType};
use uuid::Uuid;

/// Catálogo de referencia cargado por el actor de planificación. El
/// motor sólo lo consulta; las altas ocurren fuera de los flujos.
#[derive(Default)]
pub struct InMemoryCatalog {
    boq_items: DashMap<Uuid, BoqItem>,
    materials: DashMap<Uuid, Material>,
    personnel: DashMap<Uuid, PersonnelType>,
    machines: DashMap<Uuid, Machine>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_boq_item(&self, item: BoqItem) {
        self.boq_items.insert(item.id(), item);
    }

    pub fn add_material(&self, material: Material) {
        self.materials.insert(material.id, material);
    }

    pub fn add_personnel_type(&self, personnel_type: PersonnelType) {
        self.personnel.insert(personnel_type.id, personnel_type);
    }

    pub fn add_machine(&self, machine: Machine) {
        self.machines.insert(machine.id, machine);
    }

    /// Reemplaza la partida por su versión desactivada.
    pub fn deactivate_boq_item(&self, id: Uuid) {
        if let Some(mut item) = self.boq_items.get_mut(&id) {
            *item = item.deactivated();
        }
    }
}

impl CatalogStore for InMemoryCatalog {
    fn get_boq_item(&self, id: Uuid) -> Option<BoqItem> {
        self.boq_items.get(&id).map(|i| i.value().clone())
    }

    fn list_boq_items(&self, project_id: Uuid) -> Vec<BoqItem> {
        self.boq_items
            .iter()
            .filter(|i| i.project_id() == project_id)
            .map(|i| i.value().clone())
            .collect()
    }

    fn get_material(&self, id: Uuid) -> Option<Material> {
        self.materials.get(&id).map(|m| m.value().clone())
    }

    fn get_personnel_type(&self, id: Uuid) -> Option<PersonnelType> {
        self.personnel.get(&id).map(|p| p.value().clone())
    }

    fn get_machine(&self, id: Uuid) -> Option<Machine> {
        self.machines.get(&id).map(|m| m.value().clone())
    }
}
