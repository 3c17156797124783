//! Puertos hacia colaboradores externos.
//!
//! El motor consume estas interfaces pero nunca las implementa: catálogo,
//! identidad/roles y almacén de evidencias viven fuera del núcleo. Las
//! implementaciones en memoria están en `obra-adapters`.

use obra_domain::{BoqItem, Machine, Material, PersonnelType, Role};
use std::sync::Arc;
use uuid::Uuid;

/// Datos de referencia de sólo lectura: partidas y catálogos.
pub trait CatalogStore: Send + Sync {
    fn get_boq_item(&self, id: Uuid) -> Option<BoqItem>;
    fn list_boq_items(&self, project_id: Uuid) -> Vec<BoqItem>;
    fn get_material(&self, id: Uuid) -> Option<Material>;
    fn get_personnel_type(&self, id: Uuid) -> Option<PersonnelType>;
    fn get_machine(&self, id: Uuid) -> Option<Machine>;
}

/// Proveedor de identidad: resuelve el rol de un actor.
pub trait RoleProvider: Send + Sync {
    fn role_of(&self, actor_id: Uuid) -> Option<Role>;
}

/// Almacén de evidencias ya subidas. El motor sólo verifica existencia;
/// nunca realiza la carga.
pub trait EvidenceStore: Send + Sync {
    fn exists(&self, evidence_ref: &str) -> bool;
}

// Los flujos reciben sus puertos por valor; estas implementaciones
// permiten compartir un mismo colaborador vía `Arc` entre máquinas.
impl<T: CatalogStore + ?Sized> CatalogStore for Arc<T> {
    fn get_boq_item(&self, id: Uuid) -> Option<BoqItem> {
        (**self).get_boq_item(id)
    }

    fn list_boq_items(&self, project_id: Uuid) -> Vec<BoqItem> {
        (**self).list_boq_items(project_id)
    }

    fn get_material(&self, id: Uuid) -> Option<Material> {
        (**self).get_material(id)
    }

    fn get_personnel_type(&self, id: Uuid) -> Option<PersonnelType> {
        (**self).get_personnel_type(id)
    }

    fn get_machine(&self, id: Uuid) -> Option<Machine> {
        (**self).get_machine(id)
    }
}

impl<T: RoleProvider + ?Sized> RoleProvider for Arc<T> {
    fn role_of(&self, actor_id: Uuid) -> Option<Role> {
        (**self).role_of(actor_id)
    }
}

impl<T: EvidenceStore + ?Sized> EvidenceStore for Arc<T> {
    fn exists(&self, evidence_ref: &str) -> bool {
        (**self).exists(evidence_ref)
    }
}
