//! Proveedor de identidad estático: asignación directa actor -> rol.

use dashmap::DashMap;
use obra_core::RoleProvider;
use obra_domain::Role;
use uuid::Uuid;

/// Tabla fija de roles, suficiente para tests y demostración. Un
/// despliegue real delega en el proveedor de identidad del backend.
#[derive(Default)]
pub struct StaticRoleProvider {
    roles: DashMap<Uuid, Role>,
}

impl StaticRoleProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Asigna un rol y retorna el id del actor, para armar fixtures.
    pub fn register(&self, role: Role) -> Uuid {
        let actor_id = Uuid::new_v4();
        self.roles.insert(actor_id, role);
        actor_id
    }

    pub fn assign(&self, actor_id: Uuid, role: Role) {
        self.roles.insert(actor_id, role);
    }
}

impl RoleProvider for StaticRoleProvider {
    fn role_of(&self, actor_id: Uuid) -> Option<Role> {
        self.roles.get(&actor_id).map(|r| *r.value())
    }
}
