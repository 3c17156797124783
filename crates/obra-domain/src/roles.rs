//! Roles de los actores de la obra y sus capacidades.
//!
//! El motor no ramifica por el nombre literal del rol: cada transición
//! consulta una capacidad lógica (`can_*`). Agregar un rol nuevo sólo
//! requiere decidir qué capacidades posee.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rol de un actor dentro del proyecto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Personal de campo: registra partes diarios.
    FieldWorker,
    /// Ingeniero residente: revisa partes y solicita materiales.
    Engineer,
    /// Jefe de proyecto: revisa partes y aprueba requisiciones.
    ProjectManager,
    /// Logística: ejecuta compras.
    Logistics,
    /// Almacén: recibe materiales en obra.
    Warehouse,
    /// Administrador del sistema.
    Admin,
}

impl Role {
    /// Puede registrar partes diarios de ejecución.
    pub fn can_submit_logs(&self) -> bool {
        matches!(self, Role::FieldWorker | Role::Engineer | Role::Admin)
    }

    /// Puede aprobar o rechazar partes diarios.
    pub fn can_review_logs(&self) -> bool {
        matches!(self, Role::Engineer | Role::ProjectManager | Role::Admin)
    }

    /// Puede crear requisiciones de materiales.
    pub fn can_create_requisitions(&self) -> bool {
        matches!(self, Role::Engineer | Role::ProjectManager | Role::Admin)
    }

    /// Puede aprobar o rechazar requisiciones pendientes.
    pub fn can_approve_requisitions(&self) -> bool {
        matches!(self, Role::Engineer | Role::ProjectManager | Role::Admin)
    }

    /// Puede registrar la compra de una requisición aprobada.
    pub fn can_record_purchase(&self) -> bool {
        matches!(self, Role::Logistics | Role::Admin)
    }

    /// Puede confirmar la recepción de materiales en obra.
    pub fn can_confirm_receipt(&self) -> bool {
        matches!(self,
                 Role::Warehouse | Role::Engineer | Role::ProjectManager | Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::FieldWorker => "field_worker",
            Role::Engineer => "engineer",
            Role::ProjectManager => "project_manager",
            Role::Logistics => "logistics",
            Role::Warehouse => "warehouse",
            Role::Admin => "admin",
        };
        write!(f, "{}", s)
    }
}
