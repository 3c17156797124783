//! Datos de referencia del catálogo (sólo lectura para el motor).
//!
//! Materiales, tipos de personal y maquinaria son provistos por un
//! colaborador externo; el motor únicamente los consulta para validar
//! referencias foráneas de partes diarios y requisiciones.

use crate::UnitOfMeasure;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Material del catálogo (cemento, acero, agregados, etc.).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    pub id: Uuid,
    pub name: String,
    pub unit: UnitOfMeasure,
}

/// Tipo de personal (operario, oficial, peón, topógrafo, etc.).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonnelType {
    pub id: Uuid,
    pub name: String,
}

/// Equipo o maquinaria (mezcladora, retroexcavadora, etc.).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Machine {
    pub id: Uuid,
    pub name: String,
}
