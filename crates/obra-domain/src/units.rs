//! Unidades de medida usadas en partidas, materiales y requisiciones.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unidad de medida de un metrado o material.
///
/// El catálogo de unidades es cerrado: toda partida y todo material del
/// catálogo declara una de estas unidades, y las entradas de un parte
/// diario deben usar la misma unidad que su referencia de catálogo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitOfMeasure {
    /// Metro lineal
    M,
    /// Metro cuadrado
    M2,
    /// Metro cúbico
    M3,
    /// Kilogramo
    Kg,
    /// Unidad (pieza)
    Und,
    /// Bolsa
    Bls,
    /// Galón
    Gal,
    /// Pie cuadrado
    P2,
    /// Global (partida no medible por unidad física)
    Glb,
}

impl fmt::Display for UnitOfMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UnitOfMeasure::M => "m",
            UnitOfMeasure::M2 => "m2",
            UnitOfMeasure::M3 => "m3",
            UnitOfMeasure::Kg => "kg",
            UnitOfMeasure::Und => "und",
            UnitOfMeasure::Bls => "bls",
            UnitOfMeasure::Gal => "gal",
            UnitOfMeasure::P2 => "p2",
            UnitOfMeasure::Glb => "glb",
        };
        write!(f, "{}", s)
    }
}
