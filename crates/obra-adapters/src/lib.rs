//! obra-adapters: implementaciones en memoria de los puertos del motor.
//!
//! Catálogo, proveedor de roles y almacén de evidencias para tests y para
//! el binario de demostración. El transporte en memoria vive en
//! `obra_core::notify` junto al trait que implementa.
pub mod catalog;
pub mod evidence;
pub mod identity;

pub use catalog::InMemoryCatalog;
pub use evidence::InMemoryEvidenceStore;
pub use identity::StaticRoleProvider;
