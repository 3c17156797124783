//! Notificación de cambios comprometidos y trait EventTransport.

mod notifier;
mod transport;
mod types;

pub use notifier::ChangeNotifier;
pub use transport::{EventTransport, InMemoryTransport};
pub use types::{ChangeEvent, EntityType};
