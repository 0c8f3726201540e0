//! Session domain: sessions, messages, stored records, and the registry
//! interface that owns them.

pub mod message;
pub mod model;
pub mod record;
pub mod registry;

pub use message::{Message, MessageRole};
pub use model::Session;
pub use record::PersistedMessageRecord;
pub use registry::SessionRegistry;
