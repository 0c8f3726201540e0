//! Core domain for the ChatBI client.
//!
//! Holds the domain model (sessions, messages, tabular results, semantic
//! descriptors, debug bundles), the pure components (message normalizer,
//! visualization field inferencer), the capability traits the controller
//! composes, and the access gate. No I/O happens here.

pub mod access;
pub mod capability;
pub mod debug;
pub mod error;
pub mod normalize;
pub mod result;
pub mod semantic;
pub mod session;
pub mod viz;

// Re-export common types
pub use access::{AccessGate, AccessState, BlockKind};
pub use debug::{DebugBundle, DebugRecord};
pub use error::{ChatBiError, Result};
pub use result::{ResultRow, TabularResult};
pub use semantic::SemanticQueryDescriptor;
pub use session::{Message, MessageRole, PersistedMessageRecord, Session, SessionRegistry};
pub use viz::{ChartMode, ChartPoint, VisualizationSelection};
