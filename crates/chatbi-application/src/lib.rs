//! Application layer for the ChatBI client.
//!
//! Home of the conversation controller, which composes the core
//! capability traits into the session lifecycle a UI drives: startup
//! recovery, sending questions, executing SQL, and health probing.

pub mod conversation;
pub mod welcome;

pub use conversation::{
    ConversationCapabilities, ConversationController, HealthStatus, TransientErrorCallback,
};
