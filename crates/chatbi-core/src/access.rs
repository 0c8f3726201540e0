//! The access gate.
//!
//! Every backend call carries an opaque credential; any 401 or 403
//! response must block the whole UI until the user explicitly retries.
//! Instead of a process-wide mutable handler slot, the gate is an
//! explicit `watch` channel constructed once and injected wherever
//! authorization failures can surface. Subscribers observe transitions;
//! the boundary that saw the status reports it.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Why the UI is blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    /// The credential was missing or expired (HTTP 401).
    Unauthenticated,
    /// The credential was valid but not allowed (HTTP 403).
    Forbidden,
}

impl BlockKind {
    /// Maps an HTTP status to a block kind.
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            401 => Some(Self::Unauthenticated),
            403 => Some(Self::Forbidden),
            _ => None,
        }
    }
}

/// Whether the UI is currently allowed to operate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessState {
    /// Normal operation.
    #[default]
    Open,
    /// Blocked pending an explicit user retry.
    Blocked(BlockKind),
}

impl AccessState {
    /// Returns true when the UI is blocked.
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked(_))
    }
}

/// Broadcasts authorization state to the UI.
///
/// Cloning shares the underlying channel, so one gate constructed at
/// startup can be handed to every boundary and subscriber.
#[derive(Debug, Clone)]
pub struct AccessGate {
    tx: watch::Sender<AccessState>,
}

impl Default for AccessGate {
    fn default() -> Self {
        Self::new()
    }
}

impl AccessGate {
    /// Creates an open gate.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(AccessState::Open);
        Self { tx }
    }

    /// Subscribes to state transitions.
    pub fn subscribe(&self) -> watch::Receiver<AccessState> {
        self.tx.subscribe()
    }

    /// Returns the current state.
    pub fn current(&self) -> AccessState {
        *self.tx.borrow()
    }

    /// Reports an HTTP status; 401/403 block the gate.
    ///
    /// Returns true when the status transitioned the gate to blocked.
    pub fn report_status(&self, status: u16) -> bool {
        match BlockKind::from_status(status) {
            Some(kind) => {
                self.block(kind);
                true
            }
            None => false,
        }
    }

    /// Blocks the gate.
    pub fn block(&self, kind: BlockKind) {
        tracing::warn!(target: "access", ?kind, "access gate blocked");
        self.tx.send_replace(AccessState::Blocked(kind));
    }

    /// Clears a block. Called on explicit user retry only.
    pub fn clear(&self) {
        if self.current().is_blocked() {
            tracing::info!(target: "access", "access gate cleared by user retry");
        }
        self.tx.send_replace(AccessState::Open);
    }
}
