//! Capability seams between the conversation controller and the outside
//! world: translation, execution, database metadata, health, and the
//! client-local session hint. Each is a small async trait so the
//! controller composes trait objects and tests substitute doubles.

pub mod execute;
pub mod hint;
pub mod metadata;
pub mod translate;

pub use execute::{ExecutionCapability, ExecutionRequest};
pub use hint::SessionHintStore;
pub use metadata::{DatabaseConnection, DatabaseMetadata, TableSummary};
pub use translate::{TranslateRequest, TranslateResponse, TranslationCapability};

use crate::error::Result;
use async_trait::async_trait;

/// Backend liveness probe.
#[async_trait]
pub trait HealthCapability: Send + Sync {
    /// Resolves `Ok` when the backend answers its health endpoint.
    async fn health_check(&self) -> Result<()>;
}
