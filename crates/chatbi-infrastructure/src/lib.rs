//! Infrastructure for the ChatBI client: client-local file persistence
//! and tracing setup.

pub mod atomic_file;
pub mod hint_store;
pub mod logging;
pub mod paths;

pub use atomic_file::AtomicTomlFile;
pub use hint_store::{ClientState, FileHintStore};
pub use logging::init_tracing;
pub use paths::ChatBiPaths;
