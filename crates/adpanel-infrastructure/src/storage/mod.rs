//! File storage primitives.

pub mod atomic_json;
pub mod config_storage;

pub use atomic_json::{AtomicJsonError, AtomicJsonFile};
pub use config_storage::{ConfigStorage, ENV_API_BASE, ENV_API_KEY, ENV_CONCURRENCY};
