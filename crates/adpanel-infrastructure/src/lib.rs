//! Infrastructure layer for ADPANEL.
//!
//! File locations, engine config loading and the persona panel cache
//! implementations.

pub mod file_panel_cache;
pub mod memory_panel_cache;
pub mod paths;
pub mod storage;

pub use file_panel_cache::{CachedBrand, FilePanelCache};
pub use memory_panel_cache::InMemoryPanelCache;
pub use paths::{AdPanelPaths, PathError};
pub use storage::ConfigStorage;
