//! Panel cache trait.
//!
//! Defines the interface for the brand-keyed persona panel store.

use super::model::Panel;
use crate::error::Result;

/// An abstract key→panel store.
///
/// The engine only reads and writes entries; lifetime and eviction belong to
/// the implementation.
#[async_trait::async_trait]
pub trait PanelCache: Send + Sync {
    /// Retrieves the panel cached under `brand_key`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Panel))`: A panel is cached for this key
    /// - `Ok(None)`: No entry
    /// - `Err(PanelError)`: Error if the store cannot be read
    async fn get(&self, brand_key: &str) -> Result<Option<Panel>>;

    /// Stores `panel` under `brand_key`, replacing any existing entry.
    async fn put(&self, brand_key: &str, panel: &Panel) -> Result<()>;
}
