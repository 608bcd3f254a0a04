//! File-based persona panel cache.
//!
//! All panels live in one JSON document keyed by brand key:
//!
//! ```text
//! ~/.config/adpanel/panels.json
//! {
//!   "entries": {
//!     "acme-running-shoes": { "name": ..., "brand": ..., "panel": ..., ... }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use adpanel_core::brand::BrandContext;
use adpanel_core::error::Result;
use adpanel_core::persona::{Panel, PanelCache};

use crate::paths::AdPanelPaths;
use crate::storage::AtomicJsonFile;

/// One cached brand with its panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedBrand {
    /// Display name derived from the product description
    pub name: String,
    pub brand: BrandContext,
    pub panel: Panel,
    pub persona_count: usize,
    pub cached_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PanelCacheDocument {
    #[serde(default)]
    entries: BTreeMap<String, CachedBrand>,
}

pub struct FilePanelCache {
    file: AtomicJsonFile<PanelCacheDocument>,
}

impl FilePanelCache {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: AtomicJsonFile::new(path),
        }
    }

    /// Opens the cache at the default location.
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(AdPanelPaths::panel_cache_file()?))
    }

    fn document(&self) -> Result<PanelCacheDocument> {
        Ok(self.file.load()?.unwrap_or_default())
    }

    /// Cached brands, most recently cached first.
    pub fn list(&self) -> Result<Vec<CachedBrand>> {
        let mut entries: Vec<CachedBrand> = self.document()?.entries.into_values().collect();
        entries.sort_by(|a, b| b.cached_at.cmp(&a.cached_at));
        Ok(entries)
    }

    /// Removes the entry for `brand_key`.
    ///
    /// # Returns
    ///
    /// - `Ok(true)`: An entry was removed
    /// - `Ok(false)`: Nothing was cached under this key
    pub fn invalidate(&self, brand_key: &str) -> Result<bool> {
        let removed = self
            .file
            .update(PanelCacheDocument::default(), |doc| doc.entries.remove(brand_key).is_some())?;
        if removed {
            tracing::info!("[FilePanelCache] Invalidated panel for '{}'", brand_key);
        }
        Ok(removed)
    }
}

#[async_trait::async_trait]
impl PanelCache for FilePanelCache {
    async fn get(&self, brand_key: &str) -> Result<Option<Panel>> {
        let panel = self
            .document()?
            .entries
            .remove(brand_key)
            .map(|entry| entry.panel);
        tracing::debug!(
            "[FilePanelCache] get '{}': {}",
            brand_key,
            if panel.is_some() { "hit" } else { "miss" }
        );
        Ok(panel)
    }

    async fn put(&self, brand_key: &str, panel: &Panel) -> Result<()> {
        let entry = CachedBrand {
            name: panel.brand.display_name(),
            brand: panel.brand.clone(),
            panel: panel.clone(),
            persona_count: panel.len(),
            cached_at: Utc::now(),
        };
        self.file.update(PanelCacheDocument::default(), |doc| {
            doc.entries.insert(brand_key.to_string(), entry);
        })?;
        tracing::debug!(
            "[FilePanelCache] Cached {} personas for '{}'",
            panel.len(),
            brand_key
        );
        Ok(())
    }
}
