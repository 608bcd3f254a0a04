//! In-process panel cache.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use adpanel_core::error::Result;
use adpanel_core::persona::{Panel, PanelCache};

/// Panel cache held in memory for the lifetime of the process.
///
/// Cloning shares the underlying store.
#[derive(Clone, Default)]
pub struct InMemoryPanelCache {
    panels: Arc<RwLock<HashMap<String, Panel>>>,
}

impl InMemoryPanelCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.panels.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.panels.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl PanelCache for InMemoryPanelCache {
    async fn get(&self, brand_key: &str) -> Result<Option<Panel>> {
        Ok(self.panels.read().await.get(brand_key).cloned())
    }

    async fn put(&self, brand_key: &str, panel: &Panel) -> Result<()> {
        self.panels
            .write()
            .await
            .insert(brand_key.to_string(), panel.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adpanel_core::brand::BrandContext;

    #[tokio::test]
    async fn test_clones_share_entries() {
        let cache = InMemoryPanelCache::new();
        let other = cache.clone();
        let panel = Panel::new(BrandContext::new("Oat milk", "", "", "us"), Vec::new());

        cache.put("oat-milk", &panel).await.unwrap();

        assert_eq!(other.len().await, 1);
        assert_eq!(other.get("oat-milk").await.unwrap(), Some(panel));
        assert!(other.get("soy-milk").await.unwrap().is_none());
    }
}
