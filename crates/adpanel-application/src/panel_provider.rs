//! Persona Panel Provider
//!
//! Supplies the fixed-size, tiered persona panel for a brand. A cached panel
//! is returned untouched; otherwise a fresh one is generated, tiered by the
//! fixed ratio and written back to the cache.

use std::collections::HashSet;
use std::sync::Arc;

use adpanel_core::brand::BrandContext;
use adpanel_core::bundle::PanelSource;
use adpanel_core::error::{PanelError, Result};
use adpanel_core::persona::{Panel, PanelCache, PanelGenerator, Persona, PersonaDescriptor, Tier};
use adpanel_core::policy::{PANEL_SIZE, TIER_QUOTAS};

/// A panel together with where it came from.
#[derive(Debug, Clone)]
pub struct AcquiredPanel {
    pub panel: Arc<Panel>,
    pub source: PanelSource,
}

/// Service that acquires persona panels.
pub struct PanelProvider {
    cache: Arc<dyn PanelCache>,
    generator: Arc<dyn PanelGenerator>,
}

impl PanelProvider {
    pub fn new(cache: Arc<dyn PanelCache>, generator: Arc<dyn PanelGenerator>) -> Self {
        Self { cache, generator }
    }

    /// Returns the panel for `brand`, generating and caching it on a miss.
    ///
    /// Cache failures are logged and treated as a miss. Generation failures
    /// are not retried and surface as [`PanelError::PanelGeneration`].
    pub async fn get_panel(&self, brand: &BrandContext) -> Result<AcquiredPanel> {
        let key = brand.cache_key();

        match self.cache.get(&key).await {
            Ok(Some(panel)) if panel.len() == PANEL_SIZE => {
                tracing::info!("[PanelProvider] Using cached panel for '{}'", key);
                return Ok(AcquiredPanel {
                    panel: Arc::new(panel),
                    source: PanelSource::Cached,
                });
            }
            Ok(Some(panel)) => {
                tracing::warn!(
                    "[PanelProvider] Ignoring cached panel for '{}': {} personas, expected {}",
                    key,
                    panel.len(),
                    PANEL_SIZE
                );
            }
            Ok(None) => {
                tracing::debug!("[PanelProvider] No cached panel for '{}'", key);
            }
            Err(e) => {
                tracing::warn!("[PanelProvider] Cache read failed for '{}': {}", key, e);
            }
        }

        tracing::info!("[PanelProvider] Generating {} personas for '{}'", PANEL_SIZE, key);
        let descriptors = self
            .generator
            .generate(brand, PANEL_SIZE)
            .await
            .map_err(|e| match e {
                PanelError::PanelGeneration(_) => e,
                other => PanelError::panel_generation(other.to_string()),
            })?;

        if descriptors.len() != PANEL_SIZE {
            return Err(PanelError::panel_generation(format!(
                "expected {} personas, generator returned {}",
                PANEL_SIZE,
                descriptors.len()
            )));
        }

        let panel = Panel::new(brand.clone(), assign_tiers(descriptors));

        if let Err(e) = self.cache.put(&key, &panel).await {
            tracing::warn!("[PanelProvider] Failed to cache panel for '{}': {}", key, e);
        }

        Ok(AcquiredPanel {
            panel: Arc::new(panel),
            source: PanelSource::Generated,
        })
    }
}

/// Partitions a full panel into the fixed tier ratio.
///
/// Descriptors are stably ordered by their proposed tier (untiered last) and
/// then filled into the bullseye/adjacent/skeptic/wildcard quotas in order,
/// so a generator that already honours the ratio keeps its assignments.
/// Missing or duplicate ids are replaced with fresh UUIDs.
pub fn assign_tiers(mut descriptors: Vec<PersonaDescriptor>) -> Vec<Persona> {
    descriptors.sort_by_key(|d| d.tier.map_or(Tier::ALL.len(), Tier::index));

    let slots = Tier::ALL
        .iter()
        .zip(TIER_QUOTAS)
        .flat_map(|(tier, quota)| std::iter::repeat_n(*tier, quota))
        .chain(std::iter::repeat(Tier::Wildcard));

    let mut seen = HashSet::new();
    descriptors
        .into_iter()
        .zip(slots)
        .map(|(descriptor, tier)| {
            let id = match descriptor.id.clone() {
                Some(id) if !id.trim().is_empty() && seen.insert(id.clone()) => id,
                _ => {
                    let id = uuid::Uuid::new_v4().to_string();
                    seen.insert(id.clone());
                    id
                }
            };
            descriptor.into_persona(id, tier)
        })
        .collect()
}
