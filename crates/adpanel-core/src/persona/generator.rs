//! Panel generation capability.

use super::model::PersonaDescriptor;
use crate::brand::BrandContext;
use crate::error::Result;

/// External capability that produces a fresh persona panel for a brand.
///
/// Implementations should return exactly one descriptor per panel slot.
/// Any error is treated as fatal for the run that requested it.
#[async_trait::async_trait]
pub trait PanelGenerator: Send + Sync {
    async fn generate(&self, brand: &BrandContext, count: usize) -> Result<Vec<PersonaDescriptor>>;
}
