//! Reaction evaluation capability.

use super::model::RawReaction;
use crate::brand::BrandContext;
use crate::creative::Creative;
use crate::error::Result;
use crate::persona::Persona;

/// External capability producing one persona's raw reaction to one creative.
///
/// Calls for different pairs are independent and may run concurrently.
/// Output is validated and repaired by the reaction collector.
#[async_trait::async_trait]
pub trait ReactionEvaluator: Send + Sync {
    async fn evaluate(
        &self,
        persona: &Persona,
        creative: &Creative,
        brand: &BrandContext,
    ) -> Result<RawReaction>;
}
