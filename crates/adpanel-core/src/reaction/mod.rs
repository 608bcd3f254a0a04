//! Reaction domain module.
//!
//! - `model`: `PersonaReaction` (validated) and `RawReaction` (capability output)
//! - `evaluator`: Reaction evaluation capability trait

mod evaluator;
mod model;

pub use evaluator::ReactionEvaluator;
pub use model::{Action, PersonaReaction, RawReaction};
