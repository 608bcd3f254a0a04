//! Analysis result models.
//!
//! Everything here is produced fresh by a test run and never mutated after
//! the result bundle is assembled.

mod model;

pub use model::{
    AgeBand, AgeBracketShare, AppealSpread, AudienceSkew, CannibalisationWarning, CreativeMetrics,
    FatigueProjection, GenderSplit, ObjectionCategory, ObjectionFrequency, Recommendation,
    RefinementArea, RefinementNote, TierScores, Verdict,
};
