use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::persona::Tier;
use crate::policy::{DROP_CONFIDENCE, LAUNCH_CONFIDENCE, REFINE_CONFIDENCE, ScoreBand};

/// Creative-level rates over the full reaction set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreativeMetrics {
    /// Whole-number percentage of reactions that stopped
    pub hook_rate: u8,
    /// Whole-number percentage of reactions that kept watching
    pub hold_rate: u8,
    /// Percentage of reactions that clicked, one decimal
    pub ctr: f64,
    /// Rounded mean of all reaction scores
    pub overall_score: u8,
}

/// Mean score per tier. Tiers with no members are absent, never zero.
pub type TierScores = BTreeMap<Tier, u8>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    Launch,
    Refine,
    Drop,
}

impl Verdict {
    /// Step function over the overall score (65 / 50, strictly greater-than).
    pub fn from_score(score: u8) -> Self {
        match ScoreBand::of(score) {
            ScoreBand::High => Verdict::Launch,
            ScoreBand::Mid => Verdict::Refine,
            ScoreBand::Low => Verdict::Drop,
        }
    }

    /// Fixed confidence for the verdict band.
    pub fn confidence(self) -> u8 {
        match self {
            Verdict::Launch => LAUNCH_CONFIDENCE,
            Verdict::Refine => REFINE_CONFIDENCE,
            Verdict::Drop => DROP_CONFIDENCE,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Verdict::Launch => "Launch",
            Verdict::Refine => "Refine",
            Verdict::Drop => "Drop",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefinementArea {
    Hook,
    Body,
    #[serde(rename = "CTA")]
    Cta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefinementNote {
    pub area: RefinementArea,
    pub suggestion: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub verdict: Verdict,
    pub confidence: u8,
    pub reasoning: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caveats: Option<String>,
    /// Present only for Refine, always Hook, Body, CTA in that order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refinement_notes: Option<Vec<RefinementNote>>,
}

/// Fixed age bands used for audience skew.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeBand {
    #[serde(rename = "18-24")]
    From18To24,
    #[serde(rename = "25-34")]
    From25To34,
    #[serde(rename = "35-44")]
    From35To44,
    #[serde(rename = "45-54")]
    From45To54,
    #[serde(rename = "55-64")]
    From55To64,
}

impl AgeBand {
    pub const ALL: [AgeBand; 5] = [
        AgeBand::From18To24,
        AgeBand::From25To34,
        AgeBand::From35To44,
        AgeBand::From45To54,
        AgeBand::From55To64,
    ];

    /// Band for an age; ages outside 18-64 fold into the nearest band.
    pub fn of_age(age: u8) -> Self {
        match age {
            0..=24 => AgeBand::From18To24,
            25..=34 => AgeBand::From25To34,
            35..=44 => AgeBand::From35To44,
            45..=54 => AgeBand::From45To54,
            _ => AgeBand::From55To64,
        }
    }

    pub fn range(self) -> &'static str {
        match self {
            AgeBand::From18To24 => "18-24",
            AgeBand::From25To34 => "25-34",
            AgeBand::From35To44 => "35-44",
            AgeBand::From45To54 => "45-54",
            AgeBand::From55To64 => "55-64",
        }
    }

    pub fn index(self) -> usize {
        match self {
            AgeBand::From18To24 => 0,
            AgeBand::From25To34 => 1,
            AgeBand::From35To44 => 2,
            AgeBand::From45To54 => 3,
            AgeBand::From55To64 => 4,
        }
    }
}

/// Gender shares among responders. `male + female <= 100`; the remainder
/// belongs to genders outside the binary split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenderSplit {
    pub male: u8,
    pub female: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeBracketShare {
    pub range: AgeBand,
    pub percentage: u8,
}

/// Who responded (stopped) to a creative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudienceSkew {
    /// Number of responders the split is computed over; zero means the
    /// shares are the neutral midpoint, not observed data
    pub sample_size: usize,
    pub gender_split: GenderSplit,
    pub age_brackets: Vec<AgeBracketShare>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mismatch_flag: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppealSpread {
    Broad,
    Moderate,
    Narrow,
}

impl AppealSpread {
    /// Same thresholds as [`Verdict::from_score`].
    pub fn from_score(score: u8) -> Self {
        match ScoreBand::of(score) {
            ScoreBand::High => AppealSpread::Broad,
            ScoreBand::Mid => AppealSpread::Moderate,
            ScoreBand::Low => AppealSpread::Narrow,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FatigueProjection {
    pub appeal_spread: AppealSpread,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CannibalisationWarning {
    /// Labels of the two overlapping creatives, in label order
    pub creatives: [String; 2],
    /// Shared responders as a percentage of the smaller responding set
    pub overlap: u8,
    pub detail: String,
    pub recommendation: String,
}

/// Canonical objection categories, in tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectionCategory {
    Price,
    SocialProof,
    Credibility,
    Relevance,
    Tone,
    UnclearCta,
    Other,
}

impl ObjectionCategory {
    pub const ALL: [ObjectionCategory; 7] = [
        ObjectionCategory::Price,
        ObjectionCategory::SocialProof,
        ObjectionCategory::Credibility,
        ObjectionCategory::Relevance,
        ObjectionCategory::Tone,
        ObjectionCategory::UnclearCta,
        ObjectionCategory::Other,
    ];

    /// Canonical wording shown in the objection table.
    pub fn label(self) -> &'static str {
        match self {
            ObjectionCategory::Price => "Price seems high without proof it works",
            ObjectionCategory::SocialProof => "No social proof or reviews visible in the ad",
            ObjectionCategory::Credibility => "I've seen similar claims that didn't deliver",
            ObjectionCategory::Relevance => "Not sure this is for my specific situation",
            ObjectionCategory::Tone => "The tone feels too salesy / aggressive",
            ObjectionCategory::UnclearCta => "CTA doesn't tell me what happens next",
            ObjectionCategory::Other => "Other / unclassified",
        }
    }

    /// Short noun phrase for pattern text ("pricing").
    pub fn topic(self) -> &'static str {
        match self {
            ObjectionCategory::Price => "pricing",
            ObjectionCategory::SocialProof => "missing social proof",
            ObjectionCategory::Credibility => "claim credibility",
            ObjectionCategory::Relevance => "personal relevance",
            ObjectionCategory::Tone => "a salesy tone",
            ObjectionCategory::UnclearCta => "an unclear CTA",
            ObjectionCategory::Other => "miscellaneous concerns",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectionFrequency {
    pub objection: String,
    pub category: ObjectionCategory,
    /// Whole percentage of all classified objections
    pub frequency: u8,
    pub count: usize,
}
