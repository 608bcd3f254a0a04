//! Test result bundle and read-only queries over it.
//!
//! The bundle is the only artifact a run hands back. Presentation layers
//! filter and paginate through the query functions here instead of
//! re-deriving any metric.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::{
    AudienceSkew, CannibalisationWarning, CreativeMetrics, FatigueProjection, ObjectionFrequency,
    Recommendation, RefinementNote, TierScores,
};
use crate::brand::BrandContext;
use crate::persona::{Persona, Tier};
use crate::reaction::PersonaReaction;

/// Where the run's panel came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelSource {
    Cached,
    Generated,
}

/// Run-level health information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunDiagnostics {
    pub run_id: String,
    pub panel_source: PanelSource,
    pub total_reactions: usize,
    pub degraded_reactions: usize,
    /// Degraded share of all reactions, percentage with one decimal
    pub error_rate: f64,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

/// Everything computed for one creative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreativeResult {
    pub label: String,
    pub headline: String,
    pub metrics: CreativeMetrics,
    pub tier_scores: TierScores,
    pub recommendation: Recommendation,
    pub audience_skew: AudienceSkew,
    pub fatigue: FatigueProjection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refinement_notes: Option<Vec<RefinementNote>>,
    /// Full reaction set in panel order
    pub reactions: Vec<PersonaReaction>,
}

/// The complete output of a test run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResultBundle {
    pub brand: BrandContext,
    /// Panel the creatives were tested against, in panel order
    pub personas: Vec<Persona>,
    pub creatives: Vec<CreativeResult>,
    pub cannibalisation: Vec<CannibalisationWarning>,
    pub patterns: Vec<String>,
    pub objections: Vec<ObjectionFrequency>,
    pub diagnostics: RunDiagnostics,
}

/// Tier selection for persona-level queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TierFilter {
    #[default]
    All,
    Only(Tier),
}

impl TierFilter {
    pub fn matches(self, tier: Tier) -> bool {
        match self {
            TierFilter::All => true,
            TierFilter::Only(t) => t == tier,
        }
    }
}

/// A reaction joined with the persona that produced it.
#[derive(Debug, Clone, Copy)]
pub struct Response<'a> {
    pub persona: &'a Persona,
    pub reaction: &'a PersonaReaction,
}

impl TestResultBundle {
    /// Result for the creative with the given label.
    pub fn creative(&self, label: &str) -> Option<&CreativeResult> {
        self.creatives.iter().find(|c| c.label == label)
    }

    /// Creatives by overall score, highest first; ties keep label order.
    pub fn ranked_creatives(&self) -> Vec<&CreativeResult> {
        let mut ranked: Vec<&CreativeResult> = self.creatives.iter().collect();
        ranked.sort_by(|a, b| {
            b.metrics
                .overall_score
                .cmp(&a.metrics.overall_score)
                .then_with(|| a.label.cmp(&b.label))
        });
        ranked
    }

    /// Highest-scoring creative.
    pub fn winner(&self) -> Option<&CreativeResult> {
        self.ranked_creatives().into_iter().next()
    }

    /// Persona-level responses to one creative, in panel order.
    pub fn responses(&self, label: &str, filter: TierFilter) -> Vec<Response<'_>> {
        let Some(creative) = self.creative(label) else {
            return Vec::new();
        };
        Response::join(&self.personas, &creative.reactions)
            .into_iter()
            .filter(|r| filter.matches(r.reaction.tier))
            .collect()
    }
}

impl<'a> Response<'a> {
    /// Pairs each reaction with its persona by id, keeping reaction order.
    ///
    /// Reactions whose persona is not on the panel are skipped.
    pub fn join(personas: &'a [Persona], reactions: &'a [PersonaReaction]) -> Vec<Response<'a>> {
        let by_id: HashMap<&str, &Persona> =
            personas.iter().map(|p| (p.id.as_str(), p)).collect();

        reactions
            .iter()
            .filter_map(|reaction| {
                by_id
                    .get(reaction.persona_id.as_str())
                    .map(|persona| Response { persona, reaction })
            })
            .collect()
    }
}

/// A window of `limit` items starting at `offset`, clamped to the slice.
pub fn page<T>(items: &[T], offset: usize, limit: usize) -> &[T] {
    let start = offset.min(items.len());
    let end = start.saturating_add(limit).min(items.len());
    &items[start..end]
}
