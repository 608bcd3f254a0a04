//! Metrics Reducer
//!
//! Folds a creative's reactions into creative-level rates and per-tier mean
//! scores. The fold is a plain tally, so it is order-independent and two
//! partial tallies can be merged.

use std::collections::BTreeMap;

use adpanel_core::analysis::{CreativeMetrics, TierScores};
use adpanel_core::persona::Tier;
use adpanel_core::policy::{rounded_mean, tenth_percent, whole_percent};
use adpanel_core::reaction::PersonaReaction;

/// Running counts over a reaction set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReactionTally {
    pub total: usize,
    pub stopped: usize,
    pub kept_watching: usize,
    pub clicked: usize,
    pub degraded: usize,
    pub score_sum: u64,
    /// (reaction count, score sum) per tier
    pub tiers: BTreeMap<Tier, (usize, u64)>,
}

impl ReactionTally {
    pub fn add(&mut self, reaction: &PersonaReaction) {
        self.total += 1;
        self.stopped += usize::from(reaction.stopped);
        self.kept_watching += usize::from(reaction.kept_watching);
        self.clicked += usize::from(reaction.clicked());
        self.degraded += usize::from(reaction.degraded);
        self.score_sum += u64::from(reaction.overall_score);

        let entry = self.tiers.entry(reaction.tier).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += u64::from(reaction.overall_score);
    }

    pub fn merge(mut self, other: ReactionTally) -> ReactionTally {
        self.total += other.total;
        self.stopped += other.stopped;
        self.kept_watching += other.kept_watching;
        self.clicked += other.clicked;
        self.degraded += other.degraded;
        self.score_sum += other.score_sum;
        for (tier, (count, sum)) in other.tiers {
            let entry = self.tiers.entry(tier).or_insert((0, 0));
            entry.0 += count;
            entry.1 += sum;
        }
        self
    }

    /// Creative-level metrics; `None` for an empty tally.
    pub fn metrics(&self) -> Option<CreativeMetrics> {
        Some(CreativeMetrics {
            hook_rate: whole_percent(self.stopped, self.total)?,
            hold_rate: whole_percent(self.kept_watching, self.total)?,
            ctr: tenth_percent(self.clicked, self.total)?,
            overall_score: rounded_mean(self.score_sum, self.total)?,
        })
    }

    /// Mean score per tier that has at least one reaction.
    pub fn tier_scores(&self) -> TierScores {
        self.tiers
            .iter()
            .filter_map(|(tier, (count, sum))| rounded_mean(*sum, *count).map(|mean| (*tier, mean)))
            .collect()
    }
}

impl<'a> FromIterator<&'a PersonaReaction> for ReactionTally {
    fn from_iter<I: IntoIterator<Item = &'a PersonaReaction>>(iter: I) -> Self {
        let mut tally = ReactionTally::default();
        for reaction in iter {
            tally.add(reaction);
        }
        tally
    }
}

/// Reduces one creative's reactions.
///
/// Returns `None` when `reactions` is empty.
pub fn reduce(label: &str, reactions: &[PersonaReaction]) -> Option<(CreativeMetrics, TierScores)> {
    let tally: ReactionTally = reactions.iter().collect();
    let Some(metrics) = tally.metrics() else {
        tracing::debug!("[MetricsReducer] Creative {} has no reactions", label);
        return None;
    };

    tracing::debug!(
        "[MetricsReducer] Creative {}: hook {}%, hold {}%, ctr {}%, score {}",
        label,
        metrics.hook_rate,
        metrics.hold_rate,
        metrics.ctr,
        metrics.overall_score
    );
    Some((metrics, tally.tier_scores()))
}
