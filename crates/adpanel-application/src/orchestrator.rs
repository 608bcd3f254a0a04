//! Test Orchestrator
//!
//! Sequences one test run: validation, panel acquisition, bounded fan-out of
//! reaction collection, per-creative reduction and analysis, the
//! cross-creative pass and bundle assembly.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::Utc;
use futures::stream::{self, StreamExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use adpanel_core::brand::BrandContext;
use adpanel_core::bundle::{CreativeResult, RunDiagnostics, TestResultBundle};
use adpanel_core::config::EngineConfig;
use adpanel_core::creative::{Creative, CreativeDraft, prepare_creatives};
use adpanel_core::error::{PanelError, Result};
use adpanel_core::persona::{PanelCache, PanelGenerator, Persona};
use adpanel_core::policy::tenth_percent;
use adpanel_core::reaction::{PersonaReaction, ReactionEvaluator};
use adpanel_core::run::{ProgressUpdate, RunState};

use crate::audience::AudienceAnalyzer;
use crate::cross_creative::{CreativeSummary, CrossCreativeAnalyzer};
use crate::metrics_reducer::reduce;
use crate::panel_provider::PanelProvider;
use crate::reaction_collector::ReactionCollector;
use crate::recommendation::RecommendationEngine;

/// Input for one test run.
#[derive(Debug, Clone)]
pub struct TestRequest {
    pub brand: BrandContext,
    pub creatives: Vec<CreativeDraft>,
}

/// Tracks the run state machine and forwards progress to an optional
/// listener.
struct RunTracker {
    run_id: String,
    state: RunState,
    total: usize,
    progress: Option<mpsc::UnboundedSender<ProgressUpdate>>,
}

impl RunTracker {
    fn new(run_id: String, progress: Option<mpsc::UnboundedSender<ProgressUpdate>>) -> Self {
        Self {
            run_id,
            state: RunState::Idle,
            total: 0,
            progress,
        }
    }

    fn advance(&mut self, next: RunState, completed: usize) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(PanelError::internal(format!(
                "illegal run transition {:?} -> {:?}",
                self.state, next
            )));
        }
        tracing::debug!("[TestOrchestrator] Run {}: {:?} -> {:?}", self.run_id, self.state, next);
        self.state = next;
        self.report(completed);
        Ok(())
    }

    fn report(&self, completed: usize) {
        if let Some(sender) = &self.progress {
            // a dropped listener does not affect the run
            let _ = sender.send(ProgressUpdate {
                state: self.state,
                completed,
                total: self.total,
            });
        }
    }
}

pub struct TestOrchestrator {
    panel_provider: PanelProvider,
    collector: ReactionCollector,
    concurrency: usize,
}

impl TestOrchestrator {
    pub fn new(panel_provider: PanelProvider, collector: ReactionCollector, concurrency: usize) -> Self {
        Self {
            panel_provider,
            collector,
            concurrency: concurrency.max(1),
        }
    }

    /// Wires the orchestrator from injected capabilities and engine config.
    pub fn from_config(
        cache: Arc<dyn PanelCache>,
        generator: Arc<dyn PanelGenerator>,
        evaluator: Arc<dyn ReactionEvaluator>,
        config: &EngineConfig,
    ) -> Self {
        Self::new(
            PanelProvider::new(cache, generator),
            ReactionCollector::new(evaluator, config.reaction_timeout()),
            config.concurrency,
        )
    }

    /// Runs a complete test and returns the result bundle.
    ///
    /// # Arguments
    ///
    /// * `request` - Brand context and creative drafts
    /// * `cancel` - Raising this token stops dispatch and abandons in-flight
    ///   reactions; the run then ends with [`PanelError::Cancelled`]
    /// * `progress` - Optional listener for state changes and collection progress
    ///
    /// # Returns
    ///
    /// - `Ok(TestResultBundle)`: Every stage finished
    /// - `Err(PanelError::Validation)`: Rejected before any external call
    /// - `Err(PanelError::PanelGeneration)`: Panel could not be acquired
    /// - `Err(PanelError::Cancelled)`: The token fired before completion
    pub async fn run(
        &self,
        request: TestRequest,
        cancel: CancellationToken,
        progress: Option<mpsc::UnboundedSender<ProgressUpdate>>,
    ) -> Result<TestResultBundle> {
        let TestRequest { brand, creatives } = request;
        brand.validate()?;
        let creatives = prepare_creatives(creatives)?;

        let started_at = Utc::now();
        let run_id = uuid::Uuid::new_v4().to_string();
        let mut tracker = RunTracker::new(run_id.clone(), progress);
        tracing::info!(
            "[TestOrchestrator] Run {} started: {} creative(s) for '{}'",
            run_id,
            creatives.len(),
            brand.display_name()
        );

        // Panel acquisition
        let acquired = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracker.advance(RunState::Cancelled, 0)?;
                tracing::info!("[TestOrchestrator] Run {} cancelled during panel acquisition", run_id);
                return Err(PanelError::Cancelled);
            }
            result = self.panel_provider.get_panel(&brand) => result,
        };
        let acquired = match acquired {
            Ok(acquired) => acquired,
            Err(e) => {
                tracker.advance(RunState::Failed, 0)?;
                tracing::error!("[TestOrchestrator] Run {} failed: {}", run_id, e);
                return Err(e);
            }
        };
        let panel = acquired.panel;
        tracker.total = panel.len() * creatives.len();
        tracker.advance(RunState::PanelReady, 0)?;

        // Reaction collection
        tracker.advance(RunState::Collecting, 0)?;
        let collected = self.collect(&panel.personas, &creatives, &brand, &cancel, &tracker).await;
        if cancel.is_cancelled() {
            tracker.advance(RunState::Cancelled, collected.len())?;
            tracing::info!(
                "[TestOrchestrator] Run {} cancelled after {}/{} reactions",
                run_id,
                collected.len(),
                tracker.total
            );
            return Err(PanelError::Cancelled);
        }

        let mut grid: Vec<Vec<Option<PersonaReaction>>> =
            vec![vec![None; panel.len()]; creatives.len()];
        for (creative, persona, reaction) in collected {
            grid[creative][persona] = Some(reaction);
        }
        let reaction_sets: Vec<Vec<PersonaReaction>> = grid
            .into_iter()
            .map(|row| row.into_iter().flatten().collect())
            .collect();

        // Per-creative reduction and analysis
        tracker.advance(RunState::Reducing, tracker.total)?;
        let mut results = Vec::with_capacity(creatives.len());
        for (creative, reactions) in creatives.iter().zip(reaction_sets) {
            let (metrics, tier_scores) = reduce(&creative.label, &reactions).ok_or_else(|| {
                PanelError::internal(format!("creative {} has no reactions", creative.label))
            })?;
            let (audience_skew, fatigue) = AudienceAnalyzer::analyze(
                &panel.personas,
                &reactions,
                metrics.overall_score,
                &tier_scores,
                &brand,
            );
            let recommendation = RecommendationEngine::with_audience_caveat(
                RecommendationEngine::recommend(&metrics),
                &audience_skew,
            );
            tracing::info!(
                "[TestOrchestrator] Creative {}: score {} -> {}",
                creative.label,
                metrics.overall_score,
                recommendation.verdict
            );

            results.push(CreativeResult {
                label: creative.label.clone(),
                headline: creative.display_headline().to_string(),
                refinement_notes: recommendation.refinement_notes.clone(),
                metrics,
                tier_scores,
                recommendation,
                audience_skew,
                fatigue,
                reactions,
            });
        }

        // Cross-creative pass
        tracker.advance(RunState::CrossAnalyzing, tracker.total)?;
        let summaries: Vec<CreativeSummary<'_>> = results
            .iter()
            .map(|r| CreativeSummary {
                label: &r.label,
                overall_score: r.metrics.overall_score,
                tier_scores: &r.tier_scores,
                reactions: &r.reactions,
            })
            .collect();
        let report = CrossCreativeAnalyzer::analyze(&panel.personas, &summaries);

        let total_reactions: usize = results.iter().map(|r| r.reactions.len()).sum();
        let degraded_reactions = results
            .iter()
            .flat_map(|r| r.reactions.iter())
            .filter(|r| r.degraded)
            .count();
        if degraded_reactions > 0 {
            tracing::warn!(
                "[TestOrchestrator] Run {}: {}/{} reactions degraded",
                run_id,
                degraded_reactions,
                total_reactions
            );
        }

        let diagnostics = RunDiagnostics {
            run_id: run_id.clone(),
            panel_source: acquired.source,
            total_reactions,
            degraded_reactions,
            error_rate: tenth_percent(degraded_reactions, total_reactions).unwrap_or(0.0),
            started_at,
            completed_at: Utc::now(),
        };

        tracker.advance(RunState::Complete, tracker.total)?;
        tracing::info!("[TestOrchestrator] Run {} complete", run_id);

        Ok(TestResultBundle {
            brand,
            personas: panel.personas.clone(),
            creatives: results,
            cannibalisation: report.cannibalisation,
            patterns: report.patterns,
            objections: report.objections,
            diagnostics,
        })
    }

    /// Collects every persona × creative reaction with at most
    /// `concurrency` requests in flight.
    ///
    /// Returns `(creative index, persona index, reaction)` triples in
    /// completion order. Stops dispatching as soon as `cancel` fires.
    async fn collect(
        &self,
        personas: &[Persona],
        creatives: &[Creative],
        brand: &BrandContext,
        cancel: &CancellationToken,
        tracker: &RunTracker,
    ) -> Vec<(usize, usize, PersonaReaction)> {
        let completed = AtomicUsize::new(0);
        let units = (0..creatives.len())
            .flat_map(|c| (0..personas.len()).map(move |p| (c, p)));

        stream::iter(units)
            .map(|(c, p)| {
                let completed = &completed;
                async move {
                    let reaction = self.collector.collect(&personas[p], &creatives[c], brand).await;
                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    tracker.report(done);
                    (c, p, reaction)
                }
            })
            .buffer_unordered(self.concurrency)
            .take_until(cancel.cancelled())
            .collect()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_rejects_illegal_transition() {
        let mut tracker = RunTracker::new("run".to_string(), None);
        assert!(tracker.advance(RunState::Collecting, 0).is_err());
        assert!(tracker.advance(RunState::PanelReady, 0).is_ok());
        assert!(tracker.advance(RunState::Collecting, 0).is_ok());
        assert!(tracker.advance(RunState::Failed, 0).is_err());
        assert!(tracker.advance(RunState::Cancelled, 0).is_ok());
        assert!(tracker.advance(RunState::Complete, 0).is_err());
    }

    #[test]
    fn test_tracker_reports_state_changes() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut tracker = RunTracker::new("run".to_string(), Some(tx));
        tracker.total = 400;
        tracker.advance(RunState::PanelReady, 0).unwrap();
        tracker.report(10);

        let first = rx.try_recv().unwrap();
        assert_eq!(first.state, RunState::PanelReady);
        let second = rx.try_recv().unwrap();
        assert_eq!((second.completed, second.total), (10, 400));
    }
}
