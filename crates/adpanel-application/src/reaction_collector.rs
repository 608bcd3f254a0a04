//! Reaction Collector
//!
//! Invokes the evaluation capability for one (persona, creative) pair and
//! repairs its output into a [`PersonaReaction`] that satisfies the reaction
//! invariants. Failures never propagate: they become degraded reactions.

use std::sync::Arc;
use std::time::Duration;

use adpanel_core::brand::BrandContext;
use adpanel_core::creative::Creative;
use adpanel_core::error::{PanelError, Result};
use adpanel_core::persona::Persona;
use adpanel_core::reaction::{Action, PersonaReaction, RawReaction, ReactionEvaluator};

pub struct ReactionCollector {
    evaluator: Arc<dyn ReactionEvaluator>,
    timeout: Option<Duration>,
}

impl ReactionCollector {
    pub fn new(evaluator: Arc<dyn ReactionEvaluator>, timeout: Option<Duration>) -> Self {
        Self { evaluator, timeout }
    }

    /// Collects one persona's reaction to one creative.
    ///
    /// # Returns
    ///
    /// - A normalized reaction on success
    /// - A degraded reaction (`degraded = true`) if the capability errored
    ///   or did not answer within the timeout
    pub async fn collect(
        &self,
        persona: &Persona,
        creative: &Creative,
        brand: &BrandContext,
    ) -> PersonaReaction {
        match self.evaluate(persona, creative, brand).await {
            Ok(raw) => normalize(persona, raw),
            Err(e) => {
                tracing::warn!(
                    target: "adpanel::collector",
                    "[ReactionCollector] Degraded reaction for persona {} on creative {}: {}",
                    persona.id,
                    creative.label,
                    e
                );
                PersonaReaction::degraded(persona)
            }
        }
    }

    async fn evaluate(
        &self,
        persona: &Persona,
        creative: &Creative,
        brand: &BrandContext,
    ) -> Result<RawReaction> {
        let call = self.evaluator.evaluate(persona, creative, brand);
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
                PanelError::evaluation(format!("timed out after {}s", limit.as_secs()))
            })?,
            None => call.await,
        }
    }
}

/// Repairs raw capability output so the reaction invariants hold.
///
/// - score clamped to 0..=100
/// - `kept_watching` cleared when the persona did not stop
/// - unknown action text, and `Clicked` without a stop, become "Scrolled past"
pub fn normalize(persona: &Persona, raw: RawReaction) -> PersonaReaction {
    let stopped = raw.stopped;
    let action = match Action::parse_lenient(&raw.action) {
        Some(Action::Clicked) if !stopped => Action::ScrolledPast,
        Some(action) => action,
        None => Action::ScrolledPast,
    };

    PersonaReaction {
        persona_id: persona.id.clone(),
        tier: persona.tier,
        stopped,
        kept_watching: raw.kept_watching && stopped,
        action,
        overall_score: raw.overall_score.clamp(0, 100) as u8,
        first_impression: raw.first_impression.trim().to_string(),
        reasoning: raw.reasoning.trim().to_string(),
        primary_objection: raw.primary_objection.trim().to_string(),
        would_make_them_click: raw
            .would_make_them_click
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
        degraded: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adpanel_core::persona::{Gender, Tier};

    fn persona() -> Persona {
        Persona {
            id: "p1".to_string(),
            name: "Marcus Johnson".to_string(),
            age: 34,
            gender: Gender::Male,
            location: "Austin, TX".to_string(),
            occupation: "Engineer".to_string(),
            income: "$95,000".to_string(),
            education: "Bachelor's".to_string(),
            backstory: String::new(),
            tier: Tier::Adjacent,
        }
    }

    fn creative() -> Creative {
        Creative {
            label: "A".to_string(),
            headline: "Stronger every morning".to_string(),
            body: String::new(),
            cta: "Shop now".to_string(),
            media: None,
        }
    }

    fn brand() -> BrandContext {
        BrandContext::new("Protein powder", "", "$40", "us")
    }

    enum Behaviour {
        Answer(RawReaction),
        Fail,
        Hang,
    }

    struct MockEvaluator(Behaviour);

    #[async_trait::async_trait]
    impl ReactionEvaluator for MockEvaluator {
        async fn evaluate(
            &self,
            _persona: &Persona,
            _creative: &Creative,
            _brand: &BrandContext,
        ) -> Result<RawReaction> {
            match &self.0 {
                Behaviour::Answer(raw) => Ok(raw.clone()),
                Behaviour::Fail => Err(PanelError::evaluation("HTTP 500")),
                Behaviour::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(RawReaction::default())
                }
            }
        }
    }

    #[test]
    fn test_normalize_clamps_and_repairs() {
        let raw = RawReaction {
            stopped: false,
            kept_watching: true,
            action: "Clicked".to_string(),
            overall_score: 140,
            ..Default::default()
        };
        let reaction = normalize(&persona(), raw);
        assert_eq!(reaction.overall_score, 100);
        assert!(!reaction.kept_watching);
        assert_eq!(reaction.action, Action::ScrolledPast);
        assert_eq!(reaction.tier, Tier::Adjacent);
        assert!(!reaction.degraded);
    }

    #[test]
    fn test_normalize_unknown_action_and_negative_score() {
        let raw = RawReaction {
            stopped: true,
            kept_watching: true,
            action: "bought three".to_string(),
            overall_score: -12,
            would_make_them_click: Some("  ".to_string()),
            ..Default::default()
        };
        let reaction = normalize(&persona(), raw);
        assert_eq!(reaction.overall_score, 0);
        assert!(reaction.kept_watching);
        assert_eq!(reaction.action, Action::ScrolledPast);
        assert_eq!(reaction.would_make_them_click, None);
    }

    #[test]
    fn test_normalize_keeps_click_after_stop() {
        let raw = RawReaction {
            stopped: true,
            action: "clicked".to_string(),
            overall_score: 81,
            ..Default::default()
        };
        let reaction = normalize(&persona(), raw);
        assert!(reaction.clicked());
        assert_eq!(reaction.overall_score, 81);
    }

    #[tokio::test]
    async fn test_capability_error_degrades() {
        let collector = ReactionCollector::new(Arc::new(MockEvaluator(Behaviour::Fail)), None);
        let reaction = collector.collect(&persona(), &creative(), &brand()).await;
        assert!(reaction.degraded);
        assert!(!reaction.stopped);
        assert_eq!(reaction.overall_score, 0);
        assert_eq!(reaction.action, Action::ScrolledPast);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_degrades() {
        let collector = ReactionCollector::new(
            Arc::new(MockEvaluator(Behaviour::Hang)),
            Some(Duration::from_secs(5)),
        );
        let reaction = collector.collect(&persona(), &creative(), &brand()).await;
        assert!(reaction.degraded);
    }

    #[tokio::test]
    async fn test_successful_collection() {
        let raw = RawReaction {
            stopped: true,
            kept_watching: true,
            action: "Saved".to_string(),
            overall_score: 72,
            primary_objection: " Price seems high ".to_string(),
            ..Default::default()
        };
        let collector = ReactionCollector::new(Arc::new(MockEvaluator(Behaviour::Answer(raw))), None);
        let reaction = collector.collect(&persona(), &creative(), &brand()).await;
        assert_eq!(reaction.action, Action::Saved);
        assert_eq!(reaction.primary_objection, "Price seems high");
        assert_eq!(reaction.persona_id, "p1");
    }
}
