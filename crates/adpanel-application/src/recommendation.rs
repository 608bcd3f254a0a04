//! Recommendation Engine
//!
//! Maps reduced creative metrics to a verdict, a band confidence, reasoning
//! text and, for Refine verdicts only, refinement notes.

use adpanel_core::analysis::{
    AudienceSkew, CreativeMetrics, Recommendation, RefinementArea, RefinementNote, Verdict,
};
use adpanel_core::policy::GENDER_SKEW_SHARE;

/// Hook rate below which the headline needs a rewrite.
const WEAK_HOOK: u8 = 40;
/// Hook rate at or above which the headline is kept.
const STRONG_HOOK: u8 = 60;
/// Hold/hook ratio below which the body loses most stoppers.
const WEAK_RETENTION: f64 = 0.5;
/// Hold/hook ratio at or above which the body is fine.
const STRONG_RETENTION: f64 = 0.75;
/// CTR below which the CTA underperforms.
const WEAK_CTR: f64 = 10.0;

pub struct RecommendationEngine;

impl RecommendationEngine {
    /// Derives the recommendation for one creative.
    pub fn recommend(metrics: &CreativeMetrics) -> Recommendation {
        let verdict = Verdict::from_score(metrics.overall_score);
        let reasoning = reasoning(verdict, metrics);
        let refinement_notes = match verdict {
            Verdict::Refine => Some(refinement_notes(metrics)),
            Verdict::Launch | Verdict::Drop => None,
        };

        Recommendation {
            verdict,
            confidence: verdict.confidence(),
            reasoning,
            caveats: None,
            refinement_notes,
        }
    }

    /// Adds an audience caveat to a Launch recommendation when the responders
    /// skew away from the stated target. Other verdicts are returned as-is.
    pub fn with_audience_caveat(
        mut recommendation: Recommendation,
        skew: &AudienceSkew,
    ) -> Recommendation {
        if recommendation.verdict != Verdict::Launch || skew.sample_size == 0 {
            return recommendation;
        }

        recommendation.caveats = if let Some(flag) = &skew.mismatch_flag {
            Some(format!("{flag} Consider a complementary variation for the under-represented segment."))
        } else {
            let split = skew.gender_split;
            if split.male >= GENDER_SKEW_SHARE {
                Some(format!(
                    "Responders skew {}% male. Consider a complementary variation for female audiences.",
                    split.male
                ))
            } else if split.female >= GENDER_SKEW_SHARE {
                Some(format!(
                    "Responders skew {}% female. Consider a complementary variation for male audiences.",
                    split.female
                ))
            } else {
                None
            }
        };
        recommendation
    }
}

fn reasoning(verdict: Verdict, m: &CreativeMetrics) -> String {
    match verdict {
        Verdict::Launch => format!(
            "Scores {} overall with a {}% hook rate and {}% hold rate. Engagement is strong enough to scale into cold prospecting.",
            m.overall_score, m.hook_rate, m.hold_rate
        ),
        Verdict::Refine => {
            let weakest = if m.hook_rate < STRONG_HOOK {
                "the hook is not stopping enough of the panel"
            } else if retention(m) < STRONG_RETENTION {
                "hold drops after the hook, so the body is not delivering on the headline"
            } else {
                "interest is not converting into clicks"
            };
            format!(
                "Scores {} overall ({}% hook, {}% hold, {}% CTR). Promising, but {}.",
                m.overall_score, m.hook_rate, m.hold_rate, m.ctr, weakest
            )
        }
        Verdict::Drop => format!(
            "Scores {} overall with only a {}% hook rate. The angle does not resonate broadly; consider a fundamentally different approach.",
            m.overall_score, m.hook_rate
        ),
    }
}

/// Share of stoppers that kept watching. Zero when nobody stopped.
fn retention(m: &CreativeMetrics) -> f64 {
    if m.hook_rate == 0 {
        return 0.0;
    }
    f64::from(m.hold_rate) / f64::from(m.hook_rate)
}

/// Notes for Hook, Body and CTA, always in that order.
fn refinement_notes(m: &CreativeMetrics) -> Vec<RefinementNote> {
    let hook = if m.hook_rate >= STRONG_HOOK {
        format!(
            "Hook is strong at {}%. Keep the headline as-is; the problem is downstream.",
            m.hook_rate
        )
    } else if m.hook_rate >= WEAK_HOOK {
        format!(
            "Hook stops {}% of the panel. Sharpen the headline's first few words around the core benefit.",
            m.hook_rate
        )
    } else {
        format!(
            "Only {}% stopped. Rewrite the headline around a single concrete outcome.",
            m.hook_rate
        )
    };

    let kept = (retention(m) * 100.0).round();
    let body = if retention(m) >= STRONG_RETENTION {
        format!("Body holds {kept}% of stoppers. Tighten it, but the structure works.")
    } else if retention(m) >= WEAK_RETENTION {
        format!(
            "Body keeps {kept}% of stoppers. Get to the value proposition faster and cut the setup."
        )
    } else {
        format!(
            "Body loses most stoppers (only {kept}% kept watching). It does not deliver on the headline's promise."
        )
    };

    let cta = if m.ctr < WEAK_CTR {
        format!(
            "CTR is {}%. Test a lower-commitment CTA such as \"See How It Works\" or \"Learn More\".",
            m.ctr
        )
    } else {
        format!(
            "CTR is {}%. The CTA converts; make sure it says what happens next.",
            m.ctr
        )
    };

    vec![
        RefinementNote {
            area: RefinementArea::Hook,
            suggestion: hook,
        },
        RefinementNote {
            area: RefinementArea::Body,
            suggestion: body,
        },
        RefinementNote {
            area: RefinementArea::Cta,
            suggestion: cta,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use adpanel_core::analysis::GenderSplit;
    use adpanel_core::policy::{DROP_CONFIDENCE, LAUNCH_CONFIDENCE, REFINE_CONFIDENCE};

    fn metrics(score: u8) -> CreativeMetrics {
        CreativeMetrics {
            hook_rate: 65,
            hold_rate: 40,
            ctr: 25.0,
            overall_score: score,
        }
    }

    fn skew(male: u8, female: u8, flag: Option<&str>) -> AudienceSkew {
        AudienceSkew {
            sample_size: 100,
            gender_split: GenderSplit { male, female },
            age_brackets: Vec::new(),
            mismatch_flag: flag.map(str::to_string),
        }
    }

    #[test]
    fn test_launch_has_no_notes() {
        let rec = RecommendationEngine::recommend(&metrics(70));
        assert_eq!(rec.verdict, Verdict::Launch);
        assert_eq!(rec.confidence, LAUNCH_CONFIDENCE);
        assert!(rec.refinement_notes.is_none());
        assert!(rec.reasoning.contains("70"));
    }

    #[test]
    fn test_boundary_65_is_refine_with_ordered_notes() {
        let rec = RecommendationEngine::recommend(&metrics(65));
        assert_eq!(rec.verdict, Verdict::Refine);
        assert_eq!(rec.confidence, REFINE_CONFIDENCE);
        let areas: Vec<RefinementArea> = rec
            .refinement_notes
            .unwrap()
            .iter()
            .map(|n| n.area)
            .collect();
        assert_eq!(
            areas,
            vec![RefinementArea::Hook, RefinementArea::Body, RefinementArea::Cta]
        );
    }

    #[test]
    fn test_drop_has_neither_notes_nor_caveats() {
        let rec = RecommendationEngine::recommend(&metrics(50));
        assert_eq!(rec.verdict, Verdict::Drop);
        assert_eq!(rec.confidence, DROP_CONFIDENCE);
        let rec = RecommendationEngine::with_audience_caveat(rec, &skew(80, 20, Some("Skews male.")));
        assert!(rec.caveats.is_none());
        assert!(rec.refinement_notes.is_none());
    }

    #[test]
    fn test_launch_caveat_from_skew() {
        let rec = RecommendationEngine::recommend(&metrics(80));
        let balanced = RecommendationEngine::with_audience_caveat(rec.clone(), &skew(50, 48, None));
        assert!(balanced.caveats.is_none());

        let skewed = RecommendationEngine::with_audience_caveat(rec.clone(), &skew(64, 36, None));
        assert!(skewed.caveats.unwrap().contains("64% male"));

        let flagged = RecommendationEngine::with_audience_caveat(rec, &skew(50, 50, Some("Skews 55+.")));
        assert!(flagged.caveats.unwrap().starts_with("Skews 55+."));
    }

    #[test]
    fn test_refine_notes_follow_data() {
        let weak = CreativeMetrics {
            hook_rate: 30,
            hold_rate: 5,
            ctr: 2.5,
            overall_score: 55,
        };
        let notes = RecommendationEngine::recommend(&weak).refinement_notes.unwrap();
        assert!(notes[0].suggestion.contains("Only 30%"));
        assert!(notes[1].suggestion.contains("loses most"));
        assert!(notes[2].suggestion.contains("2.5%"));
    }
}
