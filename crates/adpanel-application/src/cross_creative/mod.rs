//! Cross-Creative Analyzer
//!
//! One pass over every creative's reaction set after all per-creative work is
//! done. Produces pairwise cannibalisation warnings, the objection frequency
//! table and up to four behavioural pattern observations.
//!
//! # Module Structure
//!
//! - `cannibalisation`: Pairwise responder overlap
//! - `objections`: Objection taxonomy and frequency table
//! - `patterns`: Deterministic pattern rules

mod cannibalisation;
mod objections;
mod patterns;

use std::collections::HashMap;

use adpanel_core::analysis::{CannibalisationWarning, ObjectionFrequency, TierScores};
use adpanel_core::persona::{Gender, Persona};
use adpanel_core::reaction::PersonaReaction;

pub use objections::{classify_objection, objection_table, remedy};

/// What the analyzer needs to know about one creative.
#[derive(Debug, Clone, Copy)]
pub struct CreativeSummary<'a> {
    pub label: &'a str,
    pub overall_score: u8,
    pub tier_scores: &'a TierScores,
    pub reactions: &'a [PersonaReaction],
}

/// Run-level cross-creative results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrossCreativeReport {
    pub cannibalisation: Vec<CannibalisationWarning>,
    pub patterns: Vec<String>,
    pub objections: Vec<ObjectionFrequency>,
}

pub struct CrossCreativeAnalyzer;

impl CrossCreativeAnalyzer {
    /// Analyzes all creatives of a run together.
    ///
    /// Cannibalisation is only computed with two or more creatives; the
    /// objection table and patterns are produced for every run.
    pub fn analyze(personas: &[Persona], creatives: &[CreativeSummary<'_>]) -> CrossCreativeReport {
        let lookup = PersonaLookup::new(personas);

        let cannibalisation = if creatives.len() >= 2 {
            cannibalisation::warnings(&lookup, creatives)
        } else {
            Vec::new()
        };
        let objections =
            objection_table(creatives.iter().flat_map(|c| c.reactions.iter()));
        let patterns = patterns::extract(&lookup, creatives);

        tracing::debug!(
            "[CrossCreativeAnalyzer] {} warnings, {} patterns, {} objection categories",
            cannibalisation.len(),
            patterns.len(),
            objections.len()
        );

        CrossCreativeReport {
            cannibalisation,
            patterns,
            objections,
        }
    }
}

/// Persona lookup by id for joining reactions to demographics.
pub(crate) struct PersonaLookup<'a> {
    by_id: HashMap<&'a str, &'a Persona>,
}

impl<'a> PersonaLookup<'a> {
    pub(crate) fn new(personas: &'a [Persona]) -> Self {
        Self {
            by_id: personas.iter().map(|p| (p.id.as_str(), p)).collect(),
        }
    }

    pub(crate) fn get(&self, reaction: &PersonaReaction) -> Option<&'a Persona> {
        self.by_id.get(reaction.persona_id.as_str()).copied()
    }

    pub(crate) fn personas(&self) -> impl Iterator<Item = &'a Persona> + '_ {
        self.by_id.values().copied()
    }
}

/// Binary genders used for demographic slicing.
pub(crate) const SLICE_GENDERS: [Gender; 2] = [Gender::Male, Gender::Female];

#[cfg(test)]
mod tests {
    use super::*;
    use adpanel_core::persona::Tier;
    use adpanel_core::reaction::Action;

    fn persona(i: usize) -> Persona {
        Persona {
            id: format!("p{i}"),
            name: String::new(),
            age: 25 + (i % 30) as u8,
            gender: if i % 2 == 0 { Gender::Male } else { Gender::Female },
            location: String::new(),
            occupation: String::new(),
            income: String::new(),
            education: String::new(),
            backstory: String::new(),
            tier: Tier::ALL[i % 4],
        }
    }

    fn reaction(p: &Persona, stopped: bool) -> PersonaReaction {
        PersonaReaction {
            persona_id: p.id.clone(),
            tier: p.tier,
            stopped,
            kept_watching: false,
            action: Action::ScrolledPast,
            overall_score: 60,
            first_impression: String::new(),
            reasoning: String::new(),
            primary_objection: "Too expensive for what it is".to_string(),
            would_make_them_click: None,
            degraded: false,
        }
    }

    #[test]
    fn test_single_creative_has_no_cannibalisation() {
        let personas: Vec<Persona> = (0..20).map(persona).collect();
        let reactions: Vec<PersonaReaction> = personas.iter().map(|p| reaction(p, true)).collect();
        let scores = TierScores::new();
        let summary = CreativeSummary {
            label: "A",
            overall_score: 60,
            tier_scores: &scores,
            reactions: &reactions,
        };

        let report = CrossCreativeAnalyzer::analyze(&personas, &[summary]);
        assert!(report.cannibalisation.is_empty());
        assert_eq!(report.objections.len(), 1);
        assert_eq!(report.objections[0].frequency, 100);
    }

    #[test]
    fn test_identical_creatives_cannibalise() {
        let personas: Vec<Persona> = (0..20).map(persona).collect();
        let reactions: Vec<PersonaReaction> = personas.iter().map(|p| reaction(p, true)).collect();
        let scores = TierScores::new();
        let a = CreativeSummary {
            label: "A",
            overall_score: 60,
            tier_scores: &scores,
            reactions: &reactions,
        };
        let b = CreativeSummary { label: "B", ..a };

        let report = CrossCreativeAnalyzer::analyze(&personas, &[a, b]);
        assert_eq!(report.cannibalisation.len(), 1);
        assert_eq!(report.cannibalisation[0].overlap, 100);
    }
}
