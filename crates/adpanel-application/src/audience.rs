//! Audience & Fatigue Analyzer
//!
//! Describes who responded to a creative (gender and age split over the
//! personas that stopped) and projects how quickly it will fatigue.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use adpanel_core::analysis::{
    AgeBand, AgeBracketShare, AppealSpread, AudienceSkew, FatigueProjection, GenderSplit,
    TierScores,
};
use adpanel_core::brand::BrandContext;
use adpanel_core::persona::{Gender, Persona, Tier};
use adpanel_core::policy::{GENDER_SKEW_SHARE, REFINE_THRESHOLD, whole_percent};
use adpanel_core::reaction::PersonaReaction;

static AGE_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{2})\s*(?:-|–|to)\s*(\d{2})\b").expect("Invalid regex: age range")
});
static MALE_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(men|man|male|males|guys|dads|fathers|him)\b")
        .expect("Invalid regex: male words")
});
static FEMALE_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(women|woman|female|females|ladies|moms|mothers|her)\b")
        .expect("Invalid regex: female words")
});
static NEUTRAL_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(everyone|anyone|all genders|both|broad|unisex|men and women|women and men)\b")
        .expect("Invalid regex: gender-neutral words")
});

/// Age bands holding at least this share of responders count as engaged.
const ENGAGED_BAND_SHARE: u8 = 15;

pub struct AudienceAnalyzer;

impl AudienceAnalyzer {
    /// Computes the audience skew and fatigue projection for one creative.
    ///
    /// Only stopped reactions are counted. With no responders the split is
    /// the neutral midpoint and `sample_size` is zero.
    pub fn analyze(
        personas: &[Persona],
        reactions: &[PersonaReaction],
        overall_score: u8,
        tier_scores: &TierScores,
        brand: &BrandContext,
    ) -> (AudienceSkew, FatigueProjection) {
        let by_id: HashMap<&str, &Persona> = personas.iter().map(|p| (p.id.as_str(), p)).collect();
        let responders: Vec<&Persona> = reactions
            .iter()
            .filter(|r| r.stopped)
            .filter_map(|r| by_id.get(r.persona_id.as_str()).copied())
            .collect();

        let skew = audience_skew(&responders, brand);
        let fatigue = fatigue(overall_score, tier_scores, &skew);
        (skew, fatigue)
    }
}

fn audience_skew(responders: &[&Persona], brand: &BrandContext) -> AudienceSkew {
    let n = responders.len();
    if n == 0 {
        return AudienceSkew {
            sample_size: 0,
            gender_split: GenderSplit { male: 50, female: 50 },
            age_brackets: AgeBand::ALL
                .iter()
                .map(|band| AgeBracketShare {
                    range: *band,
                    percentage: 20,
                })
                .collect(),
            mismatch_flag: None,
        };
    }

    let males = responders.iter().filter(|p| p.gender == Gender::Male).count();
    let females = responders.iter().filter(|p| p.gender == Gender::Female).count();
    let male = whole_percent(males, n).unwrap_or(0);
    // keep male + female within 100 when both round up
    let female = whole_percent(females, n).unwrap_or(0).min(100 - male);

    let mut band_counts = [0usize; 5];
    for persona in responders {
        band_counts[AgeBand::of_age(persona.age).index()] += 1;
    }
    let age_brackets: Vec<AgeBracketShare> = AgeBand::ALL
        .iter()
        .map(|band| AgeBracketShare {
            range: *band,
            percentage: whole_percent(band_counts[band.index()], n).unwrap_or(0),
        })
        .collect();

    let gender_split = GenderSplit { male, female };
    let mismatch_flag = mismatch_flag(responders, gender_split, &age_brackets, &brand.audience);

    AudienceSkew {
        sample_size: n,
        gender_split,
        age_brackets,
        mismatch_flag,
    }
}

/// Flags a responder profile that does not match the stated target audience.
///
/// Raised when the target names an `NN-NN` age range and fewer than half of
/// the responders fall inside it, or when one gender reaches
/// [`GENDER_SKEW_SHARE`] and the target mentions neither it nor a broad mix.
fn mismatch_flag(
    responders: &[&Persona],
    split: GenderSplit,
    brackets: &[AgeBracketShare],
    audience: &str,
) -> Option<String> {
    let audience = audience.trim();
    if audience.is_empty() {
        return None;
    }

    let age_mismatch = AGE_RANGE.captures(audience).is_some_and(|caps| {
        let lo: u8 = caps[1].parse().unwrap_or(0);
        let hi: u8 = caps[2].parse().unwrap_or(u8::MAX);
        let (lo, hi) = (lo.min(hi), lo.max(hi));
        let inside = responders
            .iter()
            .filter(|p| (lo..=hi).contains(&p.age))
            .count();
        inside * 2 < responders.len()
    });

    let (dominant, share) = if split.male >= split.female {
        (Gender::Male, split.male)
    } else {
        (Gender::Female, split.female)
    };
    let gender_mismatch = share >= GENDER_SKEW_SHARE
        && !NEUTRAL_WORDS.is_match(audience)
        && !match dominant {
            Gender::Male => MALE_WORDS.is_match(audience),
            _ => FEMALE_WORDS.is_match(audience),
        };

    if !age_mismatch && !gender_mismatch {
        return None;
    }

    let top_band = brackets
        .iter()
        .max_by(|a, b| a.percentage.cmp(&b.percentage).then(b.range.cmp(&a.range)))
        .map_or("18-24", |b| b.range.range());
    let gender_word = match dominant {
        Gender::Male => "male",
        _ => "female",
    };

    Some(format!(
        "Skews {share}% {gender_word} and {top_band}. This may not match your stated target of \"{audience}\"."
    ))
}

fn fatigue(overall_score: u8, tier_scores: &TierScores, skew: &AudienceSkew) -> FatigueProjection {
    let appeal_spread = AppealSpread::from_score(overall_score);

    let positive_tiers: Vec<Tier> = tier_scores
        .iter()
        .filter(|(_, score)| **score > REFINE_THRESHOLD)
        .map(|(tier, _)| *tier)
        .collect();
    let engaged_bands = skew
        .age_brackets
        .iter()
        .filter(|b| b.percentage >= ENGAGED_BAND_SHARE)
        .count();

    let detail = match appeal_spread {
        AppealSpread::Broad => format!(
            "Positive responses across {} tier{} ({}) and {} age band{}. Expect sustained delivery without rapid frequency increases.",
            positive_tiers.len(),
            plural(positive_tiers.len()),
            tier_list(&positive_tiers),
            engaged_bands,
            plural(engaged_bands),
        ),
        AppealSpread::Moderate => {
            let concentrated = if positive_tiers.is_empty() {
                "no single tier".to_string()
            } else {
                tier_list(&positive_tiers)
            };
            format!(
                "Response concentrated in {concentrated}. Will sustain for 2-3 weeks before frequency rises. Plan a refresh."
            )
        }
        AppealSpread::Narrow => {
            if skew.sample_size == 0 {
                "No persona stopped for this creative. It will struggle to earn delivery at all; test a different angle.".to_string()
            } else {
                let top = skew
                    .age_brackets
                    .iter()
                    .max_by(|a, b| a.percentage.cmp(&b.percentage).then(b.range.cmp(&a.range)));
                let (band, share) = top.map_or(("18-24", 0), |b| (b.range.range(), b.percentage));
                format!(
                    "Response concentrated in the {band} band ({share}% of responders). Will fatigue within 1-2 weeks. Consider broadening the angle or testing with a different audience."
                )
            }
        }
    };

    FatigueProjection {
        appeal_spread,
        detail,
    }
}

fn tier_list(tiers: &[Tier]) -> String {
    tiers.iter().map(|t| t.title()).collect::<Vec<_>>().join(", ")
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adpanel_core::reaction::Action;

    fn persona(id: usize, age: u8, gender: Gender) -> Persona {
        Persona {
            id: format!("p{id}"),
            name: String::new(),
            age,
            gender,
            location: String::new(),
            occupation: String::new(),
            income: String::new(),
            education: String::new(),
            backstory: String::new(),
            tier: Tier::Bullseye,
        }
    }

    fn reaction(persona: &Persona, stopped: bool) -> PersonaReaction {
        PersonaReaction {
            persona_id: persona.id.clone(),
            tier: persona.tier,
            stopped,
            kept_watching: false,
            action: Action::ScrolledPast,
            overall_score: 50,
            first_impression: String::new(),
            reasoning: String::new(),
            primary_objection: String::new(),
            would_make_them_click: None,
            degraded: false,
        }
    }

    fn brand(audience: &str) -> BrandContext {
        BrandContext::new("Supplement", audience, "$89", "us")
    }

    #[test]
    fn test_no_responders_gives_neutral_midpoint() {
        let personas = vec![persona(0, 30, Gender::Male)];
        let reactions = vec![reaction(&personas[0], false)];
        let (skew, fatigue) =
            AudienceAnalyzer::analyze(&personas, &reactions, 20, &TierScores::new(), &brand("25-40"));
        assert_eq!(skew.sample_size, 0);
        assert_eq!(skew.gender_split, GenderSplit { male: 50, female: 50 });
        assert!(skew.age_brackets.iter().all(|b| b.percentage == 20));
        assert!(skew.mismatch_flag.is_none());
        assert_eq!(fatigue.appeal_spread, AppealSpread::Narrow);
    }

    #[test]
    fn test_split_counts_only_stoppers() {
        let personas: Vec<Persona> = (0..10)
            .map(|i| {
                let gender = if i < 6 { Gender::Male } else { Gender::Female };
                persona(i, 30, gender)
            })
            .collect();
        // 3 males and 1 female stop
        let reactions: Vec<PersonaReaction> = personas
            .iter()
            .enumerate()
            .map(|(i, p)| reaction(p, i < 3 || i == 9))
            .collect();
        let (skew, _) =
            AudienceAnalyzer::analyze(&personas, &reactions, 60, &TierScores::new(), &brand("men 25-40"));
        assert_eq!(skew.sample_size, 4);
        assert_eq!(skew.gender_split, GenderSplit { male: 75, female: 25 });
        assert_eq!(skew.age_brackets[1].percentage, 100);
        assert!(skew.mismatch_flag.is_none());
    }

    #[test]
    fn test_gender_split_never_exceeds_100() {
        let personas: Vec<Persona> = (0..200)
            .map(|i| persona(i, 30, if i == 0 { Gender::Male } else { Gender::Female }))
            .collect();
        let reactions: Vec<PersonaReaction> = personas.iter().map(|p| reaction(p, true)).collect();
        let (skew, _) = AudienceAnalyzer::analyze(&personas, &reactions, 60, &TierScores::new(), &brand(""));
        assert!(skew.gender_split.male + skew.gender_split.female <= 100);
    }

    #[test]
    fn test_age_mismatch_flag() {
        let personas: Vec<Persona> = (0..4).map(|i| persona(i, 58, Gender::Female)).collect();
        let reactions: Vec<PersonaReaction> = personas.iter().map(|p| reaction(p, true)).collect();
        let (skew, _) = AudienceAnalyzer::analyze(
            &personas,
            &reactions,
            70,
            &TierScores::new(),
            &brand("Health-conscious women 25-40"),
        );
        let flag = skew.mismatch_flag.unwrap();
        assert!(flag.contains("55-64"));
        assert!(flag.contains("25-40"));
    }

    #[test]
    fn test_gender_mismatch_flag_respects_neutral_targets() {
        let personas: Vec<Persona> = (0..5).map(|i| persona(i, 30, Gender::Male)).collect();
        let reactions: Vec<PersonaReaction> = personas.iter().map(|p| reaction(p, true)).collect();

        let (flagged, _) = AudienceAnalyzer::analyze(
            &personas,
            &reactions,
            70,
            &TierScores::new(),
            &brand("Busy moms who cook"),
        );
        assert!(flagged.mismatch_flag.unwrap().contains("100% male"));

        let (neutral, _) = AudienceAnalyzer::analyze(
            &personas,
            &reactions,
            70,
            &TierScores::new(),
            &brand("Broad audience of home cooks"),
        );
        assert!(neutral.mismatch_flag.is_none());
    }

    #[test]
    fn test_broad_fatigue_names_positive_tiers() {
        let personas: Vec<Persona> = (0..4).map(|i| persona(i, 30, Gender::Male)).collect();
        let reactions: Vec<PersonaReaction> = personas.iter().map(|p| reaction(p, true)).collect();
        let mut tiers = TierScores::new();
        tiers.insert(Tier::Bullseye, 80);
        tiers.insert(Tier::Adjacent, 70);
        tiers.insert(Tier::Skeptic, 40);
        let (_, fatigue) = AudienceAnalyzer::analyze(&personas, &reactions, 70, &tiers, &brand(""));
        assert_eq!(fatigue.appeal_spread, AppealSpread::Broad);
        assert!(fatigue.detail.contains("2 tiers (Bullseye, Adjacent)"));
    }
}
