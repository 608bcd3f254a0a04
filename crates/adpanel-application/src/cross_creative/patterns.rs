//! Behavioural pattern rules.
//!
//! Rules run in a fixed order and each contributes at most one observation:
//! demographic differential, objection concentration, polarisation, tier
//! breakout. Every observation is derived from the data; nothing is emitted
//! when a rule's condition is not met.

use adpanel_core::analysis::ObjectionCategory;
use adpanel_core::persona::{Gender, Persona, Tier};
use adpanel_core::policy::{MAX_PATTERNS, MIN_SLICE_SIZE, POLARISATION_GAP, rounded_mean, whole_percent};
use adpanel_core::reaction::PersonaReaction;

use super::objections::{reaction_objection, remedy};
use super::{CreativeSummary, PersonaLookup, SLICE_GENDERS};

/// Smallest relative score differential worth reporting.
const MIN_DIFFERENTIAL: u8 = 10;
/// Smallest in-slice objection share worth reporting.
const MIN_CONCENTRATION: u8 = 30;

pub(super) fn extract(lookup: &PersonaLookup<'_>, creatives: &[CreativeSummary<'_>]) -> Vec<String> {
    let mut patterns: Vec<String> = [
        demographic_differential(lookup, creatives),
        objection_concentration(lookup, creatives),
        polarisation(creatives),
        tier_breakout(creatives),
    ]
    .into_iter()
    .flatten()
    .collect();
    patterns.truncate(MAX_PATTERNS);
    patterns
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AgeSlice {
    Under30,
    From30To44,
    From45,
}

impl AgeSlice {
    const ALL: [AgeSlice; 3] = [AgeSlice::Under30, AgeSlice::From30To44, AgeSlice::From45];

    fn of(age: u8) -> Self {
        match age {
            0..=29 => AgeSlice::Under30,
            30..=44 => AgeSlice::From30To44,
            _ => AgeSlice::From45,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            AgeSlice::Under30 => "under-30",
            AgeSlice::From30To44 => "30-44",
            AgeSlice::From45 => "45+",
        }
    }
}

fn slice_size(lookup: &PersonaLookup<'_>, gender: Gender, age: AgeSlice) -> usize {
    lookup
        .personas()
        .filter(|p| p.gender == gender && AgeSlice::of(p.age) == age)
        .count()
}

/// Rounded mean score of one creative within a slice.
fn slice_mean(
    lookup: &PersonaLookup<'_>,
    reactions: &[PersonaReaction],
    in_slice: impl Fn(&Persona) -> bool,
) -> Option<u8> {
    let (count, sum) = reactions
        .iter()
        .filter(|r| lookup.get(r).is_some_and(&in_slice))
        .fold((0usize, 0u64), |(count, sum), r| {
            (count + 1, sum + u64::from(r.overall_score))
        });
    rounded_mean(sum, count)
}

/// Rule 1: the demographic slice where one creative most outscores another
/// (or, with a single creative, most outscores its own panel mean).
fn demographic_differential(
    lookup: &PersonaLookup<'_>,
    creatives: &[CreativeSummary<'_>],
) -> Option<String> {
    // (differential %, slice gender, slice age, winner, baseline)
    let mut best: Option<(u8, Gender, AgeSlice, usize, Option<usize>)> = None;

    for gender in SLICE_GENDERS {
        for age in AgeSlice::ALL {
            if slice_size(lookup, gender, age) < MIN_SLICE_SIZE {
                continue;
            }
            let in_slice = |p: &Persona| p.gender == gender && AgeSlice::of(p.age) == age;
            let means: Vec<Option<u8>> = creatives
                .iter()
                .map(|c| slice_mean(lookup, c.reactions, in_slice))
                .collect();

            let mut consider = |winner: usize, baseline: Option<usize>, high: u8, low: u8| {
                if high <= low || low == 0 {
                    return;
                }
                let Some(diff) = whole_percent(usize::from(high - low), usize::from(low)) else {
                    return;
                };
                if best.is_none_or(|(current, ..)| diff > current) {
                    best = Some((diff, gender, age, winner, baseline));
                }
            };

            if creatives.len() == 1 {
                if let Some(mean) = means[0] {
                    consider(0, None, mean, creatives[0].overall_score);
                }
                continue;
            }
            for (a, mean_a) in means.iter().enumerate() {
                for (b, mean_b) in means.iter().enumerate() {
                    if let (Some(high), Some(low)) = (mean_a, mean_b)
                        && a != b
                    {
                        consider(a, Some(b), *high, *low);
                    }
                }
            }
        }
    }

    let (diff, gender, age, winner, baseline) = best?;
    if diff < MIN_DIFFERENTIAL {
        return None;
    }
    let winner = creatives[winner].label;
    let segment = format!("{} {}", age.describe(), gender.plural());
    Some(match baseline {
        Some(baseline) => format!(
            "Creative {winner} scores {diff}% higher than Creative {} with {segment}. This may unlock a buyer persona the account hasn't reached before.",
            creatives[baseline].label
        ),
        None => format!(
            "Creative {winner} scores {diff}% higher with {segment} than with the panel overall. This may unlock a buyer persona the account hasn't reached before."
        ),
    })
}

/// Rule 2: the gender × under/over-40 slice where one objection category
/// (other than unclassified) takes the largest share.
fn objection_concentration(
    lookup: &PersonaLookup<'_>,
    creatives: &[CreativeSummary<'_>],
) -> Option<String> {
    // (share, gender, over 40, category)
    let mut best: Option<(u8, Gender, bool, ObjectionCategory)> = None;

    for gender in SLICE_GENDERS {
        for over_40 in [false, true] {
            let objections: Vec<ObjectionCategory> = creatives
                .iter()
                .flat_map(|c| c.reactions.iter())
                .filter(|r| {
                    lookup
                        .get(r)
                        .is_some_and(|p| p.gender == gender && (p.age >= 40) == over_40)
                })
                .filter_map(reaction_objection)
                .collect();
            if objections.len() < MIN_SLICE_SIZE {
                continue;
            }

            for category in ObjectionCategory::ALL {
                if category == ObjectionCategory::Other {
                    continue;
                }
                let count = objections.iter().filter(|c| **c == category).count();
                let Some(share) = whole_percent(count, objections.len()) else {
                    continue;
                };
                if best.is_none_or(|(current, ..)| share > current) {
                    best = Some((share, gender, over_40, category));
                }
            }
        }
    }

    let (share, gender, over_40, category) = best?;
    if share < MIN_CONCENTRATION {
        return None;
    }
    let gender = match gender {
        Gender::Male => "male",
        _ => "female",
    };
    let age = if over_40 { "40 and over" } else { "under 40" };
    Some(format!(
        "{share}% of {gender} personas {age} flagged {} as their primary objection. Consider {} for this segment.",
        category.topic(),
        remedy(category)
    ))
}

/// Rule 3: the creative with the widest Bullseye-over-Skeptic gap.
fn polarisation(creatives: &[CreativeSummary<'_>]) -> Option<String> {
    // reversed so that ties resolve to the earliest creative
    let (gap, creative, bullseye, skeptic) = creatives
        .iter()
        .rev()
        .filter_map(|c| {
            let bullseye = *c.tier_scores.get(&Tier::Bullseye)?;
            let skeptic = *c.tier_scores.get(&Tier::Skeptic)?;
            let gap = bullseye.checked_sub(skeptic)?;
            Some((gap, c, bullseye, skeptic))
        })
        .max_by_key(|(gap, ..)| *gap)?;

    if gap < POLARISATION_GAP {
        return None;
    }
    Some(format!(
        "Creative {} polarises sharply: loved by Bullseye ({bullseye}), rejected by Skeptics ({skeptic}). Strong for cold prospecting, weak for retargeting.",
        creative.label
    ))
}

/// Rule 4: a creative whose strongest tier is not Bullseye.
fn tier_breakout(creatives: &[CreativeSummary<'_>]) -> Option<String> {
    let (margin, creative, tier, score) = creatives
        .iter()
        .rev()
        .filter_map(|c| {
            let (tier, score) = c
                .tier_scores
                .iter()
                .fold(None, |best: Option<(Tier, u8)>, (tier, score)| match best {
                    Some(b) if b.1 >= *score => Some(b),
                    _ => Some((*tier, *score)),
                })?;
            if tier == Tier::Bullseye {
                return None;
            }
            let bullseye = c.tier_scores.get(&Tier::Bullseye).copied().unwrap_or(0);
            Some((score - bullseye.min(score), c, tier, score))
        })
        .max_by_key(|(margin, ..)| *margin)?;

    let against = match creative.tier_scores.get(&Tier::Bullseye) {
        Some(bullseye) => format!("{score} vs {bullseye} for Bullseye"),
        None => format!("{score}, with no Bullseye responses"),
    };
    Some(format!(
        "Creative {} lands best with the {} tier ({against}, a {margin}-point lead). It may reach buyers outside the core target.",
        creative.label,
        tier.title()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use adpanel_core::analysis::TierScores;
    use adpanel_core::reaction::Action;

    fn persona(i: usize, age: u8, gender: Gender) -> Persona {
        Persona {
            id: format!("p{i}"),
            name: String::new(),
            age,
            gender,
            location: String::new(),
            occupation: String::new(),
            income: String::new(),
            education: String::new(),
            backstory: String::new(),
            tier: Tier::Adjacent,
        }
    }

    fn reaction(p: &Persona, score: u8, objection: &str) -> PersonaReaction {
        PersonaReaction {
            persona_id: p.id.clone(),
            tier: p.tier,
            stopped: true,
            kept_watching: false,
            action: Action::Saved,
            overall_score: score,
            first_impression: String::new(),
            reasoning: String::new(),
            primary_objection: objection.to_string(),
            would_make_them_click: None,
            degraded: false,
        }
    }

    /// 10 young males and 10 older females.
    fn panel() -> Vec<Persona> {
        (0..20)
            .map(|i| {
                if i < 10 {
                    persona(i, 24, Gender::Male)
                } else {
                    persona(i, 52, Gender::Female)
                }
            })
            .collect()
    }

    fn scores(entries: &[(Tier, u8)]) -> TierScores {
        entries.iter().copied().collect()
    }

    #[test]
    fn test_demographic_differential_between_creatives() {
        let personas = panel();
        let lookup = PersonaLookup::new(&personas);
        let a: Vec<PersonaReaction> = personas
            .iter()
            .map(|p| reaction(p, if p.gender == Gender::Male { 84 } else { 50 }, ""))
            .collect();
        let b: Vec<PersonaReaction> = personas.iter().map(|p| reaction(p, 60, "")).collect();
        let tiers = TierScores::new();
        let creatives = [
            CreativeSummary {
                label: "A",
                overall_score: 67,
                tier_scores: &tiers,
                reactions: &a,
            },
            CreativeSummary {
                label: "B",
                overall_score: 60,
                tier_scores: &tiers,
                reactions: &b,
            },
        ];

        let pattern = demographic_differential(&lookup, &creatives).unwrap();
        assert!(pattern.starts_with("Creative A scores 40% higher than Creative B with under-30 males"));
    }

    #[test]
    fn test_small_slices_are_ignored() {
        let personas: Vec<Persona> = (0..4).map(|i| persona(i, 24, Gender::Male)).collect();
        let lookup = PersonaLookup::new(&personas);
        let a: Vec<PersonaReaction> = personas.iter().map(|p| reaction(p, 90, "")).collect();
        let tiers = TierScores::new();
        let creatives = [CreativeSummary {
            label: "A",
            overall_score: 40,
            tier_scores: &tiers,
            reactions: &a,
        }];
        assert!(demographic_differential(&lookup, &creatives).is_none());
    }

    #[test]
    fn test_objection_concentration() {
        let personas = panel();
        let lookup = PersonaLookup::new(&personas);
        let reactions: Vec<PersonaReaction> = personas
            .iter()
            .map(|p| {
                let objection = if p.gender == Gender::Female {
                    "Price seems high for what it is"
                } else {
                    "Not sure it's for me"
                };
                reaction(p, 50, objection)
            })
            .collect();
        let tiers = TierScores::new();
        let creatives = [CreativeSummary {
            label: "A",
            overall_score: 50,
            tier_scores: &tiers,
            reactions: &reactions,
        }];

        let pattern = objection_concentration(&lookup, &creatives).unwrap();
        assert_eq!(
            pattern,
            "100% of male personas under 40 flagged personal relevance as their primary objection. Consider speaking directly to their situation for this segment."
        );
    }

    #[test]
    fn test_polarisation_threshold() {
        let wide = scores(&[(Tier::Bullseye, 80), (Tier::Skeptic, 50)]);
        let narrow = scores(&[(Tier::Bullseye, 70), (Tier::Skeptic, 50)]);
        let creatives = [
            CreativeSummary {
                label: "A",
                overall_score: 60,
                tier_scores: &narrow,
                reactions: &[],
            },
            CreativeSummary {
                label: "B",
                overall_score: 60,
                tier_scores: &wide,
                reactions: &[],
            },
        ];
        assert!(polarisation(&creatives).unwrap().starts_with("Creative B polarises"));
        assert!(polarisation(&creatives[..1]).is_none());
    }

    #[test]
    fn test_tier_breakout() {
        let breakout = scores(&[(Tier::Bullseye, 55), (Tier::Wildcard, 71)]);
        let normal = scores(&[(Tier::Bullseye, 75), (Tier::Wildcard, 60)]);
        let creatives = [
            CreativeSummary {
                label: "A",
                overall_score: 60,
                tier_scores: &normal,
                reactions: &[],
            },
            CreativeSummary {
                label: "B",
                overall_score: 60,
                tier_scores: &breakout,
                reactions: &[],
            },
        ];
        let pattern = tier_breakout(&creatives).unwrap();
        assert!(pattern.contains("Creative B lands best with the Wildcard tier (71 vs 55"));
        assert!(tier_breakout(&creatives[..1]).is_none());
    }

    #[test]
    fn test_extract_caps_and_orders() {
        let personas = panel();
        let lookup = PersonaLookup::new(&personas);
        let a: Vec<PersonaReaction> = personas
            .iter()
            .map(|p| reaction(p, if p.gender == Gender::Male { 84 } else { 50 }, "too expensive"))
            .collect();
        let tiers = scores(&[(Tier::Bullseye, 40), (Tier::Adjacent, 90), (Tier::Skeptic, 10)]);
        let creatives = [CreativeSummary {
            label: "A",
            overall_score: 60,
            tier_scores: &tiers,
            reactions: &a,
        }];

        let patterns = extract(&lookup, &creatives);
        assert!(patterns.len() <= MAX_PATTERNS);
        assert!(patterns[0].contains("under-30 males"));
        assert!(patterns[1].contains("pricing"));
        assert!(patterns.last().unwrap().contains("Adjacent"));
    }
}
