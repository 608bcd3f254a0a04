use std::collections::{BTreeMap, HashSet};

use adpanel_core::analysis::{AgeBand, CannibalisationWarning};
use adpanel_core::persona::{Gender, Tier};
use adpanel_core::policy::{CANNIBALISATION_THRESHOLD, whole_percent};

use super::{CreativeSummary, PersonaLookup};

/// Warnings for every unordered creative pair whose stopped sets overlap by
/// at least [`CANNIBALISATION_THRESHOLD`] percent of the smaller set.
pub(super) fn warnings(
    lookup: &PersonaLookup<'_>,
    creatives: &[CreativeSummary<'_>],
) -> Vec<CannibalisationWarning> {
    let stopped: Vec<HashSet<&str>> = creatives
        .iter()
        .map(|c| {
            c.reactions
                .iter()
                .filter(|r| r.stopped)
                .map(|r| r.persona_id.as_str())
                .collect()
        })
        .collect();

    let mut warnings = Vec::new();
    for i in 0..creatives.len() {
        for j in (i + 1)..creatives.len() {
            let smaller = stopped[i].len().min(stopped[j].len());
            let shared: Vec<&str> = stopped[i].intersection(&stopped[j]).copied().collect();
            // exact ratio; the rounded percentage is only reported
            if smaller == 0 || shared.len() * 100 < usize::from(CANNIBALISATION_THRESHOLD) * smaller {
                continue;
            }
            let Some(overlap) = whole_percent(shared.len(), smaller) else {
                continue;
            };

            let (a, b) = (&creatives[i], &creatives[j]);
            tracing::info!(
                "[CrossCreativeAnalyzer] Creatives {} and {} overlap {}%",
                a.label,
                b.label,
                overlap
            );
            warnings.push(warning(lookup, a, b, overlap, &shared));
        }
    }
    warnings
}

fn warning(
    lookup: &PersonaLookup<'_>,
    a: &CreativeSummary<'_>,
    b: &CreativeSummary<'_>,
    overlap: u8,
    shared: &[&str],
) -> CannibalisationWarning {
    let mut segments: BTreeMap<(u8, AgeBand), usize> = BTreeMap::new();
    let mut tiers: BTreeMap<Tier, usize> = BTreeMap::new();
    let shared: HashSet<&str> = shared.iter().copied().collect();

    for reaction in a.reactions.iter().filter(|r| shared.contains(r.persona_id.as_str())) {
        let Some(persona) = lookup.get(reaction) else {
            continue;
        };
        *tiers.entry(persona.tier).or_insert(0) += 1;
        let gender_rank = match persona.gender {
            Gender::Male => 0,
            Gender::Female => 1,
            Gender::Other => 2,
        };
        *segments
            .entry((gender_rank, AgeBand::of_age(persona.age)))
            .or_insert(0) += 1;
    }

    // highest count wins; ties go to the first key in order
    let top_segment = segments
        .iter()
        .fold(None::<(&(u8, AgeBand), usize)>, |best, (key, count)| match best {
            Some((_, best_count)) if best_count >= *count => best,
            _ => Some((key, *count)),
        })
        .map(|(key, _)| *key);
    let top_tier = tiers
        .iter()
        .fold(None::<(Tier, usize)>, |best, (tier, count)| match best {
            Some((_, best_count)) if best_count >= *count => best,
            _ => Some((*tier, *count)),
        })
        .map(|(tier, _)| tier);

    let detail = match (top_segment, top_tier) {
        (Some((gender_rank, band)), Some(tier)) => {
            let gender = [Gender::Male, Gender::Female, Gender::Other][usize::from(gender_rank)];
            format!(
                "Both creatives index highest with {} {} in the {} tier. Running both in the same ad set will result in audience overlap and inflated frequency.",
                band.range(),
                gender.plural(),
                tier.title()
            )
        }
        _ => "Both creatives stop largely the same personas. Running both in the same ad set will result in audience overlap and inflated frequency.".to_string(),
    };

    let (stronger, weaker) = if b.overall_score > a.overall_score {
        (b.label, a.label)
    } else {
        (a.label, b.label)
    };

    CannibalisationWarning {
        creatives: [a.label.to_string(), b.label.to_string()],
        overlap,
        detail,
        recommendation: format!(
            "Separate into different ad sets, or keep Creative {stronger} and test Creative {weaker} against a different angle."
        ),
    }
}
