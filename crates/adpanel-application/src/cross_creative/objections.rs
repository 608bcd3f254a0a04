use adpanel_core::analysis::{ObjectionCategory, ObjectionFrequency};
use adpanel_core::policy::whole_percent;
use adpanel_core::reaction::PersonaReaction;

/// Lowercase keywords per category, in tie-break order.
const KEYWORDS: [(ObjectionCategory, &[&str]); 6] = [
    (
        ObjectionCategory::Price,
        &[
            "price", "pricey", "expensive", "cost", "afford", "money", "cheap", "worth", "value",
            "$",
        ],
    ),
    (
        ObjectionCategory::SocialProof,
        &[
            "review", "testimonial", "social proof", "rating", "stars", "who else", "nobody i know",
            "other people", "customers",
        ],
    ),
    (
        ObjectionCategory::Credibility,
        &[
            "claim", "believe", "trust", "scam", "skeptic", "too good", "gimmick", "didn't deliver",
            "legit", "evidence", "science", "proof it works",
        ],
    ),
    (
        ObjectionCategory::Relevance,
        &[
            "for me", "for my", "situation", "specific", "relevant", "not for", "apply to",
            "my needs", "my life", "don't need", "not my",
        ],
    ),
    (
        ObjectionCategory::Tone,
        &[
            "salesy", "pushy", "aggressive", "tone", "cringe", "loud", "desperate", "clickbait",
            "hype", "fake",
        ],
    ),
    (
        ObjectionCategory::UnclearCta,
        &[
            "cta", "call to action", "what happens next", "next step", "unclear", "confusing",
            "button", "sign up", "what to do",
        ],
    ),
];

/// Buckets a free-text objection into the canonical taxonomy.
///
/// The category with the most keyword hits wins, ties go to the earlier
/// category, and text with no hits is [`ObjectionCategory::Other`].
pub fn classify_objection(text: &str) -> ObjectionCategory {
    let text = text.to_lowercase();
    let mut best = (ObjectionCategory::Other, 0usize);
    for (category, keywords) in KEYWORDS {
        let hits = keywords.iter().filter(|k| starts_word(&text, k)).count();
        if hits > best.1 {
            best = (category, hits);
        }
    }
    best.0
}

/// Whether `keyword` occurs in `text` at the start of a word.
fn starts_word(text: &str, keyword: &str) -> bool {
    text.match_indices(keyword).any(|(i, _)| {
        text[..i]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric())
    })
}

/// Category of a reaction's objection, if it has one worth counting.
///
/// Degraded reactions and empty objections are excluded.
pub(crate) fn reaction_objection(reaction: &PersonaReaction) -> Option<ObjectionCategory> {
    if reaction.degraded || reaction.primary_objection.trim().is_empty() {
        return None;
    }
    Some(classify_objection(&reaction.primary_objection))
}

/// Objection frequency table over every counted objection.
///
/// Frequencies are whole percentages of all counted objections, sorted by
/// count descending then category order. Categories with no hits are omitted.
pub fn objection_table<'a>(
    reactions: impl IntoIterator<Item = &'a PersonaReaction>,
) -> Vec<ObjectionFrequency> {
    let mut counts = [0usize; 7];
    for category in reactions.into_iter().filter_map(reaction_objection) {
        counts[category_index(category)] += 1;
    }
    let total: usize = counts.iter().sum();

    let mut table: Vec<ObjectionFrequency> = ObjectionCategory::ALL
        .iter()
        .filter(|c| counts[category_index(**c)] > 0)
        .map(|c| {
            let count = counts[category_index(*c)];
            ObjectionFrequency {
                objection: c.label().to_string(),
                category: *c,
                frequency: whole_percent(count, total).unwrap_or(0),
                count,
            }
        })
        .collect();
    // stable sort keeps category order among equal counts
    table.sort_by(|a, b| b.count.cmp(&a.count));
    table
}

/// Suggested angle for a segment dominated by one objection.
pub fn remedy(category: ObjectionCategory) -> &'static str {
    match category {
        ObjectionCategory::Price => "a value-justification angle",
        ObjectionCategory::SocialProof => "leading with reviews or customer numbers",
        ObjectionCategory::Credibility => "leading with evidence rather than claims",
        ObjectionCategory::Relevance => "speaking directly to their situation",
        ObjectionCategory::Tone => "a softer, more informative tone",
        ObjectionCategory::UnclearCta => "a CTA that says what happens next",
        ObjectionCategory::Other => "follow-up research",
    }
}

fn category_index(category: ObjectionCategory) -> usize {
    ObjectionCategory::ALL
        .iter()
        .position(|c| *c == category)
        .unwrap_or(ObjectionCategory::ALL.len() - 1)
}
