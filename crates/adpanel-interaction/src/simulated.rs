//! Seeded offline capabilities.
//!
//! Produce a plausible panel and plausible reactions without any network
//! access. Output depends only on the seed and the inputs, so repeated runs
//! give identical bundles.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use adpanel_core::brand::BrandContext;
use adpanel_core::creative::Creative;
use adpanel_core::error::{PanelError, Result};
use adpanel_core::persona::{Gender, PanelGenerator, Persona, PersonaDescriptor, Tier};
use adpanel_core::policy::{PANEL_SIZE, TIER_QUOTAS};
use adpanel_core::reaction::{Action, RawReaction, ReactionEvaluator};

const NAMES: [&str; 30] = [
    "Sarah Chen", "Marcus Williams", "Emma Rodriguez", "James O'Brien", "Priya Patel",
    "David Kim", "Lisa Thompson", "Omar Hassan", "Rachel Green", "Michael Torres",
    "Aisha Johnson", "Kevin Zhao", "Diane Foster", "Carlos Mendez", "Nina Volkov",
    "Robert Singh", "Michelle Park", "Anthony Brown", "Samira Ali", "Jake Wilson",
    "Laura Martinez", "Chris Adams", "Fatima Nguyen", "Tyler Reed", "Hannah Schmidt",
    "Derek Washington", "Yuki Tanaka", "Brian Murphy", "Zara Khan", "Greg Patterson",
];

const OCCUPATIONS: [&str; 15] = [
    "Product Manager", "Nurse", "Software Engineer", "Teacher", "Marketing Director",
    "Freelance Designer", "Accountant", "Personal Trainer", "Sales Executive",
    "Stay-at-home Parent", "Retired", "Student", "Small Business Owner", "HR Manager", "Lawyer",
];

const LOCATIONS: [&str; 15] = [
    "Austin, TX", "Chicago, IL", "Miami, FL", "Boston, MA", "San Francisco, CA",
    "Seattle, WA", "Denver, CO", "New York, NY", "Portland, OR", "Phoenix, AZ",
    "Atlanta, GA", "Los Angeles, CA", "Nashville, TN", "Houston, TX", "Brooklyn, NY",
];

const INCOMES: [&str; 6] = ["$35,000", "$55,000", "$75,000", "$95,000", "$120,000", "$150,000"];

const EDUCATION: [&str; 5] = ["High school", "Associate's", "Bachelor's", "Master's", "PhD"];

const BACKSTORIES: [&str; 4] = [
    "Has tried similar products before with mixed results. Currently looking for something that actually delivers.",
    "Busy schedule, buys on recommendation from friends more than from ads.",
    "Researches every purchase and reads reviews before committing.",
    "Impulse buyer when something feels made for them, skeptical of big claims.",
];

const IMPRESSIONS: [&str; 10] = [
    "This speaks directly to my frustration with my current routine.",
    "Interesting angle but I'm not sure it applies to me.",
    "Feels like every other ad I see on Instagram.",
    "The headline grabbed me but the body copy lost me.",
    "This is exactly what I've been looking for.",
    "Too aggressive. I don't trust brands that use fear.",
    "I'd want to see reviews before clicking.",
    "The visual style caught my eye more than the copy.",
    "Reminds me of a product I already use and love.",
    "I'd share this with my partner, we've talked about this.",
];

const OBJECTIONS: [&str; 5] = [
    "Price seems high without proof it works",
    "No social proof or reviews visible",
    "I've seen similar claims that didn't deliver",
    "Not sure this is for my specific situation",
    "The tone feels too salesy",
];

const REASONING: &str = "The headline creates curiosity but the body copy doesn't resolve the tension quickly enough. The CTA feels generic compared to the promise in the hook.";

const CLICK_TRIGGER: &str = "A specific before/after result from someone like me, or a free trial to reduce risk.";

/// FNV-1a over the given parts, folded into `seed`.
///
/// `std`'s default hasher is not guaranteed stable across releases, so the
/// per-call seeds are derived here.
fn derive_seed(seed: u64, parts: &[&str]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    let mut hash = OFFSET ^ seed;
    for part in parts {
        for byte in part.bytes().chain(std::iter::once(0xff)) {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(PRIME);
        }
    }
    hash
}

fn pick<'a>(rng: &mut StdRng, pool: &[&'a str]) -> &'a str {
    pool.choose(rng).copied().unwrap_or_default()
}

/// Splits `count` across tiers by the fixed quota ratio.
///
/// Rounding remainder goes to bullseye.
fn tier_allocation(count: usize) -> [usize; 4] {
    let mut allocation = TIER_QUOTAS.map(|quota| quota * count / PANEL_SIZE);
    let assigned: usize = allocation.iter().sum();
    allocation[0] += count - assigned;
    allocation
}

/// Offline panel generator.
pub struct SimulatedPanelGenerator {
    seed: u64,
}

impl SimulatedPanelGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    fn descriptor(rng: &mut StdRng, index: usize, tier: Tier) -> PersonaDescriptor {
        let base = NAMES[index % NAMES.len()];
        let name = if index >= NAMES.len() {
            format!("{} {}", base, index / NAMES.len() + 1)
        } else {
            base.to_string()
        };
        let age = match tier {
            Tier::Wildcard => rng.gen_range(18..=64),
            _ => rng.gen_range(22..=56),
        };
        let gender = if rng.gen_bool(0.5) { Gender::Male } else { Gender::Female };

        PersonaDescriptor {
            id: Some(format!("sim-{:03}", index)),
            name,
            age,
            gender,
            location: LOCATIONS[index % LOCATIONS.len()].to_string(),
            occupation: OCCUPATIONS[index % OCCUPATIONS.len()].to_string(),
            income: pick(rng, &INCOMES).to_string(),
            education: pick(rng, &EDUCATION).to_string(),
            backstory: pick(rng, &BACKSTORIES).to_string(),
            tier: Some(tier),
        }
    }
}

#[async_trait::async_trait]
impl PanelGenerator for SimulatedPanelGenerator {
    async fn generate(&self, brand: &BrandContext, count: usize) -> Result<Vec<PersonaDescriptor>> {
        if count == 0 {
            return Err(PanelError::panel_generation("requested an empty panel"));
        }

        let mut rng = StdRng::seed_from_u64(derive_seed(self.seed, &[brand.cache_key().as_str()]));
        let mut personas = Vec::with_capacity(count);
        for (tier, quota) in Tier::ALL.into_iter().zip(tier_allocation(count)) {
            for _ in 0..quota {
                let index = personas.len();
                personas.push(Self::descriptor(&mut rng, index, tier));
            }
        }

        tracing::debug!(
            "[SimulatedPanelGenerator] Generated {} personas for '{}'",
            personas.len(),
            brand.display_name()
        );
        Ok(personas)
    }
}

/// Offline reaction evaluator.
///
/// The score band depends on the persona's tier; engagement follows from the
/// score.
pub struct SimulatedEvaluator {
    seed: u64,
}

impl SimulatedEvaluator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    fn score(rng: &mut StdRng, tier: Tier) -> i64 {
        match tier {
            Tier::Bullseye => rng.gen_range(55..95),
            Tier::Adjacent => rng.gen_range(40..80),
            Tier::Skeptic => rng.gen_range(15..50),
            Tier::Wildcard => rng.gen_range(25..75),
        }
    }
}

#[async_trait::async_trait]
impl ReactionEvaluator for SimulatedEvaluator {
    async fn evaluate(
        &self,
        persona: &Persona,
        creative: &Creative,
        brand: &BrandContext,
    ) -> Result<RawReaction> {
        let seed = derive_seed(self.seed, &[brand.cache_key().as_str(), persona.id.as_str(), creative.label.as_str()]);
        let mut rng = StdRng::seed_from_u64(seed);

        let score = Self::score(&mut rng, persona.tier);
        let stopped = score > 40 || rng.gen_bool(0.6);
        let kept_watching = stopped && (score > 55 || rng.gen_bool(0.5));
        let action = if score > 70 {
            Action::Clicked
        } else if score > 55 && rng.gen_bool(0.5) {
            Action::Saved
        } else {
            Action::ScrolledPast
        };

        Ok(RawReaction {
            stopped,
            kept_watching,
            action: action.as_str().to_string(),
            overall_score: score,
            first_impression: pick(&mut rng, &IMPRESSIONS).to_string(),
            reasoning: REASONING.to_string(),
            primary_objection: pick(&mut rng, &OBJECTIONS).to_string(),
            would_make_them_click: Some(CLICK_TRIGGER.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brand() -> BrandContext {
        BrandContext::new("Premium body composition supplement", "25-55, active adults", "$89/month", "us")
    }

    fn creative(label: &str) -> Creative {
        Creative {
            label: label.to_string(),
            headline: "Your muscles are disappearing.".to_string(),
            body: String::new(),
            cta: String::new(),
            media: None,
        }
    }

    #[test]
    fn test_tier_allocation() {
        assert_eq!(tier_allocation(200), [60, 60, 40, 40]);
        assert_eq!(tier_allocation(10), [3, 3, 2, 2]);
        assert_eq!(tier_allocation(7).iter().sum::<usize>(), 7);
    }

    #[tokio::test]
    async fn test_generates_full_tiered_panel() {
        let generator = SimulatedPanelGenerator::new(42);
        let personas = generator.generate(&brand(), PANEL_SIZE).await.unwrap();

        assert_eq!(personas.len(), PANEL_SIZE);
        let bullseye = personas.iter().filter(|p| p.tier == Some(Tier::Bullseye)).count();
        let skeptic = personas.iter().filter(|p| p.tier == Some(Tier::Skeptic)).count();
        assert_eq!((bullseye, skeptic), (60, 40));
        assert!(personas.iter().all(|p| (18..=64).contains(&p.age)));
        assert_eq!(personas[30].name, "Sarah Chen 2");
    }

    #[tokio::test]
    async fn test_generation_is_deterministic_per_seed() {
        let first = SimulatedPanelGenerator::new(7).generate(&brand(), 20).await.unwrap();
        let second = SimulatedPanelGenerator::new(7).generate(&brand(), 20).await.unwrap();
        let other = SimulatedPanelGenerator::new(8).generate(&brand(), 20).await.unwrap();

        assert_eq!(first, second);
        assert_ne!(first, other);
    }

    #[tokio::test]
    async fn test_reactions_respect_tier_bands() {
        let generator = SimulatedPanelGenerator::new(42);
        let evaluator = SimulatedEvaluator::new(42);
        let personas = generator.generate(&brand(), PANEL_SIZE).await.unwrap();

        for (index, descriptor) in personas.into_iter().enumerate() {
            let tier = descriptor.tier.unwrap();
            let persona = descriptor.into_persona(format!("p{}", index), tier);
            let raw = evaluator.evaluate(&persona, &creative("A"), &brand()).await.unwrap();

            let band = match tier {
                Tier::Bullseye => 55..95,
                Tier::Adjacent => 40..80,
                Tier::Skeptic => 15..50,
                Tier::Wildcard => 25..75,
            };
            assert!(band.contains(&raw.overall_score));
            assert!(!raw.kept_watching || raw.stopped);
            if raw.action == "Clicked" {
                assert!(raw.overall_score > 70 && raw.stopped);
            }
        }
    }

    #[tokio::test]
    async fn test_evaluation_is_deterministic_per_creative() {
        let evaluator = SimulatedEvaluator::new(42);
        let persona = PersonaDescriptor {
            id: None,
            name: "Sarah Chen".to_string(),
            age: 34,
            gender: Gender::Female,
            location: String::new(),
            occupation: String::new(),
            income: String::new(),
            education: String::new(),
            backstory: String::new(),
            tier: None,
        }
        .into_persona("p1".to_string(), Tier::Adjacent);

        let a1 = evaluator.evaluate(&persona, &creative("A"), &brand()).await.unwrap();
        let a2 = evaluator.evaluate(&persona, &creative("A"), &brand()).await.unwrap();
        assert_eq!(a1, a2);
    }
}
