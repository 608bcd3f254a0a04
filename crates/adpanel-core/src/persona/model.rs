//! Persona and panel models.
//!
//! A persona's tier is assigned once at generation time and never inferred
//! or changed afterwards.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::brand::BrandContext;

/// Audience segment, in order of decreasing fit with the target audience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Bullseye,
    Adjacent,
    Skeptic,
    Wildcard,
}

impl Tier {
    /// All tiers in panel order.
    pub const ALL: [Tier; 4] = [Tier::Bullseye, Tier::Adjacent, Tier::Skeptic, Tier::Wildcard];

    /// Position of this tier in [`Tier::ALL`].
    pub fn index(self) -> usize {
        match self {
            Tier::Bullseye => 0,
            Tier::Adjacent => 1,
            Tier::Skeptic => 2,
            Tier::Wildcard => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Bullseye => "bullseye",
            Tier::Adjacent => "adjacent",
            Tier::Skeptic => "skeptic",
            Tier::Wildcard => "wildcard",
        }
    }

    /// Capitalised name for report text ("Bullseye").
    pub fn title(self) -> &'static str {
        match self {
            Tier::Bullseye => "Bullseye",
            Tier::Adjacent => "Adjacent",
            Tier::Skeptic => "Skeptic",
            Tier::Wildcard => "Wildcard",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persona gender as reported by the generation capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(alias = "male", alias = "M")]
    Male,
    #[serde(alias = "female", alias = "F")]
    Female,
    /// Any gender outside the binary split
    #[serde(other)]
    Other,
}

impl Gender {
    /// Plural noun for report text.
    pub fn plural(self) -> &'static str {
        match self {
            Gender::Male => "males",
            Gender::Female => "females",
            Gender::Other => "non-binary personas",
        }
    }
}

/// A synthetic consumer on the panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Persona {
    /// Stable identifier within the panel
    pub id: String,
    pub name: String,
    pub age: u8,
    pub gender: Gender,
    pub location: String,
    pub occupation: String,
    /// Income bracket as text (e.g. "$75,000")
    pub income: String,
    pub education: String,
    pub backstory: String,
    pub tier: Tier,
}

/// Raw persona as returned by the generation capability.
///
/// The tier is a proposal; the panel provider enforces the fixed tier ratio
/// before the descriptor becomes a [`Persona`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaDescriptor {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub age: u8,
    pub gender: Gender,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub occupation: String,
    #[serde(default)]
    pub income: String,
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub backstory: String,
    #[serde(default)]
    pub tier: Option<Tier>,
}

impl PersonaDescriptor {
    /// Builds the persona with its final id and tier.
    pub fn into_persona(self, id: String, tier: Tier) -> Persona {
        Persona {
            id,
            name: self.name,
            age: self.age,
            gender: self.gender,
            location: self.location,
            occupation: self.occupation,
            income: self.income,
            education: self.education,
            backstory: self.backstory,
            tier,
        }
    }
}

/// An ordered, tiered persona panel for one brand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Panel {
    pub brand_key: String,
    pub brand: BrandContext,
    pub personas: Vec<Persona>,
    pub generated_at: DateTime<Utc>,
}

impl Panel {
    pub fn new(brand: BrandContext, personas: Vec<Persona>) -> Self {
        Self {
            brand_key: brand.cache_key(),
            brand,
            personas,
            generated_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.personas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }

    /// Number of personas per tier; tiers without members are absent.
    pub fn tier_counts(&self) -> BTreeMap<Tier, usize> {
        let mut counts = BTreeMap::new();
        for persona in &self.personas {
            *counts.entry(persona.tier).or_insert(0) += 1;
        }
        counts
    }

    pub fn persona(&self, id: &str) -> Option<&Persona> {
        self.personas.iter().find(|p| p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn persona(id: &str, tier: Tier) -> Persona {
        Persona {
            id: id.to_string(),
            name: "Sarah Chen".to_string(),
            age: 28,
            gender: Gender::Female,
            location: "Austin, TX".to_string(),
            occupation: "Nurse".to_string(),
            income: "$55,000".to_string(),
            education: "Bachelor's".to_string(),
            backstory: "Tried similar products before.".to_string(),
            tier,
        }
    }

    #[test]
    fn test_tier_serializes_lowercase() {
        let json = serde_json::to_string(&Tier::Bullseye).unwrap();
        assert_eq!(json, "\"bullseye\"");
        let tier: Tier = serde_json::from_str("\"wildcard\"").unwrap();
        assert_eq!(tier, Tier::Wildcard);
    }

    #[test]
    fn test_gender_accepts_variants() {
        let g: Gender = serde_json::from_str("\"male\"").unwrap();
        assert_eq!(g, Gender::Male);
        let g: Gender = serde_json::from_str("\"Female\"").unwrap();
        assert_eq!(g, Gender::Female);
        let g: Gender = serde_json::from_str("\"Non-binary\"").unwrap();
        assert_eq!(g, Gender::Other);
    }

    #[test]
    fn test_tier_counts_omit_empty_tiers() {
        let brand = BrandContext::new("Widget", "", "", "us");
        let panel = Panel::new(
            brand,
            vec![persona("p1", Tier::Bullseye), persona("p2", Tier::Skeptic)],
        );
        let counts = panel.tier_counts();
        assert_eq!(counts.get(&Tier::Bullseye), Some(&1));
        assert_eq!(counts.get(&Tier::Skeptic), Some(&1));
        assert!(!counts.contains_key(&Tier::Adjacent));
        assert_eq!(panel.brand_key, "widget");
    }
}
