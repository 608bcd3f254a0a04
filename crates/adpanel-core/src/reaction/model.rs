//! Reaction models.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::persona::{Persona, Tier};

/// What the persona did after seeing the creative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Clicked,
    #[serde(rename = "Scrolled past")]
    ScrolledPast,
    Saved,
    Shared,
    Screenshot,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Clicked => "Clicked",
            Action::ScrolledPast => "Scrolled past",
            Action::Saved => "Saved",
            Action::Shared => "Shared",
            Action::Screenshot => "Screenshot",
        }
    }

    /// Parses capability output, ignoring case and separators.
    pub fn parse_lenient(text: &str) -> Option<Action> {
        let normalized: String = text
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "clicked" | "click" => Some(Action::Clicked),
            "scrolledpast" | "scrolled" | "scroll" => Some(Action::ScrolledPast),
            "saved" | "save" => Some(Action::Saved),
            "shared" | "share" => Some(Action::Shared),
            "screenshot" | "screenshotted" => Some(Action::Screenshot),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unvalidated reaction fields as returned by the evaluation capability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReaction {
    #[serde(default)]
    pub stopped: bool,
    #[serde(default)]
    pub kept_watching: bool,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub overall_score: i64,
    #[serde(default)]
    pub first_impression: String,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub primary_objection: String,
    #[serde(default)]
    pub would_make_them_click: Option<String>,
}

/// One persona's validated reaction to one creative.
///
/// Invariants: `kept_watching` implies `stopped`, and `Clicked` implies
/// `stopped`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaReaction {
    pub persona_id: String,
    pub tier: Tier,
    /// Hook: the persona stopped scrolling
    pub stopped: bool,
    /// Hold: the persona kept engaging after stopping
    pub kept_watching: bool,
    pub action: Action,
    /// 0-100
    pub overall_score: u8,
    pub first_impression: String,
    pub reasoning: String,
    pub primary_objection: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub would_make_them_click: Option<String>,
    /// Set when the capability failed and safe defaults were recorded
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub degraded: bool,
}

impl PersonaReaction {
    /// Lowest-confidence reaction recorded when evaluation fails.
    pub fn degraded(persona: &Persona) -> Self {
        Self {
            persona_id: persona.id.clone(),
            tier: persona.tier,
            stopped: false,
            kept_watching: false,
            action: Action::ScrolledPast,
            overall_score: 0,
            first_impression: String::new(),
            reasoning: String::new(),
            primary_objection: String::new(),
            would_make_them_click: None,
            degraded: true,
        }
    }

    pub fn clicked(&self) -> bool {
        self.action == Action::Clicked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_wire_names() {
        assert_eq!(
            serde_json::to_string(&Action::ScrolledPast).unwrap(),
            "\"Scrolled past\""
        );
        let action: Action = serde_json::from_str("\"Screenshot\"").unwrap();
        assert_eq!(action, Action::Screenshot);
    }

    #[test]
    fn test_parse_lenient() {
        assert_eq!(Action::parse_lenient("scrolled past"), Some(Action::ScrolledPast));
        assert_eq!(Action::parse_lenient("Scrolled_Past"), Some(Action::ScrolledPast));
        assert_eq!(Action::parse_lenient(" CLICKED "), Some(Action::Clicked));
        assert_eq!(Action::parse_lenient("bought it"), None);
    }

    #[test]
    fn test_raw_reaction_tolerates_missing_fields() {
        let raw: RawReaction = serde_json::from_str(r#"{"stopped":true,"overallScore":140}"#).unwrap();
        assert!(raw.stopped);
        assert_eq!(raw.overall_score, 140);
        assert!(raw.action.is_empty());
    }
}
