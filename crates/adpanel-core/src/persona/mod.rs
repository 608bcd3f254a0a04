//! Persona domain module.
//!
//! This module contains the synthetic panel models and the two external
//! collaborators the engine consumes them through.
//!
//! # Module Structure
//!
//! - `model`: Core persona models (`Persona`, `Tier`, `Gender`, `Panel`)
//! - `repository`: Cache store trait for panels keyed by brand
//! - `generator`: Panel generation capability trait

mod generator;
mod model;
mod repository;

// Re-export public API
pub use generator::PanelGenerator;
pub use model::{Gender, Panel, Persona, PersonaDescriptor, Tier};
pub use repository::PanelCache;
