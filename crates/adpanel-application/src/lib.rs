//! Application layer for ADPANEL.
//!
//! This crate drives a test run end to end: it acquires the persona panel,
//! collects reactions through the injected capabilities, and reduces them
//! into creative-level and cross-creative insights.

pub mod audience;
pub mod cross_creative;
pub mod metrics_reducer;
pub mod orchestrator;
pub mod panel_provider;
pub mod reaction_collector;
pub mod recommendation;

pub use audience::AudienceAnalyzer;
pub use cross_creative::{CreativeSummary, CrossCreativeAnalyzer, CrossCreativeReport};
pub use metrics_reducer::{ReactionTally, reduce};
pub use orchestrator::{TestOrchestrator, TestRequest};
pub use panel_provider::{AcquiredPanel, PanelProvider};
pub use reaction_collector::ReactionCollector;
pub use recommendation::RecommendationEngine;
