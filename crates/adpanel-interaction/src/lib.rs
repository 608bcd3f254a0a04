//! Capability implementations for ADPANEL.
//!
//! - `worker_api`: HTTP client for the remote persona worker
//! - `simulated`: seeded offline generator and evaluator

pub mod simulated;
pub mod worker_api;

pub use simulated::{SimulatedEvaluator, SimulatedPanelGenerator};
pub use worker_api::WorkerApiClient;
