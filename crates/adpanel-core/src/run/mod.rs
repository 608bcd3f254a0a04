//! Test run lifecycle.

mod state;

pub use state::{ProgressUpdate, RunState};
