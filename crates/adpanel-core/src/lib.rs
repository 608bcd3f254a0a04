//! Domain layer for ADPANEL.
//!
//! Models, policy constants, the error taxonomy and the capability traits
//! through which the engine talks to its external collaborators.

pub mod analysis;
pub mod brand;
pub mod bundle;
pub mod config;
pub mod creative;
pub mod error;
pub mod persona;
pub mod policy;
pub mod reaction;
pub mod run;

// Re-export common error type
pub use error::{PanelError, Result};
