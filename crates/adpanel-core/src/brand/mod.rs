//! Brand context domain module.
//!
//! The brand context is supplied once per test run and never mutated. It also
//! derives the key under which a generated persona panel is cached.

mod model;

pub use model::{BrandContext, brand_display_name, brand_key};
