//! Creative domain module.
//!
//! Creatives are labelled by position (A, B, C, ...) and validated before a
//! test run spends any capability calls on them.

mod model;

pub use model::{Creative, CreativeDraft, MediaDescriptor, prepare_creatives, video_frame_schedule};
