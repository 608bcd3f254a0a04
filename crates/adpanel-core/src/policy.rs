//! Fixed policy constants.
//!
//! These values are identical for every brand context so that results from
//! different runs stay comparable. They are deliberately not configurable.

/// Number of personas in every panel.
pub const PANEL_SIZE: usize = 200;

/// Personas per tier, in tier order (bullseye, adjacent, skeptic, wildcard).
/// 30% / 30% / 20% / 20% of [`PANEL_SIZE`].
pub const TIER_QUOTAS: [usize; 4] = [60, 60, 40, 40];

/// Maximum number of creatives in one test run (labels A through E).
pub const MAX_CREATIVES: usize = 5;

/// Scores strictly above this are Launch-grade.
pub const LAUNCH_THRESHOLD: u8 = 65;

/// Scores strictly above this (and not above [`LAUNCH_THRESHOLD`]) are Refine-grade.
pub const REFINE_THRESHOLD: u8 = 50;

pub const LAUNCH_CONFIDENCE: u8 = 78;
pub const REFINE_CONFIDENCE: u8 = 62;
pub const DROP_CONFIDENCE: u8 = 45;

/// Minimum overlap percentage (of the smaller responding set) that triggers
/// a cannibalisation warning.
pub const CANNIBALISATION_THRESHOLD: u8 = 60;

/// Upper bound on cross-cutting pattern observations per run.
pub const MAX_PATTERNS: usize = 4;

/// Smallest demographic slice considered by pattern extraction.
pub const MIN_SLICE_SIZE: usize = 5;

/// Minimum bullseye-minus-skeptic gap reported as polarisation.
pub const POLARISATION_GAP: u8 = 25;

/// Share of responders above which a single gender counts as a skew.
pub const GENDER_SKEW_SHARE: u8 = 60;

/// Number of product description characters used for the brand key.
pub const BRAND_KEY_SOURCE_CHARS: usize = 40;

/// Video frame sample points in seconds.
pub const VIDEO_FRAME_TIMES: [f64; 4] = [0.0, 1.0, 3.0, 5.0];

/// Videos longer than this also get a near-end frame.
pub const VIDEO_END_FRAME_MIN_DURATION: f64 = 6.0;

/// Latest timestamp used for the near-end frame.
pub const VIDEO_END_FRAME_CAP: f64 = 8.0;

/// Score band shared by the verdict and the fatigue projection.
///
/// Both analyses map through this one function, so a Launch creative can
/// never be projected as narrow appeal and a Drop creative never as broad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ScoreBand {
    Low,
    Mid,
    High,
}

impl ScoreBand {
    pub fn of(score: u8) -> Self {
        if score > LAUNCH_THRESHOLD {
            ScoreBand::High
        } else if score > REFINE_THRESHOLD {
            ScoreBand::Mid
        } else {
            ScoreBand::Low
        }
    }
}

/// Rounds `numerator / denominator * 100` half-up to a whole percentage.
///
/// Returns `None` when the denominator is zero.
pub fn whole_percent(numerator: usize, denominator: usize) -> Option<u8> {
    if denominator == 0 {
        return None;
    }
    let scaled = (numerator as u64 * 200 + denominator as u64) / (denominator as u64 * 2);
    Some(scaled.min(100) as u8)
}

/// Rounds `numerator / denominator * 100` half-up to one decimal place.
///
/// Integer arithmetic keeps the result bit-identical across platforms.
pub fn tenth_percent(numerator: usize, denominator: usize) -> Option<f64> {
    if denominator == 0 {
        return None;
    }
    let tenths = (numerator as u64 * 2000 + denominator as u64) / (denominator as u64 * 2);
    Some(tenths.min(1000) as f64 / 10.0)
}

/// Rounds the mean of `sum / count` half-up to an integer score.
pub fn rounded_mean(sum: u64, count: usize) -> Option<u8> {
    if count == 0 {
        return None;
    }
    let mean = (sum * 2 + count as u64) / (count as u64 * 2);
    Some(mean.min(100) as u8)
}
