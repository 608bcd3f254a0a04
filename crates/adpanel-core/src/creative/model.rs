//! Creative models.

use serde::{Deserialize, Serialize};

use crate::error::{PanelError, Result};
use crate::policy::{
    MAX_CREATIVES, VIDEO_END_FRAME_CAP, VIDEO_END_FRAME_MIN_DURATION, VIDEO_FRAME_TIMES,
};

/// Opaque media attached to a creative.
///
/// The engine never decodes these payloads; they are forwarded as-is to the
/// reaction evaluation capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MediaDescriptor {
    /// A single encoded still image
    #[serde(rename_all = "camelCase")]
    Image {
        base64: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mime_type: Option<String>,
    },
    /// Ordered encoded frames sampled from a video
    Video { frames: Vec<String> },
}

impl MediaDescriptor {
    /// Whether the descriptor actually carries any payload.
    pub fn has_content(&self) -> bool {
        match self {
            MediaDescriptor::Image { base64, .. } => !base64.is_empty(),
            MediaDescriptor::Video { frames } => frames.iter().any(|f| !f.is_empty()),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            MediaDescriptor::Image { .. } => "image",
            MediaDescriptor::Video { .. } => "video",
        }
    }
}

/// Timestamps (seconds) at which frames are sampled from a video.
///
/// Fixed points are kept while they fall inside the video; videos longer
/// than six seconds also get one frame near the end.
pub fn video_frame_schedule(duration_secs: f64) -> Vec<f64> {
    let mut times: Vec<f64> = VIDEO_FRAME_TIMES
        .iter()
        .copied()
        .take_while(|t| *t <= duration_secs)
        .collect();

    if duration_secs > VIDEO_END_FRAME_MIN_DURATION {
        times.push((duration_secs - 0.5).min(VIDEO_END_FRAME_CAP));
    }

    times
}

/// Creative as entered by the caller, before labelling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreativeDraft {
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub cta: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaDescriptor>,
}

/// A labelled creative under test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creative {
    /// Positional label ("A" through "E")
    pub label: String,
    pub headline: String,
    pub body: String,
    pub cta: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaDescriptor>,
}

impl Creative {
    /// Label for the creative at `index` (0 → "A").
    pub fn label_for(index: usize) -> String {
        char::from(b'A' + index as u8).to_string()
    }

    /// Headline for display, with a placeholder when empty.
    pub fn display_headline(&self) -> &str {
        if self.headline.is_empty() {
            "(no headline)"
        } else {
            &self.headline
        }
    }

    pub fn has_media(&self) -> bool {
        self.media.as_ref().is_some_and(MediaDescriptor::has_content)
    }
}

/// Labels and validates the creative set for a run.
///
/// Rejects an empty set, more than [`MAX_CREATIVES`] creatives, and any
/// creative without a headline, body copy, or media.
pub fn prepare_creatives(drafts: Vec<CreativeDraft>) -> Result<Vec<Creative>> {
    if drafts.is_empty() {
        return Err(PanelError::validation("At least one creative is required."));
    }
    if drafts.len() > MAX_CREATIVES {
        return Err(PanelError::validation(format!(
            "At most {} creatives can be tested at once ({} given).",
            MAX_CREATIVES,
            drafts.len()
        )));
    }

    drafts
        .into_iter()
        .enumerate()
        .map(|(index, draft)| {
            let creative = Creative {
                label: Creative::label_for(index),
                headline: draft.headline.trim().to_string(),
                body: draft.body.trim().to_string(),
                cta: draft.cta.trim().to_string(),
                media: draft.media,
            };
            if creative.headline.is_empty() && creative.body.is_empty() && !creative.has_media() {
                return Err(PanelError::validation(format!(
                    "Creative {}: add a headline, body copy, or upload a creative asset.",
                    creative.label
                )));
            }
            Ok(creative)
        })
        .collect()
}
