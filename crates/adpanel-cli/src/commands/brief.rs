//! Test brief files.
//!
//! A brief is a TOML document with one `[brand]` table and up to five
//! `[[creatives]]`. Media is referenced by file path relative to the brief
//! and base64-encoded on load.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use adpanel_application::TestRequest;
use adpanel_core::brand::BrandContext;
use adpanel_core::creative::{CreativeDraft, MediaDescriptor};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brief {
    pub brand: BrandContext,
    #[serde(default)]
    pub creatives: Vec<CreativeBrief>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreativeBrief {
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub cta: String,
    /// Still image file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<PathBuf>,
    /// Pre-extracted video frames, in playback order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub video_frames: Vec<PathBuf>,
}

impl Brief {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read brief {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid brief {}", path.display()))
    }

    /// Resolves media against `base_dir` and builds the run request.
    pub fn into_request(self, base_dir: &Path) -> Result<TestRequest> {
        let creatives = self
            .creatives
            .into_iter()
            .enumerate()
            .map(|(index, creative)| {
                creative
                    .into_draft(base_dir)
                    .with_context(|| format!("Creative #{}", index + 1))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(TestRequest {
            brand: self.brand,
            creatives,
        })
    }

    /// The two-creative supplement brief used for demos.
    pub fn demo() -> Self {
        Self {
            brand: BrandContext::new(
                "Premium body composition supplement. Helps maintain muscle during fat loss. $89 for 30-day supply. Subscription model. Targets health-conscious adults who exercise regularly and want to optimise body composition, not just lose weight.",
                "25-55, active adults, gym-goers, health-conscious",
                "$89/month",
                "us",
            ),
            creatives: vec![
                CreativeBrief {
                    headline: "Your muscles are disappearing. And you don't even know it.".to_string(),
                    body: "Every year after 30, you lose 3-5% of your muscle mass. Dieting makes it worse. Most \"weight loss\" is actually muscle loss disguised as progress on the scale. Your body is cannibalising its own engine. This supplement preserves lean muscle while your body burns fat, so the weight you lose stays lost.".to_string(),
                    cta: "Protect Your Muscle".to_string(),
                    ..Default::default()
                },
                CreativeBrief {
                    headline: "You're doing everything right. So why doesn't your body show it?".to_string(),
                    body: "You eat well. You watch the scale. You do the work. But the mirror tells a different story. The number goes down but nothing changes. Here's what nobody told you: most diets burn muscle, not fat. You're shrinking, not transforming. This changes that. Preserve what matters. Lose what doesn't.".to_string(),
                    cta: "See How It Works".to_string(),
                    ..Default::default()
                },
            ],
        }
    }
}

impl CreativeBrief {
    fn into_draft(self, base_dir: &Path) -> Result<CreativeDraft> {
        let media = match (self.image, self.video_frames.is_empty()) {
            (Some(_), false) => bail!("set either `image` or `video_frames`, not both"),
            (Some(image), true) => {
                let path = base_dir.join(image);
                Some(MediaDescriptor::Image {
                    base64: encode_file(&path)?,
                    mime_type: Some(mime_guess::from_path(&path).first_or_octet_stream().to_string()),
                })
            }
            (None, false) => Some(MediaDescriptor::Video {
                frames: self
                    .video_frames
                    .iter()
                    .map(|frame| encode_file(&base_dir.join(frame)))
                    .collect::<Result<Vec<_>>>()?,
            }),
            (None, true) => None,
        };

        Ok(CreativeDraft {
            headline: self.headline,
            body: self.body,
            cta: self.cta,
            media,
        })
    }
}

fn encode_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read media {}", path.display()))?;
    Ok(STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_demo_brief_round_trips_through_toml() {
        let text = toml::to_string_pretty(&Brief::demo()).unwrap();
        let parsed: Brief = toml::from_str(&text).unwrap();

        assert_eq!(parsed.creatives.len(), 2);
        assert_eq!(parsed.brand.price, "$89/month");
        assert!(parsed.creatives[0].image.is_none());
    }

    #[test]
    fn test_image_is_encoded_relative_to_brief() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("hero.png"), b"png-bytes").unwrap();

        let brief: Brief = toml::from_str(
            r#"
[brand]
product = "Trail running shoes"

[[creatives]]
headline = "Grip that holds"
image = "hero.png"
"#,
        )
        .unwrap();
        let request = brief.into_request(temp_dir.path()).unwrap();

        assert_eq!(request.brand.market, "us");
        match request.creatives[0].media.as_ref().unwrap() {
            MediaDescriptor::Image { base64, mime_type } => {
                assert_eq!(base64, &STANDARD.encode(b"png-bytes"));
                assert_eq!(mime_type.as_deref(), Some("image/png"));
            }
            other => panic!("Expected image, got {:?}", other),
        }
    }

    #[test]
    fn test_video_frames_keep_order() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("f0.jpg"), b"zero").unwrap();
        fs::write(temp_dir.path().join("f1.jpg"), b"one").unwrap();

        let creative = CreativeBrief {
            video_frames: vec!["f0.jpg".into(), "f1.jpg".into()],
            ..Default::default()
        };
        let draft = creative.into_draft(temp_dir.path()).unwrap();

        assert_eq!(
            draft.media,
            Some(MediaDescriptor::Video {
                frames: vec![STANDARD.encode(b"zero"), STANDARD.encode(b"one")],
            })
        );
    }

    #[test]
    fn test_missing_media_and_mixed_media_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let missing = CreativeBrief {
            image: Some("nope.png".into()),
            ..Default::default()
        };
        assert!(missing.into_draft(temp_dir.path()).is_err());

        let mixed = CreativeBrief {
            image: Some("a.png".into()),
            video_frames: vec!["b.jpg".into()],
            ..Default::default()
        };
        let err = mixed.into_draft(temp_dir.path()).unwrap_err();
        assert!(err.to_string().contains("not both"));
    }
}
