//! Lesson documents and their compiled cues.
//!
//! A lesson is a JSON document with a title and an ordered list of
//! paragraphs. Each paragraph carries its markup, an optional narration clip,
//! optional review timing (waiting/analyzing indicators shown after the clip
//! ends) and the delay before the following paragraph starts.

use crate::audio::ClipId;
use crate::markup::{self, Segment};
use crate::timeline::constants::{
    DEFAULT_NEXT_DELAY_SECS, MAX_STEP_SECS, P1_ANALYZING_SECS, P1_NEXT_DELAY_SECS,
    P1_WAITING_SECS, P2_NEXT_DELAY_SECS, P3_ANALYZING_SECS, P3_NEXT_DELAY_SECS, P3_WAITING_SECS,
};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::info;
use unicode_normalization::UnicodeNormalization;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LessonScript {
    pub title: String,
    pub paragraphs: Vec<ParagraphSource>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ParagraphKind {
    #[default]
    Narration,
    Feedback,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ParagraphSource {
    #[serde(default)]
    pub kind: ParagraphKind,
    pub text: String,
    #[serde(default)]
    pub clip: Option<String>,
    #[serde(default)]
    pub review: Option<ReviewTiming>,
    #[serde(default = "default_next_delay_secs")]
    pub next_delay_secs: f32,
}

/// Indicator durations shown after a paragraph's narration ends.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct ReviewTiming {
    pub waiting_secs: f32,
    pub analyzing_secs: f32,
}

fn default_next_delay_secs() -> f32 {
    DEFAULT_NEXT_DELAY_SECS
}

/// A paragraph ready for the timeline: parsed segments and resolved timings.
#[derive(Debug, Clone)]
pub struct Cue {
    pub kind: ParagraphKind,
    pub segments: Vec<Segment>,
    pub total_len: usize,
    pub clip: Option<ClipId>,
    pub review: Option<(Duration, Duration)>,
    pub next_delay: Duration,
}

impl LessonScript {
    /// The four-paragraph practice lesson shipped with the app.
    pub fn builtin() -> Self {
        LessonScript {
            title: "Adding fractions".to_string(),
            paragraphs: vec![
                ParagraphSource {
                    kind: ParagraphKind::Narration,
                    text: "Fractions with the same bottom number are easy to add.*new line*Try this one on the canvas:*new line*bold{1/4 + 2/4 = ?}".to_string(),
                    clip: Some("lesson1_p1".to_string()),
                    review: Some(ReviewTiming {
                        waiting_secs: P1_WAITING_SECS,
                        analyzing_secs: P1_ANALYZING_SECS,
                    }),
                    next_delay_secs: P1_NEXT_DELAY_SECS,
                },
                ParagraphSource {
                    kind: ParagraphKind::Feedback,
                    text: "Nice work. You kept the bottom number and added the tops, so the answer is 3/4.".to_string(),
                    clip: Some("lesson1_p2".to_string()),
                    review: None,
                    next_delay_secs: P2_NEXT_DELAY_SECS,
                },
                ParagraphSource {
                    kind: ParagraphKind::Narration,
                    text: "When the bottom numbers differ, make them match first.*new line*Now try:*new line*bold{1/2 + 1/4 = ?}".to_string(),
                    clip: Some("lesson1_p3".to_string()),
                    review: Some(ReviewTiming {
                        waiting_secs: P3_WAITING_SECS,
                        analyzing_secs: P3_ANALYZING_SECS,
                    }),
                    next_delay_secs: P3_NEXT_DELAY_SECS,
                },
                ParagraphSource {
                    kind: ParagraphKind::Feedback,
                    text: "Exactly right. 1/2 is 2/4, and 2/4 + 1/4 is bold{3/4}.".to_string(),
                    clip: Some("lesson1_p4".to_string()),
                    review: None,
                    next_delay_secs: DEFAULT_NEXT_DELAY_SECS,
                },
            ],
        }
    }

    pub fn from_json(data: &str) -> Result<Self> {
        let script: LessonScript =
            serde_json::from_str(data).context("Parsing lesson document")?;
        script.validate()?;
        Ok(script)
    }

    pub fn validate(&self) -> Result<()> {
        if self.paragraphs.is_empty() {
            bail!("Lesson '{}' has no paragraphs", self.title);
        }
        for (idx, paragraph) in self.paragraphs.iter().enumerate() {
            check_secs(idx, "next_delay_secs", paragraph.next_delay_secs)?;
            if let Some(review) = paragraph.review {
                check_secs(idx, "waiting_secs", review.waiting_secs)?;
                check_secs(idx, "analyzing_secs", review.analyzing_secs)?;
            }
        }
        Ok(())
    }

    /// Parse markup and resolve timings for every paragraph.
    pub fn compile(&self) -> Vec<Cue> {
        self.paragraphs
            .iter()
            .map(|paragraph| {
                let text: String = paragraph.text.nfc().collect();
                let segments = markup::parse(&text);
                let total_len = markup::total_length(&segments);
                Cue {
                    kind: paragraph.kind,
                    segments,
                    total_len,
                    clip: paragraph.clip.as_deref().map(ClipId::from),
                    review: paragraph.review.map(|review| {
                        (
                            secs(review.waiting_secs),
                            secs(review.analyzing_secs),
                        )
                    }),
                    next_delay: secs(paragraph.next_delay_secs),
                }
            })
            .collect()
    }
}

/// Load and validate a lesson document from disk.
pub fn load_script(path: &Path) -> Result<LessonScript> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Reading lesson file {}", path.display()))?;
    let script = LessonScript::from_json(&data)
        .with_context(|| format!("Loading lesson {}", path.display()))?;
    info!(
        path = %path.display(),
        title = %script.title,
        paragraphs = script.paragraphs.len(),
        "Loaded lesson"
    );
    Ok(script)
}

fn check_secs(idx: usize, field: &str, value: f32) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        bail!("Paragraph {idx} has invalid {field}: {value}");
    }
    if value > MAX_STEP_SECS {
        bail!("Paragraph {idx} has {field} {value} above the {MAX_STEP_SECS}s limit");
    }
    Ok(())
}

fn secs(value: f32) -> Duration {
    if value.is_finite() && value > 0.0 {
        Duration::from_secs_f32(value.min(MAX_STEP_SECS))
    } else {
        Duration::ZERO
    }
}
