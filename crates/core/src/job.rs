//! Generation job kinds and their payloads.
//!
//! The synthesis backend accepts free-form parameters; on our side each job
//! kind is a closed variant with its own required-field set, validated before
//! dispatch. Silent backend-side defaulting becomes an explicit, testable
//! contract here.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The four job kinds understood by the generation gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    /// Synthesize a still image from a text prompt.
    Still,
    /// Animate a shot's keyframe into a video clip.
    Animate,
    /// Generate a transition clip from a shot's keyframe context.
    Bridge,
    /// Derive a new keyframe from the last frame of an existing take.
    Stitch,
}

impl JobKind {
    /// Lowercase wire name, e.g. `"animate"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Still => "still",
            Self::Animate => "animate",
            Self::Bridge => "bridge",
            Self::Stitch => "stitch",
        }
    }
}

/// Validated input for one generation job.
///
/// Tagged by kind on the wire; every variant names its required sources
/// explicitly instead of passing a loose parameter bag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JobPayload {
    Still {
        prompt: String,
    },
    Animate {
        prompt: String,
        /// Source still image seeding the animation.
        keyframe_path: String,
    },
    Bridge {
        /// Fully composed transition prompt (scene context + user text).
        prompt: String,
        /// Keyframe of the shot the transition is generated *from*.
        keyframe_path: String,
    },
    Stitch {
        prompt: String,
        /// Video whose last frame seeds the new shot; frame extraction
        /// happens inside the gateway boundary.
        source_video_path: String,
    },
}

impl JobPayload {
    /// The kind tag of this payload.
    pub fn kind(&self) -> JobKind {
        match self {
            Self::Still { .. } => JobKind::Still,
            Self::Animate { .. } => JobKind::Animate,
            Self::Bridge { .. } => JobKind::Bridge,
            Self::Stitch { .. } => JobKind::Stitch,
        }
    }

    /// Check the required fields for this kind before dispatch.
    pub fn validate(&self) -> Result<(), CoreError> {
        match self {
            Self::Still { prompt } => require("prompt", prompt),
            Self::Animate {
                prompt,
                keyframe_path,
            } => {
                require("prompt", prompt)?;
                require("keyframe_path", keyframe_path)
            }
            Self::Bridge {
                prompt,
                keyframe_path,
            } => {
                require("prompt", prompt)?;
                require("keyframe_path", keyframe_path)
            }
            Self::Stitch {
                prompt,
                source_video_path,
            } => {
                require("prompt", prompt)?;
                require("source_video_path", source_video_path)
            }
        }
    }
}

fn require(field: &'static str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!(
            "{field} must not be empty"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn animate(prompt: &str, keyframe: &str) -> JobPayload {
        JobPayload::Animate {
            prompt: prompt.to_string(),
            keyframe_path: keyframe.to_string(),
        }
    }

    #[test]
    fn kind_matches_variant() {
        assert_eq!(animate("a", "b").kind(), JobKind::Animate);
        assert_eq!(
            JobPayload::Stitch {
                prompt: "a".into(),
                source_video_path: "b.mp4".into(),
            }
            .kind(),
            JobKind::Stitch
        );
    }

    #[test]
    fn valid_animate_payload_passes() {
        assert!(animate("a man walks", "/frames/1.png").validate().is_ok());
    }

    #[test]
    fn blank_prompt_rejected() {
        assert_matches!(
            animate("   ", "/frames/1.png").validate(),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn missing_keyframe_rejected() {
        assert_matches!(
            animate("a man walks", "").validate(),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn stitch_requires_source_video() {
        let payload = JobPayload::Stitch {
            prompt: "continue the chase".into(),
            source_video_path: String::new(),
        };
        assert_matches!(payload.validate(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn kind_serializes_as_snake_case_tag() {
        let json = serde_json::to_value(animate("a", "b")).unwrap();
        assert_eq!(json["kind"], "animate");
    }
}
