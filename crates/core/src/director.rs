//! Prompt direction helpers.
//!
//! Translates the UI's short camera-move names into the motion vocabulary the
//! video model responds to, and composes the final generation prompt from the
//! scene's master context plus the shot's action text. Raw prompts may carry
//! a `[CONTEXT: ...]` prefix (produced by the stitch flow); it is split off
//! and treated as scene context.

/// Default visual style applied when the caller supplies none.
pub const DEFAULT_STYLE: &str = "Cinematic";

/// Default camera move applied when the caller supplies none.
pub const DEFAULT_CAMERA_MOVE: &str = "Push In";

/// UI camera-move names and their motion descriptions for the video model.
const CAMERA_MOVES: &[(&str, &str)] = &[
    (
        "Push In",
        "Slow dolly in. Forward tracking shot. The camera moves physically closer with a steady, cinematic pace.",
    ),
    (
        "Pull Out",
        "Slow dolly out. Backward tracking shot. The camera retreats smoothly, revealing the environment.",
    ),
    ("Static", "Tripod shot. The camera is completely locked off and stable."),
    (
        "Handheld",
        "Handheld documentary style. Subtle organic camera shake and breathing motion.",
    ),
    (
        "Pan Right",
        "Camera truck right. A lateral tracking shot moving parallel to the subject. Smooth, sliding motion.",
    ),
    (
        "Pan Left",
        "Camera truck left. A lateral tracking shot sliding to the left. The background passes by smoothly.",
    ),
    (
        "Orbit",
        "Slow arc shot. The camera gently circles around the subject. A subtle orbital movement showcasing depth.",
    ),
    (
        "Tilt Up",
        "Camera tilts up. A slow vertical scan starting low and revealing the subject upwards.",
    ),
    (
        "Tilt Down",
        "Camera tilts down. A slow vertical scan starting high and lowering the gaze.",
    ),
    (
        "Crane Up",
        "Boom up. The camera physically rises straight up, establishing a higher vantage point.",
    ),
    ("Crane Down", "Boom down. The camera physically lowers, settling into the scene."),
    (
        "Zoom In",
        "Smooth optical zoom in. The camera body stays still while the lens magnifies the subject. Background compression increases.",
    ),
    (
        "Dutch Angle",
        "Dutch angle. The camera is tilted on its roll axis, creating a diagonal composition. Uneasy tension.",
    ),
    (
        "Low Angle",
        "Low angle shot. The camera looks up at the subject from a low vantage point, making them appear powerful.",
    ),
    (
        "Drone Overhead",
        "Top-down God's Eye view. The camera looks straight down. Geometric composition.",
    ),
    (
        "Drone Orbit",
        "Large-scale drone orbit. The camera circles the subject from a high angle, capturing the vast environment.",
    ),
    (
        "Drone Fly Through",
        "FPV Drone flight. The camera flies aggressively through the space with high speed and fluidity.",
    ),
];

/// Resolve a camera-move name to its motion description.
///
/// Unknown names pass through verbatim so power users can write raw motion
/// text directly.
pub fn camera_motion(camera_move: &str) -> &str {
    CAMERA_MOVES
        .iter()
        .find(|(name, _)| *name == camera_move)
        .map(|(_, description)| *description)
        .unwrap_or(camera_move)
}

/// Split an optional `[CONTEXT: ...]` prefix off a raw prompt.
///
/// Returns `(context, action)`. Prompts without the prefix (or with a
/// malformed one) come back unchanged as pure action.
pub fn split_context(raw_prompt: &str) -> (Option<String>, String) {
    let trimmed = raw_prompt.trim();
    if let Some(rest) = trimmed.strip_prefix("[CONTEXT:") {
        if let Some((context, action)) = rest.split_once(']') {
            return (
                Some(context.trim().to_string()),
                action.trim().to_string(),
            );
        }
    }
    (None, trimmed.to_string())
}

/// Compose the final generation prompt for one shot.
///
/// The scene's master context (mood, lighting, world) leads so the model
/// keeps it consistent across shots; the action and motion description
/// follow, with the style suffixed. An explicit `[CONTEXT: ...]` prefix in
/// `action` overrides `master_context`.
pub fn compose_prompt(
    master_context: Option<&str>,
    action: &str,
    style: &str,
    camera_move: &str,
) -> String {
    let (inline_context, action) = split_context(action);
    let context = inline_context
        .as_deref()
        .or(master_context)
        .map(str::trim)
        .filter(|c| !c.is_empty());
    let motion = camera_motion(camera_move);

    match context {
        Some(context) => {
            format!("{context}. {action} {motion} Continuous single shot in {style} style.")
        }
        None => format!("{action} {motion} Continuous single shot in {style} style."),
    }
}
