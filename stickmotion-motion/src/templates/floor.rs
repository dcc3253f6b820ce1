//! Templates performed on the floor: quadruped, supine and plank based.

use stickmotion_common::{Archetype, GeneratedAnimation, Level};

use super::{assemble, FrameBuilder, TemplateInfo};
use crate::posture::Posture;

const MAT: &[&str] = &["mat"];

/// Cat-cow: alternate spinal extension and flexion on hands and knees
pub fn spinal_flexion(level: Level) -> GeneratedAnimation {
    let k = level.intensity();
    let neutral = |t| {
        FrameBuilder::new(t, Posture::Quadruped)
            .muscle("core", 0.3)
            .muscle("back", 0.3)
    };

    let keyframes = vec![
        neutral(0.0).caption("Start on hands and knees, spine neutral").build(),
        neutral(0.25)
            .shift("spine_middle", 0.0, -(3.0 + 2.0 * k))
            .shift("spine_upper", 0.0, -(2.0 + k))
            .shift("spine_lower", 0.0, -(1.5 + k))
            .shift("head", 0.0, 3.0 + k)
            .rotate("spine_middle", -(15.0 + 10.0 * k), 0.0, 0.0)
            .rotate("spine_lower", -(10.0 + 8.0 * k), 0.0, 0.0)
            .rotate("neck", -(20.0 + 10.0 * k), 0.0, 0.0)
            .muscle("back", 0.5 + 0.2 * k)
            .muscle("core", 0.2)
            .emphasize("back")
            .caption("Cow: drop the belly and lift the gaze")
            .build(),
        neutral(0.5).build(),
        neutral(0.75)
            .shift("spine_middle", 0.0, 4.0 + 2.0 * k)
            .shift("spine_upper", 0.0, 3.0 + k)
            .shift("spine_lower", 0.0, 2.0 + k)
            .shift("head", 0.0, -4.0)
            .rotate("spine_middle", 20.0 + 15.0 * k, 0.0, 0.0)
            .rotate("spine_upper", 15.0 + 10.0 * k, 0.0, 0.0)
            .rotate("spine_lower", 15.0 + 10.0 * k, 0.0, 0.0)
            .rotate("neck", 30.0 + 15.0 * k, 0.0, 0.0)
            .muscle("core", 0.6 + 0.3 * k)
            .muscle("back", 0.2)
            .emphasize("core")
            .emphasize("spine_middle")
            .caption("Cat: round the back and tuck the chin")
            .build(),
    ];

    let info = TemplateInfo {
        archetype: Archetype::SpinalFlexion,
        base_duration: 8.0,
        muscles: &["back", "core"],
        equipment: MAT,
        safety: &[
            "Move within a pain-free range",
            "Keep the wrists under the shoulders",
        ],
    };
    assemble(info, level, keyframes)
}

/// Glute bridge: lift the hips from a supine position and lower again
pub fn hip_bridge(level: Level) -> GeneratedAnimation {
    let k = level.intensity();
    let lift = 10.0 + 4.0 * k;
    let raised = |t, height: f32| {
        FrameBuilder::new(t, Posture::Supine)
            .shift("pelvis", 0.0, height)
            .shift_both("hip", 0.0, height)
            .shift("spine_lower", 0.0, height * 0.7)
            .shift("spine_middle", 0.0, height * 0.35)
            .shift_both("knee", 2.0 * height / lift, 2.0 * height / lift)
            .rotate_both("hip", 50.0 - 45.0 * height / lift, 0.0, 0.0)
            .rotate("pelvis", -10.0 * height / lift, 0.0, 0.0)
    };

    let keyframes = vec![
        raised(0.0, 0.0)
            .muscle("glutes", 0.2)
            .muscle("core", 0.2)
            .caption("Lie on your back, knees bent, feet flat")
            .build(),
        raised(0.4, lift)
            .muscle("glutes", 0.7 + 0.25 * k)
            .muscle("legs", 0.4)
            .muscle("core", 0.4)
            .muscle("back", 0.3)
            .emphasize("glutes")
            .emphasize("pelvis")
            .caption("Press through the heels and lift the hips")
            .build(),
        raised(0.6, lift)
            .muscle("glutes", 0.75 + 0.25 * k)
            .muscle("legs", 0.4)
            .muscle("core", 0.45)
            .muscle("back", 0.3)
            .emphasize("glutes")
            .caption("Squeeze the glutes at the top")
            .build(),
        raised(0.85, lift * 0.4)
            .muscle("glutes", 0.4)
            .muscle("core", 0.3)
            .caption("Lower slowly, one vertebra at a time")
            .build(),
    ];

    let info = TemplateInfo {
        archetype: Archetype::HipBridge,
        base_duration: 6.0,
        muscles: &["glutes", "legs", "core", "back"],
        equipment: MAT,
        safety: &[
            "Do not overarch the lower back",
            "Keep the knees in line with the feet",
        ],
    };
    assemble(info, level, keyframes)
}

/// Plank hold with a subtle settle and re-brace.
/// Beginners hold the plank from the knees.
pub fn plank(level: Level) -> GeneratedAnimation {
    let k = level.intensity();
    let hold = |t, sway: f32| {
        let frame = FrameBuilder::new(t, Posture::Plank)
            .shift("spine_middle", 0.0, sway)
            .shift("spine_lower", 0.0, sway)
            .shift("pelvis", 0.0, sway * 0.8)
            .muscle("shoulders", 0.5)
            .muscle("glutes", 0.4)
            .muscle("arms", 0.3);
        if level == Level::Beginner {
            frame
                .shift_many(&["pelvis", "spine_lower"], 0.0, -3.0)
                .shift_both("hip", 0.0, -3.0)
                .place_both("knee", -18.0, 3.0)
                .place_both("ankle", -34.0, 8.0)
                .rotate_both("knee", 60.0, 0.0, 0.0)
        } else {
            frame
        }
    };

    let keyframes = vec![
        hold(0.0, 0.0)
            .muscle("core", 0.6 + 0.3 * k)
            .emphasize("core")
            .caption("Hold a straight line from head to heels")
            .build(),
        hold(0.33, -0.6)
            .muscle("core", 0.7 + 0.3 * k)
            .emphasize("core")
            .caption("Keep the hips from sagging")
            .build(),
        hold(0.66, 0.4)
            .muscle("core", 0.65 + 0.3 * k)
            .emphasize("core")
            .caption("Breathe steadily and stay braced")
            .build(),
    ];

    let info = TemplateInfo {
        archetype: Archetype::Plank,
        base_duration: 10.0,
        muscles: &["core", "shoulders", "glutes", "arms"],
        equipment: MAT,
        safety: &["Keep the hips level", "Stop if the lower back aches"],
    };
    assemble(info, level, keyframes)
}

/// Push-up from a high plank
pub fn push_up(level: Level) -> GeneratedAnimation {
    let k = level.intensity();
    let drop = 10.0 + 4.0 * k;
    let lowered = |t, depth: f32| {
        let fraction = depth / drop;
        FrameBuilder::new(t, Posture::Plank)
            .shift_many(
                &["head", "neck", "spine_upper", "spine_middle", "spine_lower", "pelvis"],
                0.0,
                -depth,
            )
            .shift_both("shoulder", 0.0, -depth)
            .shift_both("hip", 0.0, -depth)
            .shift_both("knee", 0.0, -depth * 0.5)
            .shift_both("elbow", -7.0 * fraction, -depth * 0.3)
            .rotate_both("elbow", 100.0 * fraction + 20.0 * k * fraction, 0.0, 0.0)
            .rotate_both("shoulder", 70.0 - 40.0 * fraction, 0.0, 0.0)
    };

    let keyframes = vec![
        lowered(0.0, 0.0)
            .muscle("arms", 0.4)
            .muscle("chest", 0.3)
            .muscle("core", 0.5)
            .caption("Start in a high plank, hands under the shoulders")
            .build(),
        lowered(0.5, drop)
            .muscle("chest", 0.8 + 0.2 * k)
            .muscle("arms", 0.75 + 0.2 * k)
            .muscle("core", 0.6)
            .muscle("shoulders", 0.5)
            .emphasize("chest")
            .emphasize("arms")
            .caption("Lower the chest with the elbows at 45 degrees")
            .build(),
        lowered(0.75, drop * 0.5)
            .muscle("chest", 0.7)
            .muscle("arms", 0.7)
            .muscle("core", 0.55)
            .caption("Push the floor away")
            .build(),
    ];

    let info = TemplateInfo {
        archetype: Archetype::PushUp,
        base_duration: 4.0,
        muscles: &["chest", "arms", "shoulders", "core"],
        equipment: MAT,
        safety: &[
            "Keep the body in one line",
            "Drop to the knees if the lower back sags",
        ],
    };
    assemble(info, level, keyframes)
}

/// Bird dog: extend the opposite arm and leg from hands and knees
pub fn bird_dog(level: Level) -> GeneratedAnimation {
    let k = level.intensity();
    let neutral = |t| {
        FrameBuilder::new(t, Posture::Quadruped)
            .muscle("core", 0.3)
            .muscle("back", 0.2)
    };
    let reach = |t, arm: &str, leg: &str| {
        neutral(t)
            .place(&format!("{arm}_elbow"), 37.0, 38.0 + k)
            .place(&format!("{arm}_wrist"), 50.0, 39.0 + 2.0 * k)
            .place(&format!("{leg}_knee"), -27.0, 37.0)
            .place(&format!("{leg}_ankle"), -44.0, 38.0 + 2.0 * k)
            .rotate(&format!("{arm}_shoulder"), 160.0 + 15.0 * k, 0.0, 0.0)
            .rotate(&format!("{arm}_wrist"), 0.0, 0.0, 0.0)
            .rotate(&format!("{leg}_hip"), -10.0 - 10.0 * k, 0.0, 0.0)
            .rotate(&format!("{leg}_knee"), 0.0, 0.0, 0.0)
            .muscle("core", 0.6 + 0.3 * k)
            .muscle("back", 0.5)
            .muscle("glutes", 0.5 + 0.2 * k)
            .muscle("shoulders", 0.4)
            .emphasize("core")
            .emphasize(&format!("{arm}_shoulder"))
            .emphasize(&format!("{leg}_hip"))
    };

    let keyframes = vec![
        neutral(0.0).caption("Start on hands and knees").build(),
        reach(0.3, "right", "left")
            .caption("Reach the right arm forward and the left leg back")
            .build(),
        neutral(0.5).caption("Return to the start").build(),
        reach(0.8, "left", "right")
            .caption("Switch sides: left arm and right leg")
            .build(),
    ];

    let info = TemplateInfo {
        archetype: Archetype::BirdDog,
        base_duration: 8.0,
        muscles: &["core", "back", "glutes", "shoulders"],
        equipment: MAT,
        safety: &["Keep the hips square to the floor", "Do not arch the lower back"],
    };
    assemble(info, level, keyframes)
}
