//! Templates performed upright, plus the generic fallback.

use stickmotion_common::{Archetype, GeneratedAnimation, Level};

use super::{assemble, FrameBuilder, TemplateInfo};
use crate::posture::Posture;

const NONE: &[&str] = &[];

/// Everything carried by the legs
const TRUNK: [&str; 14] = [
    "head",
    "neck",
    "spine_upper",
    "spine_middle",
    "spine_lower",
    "pelvis",
    "left_shoulder",
    "right_shoulder",
    "left_elbow",
    "right_elbow",
    "left_wrist",
    "right_wrist",
    "left_hip",
    "right_hip",
];

const UPPER_BODY: [&str; 9] = [
    "head",
    "neck",
    "spine_upper",
    "left_shoulder",
    "right_shoulder",
    "left_elbow",
    "right_elbow",
    "left_wrist",
    "right_wrist",
];

/// Bodyweight squat seen from the side
pub fn squat(level: Level) -> GeneratedAnimation {
    let k = level.intensity();
    let depth = 14.0 + 8.0 * k;
    let squatted = |t, d: f32| {
        let fraction = d / depth;
        FrameBuilder::new(t, Posture::StandingSide)
            .shift_many(&TRUNK, -8.0 * fraction, -d)
            .shift_many(&UPPER_BODY, 6.0 * fraction, 0.0)
            .shift_both("wrist", 12.0 * fraction, 14.0 * fraction)
            .shift_both("elbow", 6.0 * fraction, 7.0 * fraction)
            .shift_both("knee", d * 0.4, -d * 0.5)
            .rotate_both("hip", (70.0 + 30.0 * k) * fraction, 0.0, 0.0)
            .rotate_both("knee", (80.0 + 40.0 * k) * fraction, 0.0, 0.0)
            .rotate_both("ankle", 20.0 * fraction, 0.0, 0.0)
            .rotate_both("shoulder", 80.0 * fraction, 0.0, 0.0)
            .rotate("spine_lower", 10.0 * fraction, 0.0, 0.0)
    };

    let keyframes = vec![
        squatted(0.0, 0.0)
            .muscle("legs", 0.2)
            .muscle("core", 0.2)
            .caption("Stand tall, feet hip-width apart")
            .build(),
        squatted(0.45, depth)
            .muscle("legs", 0.7 + 0.25 * k)
            .muscle("glutes", 0.6 + 0.3 * k)
            .muscle("core", 0.5)
            .muscle("back", 0.3)
            .emphasize("legs")
            .emphasize("glutes")
            .caption("Sit back and down, chest up")
            .build(),
        squatted(0.7, depth * 0.5)
            .muscle("legs", 0.6)
            .muscle("glutes", 0.5)
            .muscle("core", 0.4)
            .caption("Drive up through the whole foot")
            .build(),
    ];

    let info = TemplateInfo {
        archetype: Archetype::Squat,
        base_duration: 5.0,
        muscles: &["legs", "glutes", "core", "back"],
        equipment: NONE,
        safety: &[
            "Keep the knees tracking over the toes",
            "Keep the heels on the floor",
        ],
    };
    assemble(info, level, keyframes)
}

/// Forward lunge with the right leg, seen from the side
pub fn lunge(level: Level) -> GeneratedAnimation {
    let k = level.intensity();
    let depth = 16.0 + 8.0 * k;
    let stand = |t| FrameBuilder::new(t, Posture::StandingSide);
    let stepped = |t| {
        stand(t)
            .shift_many(&TRUNK, 3.0, -2.0)
            .place("right_knee", 14.0, 26.0)
            .place("right_ankle", 24.0, 4.0)
            .place("left_ankle", -8.0, 5.0)
            .rotate("right_hip", 30.0, 0.0, 0.0)
            .rotate("right_knee", 20.0, 0.0, 0.0)
            .muscle("legs", 0.4)
            .muscle("core", 0.3)
    };

    let keyframes = vec![
        stand(0.0)
            .muscle("legs", 0.2)
            .caption("Stand tall with the feet together")
            .build(),
        stepped(0.25).caption("Take a long step forward").build(),
        stand(0.5)
            .shift_many(&TRUNK, 5.0, -depth)
            .place("right_knee", 24.0, 25.0)
            .place("right_ankle", 24.0, 4.0)
            .place("left_knee", -12.0, 12.0 - 6.0 * k)
            .place("left_ankle", -30.0, 5.0)
            .rotate("right_hip", 80.0 + 10.0 * k, 0.0, 0.0)
            .rotate("right_knee", 85.0 + 10.0 * k, 0.0, 0.0)
            .rotate("left_hip", -10.0, 0.0, 0.0)
            .rotate("left_knee", 90.0 + 20.0 * k, 0.0, 0.0)
            .rotate("left_ankle", 25.0, 0.0, 0.0)
            .muscle("legs", 0.7 + 0.25 * k)
            .muscle("glutes", 0.6 + 0.25 * k)
            .muscle("core", 0.4)
            .emphasize("legs")
            .emphasize("right_knee")
            .caption("Lower until both knees bend to about 90 degrees")
            .build(),
        stepped(0.75).caption("Push back up").build(),
    ];

    let info = TemplateInfo {
        archetype: Archetype::Lunge,
        base_duration: 6.0,
        muscles: &["legs", "glutes", "core"],
        equipment: NONE,
        safety: &[
            "Keep the front knee behind the toes",
            "Keep the torso upright",
        ],
    };
    assemble(info, level, keyframes)
}

/// Standing trunk rotation with the arms held at shoulder height
pub fn spinal_rotation(level: Level) -> GeneratedAnimation {
    let k = level.intensity();
    let arms_out = |t| {
        FrameBuilder::new(t, Posture::Standing)
            .place_mirrored("elbow", 24.0, 80.0)
            .place_mirrored("wrist", 37.0, 80.0)
            .rotate_both("shoulder", 0.0, 0.0, 90.0)
            .muscle("core", 0.3)
            .muscle("shoulders", 0.3)
    };
    // direction 1 turns to the right, -1 to the left
    let twist = |t, direction: f32| {
        let narrow = 5.0 + 2.0 * k;
        arms_out(t)
            .shift("left_shoulder", narrow, 0.0)
            .shift("right_shoulder", -narrow, 0.0)
            .shift_both("elbow", -10.0 * direction, 0.0)
            .shift_both("wrist", -14.0 * direction, 0.0)
            .shift("head", 2.0 * direction, 0.0)
            .rotate("spine_upper", 0.0, (25.0 + 10.0 * k) * direction, 0.0)
            .rotate("spine_middle", 0.0, (15.0 + 10.0 * k) * direction, 0.0)
            .rotate("neck", 0.0, 20.0 * direction, 0.0)
            .muscle("core", 0.55 + 0.3 * k)
            .muscle("back", 0.4)
            .emphasize("core")
            .emphasize("spine_upper")
    };

    let keyframes = vec![
        arms_out(0.0).caption("Stand tall, arms at shoulder height").build(),
        twist(0.25, 1.0).caption("Rotate the chest to the right").build(),
        arms_out(0.5).caption("Return to the centre").build(),
        twist(0.75, -1.0).caption("Rotate the chest to the left").build(),
    ];

    let info = TemplateInfo {
        archetype: Archetype::SpinalRotation,
        base_duration: 6.0,
        muscles: &["core", "back", "shoulders"],
        equipment: NONE,
        safety: &["Keep the hips facing forward", "Rotate without forcing the end range"],
    };
    assemble(info, level, keyframes)
}

/// Standing side bend, reaching over with the opposite arm
pub fn lateral_stretch(level: Level) -> GeneratedAnimation {
    let k = level.intensity();
    let neutral = |t| {
        FrameBuilder::new(t, Posture::Standing)
            .muscle("core", 0.2)
            .muscle("back", 0.2)
    };
    // side -1 bends to the left with the right arm overhead, 1 the mirror
    let bend = |t, side: f32| {
        let (reach_arm, lean) = if side < 0.0 { ("right", -1.0) } else { ("left", 1.0) };
        let reach = 8.0 + 4.0 * k;
        neutral(t)
            .shift("head", lean * (10.0 + 4.0 * k), -2.0)
            .shift("neck", lean * (8.0 + 3.0 * k), -1.0)
            .shift("spine_upper", lean * (6.0 + 2.0 * k), 0.0)
            .shift("spine_middle", lean * 3.0, 0.0)
            .shift_both("shoulder", lean * 6.0, 0.0)
            .place(&format!("{reach_arm}_elbow"), lean * -4.0, 96.0)
            .place(&format!("{reach_arm}_wrist"), lean * reach, 106.0)
            .rotate(&format!("{reach_arm}_shoulder"), 0.0, 0.0, 160.0 + 10.0 * k)
            .rotate("spine_upper", 0.0, 0.0, lean * (20.0 + 8.0 * k))
            .rotate("spine_middle", 0.0, 0.0, lean * (12.0 + 8.0 * k))
            .rotate("spine_lower", 0.0, 0.0, lean * (8.0 + 6.0 * k))
            .rotate("neck", 0.0, 0.0, lean * 15.0)
            .muscle("core", 0.4 + 0.2 * k)
            .muscle("back", 0.4)
            .muscle("shoulders", 0.3)
            .emphasize("core")
    };

    let keyframes = vec![
        neutral(0.0).caption("Stand tall, arms relaxed").build(),
        bend(0.25, -1.0).caption("Reach up and over to the left").build(),
        neutral(0.5).caption("Come back to the centre").build(),
        bend(0.75, 1.0).caption("Reach up and over to the right").build(),
    ];

    let info = TemplateInfo {
        archetype: Archetype::LateralStretch,
        base_duration: 8.0,
        muscles: &["core", "back", "shoulders"],
        equipment: NONE,
        safety: &["Bend sideways, not forwards", "Keep both feet grounded"],
    };
    assemble(info, level, keyframes)
}

/// Gentle neck tilts and a chin tuck
pub fn neck_mobility(level: Level) -> GeneratedAnimation {
    let k = level.intensity();
    let neutral = |t| {
        FrameBuilder::new(t, Posture::Standing)
            .muscle("neck", 0.2)
            .muscle("shoulders", 0.1)
    };
    let tilt = |t, side: f32| {
        neutral(t)
            .shift("head", side * (5.0 + 2.0 * k), -1.0)
            .rotate("neck", 0.0, 0.0, side * (25.0 + 10.0 * k))
            .rotate("head", 0.0, 0.0, side * 10.0)
            .muscle("neck", 0.4)
            .emphasize("neck")
    };

    let keyframes = vec![
        neutral(0.0).caption("Relax the shoulders, look straight ahead").build(),
        tilt(0.25, 1.0).caption("Tilt the ear toward the right shoulder").build(),
        neutral(0.5)
            .shift("head", 0.0, -4.0)
            .rotate("neck", 35.0 + 15.0 * k, 0.0, 0.0)
            .rotate("head", 15.0, 0.0, 0.0)
            .muscle("neck", 0.45)
            .emphasize("neck")
            .caption("Tuck the chin toward the chest")
            .build(),
        tilt(0.75, -1.0).caption("Tilt the ear toward the left shoulder").build(),
    ];

    let info = TemplateInfo {
        archetype: Archetype::NeckMobility,
        base_duration: 8.0,
        muscles: &["neck", "shoulders"],
        equipment: NONE,
        safety: &["Never roll the head backwards", "Move slowly and without pain"],
    };
    assemble(info, level, keyframes)
}

/// Raise both arms sideways and overhead
pub fn arm_raise(level: Level) -> GeneratedAnimation {
    let k = level.intensity();
    let down = |t| FrameBuilder::new(t, Posture::Standing);
    let overhead = |t| {
        down(t)
            .place_mirrored("elbow", 16.0, 94.0)
            .place_mirrored("wrist", 14.0 + 2.0 * k, 108.0)
            .rotate_both("shoulder", 0.0, 0.0, 160.0 + 20.0 * k)
            .muscle("shoulders", 0.6 + 0.3 * k)
            .muscle("arms", 0.3)
            .muscle("back", 0.3)
            .emphasize("shoulders")
    };

    let keyframes = vec![
        down(0.0)
            .muscle("shoulders", 0.2)
            .caption("Stand tall, arms by the sides")
            .build(),
        overhead(0.4).caption("Raise the arms overhead").build(),
        overhead(0.6).muscle("core", 0.3).caption("Hold and lengthen").build(),
        down(0.8)
            .place_mirrored("elbow", 24.0, 80.0)
            .place_mirrored("wrist", 37.0, 80.0)
            .rotate_both("shoulder", 0.0, 0.0, 90.0)
            .muscle("shoulders", 0.5 + 0.2 * k)
            .muscle("arms", 0.2)
            .caption("Lower with control")
            .build(),
    ];

    let info = TemplateInfo {
        archetype: Archetype::ArmRaise,
        base_duration: 5.0,
        muscles: &["shoulders", "arms", "back"],
        equipment: NONE,
        safety: &["Do not shrug the shoulders", "Keep the ribs down"],
    };
    assemble(info, level, keyframes)
}

/// Fallback for unrecognised exercises: stand tall, brace and breathe
pub fn generic(level: Level) -> GeneratedAnimation {
    let k = level.intensity();
    let keyframes = vec![
        FrameBuilder::new(0.0, Posture::Standing)
            .muscle("core", 0.2)
            .caption("Stand tall and breathe")
            .build(),
        FrameBuilder::new(0.5, Posture::Standing)
            .shift_many(&["head", "neck"], 0.0, 1.0)
            .shift("spine_upper", 0.0, 0.6)
            .shift("spine_middle", 0.0, 0.4)
            .rotate("pelvis", -5.0, 0.0, 0.0)
            .muscle("core", 0.5 + 0.3 * k)
            .muscle("back", 0.2)
            .emphasize("core")
            .caption("Brace the core gently")
            .build(),
    ];

    let info = TemplateInfo {
        archetype: Archetype::Generic,
        base_duration: 6.0,
        muscles: &["core", "back"],
        equipment: NONE,
        safety: &["Stop if anything hurts"],
    };
    assemble(info, level, keyframes)
}
