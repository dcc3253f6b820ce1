//! Resampling of keyframe sequences for a renderer's frame rate.

use std::collections::BTreeSet;

use stickmotion_common::{ActivationMap, Keyframe, PoseMap};

use crate::error::{MotionError, Result};

/// Index of the keyframes surrounding `t`: the last one at or before it and
/// the first one at or after it. Times outside the sequence clamp to its ends.
fn bracket(keyframes: &[Keyframe], t: f32) -> (usize, usize) {
    let last = keyframes.len() - 1;
    let before = keyframes
        .iter()
        .rposition(|k| k.timestamp <= t)
        .unwrap_or(0);
    let after = keyframes
        .iter()
        .position(|k| k.timestamp >= t)
        .unwrap_or(last);
    (before, after.max(before))
}

fn lerp(a: f32, b: f32, factor: f32) -> f32 {
    a + (b - a) * factor
}

fn blend_joints(a: &PoseMap, b: &PoseMap, factor: f32) -> PoseMap {
    let names: BTreeSet<&String> = a.keys().chain(b.keys()).collect();
    names
        .into_iter()
        .filter_map(|name| {
            let pose = match (a.get(name), b.get(name)) {
                (Some(pa), Some(pb)) => {
                    let mut pose = *pa;
                    pose.position = pa.position.lerp(pb.position, factor);
                    pose.rotation = pa.rotation.lerp(pb.rotation, factor);
                    pose
                }
                (Some(p), None) | (None, Some(p)) => *p,
                (None, None) => return None,
            };
            Some((name.clone(), pose))
        })
        .collect()
}

fn blend_muscles(a: &ActivationMap, b: &ActivationMap, factor: f32) -> ActivationMap {
    let names: BTreeSet<&String> = a.keys().chain(b.keys()).collect();
    names
        .into_iter()
        .filter_map(|name| {
            let value = match (a.get(name), b.get(name)) {
                (Some(va), Some(vb)) => lerp(*va, *vb, factor),
                (Some(v), None) | (None, Some(v)) => *v,
                (None, None) => return None,
            };
            Some((name.clone(), value))
        })
        .collect()
}

/// Keyframe at normalized time `t`.
///
/// Numeric fields are blended linearly, categorical ones (breathing, emphasis,
/// caption) come from whichever bracketing keyframe is closer.
pub fn sample(keyframes: &[Keyframe], t: f32) -> Result<Keyframe> {
    if keyframes.is_empty() {
        return Err(MotionError::EmptyKeyframes);
    }

    let (i, j) = bracket(keyframes, t);
    let before = &keyframes[i];
    let after = &keyframes[j];

    let span = after.timestamp - before.timestamp;
    let factor = if span > 0.0 {
        ((t - before.timestamp) / span).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let closer = if factor < 0.5 { before } else { after };
    Ok(Keyframe {
        timestamp: t,
        joints: blend_joints(&before.joints, &after.joints, factor),
        muscles: blend_muscles(&before.muscles, &after.muscles, factor),
        breathing: closer.breathing,
        emphasis: closer.emphasis.clone(),
        instruction: closer.instruction.clone(),
    })
}

/// Resample to `target_count` evenly spaced keyframes over [0, 1].
///
/// Sequences that already hold at least `target_count` keyframes are
/// returned as they are, this never downsamples.
#[tracing::instrument(level = "debug", skip(keyframes), fields(len = keyframes.len()))]
pub fn resample(keyframes: &[Keyframe], target_count: usize) -> Result<Vec<Keyframe>> {
    if keyframes.is_empty() {
        return Err(MotionError::EmptyKeyframes);
    }
    if target_count < 2 {
        return Err(MotionError::InvalidFrameCount(target_count));
    }
    if keyframes.len() >= target_count {
        return Ok(keyframes.to_vec());
    }

    let last = (target_count - 1) as f32;
    (0..target_count)
        .map(|i| sample(keyframes, i as f32 / last))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::TemplateRegistry;
    use glam::Vec3;
    use stickmotion_common::{Archetype, BreathingPhase, JointPose, Level};

    fn frame(t: f32, y: f32, core: f32, phase: BreathingPhase) -> Keyframe {
        let mut k = Keyframe::new(
            t,
            PoseMap::from([(
                "pelvis".to_string(),
                JointPose::new(Vec3::new(0.0, y, 0.0), Vec3::new(y / 10.0, 0.0, 0.0)),
            )]),
        );
        k.muscles.insert("core".into(), core);
        k.breathing = phase;
        k.instruction = Some(format!("at {t}"));
        k
    }

    fn simple() -> Vec<Keyframe> {
        vec![
            frame(0.0, 50.0, 0.2, BreathingPhase::Inhale),
            frame(0.5, 60.0, 0.8, BreathingPhase::Exhale),
            frame(1.0, 50.0, 0.2, BreathingPhase::Inhale),
        ]
    }

    #[test]
    fn empty_input_fails() {
        assert!(matches!(resample(&[], 10), Err(MotionError::EmptyKeyframes)));
        assert!(matches!(sample(&[], 0.5), Err(MotionError::EmptyKeyframes)));
    }

    #[test]
    fn too_few_targets_fail() {
        assert!(matches!(
            resample(&simple(), 1),
            Err(MotionError::InvalidFrameCount(1))
        ));
    }

    #[test]
    fn never_downsamples() {
        let input = simple();
        assert_eq!(resample(&input, 2).unwrap(), input);
        assert_eq!(resample(&input, 3).unwrap(), input);
    }

    #[test]
    fn upsampling_blends_numbers() {
        let frames = resample(&simple(), 5).unwrap();
        assert_eq!(frames.len(), 5);
        let quarter = &frames[1];
        assert_eq!(quarter.timestamp, 0.25);
        assert!((quarter.joints["pelvis"].position.y - 55.0).abs() < 1e-5);
        assert!((quarter.joints["pelvis"].rotation.x - 5.5).abs() < 1e-5);
        assert!((quarter.muscles["core"] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn categorical_fields_come_from_the_closer_frame() {
        let input = simple();
        let early = sample(&input, 0.2).unwrap();
        assert_eq!(early.breathing, BreathingPhase::Inhale);
        assert_eq!(early.instruction.as_deref(), Some("at 0"));

        // factor exactly 0.5 takes the later frame
        let middle = sample(&input, 0.25).unwrap();
        assert_eq!(middle.breathing, BreathingPhase::Exhale);

        let late = sample(&input, 0.4).unwrap();
        assert_eq!(late.instruction.as_deref(), Some("at 0.5"));
    }

    #[test]
    fn grid_aligned_round_trip() {
        let input = vec![
            frame(0.0, 50.0, 0.2, BreathingPhase::Inhale),
            frame(0.25, 54.0, 0.4, BreathingPhase::Inhale),
            frame(0.5, 60.0, 0.8, BreathingPhase::Exhale),
            frame(0.75, 54.0, 0.4, BreathingPhase::Hold),
            frame(1.0, 50.0, 0.2, BreathingPhase::Inhale),
        ];
        for (i, original) in input.iter().enumerate() {
            let sampled = sample(&input, i as f32 / 4.0).unwrap();
            assert_eq!(&sampled, original);
        }
        assert_eq!(resample(&input, input.len()).unwrap(), input);
    }

    #[test]
    fn endpoints_are_exact() {
        let registry = TemplateRegistry::builtin();
        for archetype in Archetype::BUILTIN {
            let animation = registry.generate(&archetype, Level::Advanced);
            let first = animation.keyframes.first().unwrap();
            let last = animation.keyframes.last().unwrap();
            for count in [6, 17, 60] {
                let frames = resample(&animation.keyframes, count).unwrap();
                assert_eq!(frames.len(), count);
                assert_eq!(frames[0], *first, "{archetype}");
                assert_eq!(frames[count - 1], *last, "{archetype}");
            }
        }
    }

    #[test]
    fn single_keyframe_is_held() {
        let only = frame(0.5, 50.0, 0.2, BreathingPhase::Exhale);
        let frames = resample(std::slice::from_ref(&only), 4).unwrap();
        assert_eq!(frames.len(), 4);
        for (i, f) in frames.iter().enumerate() {
            assert_eq!(f.timestamp, i as f32 / 3.0);
            assert_eq!(f.joints, only.joints);
            assert_eq!(f.breathing, BreathingPhase::Exhale);
        }
    }

    #[test]
    fn out_of_range_queries_clamp() {
        let input = vec![
            frame(0.2, 50.0, 0.2, BreathingPhase::Inhale),
            frame(0.8, 60.0, 0.8, BreathingPhase::Exhale),
        ];
        let frames = resample(&input, 3).unwrap();
        assert_eq!(frames[0].joints, input[0].joints);
        assert_eq!(frames[0].breathing, BreathingPhase::Inhale);
        assert_eq!(frames[2].joints, input[1].joints);
        assert_eq!(frames[2].muscles, input[1].muscles);
    }

    #[test]
    fn missing_entries_hold_the_other_value() {
        let mut a = frame(0.0, 50.0, 0.2, BreathingPhase::Inhale);
        let mut b = frame(1.0, 60.0, 0.6, BreathingPhase::Exhale);
        a.muscles.insert("glutes".into(), 0.9);
        b.muscles.insert("legs".into(), 0.3);
        b.joints.insert(
            "head".into(),
            JointPose::new(Vec3::new(0.0, 90.0, 0.0), Vec3::ZERO),
        );

        let mid = sample(&[a, b], 0.5).unwrap();
        assert!((mid.muscles["core"] - 0.4).abs() < 1e-6);
        assert_eq!(mid.muscles["glutes"], 0.9);
        assert_eq!(mid.muscles["legs"], 0.3);
        assert_eq!(mid.joints["head"].position.y, 90.0);
    }
}
