//! Heuristic edits of a base animation driven by the instruction text.
//!
//! Rules run in a fixed order: pace, emphasis, breathing cue, captions and
//! finally the cosmetic jitter, so scaling never sees jittered data.

use glam::Vec2;
use rand::Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;

use stickmotion_common::{BreathingPhase, GeneratedAnimation, Style, MUSCLE_GROUPS};

use crate::config::EngineConfig;

const SLOW_CUES: &[&str] = &["slow", "gentle", "langsam", "lento", "lentement"];
const FAST_CUES: &[&str] = &["dynamic", "fast", "quick", "explosive", "schnell", "rápido"];
const EMPHASIS_CUES: &[&str] = &["highlight", "focus", "emphasi", "squeeze", "betont"];
const BREATHING_CUES: &[&str] = &["breath", "inhale", "exhale", "atme", "atmen"];

fn mentions(text: &str, cues: &[&str]) -> bool {
    cues.iter().any(|cue| text.contains(cue))
}

/// Muscle groups named as whole words, singular or plural ("glute", "glutes").
/// A name used in another sense ("lie on your back") still counts.
fn named_muscles(text: &str) -> Vec<&'static str> {
    let words: Vec<&str> = text.split(|c: char| !c.is_alphanumeric()).collect();
    MUSCLE_GROUPS
        .iter()
        .map(|m| m.name)
        .filter(|&name| {
            let singular = name.strip_suffix('s').unwrap_or(name);
            words.iter().any(|&w| w == name || w == singular)
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct InstructionRefiner {
    slow_factor: f32,
    fast_factor: f32,
    emphasis_factor: f32,
    jitter_amplitude: f32,
    jitter_seed: Option<u64>,
}

impl Default for InstructionRefiner {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl InstructionRefiner {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            slow_factor: config.slow_factor,
            fast_factor: config.fast_factor,
            emphasis_factor: config.emphasis_factor,
            jitter_amplitude: config.jitter_amplitude,
            jitter_seed: config.jitter_seed,
        }
    }

    /// Apply every rule to a copy of the animation
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn refine<S: AsRef<str>>(
        &self,
        animation: &GeneratedAnimation,
        instruction: &str,
        steps: &[S],
    ) -> GeneratedAnimation {
        let text = instruction.to_lowercase();
        let mut result = animation.clone();

        self.apply_pace(&mut result, &text);
        self.apply_emphasis(&mut result, &text);
        apply_breathing_cue(&mut result, &text);
        apply_captions(&mut result, steps);
        self.apply_jitter(&mut result);

        result
    }

    fn apply_pace(&self, animation: &mut GeneratedAnimation, text: &str) {
        if mentions(text, SLOW_CUES) {
            animation.duration *= self.slow_factor;
            animation.style = Style::Controlled;
            tracing::debug!("slow pace cue, duration {:.2}s", animation.duration);
        } else if mentions(text, FAST_CUES) {
            animation.duration *= self.fast_factor;
            animation.style = Style::Dynamic;
            tracing::debug!("fast pace cue, duration {:.2}s", animation.duration);
        }
    }

    fn apply_emphasis(&self, animation: &mut GeneratedAnimation, text: &str) {
        if !mentions(text, EMPHASIS_CUES) {
            return;
        }

        let named = named_muscles(text);
        tracing::debug!("emphasis cue, highlighting {:?}", named);

        for frame in &mut animation.keyframes {
            for activation in frame.muscles.values_mut() {
                *activation = (*activation * self.emphasis_factor).min(1.0);
            }
            frame.emphasis.extend(named.iter().map(|n| n.to_string()));
        }
    }

    fn apply_jitter(&self, animation: &mut GeneratedAnimation) {
        if self.jitter_amplitude <= 0.0 || animation.keyframes.is_empty() {
            return;
        }

        let seed = self.jitter_seed.unwrap_or_else(rand::random);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let amplitude = self.jitter_amplitude;
        let mut offsets = |frame: &stickmotion_common::Keyframe| -> BTreeMap<String, Vec2> {
            frame
                .joints
                .keys()
                .map(|name| {
                    let offset = Vec2::new(
                        rng.random_range(-amplitude..=amplitude),
                        rng.random_range(-amplitude..=amplitude),
                    );
                    (name.clone(), offset)
                })
                .collect()
        };

        // The closing frame reuses the opening offsets to keep the loop seamless
        let last = animation.keyframes.len() - 1;
        let closes_loop = last > 0
            && animation.keyframes[0].timestamp == 0.0
            && animation.keyframes[last].timestamp == 1.0;
        let opening = offsets(&animation.keyframes[0]);

        for (i, frame) in animation.keyframes.iter_mut().enumerate() {
            let frame_offsets = if i == 0 || (i == last && closes_loop) {
                opening.clone()
            } else {
                offsets(frame)
            };
            for (name, pose) in frame.joints.iter_mut() {
                if let Some(offset) = frame_offsets.get(name) {
                    pose.position.x += offset.x;
                    pose.position.y += offset.y;
                }
            }
        }
    }
}

/// Alternate inhale and exhale by keyframe index.
/// The breathing synchronizer overwrites this when it runs afterwards.
fn apply_breathing_cue(animation: &mut GeneratedAnimation, text: &str) {
    if !mentions(text, BREATHING_CUES) {
        return;
    }
    for (i, frame) in animation.keyframes.iter_mut().enumerate() {
        frame.breathing = if i % 2 == 0 {
            BreathingPhase::Inhale
        } else {
            BreathingPhase::Exhale
        };
    }
}

/// Give uncaptioned keyframes the step text, spread evenly across the loop
fn apply_captions<S: AsRef<str>>(animation: &mut GeneratedAnimation, steps: &[S]) {
    if steps.is_empty() {
        return;
    }
    let count = animation.keyframes.len();
    for (i, frame) in animation.keyframes.iter_mut().enumerate() {
        if frame.instruction.is_none() {
            let step = (i * steps.len() / count).min(steps.len() - 1);
            frame.instruction = Some(steps[step].as_ref().to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::{validate, TemplateRegistry};
    use stickmotion_common::{Archetype, Level};

    const NO_STEPS: &[&str] = &[];

    fn still_refiner() -> InstructionRefiner {
        InstructionRefiner::new(&EngineConfig {
            jitter_amplitude: 0.0,
            ..EngineConfig::default()
        })
    }

    fn seeded_refiner(seed: u64) -> InstructionRefiner {
        InstructionRefiner::new(&EngineConfig {
            jitter_seed: Some(seed),
            ..EngineConfig::default()
        })
    }

    fn bridge() -> GeneratedAnimation {
        TemplateRegistry::builtin().generate(&Archetype::HipBridge, Level::Beginner)
    }

    #[test]
    fn slow_cue_lengthens_and_controls() {
        let base = bridge();
        let refined = still_refiner().refine(&base, "Lift hips SLOWLY", NO_STEPS);
        assert!((refined.duration - base.duration * 1.3).abs() < 1e-5);
        assert_eq!(refined.style, Style::Controlled);
    }

    #[test]
    fn fast_cue_shortens_and_energises() {
        let base = bridge();
        let refined = still_refiner().refine(&base, "dynamic tempo", NO_STEPS);
        assert!((refined.duration - base.duration * 0.8).abs() < 1e-5);
        assert_eq!(refined.style, Style::Dynamic);
    }

    #[test]
    fn slow_wins_over_fast() {
        let base = bridge();
        let refined = still_refiner().refine(&base, "slow but dynamic", NO_STEPS);
        assert!(refined.duration > base.duration);
        assert_eq!(refined.style, Style::Controlled);
    }

    #[test]
    fn emphasis_scales_and_clamps() {
        let base = bridge();
        let refined = still_refiner().refine(&base, "focus on the glutes", NO_STEPS);
        for (before, after) in base.keyframes.iter().zip(&refined.keyframes) {
            for (muscle, value) in &before.muscles {
                let expected = (value * 1.25).min(1.0);
                assert!((after.muscles[muscle] - expected).abs() < 1e-6);
                assert!(after.muscles[muscle] <= 1.0);
            }
            assert!(after.emphasis.contains("glutes"));
        }
    }

    #[test]
    fn emphasis_names_whole_words_only() {
        let refined = still_refiner().refine(&bridge(), "focus on the glute, rest on the forearms", NO_STEPS);
        let emphasis = &refined.keyframes[0].emphasis;
        assert!(emphasis.contains("glutes"));
        assert!(!emphasis.contains("arms"));
        assert_eq!(named_muscles("squeeze the core and legs"), vec!["core", "legs"]);
        assert!(named_muscles("backward shoulderblade").is_empty());
    }

    #[test]
    fn breathing_cue_alternates_by_index() {
        let refined = still_refiner().refine(&bridge(), "breathe out as you lift", NO_STEPS);
        let phases: Vec<_> = refined.keyframes.iter().map(|f| f.breathing).collect();
        assert_eq!(phases[0], BreathingPhase::Inhale);
        assert_eq!(phases[1], BreathingPhase::Exhale);
        assert_eq!(phases[2], BreathingPhase::Inhale);
    }

    #[test]
    fn unmatched_text_changes_nothing() {
        let base = bridge();
        let refined = still_refiner().refine(&base, "xyzzy", NO_STEPS);
        assert_eq!(refined, base);
    }

    #[test]
    fn input_is_left_untouched() {
        let base = bridge();
        let copy = base.clone();
        let _ = seeded_refiner(7).refine(&base, "slow, focus on glutes, breathe", &["one", "two"]);
        assert_eq!(base, copy);
    }

    #[test]
    fn captions_fill_only_missing_text() {
        let mut base = bridge();
        for frame in &mut base.keyframes[1..] {
            frame.instruction = None;
        }
        let steps = ["first", "second"];
        let refined = still_refiner().refine(&base, "", &steps);
        assert_eq!(refined.keyframes[0].instruction, base.keyframes[0].instruction);
        assert_eq!(refined.keyframes[1].instruction.as_deref(), Some("first"));
        assert_eq!(refined.keyframes.last().unwrap().instruction.as_deref(), Some("second"));
    }

    #[test]
    fn jitter_is_bounded_and_reproducible() {
        let base = bridge();
        let a = seeded_refiner(42).refine(&base, "", NO_STEPS);
        let b = seeded_refiner(42).refine(&base, "", NO_STEPS);
        assert_eq!(a, b);

        let c = seeded_refiner(43).refine(&base, "", NO_STEPS);
        assert_ne!(a, c);

        for (before, after) in base.keyframes.iter().zip(&a.keyframes) {
            for (name, pose) in &before.joints {
                let delta = after.joints[name].position - pose.position;
                assert!(delta.x.abs() <= 0.5001 && delta.y.abs() <= 0.5001, "{name}");
                assert_eq!(delta.z, 0.0);
                assert_eq!(after.joints[name].rotation, pose.rotation);
            }
        }
    }

    #[test]
    fn jitter_keeps_the_loop_closed() {
        let refined = seeded_refiner(3).refine(&bridge(), "slow, focus", NO_STEPS);
        assert!(refined.is_loop_closed());
        assert!(validate(&refined).is_ok());
    }
}
