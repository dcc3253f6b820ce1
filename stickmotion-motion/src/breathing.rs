use stickmotion_common::{BreathingPhase, GeneratedAnimation, Level};

use crate::config::BreathCycles;

/// Share of a breath cycle spent inhaling
const INHALE_SHARE: f32 = 0.4;
/// Share of a breath cycle spent inhaling and exhaling, the rest is a hold
const EXHALE_END: f32 = 0.8;

/// Assigns breathing phases from keyframe time alone.
/// It is the final authority on breathing in the synthesis pipeline.
#[derive(Debug, Clone, Default)]
pub struct BreathingSynchronizer {
    cycles: BreathCycles,
}

impl BreathingSynchronizer {
    pub fn new(cycles: BreathCycles) -> Self {
        Self { cycles }
    }

    pub fn cycle_length(&self, level: Level) -> f32 {
        self.cycles.for_level(level)
    }

    /// Phase at a point in time, in seconds from the start of the loop
    pub fn phase_at(&self, seconds: f32, level: Level) -> BreathingPhase {
        let cycle = self.cycle_length(level);
        let fraction = seconds.rem_euclid(cycle) / cycle;
        if fraction < INHALE_SHARE {
            BreathingPhase::Inhale
        } else if fraction < EXHALE_END {
            BreathingPhase::Exhale
        } else {
            BreathingPhase::Hold
        }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(level = %level))]
    pub fn synchronize(&self, animation: &GeneratedAnimation, level: Level) -> GeneratedAnimation {
        let mut result = animation.clone();
        for frame in &mut result.keyframes {
            frame.breathing = self.phase_at(frame.timestamp * result.duration, level);
            tracing::trace!("t={:.3} {}", frame.timestamp, frame.breathing);
        }
        result
    }
}
