use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString};

pub mod muscle;
pub mod skeleton;

pub use muscle::{muscle_group, MuscleGroup, MUSCLE_GROUPS};
pub use skeleton::{joint_by_name, joints, rest_pose, Joint, RotationLimits, JOINT_NAMES};

/// Position and rotation snapshot of a single joint
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct JointPose {
    pub position: Vec3,
    /// Degrees per axis
    pub rotation: Vec3,
}

impl JointPose {
    pub fn new(position: Vec3, rotation: Vec3) -> Self {
        Self { position, rotation }
    }
}

/// Joint name to pose. Every keyframe owns its own map.
pub type PoseMap = BTreeMap<String, JointPose>;
/// Muscle group name to activation in [0, 1]
pub type ActivationMap = BTreeMap<String, f32>;

/// Breathing cue shown alongside a keyframe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BreathingPhase {
    Inhale,
    Exhale,
    Hold,
    #[default]
    None,
}

/// Playback style hint for the renderer's easing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Style {
    Smooth,
    Dynamic,
    Controlled,
}

/// Difficulty requested by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Level {
    Beginner,
    Advanced,
    Expert,
}

impl Level {
    /// Multiplier applied to a template's base duration
    pub fn tempo(self) -> f32 {
        match self {
            Level::Beginner => 1.0,
            Level::Advanced => 0.8,
            Level::Expert => 0.6,
        }
    }

    /// Range of motion and effort scale, 0 for beginners up to 1 for experts
    pub fn intensity(self) -> f32 {
        match self {
            Level::Beginner => 0.0,
            Level::Advanced => 0.5,
            Level::Expert => 1.0,
        }
    }

    pub fn default_style(self) -> Style {
        match self {
            Level::Beginner => Style::Controlled,
            Level::Advanced => Style::Smooth,
            Level::Expert => Style::Dynamic,
        }
    }
}

/// Movement category, each one has a dedicated motion template
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    SpinalFlexion,
    HipBridge,
    Plank,
    Squat,
    Lunge,
    PushUp,
    BirdDog,
    SpinalRotation,
    LateralStretch,
    NeckMobility,
    ArmRaise,
    Generic,
    /// Provided by a scripted template
    Custom(String),
}

impl Archetype {
    /// Built-in archetypes in declaration order
    pub const BUILTIN: [Archetype; 12] = [
        Archetype::SpinalFlexion,
        Archetype::HipBridge,
        Archetype::Plank,
        Archetype::Squat,
        Archetype::Lunge,
        Archetype::PushUp,
        Archetype::BirdDog,
        Archetype::SpinalRotation,
        Archetype::LateralStretch,
        Archetype::NeckMobility,
        Archetype::ArmRaise,
        Archetype::Generic,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Archetype::SpinalFlexion => "spinal_flexion",
            Archetype::HipBridge => "hip_bridge",
            Archetype::Plank => "plank",
            Archetype::Squat => "squat",
            Archetype::Lunge => "lunge",
            Archetype::PushUp => "push_up",
            Archetype::BirdDog => "bird_dog",
            Archetype::SpinalRotation => "spinal_rotation",
            Archetype::LateralStretch => "lateral_stretch",
            Archetype::NeckMobility => "neck_mobility",
            Archetype::ArmRaise => "arm_raise",
            Archetype::Generic => "generic",
            Archetype::Custom(name) => name,
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses built-in tags, anything else is a custom archetype
impl FromStr for Archetype {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Archetype::BUILTIN
            .into_iter()
            .find(|a| a.as_str() == s)
            .unwrap_or_else(|| Archetype::Custom(s.to_string())))
    }
}

/// A single instant of a motion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Fraction of the total duration in [0, 1]
    pub timestamp: f32,
    pub joints: PoseMap,
    pub muscles: ActivationMap,
    pub breathing: BreathingPhase,
    /// Joint and muscle names the renderer highlights
    pub emphasis: BTreeSet<String>,
    /// On-screen caption
    pub instruction: Option<String>,
}

impl Keyframe {
    pub fn new(timestamp: f32, joints: PoseMap) -> Self {
        Self {
            timestamp,
            joints,
            muscles: ActivationMap::new(),
            breathing: BreathingPhase::None,
            emphasis: BTreeSet::new(),
            instruction: None,
        }
    }

    /// Activation of a muscle group, 0 if it is not driven in this frame
    pub fn activation<S: AsRef<str>>(&self, muscle: S) -> f32 {
        self.muscles.get(muscle.as_ref()).copied().unwrap_or(0.0)
    }
}

/// Descriptive data attached to a generated animation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnimationMetadata {
    pub exercise_id: String,
    pub archetype: String,
    pub muscle_groups: Vec<String>,
    pub equipment: Vec<String>,
    pub safety_notes: Vec<String>,
}

/// Output of the synthesis pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedAnimation {
    /// Sorted by timestamp, first at 0 and last at 1
    pub keyframes: Vec<Keyframe>,
    /// Length of one loop in seconds
    pub duration: f32,
    pub style: Style,
    pub difficulty: Level,
    pub metadata: AnimationMetadata,
}

impl GeneratedAnimation {
    /// True if the animation spans [0, 1] and ends in the pose it started from
    pub fn is_loop_closed(&self) -> bool {
        match (self.keyframes.first(), self.keyframes.last()) {
            (Some(first), Some(last)) => {
                self.keyframes.len() >= 2
                    && first.timestamp == 0.0
                    && last.timestamp == 1.0
                    && first.joints == last.joints
            }
            _ => false,
        }
    }

    /// True if the keyframe timestamps never decrease
    pub fn is_sorted(&self) -> bool {
        self.keyframes
            .windows(2)
            .all(|w| w[0].timestamp <= w[1].timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn frame(t: f32) -> Keyframe {
        Keyframe::new(t, rest_pose())
    }

    #[test]
    fn level_parsing() {
        assert_eq!("beginner".parse::<Level>().unwrap(), Level::Beginner);
        assert_eq!("Expert".parse::<Level>().unwrap(), Level::Expert);
        assert!("legendary".parse::<Level>().is_err());
        assert_eq!(Level::Advanced.to_string(), "advanced");
    }

    #[test]
    fn level_tempo_decreases() {
        let tempos: Vec<f32> = Level::iter().map(Level::tempo).collect();
        assert!(tempos.windows(2).all(|w| w[0] > w[1]));
        let range = Level::Beginner.tempo() / Level::Expert.tempo();
        assert!((1.5..=2.0).contains(&range));
    }

    #[test]
    fn archetype_round_trip_through_strings() {
        for a in Archetype::BUILTIN {
            assert_eq!(a.to_string().parse::<Archetype>().unwrap(), a);
        }
        assert_eq!(
            "wall_sit".parse::<Archetype>().unwrap(),
            Archetype::Custom("wall_sit".into())
        );
    }

    #[test]
    fn serialized_tags_are_lowercase() {
        let json = serde_json::to_string(&(Style::Controlled, Level::Expert, BreathingPhase::Hold)).unwrap();
        assert_eq!(json, r#"["controlled","expert","hold"]"#);
        let json = serde_json::to_string(&Archetype::HipBridge).unwrap();
        assert_eq!(json, r#""hip_bridge""#);
    }

    #[test]
    fn loop_closure() {
        let mut animation = GeneratedAnimation {
            keyframes: vec![frame(0.0), frame(0.5), frame(1.0)],
            duration: 4.0,
            style: Style::Smooth,
            difficulty: Level::Beginner,
            metadata: AnimationMetadata::default(),
        };
        assert!(animation.is_loop_closed());
        assert!(animation.is_sorted());

        animation.keyframes[2].joints.get_mut("pelvis").unwrap().position.y += 1.0;
        assert!(!animation.is_loop_closed());

        animation.keyframes.truncate(1);
        assert!(!animation.is_loop_closed());
    }

    #[test]
    fn missing_activation_is_zero() {
        let mut f = frame(0.0);
        f.muscles.insert("core".into(), 0.4);
        assert_eq!(f.activation("core"), 0.4);
        assert_eq!(f.activation("glutes"), 0.0);
    }
}
