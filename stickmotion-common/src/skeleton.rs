//! Static stick-figure skeleton.
//!
//! Coordinates are canvas units with the origin on the floor below the
//! figure, y pointing up and z toward the viewer. A standing figure is
//! roughly 100 units tall. Rotations are degrees per axis:
//! x is flexion (+) / extension (-), y is axial twist, z is lateral bend.

use glam::Vec3;

use crate::{JointPose, PoseMap};

/// Joint names of the stick figure
pub const JOINT_NAMES: [&str; 18] = [
    "head",
    "neck",
    "spine_upper",
    "spine_middle",
    "spine_lower",
    "pelvis",
    "left_shoulder",
    "left_elbow",
    "left_wrist",
    "right_shoulder",
    "right_elbow",
    "right_wrist",
    "left_hip",
    "left_knee",
    "left_ankle",
    "right_hip",
    "right_knee",
    "right_ankle",
];

/// Per-axis rotation range of a joint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationLimits {
    /// Minimum angle per axis in degrees
    pub min: Vec3,
    /// Maximum angle per axis in degrees
    pub max: Vec3,
    /// Natural resting rotation
    pub rest: Vec3,
}

impl RotationLimits {
    pub const fn new(min: [f32; 3], max: [f32; 3]) -> Self {
        Self {
            min: Vec3::from_array(min),
            max: Vec3::from_array(max),
            rest: Vec3::ZERO,
        }
    }

    pub fn clamp(&self, rotation: Vec3) -> Vec3 {
        rotation.clamp(self.min, self.max)
    }

    pub fn contains(&self, rotation: Vec3) -> bool {
        rotation.cmpge(self.min).all() && rotation.cmple(self.max).all()
    }
}

/// A joint of the reference skeleton.
///
/// Mass, stiffness and damping are descriptive only, nothing integrates them.
#[derive(Debug, Clone)]
pub struct Joint {
    pub name: &'static str,
    /// Position in the standing rest pose
    pub position: Vec3,
    pub rotation: Vec3,
    pub limits: RotationLimits,
    /// Approximate share of body mass carried by the segment
    pub mass: Option<f32>,
    pub stiffness: Option<f32>,
    pub damping: Option<f32>,
    /// Neighbouring joints, the renderer draws a bone for each pair
    pub connections: &'static [&'static str],
}

impl Joint {
    pub fn rest_pose(&self) -> JointPose {
        JointPose::new(self.position, self.rotation)
    }
}

const fn joint(
    name: &'static str,
    position: [f32; 3],
    limits: RotationLimits,
    mass: Option<f32>,
    connections: &'static [&'static str],
) -> Joint {
    Joint {
        name,
        position: Vec3::from_array(position),
        rotation: Vec3::ZERO,
        limits,
        mass,
        stiffness: None,
        damping: None,
        connections,
    }
}

const fn spine(
    name: &'static str,
    position: [f32; 3],
    limits: RotationLimits,
    mass: f32,
    connections: &'static [&'static str],
) -> Joint {
    Joint {
        name,
        position: Vec3::from_array(position),
        rotation: Vec3::ZERO,
        limits,
        mass: Some(mass),
        stiffness: Some(0.8),
        damping: Some(0.6),
        connections,
    }
}

const HEAD_LIMITS: RotationLimits = RotationLimits::new([-50.0, -70.0, -40.0], [60.0, 70.0, 40.0]);
const THORACIC_LIMITS: RotationLimits = RotationLimits::new([-30.0, -35.0, -30.0], [45.0, 35.0, 30.0]);
const LUMBAR_LIMITS: RotationLimits = RotationLimits::new([-30.0, -20.0, -25.0], [60.0, 20.0, 25.0]);
const PELVIS_LIMITS: RotationLimits = RotationLimits::new([-30.0, -45.0, -20.0], [30.0, 45.0, 20.0]);
const SHOULDER_LIMITS: RotationLimits = RotationLimits::new([-60.0, -90.0, -30.0], [180.0, 90.0, 180.0]);
const ELBOW_LIMITS: RotationLimits = RotationLimits::new([0.0, -90.0, 0.0], [150.0, 90.0, 0.0]);
const WRIST_LIMITS: RotationLimits = RotationLimits::new([-70.0, -80.0, -20.0], [80.0, 80.0, 30.0]);
const HIP_LIMITS: RotationLimits = RotationLimits::new([-30.0, -45.0, -30.0], [120.0, 45.0, 45.0]);
const KNEE_LIMITS: RotationLimits = RotationLimits::new([0.0, -10.0, 0.0], [140.0, 10.0, 0.0]);
const ANKLE_LIMITS: RotationLimits = RotationLimits::new([-50.0, -30.0, -20.0], [30.0, 30.0, 20.0]);

static JOINTS: [Joint; 18] = [
    joint("head", [0.0, 92.0, 0.0], HEAD_LIMITS, Some(0.08), &["neck"]),
    joint("neck", [0.0, 84.0, 0.0], HEAD_LIMITS, Some(0.02), &["head", "spine_upper", "left_shoulder", "right_shoulder"]),
    spine("spine_upper", [0.0, 76.0, 0.0], THORACIC_LIMITS, 0.12, &["neck", "spine_middle"]),
    spine("spine_middle", [0.0, 66.0, 0.0], THORACIC_LIMITS, 0.12, &["spine_upper", "spine_lower"]),
    spine("spine_lower", [0.0, 56.0, 0.0], LUMBAR_LIMITS, 0.10, &["spine_middle", "pelvis"]),
    spine("pelvis", [0.0, 50.0, 0.0], PELVIS_LIMITS, 0.14, &["spine_lower", "left_hip", "right_hip"]),
    joint("left_shoulder", [-10.0, 80.0, 0.0], SHOULDER_LIMITS, Some(0.03), &["neck", "left_elbow"]),
    joint("left_elbow", [-12.0, 65.0, 0.0], ELBOW_LIMITS, Some(0.02), &["left_shoulder", "left_wrist"]),
    joint("left_wrist", [-13.0, 51.0, 0.0], WRIST_LIMITS, Some(0.01), &["left_elbow"]),
    joint("right_shoulder", [10.0, 80.0, 0.0], SHOULDER_LIMITS, Some(0.03), &["neck", "right_elbow"]),
    joint("right_elbow", [12.0, 65.0, 0.0], ELBOW_LIMITS, Some(0.02), &["right_shoulder", "right_wrist"]),
    joint("right_wrist", [13.0, 51.0, 0.0], WRIST_LIMITS, Some(0.01), &["right_elbow"]),
    joint("left_hip", [-6.0, 50.0, 0.0], HIP_LIMITS, Some(0.10), &["pelvis", "left_knee"]),
    joint("left_knee", [-6.0, 27.0, 0.0], KNEE_LIMITS, Some(0.05), &["left_hip", "left_ankle"]),
    joint("left_ankle", [-6.0, 4.0, 0.0], ANKLE_LIMITS, None, &["left_knee"]),
    joint("right_hip", [6.0, 50.0, 0.0], HIP_LIMITS, Some(0.10), &["pelvis", "right_knee"]),
    joint("right_knee", [6.0, 27.0, 0.0], KNEE_LIMITS, Some(0.05), &["right_hip", "right_ankle"]),
    joint("right_ankle", [6.0, 4.0, 0.0], ANKLE_LIMITS, None, &["right_knee"]),
];

/// All joints of the reference skeleton
pub fn joints() -> &'static [Joint] {
    &JOINTS
}

/// Look up a joint of the reference skeleton by name
pub fn joint_by_name<S: AsRef<str>>(name: S) -> Option<&'static Joint> {
    JOINTS.iter().find(|j| j.name == name.as_ref())
}

/// The standing rest pose, one independent entry per joint
pub fn rest_pose() -> PoseMap {
    JOINTS
        .iter()
        .map(|j| (j.name.to_string(), j.rest_pose()))
        .collect()
}

/// Every bone as an ordered pair of joint names, each listed once
pub fn bones() -> Vec<(&'static str, &'static str)> {
    let mut result = vec![];
    for (i, j) in JOINTS.iter().enumerate() {
        for other in j.connections {
            if let Some(k) = JOINT_NAMES.iter().position(|n| n == other) {
                if k > i {
                    result.push((j.name, *other));
                }
            }
        }
    }
    result
}
