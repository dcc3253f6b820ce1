//! Full-body base poses that motion templates start from.
//!
//! Side view postures face +x. Left limbs sit behind the body (z = -6),
//! right limbs in front of it (z = +6), so they overlap on screen.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use stickmotion_common::{rest_pose, JointPose, PoseMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Posture {
    /// Upright, facing the viewer
    Standing,
    /// Upright, seen from the side
    StandingSide,
    /// On the back with knees bent and feet flat
    Supine,
    /// On hands and knees
    Quadruped,
    /// High plank on the hands
    Plank,
}

const AXIAL: [&str; 6] = ["head", "neck", "spine_upper", "spine_middle", "spine_lower", "pelvis"];
const ARM: [&str; 3] = ["shoulder", "elbow", "wrist"];
const LEG: [&str; 3] = ["hip", "knee", "ankle"];

type Points<const N: usize> = [[f32; 2]; N];

fn side_view(axial: Points<6>, arm: Points<3>, leg: Points<3>) -> PoseMap {
    let mut pose = PoseMap::new();
    for (name, [x, y]) in AXIAL.iter().zip(axial) {
        pose.insert(name.to_string(), JointPose::new(Vec3::new(x, y, 0.0), Vec3::ZERO));
    }
    for (names, points) in [(&ARM, arm), (&LEG, leg)] {
        for (name, [x, y]) in names.iter().zip(points) {
            for (side, z) in [("left", -6.0), ("right", 6.0)] {
                pose.insert(
                    format!("{side}_{name}"),
                    JointPose::new(Vec3::new(x, y, z), Vec3::ZERO),
                );
            }
        }
    }
    pose
}

fn set_rotation(pose: &mut PoseMap, names: &[&str], rotation: [f32; 3]) {
    for name in names {
        if let Some(joint) = pose.get_mut(*name) {
            joint.rotation = Vec3::from_array(rotation);
        }
    }
}

impl Posture {
    pub fn pose(self) -> PoseMap {
        match self {
            Posture::Standing => rest_pose(),
            Posture::StandingSide => side_view(
                [[1.0, 92.0], [0.0, 84.0], [0.0, 76.0], [0.0, 66.0], [0.0, 56.0], [0.0, 50.0]],
                [[0.0, 80.0], [0.0, 65.0], [1.0, 51.0]],
                [[0.0, 50.0], [1.0, 27.0], [0.0, 4.0]],
            ),
            Posture::Supine => {
                let mut pose = side_view(
                    [[-48.0, 6.0], [-40.0, 5.0], [-32.0, 4.0], [-22.0, 4.0], [-12.0, 4.0], [-6.0, 4.0]],
                    [[-36.0, 4.0], [-22.0, 3.0], [-9.0, 3.0]],
                    [[-6.0, 4.0], [12.0, 24.0], [22.0, 3.0]],
                );
                set_rotation(&mut pose, &["left_hip", "right_hip"], [50.0, 0.0, 0.0]);
                set_rotation(&mut pose, &["left_knee", "right_knee"], [100.0, 0.0, 0.0]);
                pose
            }
            Posture::Quadruped => {
                let mut pose = side_view(
                    [[36.0, 40.0], [30.0, 37.0], [22.0, 37.0], [10.0, 38.0], [-2.0, 38.0], [-10.0, 37.0]],
                    [[24.0, 37.0], [24.0, 20.0], [24.0, 3.0]],
                    [[-10.0, 37.0], [-10.0, 3.0], [-32.0, 3.0]],
                );
                set_rotation(&mut pose, &["left_shoulder", "right_shoulder"], [90.0, 0.0, 0.0]);
                set_rotation(&mut pose, &["left_hip", "right_hip"], [90.0, 0.0, 0.0]);
                set_rotation(&mut pose, &["left_knee", "right_knee"], [90.0, 0.0, 0.0]);
                set_rotation(&mut pose, &["left_wrist", "right_wrist"], [-70.0, 0.0, 0.0]);
                pose
            }
            Posture::Plank => {
                let mut pose = side_view(
                    [[47.0, 31.0], [40.0, 29.0], [32.0, 27.0], [21.0, 23.5], [10.0, 20.0], [2.0, 18.0]],
                    [[34.0, 27.0], [34.0, 15.0], [34.0, 3.0]],
                    [[2.0, 18.0], [-20.0, 10.5], [-42.0, 3.0]],
                );
                set_rotation(&mut pose, &["left_shoulder", "right_shoulder"], [70.0, 0.0, 0.0]);
                set_rotation(&mut pose, &["left_wrist", "right_wrist"], [-70.0, 0.0, 0.0]);
                pose
            }
        }
    }
}
