/// A named muscle group and the joints it moves.
/// Activation is stored per keyframe, never on the group.
#[derive(Debug, Clone)]
pub struct MuscleGroup {
    pub name: &'static str,
    pub joints: &'static [&'static str],
    /// Display color as a css hex string
    pub color: &'static str,
    pub description: &'static str,
}

pub static MUSCLE_GROUPS: [MuscleGroup; 8] = [
    MuscleGroup {
        name: "core",
        joints: &["spine_middle", "spine_lower", "pelvis"],
        color: "#f59e0b",
        description: "Stabilises the trunk and transfers force between upper and lower body",
    },
    MuscleGroup {
        name: "glutes",
        joints: &["pelvis", "left_hip", "right_hip"],
        color: "#ef4444",
        description: "Extends and stabilises the hips",
    },
    MuscleGroup {
        name: "back",
        joints: &["spine_upper", "spine_middle", "spine_lower"],
        color: "#8b5cf6",
        description: "Extends the spine and holds posture",
    },
    MuscleGroup {
        name: "arms",
        joints: &["left_elbow", "left_wrist", "right_elbow", "right_wrist"],
        color: "#10b981",
        description: "Bends and straightens the elbows",
    },
    MuscleGroup {
        name: "legs",
        joints: &["left_hip", "left_knee", "left_ankle", "right_hip", "right_knee", "right_ankle"],
        color: "#3b82f6",
        description: "Carries body weight and drives knee and ankle motion",
    },
    MuscleGroup {
        name: "shoulders",
        joints: &["left_shoulder", "right_shoulder", "neck"],
        color: "#ec4899",
        description: "Raises and rotates the arms",
    },
    MuscleGroup {
        name: "chest",
        joints: &["spine_upper", "left_shoulder", "right_shoulder"],
        color: "#f97316",
        description: "Pushes the arms forward and together",
    },
    MuscleGroup {
        name: "neck",
        joints: &["head", "neck"],
        color: "#14b8a6",
        description: "Moves and supports the head",
    },
];

pub fn muscle_group<S: AsRef<str>>(name: S) -> Option<&'static MuscleGroup> {
    MUSCLE_GROUPS.iter().find(|m| m.name == name.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skeleton::joint_by_name;

    #[test]
    fn muscle_joints_exist() {
        for group in &MUSCLE_GROUPS {
            for j in group.joints {
                assert!(joint_by_name(j).is_some(), "{} references {}", group.name, j);
            }
        }
    }

    #[test]
    fn lookup() {
        assert_eq!(muscle_group("glutes").map(|m| m.color), Some("#ef4444"));
        assert!(muscle_group("calves").is_none());
    }
}
