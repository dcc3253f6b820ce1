/// Exercise as it arrives from an exercise library
pub struct DemoExercise {
    pub id: &'static str,
    pub name: &'static str,
    pub steps: &'static [&'static str],
    pub instruction: &'static str,
}

pub const DEMO: &[DemoExercise] = &[
    DemoExercise {
        id: "cat-cow",
        name: "Cat Cow",
        steps: &[
            "Start on all fours",
            "Round the spine towards the ceiling",
            "Arch the back and lift the chest",
        ],
        instruction: "Move slowly and breathe with the movement",
    },
    DemoExercise {
        id: "glute-bridge",
        name: "Glute Bridge",
        steps: &["Lie on your back with the knees bent", "Lift the hips", "Lower with control"],
        instruction: "Squeeze the glutes at the top",
    },
    DemoExercise {
        id: "bodyweight-squat",
        name: "Bodyweight Squat",
        steps: &["Feet shoulder width apart", "Sit back and bend the knees", "Stand up"],
        instruction: "",
    },
    DemoExercise {
        id: "bird-dog",
        name: "Bird Dog",
        steps: &["Kneel on all fours", "Extend the opposite arm and leg", "Return and switch"],
        instruction: "Keep the core braced",
    },
    DemoExercise {
        id: "neck-release",
        name: "Neck Release",
        steps: &["Sit tall", "Tilt the head to one side", "Return to the centre"],
        instruction: "gentle",
    },
    DemoExercise {
        id: "wall-sit",
        name: "Wall Sit",
        steps: &["Lean against a wall", "Slide down", "Hold"],
        instruction: "Focus on the legs",
    },
];
