//! Motion template library.
//!
//! Every archetype has one template that turns a difficulty level into a
//! short looping animation. Templates are looked up through a registry so the
//! classifier and the generators only share the archetype tag.

use glam::Vec3;
use std::collections::HashMap;

use stickmotion_common::{
    joint_by_name, muscle_group, AnimationMetadata, Archetype, GeneratedAnimation, Keyframe, Level,
};

use crate::posture::Posture;

mod floor;
mod standing;

/// Types that implement this trait can produce the base
/// animation of an archetype for any difficulty level.
pub trait MotionTemplate: Send + Sync {
    fn archetype(&self) -> Archetype;
    fn generate(&self, level: Level) -> GeneratedAnimation;
}

/// Hand-authored template backed by a plain function
pub struct BuiltinTemplate {
    archetype: Archetype,
    generator: fn(Level) -> GeneratedAnimation,
}

impl BuiltinTemplate {
    pub fn new(archetype: Archetype, generator: fn(Level) -> GeneratedAnimation) -> Self {
        Self { archetype, generator }
    }
}

impl MotionTemplate for BuiltinTemplate {
    fn archetype(&self) -> Archetype {
        self.archetype.clone()
    }

    fn generate(&self, level: Level) -> GeneratedAnimation {
        (self.generator)(level)
    }
}

/// Archetype to template lookup with a guaranteed generic fallback
pub struct TemplateRegistry {
    templates: HashMap<Archetype, Box<dyn MotionTemplate>>,
    fallback: BuiltinTemplate,
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TemplateRegistry {
    /// Registry holding every hand-authored template
    pub fn builtin() -> Self {
        let builtins: [(Archetype, fn(Level) -> GeneratedAnimation); 11] = [
            (Archetype::SpinalFlexion, floor::spinal_flexion),
            (Archetype::HipBridge, floor::hip_bridge),
            (Archetype::Plank, floor::plank),
            (Archetype::PushUp, floor::push_up),
            (Archetype::BirdDog, floor::bird_dog),
            (Archetype::Squat, standing::squat),
            (Archetype::Lunge, standing::lunge),
            (Archetype::SpinalRotation, standing::spinal_rotation),
            (Archetype::LateralStretch, standing::lateral_stretch),
            (Archetype::NeckMobility, standing::neck_mobility),
            (Archetype::ArmRaise, standing::arm_raise),
        ];

        let mut registry = Self {
            templates: HashMap::new(),
            fallback: BuiltinTemplate::new(Archetype::Generic, standing::generic),
        };
        for (archetype, generator) in builtins {
            registry.register(Box::new(BuiltinTemplate::new(archetype, generator)));
        }
        registry
    }

    /// Add a template, returning the one it replaces
    pub fn register(&mut self, template: Box<dyn MotionTemplate>) -> Option<Box<dyn MotionTemplate>> {
        let archetype = template.archetype();
        tracing::debug!("registering template {}", archetype);
        self.templates.insert(archetype, template)
    }

    pub fn contains(&self, archetype: &Archetype) -> bool {
        *archetype == Archetype::Generic || self.templates.contains_key(archetype)
    }

    /// Template of an archetype, the generic one when nothing is registered for it
    pub fn resolve(&self, archetype: &Archetype) -> &dyn MotionTemplate {
        match self.templates.get(archetype) {
            Some(template) => template.as_ref(),
            None => {
                if *archetype != Archetype::Generic {
                    tracing::debug!("no template for {}, using generic", archetype);
                }
                &self.fallback
            }
        }
    }

    pub fn generate(&self, archetype: &Archetype, level: Level) -> GeneratedAnimation {
        self.resolve(archetype).generate(level)
    }
}

/// Fixed facts about a hand-authored template
pub(crate) struct TemplateInfo {
    pub archetype: Archetype,
    /// Loop length in seconds at beginner level
    pub base_duration: f32,
    pub muscles: &'static [&'static str],
    pub equipment: &'static [&'static str],
    pub safety: &'static [&'static str],
}

/// Turn authored keyframes into an animation. The closing keyframe at
/// timestamp 1 is a copy of the opening one so the loop is seamless.
pub(crate) fn assemble(info: TemplateInfo, level: Level, mut keyframes: Vec<Keyframe>) -> GeneratedAnimation {
    if let Some(first) = keyframes.first() {
        let mut closing = first.clone();
        closing.timestamp = 1.0;
        keyframes.push(closing);
    }

    let to_strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    GeneratedAnimation {
        keyframes,
        duration: info.base_duration * level.tempo(),
        style: level.default_style(),
        difficulty: level,
        metadata: AnimationMetadata {
            exercise_id: String::new(),
            archetype: info.archetype.to_string(),
            muscle_groups: to_strings(info.muscles),
            equipment: to_strings(info.equipment),
            safety_notes: to_strings(info.safety),
        },
    }
}

/// Builds one keyframe on top of a posture.
/// Rotations are clamped to the skeleton limits and activations to [0, 1].
pub(crate) struct FrameBuilder(Keyframe);

impl FrameBuilder {
    pub fn new(timestamp: f32, posture: Posture) -> Self {
        Self(Keyframe::new(timestamp, posture.pose()))
    }

    pub fn shift(mut self, joint: &str, dx: f32, dy: f32) -> Self {
        if let Some(pose) = self.0.joints.get_mut(joint) {
            pose.position += Vec3::new(dx, dy, 0.0);
        }
        self
    }

    pub fn shift_many(self, joints: &[&str], dx: f32, dy: f32) -> Self {
        joints.iter().fold(self, |frame, joint| frame.shift(joint, dx, dy))
    }

    /// Shift the left and right joint of a pair
    pub fn shift_both(self, joint: &str, dx: f32, dy: f32) -> Self {
        self.shift(&format!("left_{joint}"), dx, dy)
            .shift(&format!("right_{joint}"), dx, dy)
    }

    /// Move a joint to an absolute x, y keeping its depth
    pub fn place(mut self, joint: &str, x: f32, y: f32) -> Self {
        if let Some(pose) = self.0.joints.get_mut(joint) {
            pose.position.x = x;
            pose.position.y = y;
        }
        self
    }

    pub fn place_both(self, joint: &str, x: f32, y: f32) -> Self {
        self.place(&format!("left_{joint}"), x, y)
            .place(&format!("right_{joint}"), x, y)
    }

    /// Front view pair placement, the left joint is mirrored to -x
    pub fn place_mirrored(self, joint: &str, x: f32, y: f32) -> Self {
        self.place(&format!("left_{joint}"), -x, y)
            .place(&format!("right_{joint}"), x, y)
    }

    pub fn rotate(mut self, joint: &str, x: f32, y: f32, z: f32) -> Self {
        if let Some(pose) = self.0.joints.get_mut(joint) {
            let rotation = Vec3::new(x, y, z);
            pose.rotation = match joint_by_name(joint) {
                Some(j) => j.limits.clamp(rotation),
                None => rotation,
            };
        }
        self
    }

    pub fn rotate_both(self, joint: &str, x: f32, y: f32, z: f32) -> Self {
        self.rotate(&format!("left_{joint}"), x, y, z)
            .rotate(&format!("right_{joint}"), x, y, z)
    }

    pub fn muscle(mut self, name: &str, activation: f32) -> Self {
        self.0.muscles.insert(name.to_string(), activation.clamp(0.0, 1.0));
        self
    }

    pub fn emphasize(mut self, name: &str) -> Self {
        self.0.emphasis.insert(name.to_string());
        self
    }

    pub fn caption(mut self, text: &str) -> Self {
        self.0.instruction = Some(text.to_string());
        self
    }

    pub fn build(self) -> Keyframe {
        self.0
    }
}

/// Check the structural guarantees every template output must keep:
/// ordered timestamps from 0 to 1, closed loop, known joints and muscles,
/// rotations within limits and activations within [0, 1].
pub fn validate(animation: &GeneratedAnimation) -> Result<(), String> {
    if animation.keyframes.len() < 2 {
        return Err(format!("expected at least 2 keyframes, got {}", animation.keyframes.len()));
    }
    if !(animation.duration.is_finite() && animation.duration > 0.0) {
        return Err(format!("duration must be positive, got {}", animation.duration));
    }
    if !animation.is_sorted() {
        return Err("keyframes are not sorted by timestamp".into());
    }
    if !animation.is_loop_closed() {
        return Err("first and last keyframe must sit at 0 and 1 with the same pose".into());
    }

    for frame in &animation.keyframes {
        if !(0.0..=1.0).contains(&frame.timestamp) {
            return Err(format!("timestamp {} outside [0, 1]", frame.timestamp));
        }
        for (name, pose) in &frame.joints {
            let joint = joint_by_name(name).ok_or_else(|| format!("unknown joint `{name}`"))?;
            if !joint.limits.contains(pose.rotation) {
                return Err(format!(
                    "rotation {:?} of `{name}` at t={} exceeds its limits",
                    pose.rotation, frame.timestamp
                ));
            }
        }
        for (name, activation) in &frame.muscles {
            if muscle_group(name).is_none() {
                return Err(format!("unknown muscle group `{name}`"));
            }
            if !(0.0..=1.0).contains(activation) {
                return Err(format!("activation {activation} of `{name}` outside [0, 1]"));
            }
        }
    }
    Ok(())
}
