//! Motion synthesis for stick-figure exercise animations.
//!
//! Free exercise text is classified into a movement archetype, the matching
//! template produces a short looping keyframe animation for the requested
//! level, the instruction text refines it and breathing phases are assigned
//! from time. Renderers resample the keyframes to their frame rate.

pub mod breathing;
pub mod cache;
pub mod classifier;
pub mod config;
pub mod error;
pub mod interpolate;
pub mod lua;
pub mod posture;
pub mod refiner;
pub mod synth;
pub mod templates;

pub use breathing::BreathingSynchronizer;
pub use cache::{cache_key, AnimationCache};
pub use classifier::PatternClassifier;
pub use config::{BreathCycles, EngineConfig};
pub use error::{MotionError, Result};
pub use interpolate::{resample, sample};
pub use lua::ScriptedTemplate;
pub use posture::Posture;
pub use refiner::InstructionRefiner;
pub use synth::MotionSynthesizer;
pub use templates::{MotionTemplate, TemplateRegistry};

pub use stickmotion_common::*;
