//! Motion templates authored as Lua scripts.
//!
//! A script defines three globals:
//!
//! ```lua
//! name = "wall_sit"
//! keywords = { "wall sit", "wall" }
//! function generate(level)  -- level = { name, tempo, intensity }
//!     return { duration = 10 * level.tempo, posture = "standing_side", keyframes = { ... } }
//! end
//! ```
//!
//! Every keyframe lists the joints it changes, either with an absolute
//! `position` or an `offset` from the posture, plus an optional `rotation`.
//! Joints it does not list keep the posture's value. `generate` runs once per
//! level when the script is loaded, the results are validated and kept, so
//! no Lua state outlives loading.

use glam::Vec3;
use mlua::prelude::*;
use std::path::Path;
use std::str::FromStr;

use stickmotion_common::{
    ActivationMap, AnimationMetadata, Archetype, GeneratedAnimation, Keyframe, Level, Style,
};

use crate::error::{MotionError, Result};
use crate::posture::Posture;
use crate::templates::{validate, MotionTemplate};

/// Accepts both `{ x = 1, y = 2, z = 3 }` and `{ 1, 2, 3 }`, a missing z is 0
#[derive(Debug, Clone, Copy)]
struct LuaVec3(Vec3);

impl FromLua for LuaVec3 {
    fn from_lua(value: LuaValue, _: &Lua) -> LuaResult<Self> {
        match value {
            LuaValue::Table(t) => {
                let x: Option<f32> = t.get("x")?;
                Ok(LuaVec3(match x {
                    Some(x) => Vec3::new(x, t.get("y")?, t.get::<Option<f32>>("z")?.unwrap_or(0.0)),
                    None => Vec3::new(t.get(1)?, t.get(2)?, t.get::<Option<f32>>(3)?.unwrap_or(0.0)),
                }))
            }
            other => Err(LuaError::RuntimeError(format!(
                "expected a vector table, got {}",
                other.type_name()
            ))),
        }
    }
}

/// Level as seen by scripts
fn level_table(lua: &Lua, level: Level) -> LuaResult<LuaTable> {
    let t = lua.create_table()?;
    t.set("name", level.to_string())?;
    t.set("tempo", level.tempo())?;
    t.set("intensity", level.intensity())?;
    Ok(t)
}

fn parse<T: FromStr>(what: &str, value: &str) -> LuaResult<T> {
    value
        .parse()
        .map_err(|_| LuaError::RuntimeError(format!("unknown {what} `{value}`")))
}

fn keyframe_from_table(t: LuaTable, posture: Posture) -> LuaResult<Keyframe> {
    let mut frame = Keyframe::new(t.get("timestamp")?, posture.pose());

    if let Some(joints) = t.get::<Option<LuaTable>>("joints")? {
        for pair in joints.pairs::<String, LuaTable>() {
            let (name, entry) = pair?;
            let pose = frame.joints.entry(name).or_default();
            if let Some(LuaVec3(position)) = entry.get::<Option<LuaVec3>>("position")? {
                pose.position = position;
            }
            if let Some(LuaVec3(offset)) = entry.get::<Option<LuaVec3>>("offset")? {
                pose.position += offset;
            }
            if let Some(LuaVec3(rotation)) = entry.get::<Option<LuaVec3>>("rotation")? {
                pose.rotation = rotation;
            }
        }
    }

    if let Some(muscles) = t.get::<Option<ActivationMap>>("muscles")? {
        frame.muscles = muscles;
    }
    if let Some(emphasis) = t.get::<Option<Vec<String>>>("emphasis")? {
        frame.emphasis.extend(emphasis);
    }
    frame.instruction = t.get("caption")?;
    Ok(frame)
}

fn animation_from_table(t: LuaTable, archetype: &Archetype, level: Level) -> LuaResult<GeneratedAnimation> {
    let posture: Posture = parse("posture", &t.get::<String>("posture")?)?;
    let style = match t.get::<Option<String>>("style")? {
        Some(style) => parse::<Style>("style", &style)?,
        None => level.default_style(),
    };

    let keyframes = t
        .get::<LuaTable>("keyframes")?
        .sequence_values::<LuaTable>()
        .map(|frame| keyframe_from_table(frame?, posture))
        .collect::<LuaResult<Vec<_>>>()?;

    let strings = |key: &str| -> LuaResult<Vec<String>> {
        Ok(t.get::<Option<Vec<String>>>(key)?.unwrap_or_default())
    };

    Ok(GeneratedAnimation {
        keyframes,
        duration: t.get("duration")?,
        style,
        difficulty: level,
        metadata: AnimationMetadata {
            exercise_id: String::new(),
            archetype: archetype.to_string(),
            muscle_groups: strings("muscles_involved")?,
            equipment: strings("equipment")?,
            safety_notes: strings("safety")?,
        },
    })
}

/// Template loaded from a Lua script, with one precomputed animation per level
#[derive(Debug, Clone)]
pub struct ScriptedTemplate {
    archetype: Archetype,
    keywords: Vec<String>,
    beginner: GeneratedAnimation,
    advanced: GeneratedAnimation,
    expert: GeneratedAnimation,
}

impl ScriptedTemplate {
    pub fn from_file<P: AsRef<Path>>(filepath: P) -> Result<Self> {
        let source = std::fs::read_to_string(filepath.as_ref())?;
        Self::from_string(source)
    }

    /// Evaluate a script and validate what it generates for every level
    pub fn from_string<S: AsRef<str>>(source: S) -> Result<Self> {
        let lua = Lua::new();
        lua.load(source.as_ref()).set_name("template").exec()?;

        let globals = lua.globals();
        let name: String = globals.get("name")?;
        let keywords: Vec<String> = globals.get::<Option<Vec<String>>>("keywords")?.unwrap_or_default();
        let archetype = Archetype::Custom(name.clone());

        let reject = |reason: String| {
            tracing::warn!("script template {} rejected: {}", name, reason);
            MotionError::Script {
                name: name.clone(),
                reason,
            }
        };

        if Archetype::BUILTIN.iter().any(|a| a.as_str() == name) {
            return Err(reject("name clashes with a built-in archetype".into()));
        }

        let generate: LuaFunction = globals
            .get::<Option<LuaFunction>>("generate")?
            .ok_or_else(|| reject("missing `generate` function".into()))?;

        let build = |level: Level| -> Result<GeneratedAnimation> {
            let animation = generate
                .call::<LuaTable>(level_table(&lua, level)?)
                .and_then(|t| animation_from_table(t, &archetype, level))
                .map_err(|e| reject(format!("{level}: {e}")))?;
            validate(&animation).map_err(|reason| reject(format!("{level}: {reason}")))?;
            Ok(animation)
        };

        let beginner = build(Level::Beginner)?;
        let advanced = build(Level::Advanced)?;
        let expert = build(Level::Expert)?;

        tracing::info!("loaded script template {} ({} keywords)", name, keywords.len());
        Ok(Self {
            archetype,
            keywords,
            beginner,
            advanced,
            expert,
        })
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

impl MotionTemplate for ScriptedTemplate {
    fn archetype(&self) -> Archetype {
        self.archetype.clone()
    }

    fn generate(&self, level: Level) -> GeneratedAnimation {
        match level {
            Level::Beginner => self.beginner.clone(),
            Level::Advanced => self.advanced.clone(),
            Level::Expert => self.expert.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARCH: &str = r#"
        name = "march"
        keywords = { "march", "knee lift" }

        local function frame(t, lift, level)
            return {
                timestamp = t,
                joints = {
                    right_knee = { offset = { 6 * lift, 10 * lift }, rotation = { 90 * lift, 0, 0 } },
                    right_hip = { rotation = { x = 80 * lift, y = 0, z = 0 } },
                },
                muscles = { legs = 0.3 + 0.4 * lift * (0.5 + level.intensity / 2), core = 0.3 },
                emphasis = lift > 0 and { "legs" } or nil,
            }
        end

        function generate(level)
            return {
                duration = 4 * level.tempo,
                posture = "standing_side",
                muscles_involved = { "legs", "core" },
                keyframes = {
                    frame(0.0, 0, level),
                    frame(0.5, 1, level),
                    frame(1.0, 0, level),
                },
            }
        end
    "#;

    #[test]
    fn loads_valid_script() {
        let template = ScriptedTemplate::from_string(MARCH).unwrap();
        assert_eq!(template.archetype(), Archetype::Custom("march".into()));
        assert_eq!(template.keywords(), ["march", "knee lift"]);

        let expert = template.generate(Level::Expert);
        assert_eq!(expert.difficulty, Level::Expert);
        assert_eq!(expert.style, Style::Dynamic);
        assert!((expert.duration - 2.4).abs() < 1e-5);
        assert_eq!(expert.keyframes.len(), 3);
        assert_eq!(expert.metadata.archetype, "march");
        assert_eq!(expert.metadata.muscle_groups, ["legs", "core"]);
        assert!(expert.keyframes[1].emphasis.contains("legs"));
        assert!(expert.is_loop_closed());
    }

    #[test]
    fn unlisted_joints_keep_the_posture() {
        let template = ScriptedTemplate::from_string(MARCH).unwrap();
        let animation = template.generate(Level::Beginner);
        let base = Posture::StandingSide.pose();
        let lifted = &animation.keyframes[1];
        assert_eq!(lifted.joints["left_knee"], base["left_knee"]);
        assert_eq!(lifted.joints.len(), base.len());
        assert_eq!(
            lifted.joints["right_knee"].position,
            base["right_knee"].position + Vec3::new(6.0, 10.0, 0.0)
        );
        assert_eq!(lifted.joints["right_hip"].rotation, Vec3::new(80.0, 0.0, 0.0));
    }

    #[test]
    fn levels_scale_intensity() {
        let template = ScriptedTemplate::from_string(MARCH).unwrap();
        let beginner = template.generate(Level::Beginner).keyframes[1].activation("legs");
        let expert = template.generate(Level::Expert).keyframes[1].activation("legs");
        assert!(expert > beginner);
    }

    #[test]
    fn rejects_rotation_beyond_limits() {
        let source = MARCH.replace("90 * lift", "170 * lift");
        match ScriptedTemplate::from_string(source) {
            Err(MotionError::Script { name, reason }) => {
                assert_eq!(name, "march");
                assert!(reason.contains("right_knee"), "{reason}");
            }
            other => panic!("expected a script error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_open_loop() {
        let source = MARCH.replace("frame(1.0, 0, level)", "frame(1.0, 1, level)");
        assert!(matches!(
            ScriptedTemplate::from_string(source),
            Err(MotionError::Script { .. })
        ));
    }

    #[test]
    fn rejects_unknown_joint() {
        let source = MARCH.replace("right_hip = ", "tail = ");
        match ScriptedTemplate::from_string(source) {
            Err(MotionError::Script { reason, .. }) => assert!(reason.contains("tail"), "{reason}"),
            other => panic!("expected a script error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_posture() {
        let source = MARCH.replace("standing_side", "handstand");
        match ScriptedTemplate::from_string(source) {
            Err(MotionError::Script { reason, .. }) => assert!(reason.contains("handstand"), "{reason}"),
            other => panic!("expected a script error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_builtin_names() {
        let source = MARCH.replace(r#"name = "march""#, r#"name = "squat""#);
        assert!(matches!(
            ScriptedTemplate::from_string(source),
            Err(MotionError::Script { .. })
        ));
    }

    #[test]
    fn rejects_missing_generate() {
        let source = r#"name = "empty""#;
        assert!(matches!(
            ScriptedTemplate::from_string(source),
            Err(MotionError::Script { .. })
        ));
    }

    #[test]
    fn syntax_errors_surface_as_lua_errors() {
        assert!(matches!(
            ScriptedTemplate::from_string("name = "),
            Err(MotionError::Lua(_))
        ));
    }
}
