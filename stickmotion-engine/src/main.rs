use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use motion::{EngineConfig, Keyframe, Level, MotionSynthesizer, Style};

mod catalogue;

#[derive(Parser)]
#[command(version, about = "Stick figure exercise animation generator", long_about = None)]
struct Args {
    /// JSON engine configuration, defaults apply when absent
    #[arg(long, env = "STICKMOTION_CONFIG")]
    config: Option<PathBuf>,

    /// Directory of Lua motion templates
    #[arg(long, env = "STICKMOTION_SCRIPTS", default_value = "scripts")]
    scripts: PathBuf,

    /// Frames emitted per animation loop
    #[arg(long, default_value_t = 24)]
    frames: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the demo catalogue at every level
    Demo,

    /// Render a single exercise
    Synthesize {
        /// Exercise identifier
        id: String,
        /// Display name
        name: String,
        /// Instruction steps, in order
        #[arg(long = "step")]
        steps: Vec<String>,
        /// Free text cue such as "slowly, focus on the glutes"
        #[arg(long, default_value = "")]
        instruction: String,
        #[arg(long, default_value = "beginner")]
        level: Level,
    },
}

/// One output line, an animation resampled for playback
#[derive(Serialize)]
struct Rendered<'a> {
    exercise_id: &'a str,
    archetype: &'a str,
    level: Level,
    style: Style,
    duration: f32,
    frames: Vec<Keyframe>,
}

fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)  // enable everything
        .with_env_filter(EnvFilter::from_default_env())
        .compact()
        .with_file(false)                       // Display source code file paths
        .with_line_number(false)                // Display source code line numbers
        .with_thread_ids(true)                  // Display the thread ID an event was recorded on
        .with_target(false)                     // Don't display the event's target (module path)
        .with_writer(std::io::stderr)           // stdout carries the rendered animations
        .init();                                // sets this to be the default, global collector for this application.
}

/// Register every `.lua` file of a directory, a missing directory is not an error
fn load_scripts(synth: &mut MotionSynthesizer, dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !dir.is_dir() {
        tracing::debug!("no script directory at {}", dir.display());
        return Ok(());
    }

    let mut paths = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<PathBuf>, _>>()?;
    paths.retain(|path| path.extension().is_some_and(|ext| ext == "lua"));
    paths.sort();

    for path in paths {
        let source = std::fs::read_to_string(&path)?;
        match synth.register_script(source) {
            Ok(archetype) => tracing::info!("{} provides {}", path.display(), archetype),
            Err(e) => tracing::error!("skipping {}: {}", path.display(), e),
        }
    }
    Ok(())
}

fn render(
    synth: &MotionSynthesizer,
    frames: usize,
    id: &str,
    name: &str,
    steps: &[String],
    instruction: &str,
    level: Level,
) -> Result<String, Box<dyn std::error::Error>> {
    let animation = synth.synthesize_cached(id, name, steps, instruction, level);
    let rendered = Rendered {
        exercise_id: &animation.metadata.exercise_id,
        archetype: &animation.metadata.archetype,
        level,
        style: animation.style,
        duration: animation.duration,
        frames: synth.resample(&animation.keyframes, frames)?,
    };
    Ok(serde_json::to_string(&rendered)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    let mut synth = MotionSynthesizer::new(config)?;
    load_scripts(&mut synth, &args.scripts)?;

    match args.command {
        Commands::Demo => {
            for exercise in catalogue::DEMO {
                let steps: Vec<String> = exercise.steps.iter().map(|s| s.to_string()).collect();
                for level in [Level::Beginner, Level::Advanced, Level::Expert] {
                    let line = render(
                        &synth,
                        args.frames,
                        exercise.id,
                        exercise.name,
                        &steps,
                        exercise.instruction,
                        level,
                    )?;
                    println!("{line}");
                }
            }
        }
        Commands::Synthesize {
            id,
            name,
            steps,
            instruction,
            level,
        } => {
            let line = render(&synth, args.frames, &id, &name, &steps, &instruction, level)?;
            println!("{line}");
        }
    }

    tracing::debug!("{} animations cached", synth.cache_len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use motion::Archetype;

    #[test]
    fn demo_exercises_are_classified() {
        let mut synth = MotionSynthesizer::default();
        load_scripts(&mut synth, Path::new("../scripts")).unwrap();

        for exercise in catalogue::DEMO {
            let archetype = synth.classify(exercise.id, exercise.name, exercise.steps, exercise.instruction);
            assert_ne!(archetype, Archetype::Generic, "{}", exercise.id);
        }
    }

    #[test]
    fn only_lua_files_are_registered() {
        let dir = std::env::temp_dir().join(format!("stickmotion-scripts-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("wall_sit.lua"), include_str!("../../scripts/wall_sit.lua")).unwrap();
        std::fs::write(dir.join("notes.txt"), "name = ").unwrap();

        let mut synth = MotionSynthesizer::default();
        let loaded = load_scripts(&mut synth, &dir);
        std::fs::remove_dir_all(&dir).unwrap();

        loaded.unwrap();
        assert_eq!(
            synth.classify("wall-sit", "Wall Sit", &[] as &[&str], ""),
            Archetype::Custom("wall_sit".into())
        );
    }

    #[test]
    fn rendered_line_is_json() {
        let synth = MotionSynthesizer::default();
        let steps = vec!["Lie on your back".to_string()];
        let line = render(&synth, 12, "glute-bridge", "Glute Bridge", &steps, "", Level::Advanced).unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["archetype"], "hip_bridge");
        assert_eq!(value["level"], "advanced");
        assert_eq!(value["frames"].as_array().unwrap().len(), 12);
    }

    #[test]
    fn missing_script_directory_is_fine() {
        let mut synth = MotionSynthesizer::default();
        assert!(load_scripts(&mut synth, Path::new("does/not/exist")).is_ok());
    }
}
