use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use stickmotion_common::{Archetype, GeneratedAnimation, Keyframe, Level};

use crate::breathing::BreathingSynchronizer;
use crate::cache::{cache_key, AnimationCache};
use crate::classifier::PatternClassifier;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::interpolate;
use crate::lua::ScriptedTemplate;
use crate::refiner::InstructionRefiner;
use crate::templates::{MotionTemplate, TemplateRegistry};

/// Entry point of the motion pipeline.
///
/// classify -> template -> refine -> breathing, with an optional cache in
/// front. The breathing synchronizer always runs last so its phases are the
/// ones that reach the caller.
pub struct MotionSynthesizer {
    config: EngineConfig,
    classifier: PatternClassifier,
    registry: TemplateRegistry,
    refiner: InstructionRefiner,
    synchronizer: BreathingSynchronizer,
    cache: Mutex<AnimationCache>,
}

impl MotionSynthesizer {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            classifier: PatternClassifier::builtin(),
            registry: TemplateRegistry::builtin(),
            refiner: InstructionRefiner::new(&config),
            synchronizer: BreathingSynchronizer::new(config.breath_cycles),
            cache: Mutex::new(AnimationCache::new(config.cache_capacity)),
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn classify<S: AsRef<str>>(
        &self,
        exercise_id: &str,
        exercise_name: &str,
        steps: &[S],
        instruction: &str,
    ) -> Archetype {
        self.classifier
            .classify(exercise_id, exercise_name, steps, instruction)
    }

    /// Run the whole pipeline, bypassing the cache
    #[tracing::instrument(level = "debug", skip(self, steps, instruction))]
    pub fn synthesize<S: AsRef<str>>(
        &self,
        exercise_id: &str,
        exercise_name: &str,
        steps: &[S],
        instruction: &str,
        level: Level,
    ) -> GeneratedAnimation {
        let archetype = self.classify(exercise_id, exercise_name, steps, instruction);

        let mut animation = self.registry.generate(&archetype, level);
        animation.metadata.exercise_id = exercise_id.to_string();

        let refined = self.refiner.refine(&animation, instruction, steps);
        let result = self.synchronizer.synchronize(&refined, level);

        tracing::debug!(
            "{} -> {} ({} keyframes, {:.2}s, {})",
            exercise_id,
            archetype,
            result.keyframes.len(),
            result.duration,
            result.style
        );
        result
    }

    /// Cached variant of [`Self::synthesize`], keyed by id, level and the
    /// start of the instruction
    pub fn synthesize_cached<S: AsRef<str>>(
        &self,
        exercise_id: &str,
        exercise_name: &str,
        steps: &[S],
        instruction: &str,
        level: Level,
    ) -> Arc<GeneratedAnimation> {
        let key = cache_key(exercise_id, level, instruction);
        if let Some(hit) = self.cache().get(&key) {
            tracing::debug!("cache hit {}", key);
            return hit;
        }

        // The lock is not held while synthesizing, concurrent misses on the
        // same key both compute and the later put wins.
        let animation = Arc::new(self.synthesize(exercise_id, exercise_name, steps, instruction, level));
        self.cache().put(key, animation.clone());
        animation
    }

    pub fn cache_get(&self, key: &str) -> Option<Arc<GeneratedAnimation>> {
        self.cache().get(key)
    }

    pub fn cache_put(&self, key: String, animation: Arc<GeneratedAnimation>) {
        self.cache().put(key, animation);
    }

    pub fn cache_clear(&self) {
        self.cache().clear();
    }

    pub fn cache_len(&self) -> usize {
        self.cache().len()
    }

    pub fn resample(&self, keyframes: &[Keyframe], target_count: usize) -> Result<Vec<Keyframe>> {
        interpolate::resample(keyframes, target_count)
    }

    /// Load a Lua template and make its keywords classifiable
    pub fn register_script<S: AsRef<str>>(&mut self, source: S) -> Result<Archetype> {
        let template = ScriptedTemplate::from_string(source)?;
        Ok(self.register_template(template))
    }

    fn register_template(&mut self, template: ScriptedTemplate) -> Archetype {
        let archetype = template.archetype();
        self.classifier.add(archetype.clone(), template.keywords());
        if self.registry.register(Box::new(template)).is_some() {
            tracing::info!("replaced script template {}", archetype);
        } else {
            tracing::info!("registered script template {}", archetype);
        }
        // cached animations may have been built from the old template
        self.cache().clear();
        archetype
    }

    fn cache(&self) -> MutexGuard<'_, AnimationCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MotionSynthesizer {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            classifier: PatternClassifier::builtin(),
            registry: TemplateRegistry::builtin(),
            refiner: InstructionRefiner::default(),
            synchronizer: BreathingSynchronizer::default(),
            cache: Mutex::new(AnimationCache::default()),
        }
    }
}
