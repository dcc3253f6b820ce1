use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use stickmotion_common::{GeneratedAnimation, Level};

pub const DEFAULT_CAPACITY: usize = 50;

/// Characters of the instruction that take part in the cache key.
/// Instructions sharing this prefix share a cache entry.
pub const KEY_INSTRUCTION_PREFIX: usize = 50;

/// Cache key of a synthesis request
pub fn cache_key(exercise_id: &str, level: Level, instruction: &str) -> String {
    let prefix: String = instruction.chars().take(KEY_INSTRUCTION_PREFIX).collect();
    format!("{exercise_id}:{level}:{prefix}")
}

/// Bounded animation store with first-in first-out eviction.
///
/// Lookups do not refresh an entry, the oldest insertion is always the next
/// one to go. Storing under an existing key replaces the value and keeps the
/// original insertion position.
#[derive(Debug)]
pub struct AnimationCache {
    capacity: usize,
    entries: HashMap<String, Arc<GeneratedAnimation>>,
    order: VecDeque<String>,
}

impl Default for AnimationCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl AnimationCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    pub fn get(&self, key: &str) -> Option<Arc<GeneratedAnimation>> {
        self.entries.get(key).cloned()
    }

    pub fn put(&mut self, key: String, animation: Arc<GeneratedAnimation>) {
        if self.capacity == 0 {
            return;
        }

        if let Some(slot) = self.entries.get_mut(&key) {
            *slot = animation;
            return;
        }

        if self.entries.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
                tracing::info!("cache full, evicted {}", oldest);
            }
        }

        self.order.push_back(key.clone());
        self.entries.insert(key, animation);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
