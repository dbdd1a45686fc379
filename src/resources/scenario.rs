//! Initial effect population loaded from JSON.
//!
//! A scenario names a set of entities and the effects each one starts with.
//! The driver spawns one entity per entry with a
//! [`TimedEffects`](crate::components::timedeffects::TimedEffects) component.
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "entities": {
//!     "hero": {
//!       "strength": { "duration_ms": 250, "magnitude": 2.0 },
//!       "poison": { "magnitude": 1.0 }
//!     }
//!   }
//! }
//! ```
//!
//! An effect without `duration_ms` (or with `null`) never expires.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::components::timedeffects::{EffectDuration, TimedEffect, TimedEffects};
use crate::error::ScenarioError;

/// One effect entry in a scenario file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EffectSpec {
    #[serde(default)]
    pub duration_ms: Option<i64>,
    #[serde(default = "default_magnitude")]
    pub magnitude: f32,
}

fn default_magnitude() -> f32 {
    1.0
}

impl From<&EffectSpec> for TimedEffect {
    fn from(spec: &EffectSpec) -> Self {
        TimedEffect {
            remaining: EffectDuration::from(spec.duration_ms),
            magnitude: spec.magnitude,
        }
    }
}

/// Scenario data: entity name to its effects, both sorted by name.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Scenario {
    pub entities: BTreeMap<String, BTreeMap<String, EffectSpec>>,
}

impl Scenario {
    pub fn from_json(text: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Build the starting collection for each entity, in name order.
    pub fn collections(&self) -> impl Iterator<Item = (&str, TimedEffects)> {
        self.entities.iter().map(|(name, effects)| {
            let collection = effects
                .iter()
                .fold(TimedEffects::new(), |acc, (key, spec)| acc.with(key.clone(), spec.into()));
            (name.as_str(), collection)
        })
    }

    /// Generate `count` entities with up to four random effects each.
    ///
    /// About one effect in eight is infinite; finite ones last 50..=3000ms.
    pub fn random(count: usize, rng: &mut fastrand::Rng) -> Self {
        const KEYS: [&str; 6] = ["strength", "poison", "haste", "regen", "shield", "slow"];

        let mut entities = BTreeMap::new();
        for i in 0..count {
            let mut effects = BTreeMap::new();
            for _ in 0..rng.usize(1..=4) {
                let key = KEYS[rng.usize(..KEYS.len())];
                let duration_ms = if rng.u8(..8) == 0 {
                    None
                } else {
                    Some(rng.i64(50..=3000))
                };
                effects.insert(
                    key.to_string(),
                    EffectSpec {
                        duration_ms,
                        magnitude: rng.f32() * 5.0,
                    },
                );
            }
            entities.insert(format!("entity_{i:05}"), effects);
        }
        Scenario { entities }
    }
}
