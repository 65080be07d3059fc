//! Enemy data loading from RON files.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::animation::AnimationConfig;
use super::components::EnemyStats;
use crate::core::{load_ron, DataLoadError, DATA_DIR};
use crate::pickups::LootDrop;

/// Name of the built-in enemy used when no data files are present.
pub const FALLBACK_ENEMY_TYPE: &str = "grunt";

/// Collider configuration for an enemy type.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct ColliderConfig {
    pub half_height: f32,
    pub radius: f32,
}

impl Default for ColliderConfig {
    fn default() -> Self {
        Self {
            half_height: 0.5,
            radius: 0.4,
        }
    }
}

/// Enemy definition loaded from RON file.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct EnemyDefinition {
    pub name: String,
    #[serde(default)]
    pub stats: EnemyStats,
    #[serde(default)]
    pub model_path: Option<String>,
    #[serde(default = "default_scale")]
    pub scale: f32,
    #[serde(default)]
    pub collider: Option<ColliderConfig>,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub loot: Vec<LootDrop>,
}

fn default_scale() -> f32 {
    1.0
}

impl Default for EnemyDefinition {
    fn default() -> Self {
        Self {
            name: "Grunt".to_string(),
            stats: EnemyStats::default(),
            model_path: None,
            scale: default_scale(),
            collider: None,
            animation: AnimationConfig::default(),
            loot: Vec::new(),
        }
    }
}

impl EnemyDefinition {
    /// Reject values the state machine cannot work with.
    pub fn validate(&self, path: &Path) -> Result<(), DataLoadError> {
        let invalid = |field: &'static str, details: String| DataLoadError::InvalidValue {
            path: path.display().to_string(),
            field,
            details,
        };

        if self.stats.max_health <= 0.0 {
            return Err(invalid("max_health", format!("{} must be positive", self.stats.max_health)));
        }
        if self.stats.attack_range < 0.0 || self.stats.chase_range < 0.0 {
            return Err(invalid("range", "ranges must not be negative".to_string()));
        }
        if self.stats.attack_cooldown < 0.0 {
            return Err(invalid("attack_cooldown", format!("{} is negative", self.stats.attack_cooldown)));
        }
        if let Some(drop) = self.loot.iter().find(|drop| !(0.0..=100.0).contains(&drop.chance)) {
            return Err(invalid("loot", format!("drop chance {} outside 0-100", drop.chance)));
        }
        Ok(())
    }
}

/// Resource holding all loaded enemy definitions.
#[derive(Resource, Default)]
pub struct EnemyRegistry {
    pub definitions: BTreeMap<String, EnemyDefinition>,
}

impl EnemyRegistry {
    /// Get an enemy definition by type name.
    pub fn get(&self, enemy_type: &str) -> Option<&EnemyDefinition> {
        self.definitions.get(enemy_type)
    }

    pub fn require(&self, enemy_type: &str) -> Result<&EnemyDefinition, DataLoadError> {
        self.get(enemy_type)
            .ok_or_else(|| DataLoadError::UnknownEnemyType(enemy_type.to_string()))
    }
}

/// Read and validate one definition file.
pub fn load_enemy_definition(path: &Path) -> Result<EnemyDefinition, DataLoadError> {
    let definition: EnemyDefinition = load_ron(path)?;
    definition.validate(path)?;
    Ok(definition)
}

/// Load all enemy definitions from the assets/data/enemies/ directory.
pub fn load_enemy_definitions(mut registry: ResMut<EnemyRegistry>) {
    let enemies_dir = Path::new(DATA_DIR).join("enemies");

    match fs::read_dir(&enemies_dir) {
        Ok(entries) => {
            for entry in entries.flatten() {
                let path = entry.path();
                if !path.extension().is_some_and(|ext| ext == "ron") {
                    continue;
                }

                let enemy_type = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("unknown")
                    .to_string();

                match load_enemy_definition(&path) {
                    Ok(definition) => {
                        info!("Loaded enemy definition: {} ({})", definition.name, enemy_type);
                        registry.definitions.insert(enemy_type, definition);
                    }
                    Err(e) => error!("{}", e),
                }
            }
        }
        Err(e) => warn!("Enemy definitions directory {:?} unreadable: {}", enemies_dir, e),
    }

    if registry.definitions.is_empty() {
        warn!("No enemy definitions loaded, using built-in '{}'", FALLBACK_ENEMY_TYPE);
        registry
            .definitions
            .insert(FALLBACK_ENEMY_TYPE.to_string(), EnemyDefinition::default());
    }

    info!("Loaded {} enemy definitions", registry.definitions.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parse_ron;
    use crate::pickups::CollectibleKind;

    const GRUNT: &str = r#"(
        name: "Grunt",
        stats: (
            max_health: 80.0,
            attack_range: 2.5,
        ),
        model_path: Some("models/enemies/grunt.glb#Scene0"),
        animation: (attack_duration: 1.2, attack_hit_frame: 0.4),
        loot: [
            (item: (kind: Provisions, value: 100), chance: 50.0),
        ],
    )"#;

    #[test]
    fn test_definition_parses_with_defaults() {
        let definition: EnemyDefinition = parse_ron(GRUNT, Path::new("grunt.ron")).unwrap();
        assert_eq!(definition.stats.max_health, 80.0);
        assert_eq!(definition.stats.attack_range, 2.5);
        // Unspecified stats keep their defaults
        assert_eq!(definition.stats.chase_range, 10.0);
        assert_eq!(definition.scale, 1.0);
        assert_eq!(definition.loot.len(), 1);
        assert_eq!(definition.loot[0].item.kind, CollectibleKind::Provisions);
    }

    #[test]
    fn test_validate_rejects_non_positive_health() {
        let mut definition = EnemyDefinition::default();
        definition.stats.max_health = 0.0;
        let err = definition.validate(Path::new("bad.ron")).unwrap_err();
        assert!(matches!(err, DataLoadError::InvalidValue { field: "max_health", .. }));
    }

    #[test]
    fn test_validate_rejects_out_of_range_drop_chance() {
        let definition: EnemyDefinition = parse_ron(
            r#"(name: "Greedy", loot: [(item: (kind: Ammo, value: 1), chance: 150.0)])"#,
            Path::new("greedy.ron"),
        )
        .unwrap();
        let err = definition.validate(Path::new("greedy.ron")).unwrap_err();
        assert!(matches!(err, DataLoadError::InvalidValue { field: "loot", .. }));
    }

    #[test]
    fn test_registry_require_unknown_type() {
        let registry = EnemyRegistry::default();
        assert!(matches!(
            registry.require("ghost"),
            Err(DataLoadError::UnknownEnemyType(name)) if name == "ghost"
        ));
    }
}
