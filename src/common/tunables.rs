//! Tunable gameplay constants.
//!
//! Every table is `#[serde(default)]`, so `assets/tunables.ron` only needs to
//! list the values it overrides.

use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::combat::MeleeTuning;
use crate::sim::controller::PlayerConfig;

pub const TUNABLES_PATH: &str = "assets/tunables.ron";

#[derive(Debug, Error)]
pub enum TunablesError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse tunables: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tunables {
    pub pixels_per_meter: f32,
    /// Downward acceleration in pixels per second squared.
    pub gravity: f32,
    pub level: LevelTuning,
    pub player: PlayerConfig,
    pub player_attack: MeleeTuning,
    pub enemies: EnemyTuning,
    pub projectiles: ProjectileTuning,
    pub camera: CameraTuning,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            pixels_per_meter: 32.0,
            gravity: 1800.0,
            level: LevelTuning::default(),
            player: PlayerConfig::default(),
            player_attack: MeleeTuning::default(),
            enemies: EnemyTuning::default(),
            projectiles: ProjectileTuning::default(),
            camera: CameraTuning::default(),
        }
    }
}

impl Tunables {
    pub fn from_ron(text: &str) -> Result<Self, TunablesError> {
        Ok(ron::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TunablesError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| TunablesError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&text)
    }

    /// Loads `path`, falling back to defaults (with a warning) on any error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(tunables) => tunables,
            Err(err) => {
                warn!("using default tunables: {err}");
                Self::default()
            }
        }
    }
}

/// Spawn point and the box outside of which things count as off-screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelTuning {
    pub spawn_x: f32,
    pub spawn_y: f32,
    pub half_width: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl Default for LevelTuning {
    fn default() -> Self {
        Self {
            spawn_x: -1100.0,
            spawn_y: 40.0,
            half_width: 1280.0,
            min_y: -1000.0,
            max_y: 900.0,
        }
    }
}

impl LevelTuning {
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x.abs() <= self.half_width && (self.min_y..=self.max_y).contains(&p.y)
    }

    #[inline]
    pub fn spawn_point(&self) -> Vec2 {
        Vec2::new(self.spawn_x, self.spawn_y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub max_health: f32,
    pub patrol_speed: f32,
    pub chase_speed: f32,
    /// Half the width of the patrol segment around the spawn point.
    pub patrol_half_span: f32,
    pub detect_range: f32,
    pub melee_range: f32,
    pub ranged_range: f32,
    pub attack_cooldown: f32,
    pub windup: f32,
    pub melee_radius: f32,
    pub melee_damage: f32,
    pub projectile_speed: f32,
    pub projectile_damage: f32,
    pub dying_secs: f32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            max_health: 50.0,
            patrol_speed: 70.0,
            chase_speed: 140.0,
            patrol_half_span: 120.0,
            detect_range: 280.0,
            melee_range: 44.0,
            ranged_range: 420.0,
            attack_cooldown: 1.4,
            windup: 0.35,
            melee_radius: 26.0,
            melee_damage: 15.0,
            projectile_speed: 460.0,
            projectile_damage: 10.0,
            dying_secs: 0.35,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    pub capacity: usize,
    pub radius: f32,
    /// Seconds a projectile may stay outside the level box before it is recycled.
    pub offscreen_grace: f32,
    pub max_lifetime: f32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            capacity: 64,
            radius: 5.0,
            offscreen_grace: 0.5,
            max_lifetime: 4.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraTuning {
    pub responsiveness: f32,
    pub look_ahead: f32,
    pub max_shake: f32,
    pub trauma_decay: f32,
    pub hurt_trauma: f32,
    pub death_trauma: f32,
    pub parallax_far: f32,
    pub parallax_near: f32,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            responsiveness: 5.0,
            look_ahead: 60.0,
            max_shake: 18.0,
            trauma_decay: 1.2,
            hurt_trauma: 0.45,
            death_trauma: 0.9,
            parallax_far: 0.15,
            parallax_near: 0.45,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_ron_keeps_defaults_for_missing_fields() {
        let t = Tunables::from_ron("(gravity: 1200.0, player: (max_health: 80.0))").unwrap();
        assert_eq!(t.gravity, 1200.0);
        assert_eq!(t.player.max_health, 80.0);
        assert_eq!(t.player.move_speed, PlayerConfig::default().move_speed);
        assert_eq!(t.enemies, EnemyTuning::default());
    }

    #[test]
    fn malformed_ron_is_a_parse_error() {
        let err = Tunables::from_ron("(gravity: ").unwrap_err();
        assert!(matches!(err, TunablesError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error_and_falls_back() {
        let path = "does/not/exist/tunables.ron";
        assert!(matches!(Tunables::load(path), Err(TunablesError::Io { .. })));
        assert_eq!(Tunables::load_or_default(path), Tunables::default());
    }

    #[test]
    fn shipped_tunables_parse() {
        let text = include_str!("../../assets/tunables.ron");
        Tunables::from_ron(text).unwrap();
    }

    #[test]
    fn level_box_contains_spawn() {
        let level = LevelTuning::default();
        assert!(level.contains(level.spawn_point()));
        assert!(!level.contains(Vec2::new(level.half_width + 1.0, 0.0)));
    }
}
