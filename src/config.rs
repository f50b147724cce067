//! Author-tunable gameplay parameters.
//!
//! Every field has a default matching the shipped tuning, so a config file only
//! needs the values it overrides. Values are read once at startup; nothing
//! reconfigures a running session.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "GAME_CONFIG";
/// Config file picked up when present and `GAME_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "data/game.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub movement: MovementConfig,
    pub look: LookConfig,
    pub bob: BobConfig,
    pub weapon: WeaponConfig,
    pub hud: HudConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    pub walk_speed: f32,
    pub sprint_speed: f32,
    pub crouch_speed: f32,
    pub jump_height: f32,
    /// Signed vertical acceleration; must be negative.
    pub gravity: f32,
    /// Collider height while crouching.
    pub crouch_height: f32,
    /// Collider height while standing or sprinting.
    pub standing_height: f32,
    /// Camera height above the feet when not bobbing.
    pub eye_height: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            walk_speed: 5.0,
            sprint_speed: 8.0,
            crouch_speed: 2.5,
            jump_height: 2.0,
            gravity: -9.81,
            crouch_height: 1.0,
            standing_height: 2.0,
            eye_height: 1.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookConfig {
    /// Degrees of rotation per unit of look input.
    pub sensitivity: f32,
    /// Pitch limit in degrees, applied symmetrically.
    pub vertical_limit: f32,
}

impl Default for LookConfig {
    fn default() -> Self {
        Self {
            sensitivity: 1.0,
            vertical_limit: 80.0,
        }
    }
}

/// Bob frequency and amplitude for one stance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BobProfile {
    pub speed: f32,
    pub amount: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BobConfig {
    pub walk: BobProfile,
    pub sprint: BobProfile,
    pub crouch: BobProfile,
}

impl Default for BobConfig {
    fn default() -> Self {
        Self {
            walk: BobProfile { speed: 10.0, amount: 0.05 },
            sprint: BobProfile { speed: 14.0, amount: 0.08 },
            crouch: BobProfile { speed: 7.0, amount: 0.03 },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponConfig {
    /// Seconds between shots. Kept in the game clock's precision.
    pub fire_rate: f64,
    /// Hitscan reach.
    pub max_range: f32,
    pub max_ammo: u32,
    /// Seconds for a full reload.
    pub reload_time: f64,
}

impl Default for WeaponConfig {
    fn default() -> Self {
        Self {
            fire_rate: 0.1,
            max_range: 100.0,
            max_ammo: 30,
            reload_time: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HudConfig {
    pub crosshair_check_range: f32,
    pub default_crosshair_color: [u8; 3],
    pub enemy_crosshair_color: [u8; 3],
    /// Surface tag that turns the crosshair to the enemy colour.
    pub enemy_tag: String,
}

impl Default for HudConfig {
    fn default() -> Self {
        Self {
            crosshair_check_range: 100.0,
            default_crosshair_color: [255, 255, 255],
            enemy_crosshair_color: [255, 0, 0],
            enemy_tag: "Enemy".to_string(),
        }
    }
}

impl GameConfig {
    /// Parse a JSON config and validate it.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: GameConfig = serde_json::from_str(text).context("parse game config json")?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate the config file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("read game config: {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("load game config: {}", path.display()))
    }

    /// Load from `GAME_CONFIG`, else from `data/game.json` when it exists, else defaults.
    /// An explicitly named file that cannot be loaded is an error.
    pub fn from_env_or_default() -> Result<Self> {
        if let Ok(path) = env::var(CONFIG_ENV) {
            return Self::load(PathBuf::from(path));
        }
        let fallback = Path::new(DEFAULT_CONFIG_PATH);
        if fallback.exists() {
            return Self::load(fallback);
        }
        tracing::info!("no config file found, using built-in tuning");
        Ok(Self::default())
    }

    pub fn validate(&self) -> Result<()> {
        let m = &self.movement;
        for (name, value) in [
            ("movement.walk_speed", m.walk_speed),
            ("movement.sprint_speed", m.sprint_speed),
            ("movement.crouch_speed", m.crouch_speed),
            ("movement.crouch_height", m.crouch_height),
            ("movement.standing_height", m.standing_height),
            ("look.sensitivity", self.look.sensitivity),
            ("weapon.max_range", self.weapon.max_range),
            ("hud.crosshair_check_range", self.hud.crosshair_check_range),
        ] {
            if !(value > 0.0) {
                bail!("{name} must be positive, got {value}");
            }
        }
        if m.jump_height < 0.0 {
            bail!("movement.jump_height must not be negative, got {}", m.jump_height);
        }
        if !(m.gravity < 0.0) {
            bail!("movement.gravity must be negative, got {}", m.gravity);
        }
        if m.crouch_height > m.standing_height {
            bail!(
                "movement.crouch_height ({}) exceeds movement.standing_height ({})",
                m.crouch_height,
                m.standing_height
            );
        }
        let limit = self.look.vertical_limit;
        if !(limit > 0.0 && limit <= 90.0) {
            bail!("look.vertical_limit must be in (0, 90], got {limit}");
        }
        if !(self.weapon.reload_time > 0.0) {
            bail!("weapon.reload_time must be positive, got {}", self.weapon.reload_time);
        }
        if self.weapon.fire_rate < 0.0 {
            bail!("weapon.fire_rate must not be negative, got {}", self.weapon.fire_rate);
        }
        if self.weapon.max_ammo == 0 {
            bail!("weapon.max_ammo must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.weapon.max_ammo, 30);
        assert_eq!(config.movement.gravity, -9.81);
        assert_eq!(config.look.vertical_limit, 80.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GameConfig::from_json(
            r#"{ "look": { "sensitivity": 0.15 }, "weapon": { "max_ammo": 12 } }"#,
        )
        .unwrap();
        assert_eq!(config.look.sensitivity, 0.15);
        assert_eq!(config.look.vertical_limit, 80.0);
        assert_eq!(config.weapon.max_ammo, 12);
        assert_eq!(config.weapon.reload_time, 2.0);
        assert_eq!(config.bob, BobConfig::default());
    }

    #[test]
    fn test_rejects_positive_gravity() {
        let err = GameConfig::from_json(r#"{ "movement": { "gravity": 9.81 } }"#).unwrap_err();
        assert!(format!("{err:#}").contains("gravity"));
    }

    #[test]
    fn test_rejects_bad_look_limit_and_empty_magazine() {
        let mut config = GameConfig::default();
        config.look.vertical_limit = 120.0;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.weapon.max_ammo = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_shipped_config_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_CONFIG_PATH);
        let config = GameConfig::load(path).unwrap();
        assert_eq!(config.look.sensitivity, 0.15);
        assert_eq!(config.hud, HudConfig::default());
    }

    #[test]
    fn test_load_missing_file_names_path() {
        let err = GameConfig::load("does/not/exist.json").unwrap_err();
        assert!(format!("{err:#}").contains("does/not/exist.json"));
    }
}
