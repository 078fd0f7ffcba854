/// Balance constants and their JSON override layer.
///
/// Every tunable the simulation reads lives in `GameConfig`.  Timers are
/// authored in seconds and turned into frame counts with `frames()`, since
/// every countdown in the core ticks once per `World::update` call.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    // ── Screen / clock ───────────────────────────────────────────────────────
    pub screen_width: f64,
    pub screen_height: f64,
    pub framerate: f64,

    // ── World generation ─────────────────────────────────────────────────────
    pub chunk_size: f64,
    pub chunk_margin: f64,
    pub walls_per_chunk_min: u32,
    pub walls_per_chunk_max: u32,
    pub wall_thickness: f64,
    pub wall_length_min: f64,
    pub wall_length_max: f64,
    pub torch_radius: f64,

    // ── Player ───────────────────────────────────────────────────────────────
    pub player_speed: f64,
    pub player_size: f64,
    pub player_texture_size: f64,
    pub player_gun_end: (f64, f64),
    pub player_lives: u32,
    pub player_invulnerability_time: f64,
    /// Degrees per unit of rotate input.
    pub player_rotation_speed: f64,
    pub player_shoot_delay: f64,
    pub player_max_bullets: u32,
    pub player_bullet_recharge_time: f64,
    /// How far ahead of the muzzle a player shot is aimed.
    pub player_aim_distance: f64,

    // ── Enemy ────────────────────────────────────────────────────────────────
    pub enemy_speed: f64,
    pub enemy_size: f64,
    pub enemy_texture_size: f64,
    pub enemy_gun_end: (f64, f64),
    pub enemy_shoot_delay: f64,
    pub enemy_decay_time: f64,
    /// Chance an enemy spawns on the right/bottom side of its wall instead
    /// of the left/top side.
    pub enemy_far_side_chance: f64,
    /// Screen-space correction added to the aim angle while alerted.
    pub enemy_facing_offset: f64,

    // ── Bullets ──────────────────────────────────────────────────────────────
    pub bullet_size: f64,
    /// Units per second.
    pub player_bullet_speed: f64,
    /// Units per second.
    pub enemy_bullet_speed: f64,

    // ── Bonuses ──────────────────────────────────────────────────────────────
    pub bonus_size: f64,
    pub bonus_spawn_chance: f64,
    pub bonus_heal_weight: u32,
    pub bonus_buff_weight: u32,
    pub aid_kit_heal_amount: u32,
    pub night_vision_time: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            screen_width: 800.0,
            screen_height: 600.0,
            framerate: 60.0,

            chunk_size: 800.0,
            chunk_margin: 100.0,
            walls_per_chunk_min: 2,
            walls_per_chunk_max: 3,
            wall_thickness: 30.0,
            wall_length_min: 200.0,
            wall_length_max: 300.0,
            torch_radius: 200.0,

            player_speed: 5.0,
            player_size: 32.0,
            player_texture_size: 64.0,
            player_gun_end: (24.0, 64.0),
            player_lives: 5,
            player_invulnerability_time: 1.0,
            player_rotation_speed: 3.0,
            player_shoot_delay: 0.2,
            player_max_bullets: 6,
            player_bullet_recharge_time: 1.5,
            player_aim_distance: 100.0,

            enemy_speed: 2.0,
            enemy_size: 20.0,
            enemy_texture_size: 64.0,
            enemy_gun_end: (31.0, 64.0),
            enemy_shoot_delay: 1.0,
            enemy_decay_time: 3.0,
            enemy_far_side_chance: 0.5,
            enemy_facing_offset: 270.0,

            bullet_size: 6.0,
            player_bullet_speed: 420.0,
            enemy_bullet_speed: 300.0,

            bonus_size: 32.0,
            bonus_spawn_chance: 0.3,
            bonus_heal_weight: 5,
            bonus_buff_weight: 1,
            aid_kit_heal_amount: 2,
            night_vision_time: 10.0,
        }
    }
}

impl GameConfig {
    /// Read, parse and validate a JSON config.  Missing fields keep their
    /// defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Convert a duration in seconds into a whole number of frames.
    pub fn frames(&self, seconds: f64) -> u32 {
        (seconds * self.framerate).round().max(0.0) as u32
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive: [(&'static str, f64); 18] = [
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
            ("framerate", self.framerate),
            ("chunk_size", self.chunk_size),
            ("wall_thickness", self.wall_thickness),
            ("wall_length_min", self.wall_length_min),
            ("torch_radius", self.torch_radius),
            ("player_speed", self.player_speed),
            ("player_size", self.player_size),
            ("player_texture_size", self.player_texture_size),
            ("enemy_speed", self.enemy_speed),
            ("enemy_size", self.enemy_size),
            ("enemy_texture_size", self.enemy_texture_size),
            ("bullet_size", self.bullet_size),
            ("player_bullet_speed", self.player_bullet_speed),
            ("enemy_bullet_speed", self.enemy_bullet_speed),
            ("bonus_size", self.bonus_size),
            ("player_aim_distance", self.player_aim_distance),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(field, format!("must be a positive number, got {value}")));
            }
        }

        let non_negative: [(&'static str, f64); 7] = [
            ("chunk_margin", self.chunk_margin),
            ("player_invulnerability_time", self.player_invulnerability_time),
            ("player_shoot_delay", self.player_shoot_delay),
            ("player_bullet_recharge_time", self.player_bullet_recharge_time),
            ("enemy_shoot_delay", self.enemy_shoot_delay),
            ("enemy_decay_time", self.enemy_decay_time),
            ("night_vision_time", self.night_vision_time),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(field, format!("must be zero or positive, got {value}")));
            }
        }

        if self.walls_per_chunk_min > self.walls_per_chunk_max {
            return Err(invalid(
                "walls_per_chunk_min",
                format!(
                    "{} exceeds walls_per_chunk_max {}",
                    self.walls_per_chunk_min, self.walls_per_chunk_max
                ),
            ));
        }
        if self.wall_length_min > self.wall_length_max {
            return Err(invalid(
                "wall_length_min",
                format!(
                    "{} exceeds wall_length_max {}",
                    self.wall_length_min, self.wall_length_max
                ),
            ));
        }
        // Long-axis anchors are rolled in [margin, size - 2 * margin].
        if self.chunk_size < 3.0 * self.chunk_margin {
            return Err(invalid(
                "chunk_margin",
                format!(
                    "{} leaves no room for wall anchors in a chunk of {}",
                    self.chunk_margin, self.chunk_size
                ),
            ));
        }
        let interior = self.chunk_size - 2.0 * self.chunk_margin;
        if self.wall_length_max > interior {
            return Err(invalid(
                "wall_length_max",
                format!(
                    "{} does not fit the {interior} units left inside a chunk",
                    self.wall_length_max
                ),
            ));
        }

        for (field, p) in [
            ("enemy_far_side_chance", self.enemy_far_side_chance),
            ("bonus_spawn_chance", self.bonus_spawn_chance),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(invalid(field, format!("must be within [0, 1], got {p}")));
            }
        }

        match self.bonus_heal_weight.checked_add(self.bonus_buff_weight) {
            None => {
                return Err(invalid(
                    "bonus_heal_weight",
                    format!(
                        "bonus weights {} + {} overflow",
                        self.bonus_heal_weight, self.bonus_buff_weight
                    ),
                ))
            }
            Some(0) => return Err(invalid("bonus_heal_weight", "bonus weights cannot both be zero".into())),
            Some(_) => {}
        }
        if self.player_lives == 0 {
            return Err(invalid("player_lives", "must be at least 1".into()));
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}
