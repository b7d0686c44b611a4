//! Runtime game configuration loaded from `assets/game.toml`.
//!
//! [`GameConfig`] is a Bevy [`Resource`] that mirrors every constant in
//! [`crate::constants`] plus the rank table.  At startup, [`load_game_config`]
//! reads `assets/game.toml` and overwrites the defaults with any values present
//! in the file.  Missing keys fall back to the compile-time defaults, so a
//! minimal TOML can override just the values you care about:
//!
//! ```toml
//! drop_cooldown_ms = 350
//! danger_threshold_ticks = 180
//!
//! [[ranks]]
//! name = "Pebble"
//! radius = 12.0
//! score = 5
//! color = [0.6, 0.6, 0.6]
//! ```
//!
//! A file that parses but fails [`GameConfig::validate`] is rejected as a
//! whole; the defaults stay in place.
//!
//! Keep `src/constants.rs` in sync: it remains the **authoritative default**
//! source used by `GameConfig::default()`.

use std::time::Duration;

use crate::constants::*;
use crate::error::{validate_attraction_const, validate_positive, FusionError, FusionResult};
use crate::rank::{default_rank_specs, RankSpec, RankTable};
use bevy::prelude::*;
use serde::Deserialize;

/// Path of the optional override file, relative to the working directory.
pub const CONFIG_PATH: &str = "assets/game.toml";

/// Runtime-tunable gameplay and physics configuration.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // ── Well Geometry ─────────────────────────────────────────────────────────
    pub well_width: f32,
    pub well_height: f32,
    pub limit_line_offset: f32,
    pub spawn_above_limit: f32,
    pub wall_thickness: f32,

    // ── Physics ───────────────────────────────────────────────────────────────
    pub world_gravity: f32,
    pub planet_restitution: f32,
    pub planet_friction: f32,
    pub wall_friction: f32,
    pub density_scale: f32,

    // ── Attraction Field ──────────────────────────────────────────────────────
    pub attraction_const: f32,
    pub attraction_range: f32,
    pub min_attraction_dist: f32,

    // ── Timing ────────────────────────────────────────────────────────────────
    pub drop_cooldown_ms: u64,
    pub grace_period_ms: u64,
    pub combo_window_ticks: u32,
    pub combo_bonus_per_step: u64,
    pub danger_threshold_ticks: u32,
    pub danger_decay_per_tick: u32,
    pub settle_speed: f32,

    // ── Drops ─────────────────────────────────────────────────────────────────
    pub drop_rank_count: usize,
    pub keyboard_aim_speed: f32,

    // ── Ranks ─────────────────────────────────────────────────────────────────
    pub ranks: Vec<RankSpec>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            // Well Geometry
            well_width: WELL_WIDTH,
            well_height: WELL_HEIGHT,
            limit_line_offset: LIMIT_LINE_OFFSET,
            spawn_above_limit: SPAWN_ABOVE_LIMIT,
            wall_thickness: WALL_THICKNESS,
            // Physics
            world_gravity: WORLD_GRAVITY,
            planet_restitution: PLANET_RESTITUTION,
            planet_friction: PLANET_FRICTION,
            wall_friction: WALL_FRICTION,
            density_scale: DENSITY_SCALE,
            // Attraction Field
            attraction_const: ATTRACTION_CONST,
            attraction_range: ATTRACTION_RANGE,
            min_attraction_dist: MIN_ATTRACTION_DIST,
            // Timing
            drop_cooldown_ms: DROP_COOLDOWN_MS,
            grace_period_ms: GRACE_PERIOD_MS,
            combo_window_ticks: COMBO_WINDOW_TICKS,
            combo_bonus_per_step: COMBO_BONUS_PER_STEP,
            danger_threshold_ticks: DANGER_THRESHOLD_TICKS,
            danger_decay_per_tick: DANGER_DECAY_PER_TICK,
            settle_speed: SETTLE_SPEED,
            // Drops
            drop_rank_count: DROP_RANK_COUNT,
            keyboard_aim_speed: KEYBOARD_AIM_SPEED,
            // Ranks
            ranks: default_rank_specs(),
        }
    }
}

impl GameConfig {
    /// Height of the limit line above the floor.
    #[inline]
    pub fn limit_y(&self) -> f32 {
        self.well_height - self.limit_line_offset
    }

    /// Height at which dropped planets are spawned.
    #[inline]
    pub fn spawn_y(&self) -> f32 {
        self.limit_y() + self.spawn_above_limit
    }

    #[inline]
    pub fn half_width(&self) -> f32 {
        self.well_width * 0.5
    }

    #[inline]
    pub fn drop_cooldown(&self) -> Duration {
        Duration::from_millis(self.drop_cooldown_ms)
    }

    #[inline]
    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_period_ms)
    }

    /// Check the loaded values for combinations the game cannot run with.
    pub fn validate(&self) -> FusionResult<()> {
        let table = RankTable::from_specs(&self.ranks)?;

        validate_positive("well_width", self.well_width)?;
        validate_positive("well_height", self.well_height)?;
        validate_positive("limit_line_offset", self.limit_line_offset)?;
        validate_positive("wall_thickness", self.wall_thickness)?;
        validate_positive("world_gravity", self.world_gravity)?;
        validate_positive("density_scale", self.density_scale)?;
        validate_positive("attraction_range", self.attraction_range)?;
        validate_positive("min_attraction_dist", self.min_attraction_dist)?;
        validate_positive("settle_speed", self.settle_speed)?;
        validate_attraction_const(self.attraction_const)?;

        if self.limit_line_offset >= self.well_height {
            return Err(FusionError::UnsafeConstant {
                name: "limit_line_offset",
                value: self.limit_line_offset,
                safe_range: "(0.0, well_height)",
            });
        }

        if self.attraction_range <= self.min_attraction_dist {
            return Err(FusionError::UnsafeConstant {
                name: "attraction_range",
                value: self.attraction_range,
                safe_range: "(min_attraction_dist, ∞)",
            });
        }

        if self.drop_rank_count == 0 || self.drop_rank_count > table.len() {
            return Err(FusionError::UnsafeConstant {
                name: "drop_rank_count",
                value: self.drop_rank_count as f32,
                safe_range: "[1, rank count]",
            });
        }

        if self.danger_threshold_ticks == 0 {
            return Err(FusionError::UnsafeConstant {
                name: "danger_threshold_ticks",
                value: 0.0,
                safe_range: "[1, ∞)",
            });
        }

        // Every rank, the terminal one included, must fit between the walls.
        let widest = table.get(table.terminal_index())?.radius * 2.0;
        if widest >= self.well_width {
            return Err(FusionError::UnsafeConstant {
                name: "rank radius",
                value: widest * 0.5,
                safe_range: "(0.0, well_width / 2)",
            });
        }

        Ok(())
    }
}

/// Parse and validate a config document.
pub fn parse_game_config(contents: &str) -> Result<GameConfig, String> {
    let loaded = toml::from_str::<GameConfig>(contents).map_err(|e| e.to_string())?;
    loaded.validate().map_err(|e| e.to_string())?;
    Ok(loaded)
}

/// Startup system: attempt to load `assets/game.toml`, overwrite the
/// [`GameConfig`] resource with any values present, and rebuild the
/// [`RankTable`] from the final rank list.
///
/// Missing keys retain their compiled defaults.  Parse or validation errors
/// are logged but do not abort the game.  A missing file is not an error.
pub fn load_game_config(mut config: ResMut<GameConfig>, mut ranks: ResMut<RankTable>) {
    match std::fs::read_to_string(CONFIG_PATH) {
        Ok(contents) => match parse_game_config(&contents) {
            Ok(loaded) => {
                *config = loaded;
                info!("Loaded game config from {CONFIG_PATH}");
            }
            Err(e) => {
                warn!("Rejected {CONFIG_PATH}: {e}; using defaults");
            }
        },
        Err(_) => {
            info!("No {CONFIG_PATH} found; using compiled defaults");
        }
    }

    match RankTable::from_specs(&config.ranks) {
        Ok(table) => *ranks = table,
        Err(e) => warn!("Rank table invalid ({e}); keeping built-in ranks"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let shipped = parse_game_config(include_str!("../assets/game.toml"))
            .expect("shipped config parses");
        let defaults = GameConfig::default();
        assert_eq!(shipped.limit_y(), defaults.limit_y());
        assert_eq!(shipped.danger_threshold_ticks, defaults.danger_threshold_ticks);
        assert_eq!(shipped.ranks.len(), defaults.ranks.len());
        assert_eq!(shipped.ranks[7].name, "Black Hole");
    }

    #[test]
    fn derived_heights_follow_the_well() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.limit_y(), 560.0);
        assert_eq!(cfg.spawn_y(), 605.0);
        assert_eq!(cfg.drop_cooldown(), Duration::from_millis(500));
    }

    #[test]
    fn partial_toml_overrides_only_named_keys() {
        let cfg = parse_game_config("drop_cooldown_ms = 250\nsettle_speed = 90.0\n")
            .expect("partial config parses");
        assert_eq!(cfg.drop_cooldown_ms, 250);
        assert_eq!(cfg.settle_speed, 90.0);
        assert_eq!(cfg.danger_threshold_ticks, DANGER_THRESHOLD_TICKS);
        assert_eq!(cfg.ranks.len(), 8);
    }

    #[test]
    fn custom_rank_list_replaces_defaults() {
        let doc = r#"
drop_rank_count = 2

[[ranks]]
name = "Small"
radius = 10.0
score = 5
color = [1.0, 1.0, 1.0]

[[ranks]]
name = "Large"
radius = 30.0
score = 50
color = [0.5, 0.5, 0.5]
"#;
        let cfg = parse_game_config(doc).expect("two-rank config parses");
        assert_eq!(cfg.ranks.len(), 2);
        assert_eq!(cfg.ranks[1].name, "Large");
    }

    #[test]
    fn non_positive_min_attraction_dist_is_rejected() {
        assert!(parse_game_config("min_attraction_dist = -1.0").is_err());
        assert!(parse_game_config("min_attraction_dist = 0.0").is_err());
    }

    #[test]
    fn attraction_range_must_exceed_min_dist() {
        assert!(parse_game_config("min_attraction_dist = 250.0\nattraction_range = 200.0").is_err());
        assert!(parse_game_config("min_attraction_dist = 200.0\nattraction_range = 200.0").is_err());
        assert!(parse_game_config("min_attraction_dist = 5.0\nattraction_range = 200.0").is_ok());
    }

    #[test]
    fn drop_rank_count_must_fit_the_table() {
        let cfg = GameConfig {
            drop_rank_count: 9,
            ..GameConfig::default()
        };
        assert!(cfg.validate().is_err());
        let cfg = GameConfig {
            drop_rank_count: 0,
            ..GameConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn oversized_rank_is_rejected() {
        let mut cfg = GameConfig::default();
        cfg.well_width = 150.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn malformed_toml_is_reported() {
        assert!(parse_game_config("drop_cooldown_ms = \"soon\"").is_err());
    }
}
