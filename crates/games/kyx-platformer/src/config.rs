use serde::{Deserialize, Serialize};

use kyx_core::tuning::TuningOverrides;

/// Screen width in pixels.
pub const WINDOW_WIDTH: f32 = 800.0;
/// Screen height in pixels.
pub const WINDOW_HEIGHT: f32 = 600.0;
/// Y of the ground plane (top surface).
pub const GROUND_LEVEL: f32 = WINDOW_HEIGHT - 50.0;
/// Logical simulation rate.
pub const TICK_RATE_HZ: f32 = 60.0;

/// Screen and world-level parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
    pub ground_level: f32,
    pub tick_rate_hz: f32,
    /// Gap kept between the player and the screen edge after a room change.
    pub room_entry_margin: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: WINDOW_WIDTH,
            height: WINDOW_HEIGHT,
            ground_level: GROUND_LEVEL,
            tick_rate_hz: TICK_RATE_HZ,
            room_entry_margin: 10.0,
        }
    }
}

/// Player movement, jump, dash, and damage parameters. Velocities are in
/// pixels per tick, timers in ticks; negative y is up.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub run_multiplier: f32,
    pub dash_speed: f32,
    pub dash_duration: u32,
    pub dash_cooldown: u32,
    pub dash_gravity_scale: f32,
    pub initial_jump_velocity: f32,
    pub jump_hold_impulse: f32,
    /// Most negative vertical velocity reachable by holding jump.
    pub max_jump_velocity: f32,
    pub gravity: f32,
    pub friction: f32,
    pub friction_snap: f32,
    pub max_health: u32,
    pub invulnerability_ticks: u32,
    pub run_dust_cooldown: u32,
    /// Horizontal knockback applied when an enemy hits the player.
    pub contact_knockback: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            width: 20.0,
            height: 50.0,
            speed: 4.5,
            run_multiplier: 1.45,
            dash_speed: 14.0,
            dash_duration: 14,
            dash_cooldown: 48,
            dash_gravity_scale: 0.25,
            initial_jump_velocity: -10.0,
            jump_hold_impulse: -0.4,
            max_jump_velocity: -15.0,
            gravity: 0.75,
            friction: 0.9,
            friction_snap: 0.1,
            max_health: 3,
            invulnerability_ticks: 60,
            run_dust_cooldown: 5,
            contact_knockback: 8.0,
        }
    }
}

/// Enemy AI and movement parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EnemyConfig {
    pub width: f32,
    pub height: f32,
    pub base_speed: f32,
    pub chase_multiplier: f32,
    pub attack_multiplier: f32,
    pub gravity: f32,
    pub acceleration: f32,
    pub air_control: f32,
    pub ground_max_factor: f32,
    pub air_max_factor: f32,
    pub attack_range: f32,
    pub attack_vertical_tolerance: f32,
    pub detection_range: f32,
    pub vertical_tolerance: f32,
    pub attack_duration: u32,
    pub attack_cooldown: u32,
    pub attack_damage: u32,
    pub jump_velocity: f32,
    pub jump_cooldown: u32,
    /// Fraction of `jump_cooldown` enforced after bumping a ceiling.
    pub ceiling_jump_lockout: f32,
    pub patrol_timer_min: u32,
    pub patrol_timer_max: u32,
    pub initial_patrol_timer_min: u32,
    pub patrol_flip_chance: f64,
    pub edge_padding: f32,
    pub jump_edge_padding: f32,
    pub patrol_jump_chance: f64,
    pub facing_dead_zone: f32,
    /// How far above the enemy's center the player's feet must be to trigger a chase jump.
    pub chase_jump_height: f32,
    pub ground_landing_damping: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            width: 28.0,
            height: 36.0,
            base_speed: 1.2,
            chase_multiplier: 1.8,
            attack_multiplier: 2.6,
            gravity: 0.7,
            acceleration: 0.25,
            air_control: 0.55,
            ground_max_factor: 1.2,
            air_max_factor: 0.9,
            attack_range: 120.0,
            attack_vertical_tolerance: 60.0,
            detection_range: 320.0,
            vertical_tolerance: 160.0,
            attack_duration: 30,
            attack_cooldown: 90,
            attack_damage: 1,
            jump_velocity: -11.0,
            jump_cooldown: 45,
            ceiling_jump_lockout: 0.6,
            patrol_timer_min: 60,
            patrol_timer_max: 180,
            initial_patrol_timer_min: 90,
            patrol_flip_chance: 0.4,
            edge_padding: 12.0,
            jump_edge_padding: 8.0,
            patrol_jump_chance: 0.15,
            facing_dead_zone: 5.0,
            chase_jump_height: 10.0,
            ground_landing_damping: 0.8,
        }
    }
}

/// Top-level platformer configuration, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlatformerConfig {
    pub world: WorldConfig,
    pub player: PlayerConfig,
    pub enemy: EnemyConfig,
    /// Seed for enemy patrol randomness.
    pub seed: u64,
}

impl Default for PlatformerConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            player: PlayerConfig::default(),
            enemy: EnemyConfig::default(),
            seed: 42,
        }
    }
}

impl PlatformerConfig {
    /// Load config from a TOML file. Falls back to defaults if the file is missing
    /// or unparseable.
    pub fn load() -> Self {
        let path = std::env::var("KYX_PLATFORMER_CONFIG")
            .unwrap_or_else(|_| "config/platformer.toml".to_string());
        match std::fs::read_to_string(&path) {
            Ok(content) => match Self::from_toml_str(&content) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    Self::default()
                },
            },
            Err(_) => Self::default(),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<Self>(content).map(Self::sanitized)
    }

    /// Pull probabilities back into `[0, 1]`; rng sampling rejects anything else.
    pub fn sanitized(mut self) -> Self {
        let defaults = EnemyConfig::default();
        self.enemy.patrol_flip_chance = probability(
            "patrol_flip_chance",
            self.enemy.patrol_flip_chance,
            defaults.patrol_flip_chance,
        );
        self.enemy.patrol_jump_chance = probability(
            "patrol_jump_chance",
            self.enemy.patrol_jump_chance,
            defaults.patrol_jump_chance,
        );
        self
    }

    /// Apply author-facing tuning overrides on top of this config.
    pub fn with_tuning(mut self, tuning: &TuningOverrides) -> Self {
        if let Some(health) = tuning.player_max_health {
            self.player.max_health = health.max(1);
        }
        if let Some(mult) = tuning.run_multiplier {
            self.player.run_multiplier = mult;
        }
        if let Some(speed) = tuning.dash_speed {
            self.player.dash_speed = speed;
        }
        if let Some(speed) = tuning.enemy_base_speed {
            self.enemy.base_speed = speed;
        }
        self
    }
}

fn probability(name: &str, value: f64, fallback: f64) -> f64 {
    if value.is_nan() {
        tracing::warn!(name, "Probability is NaN, using default {fallback}");
        return fallback;
    }
    if !(0.0..=1.0).contains(&value) {
        tracing::warn!(name, value, "Probability out of range, clamping to [0, 1]");
    }
    value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kyx_core::test_helpers::tuning_map;
    use kyx_core::tuning::{KEY_DASH_SPEED, KEY_ENEMY_BASE_SPEED, KEY_PLAYER_MAX_HEALTH};

    #[test]
    fn defaults_match_screen() {
        let cfg = PlatformerConfig::default();
        assert_eq!(cfg.world.width, 800.0);
        assert_eq!(cfg.world.ground_level, 550.0);
        assert_eq!(cfg.player.max_health, 3);
        assert!(cfg.player.max_jump_velocity < cfg.player.initial_jump_velocity);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let cfg = PlatformerConfig::from_toml_str(
            r#"
            seed = 7

            [player]
            speed = 6.0

            [enemy]
            detection_range = 200.0
            "#,
        )
        .unwrap();
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.player.speed, 6.0);
        assert_eq!(cfg.player.gravity, PlayerConfig::default().gravity);
        assert_eq!(cfg.enemy.detection_range, 200.0);
        assert_eq!(cfg.world, WorldConfig::default());
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let shipped = include_str!("../../../../config/platformer.toml");
        let cfg = PlatformerConfig::from_toml_str(shipped).unwrap();
        assert_eq!(cfg, PlatformerConfig::default());
    }

    #[test]
    fn out_of_range_chances_are_clamped() {
        let cfg = PlatformerConfig::from_toml_str(
            r#"
            [enemy]
            patrol_flip_chance = 1.7
            patrol_jump_chance = -0.2
            "#,
        )
        .unwrap();
        assert_eq!(cfg.enemy.patrol_flip_chance, 1.0);
        assert_eq!(cfg.enemy.patrol_jump_chance, 0.0);

        let mut raw = PlatformerConfig::default();
        raw.enemy.patrol_flip_chance = f64::NAN;
        let cfg = raw.sanitized();
        assert_eq!(cfg.enemy.patrol_flip_chance, 0.4);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(PlatformerConfig::from_toml_str("[player\nspeed = ").is_err());
    }

    #[test]
    fn tuning_overrides_apply() {
        let tuning = TuningOverrides::from_map(&tuning_map(&[
            (KEY_PLAYER_MAX_HEALTH, 5.0),
            (KEY_DASH_SPEED, 18.0),
            (KEY_ENEMY_BASE_SPEED, 2.0),
        ]));
        let cfg = PlatformerConfig::default().with_tuning(&tuning);
        assert_eq!(cfg.player.max_health, 5);
        assert_eq!(cfg.player.dash_speed, 18.0);
        assert_eq!(cfg.enemy.base_speed, 2.0);
        assert_eq!(cfg.player.run_multiplier, 1.45, "Missing key keeps default");
    }

    #[test]
    fn empty_tuning_is_identity() {
        let cfg = PlatformerConfig::default().with_tuning(&TuningOverrides::default());
        assert_eq!(cfg, PlatformerConfig::default());
    }
}
