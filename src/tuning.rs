//! Data-driven game balance
//!
//! Every number that decides how hard a stage is, or how much a run is
//! rewarded, lives here. The stage policy methods are the only place the
//! simulation reads difficulty from.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// How bullet and enemy steps relate to frame time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MotionTiming {
    /// Fixed step per tick regardless of frame time (frame-rate dependent)
    PerFrame,
    /// Steps scaled by `dt * REFERENCE_FPS` (same speed as `PerFrame` at 60 fps)
    #[default]
    DeltaScaled,
}

/// Errors loading a tuning file
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Run ===
    /// Lives at the start of a run
    pub starting_lives: u32,
    /// Enemies spawned by the first tick
    pub opening_wave: u32,
    /// Spawn a power-up on the first tick
    pub force_initial_power_up: bool,
    /// Bullet/enemy step timing
    pub motion: MotionTiming,

    // === Enemies ===
    pub enemy_min_size: f32,
    pub enemy_max_size: f32,
    /// Base speed at stage 0 (units per reference frame)
    pub enemy_base_speed: f32,
    /// Base speed added per stage
    pub enemy_speed_per_stage: f32,
    /// Speed is drawn from `base * (1 ± spread)`
    pub enemy_speed_spread: f32,
    /// Per-tick spawn chance at stage 0
    pub enemy_spawn_chance: f32,
    /// Per-tick spawn chance added per stage
    pub enemy_spawn_chance_per_stage: f32,
    /// Chance an enemy heads for a random point instead of near the player
    pub wander_chance: f32,
    /// Radius range around the player for aimed enemies
    pub aim_min_radius: f32,
    pub aim_max_radius: f32,

    // === Power-up ===
    /// Per-tick spawn chance while no power-up exists
    pub power_up_spawn_chance: f32,
    /// Seconds before an untouched power-up disappears
    pub power_up_lifetime: f32,
    /// Seconds between a pickup and the scheduled replacement
    pub power_up_respawn_delay: f32,

    // === Rewards ===
    /// Score per kill, multiplied by stage
    pub kill_score_per_stage: u64,
    /// Stage-up score, multiplied by the new stage
    pub stage_up_score_per_stage: u64,
    /// A bonus life is awarded on stages divisible by this
    pub bonus_life_every: u32,

    // === Feedback ===
    /// Shield flash after being hit (seconds)
    pub hit_flash: f32,
    /// Shield flash after a stage-up (seconds)
    pub stage_up_flash: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            starting_lives: 10,
            opening_wave: 5,
            force_initial_power_up: true,
            motion: MotionTiming::DeltaScaled,

            enemy_min_size: 40.0,
            enemy_max_size: 60.0,
            enemy_base_speed: 1.0,
            enemy_speed_per_stage: 0.2,
            enemy_speed_spread: 0.5,
            enemy_spawn_chance: 0.02,
            enemy_spawn_chance_per_stage: 0.005,
            wander_chance: 0.6,
            aim_min_radius: 100.0,
            aim_max_radius: 300.0,

            power_up_spawn_chance: 0.005,
            power_up_lifetime: 30.0,
            power_up_respawn_delay: 3.0,

            kill_score_per_stage: 10,
            stage_up_score_per_stage: 500,
            bonus_life_every: 3,

            hit_flash: 1.0,
            stage_up_flash: 2.0,
        }
    }
}

impl Tuning {
    /// Tuning with no random spawns and no opening wave.
    ///
    /// Useful for scripted scenarios where every entity is placed by hand.
    pub fn quiet() -> Self {
        Self {
            opening_wave: 0,
            force_initial_power_up: false,
            enemy_spawn_chance: 0.0,
            enemy_spawn_chance_per_stage: 0.0,
            power_up_spawn_chance: 0.0,
            ..Self::default()
        }
    }

    /// Parse tuning from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Largest enemy side length
    pub const MAX_ENEMY_SIZE: f32 = 10_000.0;
    /// Cap on the base enemy speed (units per reference frame)
    pub const MAX_ENEMY_SPEED: f32 = 1_000.0;
    /// Furthest an aimed enemy may target from the player
    pub const MAX_AIM_RADIUS: f32 = 100_000.0;

    /// Repair non-finite values, inverted ranges and out-of-range values
    pub fn sanitized(mut self) -> Self {
        let defaults = Tuning::default();
        let fields = [
            (&mut self.enemy_min_size, defaults.enemy_min_size),
            (&mut self.enemy_max_size, defaults.enemy_max_size),
            (&mut self.enemy_base_speed, defaults.enemy_base_speed),
            (&mut self.enemy_speed_per_stage, defaults.enemy_speed_per_stage),
            (&mut self.enemy_speed_spread, defaults.enemy_speed_spread),
            (&mut self.enemy_spawn_chance, defaults.enemy_spawn_chance),
            (
                &mut self.enemy_spawn_chance_per_stage,
                defaults.enemy_spawn_chance_per_stage,
            ),
            (&mut self.wander_chance, defaults.wander_chance),
            (&mut self.aim_min_radius, defaults.aim_min_radius),
            (&mut self.aim_max_radius, defaults.aim_max_radius),
            (&mut self.power_up_spawn_chance, defaults.power_up_spawn_chance),
            (&mut self.power_up_lifetime, defaults.power_up_lifetime),
            (&mut self.power_up_respawn_delay, defaults.power_up_respawn_delay),
            (&mut self.hit_flash, defaults.hit_flash),
            (&mut self.stage_up_flash, defaults.stage_up_flash),
        ];
        for (value, default) in fields {
            if !value.is_finite() {
                log::warn!("Non-finite tuning value {value}, using {default}");
                *value = default;
            }
        }

        if self.enemy_min_size > self.enemy_max_size {
            std::mem::swap(&mut self.enemy_min_size, &mut self.enemy_max_size);
        }
        self.enemy_min_size = self.enemy_min_size.clamp(1.0, Self::MAX_ENEMY_SIZE);
        self.enemy_max_size = self
            .enemy_max_size
            .clamp(self.enemy_min_size, Self::MAX_ENEMY_SIZE);

        if self.aim_min_radius > self.aim_max_radius {
            std::mem::swap(&mut self.aim_min_radius, &mut self.aim_max_radius);
        }
        self.aim_min_radius = self.aim_min_radius.clamp(0.0, Self::MAX_AIM_RADIUS);
        self.aim_max_radius = self
            .aim_max_radius
            .clamp(self.aim_min_radius, Self::MAX_AIM_RADIUS);

        self.enemy_base_speed = self.enemy_base_speed.clamp(0.0, Self::MAX_ENEMY_SPEED);
        self.enemy_speed_per_stage = self
            .enemy_speed_per_stage
            .clamp(0.0, Self::MAX_ENEMY_SPEED);
        self.enemy_speed_spread = self.enemy_speed_spread.clamp(0.0, 1.0);
        self.wander_chance = self.wander_chance.clamp(0.0, 1.0);
        self.power_up_spawn_chance = self.power_up_spawn_chance.clamp(0.0, 1.0);
        self.enemy_spawn_chance = self.enemy_spawn_chance.clamp(0.0, 1.0);
        self.enemy_spawn_chance_per_stage = self.enemy_spawn_chance_per_stage.clamp(0.0, 1.0);
        self.power_up_lifetime = self.power_up_lifetime.max(0.0);
        self.power_up_respawn_delay = self.power_up_respawn_delay.max(0.0);
        self.hit_flash = self.hit_flash.max(0.0);
        self.stage_up_flash = self.stage_up_flash.max(0.0);
        self.starting_lives = self.starting_lives.max(1);
        self
    }

    // === Stage policy ===

    /// Base enemy speed for a stage (units per reference frame)
    pub fn enemy_base_speed(&self, stage: u32) -> f32 {
        (self.enemy_base_speed + stage as f32 * self.enemy_speed_per_stage)
            .min(Self::MAX_ENEMY_SPEED)
    }

    /// Inclusive speed range enemies are drawn from at a stage
    pub fn enemy_speed_range(&self, stage: u32) -> (f32, f32) {
        let base = self.enemy_base_speed(stage);
        (
            base * (1.0 - self.enemy_speed_spread),
            base * (1.0 + self.enemy_speed_spread),
        )
    }

    /// Chance of spawning one enemy on a tick
    pub fn enemy_spawn_chance(&self, stage: u32) -> f32 {
        (self.enemy_spawn_chance + stage as f32 * self.enemy_spawn_chance_per_stage).min(1.0)
    }

    /// Score for a bullet kill at a stage
    pub fn kill_score(&self, stage: u32) -> u64 {
        self.kill_score_per_stage.saturating_mul(u64::from(stage))
    }

    /// Score bonus for reaching `new_stage`
    pub fn stage_up_score(&self, new_stage: u32) -> u64 {
        self.stage_up_score_per_stage
            .saturating_mul(u64::from(new_stage))
    }

    /// Whether reaching `new_stage` grants a life
    pub fn grants_bonus_life(&self, new_stage: u32) -> bool {
        self.bonus_life_every > 0 && new_stage.is_multiple_of(self.bonus_life_every)
    }
}
