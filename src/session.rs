//! Host-side game session
//!
//! Owns one run plus the input adapter and leaderboard store a host needs
//! around it. The browser build and the headless runner both drive the
//! simulation through this.

use serde::Serialize;

use crate::highscores::{Leaderboard, RunSummary, record_run};
use crate::platform::input::InputAdapter;
use crate::platform::storage::LeaderboardStore;
use crate::sim::{
    Bullet, Enemy, GamePhase, Player, PowerUp, TickInput, TickResult, World, tick,
};

/// Read-only view of a world for a renderer
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u32,
    pub stage: u32,
    pub enemies_killed: u64,
    pub shield_flash: f32,
    pub player: &'a Player,
    pub bullets: &'a [Bullet],
    pub enemies: &'a [Enemy],
    pub power_up: Option<&'a PowerUp>,
}

/// A run in progress, with its input and leaderboard
pub struct Session<S> {
    pub world: World,
    pub input: InputAdapter,
    store: S,
}

impl<S: LeaderboardStore> Session<S> {
    pub fn new(world: World, store: S) -> Self {
        Self {
            world,
            input: InputAdapter::new(),
            store,
        }
    }

    /// Advance one frame using the keys held on the adapter
    pub fn frame(&mut self, dt: f32) -> TickResult {
        let input = self.input.take_intent();
        tick(&mut self.world, &input, dt)
    }

    /// Advance one frame from packed intent bits
    pub fn frame_with_bits(&mut self, bits: u16, dt: f32) -> TickResult {
        tick(&mut self.world, &TickInput::from_bits(bits), dt)
    }

    /// Start a fresh run with the same play area and tuning
    pub fn restart(&mut self, seed: u64) {
        self.world = World::with_tuning(
            self.world.width,
            self.world.height,
            seed,
            self.world.tuning.clone(),
        );
        self.input.release_all();
        log::info!("New run, seed {seed}");
    }

    /// Save the finished run under `name`
    pub fn finish(&mut self, name: &str) -> RunSummary {
        record_run(&mut self.store, name, &self.world)
    }

    /// Current leaderboard; an unreadable store shows as empty
    pub fn leaderboard(&self) -> Leaderboard {
        match self.store.load_all() {
            Ok(entries) => Leaderboard::from_entries(entries),
            Err(err) => {
                log::warn!("Could not read leaderboard: {err}");
                Leaderboard::new()
            }
        }
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        let world = &self.world;
        Snapshot {
            phase: world.phase,
            score: world.score,
            lives: world.lives,
            stage: world.stage,
            enemies_killed: world.enemies_killed,
            shield_flash: world.shield_flash,
            player: &world.player,
            bullets: &world.bullets,
            enemies: &world.enemies,
            power_up: world.power_up.as_ref(),
        }
    }
}
