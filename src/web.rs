//! Browser bindings
//!
//! A thin `wasm_bindgen` wrapper over [`Session`]. Events and snapshots
//! cross to JavaScript as JSON strings; intents come in as key events or
//! packed bits.

use wasm_bindgen::prelude::*;

use crate::platform::storage::LocalStorageStore;
use crate::platform::{self, entropy_seed};
use crate::session::Session;
use crate::sim::{TickResult, World};

#[wasm_bindgen(start)]
pub fn wasm_main() {
    platform::init_logging();
    log::info!("Stage Strike (web) starting...");
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|err| {
        log::error!("Serialization failed: {err}");
        "null".to_string()
    })
}

fn events_json(result: &TickResult) -> String {
    to_json(&result.events)
}

/// One browser game
#[wasm_bindgen]
pub struct WebGame {
    session: Session<LocalStorageStore>,
}

#[wasm_bindgen]
impl WebGame {
    /// New run on a `width x height` canvas with a time-based seed
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> WebGame {
        let world = World::new(width, height, entropy_seed());
        WebGame {
            session: Session::new(world, LocalStorageStore::default()),
        }
    }

    /// Forward a DOM key name (`event.key`)
    pub fn key_event(&mut self, key: &str, pressed: bool) {
        self.session.input.key_event(key, pressed);
    }

    /// Drop held keys, e.g. on window blur
    pub fn release_keys(&mut self) {
        self.session.input.release_all();
    }

    /// Advance one frame from held keys; returns the events as JSON
    pub fn frame(&mut self, dt: f32) -> String {
        events_json(&self.session.frame(dt))
    }

    /// Advance one frame from packed intent bits; returns the events as JSON
    pub fn frame_with_bits(&mut self, bits: u16, dt: f32) -> String {
        events_json(&self.session.frame_with_bits(bits, dt))
    }

    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        self.session.world.resize(width, height)
    }

    pub fn is_game_over(&self) -> bool {
        self.session.world.is_game_over()
    }

    /// Entities and counters for drawing, as JSON
    pub fn snapshot(&self) -> String {
        to_json(&self.session.snapshot())
    }

    /// Save the finished run. Returns the board rank if it made the top 10.
    pub fn submit_score(&mut self, name: &str) -> Option<u32> {
        match self.session.finish(name).save {
            crate::highscores::SaveOutcome::Saved { rank } => rank.map(|r| r as u32),
            _ => None,
        }
    }

    /// Stored leaderboard as JSON, best first
    pub fn leaderboard(&self) -> String {
        to_json(&self.session.leaderboard().entries)
    }

    pub fn restart(&mut self) {
        self.session.restart(entropy_seed());
    }
}
