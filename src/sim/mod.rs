//! Simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Time comes in only as the tick's `dt`
//! - Seeded RNG only (owned by the `World`)
//! - Fixed pass order within a tick
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod geom;
pub mod motion;
pub mod spawn;
pub mod state;
pub mod tick;

pub use geom::Rect;
pub use state::{
    Bullet, Direction, Enemy, GameEvent, GamePhase, Player, PowerUp, RunStats, SpawnEdge, World,
};
pub use tick::{TickInput, TickResult, tick};
