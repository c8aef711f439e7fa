//! World state and core simulation types
//!
//! Everything a run needs lives in [`World`]; the systems in `spawn`,
//! `motion` and `collision` only ever borrow it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Run ended (lives reached zero)
    GameOver,
}

/// Travel direction of a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Unit vector in screen space (y grows downward)
    pub fn unit(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Right => Vec2::new(1.0, 0.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
        }
    }
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Units per second
    pub speed: f32,
}

impl Player {
    /// Ship at bottom-center of a `width x height` play area
    pub fn spawn(width: f32, height: f32) -> Self {
        let size = Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT);
        let pos = super::geom::clamp_into(
            Vec2::new((width - size.x) / 2.0, height - PLAYER_SPAWN_BOTTOM_OFFSET),
            size,
            width,
            height,
        );
        Self {
            pos,
            size,
            speed: PLAYER_SPEED,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// Where a bullet fired in `direction` starts (top-left corner)
    pub fn muzzle(&self, direction: Direction) -> Vec2 {
        let Vec2 { x, y } = self.pos;
        let Vec2 { x: w, y: h } = self.size;
        match direction {
            Direction::Up => Vec2::new(x + w / 2.0 - 8.0, y - 10.0),
            Direction::Right => Vec2::new(x + w + 10.0, y + h / 2.0 - 8.0),
            Direction::Down => Vec2::new(x + w / 2.0 - 8.0, y + h + 10.0),
            Direction::Left => Vec2::new(x - 30.0, y + h / 2.0 - 8.0),
        }
    }
}

/// A bullet entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    /// Step per reference frame
    pub speed: f32,
    pub direction: Direction,
}

impl Bullet {
    pub fn new(id: u32, pos: Vec2, direction: Direction) -> Self {
        Self {
            id,
            pos,
            size: Vec2::new(BULLET_WIDTH, BULLET_HEIGHT),
            speed: BULLET_SPEED,
            direction,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

/// Edge of the play area an enemy entered from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnEdge {
    Top,
    Right,
    Bottom,
    Left,
}

impl SpawnEdge {
    pub const ALL: [SpawnEdge; 4] = [
        SpawnEdge::Top,
        SpawnEdge::Right,
        SpawnEdge::Bottom,
        SpawnEdge::Left,
    ];

    /// Edge closest to `point` in a `width x height` area
    pub fn nearest(point: Vec2, width: f32, height: f32) -> Self {
        let distances = [
            (SpawnEdge::Top, point.y),
            (SpawnEdge::Right, width - point.x),
            (SpawnEdge::Bottom, height - point.y),
            (SpawnEdge::Left, point.x),
        ];
        distances
            .into_iter()
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map_or(SpawnEdge::Top, |(edge, _)| edge)
    }

    /// Direction pointing from this edge into the play area
    pub fn inward(self) -> Vec2 {
        match self {
            SpawnEdge::Top => Vec2::new(0.0, 1.0),
            SpawnEdge::Right => Vec2::new(-1.0, 0.0),
            SpawnEdge::Bottom => Vec2::new(0.0, -1.0),
            SpawnEdge::Left => Vec2::new(1.0, 0.0),
        }
    }
}

/// An enemy ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    /// Side length (enemies are square)
    pub size: f32,
    /// Step per reference frame, fixed at spawn
    pub vel: Vec2,
    /// Facing angle for rendering (radians)
    pub angle: f32,
    pub edge: SpawnEdge,
}

impl Enemy {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, Vec2::splat(self.size))
    }
}

/// The stage-advancing pickup (bomb)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub pos: Vec2,
    pub size: Vec2,
    /// Seconds since spawn
    pub age: f32,
}

impl PowerUp {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            size: Vec2::splat(POWER_UP_SIZE),
            age: 0.0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

/// Final counters of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub score: u64,
    pub stage: u32,
    pub enemies_killed: u64,
}

/// Things that happened during a tick, in pass order.
///
/// Audio and visual feedback key off these; the simulation never plays
/// or draws anything itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    BulletFired { bullet_id: u32, direction: Direction },
    EnemySpawned { enemy_id: u32, edge: SpawnEdge },
    PowerUpSpawned { pos: Vec2 },
    PowerUpExpired,
    EnemyKilled { enemy_id: u32, bullet_id: u32, points: u64 },
    PlayerHit { enemy_id: u32, lives_left: u32 },
    /// Start (or restart) the shield flash on the ship
    ShieldFlash { duration: f32 },
    StageUp {
        stage: u32,
        enemies_cleared: u64,
        bonus_score: u64,
        bonus_life: bool,
    },
    GameOver(RunStats),
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct World {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Balance parameters for this run
    pub tuning: Tuning,
    /// Play-area size
    pub width: f32,
    pub height: f32,
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u32,
    /// Difficulty tier, starts at 1
    pub stage: u32,
    pub enemies_killed: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Simulated seconds
    pub elapsed: f32,
    /// Remaining shield flash (seconds, presentation only)
    pub shield_flash: f32,
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub power_up: Option<PowerUp>,
    /// Countdown until a scheduled power-up respawn (seconds)
    pub pending_power_up: Option<f32>,
    /// Spawn a power-up on the next spawner pass
    pub force_power_up_spawn: bool,
    /// Enemies still owed by the opening wave
    pub opening_wave_pending: u32,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl World {
    /// New run with default tuning
    pub fn new(width: f32, height: f32, seed: u64) -> Self {
        Self::with_tuning(width, height, seed, Tuning::default())
    }

    /// New run with explicit tuning
    pub fn with_tuning(width: f32, height: f32, seed: u64, tuning: Tuning) -> Self {
        let tuning = tuning.sanitized();
        let (width, height) = if valid_extent(width) && valid_extent(height) {
            (width, height)
        } else {
            log::warn!("Invalid play area {width}x{height}, using 1x1");
            (1.0, 1.0)
        };

        Self {
            seed,
            lives: tuning.starting_lives,
            force_power_up_spawn: tuning.force_initial_power_up,
            opening_wave_pending: tuning.opening_wave,
            tuning,
            width,
            height,
            phase: GamePhase::Running,
            score: 0,
            stage: 1,
            enemies_killed: 0,
            time_ticks: 0,
            elapsed: 0.0,
            shield_flash: 0.0,
            player: Player::spawn(width, height),
            bullets: Vec::new(),
            enemies: Vec::new(),
            power_up: None,
            pending_power_up: None,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn stats(&self) -> RunStats {
        RunStats {
            score: self.score,
            stage: self.stage,
            enemies_killed: self.enemies_killed,
        }
    }

    /// Change the play-area bounds. Entity positions are left as they are;
    /// the next tick clamps the player and culls anything now out of range.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        if !valid_extent(width) || !valid_extent(height) {
            log::warn!("Ignoring resize to {width}x{height}");
            return false;
        }
        self.width = width;
        self.height = height;
        true
    }

    /// Place the power-up at `pos` unless one already exists
    pub fn place_power_up(&mut self, pos: Vec2) -> bool {
        if self.power_up.is_some() {
            return false;
        }
        self.power_up = Some(PowerUp::new(pos));
        true
    }

    /// Fire a bullet from the ship's muzzle
    pub fn fire(&mut self, direction: Direction) -> u32 {
        let id = self.next_entity_id();
        let pos = self.player.muzzle(direction);
        self.bullets.push(Bullet::new(id, pos, direction));
        id
    }

    /// Insert a fully specified enemy (scripted waves, tests). Its edge is
    /// the one nearest its centre.
    pub fn insert_enemy(&mut self, pos: Vec2, size: f32, vel: Vec2) -> u32 {
        let id = self.next_entity_id();
        let edge = SpawnEdge::nearest(pos + Vec2::splat(size / 2.0), self.width, self.height);
        self.enemies.push(Enemy {
            id,
            pos,
            size,
            vel,
            angle: crate::facing_angle(vel),
            edge,
        });
        id
    }

    /// Insert a bullet at an explicit position
    pub fn insert_bullet(&mut self, pos: Vec2, direction: Direction) -> u32 {
        let id = self.next_entity_id();
        self.bullets.push(Bullet::new(id, pos, direction));
        id
    }
}

fn valid_extent(v: f32) -> bool {
    v.is_finite() && v > 0.0
}
