//! Simulation tick
//!
//! One call advances the world by one rendered frame, in a fixed order:
//! intent, spawning, motion, collisions, then the terminal check.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Direction, GameEvent, GamePhase, World};
use super::{collision, motion, spawn};
use crate::consts::MAX_FRAME_DT;

/// Input intent for a single tick.
///
/// Fire flags are edge-triggered: the input layer sets them only on the
/// tick a fire key goes down, never while it is held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    pub move_up: bool,
    pub move_down: bool,
    pub fire_up: bool,
    pub fire_right: bool,
    pub fire_down: bool,
    pub fire_left: bool,
}

impl TickInput {
    pub const MOVE_LEFT: u16 = 1 << 0;
    pub const MOVE_RIGHT: u16 = 1 << 1;
    pub const MOVE_UP: u16 = 1 << 2;
    pub const MOVE_DOWN: u16 = 1 << 3;
    pub const FIRE_UP: u16 = 1 << 4;
    pub const FIRE_RIGHT: u16 = 1 << 5;
    pub const FIRE_DOWN: u16 = 1 << 6;
    pub const FIRE_LEFT: u16 = 1 << 7;
    const KNOWN_BITS: u16 = 0xff;

    /// Decode packed intent bits (e.g. from a JS host).
    ///
    /// Any unknown bit marks the whole word as malformed and yields an idle
    /// intent.
    pub fn from_bits(bits: u16) -> Self {
        if bits & !Self::KNOWN_BITS != 0 {
            log::warn!("Ignoring malformed intent bits {bits:#06x}");
            return Self::default();
        }
        let has = |flag: u16| bits & flag != 0;
        Self {
            move_left: has(Self::MOVE_LEFT),
            move_right: has(Self::MOVE_RIGHT),
            move_up: has(Self::MOVE_UP),
            move_down: has(Self::MOVE_DOWN),
            fire_up: has(Self::FIRE_UP),
            fire_right: has(Self::FIRE_RIGHT),
            fire_down: has(Self::FIRE_DOWN),
            fire_left: has(Self::FIRE_LEFT),
        }
    }

    /// Movement axis; opposite keys cancel
    pub fn movement(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        Vec2::new(
            axis(self.move_left, self.move_right),
            axis(self.move_up, self.move_down),
        )
    }

    /// Directions with a fire edge this tick, in a stable order
    pub fn fired(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL.into_iter().filter(move |dir| match dir {
            Direction::Up => self.fire_up,
            Direction::Right => self.fire_right,
            Direction::Down => self.fire_down,
            Direction::Left => self.fire_left,
        })
    }
}

/// Outcome of one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickResult {
    /// Events in pass order
    pub events: Vec<GameEvent>,
    /// The run is over; further ticks do nothing
    pub terminal: bool,
}

/// Advance the world by one frame of `dt` seconds
pub fn tick(world: &mut World, input: &TickInput, dt: f32) -> TickResult {
    if world.phase == GamePhase::GameOver {
        return TickResult {
            events: Vec::new(),
            terminal: true,
        };
    }

    let dt = sanitize_dt(dt);
    let mut events = Vec::new();

    world.time_ticks += 1;
    world.elapsed += dt;

    // Intent: fire edges first so bullets leave from the pre-move muzzle
    for direction in input.fired() {
        let bullet_id = world.fire(direction);
        events.push(GameEvent::BulletFired {
            bullet_id,
            direction,
        });
    }
    motion::move_player(world, input.movement(), dt);

    spawn::run(world, &mut events);
    motion::run(world, dt, &mut events);
    collision::run(world, &mut events);

    if world.lives == 0 {
        world.phase = GamePhase::GameOver;
        let stats = world.stats();
        log::info!(
            "Game over: score {}, stage {}, {} enemies killed",
            stats.score,
            stats.stage,
            stats.enemies_killed
        );
        events.push(GameEvent::GameOver(stats));
    }

    TickResult {
        events,
        terminal: world.phase == GamePhase::GameOver,
    }
}

/// Non-finite or negative frame times become 0; long stalls are capped
fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 {
        dt.min(MAX_FRAME_DT)
    } else {
        if dt != 0.0 {
            log::warn!("Ignoring invalid frame time {dt}");
        }
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{PLAYER_HEIGHT, PLAYER_WIDTH, SIM_DT};
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn quiet_world() -> World {
        World::with_tuning(800.0, 600.0, 12345, Tuning::quiet())
    }

    #[test]
    fn test_stage_up_scenario() {
        let mut world = World::new(800.0, 600.0, 12345);
        world.force_power_up_spawn = false;
        world.place_power_up(Vec2::new(100.0, 100.0));
        world.player.pos = Vec2::new(100.0, 100.0);

        let result = tick(&mut world, &TickInput::default(), SIM_DT);

        assert_eq!(world.stage, 2);
        assert_eq!(world.score, 1000);
        assert!(world.enemies.is_empty());
        assert!(world.power_up.is_none());
        assert!(!result.terminal);
        // Everything spawned this tick (opening wave included) was cleared
        let spawned = result
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::EnemySpawned { .. }))
            .count() as u64;
        assert!(spawned >= 5);
        assert_eq!(world.enemies_killed, spawned);
        assert!(result.events.iter().any(|e| matches!(
            e,
            GameEvent::StageUp {
                stage: 2,
                bonus_score: 1000,
                ..
            }
        )));
    }

    #[test]
    fn test_bullet_kill_scenario() {
        let mut world = quiet_world();
        world.insert_bullet(Vec2::new(50.0, 50.0), Direction::Right);
        world.insert_enemy(Vec2::new(50.0, 50.0), 40.0, Vec2::ZERO);

        let result = tick(&mut world, &TickInput::default(), SIM_DT);

        assert_eq!(world.score, 10);
        assert_eq!(world.enemies_killed, 1);
        assert!(world.bullets.is_empty());
        assert!(world.enemies.is_empty());
        assert!(!result.terminal);
    }

    #[test]
    fn test_last_life_scenario() {
        let mut world = quiet_world();
        world.lives = 1;
        let ship = world.player.pos;
        world.insert_enemy(ship + Vec2::new(10.0, 10.0), 40.0, Vec2::ZERO);

        let result = tick(&mut world, &TickInput::default(), SIM_DT);

        assert_eq!(world.lives, 0);
        assert!(result.terminal);
        assert_eq!(world.phase, GamePhase::GameOver);
        assert!(matches!(
            result.events.last(),
            Some(GameEvent::GameOver(stats)) if stats.score == 0 && stats.stage == 1
        ));
    }

    #[test]
    fn test_game_over_is_terminal_and_inert() {
        let mut world = quiet_world();
        world.lives = 1;
        let ship = world.player.pos;
        world.insert_enemy(ship, 40.0, Vec2::ZERO);
        world.insert_bullet(Vec2::new(100.0, 100.0), Direction::Up);
        tick(&mut world, &TickInput::default(), SIM_DT);
        assert!(world.is_game_over());

        let ticks = world.time_ticks;
        let pos = world.player.pos;
        let bullet_pos = world.bullets[0].pos;
        let input = TickInput {
            move_left: true,
            fire_up: true,
            ..Default::default()
        };
        for _ in 0..10 {
            let result = tick(&mut world, &input, SIM_DT);
            assert!(result.terminal);
            assert!(result.events.is_empty());
        }
        assert_eq!(world.time_ticks, ticks);
        assert_eq!(world.player.pos, pos);
        assert_eq!(world.bullets.len(), 1);
        assert_eq!(world.bullets[0].pos, bullet_pos);
    }

    #[test]
    fn test_fire_edge_creates_one_bullet_per_direction() {
        let mut world = quiet_world();
        let input = TickInput {
            fire_up: true,
            fire_left: true,
            ..Default::default()
        };
        let result = tick(&mut world, &input, SIM_DT);
        assert_eq!(world.bullets.len(), 2);

        let fired: Vec<Direction> = result
            .events
            .iter()
            .filter_map(|e| match e {
                GameEvent::BulletFired { direction, .. } => Some(*direction),
                _ => None,
            })
            .collect();
        assert_eq!(fired, vec![Direction::Up, Direction::Left]);

        // No fire flags, no new bullets
        tick(&mut world, &TickInput::default(), SIM_DT);
        assert_eq!(world.bullets.len(), 2);
    }

    #[test]
    fn test_movement_intent() {
        let mut world = quiet_world();
        world.player.pos = Vec2::new(400.0, 300.0);
        let input = TickInput {
            move_right: true,
            move_up: true,
            ..Default::default()
        };
        tick(&mut world, &input, 0.1);
        assert!((world.player.pos.x - 420.0).abs() < 1e-3);
        assert!((world.player.pos.y - 280.0).abs() < 1e-3);

        // Opposite keys cancel
        let input = TickInput {
            move_left: true,
            move_right: true,
            ..Default::default()
        };
        tick(&mut world, &input, 0.1);
        assert!((world.player.pos.x - 420.0).abs() < 1e-3);
    }

    #[test]
    fn test_invalid_dt_is_ignored() {
        let mut world = quiet_world();
        world.player.pos = Vec2::new(400.0, 300.0);
        let input = TickInput {
            move_right: true,
            ..Default::default()
        };
        for dt in [f32::NAN, f32::INFINITY, -1.0] {
            tick(&mut world, &input, dt);
        }
        assert_eq!(world.player.pos, Vec2::new(400.0, 300.0));
        assert_eq!(world.elapsed, 0.0);

        // Long stalls are capped
        tick(&mut world, &input, 10.0);
        assert!((world.player.pos.x - 450.0).abs() < 1e-3);
    }

    #[test]
    fn test_from_bits() {
        let input = TickInput::from_bits(TickInput::MOVE_LEFT | TickInput::FIRE_DOWN);
        assert!(input.move_left);
        assert!(input.fire_down);
        assert!(!input.move_right && !input.fire_up);

        // Unknown bits poison the whole word
        let input = TickInput::from_bits(TickInput::MOVE_LEFT | 0x100);
        assert_eq!(input, TickInput::default());
    }

    #[test]
    fn test_deferred_power_up_respawn() {
        let mut world = quiet_world();
        world.place_power_up(world.player.pos);
        tick(&mut world, &TickInput::default(), SIM_DT);
        assert_eq!(world.stage, 2);
        assert!(world.power_up.is_none());

        // Move away so the new bomb is not collected on arrival
        world.player.pos = Vec2::new(0.0, 0.0);
        let mut spawned_at = None;
        for i in 1..=400 {
            let result = tick(&mut world, &TickInput::default(), SIM_DT);
            if result
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::PowerUpSpawned { .. }))
            {
                spawned_at = Some(i);
                break;
            }
        }
        // 3 seconds at 60 Hz, give or take a frame of rounding
        let spawned_at = spawned_at.expect("power-up respawned");
        assert!((180..=182).contains(&spawned_at), "respawned at tick {spawned_at}");
    }

    #[test]
    fn test_same_seed_same_run() {
        let inputs = [
            TickInput {
                move_left: true,
                fire_up: true,
                ..Default::default()
            },
            TickInput {
                move_down: true,
                ..Default::default()
            },
            TickInput {
                fire_right: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        let mut a = World::new(800.0, 600.0, 99999);
        let mut b = World::new(800.0, 600.0, 99999);
        for _ in 0..300 {
            for input in &inputs {
                let ra = tick(&mut a, input, SIM_DT);
                let rb = tick(&mut b, input, SIM_DT);
                assert_eq!(ra, rb);
            }
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.enemies.len(), b.enemies.len());
        assert_eq!(a.player.pos, b.player.pos);
    }

    #[test]
    fn test_resize_then_tick_clamps_player() {
        let mut world = quiet_world();
        world.player.pos = Vec2::new(700.0, 500.0);
        world.resize(400.0, 300.0);
        tick(&mut world, &TickInput::default(), SIM_DT);
        assert_eq!(world.player.pos, Vec2::new(340.0, 240.0));
    }

    #[test]
    fn test_extreme_tuning_never_panics() {
        let tuning = Tuning::from_json(
            r#"{ "enemy_max_size": 1e39, "enemy_base_speed": 1e39, "aim_max_radius": 1e39,
                 "enemy_speed_per_stage": 3e38, "enemy_spawn_chance": 1.0 }"#,
        )
        .unwrap();
        let mut world = World::with_tuning(800.0, 600.0, 4242, tuning);
        world.stage = u32::MAX - 1;
        for _ in 0..120 {
            tick(&mut world, &TickInput::default(), SIM_DT);
        }
        assert!(world.enemies.iter().all(|e| e.pos.is_finite() && e.vel.is_finite()));
    }

    fn arb_input() -> impl Strategy<Value = TickInput> {
        any::<u8>().prop_map(|bits| TickInput::from_bits(bits as u16))
    }

    proptest! {
        #[test]
        fn prop_player_stays_in_bounds(
            inputs in prop::collection::vec((arb_input(), -1.0f32..5.0), 1..60),
            width in 1.0f32..2000.0,
            height in 1.0f32..2000.0,
        ) {
            let mut world = World::new(width, height, 7);
            for (input, dt) in inputs {
                tick(&mut world, &input, dt);
                let max_x = (world.width - PLAYER_WIDTH).max(0.0);
                let max_y = (world.height - PLAYER_HEIGHT).max(0.0);
                prop_assert!(world.player.pos.x >= 0.0 && world.player.pos.x <= max_x);
                prop_assert!(world.player.pos.y >= 0.0 && world.player.pos.y <= max_y);
            }
        }

        #[test]
        fn prop_lives_only_grow_on_bonus_stages(
            inputs in prop::collection::vec(arb_input(), 1..200),
            seed in any::<u64>(),
        ) {
            let mut world = World::new(800.0, 600.0, seed);
            let mut lives = world.lives;
            let mut stage = world.stage;
            for input in inputs {
                let result = tick(&mut world, &input, SIM_DT);
                prop_assert!(world.stage >= stage);
                if world.lives > lives {
                    prop_assert_eq!(world.lives, lives + 1);
                    prop_assert_eq!(world.stage, stage + 1);
                    prop_assert!(world.stage % 3 == 0);
                }
                prop_assert!(world
                    .power_up
                    .as_ref()
                    .is_none_or(|p| p.rect().is_inside(world.width, world.height)));
                lives = world.lives;
                stage = world.stage;
                if result.terminal {
                    break;
                }
            }
        }
    }
}
