//! Enemy and power-up spawning
//!
//! Enemies enter from a random edge and fly a straight line toward either a
//! random point on screen or a point near the player. The power-up is a
//! singleton: every spawn trigger while one exists is a no-op.

use glam::Vec2;
use rand::Rng;

use super::state::{Enemy, GameEvent, SpawnEdge, World};
use crate::consts::POWER_UP_SIZE;
use crate::{direction_between, facing_angle, polar_to_cartesian};

/// Run the spawner pass for one tick
pub fn run(world: &mut World, events: &mut Vec<GameEvent>) {
    // Opening wave is owed in full on the first pass
    for _ in 0..std::mem::take(&mut world.opening_wave_pending) {
        push_enemy(world, events);
    }

    let chance = world.tuning.enemy_spawn_chance(world.stage);
    if chance > 0.0 && world.rng.random_bool(f64::from(chance)) {
        push_enemy(world, events);
    }

    maybe_spawn_power_up(world, events);
}

fn push_enemy(world: &mut World, events: &mut Vec<GameEvent>) {
    let enemy = spawn_enemy(world);
    log::debug!(
        "Enemy {} spawned from {:?} at ({:.0}, {:.0})",
        enemy.id,
        enemy.edge,
        enemy.pos.x,
        enemy.pos.y
    );
    events.push(GameEvent::EnemySpawned {
        enemy_id: enemy.id,
        edge: enemy.edge,
    });
    world.enemies.push(enemy);
}

/// Roll a new enemy just outside the play area. The caller inserts it.
pub fn spawn_enemy(world: &mut World) -> Enemy {
    let tuning = &world.tuning;
    let (width, height) = (world.width, world.height);
    let rng = &mut world.rng;

    let size = rng.random_range(tuning.enemy_min_size..=tuning.enemy_max_size);
    let edge = SpawnEdge::ALL[rng.random_range(0..SpawnEdge::ALL.len())];

    let span_x = (width - size).max(0.0);
    let span_y = (height - size).max(0.0);
    let pos = match edge {
        SpawnEdge::Top => Vec2::new(rng.random_range(0.0..=span_x), -size),
        SpawnEdge::Right => Vec2::new(width + size, rng.random_range(0.0..=span_y)),
        SpawnEdge::Bottom => Vec2::new(rng.random_range(0.0..=span_x), height + size),
        SpawnEdge::Left => Vec2::new(-size, rng.random_range(0.0..=span_y)),
    };

    let target = if rng.random_bool(f64::from(tuning.wander_chance)) {
        Vec2::new(
            rng.random_range(0.0..=width),
            rng.random_range(0.0..=height),
        )
    } else {
        let radius = rng.random_range(tuning.aim_min_radius..=tuning.aim_max_radius);
        let theta = rng.random_range(0.0..=std::f32::consts::TAU);
        world.player.pos + polar_to_cartesian(radius, theta)
    };

    let (lo, hi) = tuning.enemy_speed_range(world.stage);
    let speed = rng.random_range(lo..=hi);

    // Degenerate aim (target on the spawn point): fall back to the centre,
    // then straight inward from the edge
    let center = Vec2::new(width / 2.0, height / 2.0);
    let (heading, dir) = match direction_between(pos, target) {
        Some(dir) => (target - pos, dir),
        None => match direction_between(pos, center) {
            Some(dir) => (center - pos, dir),
            None => (edge.inward(), edge.inward()),
        },
    };

    let id = world.next_entity_id();
    Enemy {
        id,
        pos,
        size,
        vel: dir * speed,
        angle: facing_angle(heading),
        edge,
    }
}

/// Spawn the power-up if a trigger fires and none exists.
///
/// Triggers: the run-start force flag, an elapsed respawn countdown, or the
/// per-tick random roll.
pub fn maybe_spawn_power_up(world: &mut World, events: &mut Vec<GameEvent>) {
    let mut triggered = std::mem::take(&mut world.force_power_up_spawn);

    if world.pending_power_up.is_some_and(|t| t <= 0.0) {
        world.pending_power_up = None;
        triggered = true;
    }

    if world.power_up.is_some() {
        return;
    }

    let chance = world.tuning.power_up_spawn_chance;
    if !triggered && chance > 0.0 {
        triggered = world.rng.random_bool(f64::from(chance));
    }

    if triggered {
        let pos = random_power_up_pos(world);
        world.place_power_up(pos);
        log::debug!("Power-up spawned at ({:.0}, {:.0})", pos.x, pos.y);
        events.push(GameEvent::PowerUpSpawned { pos });
    }
}

/// Uniform position with the whole power-up inside the play area
fn random_power_up_pos(world: &mut World) -> Vec2 {
    let max_x = (world.width - POWER_UP_SIZE).max(0.0);
    let max_y = (world.height - POWER_UP_SIZE).max(0.0);
    Vec2::new(
        world.rng.random_range(0.0..=max_x),
        world.rng.random_range(0.0..=max_y),
    )
}
