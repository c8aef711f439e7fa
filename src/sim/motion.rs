//! Per-tick motion and lifecycle
//!
//! Moves the ship from intent, advances bullets and enemies along their
//! fixed headings, ages the power-up, and culls anything that has left the
//! play area.

use glam::Vec2;

use super::geom::clamp_into;
use super::state::{GameEvent, World};
use crate::consts::{BULLET_CLEANUP_MARGIN, ENEMY_CLEANUP_MARGIN, REFERENCE_FPS};
use crate::tuning::MotionTiming;

/// Multiplier applied to per-frame bullet/enemy steps for a frame of `dt`
pub fn step_scale(timing: MotionTiming, dt: f32) -> f32 {
    match timing {
        MotionTiming::PerFrame => 1.0,
        MotionTiming::DeltaScaled => dt * REFERENCE_FPS,
    }
}

/// Move the ship along each requested axis, then clamp it into the play area
pub fn move_player(world: &mut World, axis: Vec2, dt: f32) {
    let player = &mut world.player;
    player.pos += axis * player.speed * dt;
    player.pos = clamp_into(player.pos, player.size, world.width, world.height);
}

/// Advance bullets, enemies and timers; remove expired entities
pub fn run(world: &mut World, dt: f32, events: &mut Vec<GameEvent>) {
    let scale = step_scale(world.tuning.motion, dt);
    let (width, height) = (world.width, world.height);

    for bullet in &mut world.bullets {
        bullet.pos += bullet.direction.unit() * bullet.speed * scale;
    }
    world
        .bullets
        .retain(|b| !b.rect().is_beyond(width, height, BULLET_CLEANUP_MARGIN));

    for enemy in &mut world.enemies {
        enemy.pos += enemy.vel * scale;
    }
    world
        .enemies
        .retain(|e| !e.rect().is_beyond(width, height, ENEMY_CLEANUP_MARGIN));

    // Resizes can leave the ship outside until it is clamped here
    world.player.pos = clamp_into(world.player.pos, world.player.size, width, height);

    let lifetime = world.tuning.power_up_lifetime;
    if let Some(power_up) = world.power_up.as_mut() {
        power_up.age += dt;
        if power_up.age >= lifetime {
            world.power_up = None;
            world.pending_power_up = None;
            log::debug!("Power-up expired");
            events.push(GameEvent::PowerUpExpired);
        }
    }

    if let Some(remaining) = world.pending_power_up.as_mut() {
        *remaining = (*remaining - dt).max(0.0);
    }

    world.shield_flash = (world.shield_flash - dt).max(0.0);
}
