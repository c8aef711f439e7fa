//! Collision detection and response
//!
//! Three passes run in a fixed order every tick: bullets against enemies,
//! enemies against the ship, then the ship against the power-up. All tests
//! are strict axis-aligned box overlaps.

use super::state::{GameEvent, World};

/// Run all collision passes in order
pub fn run(world: &mut World, events: &mut Vec<GameEvent>) {
    bullets_vs_enemies(world, events);
    enemies_vs_player(world, events);
    player_vs_power_up(world, events);
}

/// Each bullet destroys the first live enemy it overlaps.
///
/// A bullet and an enemy each take part in at most one hit per tick.
pub fn bullets_vs_enemies(world: &mut World, events: &mut Vec<GameEvent>) {
    if world.bullets.is_empty() || world.enemies.is_empty() {
        return;
    }

    let points = world.tuning.kill_score(world.stage);
    let mut enemy_dead = vec![false; world.enemies.len()];
    let enemies = &world.enemies;
    let mut kills: Vec<(u32, u32)> = Vec::new();

    world.bullets.retain(|bullet| {
        let hitbox = bullet.rect();
        let hit = enemies
            .iter()
            .enumerate()
            .find(|(i, enemy)| !enemy_dead[*i] && hitbox.overlaps(&enemy.rect()));
        match hit {
            Some((i, enemy)) => {
                enemy_dead[i] = true;
                kills.push((enemy.id, bullet.id));
                false
            }
            None => true,
        }
    });

    if kills.is_empty() {
        return;
    }

    let mut dead = enemy_dead.into_iter();
    world.enemies.retain(|_| !dead.next().unwrap_or(false));

    for (enemy_id, bullet_id) in kills {
        world.score = world.score.saturating_add(points);
        world.enemies_killed += 1;
        events.push(GameEvent::EnemyKilled {
            enemy_id,
            bullet_id,
            points,
        });
    }
}

/// Every enemy touching the ship is destroyed and costs one life
pub fn enemies_vs_player(world: &mut World, events: &mut Vec<GameEvent>) {
    let ship = world.player.rect();
    let mut hits: Vec<u32> = Vec::new();
    world.enemies.retain(|enemy| {
        if enemy.rect().overlaps(&ship) {
            hits.push(enemy.id);
            false
        } else {
            true
        }
    });

    for enemy_id in hits {
        world.lives = world.lives.saturating_sub(1);
        world.shield_flash = world.tuning.hit_flash;
        log::debug!("Player hit by enemy {enemy_id}, {} lives left", world.lives);
        events.push(GameEvent::PlayerHit {
            enemy_id,
            lives_left: world.lives,
        });
        events.push(GameEvent::ShieldFlash {
            duration: world.tuning.hit_flash,
        });
    }
}

/// Touching the power-up advances the stage and clears the screen
pub fn player_vs_power_up(world: &mut World, events: &mut Vec<GameEvent>) {
    let touched = world
        .power_up
        .as_ref()
        .is_some_and(|p| p.rect().overlaps(&world.player.rect()));
    if !touched {
        return;
    }

    world.stage = world.stage.saturating_add(1);
    let stage = world.stage;

    let enemies_cleared = world.enemies.len() as u64;
    world.enemies.clear();
    world.enemies_killed += enemies_cleared;

    let bonus_score = world.tuning.stage_up_score(stage);
    world.score = world.score.saturating_add(bonus_score);

    let bonus_life = world.tuning.grants_bonus_life(stage);
    if bonus_life {
        world.lives = world.lives.saturating_add(1);
    }

    world.power_up = None;
    world.pending_power_up = Some(world.tuning.power_up_respawn_delay);
    world.shield_flash = world.tuning.stage_up_flash;

    log::info!(
        "Stage {stage} reached: cleared {enemies_cleared} enemies, +{bonus_score} score{}",
        if bonus_life { ", +1 life" } else { "" }
    );
    events.push(GameEvent::StageUp {
        stage,
        enemies_cleared,
        bonus_score,
        bonus_life,
    });
    events.push(GameEvent::ShieldFlash {
        duration: world.tuning.stage_up_flash,
    });
}
