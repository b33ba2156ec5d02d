/// The tick driver: advances the world by one tick.
///
/// Processing order:
///   1. Behavior pass — every actor alive at the start of the tick is
///      visited in insertion order; actors killed earlier in the same
///      pass are skipped. Spawns are staged, deaths only flip flags.
///   2. Merge staged spawns (first visited next tick).
///   3. Reap dead actors.
///   4. Classify: a dead player costs a life and ends the tick with
///      `PlayerDied` (respawn) or `FinishedLevel` (out of lives).
///   5. Refresh the status line.
///
/// Behavior code reads positions into locals, asks the world's spatial
/// queries, then writes back. Nothing holds a borrow across a query.

use crate::domain::actor::{Actor, ActorKind, Facing, Key};
use crate::domain::grid;

use super::event::GameEvent;
use super::world::{TickStatus, World};

pub const ENEMY_POINTS: u32 = 100;
pub const EXTRA_LIFE_POINTS: u32 = 50;
pub const GARLIC_POINTS: u32 = 25;

/// Jump arc: phase 0 rises, phases 1..=3 step over, phase 4 ends the
/// arc and gravity brings the player down.
const JUMP_LAST_PHASE: u8 = 4;

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn tick(world: &mut World, input: Option<Key>) -> (TickStatus, Vec<GameEvent>) {
    let mut events = Vec::new();
    world.tick += 1;

    // Staged spawns are merged after the pass, so the population does
    // not grow under this loop.
    let count = world.actors.len();
    for i in 0..count {
        if !world.actors[i].alive {
            continue;
        }
        step_actor(world, i, input, &mut events);
    }

    world.merge_spawns();
    world.reap();

    if !world.player_alive() {
        world.lives = world.lives.saturating_sub(1);
        events.push(GameEvent::PlayerKilled);
        let status = if world.lives > 0 {
            TickStatus::PlayerDied
        } else {
            TickStatus::FinishedLevel
        };
        return (status, events);
    }

    world.update_status();
    (TickStatus::Continue, events)
}

fn step_actor(world: &mut World, i: usize, input: Option<Key>, events: &mut Vec<GameEvent>) {
    match world.actors[i].kind {
        // Static scenery is inert.
        ActorKind::Floor | ActorKind::Ladder => {}
        ActorKind::Player(_) => step_player(world, i, input, events),
        ActorKind::Bonfire => step_bonfire(world, i),
        ActorKind::Fireball { .. } => step_fireball(world, i),
        ActorKind::Barrel => step_barrel(world, i),
        ActorKind::Koopa { .. } => step_koopa(world, i, events),
        ActorKind::Kong { .. } => step_kong(world, i, events),
        ActorKind::Burp { .. } => step_burp(world, i, events),
        ActorKind::ExtraLife | ActorKind::Garlic => step_goodie(world, i, events),
    }
}

#[inline]
fn pos(world: &World, i: usize) -> (i32, i32) {
    (world.actors[i].x, world.actors[i].y)
}

// ══════════════════════════════════════════════════════════════
// Player
// ══════════════════════════════════════════════════════════════

fn step_player(world: &mut World, i: usize, input: Option<Key>, events: &mut Vec<GameEvent>) {
    // Frozen: tick the counter, ignore input entirely.
    if let ActorKind::Player(st) = &mut world.actors[i].kind {
        if st.frozen_ticks > 0 {
            st.frozen_ticks -= 1;
            return;
        }
    }

    match input {
        Some(Key::Left) => try_walk(world, i, Facing::Left),
        Some(Key::Right) => try_walk(world, i, Facing::Right),
        Some(Key::Up) => {
            // Climb only while standing on a ladder cell.
            let (x, y) = pos(world, i);
            if world.is_ladder_at(x, y) && world.can_move_to(x, y + 1) {
                world.actors[i].y += 1;
            }
        }
        Some(Key::Down) => {
            let (x, y) = pos(world, i);
            if world.is_ladder_at(x, y - 1) && world.can_move_to(x, y - 1) {
                world.actors[i].y -= 1;
            }
        }
        Some(Key::Jump) => {
            let (x, y) = pos(world, i);
            let grounded = world.is_floor_at(x, y - 1);
            if let ActorKind::Player(st) = &mut world.actors[i].kind {
                if grounded && !st.jumping {
                    st.jumping = true;
                    st.jump_phase = 0;
                }
            }
        }
        Some(Key::Burp) => fire_burp(world, i, events),
        None => {}
    }

    let jumping = matches!(world.actors[i].kind, ActorKind::Player(st) if st.jumping);
    if jumping {
        advance_jump(world, i);
    } else {
        apply_gravity(world, i);
    }
}

fn try_walk(world: &mut World, i: usize, dir: Facing) {
    world.actors[i].facing = dir;
    let (x, y) = pos(world, i);
    let nx = x + dir.dx();
    if world.can_move_to(nx, y) {
        world.actors[i].x = nx;
    }
}

fn fire_burp(world: &mut World, i: usize, events: &mut Vec<GameEvent>) {
    if let ActorKind::Player(st) = &mut world.actors[i].kind {
        if st.burps == 0 {
            return;
        }
        st.burps -= 1;
    } else {
        return;
    }

    let (x, y) = pos(world, i);
    let facing = world.actors[i].facing;
    let (bx, by) = (x + facing.dx(), y);

    // The blast lands on the spawn tick; the staged burp repeats it on
    // each of its lifespan ticks.
    let lifespan = world.timing.burp_lifespan_ticks;
    world.stage(Actor::burp(bx, by, facing, lifespan));
    events.push(GameEvent::BurpFired { x: bx, y: by });

    let destroyed = world.destroy_enemies_near(bx, by);
    if destroyed > 0 {
        events.push(GameEvent::EnemiesDestroyed { count: destroyed });
    }
}

fn advance_jump(world: &mut World, i: usize) {
    let (x, y) = pos(world, i);
    let facing = world.actors[i].facing;
    let phase = match world.actors[i].kind {
        ActorKind::Player(st) => st.jump_phase,
        _ => return,
    };

    match phase {
        0 => {
            // Ascent stops on contact with a ceiling cell.
            if world.is_floor_at(x, y + 1) || !world.can_move_to(x, y + 1) {
                end_jump(world, i);
                return;
            }
            world.actors[i].y += 1;
        }
        1..=3 => {
            // Step over; a blocked step skips the move but the arc goes on.
            let nx = x + facing.dx();
            if !world.is_wall_at(nx, y) && world.can_move_to(nx, y) {
                world.actors[i].x = nx;
            }
        }
        _ => {
            debug_assert!(phase == JUMP_LAST_PHASE);
            end_jump(world, i);
            return;
        }
    }

    if let ActorKind::Player(st) = &mut world.actors[i].kind {
        st.jump_phase += 1;
    }

    // Landing atop a floor or grabbing a ladder ends the arc early.
    let (x, y) = pos(world, i);
    if world.is_floor_at(x, y - 1) || world.is_ladder_at(x, y) {
        end_jump(world, i);
    }
}

fn end_jump(world: &mut World, i: usize) {
    if let ActorKind::Player(st) = &mut world.actors[i].kind {
        st.jumping = false;
        st.jump_phase = 0;
    }
}

/// Fall one cell unless a floor is directly below or a ladder supports
/// the player (its own cell, or the cell below when standing on top of
/// a ladder).
fn apply_gravity(world: &mut World, i: usize) {
    let (x, y) = pos(world, i);
    if world.is_floor_at(x, y - 1) {
        return;
    }
    if world.is_ladder_at(x, y) || world.is_ladder_at(x, y - 1) {
        return;
    }
    if y > 0 {
        world.actors[i].y -= 1;
    }
}

// ══════════════════════════════════════════════════════════════
// Hazards and enemies
// ══════════════════════════════════════════════════════════════

fn step_bonfire(world: &mut World, i: usize) {
    let (x, y) = pos(world, i);
    if world.player_at(x, y) {
        world.kill_player();
    }
}

fn step_fireball(world: &mut World, i: usize) {
    let mut expired = false;
    if let ActorKind::Fireball { lifespan } = &mut world.actors[i].kind {
        *lifespan = lifespan.saturating_sub(1);
        expired = *lifespan == 0;
    }
    if expired {
        world.actors[i].set_dead();
        return;
    }

    travel(world, i);

    let (x, y) = pos(world, i);
    if world.player_at(x, y) {
        world.kill_player();
    }
}

fn step_barrel(world: &mut World, i: usize) {
    let (x, y) = pos(world, i);
    if y > 0 && !world.is_floor_at(x, y - 1) {
        // Falls; keeps its rolling direction for the landing.
        world.actors[i].y -= 1;
    } else {
        travel(world, i);
    }

    let (x, y) = pos(world, i);
    if world.player_at(x, y) {
        world.kill_player();
    }
}

/// Move one cell in the facing direction; reverse at walls and at the
/// playfield edge. A reversing actor does not move that tick.
fn travel(world: &mut World, i: usize) {
    let (x, y) = pos(world, i);
    let facing = world.actors[i].facing;
    let nx = x + facing.dx();
    if !grid::in_bounds(nx, y) || world.is_wall_at(nx, y) {
        world.actors[i].facing = facing.flip();
    } else {
        world.actors[i].x = nx;
    }
}

fn step_koopa(world: &mut World, i: usize, events: &mut Vec<GameEvent>) {
    let due = match &mut world.actors[i].kind {
        ActorKind::Koopa { move_cooldown } => {
            if *move_cooldown > 0 {
                *move_cooldown -= 1;
                false
            } else {
                true
            }
        }
        _ => false,
    };

    if due {
        let (x, y) = pos(world, i);
        let facing = world.actors[i].facing;
        let nx = x + facing.dx();
        // Reverse at walls and at floor edges (no support under the
        // target cell).
        let blocked = !grid::in_bounds(nx, y)
            || world.is_wall_at(nx, y)
            || !world.is_floor_at(nx, y - 1);
        if blocked {
            world.actors[i].facing = facing.flip();
        } else {
            world.actors[i].x = nx;
        }

        let period = world.timing.koopa_move_ticks;
        if let ActorKind::Koopa { move_cooldown } = &mut world.actors[i].kind {
            *move_cooldown = period;
        }
    }

    // Contact freezes, never kills.
    let (x, y) = pos(world, i);
    if world.player_at(x, y) {
        let ticks = world.timing.freeze_ticks;
        if world.freeze_player(ticks) {
            events.push(GameEvent::PlayerFrozen { ticks });
        }
    }
}

fn step_kong(world: &mut World, i: usize, events: &mut Vec<GameEvent>) {
    let due = match &mut world.actors[i].kind {
        ActorKind::Kong { throw_cooldown } => {
            if *throw_cooldown > 0 {
                *throw_cooldown -= 1;
                false
            } else {
                true
            }
        }
        _ => false,
    };
    if !due {
        return;
    }

    let period = world.timing.kong_throw_ticks;
    if let ActorKind::Kong { throw_cooldown } = &mut world.actors[i].kind {
        *throw_cooldown = period;
    }

    let (x, y) = pos(world, i);
    let facing = world.actors[i].facing;
    let bx = x + facing.dx();
    world.stage(Actor::barrel(bx, y, facing));
    events.push(GameEvent::BarrelThrown { x: bx, y });
}

// ══════════════════════════════════════════════════════════════
// Projectiles and goodies
// ══════════════════════════════════════════════════════════════

fn step_burp(world: &mut World, i: usize, events: &mut Vec<GameEvent>) {
    let (x, y) = pos(world, i);
    let destroyed = world.destroy_enemies_near(x, y);
    if destroyed > 0 {
        events.push(GameEvent::EnemiesDestroyed { count: destroyed });
    }

    let mut expired = false;
    if let ActorKind::Burp { lifespan } = &mut world.actors[i].kind {
        *lifespan = lifespan.saturating_sub(1);
        expired = *lifespan == 0;
    }
    if expired {
        world.actors[i].set_dead();
    }
}

fn step_goodie(world: &mut World, i: usize, events: &mut Vec<GameEvent>) {
    let (x, y) = pos(world, i);
    if !world.player_at(x, y) {
        return;
    }

    let points = match world.actors[i].kind {
        ActorKind::ExtraLife => EXTRA_LIFE_POINTS,
        _ => GARLIC_POINTS,
    };
    world.score += points;

    match world.actors[i].kind {
        ActorKind::ExtraLife => {
            world.increment_lives();
            events.push(GameEvent::ExtraLifeGained);
        }
        ActorKind::Garlic => {
            if let Some(st) = world.player_state_mut() {
                st.burps += 1;
            }
        }
        _ => {}
    }

    world.actors[i].set_dead();
    events.push(GameEvent::GoodieCollected { x, y, points });
}

// ══════════════════════════════════════════════════════════════
// Tests
// ══════════════════════════════════════════════════════════════
