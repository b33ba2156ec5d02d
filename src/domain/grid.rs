/// Spatial queries over the actor population.
///
/// There is no separate tile map: the playfield IS the actor list, and
/// every query is a linear scan over it. At 20×20 grid scale that is
/// cheap, and it keeps a single source of truth — an actor's position
/// fields are the only record of what occupies a cell.
///
/// Dead actors are invisible to every query: an actor marked dead during
/// the current tick no longer blocks, supports, or registers as an enemy.
///
/// ## Query truth table
/// ┌──────────────────────────┬───────────────────────────────────────┐
/// │ Query                     │ True iff                              │
/// ├──────────────────────────┼───────────────────────────────────────┤
/// │ can_move_to(x, y)         │ in bounds, and no live non-walkable   │
/// │                           │ actor occupies (x, y)                 │
/// │ is_floor_at(x, y)         │ a live Floor occupies (x, y)          │
/// │ is_ladder_at(x, y)        │ a live Ladder occupies (x, y)         │
/// │ is_wall_at(x, y)          │ alias of is_floor_at — no distinct    │
/// │                           │ wall variant exists                   │
/// │ is_enemy_at(x, y)         │ a live enemy-capable actor at (x, y)  │
/// └──────────────────────────┴───────────────────────────────────────┘

use super::actor::{Actor, ActorKind};

/// Playfield dimensions in cells.
pub const VIEW_WIDTH: i32 = 20;
pub const VIEW_HEIGHT: i32 = 20;

pub fn in_bounds(x: i32, y: i32) -> bool {
    x >= 0 && x < VIEW_WIDTH && y >= 0 && y < VIEW_HEIGHT
}

/// Can an actor occupy (x, y)? Out-of-bounds cells are never enterable;
/// a move refused here is not an error, the mover simply stays put.
pub fn can_move_to(actors: &[Actor], x: i32, y: i32) -> bool {
    if !in_bounds(x, y) {
        return false;
    }
    !actors
        .iter()
        .any(|a| a.alive && a.at(x, y) && !a.kind.walkable())
}

pub fn is_floor_at(actors: &[Actor], x: i32, y: i32) -> bool {
    actors
        .iter()
        .any(|a| a.alive && a.at(x, y) && matches!(a.kind, ActorKind::Floor))
}

pub fn is_ladder_at(actors: &[Actor], x: i32, y: i32) -> bool {
    actors
        .iter()
        .any(|a| a.alive && a.at(x, y) && matches!(a.kind, ActorKind::Ladder))
}

/// Walls and floors are the same thing on this playfield.
pub fn is_wall_at(actors: &[Actor], x: i32, y: i32) -> bool {
    is_floor_at(actors, x, y)
}

pub fn is_enemy_at(actors: &[Actor], x: i32, y: i32) -> bool {
    actors.iter().any(|a| a.alive && a.at(x, y) && a.kind.enemy())
}

/// Mark every live enemy within Chebyshev distance 1 of (x, y) dead.
/// Returns how many were destroyed (the caller scores them).
pub fn destroy_enemies_near(actors: &mut [Actor], x: i32, y: i32) -> u32 {
    let mut destroyed = 0;
    for a in actors.iter_mut() {
        if a.alive && a.kind.enemy() && (a.x - x).abs() <= 1 && (a.y - y).abs() <= 1 {
            a.set_dead();
            destroyed += 1;
        }
    }
    destroyed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::actor::Facing;

    #[test]
    fn open_cell_is_enterable() {
        let actors = vec![Actor::floor(3, 2)];
        assert!(can_move_to(&actors, 5, 5));
    }

    #[test]
    fn walkable_actors_do_not_block() {
        let actors = vec![Actor::floor(4, 4), Actor::ladder(6, 6)];
        assert!(can_move_to(&actors, 4, 4));
        assert!(can_move_to(&actors, 6, 6));
    }

    #[test]
    fn non_walkable_actors_block() {
        let actors = vec![
            Actor::bonfire(2, 2),
            Actor::koopa(3, 3, 0),
            Actor::kong(4, 4, Facing::Left, 0),
        ];
        assert!(!can_move_to(&actors, 2, 2));
        assert!(!can_move_to(&actors, 3, 3));
        assert!(!can_move_to(&actors, 4, 4));
    }

    #[test]
    fn dead_actors_do_not_block() {
        let mut actors = vec![Actor::bonfire(2, 2)];
        actors[0].set_dead();
        assert!(can_move_to(&actors, 2, 2));
    }

    #[test]
    fn out_of_bounds_is_refused() {
        let actors: Vec<Actor> = vec![];
        assert!(!can_move_to(&actors, -1, 5));
        assert!(!can_move_to(&actors, 5, -1));
        assert!(!can_move_to(&actors, VIEW_WIDTH, 0));
        assert!(!can_move_to(&actors, 0, VIEW_HEIGHT));
    }

    #[test]
    fn floor_and_ladder_lookup() {
        let actors = vec![Actor::floor(1, 1), Actor::ladder(2, 1)];
        assert!(is_floor_at(&actors, 1, 1));
        assert!(!is_floor_at(&actors, 2, 1));
        assert!(is_ladder_at(&actors, 2, 1));
        assert!(!is_ladder_at(&actors, 1, 1));
    }

    #[test]
    fn wall_aliases_floor() {
        let actors = vec![Actor::floor(7, 3)];
        assert!(is_wall_at(&actors, 7, 3));
        assert!(!is_wall_at(&actors, 8, 3));
    }

    #[test]
    fn enemy_lookup() {
        let actors = vec![
            Actor::koopa(5, 5, 0),
            Actor::barrel(6, 5, Facing::Left),
            Actor::bonfire(7, 5),
        ];
        assert!(is_enemy_at(&actors, 5, 5));
        assert!(is_enemy_at(&actors, 6, 5));
        // Bonfires are hazards, not enemies
        assert!(!is_enemy_at(&actors, 7, 5));
    }

    #[test]
    fn destroy_covers_closed_neighborhood() {
        let mut actors = vec![
            Actor::koopa(5, 5, 0),                      // center
            Actor::koopa(6, 6, 0),                      // diagonal
            Actor::fireball(4, 5, Facing::Right, 100),  // adjacent
            Actor::koopa(7, 5, 0),                      // distance 2 — spared
        ];
        let n = destroy_enemies_near(&mut actors, 5, 5);
        assert_eq!(n, 3);
        assert!(!actors[0].alive);
        assert!(!actors[1].alive);
        assert!(!actors[2].alive);
        assert!(actors[3].alive);
    }

    #[test]
    fn destroy_spares_non_enemies() {
        let mut actors = vec![Actor::player(5, 5), Actor::bonfire(5, 6), Actor::floor(4, 5)];
        let n = destroy_enemies_near(&mut actors, 5, 5);
        assert_eq!(n, 0);
        assert!(actors.iter().all(|a| a.alive));
    }
}
