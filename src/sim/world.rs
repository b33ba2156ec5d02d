/// World: exclusive owner of the actor population.
///
/// ## Ownership and mutation discipline
///
/// The world owns every actor in one `Vec<Actor>`; insertion order is the
/// tick-visit order. Actors never own or reference each other — behavior
/// code reaches other actors only through the world's queries.
///
/// Two-phase mutation keeps the list stable during a tick:
///   - spawns go into `staged` and are merged after the behavior pass,
///     so a freshly thrown barrel is never visited on its birth tick;
///   - deaths only flip the `alive` flag; `reap()` removes the corpses
///     after the pass. No behavior ever observes a removed actor.
///
/// The player is a distinguished index into the list, refreshed whenever
/// the list changes shape. Lives and score live here, not on the player.

use crate::domain::actor::{Actor, ActorKind, PlayerState};
use crate::domain::grid;
use crate::sim::level::{CellTag, LevelDef};

/// Lives granted at the start of a run.
pub const START_LIVES: u32 = 3;

/// Coarse outcome of one `tick()` (or of `init()`).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TickStatus {
    Continue,
    PlayerDied,
    FinishedLevel,
    LevelError,
}

/// Tick-count policies for every timed behavior. Injected at world
/// construction so tests can shrink the periods.
#[derive(Clone, Copy, Debug)]
pub struct Timing {
    /// Koopa takes one patrol step every this many ticks.
    pub koopa_move_ticks: u32,
    /// Kong throws a barrel every this many ticks.
    pub kong_throw_ticks: u32,
    /// Freeze applied to the player on Koopa contact.
    pub freeze_ticks: u32,
    pub burp_lifespan_ticks: u32,
    pub fireball_lifespan_ticks: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Timing {
            koopa_move_ticks: 10,
            kong_throw_ticks: 200,
            freeze_ticks: 50,
            burp_lifespan_ticks: 10,
            fireball_lifespan_ticks: 200,
        }
    }
}

pub struct World {
    /// All live actors, visited in insertion order each tick.
    pub actors: Vec<Actor>,
    /// Spawns staged during the current tick, merged after the pass.
    staged: Vec<Actor>,
    /// Index of the player in `actors`; None before init or after reap
    /// of a dead player.
    player: Option<usize>,

    pub score: u32,
    pub lives: u32,
    pub tick: u64,
    pub status_line: String,
    pub timing: Timing,
}

impl World {
    pub fn new(timing: Timing) -> Self {
        World {
            actors: Vec::new(),
            staged: Vec::new(),
            player: None,
            score: 0,
            lives: START_LIVES,
            tick: 0,
            status_line: String::new(),
            timing,
        }
    }

    /// Populate the world from a parsed level. Clears any previous
    /// population but preserves score and lives (respawn reuses this).
    ///
    /// Cells are visited column-major, so the visit order of the initial
    /// actors is deterministic for a given level.
    pub fn init(&mut self, def: &LevelDef) -> TickStatus {
        self.actors.clear();
        self.staged.clear();
        self.player = None;
        self.tick = 0;

        let timing = self.timing;
        for x in 0..grid::VIEW_WIDTH {
            for y in 0..grid::VIEW_HEIGHT {
                let actor = match def.tag_at(x, y) {
                    CellTag::Empty => continue,
                    CellTag::Player => Actor::player(x, y),
                    CellTag::Floor => Actor::floor(x, y),
                    CellTag::Ladder => Actor::ladder(x, y),
                    CellTag::Bonfire => Actor::bonfire(x, y),
                    CellTag::Fireball => Actor::fireball(
                        x,
                        y,
                        crate::domain::actor::Facing::Right,
                        timing.fireball_lifespan_ticks,
                    ),
                    CellTag::Koopa => Actor::koopa(x, y, timing.koopa_move_ticks),
                    CellTag::ExtraLife => Actor::extra_life(x, y),
                    CellTag::Garlic => Actor::garlic(x, y),
                    CellTag::LeftKong => Actor::kong(
                        x,
                        y,
                        crate::domain::actor::Facing::Left,
                        timing.kong_throw_ticks,
                    ),
                    CellTag::RightKong => Actor::kong(
                        x,
                        y,
                        crate::domain::actor::Facing::Right,
                        timing.kong_throw_ticks,
                    ),
                };
                if actor.is_player() {
                    self.player = Some(self.actors.len());
                }
                self.actors.push(actor);
            }
        }

        match self.player {
            Some(_) => {
                self.update_status();
                TickStatus::Continue
            }
            None => TickStatus::LevelError,
        }
    }

    /// Destroy all actors and forget the player.
    pub fn cleanup(&mut self) {
        self.actors.clear();
        self.staged.clear();
        self.player = None;
    }

    // ── Spatial queries (delegate to the grid scans) ──

    pub fn can_move_to(&self, x: i32, y: i32) -> bool {
        grid::can_move_to(&self.actors, x, y)
    }

    pub fn is_floor_at(&self, x: i32, y: i32) -> bool {
        grid::is_floor_at(&self.actors, x, y)
    }

    pub fn is_ladder_at(&self, x: i32, y: i32) -> bool {
        grid::is_ladder_at(&self.actors, x, y)
    }

    pub fn is_wall_at(&self, x: i32, y: i32) -> bool {
        grid::is_wall_at(&self.actors, x, y)
    }

    pub fn is_enemy_at(&self, x: i32, y: i32) -> bool {
        grid::is_enemy_at(&self.actors, x, y)
    }

    /// Burp blast: kill enemies around (x, y) and score them.
    pub fn destroy_enemies_near(&mut self, x: i32, y: i32) -> u32 {
        let destroyed = grid::destroy_enemies_near(&mut self.actors, x, y);
        self.score += destroyed * crate::sim::step::ENEMY_POINTS;
        destroyed
    }

    // ── Player access ──

    pub fn player(&self) -> Option<&Actor> {
        self.player.map(|i| &self.actors[i])
    }

    pub fn player_index(&self) -> Option<usize> {
        self.player
    }

    pub fn player_alive(&self) -> bool {
        self.player().map_or(false, |a| a.alive)
    }

    pub fn player_pos(&self) -> Option<(i32, i32)> {
        self.player().filter(|a| a.alive).map(|a| (a.x, a.y))
    }

    pub fn player_at(&self, x: i32, y: i32) -> bool {
        self.player_pos() == Some((x, y))
    }

    pub fn player_state(&self) -> Option<&PlayerState> {
        match self.player().map(|a| &a.kind) {
            Some(ActorKind::Player(st)) => Some(st),
            _ => None,
        }
    }

    pub fn player_state_mut(&mut self) -> Option<&mut PlayerState> {
        let i = self.player?;
        match &mut self.actors[i].kind {
            ActorKind::Player(st) => Some(st),
            _ => None,
        }
    }

    pub fn kill_player(&mut self) {
        if let Some(i) = self.player {
            self.actors[i].set_dead();
        }
    }

    /// Freeze the player. Returns true if this started a new freeze
    /// (false while an existing freeze is still running).
    pub fn freeze_player(&mut self, ticks: u32) -> bool {
        match self.player_state_mut() {
            Some(st) => {
                let fresh = st.frozen_ticks == 0;
                st.freeze(ticks);
                fresh
            }
            None => false,
        }
    }

    pub fn increment_lives(&mut self) {
        self.lives += 1;
    }

    // ── Population maintenance (driver only) ──

    /// Queue an actor for insertion after the current behavior pass.
    pub fn stage(&mut self, actor: Actor) {
        self.staged.push(actor);
    }

    /// Append staged spawns; they will first be visited next tick.
    pub fn merge_spawns(&mut self) {
        self.actors.append(&mut self.staged);
    }

    /// Remove every actor flagged dead and refresh the player index.
    pub fn reap(&mut self) {
        self.actors.retain(|a| a.alive);
        self.player = self.actors.iter().position(|a| a.is_player());
    }

    /// Compose the host status line.
    pub fn update_status(&mut self) {
        let burps = self.player_state().map_or(0, |st| st.burps);
        self.status_line = format!(
            "Score: {} Lives: {} Burps: {}",
            self.score, self.lives, burps
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level;

    fn world_from(rows: &[&str]) -> World {
        let def = level::parse_level_rows(rows).expect("test level");
        let mut w = World::new(Timing::default());
        assert_eq!(w.init(&def), TickStatus::Continue);
        w
    }

    #[test]
    fn init_finds_exactly_one_player() {
        let w = world_from(&["P", "#"]);
        let players = w.actors.iter().filter(|a| a.is_player()).count();
        assert_eq!(players, 1);
        assert!(w.player_alive());

        // Removing the player and re-scanning finds no other.
        let mut actors = w.actors.clone();
        let i = w.player_index().unwrap();
        actors.remove(i);
        assert!(!actors.iter().any(|a| a.is_player()));
    }

    #[test]
    fn init_without_player_is_level_error() {
        let def = level::parse_level_rows(&["#H#"]).expect("test level");
        let mut w = World::new(Timing::default());
        assert_eq!(w.init(&def), TickStatus::LevelError);
    }

    #[test]
    fn staged_spawns_merge_after_pass() {
        let mut w = world_from(&["P", "#"]);
        let before = w.actors.len();
        w.stage(Actor::barrel(3, 3, crate::domain::actor::Facing::Left));
        assert_eq!(w.actors.len(), before);
        w.merge_spawns();
        assert_eq!(w.actors.len(), before + 1);
    }

    #[test]
    fn reap_drops_dead_and_refreshes_player_index() {
        let mut w = world_from(&["K P", "###"]);
        let koopa = w
            .actors
            .iter()
            .position(|a| matches!(a.kind, ActorKind::Koopa { .. }))
            .unwrap();
        w.actors[koopa].set_dead();
        w.reap();
        assert!(w.actors.iter().all(|a| a.alive));
        assert!(w.player_alive());
    }

    #[test]
    fn status_line_format() {
        let mut w = world_from(&["P", "#"]);
        w.score = 150;
        w.lives = 2;
        w.player_state_mut().unwrap().burps = 4;
        w.update_status();
        assert_eq!(w.status_line, "Score: 150 Lives: 2 Burps: 4");
    }

    #[test]
    fn cleanup_empties_the_world() {
        let mut w = world_from(&["P", "#"]);
        w.cleanup();
        assert!(w.actors.is_empty());
        assert!(w.player().is_none());
    }
}
