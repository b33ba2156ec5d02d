/// Actors: everything on the playfield is one `Actor` — an integer grid
/// position, a facing, an alive flag, and a kind-specific payload.
///
/// Capabilities are queried via methods on `ActorKind`, not stored as
/// flags, so actor semantics are centralized here:
///   - `walkable()` — the actor does not obstruct movement onto its cell
///   - `enemy()`    — targetable by burps, hostile to the player

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    /// Horizontal step in this direction.
    pub fn dx(self) -> i32 {
        match self {
            Facing::Left => -1,
            Facing::Right => 1,
        }
    }

    pub fn flip(self) -> Facing {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }
}

/// One key event delivered to the simulation per tick (zero or one).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Jump,
    Burp,
}

/// Player-only state carried inside `ActorKind::Player`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PlayerState {
    pub jumping: bool,
    /// Current step of the jump arc; meaningful only while `jumping`.
    pub jump_phase: u8,
    /// Remaining ranged-attack charges.
    pub burps: u32,
    /// Ticks of input-ignoring freeze remaining.
    pub frozen_ticks: u32,
}

impl PlayerState {
    pub fn new() -> Self {
        PlayerState { jumping: false, jump_phase: 0, burps: 0, frozen_ticks: 0 }
    }

    /// Freeze for `ticks`. Re-freezing never shortens an active freeze.
    pub fn freeze(&mut self, ticks: u32) {
        self.frozen_ticks = self.frozen_ticks.max(ticks);
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ActorKind {
    Player(PlayerState),
    Floor,
    Ladder,
    Bonfire,
    Fireball { lifespan: u32 },
    Barrel,
    Koopa { move_cooldown: u32 },
    Kong { throw_cooldown: u32 },
    Burp { lifespan: u32 },
    ExtraLife,
    Garlic,
}

impl ActorKind {
    /// Does this actor leave its cell enterable?
    pub fn walkable(&self) -> bool {
        matches!(self, ActorKind::Floor | ActorKind::Ladder)
    }

    /// Is this actor an enemy (burp target, hostile on contact)?
    pub fn enemy(&self) -> bool {
        matches!(
            self,
            ActorKind::Fireball { .. } | ActorKind::Barrel | ActorKind::Koopa { .. }
        )
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Actor {
    pub x: i32,
    pub y: i32,
    pub facing: Facing,
    pub alive: bool,
    pub kind: ActorKind,
}

impl Actor {
    pub fn new(x: i32, y: i32, facing: Facing, kind: ActorKind) -> Self {
        Actor { x, y, facing, alive: true, kind }
    }

    pub fn player(x: i32, y: i32) -> Self {
        Actor::new(x, y, Facing::Right, ActorKind::Player(PlayerState::new()))
    }

    pub fn floor(x: i32, y: i32) -> Self {
        Actor::new(x, y, Facing::Right, ActorKind::Floor)
    }

    pub fn ladder(x: i32, y: i32) -> Self {
        Actor::new(x, y, Facing::Right, ActorKind::Ladder)
    }

    pub fn bonfire(x: i32, y: i32) -> Self {
        Actor::new(x, y, Facing::Right, ActorKind::Bonfire)
    }

    pub fn fireball(x: i32, y: i32, facing: Facing, lifespan: u32) -> Self {
        Actor::new(x, y, facing, ActorKind::Fireball { lifespan })
    }

    pub fn barrel(x: i32, y: i32, facing: Facing) -> Self {
        Actor::new(x, y, facing, ActorKind::Barrel)
    }

    pub fn koopa(x: i32, y: i32, move_cooldown: u32) -> Self {
        Actor::new(x, y, Facing::Left, ActorKind::Koopa { move_cooldown })
    }

    pub fn kong(x: i32, y: i32, facing: Facing, throw_cooldown: u32) -> Self {
        Actor::new(x, y, facing, ActorKind::Kong { throw_cooldown })
    }

    pub fn burp(x: i32, y: i32, facing: Facing, lifespan: u32) -> Self {
        Actor::new(x, y, facing, ActorKind::Burp { lifespan })
    }

    pub fn extra_life(x: i32, y: i32) -> Self {
        Actor::new(x, y, Facing::Right, ActorKind::ExtraLife)
    }

    pub fn garlic(x: i32, y: i32) -> Self {
        Actor::new(x, y, Facing::Right, ActorKind::Garlic)
    }

    /// Does this actor occupy (x, y)?
    pub fn at(&self, x: i32, y: i32) -> bool {
        self.x == x && self.y == y
    }

    pub fn set_dead(&mut self) {
        self.alive = false;
    }

    pub fn is_player(&self) -> bool {
        matches!(self.kind, ActorKind::Player(_))
    }
}
