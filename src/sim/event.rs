/// Events emitted during a simulation tick.
/// The presentation layer consumes these for status messages.

#[derive(Clone, Debug)]
#[allow(dead_code)]
pub enum GameEvent {
    GoodieCollected { x: i32, y: i32, points: u32 },
    ExtraLifeGained,
    BurpFired { x: i32, y: i32 },
    EnemiesDestroyed { count: u32 },
    PlayerFrozen { ticks: u32 },
    BarrelThrown { x: i32, y: i32 },
    PlayerKilled,
}
