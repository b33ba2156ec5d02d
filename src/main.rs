/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use config::GameConfig;
use domain::actor::Key;
use sim::event::GameEvent;
use sim::level::{self, LevelDef};
use sim::step;
use sim::world::{TickStatus, World, START_LIVES};
use ui::input::InputState;
use ui::renderer::Renderer;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

/// Transient status messages live this many ticks.
const MESSAGE_TICKS: u32 = 30;

fn main() {
    let config = GameConfig::load();

    // An explicitly configured levels directory must exist; the default
    // one may be absent (the embedded level covers that).
    if config.levels_dir_explicit && !config.levels_dir.is_dir() {
        eprintln!("Levels directory not found: {}", config.levels_dir.display());
        std::process::exit(1);
    }

    let level = match level::load_level(&config.levels_dir) {
        Ok(def) => def,
        Err(e) => {
            eprintln!("Level error: {e}");
            std::process::exit(1);
        }
    };

    let mut world = World::new(config.speed.timing());
    if world.init(&level) != TickStatus::Continue {
        eprintln!("Level error: no player spawn");
        std::process::exit(1);
    }

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let result = game_loop(&mut world, &level, &mut renderer, &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }
    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Wonky Kong!");
    println!("Final Score: {}", world.score);
}

#[derive(PartialEq, Eq, Clone, Copy)]
enum Screen {
    Playing,
    GameOver,
}

fn game_loop(
    world: &mut World,
    level: &LevelDef,
    renderer: &mut Renderer,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(config.speed.tick_rate_ms);

    let mut screen = Screen::Playing;
    let mut message = String::new();
    let mut message_timer: u32 = 0;

    // Edge-triggered actions are latched between ticks so a tap shorter
    // than one tick still registers.
    let mut pending_action: Option<Key> = None;

    loop {
        kb.drain_events();

        if kb.ctrl_c_pressed() || kb.any_pressed(KEYS_QUIT) {
            break;
        }

        match screen {
            Screen::Playing => {
                if kb.any_pressed(KEYS_JUMP) {
                    pending_action = Some(Key::Jump);
                } else if kb.any_pressed(KEYS_BURP) && pending_action.is_none() {
                    pending_action = Some(Key::Burp);
                }
                if kb.any_pressed(KEYS_RESTART) {
                    world.cleanup();
                    if world.init(level) != TickStatus::Continue {
                        return Err("level lost its player spawn".into());
                    }
                    message.clear();
                    message_timer = 0;
                    pending_action = None;
                }

                if last_tick.elapsed() >= tick_rate {
                    let input = pending_action.take().or_else(|| detect_movement(&kb));
                    let (status, events) = step::tick(world, input);

                    if let Some((text, ticks)) = message_for(&events) {
                        message = text;
                        message_timer = ticks;
                    } else if message_timer > 0 {
                        message_timer -= 1;
                        if message_timer == 0 {
                            message.clear();
                        }
                    }

                    match status {
                        TickStatus::Continue => {}
                        TickStatus::PlayerDied => {
                            // Respawn: rebuild the level, score and lives carry over.
                            world.cleanup();
                            if world.init(level) != TickStatus::Continue {
                                return Err("level lost its player spawn".into());
                            }
                        }
                        TickStatus::FinishedLevel => {
                            screen = Screen::GameOver;
                        }
                        TickStatus::LevelError => {
                            return Err("level error during play".into());
                        }
                    }

                    last_tick = Instant::now();
                }

                if screen == Screen::Playing {
                    renderer.render(world, &message)?;
                } else {
                    renderer.render_game_over(world.score)?;
                }
            }
            Screen::GameOver => {
                if kb.any_pressed(KEYS_CONFIRM) {
                    world.cleanup();
                    world.score = 0;
                    world.lives = START_LIVES;
                    if world.init(level) != TickStatus::Continue {
                        return Err("level lost its player spawn".into());
                    }
                    message.clear();
                    message_timer = 0;
                    pending_action = None;
                    screen = Screen::Playing;
                    last_tick = Instant::now();
                }
                renderer.render_game_over(world.score)?;
            }
        }

        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

// ── Key Constants ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_JUMP: &[KeyCode] = &[KeyCode::Char(' ')];
const KEYS_BURP: &[KeyCode] = &[KeyCode::Char('z'), KeyCode::Char('Z')];
const KEYS_RESTART: &[KeyCode] = &[KeyCode::Char('r'), KeyCode::Char('R')];
const KEYS_CONFIRM: &[KeyCode] = &[KeyCode::Enter];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];

fn detect_movement(kb: &InputState) -> Option<Key> {
    if kb.any_held(KEYS_UP) {
        Some(Key::Up)
    } else if kb.any_held(KEYS_DOWN) {
        Some(Key::Down)
    } else if kb.any_held(KEYS_LEFT) {
        Some(Key::Left)
    } else if kb.any_held(KEYS_RIGHT) {
        Some(Key::Right)
    } else {
        None
    }
}

/// Pick the most interesting event of the tick for the message bar.
fn message_for(events: &[GameEvent]) -> Option<(String, u32)> {
    let mut best: Option<(String, u32)> = None;
    for event in events {
        let text = match event {
            GameEvent::ExtraLifeGained => Some("Extra life!".to_string()),
            GameEvent::GoodieCollected { points, .. } => Some(format!("+{points}")),
            GameEvent::EnemiesDestroyed { count } if *count == 1 => {
                Some("Burped an enemy!".to_string())
            }
            GameEvent::EnemiesDestroyed { count } => Some(format!("Burped {count} enemies!")),
            GameEvent::PlayerFrozen { .. } => Some("Frozen by a Koopa!".to_string()),
            GameEvent::PlayerKilled => Some("Ouch!".to_string()),
            GameEvent::BurpFired { .. } | GameEvent::BarrelThrown { .. } => None,
        };
        if let Some(t) = text {
            best = Some((t, MESSAGE_TICKS));
        }
    }
    best
}
