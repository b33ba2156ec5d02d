/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

use crate::sim::world::Timing;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub speed: SpeedConfig,
    pub levels_dir: PathBuf,
    /// True when config.toml named a levels directory explicitly; a
    /// missing explicit directory is an error, a missing default is not.
    pub levels_dir_explicit: bool,
}

#[derive(Clone, Debug)]
pub struct SpeedConfig {
    pub tick_rate_ms: u64,
    pub koopa_move_ticks: u32,
    pub kong_throw_ticks: u32,
    pub freeze_ticks: u32,
    pub burp_lifespan_ticks: u32,
    pub fireball_lifespan_ticks: u32,
}

impl SpeedConfig {
    /// The tick-count knobs, as the simulation consumes them.
    pub fn timing(&self) -> Timing {
        Timing {
            koopa_move_ticks: self.koopa_move_ticks,
            kong_throw_ticks: self.kong_throw_ticks,
            freeze_ticks: self.freeze_ticks,
            burp_lifespan_ticks: self.burp_lifespan_ticks,
            fireball_lifespan_ticks: self.fireball_lifespan_ticks,
        }
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    speed: TomlSpeed,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_koopa_move")]
    koopa_move_ticks: u32,
    #[serde(default = "default_kong_throw")]
    kong_throw_ticks: u32,
    #[serde(default = "default_freeze")]
    freeze_ticks: u32,
    #[serde(default = "default_burp_lifespan")]
    burp_lifespan_ticks: u32,
    #[serde(default = "default_fireball_lifespan")]
    fireball_lifespan_ticks: u32,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_levels_dir")]
    levels_dir: Option<String>,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 100 }
fn default_koopa_move() -> u32 { 10 }
fn default_kong_throw() -> u32 { 200 }   // one barrel every ~20s at 100ms tick
fn default_freeze() -> u32 { 50 }        // 5s stuck on Koopa contact
fn default_burp_lifespan() -> u32 { 10 }
fn default_fireball_lifespan() -> u32 { 200 }

fn default_levels_dir() -> Option<String> { None }

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed {
            tick_rate_ms: default_tick_rate(),
            koopa_move_ticks: default_koopa_move(),
            kong_throw_ticks: default_kong_throw(),
            freeze_ticks: default_freeze(),
            burp_lifespan_ticks: default_burp_lifespan(),
            fireball_lifespan_ticks: default_fireball_lifespan(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral { levels_dir: default_levels_dir() }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);

        let explicit = toml_cfg.general.levels_dir.is_some();
        let dir_name = toml_cfg
            .general
            .levels_dir
            .unwrap_or_else(|| "levels".to_string());

        let levels_dir = if PathBuf::from(&dir_name).is_absolute() {
            PathBuf::from(&dir_name)
        } else {
            // Search candidate dirs for the levels folder
            search_dirs
                .iter()
                .map(|d| d.join(&dir_name))
                .find(|p| p.is_dir())
                .unwrap_or_else(|| PathBuf::from(&dir_name))
        };

        GameConfig {
            speed: SpeedConfig {
                tick_rate_ms: toml_cfg.speed.tick_rate_ms,
                koopa_move_ticks: toml_cfg.speed.koopa_move_ticks,
                kong_throw_ticks: toml_cfg.speed.kong_throw_ticks,
                freeze_ticks: toml_cfg.speed.freeze_ticks,
                burp_lifespan_ticks: toml_cfg.speed.burp_lifespan_ticks,
                fireball_lifespan_ticks: toml_cfg.speed.fireball_lifespan_ticks,
            },
            levels_dir,
            levels_dir_explicit: explicit,
        }
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        // Resolve symlinks so a linked binary still finds data relative
        // to the real one.
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let cfg: TomlConfig = toml::from_str("").expect("parse");
        assert_eq!(cfg.speed.tick_rate_ms, 100);
        assert_eq!(cfg.speed.koopa_move_ticks, 10);
        assert_eq!(cfg.speed.kong_throw_ticks, 200);
        assert_eq!(cfg.speed.freeze_ticks, 50);
        assert!(cfg.general.levels_dir.is_none());
    }

    #[test]
    fn partial_speed_section_keeps_other_defaults() {
        let cfg: TomlConfig = toml::from_str(
            "[speed]\nkong_throw_ticks = 40\n\n[general]\nlevels_dir = \"assets\"\n",
        )
        .expect("parse");
        assert_eq!(cfg.speed.kong_throw_ticks, 40);
        assert_eq!(cfg.speed.tick_rate_ms, 100);
        assert_eq!(cfg.general.levels_dir.as_deref(), Some("assets"));
    }

    #[test]
    fn speed_maps_onto_timing() {
        let speed = SpeedConfig {
            tick_rate_ms: 100,
            koopa_move_ticks: 3,
            kong_throw_ticks: 7,
            freeze_ticks: 9,
            burp_lifespan_ticks: 2,
            fireball_lifespan_ticks: 11,
        };
        let t = speed.timing();
        assert_eq!(t.koopa_move_ticks, 3);
        assert_eq!(t.kong_throw_ticks, 7);
        assert_eq!(t.freeze_ticks, 9);
        assert_eq!(t.burp_lifespan_ticks, 2);
        assert_eq!(t.fireball_lifespan_ticks, 11);
    }
}
