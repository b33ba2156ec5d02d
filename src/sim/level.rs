/// Level loading: a character grid mapping cells to actor spawns.
///
/// ## File format (`level01.txt`)
///
/// Up to `VIEW_HEIGHT` rows of up to `VIEW_WIDTH` characters. File row 0
/// is the TOP of the playfield; the simulation itself is y-up, so the
/// loader flips rows into world coordinates.
///
/// ## Tile legend:
///   '#' = Floor            'H' = Ladder
///   'P' = Player (exactly once)
///   'B' = Bonfire          'F' = Fireball (spawns facing right)
///   'K' = Koopa
///   'L' = Extra-life goodie
///   'G' = Garlic goodie
///   '<' = Kong facing left '>' = Kong facing right
///   ' ' = Empty
///
/// A missing level file falls back to the embedded level; a present but
/// malformed file is a hard `LevelError` (the run aborts).

use std::fmt;
use std::path::Path;

use crate::domain::grid::{VIEW_HEIGHT, VIEW_WIDTH};

/// Canonical level file name, also used by the entry point to probe the
/// levels directory.
pub const LEVEL_FILE: &str = "level01.txt";

/// What a level cell asks the world to spawn.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CellTag {
    Empty,
    Player,
    Floor,
    Ladder,
    Bonfire,
    Fireball,
    Koopa,
    ExtraLife,
    Garlic,
    LeftKong,
    RightKong,
}

/// Parsed level: a full `VIEW_WIDTH × VIEW_HEIGHT` grid of tags,
/// indexed `[y][x]` with y = 0 at the bottom.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelDef {
    tags: Vec<Vec<CellTag>>,
}

impl LevelDef {
    pub fn tag_at(&self, x: i32, y: i32) -> CellTag {
        if x < 0 || y < 0 || x >= VIEW_WIDTH || y >= VIEW_HEIGHT {
            return CellTag::Empty;
        }
        self.tags[y as usize][x as usize]
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LevelError {
    Unreadable(String),
    TooManyRows(usize),
    RowTooLong { row: usize, len: usize },
    UnknownTag { ch: char, row: usize, col: usize },
    NoPlayer,
    MultiplePlayers,
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::Unreadable(why) => write!(f, "cannot read level file: {why}"),
            LevelError::TooManyRows(n) => {
                write!(f, "level has {n} rows, playfield is {VIEW_HEIGHT}")
            }
            LevelError::RowTooLong { row, len } => {
                write!(f, "row {row} has {len} cells, playfield is {VIEW_WIDTH} wide")
            }
            LevelError::UnknownTag { ch, row, col } => {
                write!(f, "unknown tile {ch:?} at row {row}, column {col}")
            }
            LevelError::NoPlayer => write!(f, "level contains no player spawn"),
            LevelError::MultiplePlayers => write!(f, "level contains more than one player spawn"),
        }
    }
}

impl std::error::Error for LevelError {}

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

/// Load `level01.txt` from the levels directory, or the embedded level
/// when no file is present.
pub fn load_level(levels_dir: &Path) -> Result<LevelDef, LevelError> {
    let path = levels_dir.join(LEVEL_FILE);
    if !path.is_file() {
        return Ok(embedded_level());
    }
    let text =
        std::fs::read_to_string(&path).map_err(|e| LevelError::Unreadable(e.to_string()))?;
    parse_level(&text)
}

/// Parse level text (file rows, top row first) into a tag grid.
pub fn parse_level(text: &str) -> Result<LevelDef, LevelError> {
    let rows: Vec<&str> = text.lines().collect();
    if rows.len() > VIEW_HEIGHT as usize {
        return Err(LevelError::TooManyRows(rows.len()));
    }

    let mut tags = vec![vec![CellTag::Empty; VIEW_WIDTH as usize]; VIEW_HEIGHT as usize];
    let mut players = 0;

    for (row, line) in rows.iter().enumerate() {
        let cells: Vec<char> = line.chars().collect();
        if cells.len() > VIEW_WIDTH as usize {
            return Err(LevelError::RowTooLong { row, len: cells.len() });
        }
        // File row 0 is the top of the playfield.
        let y = VIEW_HEIGHT as usize - 1 - row;
        for (col, &ch) in cells.iter().enumerate() {
            let tag = tag_for(ch).ok_or(LevelError::UnknownTag { ch, row, col })?;
            if tag == CellTag::Player {
                players += 1;
            }
            tags[y][col] = tag;
        }
    }

    match players {
        0 => Err(LevelError::NoPlayer),
        1 => Ok(LevelDef { tags }),
        _ => Err(LevelError::MultiplePlayers),
    }
}

fn tag_for(ch: char) -> Option<CellTag> {
    match ch {
        ' ' => Some(CellTag::Empty),
        'P' => Some(CellTag::Player),
        '#' => Some(CellTag::Floor),
        'H' => Some(CellTag::Ladder),
        'B' => Some(CellTag::Bonfire),
        'F' => Some(CellTag::Fireball),
        'K' => Some(CellTag::Koopa),
        'L' => Some(CellTag::ExtraLife),
        'G' => Some(CellTag::Garlic),
        '<' => Some(CellTag::LeftKong),
        '>' => Some(CellTag::RightKong),
        _ => None,
    }
}

// ══════════════════════════════════════════════════════════════
// Embedded fallback level
// ══════════════════════════════════════════════════════════════

pub fn embedded_level() -> LevelDef {
    let rows = [
        "                    ",
        "   >                ",
        "  ######H########   ",
        "        H           ",
        "   L    H           ",
        "  ###H###########   ",
        "     H              ",
        "     H    K         ",
        "  ##########H####   ",
        "            H       ",
        "   F        H       ",
        "  ###H###########   ",
        "     H              ",
        "     H  B  K  G     ",
        "  #############H#   ",
        "               H    ",
        "               H    ",
        "  P            H    ",
        "#####H############  ",
        "     H              ",
    ];
    parse_level(&rows.join("\n")).expect("embedded level is well-formed")
}

// ══════════════════════════════════════════════════════════════
// Test fixture: bottom-anchored partial grids
// ══════════════════════════════════════════════════════════════

/// Build a level from a partial diagram whose LAST row sits at world
/// y = 0. Unlike `parse_level`, a playerless grid is allowed, so tests
/// can exercise the world's own defenses.
#[cfg(test)]
pub fn parse_level_rows(rows: &[&str]) -> Result<LevelDef, LevelError> {
    let mut tags = vec![vec![CellTag::Empty; VIEW_WIDTH as usize]; VIEW_HEIGHT as usize];
    for (row, line) in rows.iter().enumerate() {
        let y = rows.len() - 1 - row;
        for (col, ch) in line.chars().enumerate() {
            let tag = tag_for(ch).ok_or(LevelError::UnknownTag { ch, row, col })?;
            tags[y][col] = tag;
        }
    }
    Ok(LevelDef { tags })
}
