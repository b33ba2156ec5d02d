/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// This eliminates flicker caused by full-screen redraws.
///
/// The simulation is y-up; the terminal is y-down. The flip happens
/// here and only here: world (x, y) → screen row MAP_ROW + (19 - y).

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::actor::{Actor, ActorKind};
use crate::domain::grid::{VIEW_HEIGHT, VIEW_WIDTH};
use crate::sim::world::World;

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for all "empty" terminal cells, so the
    /// inter-row gap pixels match the cell color on VTE terminals.
    const BASE_BG: Color = Color::Rgb { r: 18, g: 18, b: 28 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        let bg = match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        };
        Cell { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        let mut cx = x;
        for ch in s.chars() {
            if cx >= self.width {
                break;
            }
            self.set(cx, y, Cell::new(ch, fg, bg));
            cx += 1;
        }
    }
}

// ── Renderer ──

/// Each game cell = 2 terminal columns, so the playfield is roughly square.
const CELL_W: usize = 2;

/// Vertical offsets
const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, world: &World, message: &str) -> io::Result<()> {
        self.sync_terminal_size()?;

        self.front.clear();
        self.compose_game(world, message);
        self.flush_diff()?;

        // Swap: current front becomes next back
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    pub fn render_game_over(&mut self, score: u32) -> io::Result<()> {
        self.sync_terminal_size()?;

        self.front.clear();
        let red = Color::Rgb { r: 255, g: 70, b: 70 };
        let box_art = [
            "╔══════════════════════════════╗",
            "║        GAME  OVER            ║",
            "╚══════════════════════════════╝",
        ];
        for (i, l) in box_art.iter().enumerate() {
            self.front.put_str(6, 4 + i, l, red, Color::Reset);
        }
        let score_line = format!("Final Score: {score}");
        self.front.put_str(8, 9, &score_line, Color::White, Color::Reset);
        self.front.put_str(8, 11, "ENTER: Play again", Color::Rgb { r: 80, g: 255, b: 80 }, Color::Reset);
        self.front.put_str(8, 12, "ESC/Q: Quit", Color::DarkGrey, Color::Reset);
        self.flush_diff()?;

        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    fn sync_terminal_size(&mut self) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            // Force full repaint after resize.
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }
        Ok(())
    }

    // ── Compose: build front buffer content ──

    fn compose_game(&mut self, world: &World, message: &str) {
        let buf_w = self.front.width;

        // ── HUD row ──
        let hud_bg = Color::Rgb { r: 20, g: 20, b: 60 };
        for x in 0..buf_w {
            self.front.set(x, HUD_ROW, Cell::new(' ', Color::White, hud_bg));
        }
        let hud = format!(" {} ", world.status_line);
        self.front.put_str(0, HUD_ROW, &hud, Color::White, hud_bg);

        // ── Playfield ──
        // Scenery first, then everything else, player on top, so the
        // player stays visible while sharing a cell with a hazard.
        for a in &world.actors {
            if a.alive && a.kind.walkable() {
                self.compose_actor(a);
            }
        }
        for a in &world.actors {
            if a.alive && !a.kind.walkable() && !a.is_player() {
                self.compose_actor(a);
            }
        }
        if let Some(p) = world.player() {
            if p.alive {
                self.compose_actor(p);
            }
        }

        // ── Message bar ──
        let msg_row = MAP_ROW + VIEW_HEIGHT as usize + 1;
        if msg_row < self.front.height && !message.is_empty() {
            let bar_bg = Color::Rgb { r: 200, g: 180, b: 50 };
            let msg = format!(" {message} ");
            for x in 0..buf_w {
                self.front.set(x, msg_row, Cell::new(' ', Color::Black, bar_bg));
            }
            self.front.put_str(0, msg_row, &msg, Color::Black, bar_bg);
        }

        // ── Help bar ──
        let help_row = MAP_ROW + VIEW_HEIGHT as usize + 3;
        if help_row < self.front.height {
            let help = " ←→↑↓/WASD:Move  SPACE:Jump  Z:Burp  R:Restart  ESC/Q:Quit";
            self.front.put_str(0, help_row, help, Color::DarkGrey, Color::Reset);
        }
    }

    /// Write the visual for one actor into the front buffer.
    /// Each game cell = 2 terminal columns.
    fn compose_actor(&mut self, a: &Actor) {
        if a.x < 0 || a.x >= VIEW_WIDTH || a.y < 0 || a.y >= VIEW_HEIGHT {
            return;
        }
        let col = a.x as usize * CELL_W;
        let row = MAP_ROW + (VIEW_HEIGHT - 1 - a.y) as usize;

        let (c0, c1, fg, bg) = glyph_for(&a.kind);
        self.front.set(col, row, Cell::new(c0, fg, bg));
        self.front.set(col + 1, row, Cell::new(c1, fg, bg));
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Set explicit base colors at start of frame. Not ResetColor:
        // the terminal's native default may differ from BASE_BG and
        // cause line artifacts.
        queue!(
            self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                let prev = self.back.get(x, y);

                if cell == prev {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }

                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.ch))?;

                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }
}

/// Two terminal columns + colors for each actor kind.
fn glyph_for(kind: &ActorKind) -> (char, char, Color, Color) {
    match kind {
        ActorKind::Player(st) => {
            // Frozen player shows icy blue
            let fg = if st.frozen_ticks > 0 {
                Color::Rgb { r: 120, g: 200, b: 255 }
            } else {
                Color::Rgb { r: 255, g: 255, b: 255 }
            };
            ('@', ' ', fg, Color::Reset)
        }
        ActorKind::Floor => ('▓', '▓', Color::Rgb { r: 200, g: 80, b: 160 }, Color::Rgb { r: 90, g: 30, b: 70 }),
        ActorKind::Ladder => ('╠', '╣', Color::Rgb { r: 100, g: 200, b: 255 }, Color::Reset),
        ActorKind::Bonfire => ('▲', '▲', Color::Rgb { r: 255, g: 120, b: 30 }, Color::Rgb { r: 60, g: 10, b: 0 }),
        ActorKind::Fireball { .. } => ('●', ' ', Color::Rgb { r: 255, g: 80, b: 40 }, Color::Reset),
        ActorKind::Barrel => ('O', ' ', Color::Rgb { r: 200, g: 150, b: 60 }, Color::Reset),
        ActorKind::Koopa { .. } => ('K', ' ', Color::Rgb { r: 80, g: 255, b: 80 }, Color::Reset),
        ActorKind::Kong { .. } => ('▟', '▙', Color::Rgb { r: 180, g: 90, b: 40 }, Color::Reset),
        ActorKind::Burp { .. } => ('~', '~', Color::Rgb { r: 220, g: 120, b: 255 }, Color::Reset),
        ActorKind::ExtraLife => ('♥', ' ', Color::Rgb { r: 255, g: 60, b: 90 }, Color::Reset),
        ActorKind::Garlic => ('G', ' ', Color::Rgb { r: 240, g: 220, b: 120 }, Color::Reset),
    }
}
