//! Crossterm console renderer for flowgrid.
//!
//! Draws a [`Grid`] as a table of glyphs: walls, obstacles and the target
//! get fixed symbols, open tiles show the arrow of their flow direction.
//! Columns and rows are labelled starting at 1, the way coordinates are
//! typed at the console.

use std::io::{self, Stdout, Write};

use crossterm::{
    cursor, queue,
    style::{Color as CtColor, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};

use flowgrid_core::{Direction, Grid, Tile, TileKind};

/// Width in characters of one rendered tile.
const TILE_WIDTH: usize = 3;

/// Arrow for a flow direction.
pub const fn direction_glyph(d: Direction) -> char {
    match d {
        Direction::N => '↑',
        Direction::NE => '↗',
        Direction::E => '→',
        Direction::SE => '↘',
        Direction::S => '↓',
        Direction::SW => '↙',
        Direction::W => '←',
        Direction::NW => '↖',
    }
}

/// Glyph of a tile. Open tiles without a direction are blank.
pub fn glyph(tile: &Tile) -> char {
    match tile.kind() {
        TileKind::Wall => '▨',
        TileKind::Obstacle => '▢',
        TileKind::Target => '◉',
        TileKind::Open => tile.direction().map_or(' ', direction_glyph),
    }
}

fn color(kind: TileKind) -> CtColor {
    match kind {
        TileKind::Wall => CtColor::DarkGrey,
        TileKind::Obstacle => CtColor::Yellow,
        TileKind::Target => CtColor::Red,
        TileKind::Open => CtColor::Reset,
    }
}

/// Terminal size (columns, rows) needed to show `grid` with its labels and
/// one status line.
pub fn frame_size(grid: &Grid) -> (u16, u16) {
    let cols = (grid.width() as usize + 1) * TILE_WIDTH;
    let rows = grid.height() as usize + 2;
    (cols.min(u16::MAX as usize) as u16, rows.min(u16::MAX as usize) as u16)
}

fn header(grid: &Grid) -> String {
    let mut s = String::from("  ");
    for x in 0..grid.width() {
        s.push_str(&format!(" {:02}", x + 1));
    }
    s
}

/// Plain-text rendering of `grid`, one line per row.
pub fn frame(grid: &Grid) -> String {
    let mut s = header(grid);
    s.push('\n');
    for (p, tile) in grid.iter() {
        if p.x == 0 {
            s.push_str(&format!("{:02}", p.y + 1));
        }
        s.push_str("  ");
        s.push(glyph(tile));
        if p.x == grid.width() - 1 {
            s.push('\n');
        }
    }
    s
}

/// Renders grids to a terminal-like writer.
pub struct ConsoleRenderer<W: Write> {
    out: W,
    color: bool,
}

impl ConsoleRenderer<Stdout> {
    /// A colored renderer on standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, color: true }
    }

    /// Configure whether tiles are colored by kind.
    pub fn with_color(mut self, enabled: bool) -> Self {
        self.color = enabled;
        self
    }

    /// Resize the terminal so that `grid` fits.
    pub fn init(&mut self, grid: &Grid) -> io::Result<()> {
        let (cols, rows) = frame_size(grid);
        queue!(self.out, terminal::SetSize(cols, rows))?;
        self.out.flush()
    }

    /// Clear the screen and scrollback, then draw `grid` and a status line.
    pub fn render(&mut self, grid: &Grid) -> io::Result<()> {
        queue!(
            self.out,
            terminal::Clear(ClearType::All),
            terminal::Clear(ClearType::Purge),
            cursor::MoveTo(0, 0),
            Print(header(grid)),
            Print("\r\n"),
        )?;

        for (p, tile) in grid.iter() {
            if p.x == 0 {
                queue!(self.out, Print(format!("{:02}", p.y + 1)))?;
            }
            if self.color {
                queue!(
                    self.out,
                    SetForegroundColor(color(tile.kind())),
                    Print(format!("  {}", glyph(tile))),
                    ResetColor,
                )?;
            } else {
                queue!(self.out, Print(format!("  {}", glyph(tile))))?;
            }
            if p.x == grid.width() - 1 {
                queue!(self.out, Print("\r\n"))?;
            }
        }

        queue!(self.out, Print(format!("pass {}\r\n", grid.pass())))?;
        self.out.flush()
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}
