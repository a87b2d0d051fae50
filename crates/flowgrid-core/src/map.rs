//! Grids described as ASCII art.
//!
//! ```text
//! ..#..
//! .o#T.
//! .....
//! ```
//!
//! `.` is open ground, `o` an obstacle, `#` a wall and `T` the target.
//! Lines are separated by `'\n'` and must all have the same width; leading
//! and trailing whitespace of the whole string is ignored.

use std::fmt;

use crate::geom::{Point, Range};
use crate::grid::Grid;
use crate::tile::TileKind;

/// Map character for each tile kind.
pub const fn rune(kind: TileKind) -> char {
    match kind {
        TileKind::Open => '.',
        TileKind::Obstacle => 'o',
        TileKind::Wall => '#',
        TileKind::Target => 'T',
    }
}

fn kind_of(ch: char) -> Option<TileKind> {
    match ch {
        '.' => Some(TileKind::Open),
        'o' => Some(TileKind::Obstacle),
        '#' => Some(TileKind::Wall),
        'T' => Some(TileKind::Target),
        _ => None,
    }
}

impl Grid {
    /// Parse a grid from an ASCII map. All tiles start unreached.
    pub fn from_map(s: &str) -> Result<Grid, MapError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(MapError::Empty);
        }

        let mut kinds = Vec::with_capacity(s.len());
        let mut target = None;
        let mut width = None;
        let mut height = 0;

        for (y, line) in s.lines().enumerate() {
            let y = y as i32;
            let mut x = 0;
            for ch in line.chars() {
                let pos = Point::new(x, y);
                let kind = kind_of(ch).ok_or(MapError::InvalidRune { ch, pos })?;
                if kind == TileKind::Target {
                    if let Some(first) = target {
                        return Err(MapError::DuplicateTarget { first, second: pos });
                    }
                    target = Some(pos);
                }
                kinds.push(kind);
                x += 1;
            }
            match width {
                None => width = Some(x),
                Some(w) if w != x => {
                    return Err(MapError::InconsistentSize { line: y, expected: w, found: x });
                }
                Some(_) => {}
            }
            height += 1;
        }

        let target = target.ok_or(MapError::MissingTarget)?;
        let bounds = Range::with_size(Point::new(width.unwrap_or(0), height));
        Ok(Grid::from_kinds(bounds, target, &kinds))
    }

    /// Render the tile kinds back as an ASCII map.
    pub fn to_map(&self) -> String {
        let mut out = String::with_capacity(self.tiles().len() + self.height() as usize);
        for (p, t) in self.iter() {
            if p.x == 0 && p.y > 0 {
                out.push('\n');
            }
            out.push(rune(t.kind()));
        }
        out
    }
}

/// Errors that can occur when parsing an ASCII map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// The map has no tiles.
    Empty,
    /// A line is wider or narrower than the first one.
    InconsistentSize { line: i32, expected: i32, found: i32 },
    /// A character that is not a tile rune.
    InvalidRune { ch: char, pos: Point },
    /// No `T` in the map.
    MissingTarget,
    /// More than one `T` in the map.
    DuplicateTarget { first: Point, second: Point },
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "map: empty"),
            Self::InconsistentSize { line, expected, found } => write!(
                f,
                "map: line {line} is {found} tiles wide, expected {expected}"
            ),
            Self::InvalidRune { ch, pos } => {
                write!(f, "map contains invalid rune \u{201c}{ch}\u{201d} at {pos}")
            }
            Self::MissingTarget => write!(f, "map: no target"),
            Self::DuplicateTarget { first, second } => {
                write!(f, "map: second target at {second}, first at {first}")
            }
        }
    }
}

impl std::error::Error for MapError {}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOM: &str = "
#####
#.T.#
#o..#
#####";

    #[test]
    fn parse_kinds_and_target() {
        let g = Grid::from_map(ROOM).unwrap();
        assert_eq!(g.size(), Point::new(5, 4));
        assert_eq!(g.target(), Point::new(2, 1));
        assert_eq!(g.tile(Point::new(0, 0)).unwrap().kind(), TileKind::Wall);
        assert_eq!(g.tile(Point::new(1, 2)).unwrap().kind(), TileKind::Obstacle);
        assert_eq!(g.tile(Point::new(3, 2)).unwrap().kind(), TileKind::Open);
        assert_eq!(g.cost_at(Point::new(2, 1)).unwrap(), 0.0);
        assert_eq!(g.cost_at(Point::new(1, 1)).unwrap(), f32::INFINITY);
    }

    #[test]
    fn to_map_round_trips() {
        let g = Grid::from_map(ROOM).unwrap();
        assert_eq!(g.to_map(), ROOM.trim());
    }

    #[test]
    fn single_line_map() {
        let g = Grid::from_map("T..o.").unwrap();
        assert_eq!(g.size(), Point::new(5, 1));
    }

    #[test]
    fn errors() {
        assert_eq!(Grid::from_map("  \n ").unwrap_err(), MapError::Empty);
        assert_eq!(Grid::from_map("...\n...").unwrap_err(), MapError::MissingTarget);
        assert_eq!(
            Grid::from_map("T..\n..").unwrap_err(),
            MapError::InconsistentSize { line: 1, expected: 3, found: 2 }
        );
        assert_eq!(
            Grid::from_map("T.x").unwrap_err(),
            MapError::InvalidRune { ch: 'x', pos: Point::new(2, 0) }
        );
        assert_eq!(
            Grid::from_map("T.\n.T").unwrap_err(),
            MapError::DuplicateTarget {
                first: Point::new(0, 0),
                second: Point::new(1, 1)
            }
        );
    }

    #[test]
    fn error_message_names_rune() {
        let e = Grid::from_map("T?").unwrap_err();
        assert_eq!(e.to_string(), "map contains invalid rune \u{201c}?\u{201d} at (1, 0)");
    }
}
