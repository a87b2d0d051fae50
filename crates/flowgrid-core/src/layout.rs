//! Initial-state generation for a [`Grid`](crate::Grid).
//!
//! A [`Layout`] decides the kind of every tile: the target, a block of
//! walls inset from the edges and cut by one open corridor row, and
//! obstacles scattered at random over whatever is left. Randomness comes
//! from an injected [`ObstacleSource`], so a seeded source reproduces the
//! same grid.

use std::fmt;

use rand::{Rng, RngExt};

use crate::geom::{Point, Range};
use crate::tile::TileKind;

/// Chance that a free tile becomes an obstacle: a uniform `u32` below one
/// hundred million.
pub const OBSTACLE_CHANCE: f64 = 100_000_000.0 / 4_294_967_296.0;

/// Default distance between the grid edge and the wall block.
pub const WALL_MARGIN: i32 = 3;

/// Where the open row through the wall block lies.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Corridor {
    /// The middle row, `height / 2`.
    #[default]
    Middle,
    /// A fixed row.
    Row(i32),
    /// No corridor: the wall block is solid.
    Sealed,
}

/// Rules for populating a grid.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Layout {
    /// Inset of the wall block from every edge. `None` disables walls.
    pub wall_margin: Option<i32>,
    pub corridor: Corridor,
    /// Probability in `[0, 1]` that a free tile becomes an obstacle.
    pub obstacle_chance: f64,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            wall_margin: Some(WALL_MARGIN),
            corridor: Corridor::Middle,
            obstacle_chance: OBSTACLE_CHANCE,
        }
    }
}

impl Layout {
    /// No walls and no obstacles: every tile but the target is open.
    pub const fn open() -> Self {
        Self {
            wall_margin: None,
            corridor: Corridor::Sealed,
            obstacle_chance: 0.0,
        }
    }

    /// Builder: set the obstacle chance.
    pub fn with_obstacle_chance(mut self, chance: f64) -> Self {
        self.obstacle_chance = chance;
        self
    }

    /// Builder: set the wall margin.
    pub fn with_wall_margin(mut self, margin: Option<i32>) -> Self {
        self.wall_margin = margin;
        self
    }

    /// Builder: set the corridor.
    pub fn with_corridor(mut self, corridor: Corridor) -> Self {
        self.corridor = corridor;
        self
    }

    /// The wall block of a grid covering `bounds` (empty if disabled).
    pub fn wall_block(&self, bounds: Range) -> Range {
        match self.wall_margin {
            Some(m) => bounds.shift(m, m, -m, -m),
            None => Range::default(),
        }
    }

    /// Absolute y of the corridor row, if any.
    pub fn corridor_row(&self, bounds: Range) -> Option<i32> {
        match self.corridor {
            Corridor::Middle => Some(bounds.min.y + bounds.height() / 2),
            Corridor::Row(y) => Some(y),
            Corridor::Sealed => None,
        }
    }

    /// Kinds that do not depend on randomness: the target and walls.
    ///
    /// Returns `None` for tiles that need an obstacle roll.
    fn fixed_kind(
        &self,
        p: Point,
        target: Point,
        walls: Range,
        corridor: Option<i32>,
    ) -> Option<TileKind> {
        if p == target {
            return Some(TileKind::Target);
        }
        if walls.contains(p) && corridor != Some(p.y) {
            return Some(TileKind::Wall);
        }
        None
    }

    /// Classify every tile of `bounds` in row-major order, drawing one
    /// sample per free tile. Fails on the first sample error.
    pub(crate) fn classify<S: ObstacleSource + ?Sized>(
        &self,
        bounds: Range,
        target: Point,
        source: &mut S,
    ) -> Result<Vec<TileKind>, SampleError> {
        let walls = self.wall_block(bounds);
        let corridor = self.corridor_row(bounds);
        bounds
            .iter()
            .map(|p| {
                if let Some(kind) = self.fixed_kind(p, target, walls, corridor) {
                    return Ok(kind);
                }
                if source.sample()? < self.obstacle_chance {
                    Ok(TileKind::Obstacle)
                } else {
                    Ok(TileKind::Open)
                }
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// ObstacleSource
// ---------------------------------------------------------------------------

/// A source of uniform samples in `[0, 1)` used to scatter obstacles.
///
/// Every [`rand::Rng`] is a source. Implement it directly to script
/// samples or to surface failures of an external generator.
pub trait ObstacleSource {
    fn sample(&mut self) -> Result<f64, SampleError>;
}

impl<R: Rng> ObstacleSource for R {
    #[inline]
    fn sample(&mut self) -> Result<f64, SampleError> {
        Ok(self.random::<f64>())
    }
}

/// The random source could not produce a sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleError(pub String);

impl fmt::Display for SampleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "random source failed: {}", self.0)
    }
}

impl std::error::Error for SampleError {}
