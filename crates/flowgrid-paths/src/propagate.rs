use std::fmt;

use flowgrid_core::{Direction, Grid, Point, Range, Tile};
use rayon::prelude::*;

use crate::neighbors::Neighbors;

/// Outcome of one propagation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PassReport {
    /// Pass number stamped on every tile.
    pub pass: u32,
    /// Tiles whose committed cost changed.
    pub changed: usize,
}

impl PassReport {
    /// Whether the pass left every cost as it was: the field is at its
    /// fixed point.
    #[inline]
    pub fn is_quiet(&self) -> bool {
        self.changed == 0
    }
}

/// Jacobi-style cost relaxation over a [`Grid`].
///
/// Each pass runs two parallel sweeps. The first reads a snapshot of the
/// committed costs and stages a pending cost (and, for open tiles, a
/// direction) on every open tile or obstacle; the second commits all
/// pending costs at once. No tile ever sees a cost staged in the same pass,
/// so the result does not depend on scheduling.
///
/// The snapshot buffer is kept between passes, so repeated passes over
/// grids of the same size do not allocate.
#[derive(Debug, Default)]
pub struct Propagator {
    costs: Vec<f32>,
}

impl Propagator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one pass. Returns `true` while the field is still changing.
    pub fn tick(&mut self, grid: &mut Grid) -> bool {
        !self.step(grid).is_quiet()
    }

    /// Run one pass and report how many tiles changed.
    pub fn step(&mut self, grid: &mut Grid) -> PassReport {
        let bounds = grid.bounds();

        self.costs.clear();
        self.costs
            .par_extend(grid.tiles().par_iter().map(Tile::cost));
        let costs = &self.costs;

        grid.stage(Neighbors::new, |nb, i| {
            cheapest_neighbor(nb, bounds.point_at(i), bounds, costs)
        });
        let changed = grid.commit_pass();
        let pass = grid.pass();

        log::trace!("pass {pass}: {changed} tiles changed");
        PassReport { pass, changed }
    }

    /// Run passes until one reports no change, and return how many passes
    /// ran, the quiet one included.
    ///
    /// Fails if `max_passes` passes all changed something.
    /// [`Grid::pass_limit`] is always enough, even after obstacles were
    /// placed on a settled field.
    pub fn run(&mut self, grid: &mut Grid, max_passes: usize) -> Result<usize, FieldError> {
        for n in 1..=max_passes {
            if !self.tick(grid) {
                log::info!("field converged after {n} passes");
                return Ok(n);
            }
        }
        log::warn!("field still changing after {max_passes} passes");
        Err(FieldError::NotConverged { passes: max_passes })
    }
}

/// Cheapest reachable neighbor of `p` in the committed `costs`, with the
/// direction from `p` to it.
///
/// Neighbors are scanned in row-major order. On equal cost an axis-aligned
/// neighbor beats a diagonal one, since it is the cheaper step; otherwise
/// the first one found wins. Returns `None` while every neighbor is
/// unreached.
fn cheapest_neighbor(
    nb: &mut Neighbors,
    p: Point,
    bounds: Range,
    costs: &[f32],
) -> Option<(f32, Direction)> {
    let mut best: Option<(f32, Direction)> = None;
    for &n in nb.moore(p, |n| bounds.contains(n)) {
        let (Some(i), Some(dir)) = (bounds.index_of(n), Direction::from_offset(n - p)) else {
            continue;
        };
        let cost = costs[i];
        let better = match best {
            None => cost < f32::INFINITY,
            Some((min, cur)) => {
                cost < min || (cost == min && cur.is_diagonal() && !dir.is_diagonal())
            }
        };
        if better {
            best = Some((cost, dir));
        }
    }
    best
}

/// Errors raised while driving a field to its fixed point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// Every one of `passes` passes still changed the field.
    NotConverged { passes: usize },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConverged { passes } => {
                write!(f, "field did not converge within {passes} passes")
            }
        }
    }
}

impl std::error::Error for FieldError {}
