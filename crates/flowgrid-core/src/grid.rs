//! The [`Grid`] type: a rectangular flow field toward a single target.
//!
//! Tiles are stored row-major in one buffer. The grid itself never chooses
//! costs; a propagation engine reads the committed costs through
//! [`tiles`](Grid::tiles), stages the next pass with
//! [`stage`](Grid::stage) and publishes it with
//! [`commit_pass`](Grid::commit_pass). Neither can change a tile's kind.

use std::fmt;

use rayon::prelude::*;

use crate::geom::{Point, Range};
use crate::layout::{Layout, ObstacleSource, SampleError};
use crate::tile::{Direction, OBSTACLE_COST, STRAIGHT_COST, Tile, TileKind};

/// A 2D grid of [`Tile`]s with exactly one target.
#[derive(Debug, Clone)]
pub struct Grid {
    tiles: Vec<Tile>,
    bounds: Range,
    target: Point,
    pass: u32,
}

impl Grid {
    /// Create a grid of `size` where every tile but `target` is open and
    /// unreached.
    pub fn new(size: Point, target: Point) -> Result<Self, GridError> {
        if size.x <= 0 || size.y <= 0 {
            return Err(GridError::EmptyGrid(size));
        }
        let bounds = Range::with_size(size);
        let idx = bounds.index_of(target).ok_or(GridError::OutOfBounds {
            pos: target,
            bounds,
        })?;
        let mut tiles = vec![Tile::default(); bounds.len()];
        tiles[idx] = Tile::new(TileKind::Target);
        Ok(Self {
            tiles,
            bounds,
            target,
            pass: 0,
        })
    }

    /// Assemble a grid from row-major kinds. The caller guarantees that
    /// `kinds` covers `bounds` and holds a single target at `target`.
    pub(crate) fn from_kinds(bounds: Range, target: Point, kinds: &[TileKind]) -> Self {
        Self {
            tiles: kinds.iter().map(|&k| Tile::new(k)).collect(),
            bounds,
            target,
            pass: 0,
        }
    }

    /// (Re)populate every tile from `layout`, drawing obstacle samples from
    /// `source` in row-major order.
    ///
    /// All samples are drawn before any tile is touched: if the source
    /// fails, the grid is left exactly as it was.
    pub fn init<S>(&mut self, layout: &Layout, source: &mut S) -> Result<(), GridError>
    where
        S: ObstacleSource + ?Sized,
    {
        let kinds = layout.classify(self.bounds, self.target, source)?;
        self.tiles
            .par_iter_mut()
            .zip(kinds.par_iter())
            .for_each(|(tile, &kind)| *tile = Tile::new(kind));
        self.pass = 0;

        if log::log_enabled!(log::Level::Debug) {
            let count = |kind| self.tiles.iter().filter(|t| t.kind() == kind).count();
            log::debug!(
                "grid {}x{} initialized: {} walls, {} obstacles, target at {}",
                self.width(),
                self.height(),
                count(TileKind::Wall),
                count(TileKind::Obstacle),
                self.target
            );
        }
        Ok(())
    }

    /// Turn the tile at `p` into an unreached obstacle.
    ///
    /// The field is not recomputed; run another pass to take the change
    /// into account. The target and walls cannot be converted.
    pub fn set_block(&mut self, p: Point) -> Result<(), GridError> {
        let idx = self.index(p)?;
        match self.tiles[idx].kind() {
            TileKind::Target => return Err(GridError::TargetCell(p)),
            TileKind::Wall => return Err(GridError::WallCell(p)),
            TileKind::Open | TileKind::Obstacle => {}
        }
        self.tiles[idx] = Tile::new(TileKind::Obstacle);
        log::debug!("obstacle placed at {p}");
        Ok(())
    }

    /// The tile at `p`.
    pub fn tile(&self, p: Point) -> Result<&Tile, GridError> {
        self.index(p).map(|i| &self.tiles[i])
    }

    /// Committed cost at `p`.
    pub fn cost_at(&self, p: Point) -> Result<f32, GridError> {
        self.tile(p).map(Tile::cost)
    }

    /// Flow direction at `p`.
    pub fn direction_at(&self, p: Point) -> Result<Option<Direction>, GridError> {
        self.tile(p).map(Tile::direction)
    }

    /// Row-major tile buffer.
    #[inline]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Row-major iterator over `(Point, &Tile)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Point, &Tile)> + '_ {
        self.bounds.iter().zip(self.tiles.iter())
    }

    /// Number of passes committed since the last initialization.
    #[inline]
    pub fn pass(&self) -> u32 {
        self.pass
    }

    /// Stage a pending cost on every open tile and obstacle, in parallel.
    ///
    /// `cheapest` gets the row-major index of a tile and returns the
    /// committed cost of its cheapest neighbor with the direction toward it,
    /// or `None` while no neighbor is reached. `init` builds per-worker
    /// scratch state passed to `cheapest`. Targets and walls are skipped.
    pub fn stage<T, I, F>(&mut self, init: I, cheapest: F)
    where
        I: Fn() -> T + Sync + Send,
        F: Fn(&mut T, usize) -> Option<(f32, Direction)> + Sync + Send,
    {
        self.tiles
            .par_iter_mut()
            .enumerate()
            .for_each_init(init, |scratch, (i, tile)| {
                if !tile.kind().is_relaxed() {
                    return;
                }
                if let Some((min, toward)) = cheapest(scratch, i) {
                    tile.relax(min, toward);
                }
            });
    }

    /// Commit every staged cost, stamp all tiles with the next pass number
    /// and advance the pass counter. Returns how many committed costs
    /// changed.
    pub fn commit_pass(&mut self) -> usize {
        let pass = self.pass + 1;
        let changed = self
            .tiles
            .par_iter_mut()
            .map(|tile| tile.commit(pass))
            .filter(|&changed| changed)
            .count();
        self.pass = pass;
        changed
    }

    /// A pass count within which repeated passes always settle, including
    /// after obstacles were placed on a settled field.
    ///
    /// Costs made stale by an edit climb by at least one straight step per
    /// pass until they reach the true cost, and no true cost exceeds one
    /// obstacle crossing per tile.
    pub fn pass_limit(&self) -> usize {
        let per_tile = (OBSTACLE_COST / STRAIGHT_COST) as usize + 1;
        self.tiles.len().saturating_mul(per_tile).saturating_add(1)
    }

    #[inline]
    pub fn target(&self) -> Point {
        self.target
    }

    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    #[inline]
    pub fn size(&self) -> Point {
        self.bounds.size()
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.bounds.contains(p)
    }

    fn index(&self, p: Point) -> Result<usize, GridError> {
        self.bounds.index_of(p).ok_or(GridError::OutOfBounds {
            pos: p,
            bounds: self.bounds,
        })
    }
}

/// Errors raised by [`Grid`] construction, lookup and editing.
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// Width or height is not positive.
    EmptyGrid(Point),
    /// A coordinate lies outside the grid.
    OutOfBounds { pos: Point, bounds: Range },
    /// The target tile cannot be edited.
    TargetCell(Point),
    /// Wall tiles never change kind.
    WallCell(Point),
    /// The random source failed during initialization.
    Sample(SampleError),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid(size) => write!(f, "grid size {}x{} is empty", size.x, size.y),
            Self::OutOfBounds { pos, bounds } => write!(f, "{pos} is outside grid {bounds}"),
            Self::TargetCell(p) => write!(f, "{p} is the target"),
            Self::WallCell(p) => write!(f, "{p} is a wall"),
            Self::Sample(e) => write!(f, "grid initialization aborted: {e}"),
        }
    }
}

impl std::error::Error for GridError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Sample(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SampleError> for GridError {
    fn from(e: SampleError) -> Self {
        Self::Sample(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    struct Failing;

    impl ObstacleSource for Failing {
        fn sample(&mut self) -> Result<f64, SampleError> {
            Err(SampleError("entropy unavailable".into()))
        }
    }

    fn reference_grid() -> Grid {
        Grid::new(Point::new(40, 30), Point::new(20, 15)).unwrap()
    }

    #[test]
    fn new_rejects_bad_shapes() {
        assert_eq!(
            Grid::new(Point::new(0, 5), Point::ZERO).unwrap_err(),
            GridError::EmptyGrid(Point::new(0, 5))
        );
        assert!(matches!(
            Grid::new(Point::new(4, 4), Point::new(4, 0)),
            Err(GridError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn new_grid_is_open_and_unreached() {
        let g = Grid::new(Point::new(3, 2), Point::new(1, 1)).unwrap();
        assert_eq!(g.tiles().len(), 6);
        for (p, t) in g.iter() {
            if p == Point::new(1, 1) {
                assert_eq!(t.kind(), TileKind::Target);
                assert_eq!(t.cost(), 0.0);
            } else {
                assert_eq!(t.kind(), TileKind::Open);
                assert_eq!(t.cost(), f32::INFINITY);
            }
        }
    }

    #[test]
    fn init_places_one_target_and_walls() {
        let mut g = reference_grid();
        g.init(&Layout::default(), &mut StdRng::seed_from_u64(7)).unwrap();

        let targets: Vec<_> = g.iter().filter(|(_, t)| t.kind() == TileKind::Target).collect();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].0, Point::new(20, 15));
        assert_eq!(g.cost_at(Point::new(20, 15)).unwrap(), 0.0);

        assert_eq!(g.tile(Point::new(3, 3)).unwrap().kind(), TileKind::Wall);
        assert_eq!(g.tile(Point::new(36, 26)).unwrap().kind(), TileKind::Wall);
        // Corridor and margin never hold walls.
        for (p, t) in g.iter() {
            if p.y == 15 || p.x < 3 || p.y < 3 || p.x >= 37 || p.y >= 27 {
                assert_ne!(t.kind(), TileKind::Wall, "unexpected wall at {p}");
            }
        }
    }

    #[test]
    fn init_is_reproducible_with_a_seed() {
        let mut a = reference_grid();
        let mut b = reference_grid();
        a.init(&Layout::default(), &mut StdRng::seed_from_u64(42)).unwrap();
        b.init(&Layout::default(), &mut StdRng::seed_from_u64(42)).unwrap();
        let kinds = |g: &Grid| g.tiles().iter().map(Tile::kind).collect::<Vec<_>>();
        assert_eq!(kinds(&a), kinds(&b));
    }

    #[test]
    fn init_resets_costs_and_pass() {
        let mut g = Grid::new(Point::new(3, 1), Point::ZERO).unwrap();
        g.stage(|| (), |_, i| (i == 1).then_some((0.0, Direction::W)));
        g.commit_pass();
        g.init(&Layout::open(), &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(g.pass(), 0);
        assert_eq!(g.cost_at(Point::new(1, 0)).unwrap(), f32::INFINITY);
        assert_eq!(g.direction_at(Point::new(1, 0)).unwrap(), None);
    }

    #[test]
    fn init_failure_leaves_grid_untouched() {
        let mut g = reference_grid();
        g.set_block(Point::new(0, 0)).unwrap();
        let before = g.tiles().to_vec();
        let err = g.init(&Layout::default(), &mut Failing).unwrap_err();
        assert!(matches!(err, GridError::Sample(_)));
        assert_eq!(g.tiles(), &before[..]);
    }

    #[test]
    fn set_block_resets_tile() {
        let mut g = Grid::new(Point::new(3, 3), Point::ZERO).unwrap();
        let p = Point::new(2, 2);
        g.stage(|| (), |_, i| (i == 8).then_some((1.0, Direction::NW)));
        g.commit_pass();
        g.set_block(p).unwrap();
        let t = g.tile(p).unwrap();
        assert_eq!(t.kind(), TileKind::Obstacle);
        assert_eq!(t.cost(), f32::INFINITY);
        assert_eq!(t.direction(), None);
        assert_eq!(t.pass_stamp(), 0);
    }

    #[test]
    fn set_block_rejects_out_of_bounds() {
        let mut g = Grid::new(Point::new(3, 3), Point::ZERO).unwrap();
        for p in [Point::new(-1, 0), Point::new(3, 0), Point::new(0, 3)] {
            assert_eq!(
                g.set_block(p),
                Err(GridError::OutOfBounds {
                    pos: p,
                    bounds: Range::new(0, 0, 3, 3)
                })
            );
        }
    }

    #[test]
    fn set_block_protects_target_and_walls() {
        let mut g = reference_grid();
        g.init(&Layout::default(), &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(
            g.set_block(Point::new(20, 15)),
            Err(GridError::TargetCell(Point::new(20, 15)))
        );
        assert_eq!(
            g.set_block(Point::new(10, 10)),
            Err(GridError::WallCell(Point::new(10, 10)))
        );
    }

    #[test]
    fn lookup_is_bounds_checked() {
        let g = Grid::new(Point::new(2, 2), Point::ZERO).unwrap();
        assert!(g.tile(Point::new(2, 1)).is_err());
        assert!(g.cost_at(Point::new(0, -1)).is_err());
        assert!(g.direction_at(Point::new(1, 1)).is_ok());
    }

    #[test]
    fn error_messages() {
        let e = GridError::OutOfBounds {
            pos: Point::new(5, 1),
            bounds: Range::new(0, 0, 4, 4),
        };
        assert_eq!(e.to_string(), "(5, 1) is outside grid [(0, 0)-(4, 4))");
        let e: GridError = SampleError("boom".into()).into();
        assert!(std::error::Error::source(&e).is_some());
    }

    #[test]
    fn staging_never_touches_target_or_walls() {
        let mut g = Grid::from_map("T.#o").unwrap();
        g.stage(|| (), |_, _| Some((0.0, Direction::W)));
        assert_eq!(g.commit_pass(), 2);
        assert_eq!(g.pass(), 1);
        let t = |x| *g.tile(Point::new(x, 0)).unwrap();
        assert_eq!(t(0).kind(), TileKind::Target);
        assert_eq!(t(0).cost(), 0.0);
        assert_eq!(t(0).direction(), None);
        assert_eq!(t(2).kind(), TileKind::Wall);
        assert_eq!(t(2).cost(), f32::INFINITY);
        assert_eq!(t(2).direction(), None);
        assert_eq!(t(1).cost(), 1.0);
        assert_eq!(t(1).direction(), Some(Direction::W));
        assert_eq!(t(3).cost(), 10000.0);
        assert_eq!(t(3).direction(), None);
        assert!(g.tiles().iter().all(|t| t.pass_stamp() == 1));
    }

    #[test]
    fn pass_limit_covers_obstacle_crossings() {
        let g = Grid::new(Point::new(6, 1), Point::ZERO).unwrap();
        assert_eq!(g.pass_limit(), 6 * 10001 + 1);
    }
}
