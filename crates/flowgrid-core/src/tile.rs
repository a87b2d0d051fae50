//! The [`Tile`] type: one grid location of a flow field.
//!
//! A tile carries its [`TileKind`], the committed integration cost, the
//! pending cost of the pass in progress and the [`Direction`] an agent
//! standing on it should step in.

use crate::geom::Point;

/// Traversal increment of an obstacle. Large but finite, so a field can
/// still route through obstacles when nothing else connects.
pub const OBSTACLE_COST: f32 = 10000.0;

/// Traversal increment of an open tile entered along an axis.
pub const STRAIGHT_COST: f32 = 1.0;

/// Traversal increment of an open tile entered diagonally.
pub const DIAGONAL_COST: f32 = 1.5;

/// What occupies a tile. The set is closed: every consumer matches it
/// exhaustively.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TileKind {
    #[default]
    Open,
    Target,
    Obstacle,
    Wall,
}

impl TileKind {
    /// Whether a propagation pass computes a cost for this kind.
    #[inline]
    pub const fn is_relaxed(self) -> bool {
        matches!(self, TileKind::Open | TileKind::Obstacle)
    }
}

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// One of the eight compass directions. North is `-y`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Direction {
    /// All directions, clockwise from north.
    pub const ALL: [Direction; 8] = [
        Direction::N,
        Direction::NE,
        Direction::E,
        Direction::SE,
        Direction::S,
        Direction::SW,
        Direction::W,
        Direction::NW,
    ];

    /// Direction of a unit step `delta`. Returns `None` for the zero
    /// offset; only the signs of the components are looked at.
    pub fn from_offset(delta: Point) -> Option<Self> {
        let d = match (delta.x.signum(), delta.y.signum()) {
            (0, -1) => Direction::N,
            (1, -1) => Direction::NE,
            (1, 0) => Direction::E,
            (1, 1) => Direction::SE,
            (0, 1) => Direction::S,
            (-1, 1) => Direction::SW,
            (-1, 0) => Direction::W,
            (-1, -1) => Direction::NW,
            _ => return None,
        };
        Some(d)
    }

    /// Unit offset of one step in this direction.
    pub const fn offset(self) -> Point {
        match self {
            Direction::N => Point::new(0, -1),
            Direction::NE => Point::new(1, -1),
            Direction::E => Point::new(1, 0),
            Direction::SE => Point::new(1, 1),
            Direction::S => Point::new(0, 1),
            Direction::SW => Point::new(-1, 1),
            Direction::W => Point::new(-1, 0),
            Direction::NW => Point::new(-1, -1),
        }
    }

    #[inline]
    pub const fn is_diagonal(self) -> bool {
        matches!(
            self,
            Direction::NE | Direction::SE | Direction::SW | Direction::NW
        )
    }
}

// ---------------------------------------------------------------------------
// Tile
// ---------------------------------------------------------------------------

/// A single flow-field cell.
///
/// `cost` is what the next pass reads; `pending_cost` is written during a
/// pass and becomes `cost` on [`commit`](Tile::commit). Target and wall
/// costs are derived from the kind (see [`cost`](Tile::cost)), never from
/// the stored value.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Tile {
    kind: TileKind,
    cost: f32,
    pending_cost: f32,
    pass: u32,
    direction: Option<Direction>,
}

impl Default for Tile {
    fn default() -> Self {
        Self::new(TileKind::Open)
    }
}

impl Tile {
    /// A tile of the given kind in its reset state: unreached, no
    /// direction, never committed.
    #[inline]
    pub const fn new(kind: TileKind) -> Self {
        Self {
            kind,
            cost: f32::INFINITY,
            pending_cost: f32::INFINITY,
            pass: 0,
            direction: None,
        }
    }

    #[inline]
    pub fn kind(&self) -> TileKind {
        self.kind
    }

    /// Committed integration cost: 0 for the target, +∞ for walls, the
    /// stored value otherwise.
    #[inline]
    pub fn cost(&self) -> f32 {
        match self.kind {
            TileKind::Target => 0.0,
            TileKind::Wall => f32::INFINITY,
            TileKind::Open | TileKind::Obstacle => self.cost,
        }
    }

    /// Candidate cost staged by the pass in progress.
    #[inline]
    pub fn pending_cost(&self) -> f32 {
        self.pending_cost
    }

    /// Pass number of the last commit, 0 if the tile was never committed.
    #[inline]
    pub fn pass_stamp(&self) -> u32 {
        self.pass
    }

    /// Step toward lower cost. Always `None` for anything but open tiles.
    #[inline]
    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    /// Cost of entering this tile, diagonally or along an axis.
    #[inline]
    pub fn cost_increment(&self, diagonal: bool) -> f32 {
        match self.kind {
            TileKind::Target => 0.0,
            TileKind::Wall => f32::INFINITY,
            TileKind::Obstacle => OBSTACLE_COST,
            TileKind::Open if diagonal => DIAGONAL_COST,
            TileKind::Open => STRAIGHT_COST,
        }
    }

    /// Stage a new cost from the cheapest neighbor: `min_cost` is that
    /// neighbor's committed cost and `toward` points from this tile to it.
    ///
    /// Targets and walls are left untouched. Only open tiles record the
    /// direction.
    pub(crate) fn relax(&mut self, min_cost: f32, toward: Direction) {
        if !self.kind.is_relaxed() {
            return;
        }
        self.pending_cost = min_cost + self.cost_increment(toward.is_diagonal());
        if self.kind == TileKind::Open {
            self.direction = Some(toward);
        }
    }

    /// Whether committing would change the stored cost. Exact comparison:
    /// an unreached tile (+∞ on both sides) is not a change.
    #[inline]
    pub fn is_changed(&self) -> bool {
        self.pending_cost != self.cost
    }

    /// Commit the pending cost and stamp the tile with `pass`. Returns
    /// whether the stored cost changed.
    #[inline]
    pub(crate) fn commit(&mut self, pass: u32) -> bool {
        let changed = self.is_changed();
        self.cost = self.pending_cost;
        self.pass = pass;
        changed
    }
}
