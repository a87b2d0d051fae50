//! **flowgrid-core**: the data side of a grid flow field.
//!
//! This crate provides geometry primitives, the [`Tile`] cell type with its
//! cost rules, the [`Grid`] container with a single target, layout-driven
//! initialization with an injected random source, and ASCII maps. Cost
//! propagation lives in `flowgrid-paths`.

pub mod geom;
pub mod grid;
pub mod layout;
pub mod map;
pub mod tile;

pub use geom::{Point, Range};
pub use grid::{Grid, GridError};
pub use layout::{Corridor, Layout, ObstacleSource, SampleError};
pub use map::MapError;
pub use tile::{Direction, Tile, TileKind};

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn layout_round_trip() {
        let layout = Layout::default().with_corridor(Corridor::Row(4));
        let json = serde_json::to_string(&layout).unwrap();
        let back: Layout = serde_json::from_str(&json).unwrap();
        assert_eq!(back, layout);
    }

    #[test]
    fn direction_and_kind_round_trip() {
        let json = serde_json::to_string(&(Direction::SW, TileKind::Obstacle)).unwrap();
        let back: (Direction, TileKind) = serde_json::from_str(&json).unwrap();
        assert_eq!(back, (Direction::SW, TileKind::Obstacle));
    }

    #[test]
    fn range_round_trip() {
        let r = Range::new(1, 2, 10, 20);
        let json = serde_json::to_string(&r).unwrap();
        let back: Range = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }
}
