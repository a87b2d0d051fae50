//! Cost propagation for grid flow fields.
//!
//! A [`Propagator`] relaxes the integration costs of a
//! [`Grid`](flowgrid_core::Grid) one pass at a time, outward from its
//! target, until a pass changes nothing. Every open tile then points along
//! the cheapest step toward the target, so any number of agents can share
//! the one field.
//!
//! ```
//! use flowgrid_core::{Direction, Grid, Point};
//! use flowgrid_paths::Propagator;
//!
//! let mut grid = Grid::new(Point::new(4, 4), Point::new(0, 0)).unwrap();
//! let mut prop = Propagator::new();
//! while prop.tick(&mut grid) {}
//! assert_eq!(grid.cost_at(Point::new(3, 3)).unwrap(), 4.5);
//! assert_eq!(grid.direction_at(Point::new(3, 3)).unwrap(), Some(Direction::NW));
//! ```

mod distance;
mod neighbors;
mod propagate;

pub use distance::{chebyshev, octile};
pub use neighbors::Neighbors;
pub use propagate::{FieldError, PassReport, Propagator};
