use flowgrid_core::Point;
use flowgrid_core::tile::{DIAGONAL_COST, STRAIGHT_COST};

/// Chebyshev (L∞) distance between two points: the number of king moves.
#[inline]
pub fn chebyshev(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs().max((a.y - b.y).abs())
}

/// Cheapest cost between two points over open ground, moving diagonally
/// for the shorter axis and straight for the rest.
#[inline]
pub fn octile(a: Point, b: Point) -> f32 {
    let dx = (a.x - b.x).abs();
    let dy = (a.y - b.y).abs();
    let diag = dx.min(dy) as f32;
    let straight = (dx - dy).abs() as f32;
    diag * DIAGONAL_COST + straight * STRAIGHT_COST
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distances() {
        let a = Point::new(1, 1);
        let b = Point::new(4, 3);
        assert_eq!(chebyshev(a, b), 3);
        assert_eq!(octile(a, b), 2.0 * 1.5 + 1.0);
        assert_eq!(octile(b, a), octile(a, b));
        assert_eq!(octile(a, a), 0.0);
    }
}
