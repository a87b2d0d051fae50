use flowgrid_core::Point;

/// Cached neighbor computation helper.
///
/// Enumerates the Moore neighborhood of a grid point in a fixed row-major
/// order (top row left to right, then the middle row, then the bottom
/// row), which is the order propagation resolves ties in.
pub struct Neighbors {
    buf: Vec<Point>,
}

impl Default for Neighbors {
    fn default() -> Self {
        Self::new()
    }
}

impl Neighbors {
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(8),
        }
    }

    /// Return the 8 neighbors of `p` in row-major order, keeping only those
    /// for which `keep` returns `true`.
    pub fn moore(&mut self, p: Point, keep: impl Fn(Point) -> bool) -> &[Point] {
        self.buf.clear();
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let n = p.shift(dx, dy);
                if keep(n) {
                    self.buf.push(n);
                }
            }
        }
        &self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowgrid_core::Range;

    #[test]
    fn moore_order_is_row_major() {
        let mut nb = Neighbors::new();
        let got = nb.moore(Point::new(5, 5), |_| true).to_vec();
        let mut sorted = got.clone();
        sorted.sort();
        assert_eq!(got, sorted);
        assert_eq!(got.len(), 8);
        assert_eq!(got[0], Point::new(4, 4));
        assert_eq!(got[3], Point::new(4, 5));
        assert_eq!(got[7], Point::new(6, 6));
    }

    #[test]
    fn moore_skips_outside_corner() {
        let bounds = Range::new(0, 0, 3, 3);
        let mut nb = Neighbors::new();
        let got = nb.moore(Point::ZERO, |n| bounds.contains(n));
        assert_eq!(got, &[Point::new(1, 0), Point::new(0, 1), Point::new(1, 1)]);
    }
}
