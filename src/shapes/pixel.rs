use serde::{Deserialize, Serialize};

/// Integer raster coordinate. A pixel has no identity beyond `(row, col)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pixel {
    pub row: i32,
    pub col: i32,
}

impl Pixel {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Planar coordinates as `[x, y]` = `[col, row]`.
    pub fn xy(&self) -> [f64; 2] {
        [self.col as f64, self.row as f64]
    }

    /// The 8-connected neighborhood, in no particular order.
    pub fn neighbors8(&self) -> [Pixel; 8] {
        let r = self.row;
        let c = self.col;
        [
            Pixel::new(r - 1, c - 1),
            Pixel::new(r - 1, c),
            Pixel::new(r - 1, c + 1),
            Pixel::new(r, c - 1),
            Pixel::new(r, c + 1),
            Pixel::new(r + 1, c - 1),
            Pixel::new(r + 1, c),
            Pixel::new(r + 1, c + 1),
        ]
    }

    /// Chebyshev distance; two distinct pixels are 8-adjacent iff this is 1.
    pub fn chebyshev(&self, other: Pixel) -> i32 {
        (self.row - other.row).abs().max((self.col - other.col).abs())
    }

    pub fn is_neighbor8(&self, other: Pixel) -> bool {
        *self != other && self.chebyshev(other) == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbors8_surround_the_pixel() {
        let p = Pixel::new(3, 7);
        let n = p.neighbors8();
        assert_eq!(n.len(), 8);
        for q in n {
            assert!(p.is_neighbor8(q), "expected {q:?} adjacent to {p:?}");
        }
    }

    #[test]
    fn adjacency_is_chebyshev_one() {
        let p = Pixel::new(0, 0);
        assert!(p.is_neighbor8(Pixel::new(1, 1)));
        assert!(!p.is_neighbor8(Pixel::new(0, 0)));
        assert!(!p.is_neighbor8(Pixel::new(2, 1)));
    }
}
