use crate::geometry::{fit_line, pixel_dist_sq, Line};
use crate::shapes::Pixel;
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;

/// Region-local identifier of a primitive slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrimTag(pub u32);

/// Exclusive structural role of a primitive. A primitive claimed by one
/// consumer is skipped by every other structural search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Claim {
    #[default]
    Unclaimed,
    Rectangle,
    Gridline,
    Tick,
}

/// Ordered pixel chain belonging to exactly one region.
///
/// The fitted line is derived lazily and cached; any mutation of the point
/// sequence invalidates the cache.
#[derive(Clone, Debug, Serialize)]
pub struct Primitive {
    tag: PrimTag,
    points: Vec<Pixel>,
    claim: Claim,
    #[serde(skip)]
    line: OnceCell<Line>,
}

impl Primitive {
    pub fn new(tag: PrimTag, points: Vec<Pixel>) -> Self {
        debug_assert!(!points.is_empty(), "a primitive needs at least one pixel");
        Self {
            tag,
            points,
            claim: Claim::Unclaimed,
            line: OnceCell::new(),
        }
    }

    pub fn tag(&self) -> PrimTag {
        self.tag
    }

    pub fn points(&self) -> &[Pixel] {
        &self.points
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn begin(&self) -> Pixel {
        self.points[0]
    }

    pub fn end(&self) -> Pixel {
        *self.points.last().expect("primitive is never empty")
    }

    /// Endpoint-to-endpoint length in pixels.
    pub fn length_px(&self) -> f64 {
        pixel_dist_sq(self.begin(), self.end()).sqrt()
    }

    /// Least-squares line through the chain, fitted on first use.
    pub fn line(&self) -> Line {
        *self.line.get_or_init(|| fit_line(&self.points))
    }

    pub fn claim(&self) -> Claim {
        self.claim
    }

    pub fn set_claim(&mut self, claim: Claim) {
        self.claim = claim;
    }

    pub fn is_unclaimed(&self) -> bool {
        self.claim == Claim::Unclaimed
    }

    /// All pixels share one row.
    pub fn is_horizontal(&self) -> bool {
        let row = self.points[0].row;
        self.points.iter().all(|p| p.row == row)
    }

    /// All pixels share one column.
    pub fn is_vertical(&self) -> bool {
        let col = self.points[0].col;
        self.points.iter().all(|p| p.col == col)
    }

    pub fn is_axis_aligned(&self) -> bool {
        self.is_horizontal() || self.is_vertical()
    }

    /// Replace the point sequence after a splice, dropping the cached fit.
    pub(crate) fn set_points(&mut self, points: Vec<Pixel>) {
        debug_assert!(!points.is_empty());
        self.points = points;
        self.line.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_and_axis_tests() {
        let p = Primitive::new(PrimTag(0), vec![Pixel::new(2, 3), Pixel::new(2, 4), Pixel::new(2, 5)]);
        assert_eq!(p.begin(), Pixel::new(2, 3));
        assert_eq!(p.end(), Pixel::new(2, 5));
        assert!(p.is_horizontal());
        assert!(!p.is_vertical());
        assert!((p.length_px() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn line_cache_is_dropped_on_mutation() {
        let mut p = Primitive::new(PrimTag(1), (0..5).map(|c| Pixel::new(1, c)).collect());
        assert!((p.line().intercept - 1.0).abs() < 1e-9);
        p.set_points((0..5).map(|c| Pixel::new(8, c)).collect());
        assert!((p.line().intercept - 8.0).abs() < 1e-9, "stale fitted line survived a splice");
    }
}
