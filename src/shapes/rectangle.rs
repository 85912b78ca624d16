use crate::shapes::{PrimTag, RegionId};
use serde::Serialize;

/// A reconstructed rectangle: four corner points in perimeter order and the
/// four contributing side groups (each a list of collinear primitives spliced
/// together during extension). Built once per closure and never mutated by
/// this crate afterward.
#[derive(Clone, Debug, Serialize)]
pub struct Rectangle {
    pub region: RegionId,
    /// Corners as `[x, y]` in perimeter order: the base chain's begin and end
    /// points followed by the two reconstructed line intersections.
    pub corners: [[f64; 2]; 4],
    /// Side groups in perimeter order: base chain, second side, closing
    /// fourth side, first side.
    pub sides: [Vec<PrimTag>; 4],
    pub filled: bool,
    pub color: u32,
}

impl Rectangle {
    /// Every primitive contributing to any side.
    pub fn side_tags(&self) -> impl Iterator<Item = PrimTag> + '_ {
        self.sides.iter().flatten().copied()
    }
}
