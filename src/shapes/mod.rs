//! Core shape model: pixels, primitives (ordered border chains), regions
//! owning primitive arenas, and reconstructed rectangles.

mod pixel;
mod primitive;
mod rectangle;
mod region;

pub use pixel::Pixel;
pub use primitive::{Claim, PrimTag, Primitive};
pub use rectangle::Rectangle;
pub use region::{BoundingBox, Region, RegionFlags, RegionId, RegionSet};
