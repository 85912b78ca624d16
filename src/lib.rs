#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod config;
pub mod pipeline;
pub mod raster;
pub mod shapes;

// “Expert” modules – still public, but considered unstable internals.
pub mod geometry;
pub mod index;
pub mod rect;
pub mod trace;

// --- High-level re-exports -------------------------------------------------

// Main entry points: pipeline driver + results.
pub use crate::pipeline::{ChartVectorizer, PipelineParams, VectorReport};
pub use crate::shapes::{Pixel, Primitive, Rectangle, Region, RegionSet};

// Stage options, for callers tuning a single pass.
pub use crate::rect::RectOptions;
pub use crate::trace::TraceOptions;

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use chart_vectorizer::prelude::*;
///
/// # fn main() {
/// let raster = LabelImage::new(64, 48, 0);
/// let border = BorderMask::of_regions(&raster);
/// let mut regions = RegionSet::collect(&raster, None);
///
/// let vectorizer = ChartVectorizer::new(PipelineParams::default());
/// let report = vectorizer.process(&raster, &border, &mut regions);
/// println!(
///     "rectangles={} latency_ms={:.3}",
///     report.rectangles.len(),
///     report.latency_ms
/// );
/// # }
/// ```
pub mod prelude {
    pub use crate::raster::{BorderMask, LabelImage};
    pub use crate::{ChartVectorizer, PipelineParams, Rectangle, RegionSet, VectorReport};
}
