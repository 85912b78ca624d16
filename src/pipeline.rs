//! End-to-end driver: vectorize borders, repair chains, reconstruct
//! rectangles.

use crate::index::PixelIndex;
use crate::raster::{BorderMask, LabelImage};
use crate::rect::{detect_rectangles, RectOptions};
use crate::shapes::{Rectangle, RegionSet};
use crate::trace::{trace_regions, TraceOptions, TraceStats};
use serde::{Deserialize, Serialize};
use std::time::Instant;

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineParams {
    pub trace: TraceOptions,
    pub rect: RectOptions,
}

/// One configured pipeline instance. Stateless between calls; every
/// [`process`](ChartVectorizer::process) run starts from a fresh index.
pub struct ChartVectorizer {
    params: PipelineParams,
}

/// Everything one run produces. The index is kept for downstream detectors
/// (gridlines, ticks) that reuse the same adjacency queries; it is skipped
/// in serialized output.
#[derive(Debug, Serialize)]
pub struct VectorReport {
    pub rectangles: Vec<Rectangle>,
    pub trace: TraceStats,
    #[serde(skip)]
    pub index: PixelIndex,
    pub latency_ms: f64,
}

impl ChartVectorizer {
    pub fn new(params: PipelineParams) -> Self {
        Self { params }
    }

    /// Run the full pipeline over one labeled raster. `regions` stays the
    /// sole owner of every primitive; the report refers back by handle.
    pub fn process(
        &self,
        raster: &LabelImage,
        border: &BorderMask,
        regions: &mut RegionSet,
    ) -> VectorReport {
        let t0 = Instant::now();
        let mut index = PixelIndex::default();
        let trace = trace_regions(raster, border, regions, &mut index, &self.params.trace);
        log::debug!(
            "traced {} primitives across {} regions ({} staple, {} straight merges)",
            trace.primitives,
            trace.regions_traced,
            trace.staple_merges,
            trace.straight_merges
        );
        let rectangles = detect_rectangles(regions, &index, &self.params.rect);
        log::debug!("reconstructed {} rectangles", rectangles.len());
        let latency_ms = t0.elapsed().as_secs_f64() * 1000.0;
        VectorReport {
            rectangles,
            trace,
            index,
            latency_ms,
        }
    }
}
