//! Border vectorization: clockwise chain-following over the border mask,
//! followed by the two chain-repair merge passes.

mod compass;
mod merge;
mod options;
mod walker;


pub use options::TraceOptions;

use crate::index::PixelIndex;
use crate::raster::{BorderMask, LabelImage};
use crate::shapes::RegionSet;
use serde::Serialize;
use walker::ChainWalker;

/// Counters reported by one vectorization run.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct TraceStats {
    pub regions_traced: usize,
    pub regions_skipped: usize,
    pub primitives: usize,
    pub staple_merges: usize,
    pub straight_merges: usize,
}

/// Vectorize the borders of every region, populating `index` and each
/// region's primitive arena. Regions flagged as characters are skipped.
pub fn trace_regions(
    raster: &LabelImage,
    border: &BorderMask,
    regions: &mut RegionSet,
    index: &mut PixelIndex,
    options: &TraceOptions,
) -> TraceStats {
    let mut stats = TraceStats::default();
    let mut walker = ChainWalker::new(raster, border);
    for id in regions.ids() {
        let region = regions.get_mut(id);
        if region.flags.character {
            stats.regions_skipped += 1;
            continue;
        }
        stats.primitives += walker.trace_region(region, index);
        if options.staple_pass {
            stats.staple_merges += merge::staple_pass(region, index, options);
        }
        if options.straight_pass {
            stats.straight_merges += merge::straight_pass(region, index, options);
        }
        stats.regions_traced += 1;
        log::debug!(
            "region {}: {} primitives after merges",
            region.label(),
            region.prim_count()
        );
    }
    stats
}
