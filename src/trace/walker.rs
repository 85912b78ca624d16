//! Clockwise chain-following over the border mask.
//!
//! The walker consumes a working copy of the border mask, clearing each pixel
//! as a chain absorbs it, so row-major restart scans never reprocess a walked
//! pixel. The first pixel of a walk stays set until the walk ends; seeing it
//! again as the chosen continuation is the closed-loop signal.

use super::compass;
use crate::index::PixelIndex;
use crate::raster::{BorderMask, LabelImage};
use crate::shapes::{Pixel, Region};

pub(super) struct ChainWalker<'a> {
    raster: &'a LabelImage,
    source: &'a BorderMask,
    working: BorderMask,
}

impl<'a> ChainWalker<'a> {
    pub(super) fn new(raster: &'a LabelImage, border: &'a BorderMask) -> Self {
        Self {
            raster,
            source: border,
            working: border.clone(),
        }
    }

    /// Walk every not-yet-consumed border pixel of the region, in row-major
    /// order. Returns the number of primitives created.
    pub(super) fn trace_region(&mut self, region: &mut Region, index: &mut PixelIndex) -> usize {
        let starts: Vec<Pixel> = region.pixels().to_vec();
        let mut created = 0;
        for start in starts {
            if self.working.is_set(start) {
                created += self.walk(region, index, start);
            }
        }
        created
    }

    fn walk(&mut self, region: &mut Region, index: &mut PixelIndex, start: Pixel) -> usize {
        let label = region.label();
        let mut created = 0;
        let mut chain = vec![start];
        self.record_neighbors(index, label, start);
        let mut prev: Option<u8> = None;
        let mut prev2: Option<u8> = None;
        let mut last_was_junction = false;
        // Bounded even if the closed-loop detection never fires.
        let max_steps = region.pixels().len() * 4 + 8;

        for _ in 0..max_steps {
            let current = *chain.last().expect("chain never empty");
            let candidates = self.admissible(label, current, prev);
            if candidates.is_empty() {
                break;
            }
            if candidates.len() > 1 && !last_was_junction && chain.len() > 2 {
                // Branch point: close here, restart at the branch pixel.
                let closed = chain[..chain.len() - 1].to_vec();
                created += emit(region, index, closed);
                chain = vec![current];
                last_was_junction = true;
                continue;
            }
            let next = candidates[0];
            if next == start {
                break; // the loop closed
            }
            last_was_junction = false;
            let code =
                compass::relative_location(current, next).expect("candidates are 8-adjacent");
            if let Some(p) = prev {
                let dev = compass::deviation(code, p);
                let dev2 = prev2.map(|q| compass::deviation(code, q)).unwrap_or(0);
                if compass::is_small(dev) {
                    if !compass::is_small(dev2) && chain.len() > 3 {
                        // Less-sudden break: the last two points seed the
                        // next chain.
                        let seed = chain.split_off(chain.len() - 2);
                        let closed = std::mem::replace(&mut chain, seed);
                        created += emit(region, index, closed);
                    }
                } else if chain.len() > 2 {
                    // Sudden break at the last point; a fold-back keeps the
                    // point before it as well.
                    let tail = chain.pop().expect("chain has >2 points");
                    let keep_prev = compass::is_fold_back(dev)
                        .then(|| *chain.last().expect("chain has >1 point"));
                    created += emit(region, index, std::mem::take(&mut chain));
                    if let Some(p) = keep_prev {
                        chain.push(p);
                    }
                    chain.push(tail);
                }
            }
            chain.push(next);
            self.working.clear(next);
            self.record_neighbors(index, label, next);
            prev2 = prev;
            prev = Some(code);
        }

        self.working.clear(start);
        created + emit(region, index, chain)
    }

    /// Same-region border pixels adjacent to `current` that are still
    /// unconsumed, in clockwise scan order starting three codes
    /// counter-clockwise of the previous step direction.
    fn admissible(&self, label: i32, current: Pixel, prev: Option<u8>) -> Vec<Pixel> {
        let begin = compass::scan_start(prev.unwrap_or(0));
        let mut out = Vec::new();
        for i in 0..8u8 {
            let (dr, dc) = compass::STEPS[((begin + i) % 8) as usize];
            let p = Pixel::new(current.row + dr, current.col + dc);
            if self.working.is_set(p) && self.raster.label_at(p) == label {
                out.push(p);
            }
        }
        out
    }

    /// Neighbor lists come from the pristine source mask, not the working
    /// copy, so they stay complete after pixels are consumed.
    fn record_neighbors(&self, index: &mut PixelIndex, label: i32, p: Pixel) {
        let neighbors: Vec<Pixel> = p
            .neighbors8()
            .into_iter()
            .filter(|&q| self.source.is_set(q) && self.raster.label_at(q) == label)
            .collect();
        index.record_neighbors(p, neighbors);
    }
}

fn emit(region: &mut Region, index: &mut PixelIndex, points: Vec<Pixel>) -> usize {
    if points.is_empty() {
        return 0;
    }
    let tag = region.insert_prim(points);
    let prim = region.prim(tag).expect("just inserted");
    index.record_primitive(region.id(), prim);
    1
}
