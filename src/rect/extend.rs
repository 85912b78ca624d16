//! Side chains and their collinear extension search.
//!
//! A side of a rectangle candidate is usually several primitives: the walk
//! fragments long straight borders, and dashed or interrupted sides leave
//! real gaps. A [`SideChain`] accumulates those pieces; extension searches
//! scan the region's primitive list directly, since the gaps they must
//! bridge are far wider than the index's neighborhood lookups.

use super::options::RectOptions;
use crate::geometry::{
    direction_dot, dist_sq, fit_line, pixel_dist_sq, point_line_dist_sq, Line, GEOM_EPS,
};
use crate::shapes::{Claim, Pixel, PrimTag, Primitive, Region};
use std::collections::HashSet;

/// One side of a rectangle candidate: the primitives spliced into it, their
/// pooled points, and the two working endpoints. `near` stays anchored where
/// the side attaches; `far` advances as extensions are absorbed.
#[derive(Clone, Debug)]
pub(super) struct SideChain {
    tags: Vec<PrimTag>,
    points: Vec<Pixel>,
    pub(super) near: Pixel,
    pub(super) far: Pixel,
}

impl SideChain {
    /// Seed from the primitive the search started with; its begin point is
    /// the anchor.
    pub(super) fn from_base(prim: &Primitive) -> Self {
        Self {
            tags: vec![prim.tag()],
            points: prim.points().to_vec(),
            near: prim.begin(),
            far: prim.end(),
        }
    }

    /// Seed a side attached at `attach`: the endpoint closer to it becomes
    /// the anchor.
    pub(super) fn from_prim(prim: &Primitive, attach: Pixel) -> Self {
        let (near, far) =
            if pixel_dist_sq(prim.begin(), attach) <= pixel_dist_sq(prim.end(), attach) {
                (prim.begin(), prim.end())
            } else {
                (prim.end(), prim.begin())
            };
        Self {
            tags: vec![prim.tag()],
            points: prim.points().to_vec(),
            near,
            far,
        }
    }

    pub(super) fn tags(&self) -> &[PrimTag] {
        &self.tags
    }

    pub(super) fn points(&self) -> &[Pixel] {
        &self.points
    }

    pub(super) fn contains(&self, tag: PrimTag) -> bool {
        self.tags.contains(&tag)
    }

    /// Anchor-to-head span in pixels.
    pub(super) fn length_px(&self) -> f64 {
        pixel_dist_sq(self.near, self.far).sqrt()
    }

    /// Fit over the pooled points of every absorbed primitive.
    pub(super) fn line(&self) -> Line {
        fit_line(&self.points)
    }

    fn absorb(&mut self, prim: &Primitive, new_far: Pixel) {
        self.tags.push(prim.tag());
        self.points.extend_from_slice(prim.points());
        self.far = new_far;
    }
}

fn claimed_structural(prim: &Primitive) -> bool {
    matches!(prim.claim(), Claim::Gridline | Claim::Tick)
}

/// Absorb one collinear primitive past the chain's head, or report failure.
///
/// A candidate must be parallel and within the gap budget: the head-to-
/// endpoint gap may not exceed the two spans plus the endpoint slack. The
/// anchor-to-new-head distance must also match chain span + gap + candidate
/// span within the slack, which rejects parallel chains that are laterally
/// offset or sit behind the anchor. The nearest admissible candidate wins.
pub(super) fn extend_one(
    region: &Region,
    options: &RectOptions,
    chain: &mut SideChain,
    visited: &mut HashSet<PrimTag>,
) -> bool {
    let line = chain.line();
    let mut best: Option<(PrimTag, Pixel, f64)> = None;
    for prim in region.prims() {
        if chain.contains(prim.tag()) || visited.contains(&prim.tag()) || claimed_structural(prim)
        {
            continue;
        }
        if direction_dot(&line, &prim.line()).abs() < options.parallel_min_dot {
            continue;
        }
        let d_begin = pixel_dist_sq(prim.begin(), chain.far).sqrt();
        let d_end = pixel_dist_sq(prim.end(), chain.far).sqrt();
        let gap = d_begin.min(d_end);
        if gap > chain.length_px() + prim.length_px() + options.endpoint_slack_px {
            continue;
        }
        let new_far = if d_begin <= d_end {
            prim.end()
        } else {
            prim.begin()
        };
        let span = pixel_dist_sq(chain.near, new_far).sqrt();
        let expected = chain.length_px() + gap + prim.length_px();
        if (span - expected).abs() > options.endpoint_slack_px {
            continue;
        }
        if best.map_or(true, |(_, _, g)| gap < g) {
            best = Some((prim.tag(), new_far, gap));
        }
    }
    if let Some((tag, new_far, _)) = best {
        visited.insert(tag);
        let prim = region.prim(tag).expect("candidate came from the arena");
        chain.absorb(prim, new_far);
        true
    } else {
        false
    }
}

/// Chase parallel, progressively-closer primitives until the chain's head is
/// within the endpoint slack of `target`, or no closer candidate remains.
pub(super) fn extend_toward(
    region: &Region,
    options: &RectOptions,
    chain: &mut SideChain,
    visited: &mut HashSet<PrimTag>,
    target: [f64; 2],
) -> bool {
    let tol_sq = options.collinear_tol_px * options.collinear_tol_px;
    for _ in 0..options.max_side_extensions {
        let head_dist = dist_sq(chain.far.xy(), target).sqrt();
        if head_dist <= options.endpoint_slack_px {
            return true;
        }
        let line = chain.line();
        let mut best: Option<(PrimTag, Pixel, f64)> = None;
        for prim in region.prims() {
            if chain.contains(prim.tag())
                || visited.contains(&prim.tag())
                || claimed_structural(prim)
            {
                continue;
            }
            if direction_dot(&line, &prim.line()).abs() < options.parallel_min_dot {
                continue;
            }
            let off = point_line_dist_sq(prim.begin(), &line)
                .max(point_line_dist_sq(prim.end(), &line));
            if off > tol_sq {
                continue;
            }
            let d_begin = dist_sq(prim.begin().xy(), target).sqrt();
            let d_end = dist_sq(prim.end().xy(), target).sqrt();
            let (d, new_far) = if d_begin <= d_end {
                (d_begin, prim.begin())
            } else {
                (d_end, prim.end())
            };
            if d + GEOM_EPS >= head_dist {
                continue; // not closer: the chase must converge
            }
            if best.map_or(true, |(_, _, b)| d < b) {
                best = Some((prim.tag(), new_far, d));
            }
        }
        match best {
            Some((tag, new_far, _)) => {
                visited.insert(tag);
                let prim = region.prim(tag).expect("candidate came from the arena");
                chain.absorb(prim, new_far);
            }
            None => return false,
        }
    }
    false
}
