//! Perpendicularity search: grow a base chain into a closed four-sided loop.
//!
//! The search is a bounded worklist, not recursion: every extension round
//! records the absorbed primitive in a visited set, so revisiting a candidate
//! is impossible and termination does not depend on the geometry converging.
//! Per retry round only one of the two candidate sides is extended, and the
//! extended side alternates across rounds; this asymmetry reproduces the
//! discovery order downstream consumers were tuned against.

use super::extend::{extend_one, extend_toward, SideChain};
use super::options::RectOptions;
use crate::geometry::{direction_dot, line_intersection, pixel_dist_sq, same_side};
use crate::index::PixelIndex;
use crate::shapes::{Claim, Pixel, PrimTag, Primitive, Rectangle, Region, RegionSet};
use std::collections::HashSet;

/// Try to close a rectangle from every unclaimed primitive of every region.
/// Contributing primitives are claimed as rectangle parts, so a second run
/// over the same set finds nothing new.
pub fn detect_rectangles(
    regions: &mut RegionSet,
    index: &PixelIndex,
    options: &RectOptions,
) -> Vec<Rectangle> {
    let mut out = Vec::new();
    for id in regions.ids() {
        for tag in regions.get(id).tags() {
            let found = {
                let region = regions.get(id);
                match region.prim(tag) {
                    Some(prim) if prim.is_unclaimed() => {
                        start_rectangle(region, index, options, prim)
                    }
                    _ => None,
                }
            };
            if let Some(rect) = found {
                let region = regions.get_mut(id);
                for t in rect.side_tags() {
                    if let Some(prim) = region.prim_mut(t) {
                        prim.set_claim(Claim::Rectangle);
                    }
                }
                log::debug!(
                    "region {}: rectangle closed with corners {:?}",
                    region.label(),
                    rect.corners
                );
                out.push(rect);
            }
        }
    }
    out
}

fn claimed_structural(prim: &Primitive) -> bool {
    matches!(prim.claim(), Claim::Gridline | Claim::Tick)
}

/// Endpoint of `prim` farther from `from`.
fn far_endpoint(prim: &Primitive, from: Pixel) -> Pixel {
    if pixel_dist_sq(prim.begin(), from) >= pixel_dist_sq(prim.end(), from) {
        prim.begin()
    } else {
        prim.end()
    }
}

/// Grow `prim` into a base chain and search for two perpendicular sides that
/// close into a rectangle.
fn start_rectangle(
    region: &Region,
    index: &PixelIndex,
    options: &RectOptions,
    prim: &Primitive,
) -> Option<Rectangle> {
    let mut base = SideChain::from_base(prim);
    let mut visited: HashSet<PrimTag> = HashSet::from([prim.tag()]);

    for _ in 0..=options.max_side_extensions {
        let base_line = base.line();
        let at_near = find_perpendicular(region, index, options, &base, base.near);
        let at_far = find_perpendicular(region, index, options, &base, base.far);

        for &t1 in &at_near {
            for &t2 in &at_far {
                if t1 == t2 {
                    continue;
                }
                let p1 = region.prim(t1)?;
                let p2 = region.prim(t2)?;
                // Both sides must leave the base toward the same half-plane.
                if !same_side(
                    &base_line,
                    &base_line,
                    far_endpoint(p1, base.near),
                    far_endpoint(p2, base.far),
                ) {
                    continue;
                }
                let side1 = SideChain::from_prim(p1, base.near);
                let side2 = SideChain::from_prim(p2, base.far);
                if let Some(rect) = make_rectangle(region, index, options, &base, side1, side2) {
                    return Some(rect);
                }
            }
        }

        // No pair closed. Retry with a longer base only if the endpoint
        // search found anything perpendicular at all.
        if at_near.is_empty() && at_far.is_empty() {
            return None;
        }
        if !extend_one(region, options, &mut base, &mut visited) {
            return None;
        }
    }
    None
}

/// Same-region primitives perpendicular to the chain near `endpoint`, found
/// through the 24-neighborhood to tolerate rasterization gaps at corners.
fn find_perpendicular(
    region: &Region,
    index: &PixelIndex,
    options: &RectOptions,
    chain: &SideChain,
    endpoint: Pixel,
) -> Vec<PrimTag> {
    let line = chain.line();
    let mut out = Vec::new();
    for entry in PixelIndex::reduce(&index.entries_with_neighbors24(endpoint)) {
        if entry.region != region.id() || chain.contains(entry.tag) || out.contains(&entry.tag) {
            continue;
        }
        let Some(prim) = region.prim(entry.tag) else {
            continue;
        };
        if claimed_structural(prim) {
            continue;
        }
        if direction_dot(&line, &prim.line()).abs() <= options.perp_max_dot {
            out.push(entry.tag);
        }
    }
    out
}

/// Close the loop: find a fourth primitive perpendicular to `side1`, on the
/// same half-plane as `side2`, and connect it to `side2` either by direct
/// touch or by extending both toward their theoretical intersection.
fn make_rectangle(
    region: &Region,
    index: &PixelIndex,
    options: &RectOptions,
    base: &SideChain,
    mut side1: SideChain,
    mut side2: SideChain,
) -> Option<Rectangle> {
    let mut visited1: HashSet<PrimTag> = side1.tags().iter().copied().collect();
    let mut visited2: HashSet<PrimTag> = side2.tags().iter().copied().collect();

    for round in 0..options.max_side_extensions {
        if let Some(mut fourth) = find_fourth(region, index, options, base, &side1, &side2) {
            if touches(index, region, &fourth, &side2) {
                return build_rectangle(region, base, &side1, &side2, &fourth);
            }
            // The fourth side touches only side1: chase both it and side2
            // toward the corner their lines predict.
            if let Some(target) = line_intersection(&fourth.line(), &side2.line()) {
                let mut visited4: HashSet<PrimTag> = fourth.tags().iter().copied().collect();
                if extend_toward(region, options, &mut fourth, &mut visited4, target)
                    && extend_toward(region, options, &mut side2, &mut visited2, target)
                {
                    return build_rectangle(region, base, &side1, &side2, &fourth);
                }
            }
        }
        // One side per round, alternating.
        let extended = if round % 2 == 0 {
            extend_one(region, options, &mut side1, &mut visited1)
        } else {
            extend_one(region, options, &mut side2, &mut visited2)
        };
        if !extended {
            return None;
        }
    }
    None
}

/// Scan `side1`'s points for a primitive perpendicular to it, unclaimed by
/// gridline/tick, and on `side2`'s side of `side1`.
fn find_fourth(
    region: &Region,
    index: &PixelIndex,
    options: &RectOptions,
    base: &SideChain,
    side1: &SideChain,
    side2: &SideChain,
) -> Option<SideChain> {
    let line1 = side1.line();
    let side2_ref = side2.far;
    for &p in side1.points() {
        for entry in PixelIndex::reduce(&index.entries_with_neighbors(p)) {
            if entry.region != region.id()
                || base.contains(entry.tag)
                || side1.contains(entry.tag)
                || side2.contains(entry.tag)
            {
                continue;
            }
            let Some(prim) = region.prim(entry.tag) else {
                continue;
            };
            if claimed_structural(prim) {
                continue;
            }
            if direction_dot(&line1, &prim.line()).abs() > options.perp_max_dot {
                continue;
            }
            if !same_side(&line1, &line1, side2_ref, far_endpoint(prim, p)) {
                continue;
            }
            return Some(SideChain::from_prim(prim, p));
        }
    }
    None
}

/// Whether any pixel of `a` carries an index entry of one of `b`'s
/// primitives, directly or one hop away.
fn touches(index: &PixelIndex, region: &Region, a: &SideChain, b: &SideChain) -> bool {
    a.points().iter().any(|&p| {
        index
            .entries_with_neighbors(p)
            .iter()
            .any(|e| e.region == region.id() && b.contains(e.tag))
    })
}

/// Corners in perimeter order: the base chain's endpoints, then the two
/// reconstructed intersections closing the loop.
fn build_rectangle(
    region: &Region,
    base: &SideChain,
    side1: &SideChain,
    side2: &SideChain,
    fourth: &SideChain,
) -> Option<Rectangle> {
    let corner3 = line_intersection(&side2.line(), &fourth.line())?;
    let corner4 = line_intersection(&fourth.line(), &side1.line())?;
    Some(Rectangle {
        region: region.id(),
        corners: [base.near.xy(), base.far.xy(), corner3, corner4],
        sides: [
            base.tags().to_vec(),
            side2.tags().to_vec(),
            fourth.tags().to_vec(),
            side1.tags().to_vec(),
        ],
        filled: region.flags.filled_area,
        color: region.color,
    })
}
