//! Chain-repair merges over the populated index.
//!
//! Walks fragment chains at curve/line transitions and at noise pixels; the
//! staple pass and the straight pass reunite them. Both passes recurse: after
//! a splice the surviving chain's new endpoint is examined again.

use super::options::TraceOptions;
use crate::geometry::{pixel_dist_sq, point_line_dist_sq};
use crate::index::{PixelIndex, Role};
use crate::shapes::{Pixel, PrimTag, Region};

/// Splice `candidate` into `survivor` at the survivor's begin or end point.
///
/// Every index rewrite happens before the candidate slot is freed, so a freed
/// tag never leaves entries behind; the survivor's point swap comes last and
/// drops its cached line fit.
pub(super) fn merge_prims(
    region: &mut Region,
    index: &mut PixelIndex,
    survivor: PrimTag,
    candidate: PrimTag,
    at_survivor_begin: bool,
) {
    let id = region.id();
    let (surv_points, join_pixel, surv_single) = {
        let prim = region.prim(survivor).expect("survivor exists");
        let join = if at_survivor_begin {
            prim.begin()
        } else {
            prim.end()
        };
        (prim.points().to_vec(), join, prim.point_count() == 1)
    };

    let cand = region.prim(candidate).expect("candidate exists");
    let cand_single = cand.point_count() == 1;
    // Order the candidate join-end first, nearest the survivor's endpoint.
    let reversed = pixel_dist_sq(cand.end(), join_pixel) < pixel_dist_sq(cand.begin(), join_pixel);
    let mut cand_points = cand.points().to_vec();
    if reversed {
        cand_points.reverse();
    }
    let join_role = if reversed { Role::End } else { Role::Start };
    let far_role = if reversed { Role::Start } else { Role::End };
    let new_far_role = if at_survivor_begin {
        Role::Start
    } else {
        Role::End
    };

    let combined: Vec<Pixel> = if at_survivor_begin {
        let mut v: Vec<Pixel> = cand_points.iter().rev().copied().collect();
        v.extend(surv_points);
        v
    } else {
        let mut v = surv_points;
        v.extend(cand_points.iter().copied());
        v
    };

    // The survivor's joined endpoint becomes interior; a single-pixel
    // survivor instead keeps one endpoint role for the combined chain.
    let surv_scope = [join_pixel];
    let surv_role = if at_survivor_begin {
        Role::Start
    } else {
        Role::End
    };
    if surv_single {
        let keep = if at_survivor_begin {
            Role::End
        } else {
            Role::Start
        };
        index.reposition(id, survivor, surv_role, keep, Some(&surv_scope));
    } else {
        index.reposition(id, survivor, surv_role, Role::Interior, Some(&surv_scope));
    }

    if cand_single {
        index.reposition(id, candidate, Role::Start, new_far_role, Some(&cand_points));
        index.reposition(id, candidate, Role::End, new_far_role, Some(&cand_points));
    } else {
        index.reposition(id, candidate, join_role, Role::Interior, Some(&cand_points));
        if far_role != new_far_role {
            index.reposition(id, candidate, far_role, new_far_role, Some(&cand_points));
        }
    }
    index.retag(id, candidate, survivor, Some(&cand_points));
    region.remove_prim(candidate);
    debug_assert!(
        !index.has_entries(id, candidate, &cand_points),
        "merge left index entries on a freed tag"
    );
    region
        .prim_mut(survivor)
        .expect("survivor exists")
        .set_points(combined);
}

/// Unconditional staple merge: a purely horizontal or single-pixel chain
/// absorbs the unique neighbor touching diagonally below-left of its begin
/// point, provided that neighbor is horizontal too or a large curve. Repairs
/// curve+trailing-straight fragmentation on rounded borders.
pub(super) fn staple_pass(
    region: &mut Region,
    index: &mut PixelIndex,
    options: &TraceOptions,
) -> usize {
    let mut merges = 0;
    for tag in region.tags() {
        while let Some(candidate) = staple_candidate(region, index, tag, options) {
            merge_prims(region, index, tag, candidate, true);
            merges += 1;
        }
    }
    merges
}

fn staple_candidate(
    region: &Region,
    index: &PixelIndex,
    tag: PrimTag,
    options: &TraceOptions,
) -> Option<PrimTag> {
    let prim = region.prim(tag)?;
    if !(prim.is_horizontal() || prim.point_count() == 1) {
        return None;
    }
    let begin = prim.begin();
    let touching = PixelIndex::reduce(&index.entries_with_neighbors(begin));
    let mut others = touching
        .iter()
        .filter(|e| e.region == region.id() && e.tag != tag);
    let other = others.next()?.tag;
    if others.next().is_some() {
        return None;
    }
    // The unique neighbor must actually sit diagonally below-left.
    let diag = Pixel::new(begin.row + 1, begin.col - 1);
    if !index
        .entries_at(diag)
        .iter()
        .any(|e| e.region == region.id() && e.tag == other)
    {
        return None;
    }
    let cand = region.prim(other)?;
    let large_curve =
        !cand.is_axis_aligned() && cand.point_count() >= options.staple_curve_min_points;
    (cand.is_horizontal() || large_curve).then_some(other)
}

/// Threshold merge: at either endpoint, absorb a touching chain at least
/// `straight_size_factor` times larger and not axis-aligned, but only when
/// every candidate point stays within tolerance of the survivor's fitted
/// line.
pub(super) fn straight_pass(
    region: &mut Region,
    index: &mut PixelIndex,
    options: &TraceOptions,
) -> usize {
    let mut merges = 0;
    for tag in region.tags() {
        while let Some((candidate, at_begin)) = straight_candidate(region, index, tag, options) {
            merge_prims(region, index, tag, candidate, at_begin);
            merges += 1;
        }
    }
    merges
}

fn straight_candidate(
    region: &Region,
    index: &PixelIndex,
    tag: PrimTag,
    options: &TraceOptions,
) -> Option<(PrimTag, bool)> {
    let prim = region.prim(tag)?;
    let line = prim.line();
    let min_points = (options.straight_size_factor * prim.point_count() as f64).ceil() as usize;
    let tol_sq = options.straight_tol_px * options.straight_tol_px;
    for (endpoint, at_begin) in [(prim.begin(), true), (prim.end(), false)] {
        for entry in PixelIndex::reduce(&index.entries_with_neighbors(endpoint)) {
            if entry.region != region.id() || entry.tag == tag {
                continue;
            }
            let Some(cand) = region.prim(entry.tag) else {
                continue;
            };
            if cand.point_count() < min_points || cand.is_axis_aligned() {
                continue;
            }
            if cand
                .points()
                .iter()
                .all(|&p| point_line_dist_sq(p, &line) <= tol_sq)
            {
                return Some((entry.tag, at_begin));
            }
        }
    }
    None
}
