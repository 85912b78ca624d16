//! Pixel-primitive index: the dual spatial map from a pixel to the index
//! entries referencing it and to its recorded same-region border neighbors.
//!
//! The border vectorizer populates the index while walking; the merge passes
//! rewrite tags and role markers through it; the rectangle reconstructor (and
//! the downstream gridline/tick detectors) only query it. Entries carry
//! `(region, tag)` handles, never references: the region set stays the sole
//! owner of every primitive.
//!
//! Rasterized borders are not always pixel-exact-adjacent, so lookups come in
//! three radii: the pixel alone, the 3x3 block, and the 5x5 block (the
//! 24-neighborhood) for searches that must tolerate a 1-pixel gap.

use crate::shapes::{Pixel, PrimTag, Primitive, RegionId};
use serde::Serialize;
use std::collections::HashMap;

/// Role of a pixel within one primitive's chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Role {
    Start,
    End,
    Interior,
}

/// One index record: which primitive references this pixel, and how.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PixelEntry {
    pub region: RegionId,
    pub tag: PrimTag,
    pub role: Role,
    pub pixel: Pixel,
}

#[derive(Clone, Debug, Default)]
pub struct PixelIndex {
    entries: HashMap<Pixel, Vec<PixelEntry>>,
    neighbors: HashMap<Pixel, Vec<Pixel>>,
}

impl PixelIndex {
    /// Idempotent insert: an identical `(region, tag, role)` record for the
    /// same pixel is stored once.
    pub fn record(&mut self, pixel: Pixel, region: RegionId, tag: PrimTag, role: Role) {
        let list = self.entries.entry(pixel).or_default();
        if !list
            .iter()
            .any(|e| e.region == region && e.tag == tag && e.role == role)
        {
            list.push(PixelEntry {
                region,
                tag,
                role,
                pixel,
            });
        }
    }

    /// Insert-once: an already-recorded neighbor list is never overwritten.
    pub fn record_neighbors(&mut self, pixel: Pixel, neighbors: Vec<Pixel>) {
        self.neighbors.entry(pixel).or_insert(neighbors);
    }

    /// Record every pixel of a chain: first as start, last as end, the rest
    /// interior. A single-pixel chain carries both endpoint roles.
    pub fn record_primitive(&mut self, region: RegionId, prim: &Primitive) {
        let points = prim.points();
        let last = points.len() - 1;
        for (i, &p) in points.iter().enumerate() {
            if i == 0 {
                self.record(p, region, prim.tag(), Role::Start);
            }
            if i == last {
                self.record(p, region, prim.tag(), Role::End);
            }
            if i != 0 && i != last {
                self.record(p, region, prim.tag(), Role::Interior);
            }
        }
    }

    /// Entries at the pixel itself. A pixel with no entries is guaranteed not
    /// to lie on any recorded chain.
    pub fn entries_at(&self, pixel: Pixel) -> &[PixelEntry] {
        self.entries.get(&pixel).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Entries at the pixel and its eight immediate neighbors.
    pub fn entries_with_neighbors(&self, pixel: Pixel) -> Vec<PixelEntry> {
        self.block_entries(pixel, 1)
    }

    /// Entries in the 24-neighborhood (the 5x5 block), tolerant of a 1-pixel
    /// rasterization gap.
    pub fn entries_with_neighbors24(&self, pixel: Pixel) -> Vec<PixelEntry> {
        self.block_entries(pixel, 2)
    }

    fn block_entries(&self, pixel: Pixel, radius: i32) -> Vec<PixelEntry> {
        let mut out = Vec::new();
        for dr in -radius..=radius {
            for dc in -radius..=radius {
                out.extend_from_slice(self.entries_at(Pixel::new(pixel.row + dr, pixel.col + dc)));
            }
        }
        out
    }

    /// Collapse duplicate `(region, tag)` pairs to one entry, preferring a
    /// non-interior role when both exist. Result order is unspecified.
    pub fn reduce(entries: &[PixelEntry]) -> Vec<PixelEntry> {
        let mut best: HashMap<(RegionId, PrimTag), PixelEntry> = HashMap::new();
        for &e in entries {
            best.entry((e.region, e.tag))
                .and_modify(|kept| {
                    if kept.role == Role::Interior && e.role != Role::Interior {
                        *kept = e;
                    }
                })
                .or_insert(e);
        }
        best.into_values().collect()
    }

    /// Recorded same-region border neighbors of a pixel.
    pub fn neighbors_of(&self, pixel: Pixel) -> &[Pixel] {
        self.neighbors.get(&pixel).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate all recorded neighbor lists (symmetry checks, diagnostics).
    pub fn recorded_neighbors(&self) -> impl Iterator<Item = (Pixel, &[Pixel])> {
        self.neighbors.iter().map(|(&p, v)| (p, v.as_slice()))
    }

    /// Rewrite every `(region, old)` entry to `new`. With a scope, only the
    /// scope pixels and their one-hop neighbor expansion are visited, since a
    /// merge can leave entries one pixel away from the spliced chain.
    pub fn retag(&mut self, region: RegionId, old: PrimTag, new: PrimTag, scope: Option<&[Pixel]>) {
        let pixels = self.rewrite_targets(scope);
        for p in pixels {
            if let Some(list) = self.entries.get_mut(&p) {
                for e in list.iter_mut() {
                    if e.region == region && e.tag == old {
                        e.tag = new;
                    }
                }
                dedupe(list);
            }
        }
    }

    /// Rewrite role markers for `(region, tag)` entries, e.g. when a former
    /// endpoint becomes interior after a splice.
    pub fn reposition(
        &mut self,
        region: RegionId,
        tag: PrimTag,
        old_role: Role,
        new_role: Role,
        scope: Option<&[Pixel]>,
    ) {
        let pixels = self.rewrite_targets(scope);
        for p in pixels {
            if let Some(list) = self.entries.get_mut(&p) {
                for e in list.iter_mut() {
                    if e.region == region && e.tag == tag && e.role == old_role {
                        e.role = new_role;
                    }
                }
                dedupe(list);
            }
        }
    }

    fn rewrite_targets(&self, scope: Option<&[Pixel]>) -> Vec<Pixel> {
        match scope {
            Some(pixels) => {
                let mut out = Vec::with_capacity(pixels.len() * 9);
                for &p in pixels {
                    out.push(p);
                    out.extend(p.neighbors8());
                }
                out.sort_unstable();
                out.dedup();
                out
            }
            None => self.entries.keys().copied().collect(),
        }
    }

    /// Indices of `prim`'s point sequence that carry an entry tagged `other`,
    /// either at the point itself or one hop away.
    pub fn adjacency(&self, prim: &Primitive, region: RegionId, other: PrimTag) -> Vec<usize> {
        let mut out = Vec::new();
        for (i, &p) in prim.points().iter().enumerate() {
            let near = self.entries_with_neighbors(p);
            if near.iter().any(|e| e.region == region && e.tag == other) {
                out.push(i);
            }
        }
        out
    }

    /// Cheap touch test over the four endpoint pixels only.
    pub fn touch_at_endpoints(&self, region: RegionId, a: &Primitive, b: &Primitive) -> bool {
        let hits = |p: Pixel, tag: PrimTag| {
            self.entries_with_neighbors(p)
                .iter()
                .any(|e| e.region == region && e.tag == tag)
        };
        hits(a.begin(), b.tag())
            || hits(a.end(), b.tag())
            || hits(b.begin(), a.tag())
            || hits(b.end(), a.tag())
    }

    /// Whether any entry for `(region, tag)` survives in the scope. Used by
    /// debug assertions guarding merge atomicity.
    pub fn has_entries(&self, region: RegionId, tag: PrimTag, scope: &[Pixel]) -> bool {
        scope
            .iter()
            .any(|&p| self.entries_at(p).iter().any(|e| e.region == region && e.tag == tag))
    }
}

fn dedupe(list: &mut Vec<PixelEntry>) {
    let mut seen: Vec<PixelEntry> = Vec::with_capacity(list.len());
    list.retain(|e| {
        if seen.contains(e) {
            false
        } else {
            seen.push(*e);
            true
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn px(row: i32, col: i32) -> Pixel {
        Pixel::new(row, col)
    }

    const R: RegionId = RegionId(0);

    #[test]
    fn record_is_idempotent() {
        let mut index = PixelIndex::default();
        index.record(px(1, 1), R, PrimTag(0), Role::Start);
        index.record(px(1, 1), R, PrimTag(0), Role::Start);
        assert_eq!(index.entries_at(px(1, 1)).len(), 1);
        // A different role for the same tag is a new record.
        index.record(px(1, 1), R, PrimTag(0), Role::End);
        assert_eq!(index.entries_at(px(1, 1)).len(), 2);
    }

    #[test]
    fn neighbor_lists_insert_once() {
        let mut index = PixelIndex::default();
        index.record_neighbors(px(1, 1), vec![px(1, 2)]);
        index.record_neighbors(px(1, 1), vec![px(9, 9)]);
        assert_eq!(index.neighbors_of(px(1, 1)), &[px(1, 2)]);
    }

    #[test]
    fn record_primitive_assigns_roles() {
        let mut index = PixelIndex::default();
        let prim = Primitive::new(PrimTag(3), vec![px(0, 0), px(0, 1), px(0, 2)]);
        index.record_primitive(R, &prim);
        assert_eq!(index.entries_at(px(0, 0))[0].role, Role::Start);
        assert_eq!(index.entries_at(px(0, 1))[0].role, Role::Interior);
        assert_eq!(index.entries_at(px(0, 2))[0].role, Role::End);
    }

    #[test]
    fn single_pixel_primitive_carries_both_endpoint_roles() {
        let mut index = PixelIndex::default();
        let prim = Primitive::new(PrimTag(0), vec![px(4, 4)]);
        index.record_primitive(R, &prim);
        let roles: Vec<Role> = index.entries_at(px(4, 4)).iter().map(|e| e.role).collect();
        assert!(roles.contains(&Role::Start) && roles.contains(&Role::End));
    }

    #[test]
    fn reduce_prefers_non_interior_roles() {
        let entries = vec![
            PixelEntry {
                region: R,
                tag: PrimTag(0),
                role: Role::Interior,
                pixel: px(0, 0),
            },
            PixelEntry {
                region: R,
                tag: PrimTag(0),
                role: Role::End,
                pixel: px(0, 1),
            },
            PixelEntry {
                region: R,
                tag: PrimTag(1),
                role: Role::Interior,
                pixel: px(0, 2),
            },
        ];
        let reduced = PixelIndex::reduce(&entries);
        assert_eq!(reduced.len(), 2);
        let kept = reduced.iter().find(|e| e.tag == PrimTag(0)).unwrap();
        assert_eq!(kept.role, Role::End);
    }

    #[test]
    fn retag_within_scope_reaches_one_hop_out() {
        let mut index = PixelIndex::default();
        index.record(px(5, 5), R, PrimTag(1), Role::Start);
        index.record(px(5, 6), R, PrimTag(1), Role::End);
        // Scope names only (5,5); (5,6) is covered by the neighbor expansion.
        index.retag(R, PrimTag(1), PrimTag(2), Some(&[px(5, 5)]));
        assert!(index.entries_at(px(5, 5)).iter().all(|e| e.tag == PrimTag(2)));
        assert!(index.entries_at(px(5, 6)).iter().all(|e| e.tag == PrimTag(2)));
    }

    #[test]
    fn retag_collapses_colliding_records() {
        let mut index = PixelIndex::default();
        index.record(px(2, 2), R, PrimTag(0), Role::Interior);
        index.record(px(2, 2), R, PrimTag(1), Role::Interior);
        index.retag(R, PrimTag(1), PrimTag(0), Some(&[px(2, 2)]));
        assert_eq!(index.entries_at(px(2, 2)).len(), 1);
    }

    #[test]
    fn reposition_rewrites_matching_roles_only() {
        let mut index = PixelIndex::default();
        index.record(px(3, 3), R, PrimTag(0), Role::End);
        index.record(px(3, 3), R, PrimTag(1), Role::End);
        index.reposition(R, PrimTag(0), Role::End, Role::Interior, Some(&[px(3, 3)]));
        let entries = index.entries_at(px(3, 3));
        assert!(entries
            .iter()
            .any(|e| e.tag == PrimTag(0) && e.role == Role::Interior));
        assert!(entries.iter().any(|e| e.tag == PrimTag(1) && e.role == Role::End));
    }

    #[test]
    fn adjacency_tolerates_one_hop() {
        let mut index = PixelIndex::default();
        let a = Primitive::new(PrimTag(0), vec![px(0, 0), px(0, 1), px(0, 2)]);
        let b = Primitive::new(PrimTag(1), vec![px(1, 3), px(1, 4)]);
        index.record_primitive(R, &a);
        index.record_primitive(R, &b);
        // (0,2) is diagonal to (1,3): one hop.
        assert_eq!(index.adjacency(&a, R, PrimTag(1)), vec![2]);
        assert!(index.touch_at_endpoints(R, &a, &b));
    }

    #[test]
    fn unrecorded_pixels_yield_no_entries() {
        let index = PixelIndex::default();
        assert!(index.entries_at(px(9, 9)).is_empty());
        assert!(index.entries_with_neighbors24(px(9, 9)).is_empty());
    }
}
