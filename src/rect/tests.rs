use super::extend::{extend_one, SideChain};
use super::{detect_rectangles, RectOptions};
use crate::index::PixelIndex;
use crate::raster::LabelImage;
use crate::shapes::{Claim, Pixel, PrimTag, RegionId, RegionSet};
use std::collections::HashSet;

fn px(row: i32, col: i32) -> Pixel {
    Pixel::new(row, col)
}

fn scene(chains: Vec<Vec<Pixel>>) -> (RegionSet, RegionId, Vec<PrimTag>, PixelIndex) {
    let (mut max_row, mut max_col) = (0, 0);
    for p in chains.iter().flatten() {
        max_row = max_row.max(p.row);
        max_col = max_col.max(p.col);
    }
    let mut raster = LabelImage::new(max_col as usize + 2, max_row as usize + 2, 0);
    for &p in chains.iter().flatten() {
        raster.set_label(p.row, p.col, 1);
    }
    let mut regions = RegionSet::collect(&raster, None);
    let id = regions.id_for_label(1).expect("scene has one region");
    let mut index = PixelIndex::default();
    let region = regions.get_mut(id);
    let mut tags = Vec::new();
    for chain in chains {
        let tag = region.insert_prim(chain);
        index.record_primitive(id, region.prim(tag).unwrap());
        tags.push(tag);
    }
    (regions, id, tags, index)
}

/// Four axis-aligned sides sharing their corner pixels.
fn perfect_rectangle() -> Vec<Vec<Pixel>> {
    let top: Vec<Pixel> = (5..=15).map(|c| px(5, c)).collect();
    let right: Vec<Pixel> = (5..=20).map(|r| px(r, 15)).collect();
    let bottom: Vec<Pixel> = (5..=15).rev().map(|c| px(20, c)).collect();
    let left: Vec<Pixel> = (5..=20).rev().map(|r| px(r, 5)).collect();
    vec![top, right, bottom, left]
}

#[test]
fn perfect_rectangle_closes_at_its_junction_points() {
    let (mut regions, id, tags, index) = scene(perfect_rectangle());
    let rects = detect_rectangles(&mut regions, &index, &RectOptions::default());
    assert_eq!(rects.len(), 1, "exactly one rectangle expected");
    let rect = rects[0].clone();
    assert_eq!(rect.region, id);
    assert_eq!(
        rect.corners,
        [[5.0, 5.0], [15.0, 5.0], [15.0, 20.0], [5.0, 20.0]],
        "corners must be the four junction points in perimeter order"
    );
    let contributing: HashSet<PrimTag> = rect.side_tags().collect();
    assert_eq!(contributing, tags.iter().copied().collect());
    let region = regions.get(id);
    for tag in tags {
        assert_eq!(
            region.prim(tag).unwrap().claim(),
            Claim::Rectangle,
            "every side must be claimed"
        );
    }
}

#[test]
fn second_run_over_claimed_primitives_finds_nothing() {
    let (mut regions, _id, _tags, index) = scene(perfect_rectangle());
    let options = RectOptions::default();
    let first = detect_rectangles(&mut regions, &index, &options);
    assert_eq!(first.len(), 1);
    let second = detect_rectangles(&mut regions, &index, &options);
    assert!(second.is_empty(), "a fully-claimed set must yield no new rectangles");
}

#[test]
fn gridline_claimed_sides_are_ignored() {
    let (mut regions, id, tags, index) = scene(perfect_rectangle());
    regions
        .get_mut(id)
        .prim_mut(tags[3])
        .unwrap()
        .set_claim(Claim::Gridline);
    let rects = detect_rectangles(&mut regions, &index, &RectOptions::default());
    assert!(rects.is_empty(), "a gridline side must not close a rectangle");
    let region = regions.get(id);
    assert_eq!(region.prim(tags[3]).unwrap().claim(), Claim::Gridline);
    for &tag in &tags[..3] {
        assert_eq!(
            region.prim(tag).unwrap().claim(),
            Claim::Unclaimed,
            "no primitive may be claimed by a failed search"
        );
    }
}

#[test]
fn extension_gap_budget_boundary() {
    // Chain span 4, candidate span 2: the gap budget is 4 + 2 + 2 = 8.
    let succeed = |gap_cols: i32| {
        let a: Vec<Pixel> = (0..=4).map(|c| px(0, c)).collect();
        let start = 4 + gap_cols;
        let b: Vec<Pixel> = (start..=start + 2).map(|c| px(0, c)).collect();
        let (mut regions, id, tags, _index) = scene(vec![a, b]);
        let region = regions.get_mut(id);
        let mut chain = SideChain::from_base(region.prim(tags[0]).unwrap());
        let mut visited = HashSet::from([tags[0]]);
        extend_one(region, &RectOptions::default(), &mut chain, &mut visited)
    };
    assert!(succeed(8), "a gap of combined-length-plus-2 must extend");
    assert!(!succeed(9), "a gap of combined-length-plus-3 must not extend");
}

#[test]
fn extension_rejects_laterally_offset_parallels() {
    let a: Vec<Pixel> = (0..=10).map(|c| px(0, c)).collect();
    let b: Vec<Pixel> = (0..=10).map(|c| px(8, c)).collect();
    let (mut regions, id, tags, _index) = scene(vec![a, b]);
    let region = regions.get_mut(id);
    let mut chain = SideChain::from_base(region.prim(tags[0]).unwrap());
    let mut visited = HashSet::from([tags[0]]);
    assert!(
        !extend_one(region, &RectOptions::default(), &mut chain, &mut visited),
        "a parallel chain on another row is not a collinear extension"
    );
}
