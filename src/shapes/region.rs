use crate::raster::LabelImage;
use crate::shapes::{Pixel, PrimTag, Primitive};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Handle of a region inside a [`RegionSet`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(pub u32);

/// Classification flags supplied by the upstream classifier stages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionFlags {
    pub filled_area: bool,
    pub thick_line: bool,
    pub frame: bool,
    pub character: bool,
    pub dashed_line: bool,
    pub gridline: bool,
}

/// Inclusive pixel bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_row: i32,
    pub min_col: i32,
    pub max_row: i32,
    pub max_col: i32,
}

impl BoundingBox {
    fn empty() -> Self {
        Self {
            min_row: i32::MAX,
            min_col: i32::MAX,
            max_row: i32::MIN,
            max_col: i32::MIN,
        }
    }

    fn include(&mut self, p: Pixel) {
        self.min_row = self.min_row.min(p.row);
        self.min_col = self.min_col.min(p.col);
        self.max_row = self.max_row.max(p.row);
        self.max_col = self.max_col.max(p.col);
    }

    pub fn width(&self) -> i32 {
        (self.max_col - self.min_col + 1).max(0)
    }

    pub fn height(&self) -> i32 {
        (self.max_row - self.min_row + 1).max(0)
    }
}

/// A connected component: raw pixels, classification flags, and an arena of
/// primitives keyed by region-local tags.
///
/// Tags freed by a merge go back on a free list; a freed tag is reassigned
/// only after every index entry referencing it has been rewritten, which the
/// merge routine guarantees before removal.
#[derive(Clone, Debug, Serialize)]
pub struct Region {
    id: RegionId,
    label: i32,
    pub color: u32,
    pub flags: RegionFlags,
    bbox: BoundingBox,
    pixels: Vec<Pixel>,
    #[serde(skip)]
    slots: Vec<Option<Primitive>>,
    #[serde(skip)]
    free_tags: Vec<u32>,
}

impl Region {
    fn new(id: RegionId, label: i32) -> Self {
        Self {
            id,
            label,
            color: 0,
            flags: RegionFlags::default(),
            bbox: BoundingBox::empty(),
            pixels: Vec::new(),
            slots: Vec::new(),
            free_tags: Vec::new(),
        }
    }

    pub fn id(&self) -> RegionId {
        self.id
    }

    pub fn label(&self) -> i32 {
        self.label
    }

    pub fn bbox(&self) -> BoundingBox {
        self.bbox
    }

    /// Raw pixel list in row-major discovery order.
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Create a primitive from an ordered chain, reusing a freed tag if one
    /// is available.
    pub fn insert_prim(&mut self, points: Vec<Pixel>) -> PrimTag {
        if let Some(slot) = self.free_tags.pop() {
            let tag = PrimTag(slot);
            debug_assert!(self.slots[slot as usize].is_none(), "free list out of sync");
            self.slots[slot as usize] = Some(Primitive::new(tag, points));
            tag
        } else {
            let tag = PrimTag(self.slots.len() as u32);
            self.slots.push(Some(Primitive::new(tag, points)));
            tag
        }
    }

    pub fn prim(&self, tag: PrimTag) -> Option<&Primitive> {
        self.slots.get(tag.0 as usize)?.as_ref()
    }

    pub fn prim_mut(&mut self, tag: PrimTag) -> Option<&mut Primitive> {
        self.slots.get_mut(tag.0 as usize)?.as_mut()
    }

    /// Remove a primitive and free its tag for reuse.
    pub fn remove_prim(&mut self, tag: PrimTag) -> Option<Primitive> {
        let prim = self.slots.get_mut(tag.0 as usize)?.take()?;
        self.free_tags.push(tag.0);
        Some(prim)
    }

    pub fn prims(&self) -> impl Iterator<Item = &Primitive> {
        self.slots.iter().flatten()
    }

    /// Snapshot of live tags in creation order, safe to iterate while the
    /// arena is mutated.
    pub fn tags(&self) -> Vec<PrimTag> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|_| PrimTag(i as u32)))
            .collect()
    }

    pub fn prim_count(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    fn push_pixel(&mut self, p: Pixel) {
        self.bbox.include(p);
        self.pixels.push(p);
    }
}

/// All regions of one image. The single owner of every primitive; the index
/// and rectangle records refer back here by `(RegionId, PrimTag)` only.
#[derive(Clone, Debug, Default, Serialize)]
pub struct RegionSet {
    regions: Vec<Region>,
    #[serde(skip)]
    by_label: HashMap<i32, RegionId>,
}

impl RegionSet {
    /// Group the labeled raster into regions, skipping the background label.
    /// `colors` is an optional parallel per-pixel color raster; a region takes
    /// the color of its first (row-major) pixel.
    pub fn collect(raster: &LabelImage, colors: Option<&[u32]>) -> Self {
        let mut set = RegionSet::default();
        for row in 0..raster.height as i32 {
            for col in 0..raster.width as i32 {
                let p = Pixel::new(row, col);
                let label = raster.label_at(p);
                if label == raster.background {
                    continue;
                }
                let id = match set.by_label.get(&label) {
                    Some(&id) => id,
                    None => {
                        let id = RegionId(set.regions.len() as u32);
                        let mut region = Region::new(id, label);
                        if let Some(colors) = colors {
                            region.color = colors[row as usize * raster.width + col as usize];
                        }
                        set.regions.push(region);
                        set.by_label.insert(label, id);
                        id
                    }
                };
                set.regions[id.0 as usize].push_pixel(p);
            }
        }
        set
    }

    pub fn get(&self, id: RegionId) -> &Region {
        &self.regions[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: RegionId) -> &mut Region {
        &mut self.regions[id.0 as usize]
    }

    pub fn id_for_label(&self, label: i32) -> Option<RegionId> {
        self.by_label.get(&label).copied()
    }

    pub fn ids(&self) -> Vec<RegionId> {
        (0..self.regions.len() as u32).map(RegionId).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_groups_pixels_and_bounds() {
        let mut raster = LabelImage::new(6, 4, 0);
        for col in 1..4 {
            raster.set_label(1, col, 7);
            raster.set_label(2, col, 7);
        }
        let set = RegionSet::collect(&raster, None);
        assert_eq!(set.len(), 1);
        let id = set.id_for_label(7).expect("label 7 collected");
        let region = set.get(id);
        assert_eq!(region.pixels().len(), 6);
        assert_eq!(region.bbox().width(), 3);
        assert_eq!(region.bbox().height(), 2);
    }

    #[test]
    fn tags_are_reused_after_removal() {
        let mut raster = LabelImage::new(2, 2, 0);
        raster.set_label(0, 0, 1);
        let mut set = RegionSet::collect(&raster, None);
        let id = set.id_for_label(1).unwrap();
        let region = set.get_mut(id);
        let a = region.insert_prim(vec![Pixel::new(0, 0)]);
        let b = region.insert_prim(vec![Pixel::new(0, 0)]);
        assert_ne!(a, b);
        region.remove_prim(a);
        let c = region.insert_prim(vec![Pixel::new(0, 0)]);
        assert_eq!(a, c, "freed tag should be reassigned");
        assert_eq!(region.prim_count(), 2);
    }
}
