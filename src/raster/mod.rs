//! Input rasters handed over by the upstream labeling stages: the component
//! label image and the parallel border mask the vectorizer walks on.

pub mod io;

use crate::shapes::Pixel;
use serde::{Deserialize, Serialize};

/// One integer component label per pixel, row-major. Out-of-bounds lookups
/// read as background so neighborhood scans need no explicit clamping.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LabelImage {
    pub width: usize,
    pub height: usize,
    pub background: i32,
    pub labels: Vec<i32>,
}

impl LabelImage {
    pub fn new(width: usize, height: usize, background: i32) -> Self {
        Self {
            width,
            height,
            background,
            labels: vec![background; width * height],
        }
    }

    pub fn from_labels(width: usize, height: usize, background: i32, labels: Vec<i32>) -> Self {
        debug_assert_eq!(labels.len(), width * height, "label buffer size mismatch");
        Self {
            width,
            height,
            background,
            labels,
        }
    }

    pub fn in_bounds(&self, p: Pixel) -> bool {
        p.row >= 0 && p.col >= 0 && (p.row as usize) < self.height && (p.col as usize) < self.width
    }

    pub fn label_at(&self, p: Pixel) -> i32 {
        if self.in_bounds(p) {
            self.labels[p.row as usize * self.width + p.col as usize]
        } else {
            self.background
        }
    }

    pub fn set_label(&mut self, row: i32, col: i32, label: i32) {
        let p = Pixel::new(row, col);
        debug_assert!(self.in_bounds(p));
        self.labels[row as usize * self.width + col as usize] = label;
    }
}

/// Bit raster marking which pixels are border pixels of their region. The
/// vectorizer consumes a working copy of this mask, clearing pixels as walks
/// absorb them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BorderMask {
    pub width: usize,
    pub height: usize,
    data: Vec<u8>,
}

impl BorderMask {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    /// Mark every non-background pixel that has a 4-neighbor with a different
    /// label (or lies on the image edge). Stand-in for the upstream border
    /// raster in tests and the demo tool.
    pub fn of_regions(raster: &LabelImage) -> Self {
        let mut mask = Self::new(raster.width, raster.height);
        for row in 0..raster.height as i32 {
            for col in 0..raster.width as i32 {
                let p = Pixel::new(row, col);
                let label = raster.label_at(p);
                if label == raster.background {
                    continue;
                }
                let exposed = [(0, 1), (0, -1), (1, 0), (-1, 0)]
                    .iter()
                    .any(|&(dr, dc)| raster.label_at(Pixel::new(row + dr, col + dc)) != label);
                if exposed {
                    mask.set(p);
                }
            }
        }
        mask
    }

    pub fn is_set(&self, p: Pixel) -> bool {
        if p.row < 0 || p.col < 0 {
            return false;
        }
        let (r, c) = (p.row as usize, p.col as usize);
        r < self.height && c < self.width && self.data[r * self.width + c] != 0
    }

    pub fn set(&mut self, p: Pixel) {
        if p.row >= 0 && p.col >= 0 {
            let (r, c) = (p.row as usize, p.col as usize);
            if r < self.height && c < self.width {
                self.data[r * self.width + c] = 1;
            }
        }
    }

    pub fn clear(&mut self, p: Pixel) {
        if p.row >= 0 && p.col >= 0 {
            let (r, c) = (p.row as usize, p.col as usize);
            if r < self.height && c < self.width {
                self.data[r * self.width + c] = 0;
            }
        }
    }

    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn border_of_a_filled_block_is_its_ring() {
        let mut raster = LabelImage::new(8, 8, 0);
        for row in 2..6 {
            for col in 2..6 {
                raster.set_label(row, col, 1);
            }
        }
        let mask = BorderMask::of_regions(&raster);
        // 4x4 block: everything except the 2x2 interior is border.
        assert_eq!(mask.count(), 12);
        assert!(mask.is_set(Pixel::new(2, 2)));
        assert!(!mask.is_set(Pixel::new(3, 3)));
    }

    #[test]
    fn out_of_bounds_reads_are_background() {
        let raster = LabelImage::new(4, 4, -1);
        assert_eq!(raster.label_at(Pixel::new(-1, 0)), -1);
        assert_eq!(raster.label_at(Pixel::new(0, 99)), -1);
        let mask = BorderMask::new(4, 4);
        assert!(!mask.is_set(Pixel::new(-3, 1)));
    }
}
