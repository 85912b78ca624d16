use chart_vectorizer::raster::LabelImage;

/// One filled axis-aligned bar, inclusive pixel ranges.
#[derive(Clone, Copy, Debug)]
pub struct Bar {
    pub label: i32,
    pub rows: (i32, i32),
    pub cols: (i32, i32),
}

impl Bar {
    /// Geometric corner points `[x, y]` in perimeter order, top-left first.
    pub fn corners(&self) -> [[f64; 2]; 4] {
        let (r0, r1) = (self.rows.0 as f64, self.rows.1 as f64);
        let (c0, c1) = (self.cols.0 as f64, self.cols.1 as f64);
        [[c0, r0], [c1, r0], [c1, r1], [c0, r1]]
    }
}

/// Paints filled bars into a fresh label image over a zero background.
pub fn bar_raster(width: usize, height: usize, bars: &[Bar]) -> LabelImage {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    let mut raster = LabelImage::new(width, height, 0);
    for bar in bars {
        for row in bar.rows.0..=bar.rows.1 {
            for col in bar.cols.0..=bar.cols.1 {
                raster.set_label(row, col, bar.label);
            }
        }
    }
    raster
}
