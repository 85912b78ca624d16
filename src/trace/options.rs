use serde::{Deserialize, Serialize};

/// Tuning knobs for the border vectorizer's merge passes.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceOptions {
    /// Run the unconditional diagonal-staple merge pass.
    pub staple_pass: bool,
    /// Run the straight-line-tolerance merge pass.
    pub straight_pass: bool,
    /// Maximum point-to-line distance, in pixels, for a straight merge to
    /// keep the result visually straight.
    pub straight_tol_px: f64,
    /// A straight-merge candidate must be at least this many times larger
    /// than the chain absorbing it.
    pub straight_size_factor: f64,
    /// Minimum point count for a non-axis-aligned chain to qualify as a
    /// large curve in the staple pass.
    pub staple_curve_min_points: usize,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self {
            staple_pass: true,
            straight_pass: true,
            straight_tol_px: 2.0,
            straight_size_factor: 4.0,
            staple_curve_min_points: 10,
        }
    }
}
