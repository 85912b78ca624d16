use serde::{Deserialize, Serialize};

/// Tolerances of the rectangle search.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RectOptions {
    /// Maximum |tangent dot| for two sides to count as perpendicular.
    pub perp_max_dot: f64,
    /// Minimum |tangent dot| for two chains to count as parallel.
    pub parallel_min_dot: f64,
    /// Endpoint distance slack, in pixels, for gap budgets and corner
    /// proximity.
    pub endpoint_slack_px: f64,
    /// Maximum offset from the chase line when extending toward a corner.
    pub collinear_tol_px: f64,
    /// Cap on extension rounds per side, guarding termination.
    pub max_side_extensions: usize,
}

impl Default for RectOptions {
    fn default() -> Self {
        Self {
            perp_max_dot: 0.25,
            parallel_min_dot: 0.97,
            endpoint_slack_px: 2.0,
            collinear_tol_px: 2.0,
            max_side_extensions: 32,
        }
    }
}
