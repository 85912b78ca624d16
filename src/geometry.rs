//! Line fitting and planar geometry shared across the pipeline.
//!
//! All routines are pure and stateless. Fits choose their own parameterization:
//! a chain that is wider than tall is fitted as row-as-function-of-column, the
//! transposed form otherwise, so near-vertical chains never produce unbounded
//! slopes. The side-of-line test intentionally evaluates the stored
//! slope/intercept in row-on-column form regardless of the fit orientation:
//! for column-on-row lines the side value degenerates to the along-line
//! coordinate, which downstream search behavior depends on.

use crate::shapes::Pixel;
use nalgebra::{Matrix2, Vector2};
use serde::{Deserialize, Serialize};

/// Epsilon below which determinants and variances are treated as degenerate.
pub const GEOM_EPS: f64 = 1e-3;

/// Which coordinate a fitted line expresses as a function of the other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    /// `row = slope * col + intercept` (horizontal-leaning chains).
    RowOnCol,
    /// `col = slope * row + intercept` (vertical-leaning chains).
    ColOnRow,
}

/// Least-squares line in the orientation-dependent slope/intercept form.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Line {
    pub orientation: Orientation,
    pub slope: f64,
    pub intercept: f64,
}

impl Line {
    /// Unit tangent direction as `[dx, dy]` = `[dcol, drow]`.
    pub fn direction(&self) -> [f64; 2] {
        let (dx, dy) = match self.orientation {
            Orientation::RowOnCol => (1.0, self.slope),
            Orientation::ColOnRow => (self.slope, 1.0),
        };
        let norm = (dx * dx + dy * dy).sqrt();
        [dx / norm, dy / norm]
    }

    /// General form `a*x + b*y + c = 0` with `x = col`, `y = row`.
    fn general(&self) -> [f64; 3] {
        match self.orientation {
            Orientation::RowOnCol => [self.slope, -1.0, self.intercept],
            Orientation::ColOnRow => [1.0, -self.slope, -self.intercept],
        }
    }

    /// Signed side value of `p`, evaluated in row-on-column form regardless of
    /// orientation. See the module docs for why this is not symmetrized.
    pub fn side_value(&self, p: Pixel) -> f64 {
        let [x, y] = p.xy();
        y - (self.slope * x + self.intercept)
    }
}

/// Fit a line through `points`, picking the parameterization whose independent
/// axis has the larger spread. Degenerate sets (empty, single point, zero
/// spread) fall back to a flat line through the mean.
pub fn fit_line(points: &[Pixel]) -> Line {
    if points.is_empty() {
        return Line {
            orientation: Orientation::RowOnCol,
            slope: 0.0,
            intercept: 0.0,
        };
    }
    let n = points.len() as f64;
    let (mut sum_r, mut sum_c) = (0.0f64, 0.0f64);
    for p in points {
        sum_r += p.row as f64;
        sum_c += p.col as f64;
    }
    let mean_r = sum_r / n;
    let mean_c = sum_c / n;

    let (mut var_r, mut var_c, mut cov) = (0.0f64, 0.0f64, 0.0f64);
    for p in points {
        let dr = p.row as f64 - mean_r;
        let dc = p.col as f64 - mean_c;
        var_r += dr * dr;
        var_c += dc * dc;
        cov += dr * dc;
    }

    if var_c >= var_r {
        let slope = if var_c < GEOM_EPS { 0.0 } else { cov / var_c };
        Line {
            orientation: Orientation::RowOnCol,
            slope,
            intercept: mean_r - slope * mean_c,
        }
    } else {
        let slope = if var_r < GEOM_EPS { 0.0 } else { cov / var_r };
        Line {
            orientation: Orientation::ColOnRow,
            slope,
            intercept: mean_c - slope * mean_r,
        }
    }
}

/// Intersection point `[x, y]` of two lines, or `None` when near-parallel.
pub fn line_intersection(a: &Line, b: &Line) -> Option<[f64; 2]> {
    let [a1, b1, c1] = a.general();
    let [a2, b2, c2] = b.general();
    let m = Matrix2::new(a1, b1, a2, b2);
    if m.determinant().abs() < GEOM_EPS {
        return None;
    }
    let rhs = Vector2::new(-c1, -c2);
    let sol = m.lu().solve(&rhs)?;
    Some([sol[0], sol[1]])
}

/// Squared distance between two planar points.
pub fn dist_sq(p: [f64; 2], q: [f64; 2]) -> f64 {
    let dx = p[0] - q[0];
    let dy = p[1] - q[1];
    dx * dx + dy * dy
}

/// Squared distance between two pixels.
pub fn pixel_dist_sq(p: Pixel, q: Pixel) -> f64 {
    dist_sq(p.xy(), q.xy())
}

/// Squared perpendicular distance from a pixel to a fitted line, measured in
/// the line's own parameterization.
pub fn point_line_dist_sq(p: Pixel, line: &Line) -> f64 {
    let [x, y] = p.xy();
    let denom = 1.0 + line.slope * line.slope;
    let residual = match line.orientation {
        Orientation::RowOnCol => y - (line.slope * x + line.intercept),
        Orientation::ColOnRow => x - (line.slope * y + line.intercept),
    };
    residual * residual / denom
}

/// Whether `p` (against `line_a`) and `q` (against `line_b`) fall on the same
/// side. Callers comparing two points against one line pass it twice.
pub fn same_side(line_a: &Line, line_b: &Line, p: Pixel, q: Pixel) -> bool {
    let sa = line_a.side_value(p);
    let sb = line_b.side_value(q);
    (sa >= 0.0) == (sb >= 0.0)
}

/// Dot product of the unit tangents of two fitted lines. Near zero for
/// perpendicular lines, near ±1 for parallel ones.
pub fn direction_dot(a: &Line, b: &Line) -> f64 {
    let da = a.direction();
    let db = b.direction();
    da[0] * db[0] + da[1] * db[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn px(row: i32, col: i32) -> Pixel {
        Pixel::new(row, col)
    }

    #[test]
    fn fit_picks_row_on_col_for_horizontal_chains() {
        let pts: Vec<Pixel> = (0..10).map(|c| px(5, c)).collect();
        let line = fit_line(&pts);
        assert_eq!(line.orientation, Orientation::RowOnCol);
        assert!(line.slope.abs() < 1e-9, "slope={}", line.slope);
        assert!((line.intercept - 5.0).abs() < 1e-9);
    }

    #[test]
    fn fit_picks_col_on_row_for_vertical_chains() {
        let pts: Vec<Pixel> = (0..10).map(|r| px(r, 3)).collect();
        let line = fit_line(&pts);
        assert_eq!(line.orientation, Orientation::ColOnRow);
        assert!(line.slope.abs() < 1e-9);
        assert!((line.intercept - 3.0).abs() < 1e-9);
    }

    #[test]
    fn fit_recovers_diagonal_slope() {
        let pts: Vec<Pixel> = (0..20).map(|i| px(i, 2 * i)).collect();
        let line = fit_line(&pts);
        assert_eq!(line.orientation, Orientation::RowOnCol);
        assert!((line.slope - 0.5).abs() < 1e-9, "slope={}", line.slope);
    }

    #[test]
    fn intersection_of_axis_aligned_lines() {
        let h = fit_line(&(0..8).map(|c| px(4, c)).collect::<Vec<_>>());
        let v = fit_line(&(0..8).map(|r| px(r, 6)).collect::<Vec<_>>());
        let p = line_intersection(&h, &v).expect("perpendicular lines intersect");
        assert!((p[0] - 6.0).abs() < 1e-9 && (p[1] - 4.0).abs() < 1e-9, "p={p:?}");
    }

    #[test]
    fn intersection_rejects_parallel_lines() {
        let a = fit_line(&(0..8).map(|c| px(4, c)).collect::<Vec<_>>());
        let b = fit_line(&(0..8).map(|c| px(9, c)).collect::<Vec<_>>());
        assert!(line_intersection(&a, &b).is_none());
    }

    #[test]
    fn same_side_matches_reference_vertical_fixture() {
        // Vertical line through (x=0, y=0)..(x=0, y=10): for column-on-row
        // fits the side value degenerates to the along-line coordinate.
        let vertical = fit_line(&(0..=10).map(|r| px(r, 0)).collect::<Vec<_>>());
        assert_eq!(vertical.orientation, Orientation::ColOnRow);
        // (x=1, y=5) vs (x=1, y=-5): opposite sides.
        assert!(!same_side(&vertical, &vertical, px(5, 1), px(-5, 1)));
        // (x=1, y=5) vs (x=2, y=3): same side.
        assert!(same_side(&vertical, &vertical, px(5, 1), px(3, 2)));
    }

    #[test]
    fn same_side_splits_a_horizontal_line() {
        let h = fit_line(&(0..8).map(|c| px(4, c)).collect::<Vec<_>>());
        assert!(!same_side(&h, &h, px(0, 3), px(9, 3)));
        assert!(same_side(&h, &h, px(6, 1), px(9, 7)));
    }

    #[test]
    fn perpendicular_and_parallel_dots() {
        let h = fit_line(&(0..8).map(|c| px(4, c)).collect::<Vec<_>>());
        let v = fit_line(&(0..8).map(|r| px(r, 6)).collect::<Vec<_>>());
        let h2 = fit_line(&(0..8).map(|c| px(9, c)).collect::<Vec<_>>());
        assert!(direction_dot(&h, &v).abs() < 1e-9);
        assert!(direction_dot(&h, &h2).abs() > 0.999);
    }

    #[test]
    fn point_line_distance_is_perpendicular() {
        let h = fit_line(&(0..8).map(|c| px(4, c)).collect::<Vec<_>>());
        assert!((point_line_dist_sq(px(7, 3), &h) - 9.0).abs() < 1e-9);
        let v = fit_line(&(0..8).map(|r| px(r, 6)).collect::<Vec<_>>());
        assert!((point_line_dist_sq(px(3, 8), &v) - 4.0).abs() < 1e-9);
    }
}
