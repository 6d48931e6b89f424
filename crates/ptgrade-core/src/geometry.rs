// ABOUTME: Geometry primitives over normalized 2D joint coordinates
// ABOUTME: Joint angles, distances, line projection, and body-line deviation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Pure geometry helpers. Nothing here fails: degenerate input (coincident
//! points, zero-length segments) yields a neutral value so a noisy frame
//! never aborts grading.

use crate::constants::geometry::{DEGENERATE_LENGTH, NEUTRAL_ANGLE_DEGREES};
use crate::models::Point2D;

/// Angle at `vertex` between the rays to `p1` and `p3`, in degrees [0, 180]
///
/// Uses `atan2(|cross|, dot)`, which stays accurate near 0 and 180 degrees.
/// Returns `0.0` when either ray has zero length.
#[must_use]
pub fn angle(p1: Point2D, vertex: Point2D, p3: Point2D) -> f64 {
    angle_or(p1, vertex, p3, NEUTRAL_ANGLE_DEGREES)
}

/// Like [`angle`] but returns `default` for degenerate rays
#[must_use]
pub fn angle_or(p1: Point2D, vertex: Point2D, p3: Point2D, default: f64) -> f64 {
    let (ax, ay) = (p1.x - vertex.x, p1.y - vertex.y);
    let (bx, by) = (p3.x - vertex.x, p3.y - vertex.y);

    let mag_a = ax.hypot(ay);
    let mag_b = bx.hypot(by);
    if mag_a < DEGENERATE_LENGTH || mag_b < DEGENERATE_LENGTH || !(mag_a * mag_b).is_finite() {
        return default;
    }

    let dot = ax.mul_add(bx, ay * by);
    let cross = ax.mul_add(by, -(ay * bx));
    cross.abs().atan2(dot).to_degrees()
}

/// Euclidean distance
#[must_use]
pub fn distance(a: Point2D, b: Point2D) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Point at fraction `t` along `a -> b` (`t` outside [0, 1] extrapolates)
#[must_use]
pub fn lerp(a: Point2D, b: Point2D, t: f64) -> Point2D {
    Point2D::new(
        (b.x - a.x).mul_add(t, a.x),
        (b.y - a.y).mul_add(t, a.y),
    )
}

/// Height of the line through `a` and `b` at horizontal position `x`
///
/// `None` for a vertical line.
#[must_use]
pub fn interpolate_y(a: Point2D, b: Point2D, x: f64) -> Option<f64> {
    let dx = b.x - a.x;
    if dx.abs() < DEGENERATE_LENGTH {
        return None;
    }
    Some((b.y - a.y).mul_add((x - a.x) / dx, a.y))
}

/// Orthogonal projection of `point` onto the infinite line `a–b`
///
/// Returns `a` when the segment is degenerate.
#[must_use]
pub fn project_onto_line(a: Point2D, b: Point2D, point: Point2D) -> Point2D {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx.mul_add(dx, dy * dy);
    if len_sq < DEGENERATE_LENGTH * DEGENERATE_LENGTH {
        return a;
    }
    let t = (point.x - a.x).mul_add(dx, (point.y - a.y) * dy) / len_sq;
    lerp(a, b, t)
}

/// Perpendicular distance from `point` to line `a–b`, divided by `|ab|`
///
/// Comparable across body sizes and camera distances. Zero for a
/// degenerate segment.
#[must_use]
pub fn perpendicular_distance(a: Point2D, b: Point2D, point: Point2D) -> f64 {
    line_deviation(a, b, point).abs()
}

/// Signed, length-normalized offset of `point` from line `a–b`
///
/// Positive when `point` lies below the line in image space (larger `y`),
/// which is a sagging hip for a horizontal body. Negative means above
/// (piking).
#[must_use]
pub fn line_deviation(a: Point2D, b: Point2D, point: Point2D) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx.mul_add(dx, dy * dy);
    if len_sq < DEGENERATE_LENGTH * DEGENERATE_LENGTH {
        return 0.0;
    }
    let cross = dx.mul_add(point.y - a.y, -(dy * (point.x - a.x)));
    let orientation = if dx < 0.0 { -1.0 } else { 1.0 };
    orientation * cross / len_sq
}

/// Inclination of `from -> to` above or below horizontal, in degrees [0, 90]
///
/// 0 is lying flat, 90 is upright. Zero for coincident points.
#[must_use]
pub fn angle_from_horizontal(from: Point2D, to: Point2D) -> f64 {
    let dx = (to.x - from.x).abs();
    let dy = (to.y - from.y).abs();
    if dx.hypot(dy) < DEGENERATE_LENGTH {
        return NEUTRAL_ANGLE_DEGREES;
    }
    dy.atan2(dx).to_degrees()
}

/// Lean of `from -> to` away from vertical, in degrees [0, 90]
#[must_use]
pub fn angle_from_vertical(from: Point2D, to: Point2D) -> f64 {
    if distance(from, to) < DEGENERATE_LENGTH {
        return NEUTRAL_ANGLE_DEGREES;
    }
    90.0 - angle_from_horizontal(from, to)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn p(x: f64, y: f64) -> Point2D {
        Point2D::new(x, y)
    }

    #[test]
    fn test_right_angle() {
        let result = angle(p(1.0, 0.0), p(0.0, 0.0), p(0.0, 1.0));
        assert!((result - 90.0).abs() < EPS);
    }

    #[test]
    fn test_straight_and_folded() {
        assert!((angle(p(0.0, 0.0), p(0.5, 0.5), p(1.0, 1.0)) - 180.0).abs() < 1e-6);
        assert!(angle(p(1.0, 0.0), p(0.0, 0.0), p(2.0, 0.0)).abs() < 1e-6);
    }

    #[test]
    fn test_coincident_points_are_neutral() {
        let q = p(0.4, 0.4);
        let result = angle(q, q, q);
        assert!(!result.is_nan());
        assert!(result.abs() < EPS);
        assert!((angle_or(q, q, p(0.9, 0.9), 180.0) - 180.0).abs() < EPS);
    }

    #[test]
    fn test_nearly_collinear_never_nan() {
        let result = angle(p(0.0, 0.0), p(0.5, 0.5), p(1.0, 1.000_000_000_000_1));
        assert!(result.is_finite());
        assert!((result - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_collinear_angles_are_exact() {
        assert!((angle(p(0.0, 0.0), p(0.5, 0.5), p(1.0, 1.0)) - 180.0).abs() < 1e-12);
        assert!((angle(p(0.3, 0.6), p(0.3, 0.4), p(0.3, 0.5))).abs() < 1e-12);
    }

    #[test]
    fn test_distance() {
        assert!((distance(p(0.0, 0.0), p(0.3, 0.4)) - 0.5).abs() < EPS);
    }

    #[test]
    fn test_interpolate_y() {
        let y = interpolate_y(p(0.0, 0.0), p(1.0, 1.0), 0.25).unwrap();
        assert!((y - 0.25).abs() < EPS);
        assert!(interpolate_y(p(0.5, 0.0), p(0.5, 1.0), 0.5).is_none());
    }

    #[test]
    fn test_projection_onto_line() {
        let projected = project_onto_line(p(0.0, 0.0), p(1.0, 0.0), p(0.3, 0.2));
        assert!((projected.x - 0.3).abs() < EPS);
        assert!(projected.y.abs() < EPS);
    }

    #[test]
    fn test_deviation_is_normalized_by_segment_length() {
        let short = perpendicular_distance(p(0.0, 0.5), p(0.5, 0.5), p(0.25, 0.55));
        let long = perpendicular_distance(p(0.0, 0.5), p(1.0, 0.5), p(0.5, 0.6));
        assert!((short - 0.1).abs() < EPS);
        assert!((long - 0.1).abs() < EPS);
    }

    #[test]
    fn test_deviation_sign_is_independent_of_direction() {
        let sag = p(0.5, 0.6);
        assert!(line_deviation(p(0.0, 0.5), p(1.0, 0.5), sag) > 0.0);
        assert!(line_deviation(p(1.0, 0.5), p(0.0, 0.5), sag) > 0.0);
        let pike = p(0.5, 0.4);
        assert!(line_deviation(p(1.0, 0.5), p(0.0, 0.5), pike) < 0.0);
    }

    #[test]
    fn test_degenerate_segment_has_zero_deviation() {
        assert!(line_deviation(p(0.5, 0.5), p(0.5, 0.5), p(0.1, 0.1)).abs() < EPS);
    }

    #[test]
    fn test_inclination() {
        assert!(angle_from_horizontal(p(0.0, 0.5), p(0.5, 0.5)).abs() < EPS);
        assert!((angle_from_horizontal(p(0.5, 0.5), p(0.5, 0.0)) - 90.0).abs() < EPS);
        assert!((angle_from_vertical(p(0.5, 0.5), p(0.5, 0.0))).abs() < EPS);
        assert!((angle_from_horizontal(p(0.0, 0.0), p(0.1, 0.1)) - 45.0).abs() < 1e-6);
    }
}
