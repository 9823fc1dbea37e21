//! Joint angle geometry.

use stance_models::Landmark;

/// Rays shorter than this are treated as degenerate.
const MIN_RAY_LENGTH: f64 = 1e-12;

/// A point in the image plane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl From<(f64, f64)> for Point2 {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<&Landmark> for Point2 {
    /// Projects onto the image plane; depth is dropped.
    fn from(lm: &Landmark) -> Self {
        Self { x: lm.x, y: lm.y }
    }
}

/// Angle in degrees at vertex `b` between rays `b→a` and `b→c`.
///
/// Only the x/y projection is used. The result lies in `[0, 180]`; if either
/// ray has zero length the angle is 0.
pub fn angle(a: impl Into<Point2>, b: impl Into<Point2>, c: impl Into<Point2>) -> f64 {
    let (a, b, c) = (a.into(), b.into(), c.into());

    let (bax, bay) = (a.x - b.x, a.y - b.y);
    let (bcx, bcy) = (c.x - b.x, c.y - b.y);
    if bax.hypot(bay) < MIN_RAY_LENGTH || bcx.hypot(bcy) < MIN_RAY_LENGTH {
        return 0.0;
    }

    let radians = bcy.atan2(bcx) - bay.atan2(bax);
    let degrees = radians.to_degrees().abs();
    if degrees > 180.0 {
        360.0 - degrees
    } else {
        degrees
    }
}

/// Elbow-style joint angle from three landmarks.
pub fn joint_angle(a: &Landmark, b: &Landmark, c: &Landmark) -> f64 {
    angle(a, b, c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angle_straight() {
        let deg = angle((10.0, 0.0), (0.0, 0.0), (-10.0, 0.0));
        assert!((deg - 180.0).abs() < 0.1, "got {deg}");
    }

    #[test]
    fn test_angle_right() {
        let deg = angle((0.0, 10.0), (0.0, 0.0), (10.0, 0.0));
        assert!((deg - 90.0).abs() < 0.1, "got {deg}");
    }

    #[test]
    fn test_angle_is_reflected_into_half_turn() {
        // raw atan2 difference is 270 degrees here
        let deg = angle((0.0, -10.0), (0.0, 0.0), (-10.0, 0.0));
        assert!((deg - 90.0).abs() < 1e-9, "got {deg}");
        let deg = angle((1.0, 1.0), (0.0, 0.0), (1.0, -1.0));
        assert!((deg - 90.0).abs() < 1e-9, "got {deg}");
    }

    #[test]
    fn test_angle_is_symmetric() {
        let a = (0.3, 0.7);
        let b = (0.1, 0.2);
        let c = (0.9, 0.4);
        assert!((angle(a, b, c) - angle(c, b, a)).abs() < 1e-9);
    }

    #[test]
    fn test_angle_with_coincident_points() {
        assert_eq!(angle((0.0, 0.0), (0.0, 0.0), (0.0, 0.0)), 0.0);
        assert_eq!(angle((1.0, 1.0), (1.0, 1.0), (5.0, 0.0)), 0.0);
        assert!(!angle((0.0, 0.0), (0.0, 0.0), (0.0, 0.0)).is_nan());
    }

    #[test]
    fn test_joint_angle_ignores_depth() {
        let shoulder = Landmark::new(0.4, 0.4, -0.9);
        let elbow = Landmark::new(0.3, 0.4, 0.0);
        let wrist = Landmark::new(0.2, 0.4, 0.7);
        assert!((joint_angle(&shoulder, &elbow, &wrist) - 180.0).abs() < 1e-6);
    }
}
