//! Geometry primitives on and around the unit sphere

use nalgebra::Vector3;

use crate::{SwfError, SwfResult};

/// Point or direction in 3D space
pub type Point3 = Vector3<f64>;

/// Below this length a vector is treated as zero
pub const LENGTH_EPSILON: f64 = 1e-12;

/// Below this area a triangle is treated as degenerate
pub const AREA_EPSILON: f64 = 1e-15;

/// Area of the triangle `abc`
pub fn triangle_area(a: &Point3, b: &Point3, c: &Point3) -> f64 {
    0.5 * (b - a).cross(&(c - a)).norm()
}

/// Unit normal of the triangle `abc`, following its winding.
///
/// Returns `None` for collinear or coincident corners.
pub fn unit_normal(a: &Point3, b: &Point3, c: &Point3) -> Option<Point3> {
    let n = (b - a).cross(&(c - a));
    let len = n.norm();
    if len <= LENGTH_EPSILON {
        None
    } else {
        Some(n / len)
    }
}

/// Rescale `p` to unit length
pub fn project_to_sphere(p: &Point3) -> SwfResult<Point3> {
    let len = p.norm();
    if len <= LENGTH_EPSILON || !len.is_finite() {
        return Err(SwfError::DegenerateGeometry(format!(
            "cannot project ({}, {}, {}) onto the unit sphere",
            p.x, p.y, p.z
        )));
    }
    Ok(p / len)
}

/// Spherical coordinate (radius, azimuth, colatitude), angles in radians.
///
/// Azimuth is measured in the xy-plane from +x towards +y, colatitude from +z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalCoord {
    pub radius: f64,
    pub azimuth: f64,
    pub colatitude: f64,
}

impl SphericalCoord {
    pub fn new(radius: f64, azimuth: f64, colatitude: f64) -> Self {
        Self {
            radius,
            azimuth,
            colatitude,
        }
    }

    /// Unit direction from angles in degrees
    pub fn from_degrees(azimuth_deg: f64, colatitude_deg: f64) -> Self {
        Self::new(1.0, azimuth_deg.to_radians(), colatitude_deg.to_radians())
    }

    /// Cartesian position
    pub fn to_cartesian(&self) -> Point3 {
        let (sin_az, cos_az) = self.azimuth.sin_cos();
        let (sin_col, cos_col) = self.colatitude.sin_cos();
        Point3::new(
            self.radius * cos_az * sin_col,
            self.radius * sin_az * sin_col,
            self.radius * cos_col,
        )
    }

    /// Spherical coordinate of a Cartesian point. The origin maps to all zeros.
    pub fn from_cartesian(p: &Point3) -> Self {
        let radius = p.norm();
        if radius <= LENGTH_EPSILON {
            return Self::new(0.0, 0.0, 0.0);
        }
        let colatitude = (p.z / radius).clamp(-1.0, 1.0).acos();
        Self::new(radius, p.y.atan2(p.x), colatitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_triangle_area_unit_right_triangle() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        let c = Point3::new(0.0, 1.0, 0.0);
        assert!((triangle_area(&a, &b, &c) - 0.5).abs() < 1e-15);
        assert_eq!(unit_normal(&a, &b, &c), Some(Point3::z()));
    }

    #[test]
    fn test_unit_normal_collinear() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 1.0, 1.0);
        let c = Point3::new(2.0, 2.0, 2.0);
        assert!(unit_normal(&a, &b, &c).is_none());
    }

    #[test]
    fn test_project_origin_fails() {
        let err = project_to_sphere(&Point3::zeros()).unwrap_err();
        assert!(matches!(err, SwfError::DegenerateGeometry(_)));
    }

    #[test]
    fn test_spherical_axes() {
        let x = SphericalCoord::new(1.0, 0.0, FRAC_PI_2).to_cartesian();
        assert!((x - Point3::x()).norm() < 1e-12);

        let y = SphericalCoord::from_degrees(90.0, 90.0).to_cartesian();
        assert!((y - Point3::y()).norm() < 1e-12);

        let z = SphericalCoord::new(2.0, 1.3, 0.0).to_cartesian();
        assert!((z - Point3::new(0.0, 0.0, 2.0)).norm() < 1e-12);
    }

    proptest! {
        #[test]
        fn prop_spherical_inverse(
            radius in 0.1f64..10.0,
            azimuth in -PI + 1e-3..PI - 1e-3,
            colatitude in 1e-3f64..PI - 1e-3,
        ) {
            let coord = SphericalCoord::new(radius, azimuth, colatitude);
            let back = SphericalCoord::from_cartesian(&coord.to_cartesian());
            prop_assert!((back.radius - radius).abs() < 1e-9);
            prop_assert!((back.azimuth - azimuth).abs() < 1e-9);
            prop_assert!((back.colatitude - colatitude).abs() < 1e-9);
        }
    }
}
