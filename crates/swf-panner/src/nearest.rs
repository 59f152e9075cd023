//! Nearest-face search
//!
//! Closest point on a triangle by Voronoi region (three vertex regions, three
//! edge regions, interior), after Ericson, "Real-Time Collision Detection"
//! 5.1.5. The face search is an exhaustive scan.

use swf_core::{Point3, SwfError, SwfResult};
use swf_mesh::Mesh;

/// Which feature of the triangle the closest point lies on.
/// Corners are numbered 0, 1, 2 in face order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriangleRegion {
    Vertex(usize),
    Edge(usize, usize),
    Interior,
}

/// Closest point on one triangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestPoint {
    pub point: Point3,
    pub distance_squared: f64,
    pub region: TriangleRegion,
}

/// Closest point to `p` on triangle `abc`
pub fn closest_point_on_triangle(p: &Point3, a: &Point3, b: &Point3, c: &Point3) -> ClosestPoint {
    let (point, region) = closest_in_region(p, a, b, c);
    ClosestPoint {
        point,
        distance_squared: (p - point).norm_squared(),
        region,
    }
}

fn closest_in_region(p: &Point3, a: &Point3, b: &Point3, c: &Point3) -> (Point3, TriangleRegion) {
    let ab = b - a;
    let ac = c - a;

    let ap = p - a;
    let d1 = ab.dot(&ap);
    let d2 = ac.dot(&ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return (*a, TriangleRegion::Vertex(0));
    }

    let bp = p - b;
    let d3 = ab.dot(&bp);
    let d4 = ac.dot(&bp);
    if d3 >= 0.0 && d4 <= d3 {
        return (*b, TriangleRegion::Vertex(1));
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return (a + ab * v, TriangleRegion::Edge(0, 1));
    }

    let cp = p - c;
    let d5 = ab.dot(&cp);
    let d6 = ac.dot(&cp);
    if d6 >= 0.0 && d5 <= d6 {
        return (*c, TriangleRegion::Vertex(2));
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return (a + ac * w, TriangleRegion::Edge(0, 2));
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return (b + (c - b) * w, TriangleRegion::Edge(1, 2));
    }

    let denom = 1.0 / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;
    (a + ab * v + ac * w, TriangleRegion::Interior)
}

/// Winning face of a nearest-face scan
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestFace {
    pub face: usize,
    pub closest: ClosestPoint,
}

/// Face of `mesh` closest to `query`. Ties keep the lower face index.
pub fn nearest_face(mesh: &Mesh, query: &Point3) -> SwfResult<NearestFace> {
    let mut best: Option<NearestFace> = None;
    for face in 0..mesh.face_count() {
        let [a, b, c] = mesh.triangle(face);
        let mut closest = closest_point_on_triangle(query, &a, &b, &c);
        if !closest.distance_squared.is_finite() {
            closest.distance_squared = f64::INFINITY;
        }
        let better = best
            .as_ref()
            .map_or(true, |b| closest.distance_squared < b.closest.distance_squared);
        if better {
            best = Some(NearestFace { face, closest });
        }
    }
    best.ok_or_else(|| SwfError::InvalidTopology("mesh has no faces".into()))
}
