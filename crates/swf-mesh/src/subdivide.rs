//! 1-to-4 midpoint subdivision
//!
//! Every unique edge gets one midpoint vertex. Midpoints are appended after
//! the existing vertices in unique-edge order, so the refined vertex set is
//! ordered coarse block first, detail block second. The lifting filters index
//! both blocks by position and depend on this layout.
//!
//! Face `(f0, f1, f2)` with midpoints `m01`, `m12`, `m20` becomes
//!
//! ```text
//!             f2
//!            /  \
//!         m20----m12
//!         /  \  /  \
//!       f0----m01---f1
//! ```
//!
//! `(f0, m01, m20)` replaces the parent at its index; `(m01, f1, m12)`,
//! `(m20, m12, f2)` and `(m01, m12, m20)` are appended in parent order.

use swf_core::{project_to_sphere, Point3, Projection, SwfResult};
use tracing::debug;

use crate::{AdjacencyMatrix, Face, Mesh};

/// Result of one subdivision step
#[derive(Debug, Clone, PartialEq)]
pub struct Subdivision {
    /// The refined mesh
    pub mesh: Mesh,
    /// First-order adjacency over the refined vertex set
    pub adjacency: AdjacencyMatrix,
    /// Number of vertices carried over from the parent mesh
    pub coarse_count: usize,
}

impl Subdivision {
    /// Number of midpoint vertices added
    #[inline]
    pub fn detail_count(&self) -> usize {
        self.mesh.vertex_count() - self.coarse_count
    }
}

/// Subdivide every face of `mesh` once
pub fn subdivide(mesh: &Mesh, projection: Projection) -> SwfResult<Subdivision> {
    let table = mesh.edge_table();
    let coarse_count = mesh.vertex_count();

    let mut vertices = Vec::with_capacity(coarse_count + table.edges.len());
    vertices.extend_from_slice(mesh.vertices());
    for &(a, b) in &table.edges {
        let mid: Point3 = (mesh.vertices()[a] + mesh.vertices()[b]) * 0.5;
        let mid = match projection {
            Projection::Sphere => project_to_sphere(&mid)?,
            Projection::Flat => mid,
        };
        vertices.push(mid);
    }

    let parent_faces = mesh.faces();
    let mut faces: Vec<Face> = Vec::with_capacity(parent_faces.len() * 4);
    let mut appended: Vec<Face> = Vec::with_capacity(parent_faces.len() * 3);
    for (&[f0, f1, f2], &[e01, e12, e20]) in parent_faces.iter().zip(&table.face_edges) {
        let m01 = coarse_count + e01;
        let m12 = coarse_count + e12;
        let m20 = coarse_count + e20;

        faces.push([f0, m01, m20]);
        appended.push([m01, f1, m12]);
        appended.push([m20, m12, f2]);
        appended.push([m01, m12, m20]);
    }
    faces.extend(appended);

    let refined = Mesh::from_parts(vertices, faces, mesh.level() + 1);
    let adjacency = AdjacencyMatrix::from_edges(refined.vertex_count(), &refined.edge_table().edges);

    debug!(
        level = refined.level(),
        vertices = refined.vertex_count(),
        faces = refined.face_count(),
        "subdivided mesh"
    );

    Ok(Subdivision {
        mesh: refined,
        adjacency,
        coarse_count,
    })
}
