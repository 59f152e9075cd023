//! Mesh - immutable vertices, faces and subdivision level

use std::collections::HashMap;

use swf_core::{project_to_sphere, Point3, Projection, SwfError, SwfResult};

/// Vertex indices of a triangle
pub type Face = [usize; 3];

/// Undirected edge as a sorted index pair
pub type Edge = (usize, usize);

/// Canonical (sorted) form of the edge `a-b`
#[inline]
pub fn canonical_edge(a: usize, b: usize) -> Edge {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Triangle mesh at a given subdivision level.
///
/// Meshes are values: subdivision and projection return new meshes and never
/// rewrite an existing one.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<Point3>,
    faces: Vec<Face>,
    level: usize,
}

/// Unique edges of a mesh and, per face, the index of each of its edges
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeTable {
    /// Unique edges in first-encountered order
    pub edges: Vec<Edge>,
    /// For face `f = (f0, f1, f2)`: indices of edges `f0-f1`, `f1-f2`, `f2-f0`
    pub face_edges: Vec<[usize; 3]>,
}

impl Mesh {
    /// Create a level-0 mesh, validating every face
    pub fn new(vertices: Vec<Point3>, faces: Vec<Face>) -> SwfResult<Self> {
        if vertices.is_empty() {
            return Err(SwfError::InvalidTopology("mesh has no vertices".into()));
        }
        if faces.is_empty() {
            return Err(SwfError::InvalidTopology("mesh has no faces".into()));
        }
        if let Some(i) = vertices.iter().position(|v| !v.iter().all(|c| c.is_finite())) {
            return Err(SwfError::InvalidTopology(format!(
                "vertex {i} has a non-finite coordinate"
            )));
        }

        let n = vertices.len();
        for (f, face) in faces.iter().enumerate() {
            if let Some(&bad) = face.iter().find(|&&idx| idx >= n) {
                return Err(SwfError::InvalidTopology(format!(
                    "face {f} references vertex {bad}, mesh has {n}"
                )));
            }
            if face[0] == face[1] || face[1] == face[2] || face[2] == face[0] {
                return Err(SwfError::InvalidTopology(format!(
                    "face {f} repeats a vertex: {face:?}"
                )));
            }
        }

        Ok(Mesh {
            vertices,
            faces,
            level: 0,
        })
    }

    /// Assemble a mesh whose indices are already known to be valid
    pub(crate) fn from_parts(vertices: Vec<Point3>, faces: Vec<Face>, level: usize) -> Self {
        Mesh {
            vertices,
            faces,
            level,
        }
    }

    /// Apply a base projection. `Sphere` rescales every vertex to unit norm.
    pub fn project(&self, projection: Projection) -> SwfResult<Mesh> {
        match projection {
            Projection::Flat => Ok(self.clone()),
            Projection::Sphere => {
                let vertices = self
                    .vertices
                    .iter()
                    .map(project_to_sphere)
                    .collect::<SwfResult<Vec<_>>>()?;
                Ok(Mesh {
                    vertices,
                    faces: self.faces.clone(),
                    level: self.level,
                })
            }
        }
    }

    #[inline]
    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    #[inline]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Subdivision level (0 = base)
    #[inline]
    pub fn level(&self) -> usize {
        self.level
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Corner positions of face `f`
    pub fn triangle(&self, f: usize) -> [Point3; 3] {
        let [a, b, c] = self.faces[f];
        [self.vertices[a], self.vertices[b], self.vertices[c]]
    }

    /// Unique undirected edges, deduplicated in first-encountered order
    /// (face order, then `f0-f1`, `f1-f2`, `f2-f0` within a face).
    pub fn edge_table(&self) -> EdgeTable {
        let mut index: HashMap<Edge, usize> = HashMap::with_capacity(self.faces.len() * 3 / 2);
        let mut edges = Vec::with_capacity(self.faces.len() * 3 / 2);
        let mut face_edges = Vec::with_capacity(self.faces.len());

        for &[a, b, c] in &self.faces {
            let mut ids = [0usize; 3];
            for (slot, (u, v)) in [(a, b), (b, c), (c, a)].into_iter().enumerate() {
                let edge = canonical_edge(u, v);
                ids[slot] = *index.entry(edge).or_insert_with(|| {
                    edges.push(edge);
                    edges.len() - 1
                });
            }
            face_edges.push(ids);
        }

        EdgeTable { edges, face_edges }
    }

    /// Number of unique edges
    pub fn edge_count(&self) -> usize {
        self.edge_table().edges.len()
    }

    /// `V - E + F`
    pub fn euler_characteristic(&self) -> i64 {
        self.vertex_count() as i64 - self.edge_count() as i64 + self.face_count() as i64
    }
}
