//! Adjacency analysis - neighbor rings from edge adjacency
//!
//! Rings are derived from walk counts: entry `(i, j)` of `adj^k` is the number
//! of walks of length `k` from `i` to `j`.
//!
//! - first ring: the edge adjacency itself
//! - second ring: `[adj^2 > 0] - adj - I`, clamped at 0
//! - third ring: `[adj^3 > 1] - second - adj - I`, clamped at 0
//!
//! The third ring requires at least two distinct walks. A vertex reached by a
//! single length-3 walk sits on the fourth ring of a regular midpoint
//! neighborhood and is left out.

use nalgebra::DMatrix;

use crate::Edge;

/// Symmetric 0/1 first-order adjacency over a mesh's vertices
#[derive(Debug, Clone, PartialEq)]
pub struct AdjacencyMatrix(DMatrix<f64>);

impl AdjacencyMatrix {
    /// Build from unique undirected edges
    pub fn from_edges(vertex_count: usize, edges: &[Edge]) -> Self {
        let mut m = DMatrix::zeros(vertex_count, vertex_count);
        for &(a, b) in edges {
            if a != b {
                m[(a, b)] = 1.0;
                m[(b, a)] = 1.0;
            }
        }
        AdjacencyMatrix(m)
    }

    /// Number of vertices covered
    #[inline]
    pub fn len(&self) -> usize {
        self.0.nrows()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.nrows() == 0
    }

    #[inline]
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.0
    }

    /// Number of neighbors of vertex `i`
    pub fn valence(&self, i: usize) -> usize {
        self.0.row(i).iter().filter(|&&x| x > 0.0).count()
    }

    /// Compute all three neighbor rings
    pub fn rings(&self) -> NeighborRings {
        NeighborRings::analyze(self)
    }
}

/// First, second and third neighbor rings of one mesh
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborRings {
    pub first: DMatrix<f64>,
    pub second: DMatrix<f64>,
    pub third: DMatrix<f64>,
}

impl NeighborRings {
    pub fn analyze(adjacency: &AdjacencyMatrix) -> Self {
        let first = adjacency.matrix().clone();
        let walks2 = &first * &first;
        let walks3 = &walks2 * &first;

        let second = ring(&walks2, 0.0, &[&first]);
        let third = ring(&walks3, 1.0, &[&second, &first]);

        NeighborRings {
            first,
            second,
            third,
        }
    }

    /// Ring matrix by order (1, 2 or 3)
    pub fn ring(&self, order: usize) -> Option<&DMatrix<f64>> {
        match order {
            1 => Some(&self.first),
            2 => Some(&self.second),
            3 => Some(&self.third),
            _ => None,
        }
    }
}

/// First-ring (edge) adjacency over `vertex_count` vertices
pub fn first_neighbors(vertex_count: usize, edges: &[Edge]) -> AdjacencyMatrix {
    AdjacencyMatrix::from_edges(vertex_count, edges)
}

/// Second-ring neighbors of a first-order adjacency matrix
pub fn second_neighbors(adj: &DMatrix<f64>) -> DMatrix<f64> {
    let walks = adj * adj;
    ring(&walks, 0.0, &[adj])
}

/// Third-ring neighbors of a first-order adjacency matrix
pub fn third_neighbors(adj: &DMatrix<f64>) -> DMatrix<f64> {
    let walks2 = adj * adj;
    let second = ring(&walks2, 0.0, &[adj]);
    let walks3 = &walks2 * adj;
    ring(&walks3, 1.0, &[&second, adj])
}

/// `[walks > threshold] - I - sum(exclude)`, clamped at 0
fn ring(walks: &DMatrix<f64>, threshold: f64, exclude: &[&DMatrix<f64>]) -> DMatrix<f64> {
    let n = walks.nrows();
    DMatrix::from_fn(n, n, |i, j| {
        let reached = if walks[(i, j)] > threshold { 1.0 } else { 0.0 };
        let own = if i == j { 1.0 } else { 0.0 };
        let shadowed: f64 = exclude.iter().map(|m| m[(i, j)]).sum();
        (reached - own - shadowed).max(0.0)
    })
}
