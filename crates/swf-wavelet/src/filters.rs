//! Lifting filter construction
//!
//! Every level starts from the trivial split of its own vertex set,
//! `P0 = [I; 0]`, `Q0 = [0; I]`, `A0 = P0ᵀ`, `B0 = Q0ᵀ`, and lifts it with:
//!
//! - prediction `S` (detail × coarse): `lambda` times the detail-to-coarse
//!   edge adjacency
//! - update `T` (coarse × detail): for each detail vertex, `2a`, `2b` and `4c`
//!   spread evenly over its coarse neighbors on rings 1, 2 and 3
//!
//! Spreading by the actual ring size absorbs irregular valence. With
//! `2a + 2b + 4c = 1` each column of `T` sums to one whenever all three rings
//! of its detail vertex are populated.

use nalgebra::{DMatrix, DMatrixView};
use swf_core::{LiftingCoefficients, LiftingVariant, SwfError, SwfResult};
use swf_mesh::AdjacencyMatrix;

/// Nominal ring sizes of a midpoint vertex on a regular mesh
pub const RING_MULTIPLIERS: [f64; 3] = [2.0, 2.0, 4.0];

/// The four filters of one subdivision level
#[derive(Debug, Clone, PartialEq)]
pub struct FilterBank {
    /// Coarse synthesis (fine × coarse)
    pub p: DMatrix<f64>,
    /// Detail synthesis (fine × detail)
    pub q: DMatrix<f64>,
    /// Coarse analysis (coarse × fine)
    pub a: DMatrix<f64>,
    /// Detail analysis (detail × fine)
    pub b: DMatrix<f64>,
}

impl FilterBank {
    /// Un-lifted split of `coarse + detail` vertices
    pub fn trivial(coarse: usize, detail: usize) -> Self {
        let fine = coarse + detail;
        let mut p = DMatrix::zeros(fine, coarse);
        p.view_mut((0, 0), (coarse, coarse)).fill_with_identity();
        let mut q = DMatrix::zeros(fine, detail);
        q.view_mut((coarse, 0), (detail, detail)).fill_with_identity();
        let a = p.transpose();
        let b = q.transpose();
        FilterBank { p, q, a, b }
    }

    #[inline]
    pub fn coarse_count(&self) -> usize {
        self.p.ncols()
    }

    #[inline]
    pub fn detail_count(&self) -> usize {
        self.q.ncols()
    }

    #[inline]
    pub fn fine_count(&self) -> usize {
        self.p.nrows()
    }

    /// Largest entry deviation of `A·P`, `B·Q`, `A·Q`, `B·P` from `I`, `I`, `0`, `0`
    pub fn biorthogonality_error(&self) -> f64 {
        let n = self.coarse_count();
        let m = self.detail_count();
        let ap = &self.a * &self.p - DMatrix::<f64>::identity(n, n);
        let bq = &self.b * &self.q - DMatrix::<f64>::identity(m, m);
        let aq = &self.a * &self.q;
        let bp = &self.b * &self.p;
        [ap.amax(), bq.amax(), aq.amax(), bp.amax()]
            .into_iter()
            .fold(0.0, f64::max)
    }
}

/// Prediction and update operators of one level
#[derive(Debug, Clone, PartialEq)]
pub struct LiftingOperators {
    /// `S` (detail × coarse)
    pub prediction: DMatrix<f64>,
    /// `T` (coarse × detail)
    pub update: DMatrix<f64>,
}

/// Builds lifted filters from a level's adjacency
#[derive(Debug, Clone, Copy)]
pub struct LiftingFilterBuilder {
    coefficients: LiftingCoefficients,
    variant: LiftingVariant,
}

impl LiftingFilterBuilder {
    pub fn new(coefficients: LiftingCoefficients, variant: LiftingVariant) -> Self {
        Self {
            coefficients,
            variant,
        }
    }

    pub fn coefficients(&self) -> &LiftingCoefficients {
        &self.coefficients
    }

    pub fn variant(&self) -> LiftingVariant {
        self.variant
    }

    /// Filters for a refined vertex set whose first `coarse_count` vertices
    /// are the parent level's vertices
    pub fn build(&self, adjacency: &AdjacencyMatrix, coarse_count: usize) -> SwfResult<FilterBank> {
        let ops = self.operators(adjacency, coarse_count)?;
        let trivial = FilterBank::trivial(coarse_count, adjacency.len() - coarse_count);
        Ok(self.lift(&trivial, &ops))
    }

    /// Prediction and update operators for the given split
    pub fn operators(
        &self,
        adjacency: &AdjacencyMatrix,
        coarse_count: usize,
    ) -> SwfResult<LiftingOperators> {
        let fine = adjacency.len();
        if coarse_count > fine {
            return Err(SwfError::DimensionMismatch {
                expected: fine,
                actual: coarse_count,
            });
        }
        let n = coarse_count;
        let m = fine - n;
        let rings = adjacency.rings();

        let prediction = rings.first.view((n, 0), (m, n)) * self.coefficients.lambda();

        let c = &self.coefficients;
        let ring_weights = [c.alpha(), c.beta(), c.gamma()];
        let mut update = DMatrix::zeros(n, m);
        for ((ring, weight), multiplier) in [&rings.first, &rings.second, &rings.third]
            .into_iter()
            .zip(ring_weights)
            .zip(RING_MULTIPLIERS)
        {
            accumulate_ring(
                &mut update,
                ring.view((0, n), (n, m)),
                ring.view((n, 0), (m, n)),
                multiplier * weight,
            );
        }

        Ok(LiftingOperators { prediction, update })
    }

    /// Apply the configured lifting formula to a trivial split
    pub fn lift(&self, trivial: &FilterBank, ops: &LiftingOperators) -> FilterBank {
        let FilterBank {
            p: p0,
            q: q0,
            a: a0,
            b: b0,
        } = trivial;
        let s = &ops.prediction;
        let t = &ops.update;
        let n = trivial.coarse_count();
        let m = trivial.detail_count();
        let i_n = DMatrix::<f64>::identity(n, n);
        let i_m = DMatrix::<f64>::identity(m, m);
        let ts = t * s;
        let st = s * t;

        match self.variant {
            LiftingVariant::Classical => FilterBank {
                p: p0 + q0 * s,
                q: q0 * (&i_m - &st) - p0 * t,
                a: (&i_n - &ts) * a0 + t * b0,
                b: b0 - s * a0,
            },
            LiftingVariant::Modified => FilterBank {
                p: q0 * s + p0 * (&i_n - &ts),
                q: q0 - p0 * t,
                a: a0 + t * b0,
                b: (&i_m - &st) * b0 - s * a0,
            },
        }
    }
}

/// Add `total / count(j)` to every coarse ring neighbor of detail vertex `j`,
/// where `count(j)` is the ring size seen from `j`. Empty rings add nothing.
fn accumulate_ring(
    update: &mut DMatrix<f64>,
    coarse_to_detail: DMatrixView<'_, f64>,
    detail_to_coarse: DMatrixView<'_, f64>,
    total: f64,
) {
    for (j, row) in detail_to_coarse.row_iter().enumerate() {
        let count: f64 = row.sum();
        if count <= 0.0 {
            continue;
        }
        let share = total / count;
        for i in 0..update.nrows() {
            let link = coarse_to_detail[(i, j)];
            if link > 0.0 {
                update[(i, j)] += share * link;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use swf_core::{Point3, Projection};
    use swf_mesh::{subdivide, BasePreset, Mesh, Subdivision};

    const TOL: f64 = 1e-9;

    fn octahedron_level(levels: usize) -> Subdivision {
        let mut mesh = BasePreset::Octahedron.mesh(Projection::Sphere).unwrap();
        let mut sub = subdivide(&mesh, Projection::Sphere).unwrap();
        for _ in 1..levels {
            mesh = sub.mesh.clone();
            sub = subdivide(&mesh, Projection::Sphere).unwrap();
        }
        sub
    }

    #[test]
    fn test_trivial_split_is_biorthogonal() {
        let bank = FilterBank::trivial(4, 7);
        assert_eq!(bank.fine_count(), 11);
        assert_eq!(bank.biorthogonality_error(), 0.0);
        assert_eq!(bank.p[(3, 3)], 1.0);
        assert_eq!(bank.q[(4, 0)], 1.0);
    }

    #[test]
    fn test_filter_shapes() {
        let sub = octahedron_level(1);
        let builder = LiftingFilterBuilder::new(LiftingCoefficients::default(), LiftingVariant::Modified);
        let bank = builder.build(&sub.adjacency, sub.coarse_count).unwrap();

        assert_eq!(bank.p.shape(), (18, 6));
        assert_eq!(bank.q.shape(), (18, 12));
        assert_eq!(bank.a.shape(), (6, 18));
        assert_eq!(bank.b.shape(), (12, 18));
    }

    #[test]
    fn test_both_variants_biorthogonal() {
        for levels in 1..=2 {
            let sub = octahedron_level(levels);
            for variant in [LiftingVariant::Classical, LiftingVariant::Modified] {
                let builder = LiftingFilterBuilder::new(LiftingCoefficients::default(), variant);
                let bank = builder.build(&sub.adjacency, sub.coarse_count).unwrap();
                let err = bank.biorthogonality_error();
                assert!(err < TOL, "{variant:?} level {levels}: {err}");
            }
        }
    }

    #[test]
    fn test_prediction_uses_lambda() {
        let sub = octahedron_level(1);
        let coefficients = LiftingCoefficients::default().with_prediction(0.25);
        let builder = LiftingFilterBuilder::new(coefficients, LiftingVariant::Modified);
        let ops = builder.operators(&sub.adjacency, sub.coarse_count).unwrap();

        assert_eq!(ops.prediction.shape(), (12, 6));
        // Each midpoint predicts from its two edge endpoints
        for row in ops.prediction.row_iter() {
            assert!((row.sum() - 0.5).abs() < 1e-15);
        }
    }

    #[test]
    fn test_update_columns_partition_unity() {
        let sub = octahedron_level(1);
        let coefficients = LiftingCoefficients::new(0.4, 0.2, -0.05).unwrap();
        let builder = LiftingFilterBuilder::new(coefficients, LiftingVariant::Modified);
        let ops = builder.operators(&sub.adjacency, sub.coarse_count).unwrap();

        for (j, col) in ops.update.column_iter().enumerate() {
            assert!((col.sum() - 1.0).abs() < 1e-12, "column {j}: {}", col.sum());
        }
    }

    #[test]
    fn test_empty_rings_contribute_nothing() {
        // A lone flat triangle: midpoints have no third-ring coarse neighbors
        let mesh = Mesh::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        )
        .unwrap();
        let sub = subdivide(&mesh, Projection::Flat).unwrap();
        let builder = LiftingFilterBuilder::new(LiftingCoefficients::default(), LiftingVariant::Modified);
        let ops = builder.operators(&sub.adjacency, sub.coarse_count).unwrap();

        assert!(ops.update.iter().all(|x| x.is_finite()));
        let bank = builder.lift(&FilterBank::trivial(3, 3), &ops);
        assert!(bank.biorthogonality_error() < TOL);
    }

    fn block_error(block: DMatrixView<'_, f64>, expected: &DMatrix<f64>) -> f64 {
        (block.clone_owned() - expected).amax()
    }

    #[test]
    fn test_variant_block_structure() {
        let sub = octahedron_level(1);
        let (n, m) = (sub.coarse_count, sub.detail_count());
        let coefficients = LiftingCoefficients::new(0.4, 0.2, -0.05).unwrap();
        let classical = LiftingFilterBuilder::new(coefficients, LiftingVariant::Classical);
        let modified = LiftingFilterBuilder::new(coefficients, LiftingVariant::Modified);
        let ops = classical.operators(&sub.adjacency, n).unwrap();
        let (s, t) = (&ops.prediction, &ops.update);
        let i_n = DMatrix::<f64>::identity(n, n);
        let i_m = DMatrix::<f64>::identity(m, m);

        // Classical predicts first: P = [I; S], B = [-S | I]
        let c = classical.build(&sub.adjacency, n).unwrap();
        assert!(block_error(c.p.view((0, 0), (n, n)), &i_n) < 1e-15);
        assert!(block_error(c.p.view((n, 0), (m, n)), s) < 1e-15);
        assert!(block_error(c.b.view((0, 0), (m, n)), &-s) < 1e-15);
        assert!(block_error(c.b.view((0, n), (m, m)), &i_m) < 1e-15);

        // Modified updates first: Q = [-T; I], A = [I | T]
        let d = modified.build(&sub.adjacency, n).unwrap();
        assert!(block_error(d.q.view((0, 0), (n, m)), &-t) < 1e-15);
        assert!(block_error(d.q.view((n, 0), (m, m)), &i_m) < 1e-15);
        assert!(block_error(d.a.view((0, 0), (n, n)), &i_n) < 1e-15);
        assert!(block_error(d.a.view((0, n), (n, m)), t) < 1e-15);

        assert!((&c.p - &d.p).amax() > 1e-3);
        assert!((&c.a - &d.a).amax() > 1e-3);
    }

    #[test]
    fn test_coarse_count_too_large() {
        let sub = octahedron_level(1);
        let builder = LiftingFilterBuilder::new(LiftingCoefficients::default(), LiftingVariant::Modified);
        assert!(builder.operators(&sub.adjacency, 19).is_err());
    }

    proptest! {
        #[test]
        fn prop_lifting_stays_biorthogonal(
            alpha in -1.0f64..1.0,
            beta in -1.0f64..1.0,
            lambda in 0.0f64..1.0,
            classical in any::<bool>(),
        ) {
            let sub = octahedron_level(1);
            let coefficients = LiftingCoefficients::from_free(alpha, beta)
                .unwrap()
                .with_prediction(lambda);
            let variant = if classical {
                LiftingVariant::Classical
            } else {
                LiftingVariant::Modified
            };
            let bank = LiftingFilterBuilder::new(coefficients, variant)
                .build(&sub.adjacency, sub.coarse_count)
                .unwrap();
            prop_assert!(bank.biorthogonality_error() < TOL);
        }
    }
}
