//! Named base layouts
//!
//! A closed registry of loudspeaker/virtual-source layouts used as level-0
//! meshes, each with the lifting coefficients tuned for it. Any other layout
//! goes through [`BaseMesh::Custom`].

use serde::{Deserialize, Serialize};
use swf_core::{LiftingCoefficients, Point3, Projection, SphericalCoord, SwfResult};

use crate::{Face, Mesh};

/// Built-in base layouts, serialized by their short names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BasePreset {
    /// Regular octahedron: 6 vertices on the axes, 8 faces
    #[serde(rename = "OCT", alias = "oct")]
    Octahedron,
    /// Three horizontal sources at 0°, 120°, 240° plus zenith
    #[serde(rename = "3.0.1")]
    Layout301,
    /// Seven horizontal sources plus four elevated at 45°
    #[serde(rename = "7.0.4")]
    Layout704,
}

const OCTAHEDRON_FACES: [Face; 8] = [
    [1, 2, 4],
    [1, 3, 4],
    [3, 0, 4],
    [0, 2, 4],
    [1, 3, 5],
    [3, 0, 5],
    [0, 2, 5],
    [2, 1, 5],
];

const LAYOUT_301_FACES: [Face; 3] = [[0, 1, 3], [1, 2, 3], [2, 0, 3]];

/// (azimuth, colatitude) in degrees
const LAYOUT_704_DIRECTIONS: [(f64, f64); 11] = [
    (0.0, 90.0),
    (30.0, 90.0),
    (-30.0, 90.0),
    (90.0, 90.0),
    (-90.0, 90.0),
    (135.0, 90.0),
    (-135.0, 90.0),
    (45.0, 45.0),
    (-45.0, 45.0),
    (135.0, 45.0),
    (-135.0, 45.0),
];

const LAYOUT_704_FACES: [Face; 13] = [
    [6, 4, 10],
    [10, 4, 8],
    [8, 4, 2],
    [8, 2, 0],
    [8, 7, 0],
    [7, 0, 1],
    [7, 1, 3],
    [7, 3, 9],
    [9, 3, 5],
    [10, 7, 9],
    [10, 8, 7],
    [10, 6, 5],
    [10, 9, 5],
];

impl BasePreset {
    /// All presets in order
    pub fn all() -> &'static [BasePreset] {
        &[
            BasePreset::Octahedron,
            BasePreset::Layout301,
            BasePreset::Layout704,
        ]
    }

    /// Short layout name
    pub fn name(&self) -> &'static str {
        match self {
            BasePreset::Octahedron => "OCT",
            BasePreset::Layout301 => "3.0.1",
            BasePreset::Layout704 => "7.0.4",
        }
    }

    /// Raw (unprojected) level-0 mesh
    pub fn raw_mesh(&self) -> SwfResult<Mesh> {
        match self {
            BasePreset::Octahedron => Mesh::new(
                vec![
                    Point3::new(1.0, 0.0, 0.0),
                    Point3::new(-1.0, 0.0, 0.0),
                    Point3::new(0.0, 1.0, 0.0),
                    Point3::new(0.0, -1.0, 0.0),
                    Point3::new(0.0, 0.0, 1.0),
                    Point3::new(0.0, 0.0, -1.0),
                ],
                OCTAHEDRON_FACES.to_vec(),
            ),
            BasePreset::Layout301 => {
                let half_root3 = 3f64.sqrt() / 2.0;
                Mesh::new(
                    vec![
                        Point3::new(1.0, 0.0, 0.0),
                        Point3::new(-0.5, half_root3, 0.0),
                        Point3::new(-0.5, -half_root3, 0.0),
                        Point3::new(0.0, 0.0, 1.0),
                    ],
                    LAYOUT_301_FACES.to_vec(),
                )
            }
            BasePreset::Layout704 => Mesh::new(
                LAYOUT_704_DIRECTIONS
                    .iter()
                    .map(|&(az, col)| SphericalCoord::from_degrees(az, col).to_cartesian())
                    .collect(),
                LAYOUT_704_FACES.to_vec(),
            ),
        }
    }

    /// Level-0 mesh under the given projection
    pub fn mesh(&self, projection: Projection) -> SwfResult<Mesh> {
        self.raw_mesh()?.project(projection)
    }

    /// Lifting coefficients tuned for this layout
    pub fn tuned_coefficients(&self) -> SwfResult<LiftingCoefficients> {
        match self {
            BasePreset::Octahedron => LiftingCoefficients::new(0.609151, -0.015081, -0.047035),
            BasePreset::Layout301 => LiftingCoefficients::new(0.599363, 0.033933, -0.066648),
            BasePreset::Layout704 => LiftingCoefficients::new(0.546418, 0.036781, -0.0416),
        }
    }
}

/// Level-0 mesh source: a named preset or a caller-supplied mesh
#[derive(Debug, Clone, PartialEq)]
pub enum BaseMesh {
    Preset(BasePreset),
    Custom(Mesh),
}

impl BaseMesh {
    /// Resolve to a concrete level-0 mesh
    pub fn resolve(&self, projection: Projection) -> SwfResult<Mesh> {
        match self {
            BaseMesh::Preset(preset) => preset.mesh(projection),
            BaseMesh::Custom(mesh) => mesh.project(projection),
        }
    }
}

impl From<BasePreset> for BaseMesh {
    fn from(preset: BasePreset) -> Self {
        BaseMesh::Preset(preset)
    }
}

impl From<Mesh> for BaseMesh {
    fn from(mesh: Mesh) -> Self {
        BaseMesh::Custom(mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_valid_and_unit() {
        for preset in BasePreset::all() {
            let mesh = preset.mesh(Projection::Sphere).unwrap();
            assert_eq!(mesh.level(), 0);
            for v in mesh.vertices() {
                assert!((v.norm() - 1.0).abs() < 1e-12, "{}", preset.name());
            }
            assert!(preset.tuned_coefficients().is_ok(), "{}", preset.name());
        }
    }

    #[test]
    fn test_preset_sizes() {
        let oct = BasePreset::Octahedron.raw_mesh().unwrap();
        assert_eq!((oct.vertex_count(), oct.face_count(), oct.edge_count()), (6, 8, 12));

        let l301 = BasePreset::Layout301.raw_mesh().unwrap();
        assert_eq!((l301.vertex_count(), l301.face_count()), (4, 3));

        let l704 = BasePreset::Layout704.raw_mesh().unwrap();
        assert_eq!((l704.vertex_count(), l704.face_count()), (11, 13));
    }

    #[test]
    fn test_layout704_horizontal_ring() {
        let mesh = BasePreset::Layout704.raw_mesh().unwrap();
        assert!(mesh.vertices()[..7].iter().all(|v| v.z.abs() < 1e-12));
        assert!(mesh.vertices()[7..].iter().all(|v| v.z > 0.7));
    }

    #[test]
    fn test_custom_base_resolves() {
        let raw = Mesh::new(
            vec![
                Point3::new(2.0, 0.0, 0.0),
                Point3::new(0.0, 3.0, 0.0),
                Point3::new(0.0, 0.0, 4.0),
            ],
            vec![[0, 1, 2]],
        )
        .unwrap();
        let base = BaseMesh::from(raw.clone());
        assert_eq!(base.resolve(Projection::Flat).unwrap(), raw);
        let unit = base.resolve(Projection::Sphere).unwrap();
        assert_eq!(unit.vertices()[2], Point3::z());
    }

    #[test]
    fn test_preset_serde_names() {
        for preset in BasePreset::all() {
            let json = serde_json::to_string(preset).unwrap();
            assert_eq!(json, format!("\"{}\"", preset.name()));
            assert_eq!(serde_json::from_str::<BasePreset>(&json).unwrap(), *preset);
        }
        assert_eq!(
            serde_json::from_str::<BasePreset>("\"oct\"").unwrap(),
            BasePreset::Octahedron
        );
        assert!(serde_json::from_str::<BasePreset>("\"5.1\"").is_err());
    }
}
