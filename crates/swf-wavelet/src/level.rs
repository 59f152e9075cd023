//! Levels of a model's mesh chain

use swf_mesh::Mesh;

use crate::FilterBank;

/// A refined mesh and the filters that split it into its parent's vertices
/// (coarse block) and the midpoints (detail block)
#[derive(Debug, Clone, PartialEq)]
pub struct SubdividedLevel {
    mesh: Mesh,
    filters: FilterBank,
}

impl SubdividedLevel {
    pub fn new(mesh: Mesh, filters: FilterBank) -> Self {
        Self { mesh, filters }
    }

    #[inline]
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    #[inline]
    pub fn filters(&self) -> &FilterBank {
        &self.filters
    }
}

/// One entry of the chain: the base mesh carries only topology, every later
/// level carries its filters
#[derive(Debug, Clone, PartialEq)]
pub enum Level {
    Base(Mesh),
    Subdivided(SubdividedLevel),
}

impl Level {
    pub fn mesh(&self) -> &Mesh {
        match self {
            Level::Base(mesh) => mesh,
            Level::Subdivided(level) => level.mesh(),
        }
    }

    pub fn filters(&self) -> Option<&FilterBank> {
        match self {
            Level::Base(_) => None,
            Level::Subdivided(level) => Some(level.filters()),
        }
    }

    /// Subdivision level of the mesh (0 = base)
    pub fn index(&self) -> usize {
        self.mesh().level()
    }

    pub fn is_base(&self) -> bool {
        matches!(self, Level::Base(_))
    }
}
