use anyhow::{ensure, Result};
use nalgebra::Matrix3;

use crate::frame::SimulationCell;
use crate::property::{Int64Property, IntProperty, QuaternionProperty, VectorProperty};

/// Structure type codes written by the identification collaborator.
pub mod structure_types {
    pub const OTHER: i32 = 0;
    pub const FCC: i32 = 1;
    pub const HCP: i32 = 2;
    pub const BCC: i32 = 3;
    pub const ICO: i32 = 4;
    pub const SC: i32 = 5;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentificationMode {
    /// Polyhedral template matching; the only mode with orientation output.
    Ptm,
    CommonNeighborAnalysis,
}

impl IdentificationMode {
    pub fn supports_orientation(self) -> bool {
        matches!(self, Self::Ptm)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdentificationSettings {
    pub mode: IdentificationMode,
    /// RMSD acceptance tolerance for template matches.
    pub rmsd_tolerance: f64,
}

impl Default for IdentificationSettings {
    fn default() -> Self {
        Self {
            mode: IdentificationMode::Ptm,
            rmsd_tolerance: 0.10,
        }
    }
}

/// Reference lattice handed to the identification collaborator. The pipeline
/// supplies a default and does not interpret it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReferenceLattice {
    Fcc,
    #[default]
    Bcc,
    Hcp,
}

/// Per-atom orientation quaternions together with the encoded
/// atom-to-template correspondences. The two buffers are only ever attached
/// to a context as a pair.
#[derive(Debug, Clone, PartialEq)]
pub struct OrientationOutput {
    pub orientations: QuaternionProperty,
    pub correspondences: Int64Property,
}

/// Wraps the inputs and outputs of one structure identification run.
pub struct IdentificationContext<'a> {
    positions: &'a VectorProperty,
    cell: &'a SimulationCell,
    reference_lattice: ReferenceLattice,
    preferred_orientations: Vec<Matrix3<f64>>,
    structure_types: IntProperty,
    orientation_output: Option<OrientationOutput>,
}

impl<'a> IdentificationContext<'a> {
    pub fn new(
        positions: &'a VectorProperty,
        cell: &'a SimulationCell,
        reference_lattice: ReferenceLattice,
        structure_types: IntProperty,
    ) -> Self {
        Self {
            positions,
            cell,
            reference_lattice,
            preferred_orientations: vec![Matrix3::identity()],
            structure_types,
            orientation_output: None,
        }
    }

    pub fn positions(&self) -> &'a VectorProperty {
        self.positions
    }

    pub fn cell(&self) -> &'a SimulationCell {
        self.cell
    }

    pub fn reference_lattice(&self) -> ReferenceLattice {
        self.reference_lattice
    }

    pub fn preferred_orientations(&self) -> &[Matrix3<f64>] {
        &self.preferred_orientations
    }

    pub fn structure_types(&self) -> &IntProperty {
        &self.structure_types
    }

    pub fn structure_types_mut(&mut self) -> &mut IntProperty {
        &mut self.structure_types
    }

    pub fn orientation_output(&self) -> Option<&OrientationOutput> {
        self.orientation_output.as_ref()
    }

    /// Attaches orientation data produced by an orientation-capable
    /// identification run. Both buffers must cover every atom.
    pub fn set_orientation_output(&mut self, output: OrientationOutput) -> Result<()> {
        ensure!(
            output.orientations.len() == self.positions.len()
                && output.correspondences.len() == self.positions.len(),
            "orientation buffers must cover {} atoms",
            self.positions.len()
        );
        self.orientation_output = Some(output);
        Ok(())
    }
}

/// Structure identification collaborator. On success the structure-type
/// buffer is populated and, in orientation-capable mode, the orientation
/// output is attached to the context.
pub trait StructureIdentifier {
    fn identify(
        &self,
        context: &mut IdentificationContext<'_>,
        settings: &IdentificationSettings,
    ) -> Result<()>;
}
