use nalgebra::Vector3;
use rayon::prelude::*;
use thiserror::Error;

use crate::frame::Frame;
use crate::identify::structure_types;
use crate::property::{IntProperty, PerAtomProperty, VectorProperty};

#[derive(Debug, Error)]
pub enum AdaptationError {
    /// The frame carries more positions than its stated atom count, so the
    /// position sequence cannot correspond to the frame.
    #[error("frame carries {got} positions for {expected} atoms")]
    ExcessPositions { expected: usize, got: usize },
}

/// Builds the position buffer for a frame. Entries a partially written frame
/// does not cover are zero-filled.
pub fn create_position_property(frame: &Frame) -> Result<VectorProperty, AdaptationError> {
    if frame.positions.len() > frame.atom_count {
        return Err(AdaptationError::ExcessPositions {
            expected: frame.atom_count,
            got: frame.positions.len(),
        });
    }
    let values: Vec<Vector3<f64>> = (0..frame.atom_count)
        .into_par_iter()
        .map(|atom_i| frame.positions.get(atom_i).copied().unwrap_or_else(Vector3::zeros))
        .collect();
    Ok(PerAtomProperty::from_values(values))
}

/// Zero-initialized structure-type buffer (every atom starts as OTHER).
pub fn create_structure_type_property(frame: &Frame) -> IntProperty {
    PerAtomProperty::filled(frame.atom_count, structure_types::OTHER)
}
