use anyhow::Result;
use nalgebra::Quaternion;
use std::sync::Arc;

use crate::frame::SimulationCell;
use crate::property::{Int64Property, IntProperty, QuaternionProperty, VectorProperty};

/// Read-only per-atom buffers shared with the clustering collaborators for
/// the duration of one computation. The buffers are independently owned
/// copies; a collaborator may hold its `Arc` clones past the identification
/// context's lifetime.
#[derive(Clone)]
pub struct ClusteringInput {
    pub positions: Arc<VectorProperty>,
    pub structure_types: Arc<IntProperty>,
    pub orientations: Arc<QuaternionProperty>,
    pub correspondences: Arc<Int64Property>,
    pub cell: SimulationCell,
}

impl ClusteringInput {
    pub fn atom_count(&self) -> usize {
        self.positions.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeStep {
    pub parent_a: usize,
    pub parent_b: usize,
    /// Misorientation distance at which the two clusters merge.
    pub distance: f64,
}

/// Hierarchical merge sequence over the neighbor graph, ordered by
/// non-decreasing distance. Opaque to the pipeline apart from its length.
#[derive(Debug, Clone, Default)]
pub struct Dendrogram {
    steps: Vec<MergeStep>,
}

impl Dendrogram {
    pub fn new(steps: Vec<MergeStep>) -> Self {
        debug_assert!(steps.windows(2).all(|w| w[0].distance <= w[1].distance));
        Self { steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[MergeStep] {
        &self.steps
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphOptions {
    /// Merge coherent (twin / stacking-fault) interfaces instead of treating
    /// them as ordinary grain boundaries.
    pub handle_coherent_interfaces: bool,
    /// Additionally produce the auxiliary neighbor-bond listing.
    pub output_bonds: bool,
}

/// Everything the dendrogram construction stage hands over: the input handle
/// it was given, the merge sequence, the threshold it suggests for the
/// connectivity cut, and (on request) the neighbor-bond listing.
pub struct DendrogramOutput {
    pub input: ClusteringInput,
    pub dendrogram: Dendrogram,
    pub suggested_threshold: f64,
    pub bonds: Option<Vec<(u32, u32)>>,
}

/// Stage 1: builds the neighbor graph and the hierarchical merge sequence.
pub trait DendrogramBuilder {
    fn build(&self, input: ClusteringInput, options: &GraphOptions) -> Result<DendrogramOutput>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterOptions {
    /// Reassign atoms outside any sufficiently sized grain to the nearest
    /// neighboring grain instead of leaving them unassigned.
    pub adopt_orphan_atoms: bool,
    /// Components smaller than this are folded into "unassigned".
    pub min_grain_atom_count: usize,
    /// Cut the dendrogram exactly once at the suggested threshold.
    pub single_cut: bool,
}

/// One segmentation unit. Id 0 is reserved for "unassigned/orphan"; grains
/// are produced once per computation and immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Grain {
    pub id: i32,
    pub size: usize,
    pub orientation: Quaternion<f64>,
}

/// Final per-atom grain assignment plus the per-grain summaries. The
/// assignment buffer is a total partition: every atom carries a grain id,
/// with 0 meaning unassigned.
pub struct GrainPartition {
    pub grains: Vec<Grain>,
    pub atom_grain_ids: IntProperty,
}

impl GrainPartition {
    pub fn grain_count(&self) -> usize {
        self.grains.len()
    }
}

/// Stage 2: cuts the dendrogram into connected components, filters by
/// minimum grain size and adopts orphan atoms. Never mutates stage 1's
/// output.
pub trait GrainClusterer {
    fn cluster(&self, graph: &DendrogramOutput, options: &ClusterOptions)
        -> Result<GrainPartition>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::PerAtomProperty;

    #[test]
    fn test_dendrogram_len() {
        let dendrogram = Dendrogram::new(vec![
            MergeStep {
                parent_a: 0,
                parent_b: 1,
                distance: 0.0,
            },
            MergeStep {
                parent_a: 1,
                parent_b: 2,
                distance: 0.5,
            },
        ]);
        assert_eq!(dendrogram.len(), 2);
        assert!(!dendrogram.is_empty());
        assert_eq!(dendrogram.steps()[1].distance, 0.5);
        assert!(Dendrogram::default().is_empty());
    }

    #[test]
    fn test_grain_count() {
        let partition = GrainPartition {
            grains: vec![Grain {
                id: 1,
                size: 3,
                orientation: Quaternion::identity(),
            }],
            atom_grain_ids: PerAtomProperty::from_values(vec![1, 1, 1, 0]),
        };
        assert_eq!(partition.grain_count(), 1);
    }
}
