use log::{error, info, warn};
use std::sync::Arc;
use thiserror::Error;

use crate::adapter::{self, AdaptationError};
use crate::cluster::{
    ClusterOptions, ClusteringInput, DendrogramBuilder, GrainClusterer, GraphOptions,
};
use crate::export;
use crate::frame::Frame;
use crate::identify::{
    IdentificationContext, IdentificationMode, IdentificationSettings, ReferenceLattice,
    StructureIdentifier,
};
use crate::property::PerAtomProperty;
use crate::report::{AnalysisOutcome, GrainReport, GrainSummary};

/// Immutable per-call configuration. Independent computations may run
/// concurrently with independent configurations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentationConfig {
    pub mode: IdentificationMode,
    pub rmsd_tolerance: f64,
    pub adopt_orphan_atoms: bool,
    pub min_grain_atom_count: usize,
    pub handle_coherent_interfaces: bool,
    pub output_bonds: bool,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            mode: IdentificationMode::Ptm,
            rmsd_tolerance: 0.10,
            adopt_orphan_atoms: true,
            min_grain_atom_count: 100,
            handle_coherent_interfaces: true,
            output_bonds: false,
        }
    }
}

impl SegmentationConfig {
    pub fn with_mode(mut self, mode: IdentificationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_rmsd_tolerance(mut self, rmsd_tolerance: f64) -> Self {
        self.rmsd_tolerance = rmsd_tolerance;
        self
    }

    pub fn with_adopt_orphan_atoms(mut self, adopt: bool) -> Self {
        self.adopt_orphan_atoms = adopt;
        self
    }

    pub fn with_min_grain_atom_count(mut self, count: usize) -> Self {
        self.min_grain_atom_count = count;
        self
    }

    pub fn with_handle_coherent_interfaces(mut self, handle: bool) -> Self {
        self.handle_coherent_interfaces = handle;
        self
    }

    pub fn with_output_bonds(mut self, output_bonds: bool) -> Self {
        self.output_bonds = output_bonds;
        self
    }

    fn identification_settings(&self) -> IdentificationSettings {
        IdentificationSettings {
            mode: self.mode,
            rmsd_tolerance: self.rmsd_tolerance,
        }
    }
}

#[derive(Debug, Error)]
pub enum SegmentationError {
    #[error("Invalid number of atoms")]
    InvalidAtomCount,
    #[error("Failed to create position property")]
    Adaptation(#[from] AdaptationError),
    #[error("No output filename specified")]
    MissingOutputTarget,
    #[error("Grain segmentation requires PTM mode with orientation output enabled.")]
    OrientationDataUnavailable,
    #[error("Structure identification failed: {0}")]
    Identification(String),
    #[error("Grain segmentation failed: {0}")]
    Segmentation(String),
}

/// Sequences identification and the two clustering stages over one frame and
/// exports the aggregated result.
pub struct GrainSegmentation<I, B, C> {
    identifier: I,
    dendrogram_builder: B,
    grain_clusterer: C,
}

impl<I, B, C> GrainSegmentation<I, B, C>
where
    I: StructureIdentifier,
    B: DendrogramBuilder,
    C: GrainClusterer,
{
    pub fn new(identifier: I, dendrogram_builder: B, grain_clusterer: C) -> Self {
        Self {
            identifier,
            dendrogram_builder,
            grain_clusterer,
        }
    }

    /// Runs the full pipeline on one frame. Never returns an error: every
    /// failure is folded into the failure-shaped outcome here, exactly once.
    pub fn compute(
        &self,
        frame: &Frame,
        config: &SegmentationConfig,
        output_prefix: &str,
    ) -> AnalysisOutcome {
        match self.run(frame, config, output_prefix) {
            Ok(report) => AnalysisOutcome::Success(report),
            Err(e) => {
                error!("{e}");
                AnalysisOutcome::failure(e.to_string())
            }
        }
    }

    fn run(
        &self,
        frame: &Frame,
        config: &SegmentationConfig,
        output_prefix: &str,
    ) -> Result<GrainReport, SegmentationError> {
        if frame.atom_count == 0 {
            return Err(SegmentationError::InvalidAtomCount);
        }

        let positions = adapter::create_position_property(frame)?;
        let structure_types = adapter::create_structure_type_property(frame);

        let mut context = IdentificationContext::new(
            &positions,
            &frame.cell,
            ReferenceLattice::default(),
            structure_types,
        );
        self.identifier
            .identify(&mut context, &config.identification_settings())
            .map_err(|e| SegmentationError::Identification(e.to_string()))?;

        let extracted_types = context.structure_types().to_vec();

        if output_prefix.is_empty() {
            return Err(SegmentationError::MissingOutputTarget);
        }

        if !config.mode.supports_orientation() {
            warn!("Identification mode has no orientation output; auxiliary structure data will not be exported");
        }

        self.segment(frame, &context, extracted_types, config, output_prefix)
    }

    fn segment(
        &self,
        frame: &Frame,
        context: &IdentificationContext<'_>,
        structure_types: Vec<i32>,
        config: &SegmentationConfig,
        output_prefix: &str,
    ) -> Result<GrainReport, SegmentationError> {
        info!("Starting grain segmentation analysis...");
        let orientation = context
            .orientation_output()
            .ok_or(SegmentationError::OrientationDataUnavailable)?;

        // Independently owned copies: the clustering stages may hold these
        // buffers past the identification context's lifetime.
        let input = ClusteringInput {
            positions: Arc::new(context.positions().clone()),
            structure_types: Arc::new(PerAtomProperty::from_values(structure_types)),
            orientations: Arc::new(orientation.orientations.clone()),
            correspondences: Arc::new(orientation.correspondences.clone()),
            cell: context.cell().clone(),
        };

        info!("Building neighbor graph and dendrogram...");
        let graph_options = GraphOptions {
            handle_coherent_interfaces: config.handle_coherent_interfaces,
            output_bonds: config.output_bonds,
        };
        let graph = self
            .dendrogram_builder
            .build(input, &graph_options)
            .map_err(|e| SegmentationError::Segmentation(e.to_string()))?;
        info!("Dendrogram size: {}", graph.dendrogram.len());
        info!(
            "Suggested merging threshold: {:.4}",
            graph.suggested_threshold
        );

        info!("Clustering atoms into grains...");
        let cluster_options = ClusterOptions {
            adopt_orphan_atoms: config.adopt_orphan_atoms,
            min_grain_atom_count: config.min_grain_atom_count,
            single_cut: true,
        };
        let partition = self
            .grain_clusterer
            .cluster(&graph, &cluster_options)
            .map_err(|e| SegmentationError::Segmentation(e.to_string()))?;
        info!("Found {} grains", partition.grain_count());

        if partition.atom_grain_ids.len() != frame.atom_count {
            return Err(SegmentationError::Segmentation(format!(
                "grain assignment covers {} of {} atoms",
                partition.atom_grain_ids.len(),
                frame.atom_count
            )));
        }

        let report = GrainReport {
            grain_count: partition.grain_count(),
            merging_threshold: graph.suggested_threshold,
            grains: partition.grains.iter().map(GrainSummary::from).collect(),
        };

        export::write_grain_documents(
            output_prefix,
            &AnalysisOutcome::Success(report.clone()),
            &graph.input.positions,
            &partition.atom_grain_ids,
        );

        Ok(report)
    }
}
