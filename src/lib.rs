mod adapter;
mod cluster;
mod export;
mod frame;
mod identify;
mod property;
mod report;
mod segmentation;

pub use adapter::{create_position_property, create_structure_type_property, AdaptationError};
pub use cluster::{
    ClusterOptions, ClusteringInput, Dendrogram, DendrogramBuilder, DendrogramOutput, Grain,
    GrainClusterer, GrainPartition, GraphOptions, MergeStep,
};
pub use export::{atoms_path, grain_label, meta_path, write_grain_documents};
pub use frame::{Frame, SimulationCell};
pub use identify::{
    structure_types, IdentificationContext, IdentificationMode, IdentificationSettings,
    OrientationOutput, ReferenceLattice, StructureIdentifier,
};
pub use property::{Int64Property, IntProperty, PerAtomProperty, QuaternionProperty, VectorProperty};
pub use report::{AnalysisOutcome, GrainReport, GrainSummary};
pub use segmentation::{GrainSegmentation, SegmentationConfig, SegmentationError};
