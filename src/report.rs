use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

use crate::cluster::Grain;

/// Per-grain summary in the public result schema. The orientation quaternion
/// is flattened to [x, y, z, w].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrainSummary {
    pub id: i32,
    pub size: usize,
    pub orientation: [f64; 4],
}

impl From<&Grain> for GrainSummary {
    fn from(grain: &Grain) -> Self {
        let q = grain.orientation.coords;
        Self {
            id: grain.id,
            size: grain.size,
            orientation: [q.x, q.y, q.z, q.w],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrainReport {
    pub grain_count: usize,
    pub merging_threshold: f64,
    pub grains: Vec<GrainSummary>,
}

/// Overall computation result. Serializes to
/// `{"success": true, "grain_count": ..., "merging_threshold": ..., "grains": [...]}`
/// or `{"success": false, "error": "..."}`.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Success(GrainReport),
    Failure { error: String },
}

impl AnalysisOutcome {
    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn report(&self) -> Option<&GrainReport> {
        match self {
            Self::Success(report) => Some(report),
            Self::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure { error } => Some(error),
        }
    }
}

impl Serialize for AnalysisOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Success(report) => {
                let mut s = serializer.serialize_struct("AnalysisOutcome", 4)?;
                s.serialize_field("success", &true)?;
                s.serialize_field("grain_count", &report.grain_count)?;
                s.serialize_field("merging_threshold", &report.merging_threshold)?;
                s.serialize_field("grains", &report.grains)?;
                s.end()
            }
            Self::Failure { error } => {
                let mut s = serializer.serialize_struct("AnalysisOutcome", 2)?;
                s.serialize_field("success", &false)?;
                s.serialize_field("error", error)?;
                s.end()
            }
        }
    }
}
