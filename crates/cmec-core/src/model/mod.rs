//! Modelo de datos del bundle (RunMetadata, MetricResult, PlotArtifact, OutputBundle).

pub mod artifact;
pub mod bundle;
pub mod metadata;
pub mod metric_result;

pub use artifact::{ArtifactEntry, ArtifactKind, PlotArtifact};
pub use bundle::OutputBundle;
pub use metadata::{RunMetadata, RunMetadataBuilder};
pub use metric_result::{MetricDescriptor, MetricResult, RegionDescriptor, RegionVariables, ResultTree, VariableMetrics};
