//! cmec-core: ensamblado y validación de bundles de salida CMEC.
//!
//! Un bundle es un directorio con el artifact principal (JSON de métricas o
//! una imagen), `index.html` y el manifiesto `output.json`. Este crate no
//! calcula diagnósticos; recibe el resultado ya calculado y lo empaqueta.
pub mod config;
pub mod constants;
pub mod date;
pub mod errors;
pub mod hashing;
pub mod model;
pub mod render;
pub mod writer;

pub use config::{BundleConfig, NonFinitePolicy, SchemaInfo};
pub use date::{format_cmec_date, parse_cmec_date};
pub use errors::{BundleError, BundleResult};
pub use model::{ArtifactEntry, ArtifactKind, MetricDescriptor, MetricResult, OutputBundle, PlotArtifact,
                RegionDescriptor, RunMetadata, RunMetadataBuilder};
pub use render::{Manifest, ManifestContent};
pub use writer::{verify_bundle, BundleWriter};
