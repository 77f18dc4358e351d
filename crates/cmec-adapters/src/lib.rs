//! cmec-adapters: colaboradores externos del bundle.
//!
//! El cálculo del diagnóstico (media ponderada, mapas, transformación de
//! masas de agua) lo hacen programas externos. Este crate provee:
//! - `MetricComputation` / `PlotRenderer` / `VersionLookup`: las interfaces
//!   angostas que consume la CLI, con implementaciones fijas y basadas en
//!   comandos.
//! - `wmt`: nombres de archivos, bins y regiones de una corrida de
//!   transformación superficial de masas de agua.
//!
//! Los errores de los colaboradores se reportan como
//! `BundleError::Upstream` sin interpretarlos.

pub mod command;
pub mod computation;
pub mod environment;
pub mod renderer;
pub mod wmt;

pub use command::ExternalCommand;
pub use computation::{CommandComputation, FixedValue, MetricComputation};
pub use environment::{collect_environment, BuildEnvironment, CommandVersionProbe, StaticVersions, VersionLookup};
pub use renderer::{CommandRenderer, PlotRenderer};
