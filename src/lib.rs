//! cmec-bundle
//!
//! Binario y librería que empaquetan diagnósticos de modelos climáticos en
//! bundles de salida CMEC:
//! - `cli`: argumentos de la línea de comandos (clap).
//! - `config`: configuración desde variables de entorno / `.env`.
//! - `commands`: un comando por configuración de diagnóstico.
//! - `logging`: log de la corrida en el directorio de salida.
//! - `errors`: errores de la aplicación y códigos de salida.
//!
//! El núcleo (modelo, render y escritura) vive en `cmec-core`; los
//! colaboradores externos en `cmec-adapters`.

pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod logging;

use std::path::PathBuf;

use cmec_core::{ArtifactKind, OutputBundle};
use serde::Serialize;

/// Resumen que la CLI imprime en stdout tras una escritura exitosa.
#[derive(Debug, Serialize)]
pub struct BundleSummary {
    pub kind: ArtifactKind,
    pub dir: PathBuf,
    pub files: Vec<PathBuf>,
    pub fingerprint: String,
}

impl From<&OutputBundle> for BundleSummary {
    fn from(b: &OutputBundle) -> Self {
        Self { kind: b.kind,
               dir: b.dir.clone(),
               files: b.files().iter().map(|p| p.to_path_buf()).collect(),
               fingerprint: b.fingerprint.clone() }
    }
}
