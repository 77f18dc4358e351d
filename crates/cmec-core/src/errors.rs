//! Errores del writer de bundles.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BundleError {
    /// No se pudo crear o escribir un directorio/archivo.
    #[error("filesystem error at {}: {}", .path.display(), .source)]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Resultado vacío o mal formado entregado al writer.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Fallo del colaborador numérico o de graficado; se propaga sin interpretar.
    #[error("upstream computation failed: {0}")]
    Upstream(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BundleError {
    pub fn filesystem(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Filesystem { path: path.as_ref().to_path_buf(), source }
    }

    pub fn invalid(msg: impl Into<String>) -> Self { Self::InvalidInput(msg.into()) }

    pub fn upstream(msg: impl Into<String>) -> Self { Self::Upstream(msg.into()) }
}

pub type BundleResult<T> = Result<T, BundleError>;
