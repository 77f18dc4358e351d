use std::path::{Path, PathBuf};

use super::ArtifactKind;

/// Resultado de una escritura exitosa: los tres archivos del bundle existen
/// y son JSON/HTML bien formados.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputBundle {
    pub kind: ArtifactKind,
    pub dir: PathBuf,
    /// Archivo de métricas o imagen referenciado por el manifiesto.
    pub artifact: PathBuf,
    pub index: PathBuf,
    pub manifest: PathBuf,
    /// blake3 del JSON canónico del manifiesto.
    pub fingerprint: String,
}

impl OutputBundle {
    pub fn files(&self) -> [&Path; 3] { [&self.artifact, &self.index, &self.manifest] }
}
