//! Artifact principal de un bundle.
//!
//! `ArtifactEntry` es exactamente la forma de la sección `metrics` o `plots`
//! del manifiesto: `{filename, long_name, description}`. El `filename` es
//! relativo al directorio de salida y debe ser un nombre plano.
use serde::{Deserialize, Serialize};

/// Tipo de artifact principal; decide la clave de la sección en `output.json`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Metrics,
    Plots,
}

impl ArtifactKind {
    pub fn section(&self) -> &'static str {
        match self {
            ArtifactKind::Metrics => "metrics",
            ArtifactKind::Plots => "plots",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArtifactEntry {
    pub filename: String,
    pub long_name: String,
    pub description: String,
}

impl ArtifactEntry {
    pub fn new(filename: impl Into<String>, long_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self { filename: filename.into(),
               long_name: long_name.into(),
               description: description.into() }
    }
}

/// Referencia a una imagen ya generada dentro del directorio de salida.
/// El archivo debe existir antes de escribir el manifiesto que la referencia.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotArtifact {
    pub entry: ArtifactEntry,
}

impl PlotArtifact {
    pub fn new(filename: impl Into<String>, long_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self { entry: ArtifactEntry::new(filename, long_name, description) }
    }

    pub fn filename(&self) -> &str { &self.entry.filename }
}
