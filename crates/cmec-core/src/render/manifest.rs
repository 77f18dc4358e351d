//! Manifiesto `output.json`.
//!
//! Claves de primer nivel: `index`, `provenance` y exactamente una de
//! `metrics` o `plots`. `obsdata` se escribe `null` cuando la corrida no usa
//! datos observacionales.
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::constants::INDEX_FILE;
use crate::model::{ArtifactEntry, ArtifactKind, RunMetadata};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Manifest {
    pub index: String,
    pub provenance: ManifestProvenance,
    #[serde(flatten)]
    pub content: ManifestContent,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ManifestProvenance {
    pub environment: IndexMap<String, String>,
    pub modeldata: String,
    pub obsdata: Option<String>,
    pub log: String,
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ManifestContent {
    Metrics(ArtifactEntry),
    Plots(ArtifactEntry),
}

impl ManifestContent {
    pub fn kind(&self) -> ArtifactKind {
        match self {
            ManifestContent::Metrics(_) => ArtifactKind::Metrics,
            ManifestContent::Plots(_) => ArtifactKind::Plots,
        }
    }

    pub fn entry(&self) -> &ArtifactEntry {
        match self {
            ManifestContent::Metrics(e) | ManifestContent::Plots(e) => e,
        }
    }
}

impl Manifest {
    pub fn new(kind: ArtifactKind, entry: &ArtifactEntry, metadata: &RunMetadata) -> Self {
        let content = match kind {
            ArtifactKind::Metrics => ManifestContent::Metrics(entry.clone()),
            ArtifactKind::Plots => ManifestContent::Plots(entry.clone()),
        };
        Self { index: INDEX_FILE.to_string(),
               provenance: ManifestProvenance { environment: metadata.environment().clone(),
                                                modeldata: metadata.modeldata().to_string(),
                                                obsdata: metadata.obsdata().map(str::to_string),
                                                log: metadata.log_file().to_string(),
                                                date: metadata.date() },
               content }
    }
}
