//! Verificación de un bundle ya escrito.
//!
//! Comprueba lo que las herramientas CMEC asumen al leer un directorio:
//! `output.json` parsea, `index` apunta a un archivo existente y el archivo
//! de la sección `metrics`/`plots` existe junto a él.
use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::constants::MANIFEST_FILE;
use crate::errors::{BundleError, BundleResult};
use crate::model::ArtifactKind;
use crate::render::Manifest;

const ENVELOPE_KEYS: [&str; 4] = ["SCHEMA", "DIMENSIONS", "RESULTS", "PROVENANCE"];

pub fn verify_bundle(dir: &Path) -> BundleResult<Manifest> {
    let manifest_path = dir.join(MANIFEST_FILE);
    let text = fs::read_to_string(&manifest_path).map_err(|e| BundleError::filesystem(&manifest_path, e))?;
    let manifest: Manifest = serde_json::from_str(&text)?;

    if !dir.join(&manifest.index).is_file() {
        return Err(BundleError::invalid(format!("index '{}' is missing", manifest.index)));
    }
    let entry = manifest.content.entry();
    let artifact = dir.join(&entry.filename);
    if !artifact.is_file() {
        return Err(BundleError::invalid(format!("{} file '{}' is missing",
                                                manifest.content.kind().section(),
                                                entry.filename)));
    }
    if manifest.content.kind() == ArtifactKind::Metrics {
        let raw = fs::read_to_string(&artifact).map_err(|e| BundleError::filesystem(&artifact, e))?;
        let doc: Value = serde_json::from_str(&raw)?;
        if let Some(missing) = ENVELOPE_KEYS.iter().find(|k| doc.get(**k).is_none()) {
            return Err(BundleError::invalid(format!("metrics file lacks the {missing} section")));
        }
    }
    Ok(manifest)
}
