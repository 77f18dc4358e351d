//! `BundleWriter`: arma y persiste un bundle CMEC a partir de un resultado
//! ya calculado y los metadatos de la corrida. No sabe cómo se calculó el
//! resultado.

mod staging;
pub mod validate;
pub mod verify;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde_json::json;

use crate::config::BundleConfig;
use crate::constants::{INDEX_FILE, MANIFEST_FILE};
use crate::errors::{BundleError, BundleResult};
use crate::hashing::{hash_bytes, hash_value};
use crate::model::{ArtifactKind, MetricResult, OutputBundle, PlotArtifact, RunMetadata};
use crate::render::{html, to_pretty_json, Manifest, MetricsEnvelope};
use staging::StagedFiles;

pub use verify::verify_bundle;

#[derive(Debug, Clone, Default)]
pub struct BundleWriter {
    config: BundleConfig,
}

impl BundleWriter {
    pub fn new(config: BundleConfig) -> Self { Self { config } }

    pub fn config(&self) -> &BundleConfig { &self.config }

    /// Escribe `<metrics file>`, `index.html` y `output.json`, en ese orden.
    pub fn write_metrics_bundle(&self, result: &MetricResult, metadata: &RunMetadata) -> BundleResult<OutputBundle> {
        validate::validate_result(result, self.config.non_finite)?;
        validate::validate_file_names(&result.file.filename, metadata)?;
        let dir = self.prepare_dir(metadata.output_dir())?;

        let envelope = MetricsEnvelope::new(&self.config.schema, result, metadata, self.config.non_finite);
        let envelope_bytes = to_pretty_json(&envelope)?;
        let manifest = Manifest::new(ArtifactKind::Metrics, &result.file, metadata);

        let mut staged = StagedFiles::new(dir);
        info!("Writing {}", result.file.filename);
        let artifact = staged.stage(&result.file.filename, &envelope_bytes)?;
        info!("Writing {INDEX_FILE}");
        let index = staged.stage(INDEX_FILE, html::metrics_page(&result.file).as_bytes())?;
        info!("Writing metadata file");
        let manifest_path = staged.stage(MANIFEST_FILE, &to_pretty_json(&manifest)?)?;
        staged.commit()?;

        let fingerprint = fingerprint(&manifest, &hash_bytes(&envelope_bytes))?;
        Ok(self.finish(ArtifactKind::Metrics, dir, artifact, index, manifest_path, fingerprint))
    }

    /// Escribe `index.html` y `output.json` para una imagen que el
    /// colaborador de graficado ya dejó en el directorio de salida.
    pub fn write_plot_bundle(&self, plot: &PlotArtifact, metadata: &RunMetadata) -> BundleResult<OutputBundle> {
        validate::validate_file_names(plot.filename(), metadata)?;
        let dir = self.prepare_dir(metadata.output_dir())?;

        let artifact = dir.join(plot.filename());
        if !artifact.is_file() {
            return Err(BundleError::invalid(format!("plot file '{}' does not exist in {}",
                                                    plot.filename(),
                                                    dir.display())));
        }
        let plot_bytes = fs::read(&artifact).map_err(|e| BundleError::filesystem(&artifact, e))?;
        let manifest = Manifest::new(ArtifactKind::Plots, &plot.entry, metadata);

        let mut staged = StagedFiles::new(dir);
        info!("Writing {INDEX_FILE}");
        let index = staged.stage(INDEX_FILE, html::plot_page(&plot.entry).as_bytes())?;
        info!("Writing metadata file");
        let manifest_path = staged.stage(MANIFEST_FILE, &to_pretty_json(&manifest)?)?;
        staged.commit()?;

        let fingerprint = fingerprint(&manifest, &hash_bytes(&plot_bytes))?;
        Ok(self.finish(ArtifactKind::Plots, dir, artifact, index, manifest_path, fingerprint))
    }

    fn prepare_dir<'a>(&self, dir: &'a Path) -> BundleResult<&'a Path> {
        if dir.is_dir() {
            return Ok(dir);
        }
        if dir.exists() {
            return Err(BundleError::filesystem(dir, io::Error::other("output path exists and is not a directory")));
        }
        if !self.config.create_if_missing {
            return Err(BundleError::filesystem(dir,
                                               io::Error::new(io::ErrorKind::NotFound,
                                                              "output directory does not exist")));
        }
        debug!("creating output directory {}", dir.display());
        fs::create_dir_all(dir).map_err(|e| BundleError::filesystem(dir, e))?;
        Ok(dir)
    }

    fn finish(&self,
              kind: ArtifactKind,
              dir: &Path,
              artifact: PathBuf,
              index: PathBuf,
              manifest: PathBuf,
              fingerprint: String)
              -> OutputBundle {
        info!("{} bundle written to {} (fingerprint {fingerprint})", kind.section(), dir.display());
        OutputBundle { kind,
                       dir: dir.to_path_buf(),
                       artifact,
                       index,
                       manifest,
                       fingerprint }
    }
}

fn fingerprint(manifest: &Manifest, artifact_digest: &str) -> BundleResult<String> {
    Ok(hash_value(&json!({
        "manifest": serde_json::to_value(manifest)?,
        "artifact": artifact_digest,
    })))
}
