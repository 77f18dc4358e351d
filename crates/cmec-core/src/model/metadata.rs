//! Metadatos de una ejecución.
//!
//! `RunMetadata` se construye una vez al inicio de la corrida (vía
//! `RunMetadataBuilder`), nunca se muta y lo consume el `BundleWriter`.
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use crate::date::format_cmec_date;

const DEFAULT_LOG_FILE: &str = "cmec.log";

#[derive(Debug, Clone, PartialEq)]
pub struct RunMetadata {
    modeldata: String,
    obsdata: Option<String>,
    output_dir: PathBuf,
    variable: Option<String>,
    timestamp: DateTime<Utc>,
    environment: IndexMap<String, String>,
    log_file: String,
}

impl RunMetadata {
    pub fn builder(modeldata: impl Into<String>, output_dir: impl Into<PathBuf>) -> RunMetadataBuilder {
        RunMetadataBuilder::new(modeldata, output_dir)
    }

    /// Ruta de los datos de modelo de entrada.
    pub fn modeldata(&self) -> &str { &self.modeldata }
    /// Ruta de datos observacionales, si la corrida los usa (`null` en el manifiesto si no).
    pub fn obsdata(&self) -> Option<&str> { self.obsdata.as_deref() }
    pub fn output_dir(&self) -> &Path { &self.output_dir }
    pub fn variable(&self) -> Option<&str> { self.variable.as_deref() }
    pub fn timestamp(&self) -> &DateTime<Utc> { &self.timestamp }
    pub fn environment(&self) -> &IndexMap<String, String> { &self.environment }
    /// Nombre del log de la corrida, relativo a `output_dir`.
    pub fn log_file(&self) -> &str { &self.log_file }

    /// Fecha CMEC de la corrida.
    pub fn date(&self) -> String { format_cmec_date(&self.timestamp) }
}

#[derive(Debug, Clone)]
pub struct RunMetadataBuilder {
    modeldata: String,
    obsdata: Option<String>,
    output_dir: PathBuf,
    variable: Option<String>,
    timestamp: Option<DateTime<Utc>>,
    environment: IndexMap<String, String>,
    log_file: String,
}

impl RunMetadataBuilder {
    pub fn new(modeldata: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self { modeldata: modeldata.into(),
               obsdata: None,
               output_dir: output_dir.into(),
               variable: None,
               timestamp: None,
               environment: IndexMap::new(),
               log_file: DEFAULT_LOG_FILE.to_string() }
    }

    pub fn obsdata(mut self, path: Option<String>) -> Self {
        self.obsdata = path;
        self
    }

    pub fn variable(mut self, var: impl Into<String>) -> Self {
        self.variable = Some(var.into());
        self
    }

    /// Fija el instante de la corrida (por defecto `Utc::now()` al construir).
    pub fn timestamp(mut self, ts: DateTime<Utc>) -> Self {
        self.timestamp = Some(ts);
        self
    }

    pub fn environment(mut self, env: IndexMap<String, String>) -> Self {
        self.environment = env;
        self
    }

    pub fn log_file(mut self, name: impl Into<String>) -> Self {
        self.log_file = name.into();
        self
    }

    pub fn build(self) -> RunMetadata {
        RunMetadata { modeldata: self.modeldata,
                      obsdata: self.obsdata,
                      output_dir: self.output_dir,
                      variable: self.variable,
                      timestamp: self.timestamp.unwrap_or_else(Utc::now),
                      environment: self.environment,
                      log_file: self.log_file }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn builder_defaults() {
        let md = RunMetadata::builder("/data/in.nc", "/tmp/out").build();
        assert_eq!(md.modeldata(), "/data/in.nc");
        assert_eq!(md.obsdata(), None);
        assert_eq!(md.variable(), None);
        assert_eq!(md.log_file(), "cmec.log");
        assert!(md.environment().is_empty());
        assert!(md.date().ends_with(" UTC"));
    }

    #[test]
    fn fixed_timestamp_drives_date() {
        let ts = Utc.with_ymd_and_hms(2023, 11, 30, 8, 0, 1).unwrap();
        let md = RunMetadata::builder("in.nc", "out").timestamp(ts).variable("tos").build();
        assert_eq!(md.date(), "Nov 30 2023 08:00:01 UTC");
        assert_eq!(md.variable(), Some("tos"));
    }
}
