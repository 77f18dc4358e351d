//! Versiones de librerías para `PROVENANCE.environment` y `provenance.environment`.
use indexmap::IndexMap;
use log::warn;

use cmec_core::{BundleError, BundleResult};

use crate::command::{last_line, ExternalCommand};

/// Valor registrado cuando una versión no se pudo obtener.
pub const UNKNOWN_VERSION: &str = "unknown";

pub trait VersionLookup {
    fn versions(&self) -> IndexMap<String, String>;
}

/// Nombre/versión de esta herramienta y la plataforma de ejecución.
#[derive(Debug, Clone)]
pub struct BuildEnvironment {
    name: String,
    version: String,
}

impl BuildEnvironment {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self { name: name.into(), version: version.into() }
    }
}

impl VersionLookup for BuildEnvironment {
    fn versions(&self) -> IndexMap<String, String> {
        let mut out = IndexMap::new();
        out.insert(self.name.clone(), self.version.clone());
        out.insert("platform".to_string(), format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH));
        out
    }
}

/// Pares fijos `NAME=VERSION`.
#[derive(Debug, Clone, Default)]
pub struct StaticVersions(IndexMap<String, String>);

impl StaticVersions {
    /// Parsea pares `NAME=VERSION`; un nombre vacío o sin `=` es inválido.
    pub fn parse<S: AsRef<str>>(pairs: &[S]) -> BundleResult<Self> {
        let mut map = IndexMap::new();
        for pair in pairs {
            let (name, version) = split_pair(pair.as_ref())?;
            map.insert(name.to_string(), version.to_string());
        }
        Ok(Self(map))
    }
}

impl VersionLookup for StaticVersions {
    fn versions(&self) -> IndexMap<String, String> { self.0.clone() }
}

/// Ejecuta un programa que imprime la versión (p.ej.
/// `python -c "import numpy; print(numpy.__version__)"`).
#[derive(Debug, Clone)]
pub struct CommandVersionProbe {
    name: String,
    command: ExternalCommand,
}

impl CommandVersionProbe {
    pub fn new(name: impl Into<String>, command: ExternalCommand) -> Self {
        Self { name: name.into(), command }
    }

    /// `NAME=CMD ARGS...`; el comando se separa con reglas de shell
    /// (comillas simples y dobles), sin invocar un shell.
    pub fn parse(spec: &str) -> BundleResult<Self> {
        let (name, cmd) = split_pair(spec)?;
        let argv = shlex::split(cmd).ok_or_else(|| BundleError::invalid(format!("unbalanced quotes in '{cmd}'")))?;
        Ok(Self::new(name, ExternalCommand::from_argv(&argv)?))
    }
}

impl VersionLookup for CommandVersionProbe {
    fn versions(&self) -> IndexMap<String, String> {
        let version = match self.command.run(&[]) {
            Ok(stdout) => last_line(&stdout).unwrap_or(UNKNOWN_VERSION).to_string(),
            Err(e) => {
                warn!("version probe for {} failed: {e}", self.name);
                UNKNOWN_VERSION.to_string()
            }
        };
        IndexMap::from([(self.name.clone(), version)])
    }
}

/// Une varios lookups en orden; una clave repetida conserva su posición
/// original y toma el último valor.
pub fn collect_environment(lookups: &[&dyn VersionLookup]) -> IndexMap<String, String> {
    let mut env = IndexMap::new();
    for lookup in lookups {
        env.extend(lookup.versions());
    }
    env
}

fn split_pair(pair: &str) -> BundleResult<(&str, &str)> {
    match pair.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim(), value.trim())),
        _ => Err(BundleError::invalid(format!("expected NAME=VALUE, got '{pair}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_pairs_keep_order() {
        let s = StaticVersions::parse(&["numpy=1.26.4", "xarray=2024.1.0", "python=3.11.7"]).unwrap();
        let keys: Vec<String> = s.versions().keys().cloned().collect();
        assert_eq!(keys, ["numpy", "xarray", "python"]);
    }

    #[test]
    fn malformed_pairs_are_rejected() {
        assert!(StaticVersions::parse(&["numpy"]).is_err());
        assert!(StaticVersions::parse(&["=1.0"]).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn probe_accepts_quoted_arguments() {
        let probe = CommandVersionProbe::parse("tool=sh -c \"echo 1.2.3\"").unwrap();
        assert_eq!(probe.versions()["tool"], "1.2.3");
    }

    #[test]
    fn probe_with_unbalanced_quotes_is_invalid() {
        let err = CommandVersionProbe::parse("numpy=python -c \"import numpy").unwrap_err();
        assert!(matches!(err, BundleError::InvalidInput(_)));
        assert!(matches!(CommandVersionProbe::parse("numpy="), Err(BundleError::InvalidInput(_))));
    }

    #[test]
    fn later_lookups_override_values() {
        let build = BuildEnvironment::new("cmec-bundle", "0.1.0");
        let overrides = StaticVersions::parse(&["cmec-bundle=dev", "numpy=1.26.4"]).unwrap();
        let env = collect_environment(&[&build, &overrides]);
        assert_eq!(env["cmec-bundle"], "dev");
        assert_eq!(env.get_index_of("cmec-bundle"), Some(0));
        assert_eq!(env["numpy"], "1.26.4");
        assert!(env.contains_key("platform"));
    }

    #[test]
    fn failing_probe_records_unknown() {
        let probe = CommandVersionProbe::parse("numpy=definitely-not-a-real-program-cmec --version").unwrap();
        assert_eq!(probe.versions()["numpy"], UNKNOWN_VERSION);
    }

    #[cfg(unix)]
    #[test]
    fn probe_reads_last_stdout_line() {
        let probe = CommandVersionProbe::parse("tool=echo 2.5.1").unwrap();
        assert_eq!(probe.versions()["tool"], "2.5.1");
    }
}
