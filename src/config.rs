//! Configuración de la aplicación.
//!
//! Se lee de variables de entorno (con `.env` opcional, cargado una sola
//! vez) y se entrega explícitamente a cada comando; no hay estado global de
//! argumentos.
use std::env;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use cmec_core::{BundleConfig, NonFinitePolicy, SchemaInfo};
use once_cell::sync::Lazy;
use tracing_subscriber::filter::LevelFilter;

use crate::errors::AppError;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenvy::dotenv(); // ignora error si no existe .env
});

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Opciones del writer (schema, create-if-missing, política de no finitos).
    pub bundle: BundleConfig,
    /// Nivel del log de la corrida.
    pub log_level: LevelFilter,
    /// Instante fijo para corridas reproducibles (`SOURCE_DATE_EPOCH`).
    pub fixed_timestamp: Option<DateTime<Utc>>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { bundle: BundleConfig::default(), log_level: LevelFilter::INFO, fixed_timestamp: None }
    }
}

impl AppConfig {
    /// Lee la configuración del proceso (y de `.env` si existe).
    pub fn from_env() -> Result<Self, AppError> {
        Lazy::force(&DOTENV_LOADED);
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `from_env` pero con una fuente de variables arbitraria.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
        where F: Fn(&str) -> Option<String>
    {
        let defaults = SchemaInfo::default();
        let schema = SchemaInfo { name: lookup("CMEC_SCHEMA_NAME").unwrap_or(defaults.name),
                                  version: lookup("CMEC_SCHEMA_VERSION").unwrap_or(defaults.version),
                                  package: lookup("CMEC_SCHEMA_PACKAGE").unwrap_or(defaults.package) };
        let create_if_missing = match lookup("CMEC_CREATE_OUTPUT_DIR") {
            Some(v) => parse_bool("CMEC_CREATE_OUTPUT_DIR", &v)?,
            None => true,
        };
        let non_finite = parse_or("CMEC_NON_FINITE", &lookup, NonFinitePolicy::Reject)?;
        let log_level = parse_or("CMEC_LOG_LEVEL", &lookup, LevelFilter::INFO)?;
        let fixed_timestamp = match lookup("SOURCE_DATE_EPOCH") {
            Some(v) => {
                let secs: i64 = v.trim()
                                 .parse()
                                 .map_err(|e| AppError::Config(format!("SOURCE_DATE_EPOCH='{v}': {e}")))?;
                let ts = DateTime::from_timestamp(secs, 0)
                    .ok_or_else(|| AppError::Config(format!("SOURCE_DATE_EPOCH='{v}' is out of range")))?;
                Some(ts)
            }
            None => None,
        };
        Ok(Self { bundle: BundleConfig { create_if_missing, schema, non_finite },
                  log_level,
                  fixed_timestamp })
    }
}

fn parse_or<T, F>(key: &str, lookup: &F, default: T) -> Result<T, AppError>
    where T: FromStr,
          T::Err: std::fmt::Display,
          F: Fn(&str) -> Option<String>
{
    match lookup(key) {
        Some(v) => v.trim().parse().map_err(|e| AppError::Config(format!("{key}='{v}': {e}"))),
        None => Ok(default),
    }
}

fn parse_bool(key: &str, v: &str) -> Result<bool, AppError> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(AppError::Config(format!("{key}='{v}': expected true or false"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let cfg = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.bundle, BundleConfig::default());
        assert_eq!(cfg.log_level, LevelFilter::INFO);
        assert!(cfg.fixed_timestamp.is_none());
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = AppConfig::from_lookup(lookup(&[("CMEC_SCHEMA_PACKAGE", "PMP"),
                                                  ("CMEC_CREATE_OUTPUT_DIR", "no"),
                                                  ("CMEC_NON_FINITE", "tag"),
                                                  ("CMEC_LOG_LEVEL", "debug"),
                                                  ("SOURCE_DATE_EPOCH", "1704459731")])).unwrap();
        assert_eq!(cfg.bundle.schema.package, "PMP");
        assert_eq!(cfg.bundle.schema.name, "CMEC");
        assert!(!cfg.bundle.create_if_missing);
        assert_eq!(cfg.bundle.non_finite, NonFinitePolicy::Tag);
        assert_eq!(cfg.log_level, LevelFilter::DEBUG);
        assert_eq!(cmec_core::format_cmec_date(&cfg.fixed_timestamp.unwrap()), "Jan 05 2024 13:02:11 UTC");
    }

    #[test]
    fn bad_values_are_config_errors() {
        for (k, v) in [("CMEC_CREATE_OUTPUT_DIR", "maybe"),
                       ("CMEC_NON_FINITE", "drop"),
                       ("CMEC_LOG_LEVEL", "loud"),
                       ("SOURCE_DATE_EPOCH", "yesterday")]
        {
            let err = AppConfig::from_lookup(lookup(&[(k, v)])).unwrap_err();
            assert!(matches!(err, AppError::Config(_)), "{k}={v}");
        }
    }
}
