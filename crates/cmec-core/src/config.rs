//! Opciones reconocidas por el `BundleWriter`.
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_SCHEMA_NAME, DEFAULT_SCHEMA_PACKAGE, DEFAULT_SCHEMA_VERSION};

/// Sección `SCHEMA` del JSON de métricas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SchemaInfo {
    pub name: String,
    pub version: String,
    pub package: String,
}

impl Default for SchemaInfo {
    fn default() -> Self {
        Self { name: DEFAULT_SCHEMA_NAME.to_string(),
               version: DEFAULT_SCHEMA_VERSION.to_string(),
               package: DEFAULT_SCHEMA_PACKAGE.to_string() }
    }
}

/// Qué hacer con valores NaN/Infinity en `RESULTS`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NonFinitePolicy {
    /// Rechazar con `InvalidInput`.
    #[default]
    Reject,
    /// Serializar como los strings `"NaN"`, `"Infinity"`, `"-Infinity"`.
    Tag,
}

impl std::str::FromStr for NonFinitePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "tag" => Ok(Self::Tag),
            other => Err(format!("unknown non-finite policy '{other}' (expected 'reject' or 'tag')")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleConfig {
    /// Crear el directorio de salida si no existe.
    pub create_if_missing: bool,
    pub schema: SchemaInfo,
    pub non_finite: NonFinitePolicy,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self { create_if_missing: true,
               schema: SchemaInfo::default(),
               non_finite: NonFinitePolicy::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_cmec_test_schema() {
        let cfg = BundleConfig::default();
        assert!(cfg.create_if_missing);
        assert_eq!(cfg.schema.name, "CMEC");
        assert_eq!(cfg.schema.version, "v1");
        assert_eq!(cfg.schema.package, "CMECTEST");
        assert_eq!(cfg.non_finite, NonFinitePolicy::Reject);
    }

    #[test]
    fn policy_from_str() {
        assert_eq!("TAG".parse::<NonFinitePolicy>().unwrap(), NonFinitePolicy::Tag);
        assert_eq!(" reject ".parse::<NonFinitePolicy>().unwrap(), NonFinitePolicy::Reject);
        assert!("drop".parse::<NonFinitePolicy>().is_err());
    }
}
