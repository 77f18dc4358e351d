//! Validaciones previas a cualquier escritura.
use std::path::Path;

use crate::config::NonFinitePolicy;
use crate::constants::{INDEX_FILE, MANIFEST_FILE};
use crate::errors::{BundleError, BundleResult};
use crate::model::{MetricResult, RunMetadata};

/// Claves no vacías, sin regiones/variables vacías, al menos un valor y
/// (con `Reject`) sólo valores finitos.
pub fn validate_result(result: &MetricResult, policy: NonFinitePolicy) -> BundleResult<()> {
    if result.is_empty() {
        return Err(BundleError::invalid("metric result has no values"));
    }
    for (region, vars) in result.results() {
        if region.is_empty() {
            return Err(BundleError::invalid("region name is empty"));
        }
        if vars.is_empty() {
            return Err(BundleError::invalid(format!("region '{region}' has no variables")));
        }
        for (var, metrics) in vars {
            if var.is_empty() {
                return Err(BundleError::invalid(format!("variable name is empty in region '{region}'")));
            }
            if metrics.is_empty() {
                return Err(BundleError::invalid(format!("variable '{var}' in region '{region}' has no metrics")));
            }
            for (metric, value) in metrics {
                if metric.is_empty() {
                    return Err(BundleError::invalid(format!("metric name is empty for {region}/{var}")));
                }
                if !value.is_finite() && policy == NonFinitePolicy::Reject {
                    return Err(BundleError::invalid(format!("non-finite value {value} for {region}/{var}/{metric}")));
                }
            }
        }
    }
    Ok(())
}

/// El artifact y el log deben ser nombres planos dentro del directorio de
/// salida y no pueden pisar `index.html`/`output.json` ni entre sí.
pub fn validate_file_names(artifact: &str, metadata: &RunMetadata) -> BundleResult<()> {
    let log = metadata.log_file();
    plain_file_name(artifact, "artifact")?;
    plain_file_name(log, "log")?;
    for reserved in [INDEX_FILE, MANIFEST_FILE] {
        if artifact == reserved {
            return Err(BundleError::invalid(format!("artifact file name '{artifact}' is reserved")));
        }
        if log == reserved {
            return Err(BundleError::invalid(format!("log file name '{log}' is reserved")));
        }
    }
    if artifact == log {
        return Err(BundleError::invalid(format!("artifact and log share the name '{artifact}'")));
    }
    Ok(())
}

fn plain_file_name(name: &str, role: &str) -> BundleResult<()> {
    let plain = !name.is_empty()
                && !name.contains(['/', '\\'])
                && Path::new(name).file_name().and_then(|n| n.to_str()) == Some(name);
    if plain {
        Ok(())
    } else {
        Err(BundleError::invalid(format!("{role} file name '{name}' must be a plain file name")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ArtifactEntry;

    fn result() -> MetricResult { MetricResult::new(ArtifactEntry::new("m.json", "metrics", "d")) }

    #[test]
    fn empty_result_is_rejected() {
        let err = validate_result(&result(), NonFinitePolicy::Reject).unwrap_err();
        assert!(matches!(err, BundleError::InvalidInput(_)));
    }

    #[test]
    fn empty_keys_are_rejected() {
        for (r, v, m) in [("", "tos", "mean"), ("Global", "", "mean"), ("Global", "tos", "")] {
            let res = result().with_value(r, v, m, 1.0);
            assert!(validate_result(&res, NonFinitePolicy::Reject).is_err(), "{r}/{v}/{m}");
        }
    }

    #[test]
    fn whitespace_keys_are_not_empty() {
        let res = result().with_value(" ", "sea surface temperature", "mean", 1.0);
        assert!(validate_result(&res, NonFinitePolicy::Reject).is_ok());
    }

    #[test]
    fn non_finite_depends_on_policy() {
        let res = result().with_value("Global", "tos", "mean", f64::NAN);
        assert!(validate_result(&res, NonFinitePolicy::Reject).is_err());
        assert!(validate_result(&res, NonFinitePolicy::Tag).is_ok());
    }

    #[test]
    fn finite_result_passes() {
        let res = result().with_value("Global", "tos", "weighted_mean", 18.42);
        assert!(validate_result(&res, NonFinitePolicy::Reject).is_ok());
    }

    #[test]
    fn file_names_must_be_plain_and_unreserved() {
        let md = RunMetadata::builder("in.nc", "out").log_file("config1.log").build();
        assert!(validate_file_names("weighted_mean.json", &md).is_ok());
        for bad in ["", "..", ".", "sub/plot.png", "..\\x.png", "index.html", "output.json", "config1.log"] {
            assert!(validate_file_names(bad, &md).is_err(), "{bad:?}");
        }
        let md = RunMetadata::builder("in.nc", "out").log_file("output.json").build();
        assert!(validate_file_names("plot.png", &md).is_err());
    }
}
