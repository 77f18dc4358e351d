//! Colaborador numérico: devuelve un valor por variable.
use cmec_core::{BundleError, BundleResult};

use crate::command::{last_line, ExternalCommand};

pub trait MetricComputation {
    /// Calcula la métrica de `variable` sobre el dataset en `input`.
    fn compute(&self, input: &str, variable: &str) -> BundleResult<f64>;
}

/// Valor ya calculado por el caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedValue(pub f64);

impl MetricComputation for FixedValue {
    fn compute(&self, _input: &str, _variable: &str) -> BundleResult<f64> { Ok(self.0) }
}

/// Programa externo que imprime el valor en la última línea de stdout.
/// Placeholders: `{input}`, `{var}`.
#[derive(Debug, Clone)]
pub struct CommandComputation {
    command: ExternalCommand,
}

impl CommandComputation {
    pub fn new(command: ExternalCommand) -> Self { Self { command } }
}

impl MetricComputation for CommandComputation {
    fn compute(&self, input: &str, variable: &str) -> BundleResult<f64> {
        let stdout = self.command.run(&[("input", input), ("var", variable)])?;
        let line = last_line(&stdout).ok_or_else(|| {
                                         BundleError::upstream(format!("'{}' printed no value", self.command.program()))
                                     })?;
        line.parse::<f64>()
            .map_err(|e| BundleError::upstream(format!("could not parse '{line}' as a number: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_value_ignores_inputs() {
        assert_eq!(FixedValue(18.42).compute("/data/in.nc", "tos").unwrap(), 18.42);
    }

    #[cfg(unix)]
    #[test]
    fn command_value_is_parsed_from_stdout() {
        let c = CommandComputation::new(ExternalCommand::new("echo").arg("18.42"));
        assert_eq!(c.compute("in.nc", "tos").unwrap(), 18.42);
    }

    #[cfg(unix)]
    #[test]
    fn non_numeric_output_is_upstream_error() {
        let c = CommandComputation::new(ExternalCommand::new("echo").arg("{var}"));
        let err = c.compute("in.nc", "tos").unwrap_err();
        assert!(matches!(err, BundleError::Upstream(_)));
    }

    #[cfg(unix)]
    #[test]
    fn silent_command_is_upstream_error() {
        let c = CommandComputation::new(ExternalCommand::new("true"));
        assert!(matches!(c.compute("in.nc", "tos"), Err(BundleError::Upstream(_))));
    }
}
