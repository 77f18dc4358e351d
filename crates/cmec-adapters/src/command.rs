//! Programa externo con placeholders `{nombre}` en sus argumentos.
use std::process::Command;

use cmec_core::{BundleError, BundleResult};
use log::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    program: String,
    args: Vec<String>,
}

impl ExternalCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into(), args: Vec::new() }
    }

    /// Construye desde un argv (`["python", "mean.py", "{input}"]`).
    pub fn from_argv(argv: &[String]) -> BundleResult<Self> {
        let (program, args) = argv.split_first()
                                  .ok_or_else(|| BundleError::invalid("external command is empty"))?;
        Ok(Self { program: program.clone(), args: args.to_vec() })
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn program(&self) -> &str { &self.program }

    /// Argumentos con cada `{clave}` reemplazado por su valor.
    pub fn render_args(&self, vars: &[(&str, &str)]) -> Vec<String> {
        self.args
            .iter()
            .map(|a| vars.iter().fold(a.clone(), |acc, (k, v)| acc.replace(&format!("{{{k}}}"), v)))
            .collect()
    }

    /// Ejecuta y devuelve stdout. Estado de salida distinto de cero ⇒ `Upstream`.
    pub fn run(&self, vars: &[(&str, &str)]) -> BundleResult<String> {
        let args = self.render_args(vars);
        info!("Running {} {}", self.program, args.join(" "));
        let output = Command::new(&self.program).args(&args)
                                                .output()
                                                .map_err(|e| BundleError::upstream(format!("could not start '{}': {e}", self.program)))?;
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            debug!("{} stderr: {}", self.program, stderr.trim());
        }
        if !output.status.success() {
            return Err(BundleError::upstream(format!("'{}' exited with {}: {}",
                                                     self.program,
                                                     output.status,
                                                     last_line(&stderr).unwrap_or("no stderr"))));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Última línea no vacía de una salida de texto.
pub(crate) fn last_line(text: &str) -> Option<&str> { text.lines().map(str::trim).filter(|l| !l.is_empty()).last() }
