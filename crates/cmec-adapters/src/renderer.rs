//! Colaborador de graficado: deja una imagen en una ruta dada.
use std::path::Path;

use cmec_core::{BundleError, BundleResult};

use crate::command::ExternalCommand;

pub trait PlotRenderer {
    fn render(&self, input: &str, variable: Option<&str>, plot_path: &Path) -> BundleResult<()>;
}

/// Programa externo que renderiza el mapa. Placeholders: `{input}`, `{var}`, `{output}`.
#[derive(Debug, Clone)]
pub struct CommandRenderer {
    command: ExternalCommand,
}

impl CommandRenderer {
    pub fn new(command: ExternalCommand) -> Self { Self { command } }
}

impl PlotRenderer for CommandRenderer {
    fn render(&self, input: &str, variable: Option<&str>, plot_path: &Path) -> BundleResult<()> {
        let output = plot_path.to_string_lossy();
        self.command.run(&[("input", input), ("var", variable.unwrap_or("")), ("output", &*output)])?;
        if !plot_path.is_file() {
            return Err(BundleError::upstream(format!("'{}' did not produce {}",
                                                     self.command.program(),
                                                     plot_path.display())));
        }
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn renderer_must_leave_the_file() {
        let tmp = tempfile::tempdir().unwrap();
        let plot = tmp.path().join("plot.png");

        let noop = CommandRenderer::new(ExternalCommand::new("true"));
        assert!(matches!(noop.render("in.nc", None, &plot), Err(BundleError::Upstream(_))));

        let touch = CommandRenderer::new(ExternalCommand::new("touch").arg("{output}"));
        touch.render("in.nc", Some("tos"), &plot).unwrap();
        assert!(plot.is_file());
    }
}
