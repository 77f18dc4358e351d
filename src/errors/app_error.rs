use std::process::ExitCode;

use cmec_core::BundleError;
use thiserror::Error;

/// Errores de la aplicación; cada variante tiene un código de salida.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Bundle(#[from] BundleError),
    #[error("Error de configuración: {0}")]
    Config(String),
    #[error("Error de logging: {0}")]
    Logging(String),
}

impl AppError {
    /// 2 configuración, 3 entrada inválida, 4 fallo del colaborador,
    /// 5 sistema de archivos/serialización/logging.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Config(_) => 2,
            AppError::Bundle(BundleError::InvalidInput(_)) => 3,
            AppError::Bundle(BundleError::Upstream(_)) => 4,
            AppError::Bundle(_) | AppError::Logging(_) => 5,
        }
    }
}

impl From<&AppError> for ExitCode {
    fn from(err: &AppError) -> Self { ExitCode::from(err.exit_code()) }
}
