//! Log de la corrida en el directorio de salida.
//!
//! El código de librería escribe con el facade `log`; aquí se instala un
//! subscriber de `tracing-subscriber` que escribe a archivo y que, al
//! inicializarse, también captura los registros de `log`.
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use cmec_core::BundleError;
use tracing_subscriber::filter::LevelFilter;

use crate::errors::AppError;

/// Abre (en modo append) `<dir>/<file_name>` y lo instala como destino del
/// log del proceso. Crea `dir` si `create_dir` es verdadero.
pub fn init_run_log(dir: &Path, file_name: &str, level: LevelFilter, create_dir: bool) -> Result<PathBuf, AppError> {
    if create_dir {
        fs::create_dir_all(dir).map_err(|e| BundleError::filesystem(dir, e))?;
    }
    let path = dir.join(file_name);
    let file = OpenOptions::new().create(true)
                                 .append(true)
                                 .open(&path)
                                 .map_err(|e| BundleError::filesystem(&path, e))?;
    tracing_subscriber::fmt().with_writer(Mutex::new(file))
                             .with_ansi(false)
                             .with_target(false)
                             .with_max_level(level)
                             .try_init()
                             .map_err(|e| AppError::Logging(e.to_string()))?;
    Ok(path)
}
