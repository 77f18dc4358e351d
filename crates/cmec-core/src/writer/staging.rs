//! Escritura en dos fases.
//!
//! Cada archivo se escribe primero a un temporal oculto dentro del mismo
//! directorio; `commit` los renombra en el orden en que se registraron. Si
//! un rename falla se borran los ya renombrados en esta llamada y el error
//! llega al caller. Si la fase de staging falla, los temporales se eliminan
//! al hacer drop y el directorio queda como estaba.
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use tempfile::NamedTempFile;

use crate::errors::{BundleError, BundleResult};

const TEMP_PREFIX: &str = ".cmec-";

pub(crate) struct StagedFiles {
    dir: PathBuf,
    staged: Vec<(NamedTempFile, PathBuf)>,
}

impl StagedFiles {
    pub(crate) fn new(dir: &Path) -> Self { Self { dir: dir.to_path_buf(), staged: Vec::new() } }

    /// Escribe `bytes` a un temporal y devuelve la ruta final que tendrá.
    pub(crate) fn stage(&mut self, name: &str, bytes: &[u8]) -> BundleResult<PathBuf> {
        let mut tmp = tempfile::Builder::new().prefix(TEMP_PREFIX)
                                              .tempfile_in(&self.dir)
                                              .map_err(|e| BundleError::filesystem(&self.dir, e))?;
        tmp.write_all(bytes)
           .and_then(|_| tmp.as_file().sync_all())
           .map_err(|e| BundleError::filesystem(tmp.path(), e))?;
        make_world_readable(tmp.path())?;
        let target = self.dir.join(name);
        debug!("staged {} ({} bytes)", target.display(), bytes.len());
        self.staged.push((tmp, target.clone()));
        Ok(target)
    }

    /// Renombra todos los temporales a su destino final.
    pub(crate) fn commit(self) -> BundleResult<Vec<PathBuf>> {
        let mut done: Vec<PathBuf> = Vec::with_capacity(self.staged.len());
        for (tmp, target) in self.staged {
            if let Err(e) = tmp.persist(&target) {
                for path in &done {
                    if let Err(rm) = fs::remove_file(path) {
                        warn!("could not roll back {}: {rm}", path.display());
                    }
                }
                return Err(BundleError::filesystem(&target, e.error));
            }
            done.push(target);
        }
        Ok(done)
    }
}

// NamedTempFile se crea con 0600; los bundles se publican tal cual.
#[cfg(unix)]
fn make_world_readable(path: &Path) -> BundleResult<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o644)).map_err(|e| BundleError::filesystem(path, e))
}

#[cfg(not(unix))]
fn make_world_readable(_path: &Path) -> BundleResult<()> { Ok(()) }
