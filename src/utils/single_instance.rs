use crate::error::{NavError, Result};
use nix::errno::Errno;
use nix::fcntl::{Flock, FlockArg};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const LOCK_FILE_NAME: &str = "wnav.lock";

/// Блокировка единственного экземпляра: снимается при drop
pub struct InstanceLock {
    _lock: Flock<fs::File>,
    path: PathBuf,
}

impl InstanceLock {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Файл блокировки в $XDG_RUNTIME_DIR, иначе во временном каталоге
pub fn default_lock_path() -> PathBuf {
    std::env::var_os("XDG_RUNTIME_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir)
        .join(LOCK_FILE_NAME)
}

/// Захватить блокировку без ожидания.
///
/// `AlreadyRunning`, если её держит другой процесс.
pub fn acquire(path: &Path) -> Result<InstanceLock> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = fs::OpenOptions::new()
        .create(true)
        .truncate(false)
        .read(true)
        .write(true)
        .open(path)?;

    match Flock::lock(file, FlockArg::LockExclusiveNonblock) {
        Ok(lock) => {
            info!("Блокировка экземпляра захвачена: {}", path.display());
            Ok(InstanceLock {
                _lock: lock,
                path: path.to_path_buf(),
            })
        }
        Err((_, Errno::EAGAIN)) => {
            debug!("Блокировка {} занята", path.display());
            Err(NavError::AlreadyRunning(format!(
                "блокировка {} удерживается другим процессом",
                path.display()
            )))
        }
        Err((_, e)) => Err(NavError::Nix(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_lock_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("wnav-test-{}-{}.lock", name, std::process::id()))
    }

    #[test]
    fn test_second_lock_is_rejected() {
        let path = temp_lock_path("second");
        let first = acquire(&path).unwrap();
        assert_eq!(first.path(), path.as_path());

        let second = acquire(&path);
        assert!(matches!(second, Err(NavError::AlreadyRunning(_))));

        drop(first);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_lock_released_on_drop() {
        let path = temp_lock_path("release");
        drop(acquire(&path).unwrap());
        assert!(acquire(&path).is_ok());
        let _ = fs::remove_file(&path);
    }
}
