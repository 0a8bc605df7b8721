use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable overriding the configured log filter
pub const LOG_ENV: &str = "KLOK_LOG";

fn open_log(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(format!("klok={}", level)))
}

/// Send tracing output to `path`; stdout belongs to the terminal UI.
/// Returns false when the file cannot be opened and logging stays off.
pub fn init(path: &Path, level: &str) -> bool {
    let file = match open_log(path) {
        Ok(file) => file,
        Err(_) => return false,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter(level))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn creates_missing_log_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state").join("klok.log");
        assert!(open_log(&path).is_ok());
        assert!(path.exists());
    }

    #[test]
    fn unwritable_path_is_reported() {
        let dir = tempdir().unwrap();
        // a directory cannot be opened as the log file
        assert!(open_log(dir.path()).is_err());
    }
}
