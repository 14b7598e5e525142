//! Logging setup and the run journal
//!
//! Diagnostics go through the `log` facade to `env_logger`. The journal is
//! a separate append-only file recording one line per run.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Append-only run journal
pub struct Logger {
    /// File handle for journal output, `None` when journaling is off
    file: Mutex<Option<File>>,
}

impl Logger {
    /// Opens the journal, creating it if needed
    ///
    /// # Arguments
    ///
    /// * `log_file` - Path to the journal file
    pub fn new(log_file: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(log_file)?;
        Ok(Logger {
            file: Mutex::new(Some(file)),
        })
    }

    /// A journal that discards everything
    pub fn disabled() -> Self {
        Logger {
            file: Mutex::new(None),
        }
    }

    /// Appends a timestamped line to the journal
    pub fn log(&self, message: &str) -> io::Result<()> {
        let mut guard = self
            .file
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "journal lock poisoned"))?;
        if let Some(file) = guard.as_mut() {
            let seconds = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0);
            writeln!(file, "[{}] {}", seconds, message)?;
            file.flush()?;
        }
        Ok(())
    }

    /// Initialize the global `log` backend
    ///
    /// `RUST_LOG` takes precedence over `level`.
    pub fn init_global_logger(level: &str) {
        let env = env_logger::Env::default().default_filter_or(level);
        if env_logger::Builder::from_env(env).try_init().is_err() {
            eprintln!("Warning: Global logger was already initialized");
        }
    }
}
