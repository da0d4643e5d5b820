//! Per-session log files.
//!
//! [`SessionLogSink`] is handed to `env_logger` as a pipe target. Every
//! formatted line goes to stderr; while a session is open the line is also
//! appended to `<log_dir>/scan_<YYYY-mm-dd_HH-MM-SS>.log` (with a `_<n>`
//! suffix when that name is taken).
//!
//! Line format:
//!
//! ```text
//! [2025-07-06 14:03:12] [INFO] Moved forward. Position: (0.00, 0.50), ...
//! [2025-07-06 14:05:40] [RESULT] Estimated room area: 12.50 m²
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use log::Record;

/// Log target for final results. Lines with this target are tagged `RESULT`.
///
/// Lives under the crate's namespace so `RUST_LOG=room_scanner=...` keeps it.
pub const RESULT_TARGET: &str = "room_scanner::result";

struct ActiveLog {
    file: File,
    path: PathBuf,
}

/// Log sink mirroring to stderr and the active session file.
#[derive(Clone, Default)]
pub struct SessionLogSink {
    active: Arc<Mutex<Option<ActiveLog>>>,
}

impl SessionLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<ActiveLog>> {
        self.active.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Create a fresh log file under `dir` and start appending to it.
    ///
    /// Any previously open session file is closed first. A session started
    /// within the same second as an earlier one gets a `_<n>` suffix.
    pub fn open_session(&self, dir: &Path) -> io::Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let stem = format!("scan_{}", session_timestamp());
        let mut suffix = 0u32;
        let (file, path) = loop {
            let name = match suffix {
                0 => format!("{}.log", stem),
                n => format!("{}_{}.log", stem, n),
            };
            let path = dir.join(name);
            match OpenOptions::new().append(true).create_new(true).open(&path) {
                Ok(file) => break (file, path),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => suffix += 1,
                Err(e) => return Err(e),
            }
        };
        *self.lock() = Some(ActiveLog {
            file,
            path: path.clone(),
        });
        Ok(path)
    }

    /// Stop appending to the session file.
    pub fn close_session(&self) {
        if let Some(mut active) = self.lock().take()
            && let Err(e) = active.file.flush()
        {
            eprintln!("Failed to flush {}: {}", active.path.display(), e);
        }
    }

    /// Path of the open session file, if any.
    pub fn session_path(&self) -> Option<PathBuf> {
        self.lock().as_ref().map(|active| active.path.clone())
    }
}

impl Write for SessionLogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        if let Some(active) = self.lock().as_mut() {
            active.file.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        if let Some(active) = self.lock().as_mut() {
            active.file.flush()?;
        }
        Ok(())
    }
}

/// Timestamp used in session file names.
pub fn session_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d_%H-%M-%S").to_string()
}

/// Level tag printed for a record.
pub fn level_tag(record: &Record<'_>) -> &'static str {
    if record.target() == RESULT_TARGET {
        "RESULT"
    } else {
        record.level().as_str()
    }
}

/// Install the global logger writing through `sink`.
///
/// `RUST_LOG` overrides the default `info` filter.
pub fn init_logging(sink: SessionLogSink) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                level_tag(record),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(sink)))
        .init();
}
