//! Tracing setup for the CLI
//!
//! Logs go to stderr by default. With `--log-dir` they are appended to
//! `payday.log` in that directory, which is trimmed to its newest lines on
//! startup once it grows past [`LogLimits::max_bytes`].

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_FILE_NAME: &str = "payday.log";

/// Size bounds for the log file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogLimits {
    /// Trim once the file is larger than this
    pub max_bytes: u64,
    /// Bytes of newest output kept by a trim
    pub keep_bytes: u64,
}

impl Default for LogLimits {
    fn default() -> Self {
        Self {
            max_bytes: 5 * 1024 * 1024,
            keep_bytes: 1024 * 1024,
        }
    }
}

/// Cut `path` down to its last `keep_bytes`, starting at a line boundary.
///
/// Returns whether the file was trimmed. A missing file is not an error.
pub(crate) fn trim_log(path: &Path, limits: LogLimits) -> io::Result<bool> {
    let len = match fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };
    if len <= limits.max_bytes {
        return Ok(false);
    }

    let mut tail = Vec::new();
    {
        let mut file = File::open(path)?;
        file.seek(SeekFrom::Start(len.saturating_sub(limits.keep_bytes)))?;
        file.read_to_end(&mut tail)?;
    }
    let first_line = tail
        .iter()
        .position(|&b| b == b'\n')
        .map_or(0, |newline| newline + 1);

    let kept = &tail[first_line..];
    let mut file = File::create(path)?;
    writeln!(
        file,
        "--- trimmed {} bytes of older log output ---",
        len - kept.len() as u64
    )?;
    file.write_all(kept)?;
    Ok(true)
}

/// Where formatted events are written
#[derive(Clone)]
enum LogTarget {
    Stderr,
    File(Arc<Mutex<File>>),
}

impl LogTarget {
    fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(LogTarget::File(Arc::new(Mutex::new(file))))
    }

    fn is_terminal(&self) -> bool {
        matches!(self, LogTarget::Stderr)
    }
}

/// One event's worth of output for a [`LogTarget`]
enum LogSink {
    Stderr(io::Stderr),
    File(Arc<Mutex<File>>),
}

impl Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            LogSink::Stderr(stderr) => stderr.write(buf),
            LogSink::File(file) => file
                .lock()
                .map_err(|_| io::Error::other("log file lock poisoned"))?
                .write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            LogSink::Stderr(stderr) => stderr.flush(),
            LogSink::File(file) => file
                .lock()
                .map_err(|_| io::Error::other("log file lock poisoned"))?
                .flush(),
        }
    }
}

impl<'a> MakeWriter<'a> for LogTarget {
    type Writer = LogSink;

    fn make_writer(&'a self) -> Self::Writer {
        match self {
            LogTarget::Stderr => LogSink::Stderr(io::stderr()),
            LogTarget::File(file) => LogSink::File(Arc::clone(file)),
        }
    }
}

/// Default filter: the CLI at `level`, the engine at warn.
/// `RUST_LOG` replaces it entirely.
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("payday={level},payday_core=warn")))
}

/// Install the global subscriber, writing to stderr or to
/// `{log_dir}/payday.log`.
pub fn init_logging(log_dir: Option<&Path>, level: &str) -> color_eyre::Result<()> {
    let target = match log_dir {
        None => LogTarget::Stderr,
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let path = dir.join(LOG_FILE_NAME);
            if let Err(e) = trim_log(&path, LogLimits::default()) {
                eprintln!("Warning: could not trim {}: {e}", path.display());
            }
            LogTarget::open(&path)?
        }
    };

    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(
            fmt::layer()
                .with_ansi(target.is_terminal())
                .with_target(true)
                .with_writer(target),
        )
        .init();

    if let Some(dir) = log_dir {
        tracing::info!(log_dir = %dir.display(), "payday logging initialized");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: LogLimits = LogLimits {
        max_bytes: 1_000,
        keep_bytes: 300,
    };

    #[test]
    fn test_small_log_is_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LOG_FILE_NAME);
        fs::write(&path, "line one\nline two\n").unwrap();

        assert!(!trim_log(&path, SMALL).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "line one\nline two\n");
    }

    #[test]
    fn test_missing_log_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!trim_log(&dir.path().join(LOG_FILE_NAME), SMALL).unwrap());
    }

    #[test]
    fn test_oversized_log_keeps_whole_newest_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LOG_FILE_NAME);
        let line = "x".repeat(49) + "\n";
        let mut content = line.repeat(40);
        content.push_str("newest entry\n");
        fs::write(&path, &content).unwrap();

        assert!(trim_log(&path, SMALL).unwrap());

        let trimmed = fs::read_to_string(&path).unwrap();
        assert!(trimmed.starts_with("--- trimmed "));
        assert!(trimmed.ends_with("newest entry\n"));
        assert!(trimmed.len() as u64 <= SMALL.keep_bytes + 64);
        // every kept line is whole
        assert!(
            trimmed
                .lines()
                .skip(1)
                .all(|l| l.len() == 49 || l == "newest entry")
        );
    }

    #[test]
    fn test_file_target_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LOG_FILE_NAME);
        fs::write(&path, "earlier\n").unwrap();

        let target = LogTarget::open(&path).unwrap();
        assert!(!target.is_terminal());
        target.make_writer().write_all(b"later\n").unwrap();
        target.make_writer().flush().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "earlier\nlater\n");
    }

    #[test]
    fn test_default_limits() {
        let limits = LogLimits::default();
        assert_eq!(limits.max_bytes, 5 * 1024 * 1024);
        assert!(limits.keep_bytes < limits.max_bytes);
    }
}
