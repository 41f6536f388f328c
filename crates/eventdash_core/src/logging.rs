//! Process-wide logging bootstrap.
//!
//! # Responsibility
//! - Start one rolling file logger per process from the `[logging]` section.
//! - Keep log lines metadata-only: ids, counts, table names, durations.
//!   Guest names, emails and free text never reach the log.
//!
//! # Invariants
//! - Starting again with the same directory and level is a no-op.
//! - Starting again with different settings is rejected, never applied.
//! - Logging failures are returned to the caller; the dashboard keeps running
//!   without logs.

use crate::config::LoggingConfig;
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info, LevelFilter};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::panic::PanicHookInfo;
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "eventdash";
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;
const KEEP_ROTATED_FILES: usize = 5;
const PANIC_SUMMARY_CHARS: usize = 160;

static ACTIVE_LOGGER: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

struct ActiveLogger {
    level: LevelFilter,
    dir: PathBuf,
    _handle: LoggerHandle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoggingError {
    UnknownLevel(String),
    RelativeDir(PathBuf),
    CreateDir { dir: PathBuf, message: String },
    Start(String),
    /// Logging already runs with other settings.
    AlreadyStarted {
        active_level: LevelFilter,
        active_dir: PathBuf,
    },
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownLevel(level) => write!(
                f,
                "unknown log level `{level}`; use trace, debug, info, warn or error"
            ),
            Self::RelativeDir(dir) => {
                write!(f, "log dir must be absolute, got `{}`", dir.display())
            }
            Self::CreateDir { dir, message } => {
                write!(f, "cannot create log dir `{}`: {message}", dir.display())
            }
            Self::Start(message) => write!(f, "cannot start logger: {message}"),
            Self::AlreadyStarted {
                active_level,
                active_dir,
            } => write!(
                f,
                "logging already runs at {} in `{}`",
                active_level.as_str().to_ascii_lowercase(),
                active_dir.display()
            ),
        }
    }
}

impl Error for LoggingError {}

/// Starts file logging at `level` inside the absolute directory `dir`.
pub fn init_logging(level: &str, dir: &Path) -> Result<(), LoggingError> {
    let level = parse_level(level)?;
    if !dir.is_absolute() {
        return Err(LoggingError::RelativeDir(dir.to_path_buf()));
    }

    let active = ACTIVE_LOGGER.get_or_try_init(|| start(level, dir))?;
    if active.level != level || active.dir != dir {
        return Err(LoggingError::AlreadyStarted {
            active_level: active.level,
            active_dir: active.dir.clone(),
        });
    }
    Ok(())
}

/// Starts logging from config.
///
/// Returns `Ok(false)` when no directory is configured; logging then stays
/// off and global state is untouched.
pub fn init_logging_from(config: &LoggingConfig) -> Result<bool, LoggingError> {
    match config.dir.as_deref() {
        Some(dir) => init_logging(&config.level, dir).map(|()| true),
        None => Ok(false),
    }
}

/// Level and directory of the running logger, if any.
pub fn logging_status() -> Option<(LevelFilter, PathBuf)> {
    ACTIVE_LOGGER
        .get()
        .map(|active| (active.level, active.dir.clone()))
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn parse_level(raw: &str) -> Result<LevelFilter, LoggingError> {
    let trimmed = raw.trim();
    let candidate = if trimmed.eq_ignore_ascii_case("warning") {
        "warn"
    } else {
        trimmed
    };
    match candidate.parse::<LevelFilter>() {
        Ok(LevelFilter::Off) | Err(_) => Err(LoggingError::UnknownLevel(trimmed.to_string())),
        Ok(level) => Ok(level),
    }
}

fn start(level: LevelFilter, dir: &Path) -> Result<ActiveLogger, LoggingError> {
    std::fs::create_dir_all(dir).map_err(|err| LoggingError::CreateDir {
        dir: dir.to_path_buf(),
        message: err.to_string(),
    })?;

    let spec = level.as_str().to_ascii_lowercase();
    let handle = Logger::try_with_str(&spec)
        .map_err(|err| LoggingError::Start(err.to_string()))?
        .log_to_file(
            FileSpec::default()
                .directory(dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_ROTATED_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| LoggingError::Start(err.to_string()))?;

    install_panic_hook();
    info!(
        "event=logging_start module=core status=ok version={} os={} level={} log_dir={}",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        spec,
        dir.display()
    );

    Ok(ActiveLogger {
        level,
        dir: dir.to_path_buf(),
        _handle: handle,
    })
}

fn install_panic_hook() {
    if PANIC_HOOK.set(()).is_err() {
        return;
    }
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        error!(
            "event=panic module=core status=error location={} payload={}",
            panic_info
                .location()
                .map_or_else(|| "unknown".to_string(), |loc| format!("{}:{}", loc.file(), loc.line())),
            panic_summary(panic_info)
        );
        previous(panic_info);
    }));
}

/// Panic text may quote guest data, so it is flattened to one capped line.
fn panic_summary(panic_info: &PanicHookInfo<'_>) -> String {
    let payload = panic_info.payload();
    let text = payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload");
    one_line(text, PANIC_SUMMARY_CHARS)
}

fn one_line(text: &str, max_chars: usize) -> String {
    let flat = text.replace(['\n', '\r'], " ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let mut capped = flat.chars().take(max_chars).collect::<String>();
    capped.push_str("...");
    capped
}
