//! Logging Infrastructure
//!
//! - console output (pretty for development, JSON for production)
//! - daily rotating application logs in `<log_dir>/app` (deleted after 14 days)
//! - daily audit logs in `<log_dir>/audit` (never deleted)
//!
//! Console and app logs honour `RUST_LOG`, falling back to the configured
//! level. The audit layer only sees events with `target: "audit"`.

use std::fs;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, Registry, filter::filter_fn, fmt, prelude::*};

/// Application logs older than this are removed at startup
const APP_LOG_RETENTION_DAYS: i64 = 14;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Delete `app.YYYY-MM-DD.log` files older than the retention window
///
/// Returns how many files were removed.
pub fn cleanup_old_logs(log_dir: &Path) -> anyhow::Result<usize> {
    let cutoff = chrono::Local::now().date_naive() - chrono::Duration::days(APP_LOG_RETENTION_DAYS);

    let app_log_dir = log_dir.join("app");
    if !app_log_dir.exists() {
        return Ok(0);
    }

    let mut removed = 0;
    for entry in fs::read_dir(app_log_dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        if let Some(date) = app_log_date(name)
            && date < cutoff
        {
            fs::remove_file(&path)?;
            tracing::info!(file = %name, "Deleted old log file");
            removed += 1;
        }
    }

    Ok(removed)
}

/// Date encoded in an `app.YYYY-MM-DD.log` file name
fn app_log_date(name: &str) -> Option<chrono::NaiveDate> {
    let date_part = name.strip_prefix("app.")?.strip_suffix(".log")?;
    chrono::NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Initialize the logging system
///
/// # Arguments
/// * `level` - Log level used when `RUST_LOG` is not set (e.g. "info", "debug")
/// * `json_format` - JSON console output instead of the pretty format
/// * `log_dir` - Optional directory for file logging
///
/// # Examples
/// ```ignore
/// // Development setup (console only)
/// init_logger("debug", false, None)?;
///
/// // Production setup (console + files)
/// init_logger("info", true, Some(Path::new("./stamp-data/logs")))?;
/// ```
pub fn init_logger(level: &str, json_format: bool, log_dir: Option<&Path>) -> anyhow::Result<()> {
    let mut layers: Vec<BoxedLayer> = Vec::new();

    // Console goes to stderr, stdout is reserved for the card itself
    let console_layer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::io::stderr)
            .with_filter(env_filter(level))
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::io::stderr)
            .with_filter(env_filter(level))
            .boxed()
    };
    layers.push(console_layer);

    if let Some(log_dir) = log_dir {
        let app_log_dir = log_dir.join("app");
        let audit_log_dir = log_dir.join("audit");
        fs::create_dir_all(&app_log_dir)?;
        fs::create_dir_all(&audit_log_dir)?;

        // Application logs (rotated daily, subject to cleanup)
        let app_log = daily_appender(&app_log_dir, "app")?;
        let app_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(app_log))
            .with_filter(env_filter(level))
            .with_filter(filter_fn(|meta| meta.target() != "audit"))
            .boxed();
        layers.push(app_layer);

        // Permanent audit logs
        let audit_log = daily_appender(&audit_log_dir, "audit")?;
        let audit_layer = fmt::layer()
            .json()
            .with_target(true)
            .with_writer(std::sync::Mutex::new(audit_log))
            .with_filter(filter_fn(|meta| meta.target() == "audit"))
            .boxed();
        layers.push(audit_layer);
    }

    tracing_subscriber::registry().with(layers).try_init()?;

    if let Some(log_dir) = log_dir {
        match cleanup_old_logs(log_dir) {
            Ok(0) => {}
            Ok(removed) => tracing::debug!(removed, "Old application logs cleaned up"),
            Err(e) => tracing::error!(error = %e, "Failed to cleanup old logs"),
        }
    }

    Ok(())
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

fn daily_appender(dir: &Path, prefix: &str) -> anyhow::Result<RollingFileAppender> {
    Ok(RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(dir)?)
}
