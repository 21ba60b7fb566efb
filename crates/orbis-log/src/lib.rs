//! Structured logging for Orbis.
//!
//! Installs a `tracing` subscriber with console output and, in debug builds,
//! a JSON log file. The filter comes from `RUST_LOG` when set, otherwise from
//! the configured `debug.log_level`.

use std::path::{Path, PathBuf};

use orbis_config::Config;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Name of the JSON log file written in debug builds.
pub const LOG_FILE_NAME: &str = "orbis.log";

/// Filter used when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_FILTER: &str = "info";

/// Filter directive for `config`: its `debug.log_level` when non-empty,
/// otherwise [`DEFAULT_FILTER`].
pub fn filter_directive(config: Option<&Config>) -> String {
    config
        .map(|c| c.debug.log_level.trim())
        .filter(|level| !level.is_empty())
        .unwrap_or(DEFAULT_FILTER)
        .to_string()
}

/// Create an `EnvFilter` with the default filter string.
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}

/// Install the global tracing subscriber.
///
/// - Console output with uptime timestamps, targets and thread names
/// - JSON file logging to `log_dir/orbis.log` when `debug_build` is set
/// - `RUST_LOG` takes precedence over the configured level
///
/// Returns the path of the log file when one is written.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
///
/// ```no_run
/// use orbis_config::Config;
/// use orbis_log::init_logging;
///
/// let config = Config::default();
/// init_logging(Some(std::path::Path::new("./logs")), true, Some(&config)).ok();
/// ```
pub fn init_logging(
    log_dir: Option<&Path>,
    debug_build: bool,
    config: Option<&Config>,
) -> Result<Option<PathBuf>, TryInitError> {
    let directive = filter_directive(config);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&directive));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if debug_build
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
    {
        let log_path = log_dir.join(LOG_FILE_NAME);
        if let Ok(log_file) = std::fs::File::create(&log_path) {
            let file_layer = fmt::layer()
                .with_writer(log_file)
                .with_ansi(false)
                .with_target(true)
                .with_timer(fmt::time::uptime())
                .json();
            subscriber.with(file_layer).try_init()?;
            return Ok(Some(log_path));
        }
    }

    subscriber.try_init()?;
    Ok(None)
}
