//! Platform-specific directory paths.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::path::PathBuf;

use directories::ProjectDirs;

const QUALIFIER: &str = "dev";
const ORGANIZATION: &str = "filterbar";
const APPLICATION: &str = "filterbar";

/// Log file used when no cache directory is available.
const FALLBACK_LOG: &str = "filterbar-tui.log";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Path to the latest log file.
///
/// - Linux: `$XDG_CACHE_HOME/filterbar/latest.log` or `~/.cache/filterbar/latest.log`
/// - Otherwise the platform cache directory, or `filterbar-tui.log` in the
///   working directory if none can be determined.
pub fn log_file() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.cache_dir().join("latest.log"))
        .unwrap_or_else(|| PathBuf::from(FALLBACK_LOG))
}

/// Default config file location, if a config directory exists.
pub fn config_file() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
}
