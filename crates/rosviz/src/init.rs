//! Logging setup for applications embedding rosviz-rs.

/// Installs an `env_logger` logger filtered by `RUST_LOG` (default `info`).
///
/// Returns `false` if a logger was already installed, which is not an error:
/// hosts and tests may call this any number of times.
///
/// # Example
///
/// ```no_run
/// rosviz::init_logging();
/// log::info!("visualizing camera calibration");
/// ```
pub fn init_logging() -> bool {
    init_logging_with_default("info")
}

/// Like [`init_logging`] but with a custom default filter, e.g. `"rosviz=debug"`.
pub fn init_logging_with_default(filter: &str) -> bool {
    let env = env_logger::Env::default().default_filter_or(filter);
    let installed = env_logger::Builder::from_env(env).try_init().is_ok();
    if installed {
        log::info!("rosviz-rs {} logging initialized", env!("CARGO_PKG_VERSION"));
    }
    installed
}
