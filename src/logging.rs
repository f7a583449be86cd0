//! Logger setup. Lines go to stdout and, optionally, to a file.

use std::str::FromStr;

use gltut_core::config::LoggingConfig;

use crate::error::AppError;

/// Parses a level name such as `"info"` or `"TRACE"`.
pub fn parse_level(level: &str) -> Result<log::LevelFilter, AppError> {
    log::LevelFilter::from_str(level.trim())
        .map_err(|_| AppError::Logging(format!("unknown log level {level:?}")))
}

/// Installs the global logger. Can only succeed once per process.
pub fn init(config: &LoggingConfig) -> Result<(), AppError> {
    let level = parse_level(&config.level)?;

    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stdout());

    if let Some(path) = &config.file {
        let file = fern::log_file(path)
            .map_err(|err| AppError::Logging(format!("{}: {err}", path.display())))?;
        dispatch = dispatch.chain(file);
    }

    dispatch
        .apply()
        .map_err(|err| AppError::Logging(err.to_string()))
}
