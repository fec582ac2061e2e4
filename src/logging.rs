use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;

/// Installs a global subscriber writing to `log_file` through a background writer.
///
/// The terminal is used for drawing, so nothing is logged to stdout. Keep the returned
/// guard alive for as long as logs should be flushed.
pub fn init_logging(log_file: &Path, level: tracing::Level) -> std::io::Result<WorkerGuard> {
    let directory = log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = log_file.file_name().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("log file path {} has no file name", log_file.display()),
        )
    })?;

    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_thread_names(true)
        .with_max_level(level)
        .try_init()
        .map_err(std::io::Error::other)?;
    Ok(guard)
}
