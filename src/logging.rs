//! File logging for embedders that do not install their own `log` backend.

pub const LOG_FILE_BASENAME: &str = "todo-list";
pub const LOG_FILE_SUFFIX: &str = "log";
pub const LOG_ROTATE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
pub const LOG_ROTATE_KEEP_FILES: usize = 5;
pub const LOG_ENV_VAR: &str = "TODO_LIST_LOG";

/// Log spec used when neither `TODO_LIST_LOG` nor `RUST_LOG` is set.
pub fn default_log_spec() -> &'static str {
    if cfg!(debug_assertions) {
        "warn,todo_list=debug"
    } else {
        "warn,todo_list=info"
    }
}

/// First non-blank value among `TODO_LIST_LOG`, `RUST_LOG`, then the default.
pub fn resolve_log_spec(app_var: Option<String>, rust_log: Option<String>) -> String {
    app_var
        .filter(|value| !value.trim().is_empty())
        .or_else(|| rust_log.filter(|value| !value.trim().is_empty()))
        .unwrap_or_else(|| default_log_spec().to_string())
}

#[cfg(feature = "file-log")]
pub use file_log::init_logging;

#[cfg(feature = "file-log")]
mod file_log {
    use std::path::Path;
    use std::sync::Once;

    use flexi_logger::{
        detailed_format, Cleanup, Criterion, FileSpec, FlexiLoggerError, Logger, LoggerHandle,
        Naming, WriteMode,
    };

    use super::*;

    static PANIC_HOOK: Once = Once::new();

    /// Starts a rotating logger writing `todo-list*.log` into `log_dir`, creating the
    /// directory if needed. Keep the handle alive and call `flush` before reading the
    /// file; lines are buffered.
    pub fn init_logging(log_dir: &Path) -> Result<LoggerHandle, FlexiLoggerError> {
        std::fs::create_dir_all(log_dir)?;
        let spec = resolve_log_spec(
            std::env::var(LOG_ENV_VAR).ok(),
            std::env::var("RUST_LOG").ok(),
        );
        let handle = file_logger(log_dir, &spec)?.start()?;
        PANIC_HOOK.call_once(log_panics);
        log::info!("todo-list logging to {} spec={spec}", log_dir.display());
        Ok(handle)
    }

    fn file_logger(log_dir: &Path, spec: &str) -> Result<Logger, FlexiLoggerError> {
        let files = FileSpec::default()
            .directory(log_dir)
            .basename(LOG_FILE_BASENAME)
            .suffix(LOG_FILE_SUFFIX);
        Ok(Logger::try_with_str(spec)?
            .log_to_file(files)
            .write_mode(WriteMode::BufferAndFlush)
            .format_for_files(detailed_format)
            .rotate(
                Criterion::Size(LOG_ROTATE_SIZE_BYTES),
                Naming::Numbers,
                Cleanup::KeepLogFiles(LOG_ROTATE_KEEP_FILES),
            ))
    }

    /// Chains onto the existing hook so the panic still reaches stderr.
    fn log_panics() {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info: &std::panic::PanicHookInfo<'_>| {
            let message = info
                .payload()
                .downcast_ref::<&str>()
                .copied()
                .or_else(|| info.payload().downcast_ref::<String>().map(String::as_str))
                .unwrap_or("<non-string panic payload>");
            match info.location() {
                Some(location) => log::error!("panic at {location}: {message}"),
                None => log::error!("panic: {message}"),
            }
            previous(info);
        }));
    }
}
