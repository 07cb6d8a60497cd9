//! Tracing setup shared by `sn-api` and `sn-seed`.
//!
//! `RUST_LOG` wins when set; otherwise `SN_LOG_LEVEL` (default `info`) applies
//! to every target. `SN_LOG_DIR` switches output to a daily rotated
//! `<dir>/<app>.log`.

use std::any::Any;
use std::env;
use std::panic;
use std::path::PathBuf;
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

const DEFAULT_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub directory: Option<PathBuf>,
    pub level: String,
}

impl LogSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        Self {
            directory: non_blank("SN_LOG_DIR").map(PathBuf::from),
            level: non_blank("SN_LOG_LEVEL")
                .map(|level| level.trim().to_lowercase())
                .unwrap_or_else(|| DEFAULT_LEVEL.to_string()),
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".into())
}

/// Route panics through `tracing` so they land in the same sink as request
/// logs. Installed once per process.
pub fn install_tracing_panic_hook(app_name: &'static str) {
    static INSTALLED: OnceLock<()> = OnceLock::new();

    INSTALLED.get_or_init(|| {
        panic::set_hook(Box::new(move |info| {
            let thread = std::thread::current();
            let location = info
                .location()
                .map(|loc| format!("{}:{}", loc.file(), loc.line()));

            tracing::error!(
                application = app_name,
                thread = thread.name().unwrap_or("unnamed"),
                location = location.as_deref().unwrap_or("unknown"),
                panic_message = %panic_message(info.payload()),
                "panic"
            );
        }));
    });
}

fn file_writer(dir: PathBuf, app_name: &str) -> Option<BoxMakeWriter> {
    if let Err(err) = std::fs::create_dir_all(&dir) {
        eprintln!("cannot create log directory {}: {err}; logging to stdout", dir.display());
        return None;
    }

    let appender = tracing_appender::rolling::daily(dir, format!("{app_name}.log"));
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);
    let _ = LOG_GUARD.set(guard);
    Some(BoxMakeWriter::new(non_blocking))
}

pub fn init_tracing_subscriber(app_name: &'static str) {
    let settings = LogSettings::from_env();
    let builder = tracing_subscriber::fmt().with_env_filter(settings.filter());

    match settings.directory.and_then(|dir| file_writer(dir, app_name)) {
        Some(writer) => {
            let _ = builder.with_ansi(false).with_writer(writer).try_init();
        }
        None => {
            let _ = builder.try_init();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings(vars: &[(&str, &str)]) -> LogSettings {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        LogSettings::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_to_stdout_at_info() {
        let settings = settings(&[]);
        assert_eq!(settings.directory, None);
        assert_eq!(settings.level, "info");
    }

    #[test]
    fn reads_directory_and_level() {
        let settings = settings(&[("SN_LOG_DIR", "/var/log/sn"), ("SN_LOG_LEVEL", " DEBUG ")]);
        assert_eq!(settings.directory, Some(PathBuf::from("/var/log/sn")));
        assert_eq!(settings.level, "debug");
    }

    #[test]
    fn blank_values_are_ignored() {
        let settings = settings(&[("SN_LOG_DIR", "  "), ("SN_LOG_LEVEL", "")]);
        assert_eq!(settings, LogSettings {
            directory: None,
            level: "info".into(),
        });
    }

    #[test]
    fn panic_payloads_become_text() {
        assert_eq!(panic_message(&"boom"), "boom");
        assert_eq!(panic_message(&String::from("bang")), "bang");
        assert_eq!(panic_message(&42u8), "non-string panic payload");
    }

    #[test]
    fn init_is_idempotent() {
        init_tracing_subscriber("sn-test");
        init_tracing_subscriber("sn-test");
    }
}
