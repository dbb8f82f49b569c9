use crate::config::AppConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Map the `rotation` config value; anything unknown means a single file
fn rotation(name: &str) -> Rotation {
    match name {
        "minutely" => Rotation::MINUTELY,
        "hourly" => Rotation::HOURLY,
        "daily" => Rotation::DAILY,
        _ => Rotation::NEVER,
    }
}

/// Default directives: configured level for the ledger, sqlx kept at warn
/// because it logs every statement at info.
fn default_filter(config: &AppConfig) -> String {
    format!("{},sqlx=warn", config.log_level)
}

/// Install the global subscriber. `RUST_LOG` wins over the config level.
///
/// Keep the returned guard alive for the lifetime of the process or
/// buffered file output is lost.
pub fn init_logging(config: &AppConfig) -> WorkerGuard {
    let appender = RollingFileAppender::new(
        rotation(&config.rotation),
        &config.log_dir,
        &config.log_file,
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(config)));
    let registry = tracing_subscriber::registry().with(filter);

    if config.use_json {
        // Structured file output only; collectors read the file
        let file_layer = fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(false)
            .with_writer(non_blocking)
            .with_ansi(false);
        registry.with(file_layer).init();
    } else {
        let file_layer = fmt::layer()
            .with_target(false)
            .with_writer(non_blocking)
            .with_ansi(false);
        let stdout_layer = fmt::layer().with_target(false).with_ansi(true);
        registry.with(file_layer).with(stdout_layer).init();
    }

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_names() {
        assert_eq!(rotation("daily"), Rotation::DAILY);
        assert_eq!(rotation("hourly"), Rotation::HOURLY);
        assert_eq!(rotation("never"), Rotation::NEVER);
        assert_eq!(rotation("weekly"), Rotation::NEVER);
    }

    #[test]
    fn test_default_filter_quiets_sqlx() {
        let config = AppConfig::from_yaml(
            "log_level: debug\nlog_dir: ./logs\nlog_file: l.log\nuse_json: false\nrotation: never\nserver:\n  host: 127.0.0.1\n  port: 1\n",
        )
        .unwrap();
        assert_eq!(default_filter(&config), "debug,sqlx=warn");
    }
}
