use crate::config::toml_config::LoggingSection;
use crate::utils::error::Result;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Builds the default filter directive, e.g. `viewer=info`.
pub fn filter_directive(level: &str, verbose: bool) -> String {
    if verbose {
        "viewer=debug".to_string()
    } else {
        format!("viewer={}", level)
    }
}

/// 初始化檔案日誌
///
/// The terminal itself is the user interface, so log output always goes to a
/// file. Returns `false` when logging is disabled and no subscriber was installed.
pub fn init_file_logger(settings: &LoggingSection, verbose: bool) -> Result<bool> {
    if !settings.enabled {
        return Ok(false);
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&settings.file)?;

    let directive = filter_directive(&settings.level, verbose);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    if settings.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.compact())
            .init();
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive() {
        assert_eq!(filter_directive("warn", false), "viewer=warn");
        assert_eq!(filter_directive("warn", true), "viewer=debug");
    }

    #[test]
    fn test_disabled_logging_installs_nothing() {
        let settings = LoggingSection {
            enabled: false,
            ..LoggingSection::default()
        };
        assert!(!init_file_logger(&settings, false).unwrap());
    }
}
