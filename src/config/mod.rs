pub mod toml_config;

use crate::utils::error::Result;
use std::path::Path;
use toml_config::TomlConfig;

pub const DEFAULT_CONFIG_FILE: &str = "viewer.toml";

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "viewer")]
#[command(about = "A small raw-mode terminal text editor")]
pub struct CliConfig {
    /// File to open; created on first save if it does not exist
    pub file: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose (debug) logging")]
    pub verbose: bool,

    /// Write logs to this file (enables logging)
    #[arg(long)]
    pub log_file: Option<String>,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Loads the config file and applies command line overrides.
    ///
    /// An explicitly given config file must exist; the default
    /// `viewer.toml` is only read when present.
    pub fn load_settings(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => load_default_config(DEFAULT_CONFIG_FILE)?,
        };

        if let Some(log_file) = &self.log_file {
            config.logging.enabled = true;
            config.logging.file = log_file.clone();
        }

        Ok(config)
    }
}

pub fn load_default_config<P: AsRef<Path>>(path: P) -> Result<TomlConfig> {
    if path.as_ref().exists() {
        TomlConfig::from_file(path)
    } else {
        Ok(TomlConfig::default())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_cli_parsing() {
        let cli = CliConfig::parse_from(["viewer", "notes.txt", "-v", "--log-file", "v.log"]);
        assert_eq!(cli.file.as_deref(), Some("notes.txt"));
        assert!(cli.verbose);
        assert_eq!(cli.log_file.as_deref(), Some("v.log"));
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_log_file_flag_enables_logging() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[logging]\nenabled = false\nlevel = \"warn\"\n")
            .unwrap();

        let cli = CliConfig::parse_from([
            "viewer",
            "--config",
            temp_file.path().to_str().unwrap(),
            "--log-file",
            "override.log",
        ]);
        let config = cli.load_settings().unwrap();
        assert!(config.logging.enabled);
        assert_eq!(config.logging.file, "override.log");
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_explicit_missing_config_fails() {
        let cli = CliConfig::parse_from(["viewer", "--config", "/no/such/viewer.toml"]);
        assert!(cli.load_settings().is_err());
    }

    #[test]
    fn test_missing_default_config_uses_defaults() {
        let config = load_default_config("/no/such/viewer.toml").unwrap();
        assert_eq!(config, TomlConfig::default());
    }
}
