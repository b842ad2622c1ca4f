use crate::core::editor::EditorSettings;
use crate::domain::model::WindowSize;
use crate::utils::error::{Result, ViewerError};
use crate::utils::validation::{
    validate_one_of, validate_path, validate_positive_number, validate_range, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const LOG_FORMATS: [&str; 2] = ["compact", "json"];
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub editor: EditorSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSection {
    pub status_prefix: String,
    pub quit_confirmations: u32,
    pub default_rows: usize,
    pub default_cols: usize,
}

impl Default for EditorSection {
    fn default() -> Self {
        let settings = EditorSettings::default();
        Self {
            status_prefix: settings.status_prefix,
            quit_confirmations: settings.quit_confirmations,
            default_rows: settings.default_size.rows,
            default_cols: settings.default_size.cols,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub enabled: bool,
    pub file: String,
    pub level: String,
    pub format: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            enabled: false,
            file: "viewer.log".to_string(),
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ViewerError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ViewerError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${HOME})，未定義的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ViewerError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_positive_number("editor.default_rows", self.editor.default_rows, 3)?;
        validate_positive_number("editor.default_cols", self.editor.default_cols, 20)?;
        validate_range(
            "editor.quit_confirmations",
            self.editor.quit_confirmations,
            0,
            10,
        )?;

        if self.logging.enabled {
            validate_path("logging.file", &self.logging.file)?;
        }
        validate_one_of("logging.format", &self.logging.format, &LOG_FORMATS)?;
        validate_one_of("logging.level", &self.logging.level, &LOG_LEVELS)?;

        Ok(())
    }

    /// 取得編輯器設定
    pub fn editor_settings(&self) -> EditorSettings {
        EditorSettings {
            status_prefix: self.editor.status_prefix.clone(),
            quit_confirmations: self.editor.quit_confirmations,
            default_size: WindowSize::new(self.editor.default_rows, self.editor.default_cols),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
