use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Terminal call {call} failed: {message}")]
    TerminalError { call: String, message: String },

    #[error("Cannot determine window size: {0}")]
    WindowSizeError(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    FileSystem,
    Terminal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ViewerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::IoError(_) => ErrorCategory::FileSystem,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::TerminalError { .. } | Self::WindowSizeError(_) => ErrorCategory::Terminal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::WindowSizeError(_) => ErrorSeverity::Medium,
            Self::IoError(_)
            | Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorSeverity::High,
            Self::TerminalError { .. } => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的簡短訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::IoError(e) => format!("File access failed: {}", e),
            Self::ConfigError { message } => format!("Invalid configuration: {}", message),
            Self::ConfigValidationError { field, message } => {
                format!("Configuration field '{}' is invalid: {}", field, message)
            }
            Self::InvalidConfigValueError { field, value, reason } => {
                format!("'{}' is not a valid {}: {}", value, field, reason)
            }
            Self::TerminalError { call, .. } => {
                format!("The terminal could not be controlled ({} failed)", call)
            }
            Self::WindowSizeError(_) => "The terminal window size is unknown".to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the TOML config file and command line flags against the documented options"
            }
            ErrorCategory::FileSystem => {
                "Make sure the file exists and that you have read/write permission"
            }
            ErrorCategory::Terminal => {
                "Run viewer from an interactive terminal (not a pipe) or run `stty sane` to reset it"
            }
        }
    }

    /// Process exit code for the binary, by severity.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, ViewerError>;
