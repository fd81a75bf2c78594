use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Model request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    ParquetError(#[from] parquet::errors::ParquetError),

    #[error("Keyword automaton build failed: {0}")]
    KeywordIndexError(#[from] aho_corasick::BuildError),

    #[error("Worker pool build failed: {0}")]
    WorkerPoolError(#[from] rayon::ThreadPoolBuildError),

    #[error("Progress bar template error: {0}")]
    ProgressTemplateError(#[from] indicatif::style::TemplateError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Tokenizer setup failed: {message}")]
    TokenizerError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Sentiment model error (status {status}): {message}")]
    ModelError { status: u16, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Data,
    Storage,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::TokenizerError { .. }
            | EtlError::ProgressTemplateError(_) => ErrorCategory::Configuration,
            EtlError::ApiError(_) | EtlError::ModelError { .. } => ErrorCategory::Network,
            EtlError::SerializationError(_)
            | EtlError::ArrowError(_)
            | EtlError::KeywordIndexError(_)
            | EtlError::ProcessingError { .. }
            | EtlError::ValidationError { .. } => ErrorCategory::Data,
            EtlError::IoError(_) | EtlError::ParquetError(_) => ErrorCategory::Storage,
            EtlError::WorkerPoolError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 網路錯誤通常重試即可
            EtlError::ApiError(_) => ErrorSeverity::Medium,
            EtlError::ModelError { status, .. } if *status == 429 || *status >= 500 => {
                ErrorSeverity::Medium
            }
            EtlError::WorkerPoolError(_) | EtlError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.severity() == ErrorSeverity::Medium
    }

    pub fn recovery_suggestion(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the job TOML file and command-line arguments".to_string()
            }
            ErrorCategory::Network => match self {
                EtlError::ModelError { status: 401, .. } | EtlError::ModelError { status: 403, .. } => {
                    "Check the model API token (model.api_token)".to_string()
                }
                _ => "Check the inference endpoint and retry later".to_string(),
            },
            ErrorCategory::Data => {
                "Check that the parquet files contain the configured text columns".to_string()
            }
            ErrorCategory::Storage => {
                "Check that input/output directories exist and are writable".to_string()
            }
            ErrorCategory::System => "Lower filter.n_jobs or free system resources".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::MissingConfigError { field } => {
                format!("Required setting '{}' is missing", field)
            }
            EtlError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            EtlError::ModelError { status, .. } => {
                format!("The sentiment model endpoint answered with HTTP {}", status)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
