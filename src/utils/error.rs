use thiserror::Error;

/// 單一欄位的驗證錯誤，例如 `36months.lite`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\" {}", self.path, self.message)
    }
}

#[derive(Error, Debug)]
pub enum PricingError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation failed: {}", join_field_errors(.errors))]
    ValidationError { errors: Vec<FieldError> },

    #[error("Only numbers allowed: '{input}'")]
    InvalidInputError { input: String },

    #[error("Unexpected response status {status}: {body}")]
    UnexpectedStatusError { status: u16, body: String },
}

impl PricingError {
    pub fn is_validation(&self) -> bool {
        matches!(self, PricingError::ValidationError { .. })
    }
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(". ")
}

pub type Result<T> = std::result::Result<T, PricingError>;
