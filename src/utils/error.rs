use thiserror::Error;

#[derive(Error, Debug)]
pub enum YpsError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("{message}")]
    ValidationError { message: String },

    #[error("Payment provider error ({status}): {message}")]
    ProviderError { status: u16, message: String },

    #[error("{message}")]
    SignatureError { message: String },

    #[error("{message}")]
    NotFound { message: String },
}

impl YpsError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// 此錯誤對應的 HTTP 狀態碼
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ValidationError { .. } | Self::SignatureError { .. } => 400,
            _ => 500,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ApiError(e) if e.is_connect() || e.is_timeout() => {
                "Could not reach the payment provider. Check your network connection.".to_string()
            }
            Self::ConfigError { message } => format!("Configuration problem: {}", message),
            Self::MissingConfigError { field } => {
                format!("{} is not set. Export it or add it to the config file.", field)
            }
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("{} is invalid: {}", field, reason)
            }
            Self::ProviderError { message, .. } => {
                format!("The payment provider rejected the request: {}", message)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, YpsError>;
