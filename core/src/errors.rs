use thiserror::Error;

/// Errors raised while talking to the LLM provider
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The provider rejected the credential (HTTP 401)
    #[error("Provider rejected the API key: {0}")]
    Unauthorized(String),

    #[error("HTTP Error: {status_code} - {message}")]
    HttpError { status_code: u16, message: String },

    #[error("Request Error: {0}")]
    RequestError(String),

    #[error("Parsing Error: {0}")]
    ParsingError(String),

    /// The reply carried no text segment
    #[error("Response Error: {0}")]
    EmptyResponse(String),

    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),
}

impl ProviderError {
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ProviderError::Unauthorized(_))
    }
}

/// Errors raised while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration Error: {0}")]
    Invalid(String),

    #[error(transparent)]
    Load(#[from] config::ConfigError),
}

pub type ProviderResult<T> = Result<T, ProviderError>;

pub type ConfigResult<T> = Result<T, ConfigError>;
