use thiserror::Error;

#[derive(Error, Debug)]
pub enum PackingListError {
    #[error("Invalid request: {message}")]
    RequestError { message: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Airtable responded with status {status}: {message}")]
    StoreError { status: u16, message: String },

    #[error("Error getting domestic shipments from Airtable: {message}")]
    FetchError { message: String },

    #[error("Error generating packaging list: {0}")]
    XlsxError(#[from] rust_xlsxwriter::XlsxError),

    #[error("Error generating packaging list: {message}")]
    ReportError { message: String },

    #[error("Error uploading packaging list: {message}")]
    PublishError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

/// 錯誤所屬的處理階段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Request,
    Fetch,
    Report,
    Publish,
    Config,
}

impl PackingListError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::RequestError { .. } => ErrorCategory::Request,
            Self::ApiError(_) | Self::StoreError { .. } | Self::FetchError { .. } => {
                ErrorCategory::Fetch
            }
            Self::XlsxError(_) | Self::ReportError { .. } | Self::ValidationError { .. } => {
                ErrorCategory::Report
            }
            Self::PublishError { .. } | Self::IoError(_) => ErrorCategory::Publish,
            Self::UrlError(_)
            | Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Config,
        }
    }
}

pub type Result<T> = std::result::Result<T, PackingListError>;
