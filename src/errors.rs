use thiserror::Error;

#[derive(Error, Debug)]
pub enum TimetableError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("XLSX error: {0}")]
    XlsxError(#[from] rust_xlsxwriter::XlsxError),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("API key not set: export {0} to enable translations")]
    MissingApiKey(String),

    #[error("Translation task failed: {0}")]
    TaskFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[cfg(feature = "web")]
    #[error("Template error: {0}")]
    TemplateError(String),
}

pub type Result<T> = std::result::Result<T, TimetableError>;
