use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] tokio_rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid date: {0}")]
    Date(#[from] chrono::ParseError),

    #[error("OpenAI API key is not configured")]
    MissingApiKey,

    #[error("No logs available for summary generation")]
    NoLogs,

    #[error("OpenAI API error: {status} - {message}")]
    OpenAiApi { status: u16, message: String },

    #[error("No response generated from OpenAI")]
    EmptyResponse,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
