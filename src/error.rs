use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Serialize)]
pub struct AppError {
    pub message: String,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError {
            message: err.to_string(),
        }
    }
}

impl From<image::ImageError> for AppError {
    fn from(err: image::ImageError) -> Self {
        AppError {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError {
            message: err.to_string(),
        }
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        AppError {
            message: format!("Storage error: {}", err),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError {
            message: err.to_string(),
        }
    }
}

impl From<exif::Error> for AppError {
    fn from(err: exif::Error) -> Self {
        AppError {
            message: format!("Failed to read EXIF data: {}", err),
        }
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        AppError {
            message: err.to_string(),
        }
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError { message: msg }
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError {
            message: msg.to_string(),
        }
    }
}

/// Failures that can end an upload item's trip through the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Media upload configuration missing")]
    Config,

    #[error("User email missing")]
    MissingSession,

    #[error("No GPS data found")]
    NoGps,

    #[error("Remote call to {endpoint} failed: {message}")]
    Remote { endpoint: String, message: String },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    pub fn remote(endpoint: impl Into<String>, message: impl fmt::Display) -> Self {
        PipelineError::Remote {
            endpoint: endpoint.into(),
            message: message.to_string(),
        }
    }

    /// Message stored on the failed upload item.
    pub fn item_message(&self) -> String {
        match self {
            PipelineError::Config | PipelineError::MissingSession | PipelineError::NoGps => {
                self.to_string()
            }
            PipelineError::Remote { .. } | PipelineError::Io { .. } => {
                "Upload or processing failed".to_string()
            }
        }
    }
}
