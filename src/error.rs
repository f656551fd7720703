use std::fmt;
use std::num::ParseFloatError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CexError {
    // Request errors
    #[error("Invalid query request: {message}")]
    Compilation { message: String },

    // Provider data errors
    // `source` is None when the amount parsed but is not a finite number
    #[error("Invalid amount '{amount}' for metric {metric}")]
    Curation {
        metric: String,
        amount: String,
        #[source]
        source: Option<ParseFloatError>,
    },

    // Output errors
    #[error("{stage} renderer failed")]
    Render {
        stage: RenderStage,
        #[source]
        source: RenderFailure,
    },

    #[error("Upsert failed at batch {failed_batch} after {upserted} vectors were written")]
    PartialUpsert {
        upserted: usize,
        failed_batch: usize,
        #[source]
        source: Box<CexError>,
    },

    // IO-related errors
    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read from stdin")]
    StdinRead(#[from] std::io::Error),

    #[error("JSON error: {context}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    // Environment-related errors
    #[error("Environment variable '{var}' not set")]
    EnvVarMissing { var: String },
}

impl CexError {
    pub fn compilation(message: impl Into<String>) -> Self {
        CexError::Compilation {
            message: message.into(),
        }
    }

    pub fn render(stage: RenderStage, source: impl Into<RenderFailure>) -> Self {
        CexError::Render {
            stage,
            source: source.into(),
        }
    }

    /// Vectors written before the failure, zero for anything but a partial upsert
    pub fn upserted_count(&self) -> usize {
        match self {
            CexError::PartialUpsert { upserted, .. } => *upserted,
            _ => 0,
        }
    }
}

/// The output stage responsible for a render failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStage {
    Table,
    Csv,
    Chart,
    Vector,
    Forecast,
}

impl fmt::Display for RenderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RenderStage::Table => "Table",
            RenderStage::Csv => "CSV",
            RenderStage::Chart => "Chart",
            RenderStage::Vector => "Vector",
            RenderStage::Forecast => "Forecast",
        };
        write!(f, "{}", name)
    }
}

/// Underlying cause of a render failure
#[derive(Error, Debug)]
pub enum RenderFailure {
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    #[error("CSV error")]
    Csv(#[from] csv::Error),

    #[error("HTTP request failed")]
    Http(#[from] reqwest::Error),

    #[error("Failed to encode JSON")]
    Json(#[from] serde_json::Error),

    #[error("API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Embedding count mismatch: sent {expected} texts, received {actual} vectors")]
    EmbeddingCount { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, CexError>;
