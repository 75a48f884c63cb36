use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnrichError {
    #[error("OPENAI_API_KEY is not set (add it to .env or pass --api-key)")]
    MissingCredential,

    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Output path {} would overwrite the input file", .0.display())]
    OutputOverwritesInput(PathBuf),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure of a single generation call. Terminal for the record it was made
/// for, never for the run.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("LLM API call failed: {0}")]
    Transport(String),

    #[error("LLM API error ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("Malformed LLM response: {0}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, EnrichError>;
