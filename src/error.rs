use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReleasesError {
    #[error("Invalid version range specification: {0}")]
    InvalidVersionSpec(String),

    #[error("Metadata retrieval failed: {0}")]
    MetadataRetrieval(String),

    #[error("No matching release of {coordinate}:{version} found for update")]
    UnresolvedVersion { coordinate: String, version: String },

    #[error("Failed to rewrite descriptor: {0}")]
    DocumentRewrite(String),

    #[error("POM parsing failed: {0}")]
    PomParsing(String),

    #[error("Project validation failed: {0}")]
    ProjectValidation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReleasesError>;
