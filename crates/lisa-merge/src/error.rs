//! Error types for lisa-merge

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to parse {label}: {source}")]
    Parse {
        label: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Expected a JSON object in {label}")]
    NotAnObject { label: String },
}
