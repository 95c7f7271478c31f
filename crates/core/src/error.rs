//! Errors raised at the edges of the report pipeline.
//!
//! Building a document never fails. These variants cover decoding the inputs handed to the
//! pipeline and validating startup configuration.

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unsupported locale: {0}")]
    UnsupportedLocale(String),
    #[error("unsupported field record version {found} (expected {expected})")]
    UnsupportedRecordVersion { found: u32, expected: u32 },
    #[error("failed to deserialize field record JSON: {0}")]
    RecordJson(serde_json::Error),
    #[error("failed to deserialize field record YAML: {0}")]
    RecordYaml(serde_yaml::Error),
    #[error("field record must be a mapping")]
    RecordNotMapping,
    #[error("failed to serialize document: {0}")]
    Serialization(serde_json::Error),
}

pub type ReportResult<T> = std::result::Result<T, ReportError>;
