/// Typed failures from decoding a provider payload.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid JSON: {reason}")]
    InvalidJson { reason: String },

    #[error("missing field: {field}")]
    MissingField { field: String },

    #[error("suggestion {index} has empty text")]
    EmptyText { index: usize },

    #[error("suggestion {index} confidence {value} outside [0, 1]")]
    ConfidenceOutOfRange { index: usize, value: f64 },

    #[error("suggestion {index} context relevance {value} outside [0, 1]")]
    RelevanceOutOfRange { index: usize, value: f64 },

    #[error("unknown suggestion source: {tag}")]
    UnknownSource { tag: String },
}
