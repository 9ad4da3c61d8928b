use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A provider failed to parse, or a value has the wrong type.
    #[error("failed to load portal configuration: {0}")]
    Figment(#[from] figment::Error),

    /// Parsed fine but violates a range or consistency rule.
    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue { field: String, reason: String },
}
