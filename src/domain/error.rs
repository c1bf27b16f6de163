//! Domain error types.

/// Top-level error type for macross.
#[derive(Debug, thiserror::Error)]
pub enum MacrossError {
    /// `index` is the period whose return needs the ratio; `prior_index` holds
    /// the offending close.
    #[error("undefined return at index {index}: close {close} at index {prior_index} is not positive")]
    NonPositiveClose {
        index: usize,
        prior_index: usize,
        close: f64,
    },

    #[error("insufficient data for {what}: have {have}, need {need}")]
    InsufficientData {
        what: String,
        have: usize,
        need: usize,
    },

    #[error("no valid price observations in {source_name}")]
    NoData { source_name: String },

    #[error("failed to load {path}: {reason}")]
    DataLoad { path: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl MacrossError {
    pub(crate) fn config_invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        MacrossError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&MacrossError> for std::process::ExitCode {
    fn from(err: &MacrossError) -> Self {
        let code: u8 = match err {
            MacrossError::Io(_) | MacrossError::DataLoad { .. } => 1,
            MacrossError::ConfigParse { .. } | MacrossError::ConfigInvalid { .. } => 2,
            MacrossError::NoData { .. }
            | MacrossError::InsufficientData { .. }
            | MacrossError::NonPositiveClose { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
