/// Failures that stop a climatology run before any bucket record is produced.
///
/// A bucket without data is not an error: it is carried as
/// `resample::Summary::Empty` and never crosses the aggregation boundary.
#[derive(Debug, thiserror::Error)]
pub enum ClimatologyError {
    /// Invalid precision, inverted interval, or missing input arguments.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Input could not be read or parsed, or holds nothing to aggregate.
    #[error("Load error: {message}")]
    Load { message: String },
}

impl ClimatologyError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn load(message: impl Into<String>) -> Self {
        Self::Load {
            message: message.into(),
        }
    }

    /// True for the errors that should be followed by usage guidance.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}

pub type Result<T> = std::result::Result<T, ClimatologyError>;
