use thiserror::Error;

#[derive(Error, Debug)]
pub enum CeaError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Image encoding error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Calculation produced a non-finite {quantity}: {value}")]
    NonFiniteResultError { quantity: String, value: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Calculation,
    Output,
}

impl CeaError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CeaError::ConfigError { .. } | CeaError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            CeaError::NonFiniteResultError { .. } => ErrorCategory::Calculation,
            CeaError::IoError(_)
            | CeaError::CsvError(_)
            | CeaError::SerializationError(_)
            | CeaError::ImageError(_) => ErrorCategory::Output,
        }
    }

    /// Process exit code for the binary.
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Configuration => 1,
            ErrorCategory::Calculation => 2,
            ErrorCategory::Output => 3,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CeaError::ConfigError { message } => format!("Configuration problem: {}", message),
            CeaError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            CeaError::NonFiniteResultError { quantity, .. } => {
                format!("The analysis could not compute a valid {}", quantity)
            }
            CeaError::IoError(e) => format!("Could not read or write a file: {}", e),
            CeaError::CsvError(e) => format!("Could not write the summary table: {}", e),
            CeaError::SerializationError(e) => format!("Could not serialize results: {}", e),
            CeaError::ImageError(e) => format!("Could not encode the plane image: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the TOML file and command-line overrides against the documented ranges"
            }
            ErrorCategory::Calculation => {
                "Make sure every cost, QALY and rate input is a finite, non-negative number"
            }
            ErrorCategory::Output => {
                "Check that the output directory exists or can be created and is writable"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, CeaError>;
