//! Error types for fitboard-core

use thiserror::Error;

pub use fitboard_io::IoError;

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Main error type for dashboard operations
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Invalid action payload
    #[error("Action error: {0}")]
    Action(#[from] ActionError),

    /// Store discipline violations
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Dataset loading errors
    #[error("Dataset error: {0}")]
    Io(#[from] IoError),

    /// Modeling service errors
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    /// Invalid configuration
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// An intent named a variable that is no longer in the state
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    /// An intent named a dataset that is no longer in the catalog
    #[error("Unknown dataset: {0}")]
    UnknownDataset(String),
}

/// Invalid action payloads; always a bug in the dispatching code
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// Model kind outside {linear, quadratic, loess}
    #[error("Illegal model type: {0}")]
    UnknownModel(String),

    /// Slot name that no model uses
    #[error("Unknown slot: {0}")]
    UnknownSlot(String),

    /// Slot not part of the current input binding set
    #[error("Slot {slot} is not an input of the current model")]
    SlotNotBound { slot: String },

    /// Binding a variable while the input binding set is null
    #[error("Model inputs are unset; cannot bind {slot}")]
    InputsUnset { slot: String },

    /// Input slot set disagrees with the model kind
    #[error("Slot set {actual:?} does not match model {model}: expected {expected:?}")]
    SlotMismatch {
        model: String,
        expected: Vec<String>,
        actual: Vec<String>,
    },

    /// A VarRef annotated for a different slot or axis
    #[error("Variable bound for {bound} cannot be placed in {target}")]
    BindingMismatch { bound: String, target: String },

    /// Dataset index past the end of the catalog
    #[error("Dataset index out of range: {0}")]
    DatasetOutOfRange(usize),

    /// Exploratory index outside {0, 1}
    #[error("Exploratory variable index out of range: {0}")]
    AxisOutOfRange(usize),
}

/// Violations of the single-writer store discipline
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// `dispatch` called while another dispatch is still notifying
    #[error("Re-entrant dispatch of {action}; defer it instead")]
    ReentrantDispatch { action: &'static str },

    /// The store behind a handle has been dropped
    #[error("Store has been dropped")]
    Closed,
}

/// Modeling service errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Request failed: {message}")]
    RequestFailed { message: String },

    #[error("Invalid URL: {url}")]
    InvalidUrl { url: String },

    #[error("Service returned status {status}")]
    Status { status: u16 },

    #[error("Parse error: {message}")]
    ParseError { message: String },
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::ParseError {
            message: err.to_string(),
        }
    }
}

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Value out of range: {0}")]
    OutOfRange(String),

    #[error("Duplicate dataset identity: {0}")]
    DuplicateDataset(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_error_display() {
        let err = ActionError::UnknownModel("cubic".to_string());
        assert!(err.to_string().contains("cubic"));
    }

    #[test]
    fn test_wrapped_error_display() {
        let err: DashboardError = StoreError::ReentrantDispatch {
            action: "set_variables",
        }
        .into();
        assert!(err.to_string().contains("set_variables"));
    }

    #[test]
    fn test_io_error_conversion() {
        let err: DashboardError = IoError::FileNotFound("iris.csv".to_string()).into();
        assert!(matches!(err, DashboardError::Io(_)));
    }
}
