//! Error module for the SNN radiation library.
use std::error::Error;
use std::fmt;

/// Error types for the library.
#[derive(Debug, PartialEq)]
pub enum SNNError {
    /// Invalid or contradictory fault configuration, e.g., a probability outside [0, 1].
    ConfigError(String),
    /// The requested radiation effect cannot be realized by this operation.
    UnsupportedEffect(String),
    /// A fault that was claimed to be applied is not present in the network.
    PostconditionError(String),
    /// Error for invalid network parameters, e.g., a zero synaptic delay or a duplicate name.
    InvalidParameter(String),
    /// Error for out of bounds access, e.g., neuron not found.
    OutOfBounds(String),
    /// Error for I/O operations.
    IOError(String),
}

impl fmt::Display for SNNError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SNNError::ConfigError(e) => write!(f, "Invalid radiation configuration: {}", e),
            SNNError::UnsupportedEffect(e) => write!(f, "Unsupported radiation effect: {}", e),
            SNNError::PostconditionError(e) => write!(f, "Radiation not applied: {}", e),
            SNNError::InvalidParameter(e) => write!(f, "Invalid parameters: {}", e),
            SNNError::OutOfBounds(e) => write!(f, "Index out of bounds: {}", e),
            SNNError::IOError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl Error for SNNError {}

impl From<std::io::Error> for SNNError {
    fn from(e: std::io::Error) -> Self {
        SNNError::IOError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_problem() {
        let err =
            SNNError::ConfigError("probability_per_step must be in [0, 1], found 1.5".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid radiation configuration: probability_per_step must be in [0, 1], found 1.5"
        );
    }
}
