//! Unified error types for the GAT ecosystem
//!
//! [`GatError`] is the error returned at crate boundaries. Carbon annotation
//! itself never fails; errors come from decoding fuel dictionaries and from
//! validating user-supplied intensity tables.
//!
//! # Example
//!
//! ```ignore
//! use gat_core::{GatError, GatResult};
//!
//! fn prepare(json: &str) -> GatResult<()> {
//!     let fuel = FuelDict::from_json_str(json)?;
//!     let options = AnnotateOptions::from_config(&config)?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Unified error type for all GAT operations.
#[derive(Error, Debug)]
pub enum GatError {
    /// Parsing/deserialization errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic errors (for wrapping external errors)
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Results using GatError.
pub type GatResult<T> = Result<T, GatError>;

impl From<anyhow::Error> for GatError {
    fn from(err: anyhow::Error) -> Self {
        GatError::Other(err.to_string())
    }
}

impl From<String> for GatError {
    fn from(s: String) -> Self {
        GatError::Other(s)
    }
}

impl From<&str> for GatError {
    fn from(s: &str) -> Self {
        GatError::Other(s.to_string())
    }
}

impl From<serde_json::Error> for GatError {
    fn from(err: serde_json::Error) -> Self {
        GatError::Parse(err.to_string())
    }
}
