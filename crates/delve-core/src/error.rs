//! Generation errors

use thiserror::Error;

/// Errors that can end or degrade a generation run
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    #[error("Invalid configuration: {parameter} = {value} is outside {range}")]
    InvalidConfiguration {
        parameter: &'static str,
        value: String,
        range: String,
    },

    /// The separation solver hit its step cap with overlaps remaining.
    /// Generation continues with the positions at the cap.
    #[error("Room layout did not settle after {steps} steps")]
    UnresolvedLayout { steps: u32 },

    #[error("No valid start/end room pair among {main_rooms} main rooms")]
    NoValidStartEnd { main_rooms: usize },

    #[error("Grid index ({x}, {y}) out of range for {width}x{height} grid")]
    GridIndexOutOfRange {
        x: i64,
        y: i64,
        width: usize,
        height: usize,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl GenerationError {
    /// Whether a retry with a fresh seed may succeed
    pub fn is_retriable(&self) -> bool {
        matches!(self, GenerationError::NoValidStartEnd { .. })
    }
}

/// Result alias used throughout the crate
pub type Result<T> = core::result::Result<T, GenerationError>;
