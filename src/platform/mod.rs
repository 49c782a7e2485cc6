//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Storage (LocalStorage on web, in-memory elsewhere)

pub mod storage;

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
pub use storage::{KeyValueStore, MemoryStore, default_store};

use std::fmt;

/// Reasons the game cannot reach its first frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupError {
    NoWindow,
    NoCanvas,
    NoAdapter(String),
    Device(String),
    Surface(String),
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartupError::NoWindow => write!(f, "no browser window available"),
            StartupError::NoCanvas => write!(f, "canvas element #canvas not found"),
            StartupError::NoAdapter(e) => write!(f, "no WebGPU adapter: {e}"),
            StartupError::Device(e) => write!(f, "failed to create GPU device: {e}"),
            StartupError::Surface(e) => write!(f, "failed to set up canvas surface: {e}"),
        }
    }
}

impl std::error::Error for StartupError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_error_messages() {
        assert_eq!(
            StartupError::NoCanvas.to_string(),
            "canvas element #canvas not found"
        );
        let err: Box<dyn std::error::Error> = Box::new(StartupError::Device("lost".into()));
        assert!(err.to_string().contains("lost"));
    }
}
