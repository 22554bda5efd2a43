//! Error types for the sysctl channel and for the fetch/reset driver

use std::io;
use thiserror::Error;


#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("sysctl {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },
    /// The kernel returned a buffer that does not match `struct gsostat`
    #[error("sysctl {name}: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
    #[error("invalid sysctl name {0:?}")]
    InvalidName(String),
    #[error("sysctl channel is not available on this platform")]
    Unsupported,
}

#[derive(Debug, Error)]
pub enum GsoError {
    #[error("Error gathering statistics.")]
    Fetch(#[source] ChannelError),
    #[error("Error resetting statistics.")]
    Reset(#[source] ChannelError),
    #[error("Error writing report: {0}")]
    Output(#[from] io::Error),
}

impl GsoError {
    /// Process exit status for this failure
    pub fn exit_code(&self) -> i32 {
        1
    }
}

#[test]
fn test_error_display() {
    let e = GsoError::Fetch(ChannelError::Unsupported);
    assert_eq!(e.to_string(), "Error gathering statistics.");
    let e = GsoError::Reset(ChannelError::SizeMismatch {
        name: "net.gso.stats".to_string(),
        expected: 168,
        actual: 0,
    });
    assert_eq!(e.to_string(), "Error resetting statistics.");
    let src = std::error::Error::source(&e).map(|s| s.to_string());
    assert_eq!(src.as_deref(), Some("sysctl net.gso.stats: expected 168 bytes, got 0"));
    assert_eq!(e.exit_code(), 1);
}
