//! Errors of the real-time driver. Effects themselves never fail: missing
//! elements and the like are skipped silently.

/// Error type for driver operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The event loop could not be created or failed while running
    #[error("Event loop error: {0}")]
    EventLoop(#[from] calloop::Error),

    /// An event source could not be registered with the loop
    #[error("Failed to register {source_name}: {error}")]
    InsertSource {
        source_name: &'static str,
        #[source]
        error: calloop::Error,
    },
}

/// Result type for driver operations
pub type Result<T> = std::result::Result<T, Error>;
