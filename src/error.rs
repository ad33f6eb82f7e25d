use std::sync::Arc;

use thiserror::Error;

/// The failure half of every promise outcome.
///
/// Cloned into each failure handler, so the payloads are reference counted.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// [`race`](crate::race) was called without any promises.
    #[error("no promises specified")]
    NoPromises,

    /// A producer or handler failed.
    #[error("{0}")]
    Rejected(Arc<dyn std::error::Error + Send + Sync + 'static>),

    /// The OS refused to start the thread a promise needed.
    #[error("failed to spawn promise task: {0}")]
    Spawn(Arc<std::io::Error>),

    /// A blocking wait lost every handler that could have woken it.
    #[error("promise abandoned before it settled")]
    Abandoned,
}

#[derive(Debug)]
struct Message(String);

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for Message {}

impl Error {
    /// Wraps any error as a rejection.
    pub fn new<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Rejected(Arc::new(err))
    }

    /// A rejection carrying only a message.
    pub fn msg(message: impl Into<String>) -> Self {
        Error::new(Message(message.into()))
    }
}

impl From<&str> for Error {
    fn from(message: &str) -> Self {
        Error::msg(message)
    }
}

impl From<String> for Error {
    fn from(message: String) -> Self {
        Error::msg(message)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::new(err)
    }
}
