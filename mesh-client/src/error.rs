use thiserror::Error;

/// Failures the surrounding application has to act on. Everything else (stale
/// envelopes, rejected descriptions, bad candidates) is logged and absorbed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClientError {
    /// The room was at capacity. Terminal; do not retry.
    #[error("room full: {0}")]
    RoomFull(String),

    /// The signaling channel failed or closed underneath us.
    #[error("signaling connection error: {0}")]
    Transport(String),

    /// The peer-connection engine cannot run in this environment.
    #[error("real-time media not supported: {0}")]
    Unsupported(String),
}
