//! Shared error type across go2link crates.

use thiserror::Error;

/// Stable error codes (safe to log, match on, or surface to operators).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Channel is closed or not yet validated.
    TransportNotOpen,
    /// Malformed frame.
    Codec,
    /// Peer violated the chunking rules.
    Protocol,
    /// Validation challenge not accepted.
    HandshakeRejected,
    /// Request built without an api id.
    MissingApiId,
    /// Payload decoder failure (including size mismatch).
    Decode,
    /// Outbound queue is full.
    Backpressure,
    /// Pending request dropped before a response arrived.
    Canceled,
    /// Invalid configuration.
    Config,
    /// Unsupported config/protocol version.
    UnsupportedVersion,
}

impl ErrorKind {
    /// String representation used in logs and test vectors.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::TransportNotOpen => "TRANSPORT_NOT_OPEN",
            ErrorKind::Codec => "CODEC",
            ErrorKind::Protocol => "PROTOCOL",
            ErrorKind::HandshakeRejected => "HANDSHAKE_REJECTED",
            ErrorKind::MissingApiId => "MISSING_API_ID",
            ErrorKind::Decode => "DECODE",
            ErrorKind::Backpressure => "BACKPRESSURE",
            ErrorKind::Canceled => "CANCELED",
            ErrorKind::Config => "CONFIG",
            ErrorKind::UnsupportedVersion => "UNSUPPORTED_VERSION",
        }
    }
}

/// Chunking violations. Each one discards the partial assembly it hit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("bad chunk metadata: {0}")]
    BadChunkMetadata(String),
    #[error("chunk limit exceeded: {0}")]
    ChunkLimitExceeded(String),
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, Go2Error>;

/// Unified error type used by core and channel.
#[derive(Debug, Error)]
pub enum Go2Error {
    #[error("data channel is not open")]
    TransportNotOpen,
    #[error("codec: {0}")]
    Codec(String),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error("validation rejected")]
    HandshakeRejected,
    #[error("request requires an api_id")]
    MissingApiId,
    #[error("decompressed size mismatch: expected {expected}, got {actual}")]
    DecodeSizeMismatch { expected: usize, actual: usize },
    #[error("decode: {0}")]
    Decode(String),
    #[error("outbound queue full")]
    OutboundFull,
    #[error("request canceled")]
    RequestCanceled,
    #[error("config: {0}")]
    Config(String),
    #[error("unsupported version")]
    UnsupportedVersion,
}

impl Go2Error {
    /// Map to a stable code.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Go2Error::TransportNotOpen => ErrorKind::TransportNotOpen,
            Go2Error::Codec(_) => ErrorKind::Codec,
            Go2Error::Protocol(_) => ErrorKind::Protocol,
            Go2Error::HandshakeRejected => ErrorKind::HandshakeRejected,
            Go2Error::MissingApiId => ErrorKind::MissingApiId,
            Go2Error::DecodeSizeMismatch { .. } | Go2Error::Decode(_) => ErrorKind::Decode,
            Go2Error::OutboundFull => ErrorKind::Backpressure,
            Go2Error::RequestCanceled => ErrorKind::Canceled,
            Go2Error::Config(_) => ErrorKind::Config,
            Go2Error::UnsupportedVersion => ErrorKind::UnsupportedVersion,
        }
    }

    pub(crate) fn bad_chunk(msg: impl Into<String>) -> Self {
        Go2Error::Protocol(ProtocolError::BadChunkMetadata(msg.into()))
    }
}

impl From<serde_json::Error> for Go2Error {
    fn from(e: serde_json::Error) -> Self {
        Go2Error::Codec(format!("invalid json: {e}"))
    }
}
