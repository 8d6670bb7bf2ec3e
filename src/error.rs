//! Error types for the IEC 60870-5-104 protocol stack.

use std::borrow::Cow;
use thiserror::Error;

/// Result type alias for IEC 60870-5-104 operations.
pub type Result<T> = std::result::Result<T, Iec60870Error>;

/// IEC 60870-5-104 protocol error types.
///
/// Uses `Cow<'static, str>` to avoid allocations for static error messages.
#[derive(Debug, Error)]
pub enum Iec60870Error {
    /// Violated APDU framing: bad start byte, bad control bits, length out
    /// of range.
    #[error("malformed APDU: {0}")]
    MalformedApdu(Cow<'static, str>),

    /// TypeId schema mismatch or truncated information object.
    #[error("malformed payload: {0}")]
    MalformedPayload(Cow<'static, str>),

    /// Standard-range type identification not in the catalogue.
    #[error("unknown type ID: {0}")]
    UnknownTypeId(u8),

    /// A partially received APDU did not complete in time.
    #[error("fragment timeout: partial APDU did not complete in time")]
    FragmentTimeout,

    /// The sender stayed blocked on the k-window beyond the caller's timeout.
    #[error("window exhausted: {0} I-frames outstanding without acknowledgement")]
    WindowExhausted(u16),

    /// A STARTDT/STOPDT/TESTFR confirmation or an I-frame acknowledgement
    /// did not arrive within t1.
    #[error("handshake timeout: confirmation did not arrive within t1")]
    HandshakeTimeout,

    /// The peer closed the TCP connection.
    #[error("transport closed by peer")]
    TransportClosed,

    /// Received sequence numbers inconsistent with the link state.
    #[error("sequence number mismatch: expected {expected}, got {actual}")]
    SequenceMismatch { expected: u16, actual: u16 },

    /// Data transfer has not been started on this connection.
    #[error("data transfer not started")]
    NotStarted,

    /// The connection has been closed locally.
    #[error("connection closed")]
    ConnectionClosed,

    /// Establishing the TCP connection timed out.
    #[error("connect timeout")]
    ConnectTimeout,

    /// I/O error on the underlying socket.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Iec60870Error {
    /// Create a malformed-APDU error with a static message (zero allocation).
    #[inline]
    pub const fn malformed_apdu_static(msg: &'static str) -> Self {
        Self::MalformedApdu(Cow::Borrowed(msg))
    }

    /// Create a malformed-APDU error with a dynamic message.
    #[inline]
    pub fn malformed_apdu(msg: impl Into<String>) -> Self {
        Self::MalformedApdu(Cow::Owned(msg.into()))
    }

    /// Create a malformed-payload error with a static message (zero allocation).
    #[inline]
    pub const fn malformed_payload_static(msg: &'static str) -> Self {
        Self::MalformedPayload(Cow::Borrowed(msg))
    }

    /// Create a malformed-payload error with a dynamic message.
    #[inline]
    pub fn malformed_payload(msg: impl Into<String>) -> Self {
        Self::MalformedPayload(Cow::Owned(msg.into()))
    }

    /// Whether this error is fatal to the connection.
    ///
    /// Every fatal error transitions the state machine to `Closed` and is
    /// reported through `on_connection_lost`. `WindowExhausted` is the one
    /// protocol error that only concerns the blocked caller.
    #[inline]
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::WindowExhausted(_) | Self::NotStarted | Self::ConnectionClosed
        )
    }
}
