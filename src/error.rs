use std::io;

/// Reasons an upgrade request is refused before any stream takeover.
///
/// These surface to the peer as plain HTTP error responses; after a
/// successful upgrade only [`FrameError`] can occur.
#[derive(Debug)]
pub enum HandshakeError {
    /// `Connection` was not exactly `Upgrade` or `Upgrade` was not
    /// exactly `websocket`.
    NotAnUpgradeRequest,
    /// `Sec-WebSocket-Key` header absent or empty.
    MissingHandshakeKey,
    /// The switching-protocols response could not be fully written,
    /// so the raw stream was never handed over.
    StreamTakeover(io::Error),
}

impl HandshakeError {
    /// Plain-text body for the HTTP error response.
    pub(crate) fn reason(&self) -> &'static str {
        match self {
            Self::NotAnUpgradeRequest => "Not a websocket upgrade request",
            Self::MissingHandshakeKey => "Bad WebSocket handshake",
            Self::StreamTakeover(_) => "Stream takeover failed",
        }
    }
}

/// Errors from the framing codec. Any of these ends the connection.
#[derive(Debug)]
pub enum FrameError {
    /// Short read while a frame was being decoded.
    Truncated(io::Error),
    /// Write to the peer failed mid-frame.
    Io(io::Error),
    /// A frame with FIN clear; fragmented messages are not reassembled.
    FragmentationUnsupported,
}
