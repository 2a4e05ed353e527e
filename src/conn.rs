use tokio::io::{AsyncRead, AsyncWrite};

use crate::frames::{self, Opcode};

/// Fixed reply sent back when the peer initiates the close handshake.
/// The status code mirrors the close opcode value; it is never derived
/// from the peer's own close reason.
const CLOSE_REPLY_CODE: u16 = Opcode::Close.bits() as u16;
const CLOSE_REPLY_REASON: &str = "bye";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum State {
    Open,
    Closed,
}

/// One upgraded connection: exclusive owner of the raw duplex stream
/// for its whole lifetime.
///
/// The loop is strictly sequential: decode one frame, dispatch, write
/// zero or one reply frames, repeat. The echoed reply for frame N is
/// fully written before frame N+1 is decoded.
pub struct Session<S> {
    stream: S,
    state: State,
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            state: State::Open,
        }
    }

    /// Runs the read/dispatch/write loop until the peer closes or I/O
    /// fails. Consumes the session, so the stream is released exactly
    /// once when this returns, on every exit path.
    pub async fn run(mut self) {
        while self.state == State::Open {
            let frame = match frames::decode(&mut self.stream).await {
                Ok(frame) => frame,
                Err(e) => {
                    // no close frame on this path; the peer gets nothing
                    tracing::warn!(error = ?e, "decode failed, dropping connection");
                    self.state = State::Closed;
                    break;
                }
            };

            tracing::debug!(
                opcode = ?frame.opcode,
                len = frame.payload.len(),
                "frame received"
            );

            match frame.opcode {
                Opcode::Close => {
                    tracing::info!("close received, replying and shutting down");
                    if let Err(e) =
                        frames::encode_close(&mut self.stream, CLOSE_REPLY_CODE, CLOSE_REPLY_REASON)
                            .await
                    {
                        tracing::warn!(error = ?e, "close reply failed");
                    }
                    self.state = State::Closed;
                }
                // ping/pong included: everything but close echoes verbatim
                opcode => {
                    if let Err(e) = frames::encode(&mut self.stream, opcode, &frame.payload).await {
                        tracing::warn!(error = ?e, "echo write failed, dropping connection");
                        self.state = State::Closed;
                    }
                }
            }
        }
    }
}
