#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

mod conn;
mod error;
mod frames;
mod handshake;
mod server;

pub use conn::Session;
pub use error::{FrameError, HandshakeError};
pub use frames::{Frame, Opcode, decode, encode, encode_close};
pub use handshake::accept_key;
pub use server::{ServerConfig, WebSocketServer};
