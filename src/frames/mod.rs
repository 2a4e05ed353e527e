mod codec;
mod mask;
mod opcode;

pub use codec::{Frame, decode, encode, encode_close};
pub use opcode::Opcode;

pub(crate) use mask::mask;
