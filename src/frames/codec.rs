use bytes::{BufMut, Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::{Opcode, mask};
use crate::error::FrameError;

const FIN_BIT: u8 = 0b1000_0000;
const MASK_BIT: u8 = 0b1000_0000;

type Result<T> = std::result::Result<T, FrameError>;

/// One decoded wire frame.
///
/// The payload is already unmasked; a frame handed out by [`decode`]
/// always has `fin` set (non-final frames are rejected, never buffered).
#[derive(Debug)]
pub struct Frame {
    pub fin: bool,
    pub opcode: Opcode,
    pub masked: bool,
    pub payload: Bytes,
}

/// Decodes exactly one frame from the stream, consuming exactly its bytes.
///
/// A close opcode short-circuits right after the 2 header bytes and is
/// returned with an empty payload; the extended-length/mask/payload
/// machinery is skipped for that opcode. Extended 64-bit lengths honor
/// only the low 32 bits.
pub async fn decode<S>(stream: &mut S) -> Result<Frame>
where
    S: AsyncRead + Unpin,
{
    let mut header = [0u8; 2];
    stream
        .read_exact(&mut header)
        .await
        .map_err(FrameError::Truncated)?;

    let fin = header[0] & FIN_BIT != 0;
    let opcode = Opcode::from_bits(header[0]);
    let masked = header[1] & MASK_BIT != 0;
    let base_len = usize::from(header[1] & 0x7F);

    // A close is treated as a zero-payload signal; the rest of the frame,
    // if any, is left on the stream. The session tears down right after
    // replying, so those bytes are never read.
    if opcode == Opcode::Close {
        return Ok(Frame {
            fin,
            opcode,
            masked,
            payload: Bytes::new(),
        });
    }

    let payload_len = match base_len {
        126 => {
            let mut ext = [0u8; 2];
            stream
                .read_exact(&mut ext)
                .await
                .map_err(FrameError::Truncated)?;
            usize::from(u16::from_be_bytes(ext))
        }
        127 => {
            let mut ext = [0u8; 8];
            stream
                .read_exact(&mut ext)
                .await
                .map_err(FrameError::Truncated)?;
            // only the low 32 bits are honored; payloads >= 4 GiB are
            // not representable over this codec
            u32::from_be_bytes([ext[4], ext[5], ext[6], ext[7]]) as usize
        }
        n => n,
    };

    let mut mask_key = [0u8; 4];
    if masked {
        stream
            .read_exact(&mut mask_key)
            .await
            .map_err(FrameError::Truncated)?;
    }

    let mut payload = BytesMut::zeroed(payload_len);
    stream
        .read_exact(&mut payload)
        .await
        .map_err(FrameError::Truncated)?;

    if masked {
        mask(&mut payload, mask_key);
    }

    // The frame is fully consumed from the stream, but non-final frames
    // are reported as an error rather than buffered for reassembly.
    if !fin {
        return Err(FrameError::FragmentationUnsupported);
    }

    tracing::trace!(
        ?opcode,
        len = payload.len(),
        masked,
        "frame decoded"
    );
    Ok(Frame {
        fin,
        opcode,
        masked,
        payload: payload.freeze(),
    })
}

/// Encodes one unmasked frame with FIN set: header write, then payload
/// write. A failure of either write aborts the call.
pub async fn encode<S>(stream: &mut S, opcode: Opcode, payload: &[u8]) -> Result<()>
where
    S: AsyncWrite + Unpin,
{
    #![allow(clippy::cast_possible_truncation)]

    let mut header = BytesMut::with_capacity(10);
    header.put_u8(FIN_BIT | opcode.bits());
    match payload.len() {
        len @ 0..=125 => header.put_u8(len as u8),
        len @ 126..=0xFFFF => {
            header.put_u8(126);
            header.put_u16(len as u16);
        }
        len => {
            header.put_u8(127);
            // high 32 bits of the 64-bit slot are always zero
            header.put_u32(0);
            header.put_u32(len as u32);
        }
    }

    stream.write_all(&header).await.map_err(FrameError::Io)?;
    stream.write_all(payload).await.map_err(FrameError::Io)?;
    stream.flush().await.map_err(FrameError::Io)?;

    tracing::trace!(?opcode, len = payload.len(), "frame encoded");
    Ok(())
}

/// Encodes a close frame: 2 big-endian status-code bytes, then the raw
/// reason bytes.
pub async fn encode_close<S>(stream: &mut S, code: u16, reason: &str) -> Result<()>
where
    S: AsyncWrite + Unpin,
{
    let mut payload = BytesMut::with_capacity(2 + reason.len());
    payload.put_u16(code);
    payload.extend_from_slice(reason.as_bytes());
    encode(stream, Opcode::Close, &payload).await
}
