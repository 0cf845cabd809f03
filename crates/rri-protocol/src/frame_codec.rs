//! Length-prefixed frame encoding/decoding.
//!
//! Every order and every answer travels as one frame:
//!
//! ```text
//! [0..4] : payload length N (u32 BE)
//! [4..]  : N payload bytes, verbatim
//! ```
//!
//! There is no checksum, version, or type tag: the frame carries no
//! meaning beyond delimiting the payload.
//!
//! NOTE: This module works on in-memory buffers only. Reading frames
//! off a live connection (with deadlines and size limits) is done by
//! the client's framer on top of these helpers.

use bytes::{BufMut, Bytes, BytesMut};

use crate::wire_types::{fits_length_prefix, LENGTH_PREFIX_LEN};

/// Errors that can arise when encoding/decoding a frame.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FrameError {
    /// Payload too long for the 4-byte length prefix.
    #[error("payload of {len} bytes does not fit a 32-bit length prefix")]
    OversizedPayload { len: usize },

    /// Buffer ends before the frame does.
    #[error("frame truncated: need {expected} bytes, buffer holds {available}")]
    Truncated { expected: usize, available: usize },
}

/// Encode `payload` as a frame.
pub fn encode_frame(payload: &[u8]) -> Result<Bytes, FrameError> {
    let mut out = BytesMut::with_capacity(LENGTH_PREFIX_LEN + payload.len());
    encode_frame_into(payload, &mut out)?;
    Ok(out.freeze())
}

/// Encode `payload` as a frame, appending the bytes to `out`.
///
/// Nothing is appended if the payload is rejected.
pub fn encode_frame_into(payload: &[u8], out: &mut BytesMut) -> Result<(), FrameError> {
    if !fits_length_prefix(payload.len()) {
        return Err(FrameError::OversizedPayload { len: payload.len() });
    }

    out.reserve(LENGTH_PREFIX_LEN + payload.len());
    out.put_u32(payload.len() as u32);
    out.extend_from_slice(payload);

    Ok(())
}

/// Decode the payload length from a 4-byte prefix.
pub fn decode_length_prefix(prefix: [u8; LENGTH_PREFIX_LEN]) -> u32 {
    u32::from_be_bytes(prefix)
}

/// Decode a single frame from the front of `buf`.
///
/// Returns the payload and the total number of bytes the frame
/// occupied, so callers can step over several frames in one buffer.
pub fn decode_frame(buf: &[u8]) -> Result<(&[u8], usize), FrameError> {
    if buf.len() < LENGTH_PREFIX_LEN {
        return Err(FrameError::Truncated {
            expected: LENGTH_PREFIX_LEN,
            available: buf.len(),
        });
    }

    let mut prefix = [0u8; LENGTH_PREFIX_LEN];
    prefix.copy_from_slice(&buf[..LENGTH_PREFIX_LEN]);
    let payload_len = decode_length_prefix(prefix) as usize;

    let frame_len = LENGTH_PREFIX_LEN + payload_len;
    if buf.len() < frame_len {
        return Err(FrameError::Truncated {
            expected: frame_len,
            available: buf.len(),
        });
    }

    Ok((&buf[LENGTH_PREFIX_LEN..frame_len], frame_len))
}
