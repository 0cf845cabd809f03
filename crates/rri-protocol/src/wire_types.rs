//! Low-level wire constants.
//!
//! This module defines:
//! - The size of the frame length prefix.
//! - The delimiters used by the batch file format.
//! - The default upper bound on accepted frame payloads.
//!
//! The actual encode/decode logic lives in `frame_codec` and
//! `batch_codec`.

/// Size of the length prefix in front of every frame.
///
/// The prefix is an unsigned 32-bit integer in network byte order.
/// This is fixed by the remote peer and not configurable.
pub const LENGTH_PREFIX_LEN: usize = 4;

/// Largest payload a frame can describe.
pub const MAX_PAYLOAD_LEN: u64 = u32::MAX as u64;

/// Default maximum payload length accepted when reading a frame (16 MiB).
///
/// Registry answers are a few KiB at most; anything near this limit
/// points at a corrupted stream rather than a real answer.
pub const DEFAULT_MAX_FRAME_LEN: u32 = 16 * 1024 * 1024;

/// Delimiter line separating orders in a batch file.
pub const ORDER_DELIMITER: &[u8] = b"=-=\n";

/// Terminator written after every answer in an answers file.
///
/// Answers do not end with a newline on the wire, so the delimiter
/// line gets its own leading newline.
pub const ANSWER_TERMINATOR: &[u8] = b"\n=-=\n";

/// Returns `true` if a payload of `len` bytes fits in a frame.
pub fn fits_length_prefix(len: usize) -> bool {
    (len as u64) <= MAX_PAYLOAD_LEN
}
