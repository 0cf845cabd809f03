//! Frames on a live connection.
//!
//! Builds on `rri_protocol::frame_codec` and adds what a real stream
//! needs: partial reads, a cap on the announced length, and an
//! optional deadline for the whole frame.

use std::io;
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use rri_protocol::wire_types::{DEFAULT_MAX_FRAME_LEN, LENGTH_PREFIX_LEN};
use rri_protocol::{decode_length_prefix, encode_frame};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::{timeout_at, Instant};
use tracing::debug;

use crate::error::{FramePart, TransportError};

/// Bounds applied while reading one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadLimits {
    /// Largest payload length accepted from the peer.
    pub max_frame_len: u32,

    /// Deadline for the complete frame, measured from the start of the
    /// read. `None` waits forever.
    pub timeout: Option<Duration>,
}

impl Default for ReadLimits {
    fn default() -> Self {
        Self {
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
            timeout: None,
        }
    }
}

/// Write `payload` as one frame and flush it.
///
/// Returns the number of payload bytes written.
pub async fn write_frame<W>(conn: &mut W, payload: &[u8]) -> Result<usize, TransportError>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    // Rejects oversized payloads before a single byte goes out.
    let frame = encode_frame(payload)?;

    conn.write_all(&frame)
        .await
        .map_err(|source| TransportError::Write { source })?;
    conn.flush()
        .await
        .map_err(|source| TransportError::Write { source })?;

    debug!(bytes_written = payload.len(), "wrote frame");
    Ok(payload.len())
}

/// Read exactly one frame and return its payload.
pub async fn read_frame<R>(conn: &mut R, limits: &ReadLimits) -> Result<Bytes, TransportError>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let deadline = limits.timeout.map(|after| (Instant::now() + after, after));

    let mut prefix = [0u8; LENGTH_PREFIX_LEN];
    read_exactly(conn, &mut prefix, FramePart::LengthPrefix, deadline).await?;

    let declared = decode_length_prefix(prefix);
    if declared > limits.max_frame_len {
        return Err(TransportError::FrameTooLarge {
            declared,
            max: limits.max_frame_len,
        });
    }
    if declared == 0 {
        debug!(bytes_expected = 0, bytes_received = 0, "read frame");
        return Ok(Bytes::new());
    }

    let mut payload = BytesMut::zeroed(declared as usize);
    read_exactly(conn, &mut payload, FramePart::Payload, deadline).await?;

    debug!(
        bytes_expected = declared,
        bytes_received = payload.len(),
        "read frame"
    );
    Ok(payload.freeze())
}

/// Fill `buf` completely, counting what arrived if the stream gives out.
async fn read_exactly<R>(
    conn: &mut R,
    buf: &mut [u8],
    part: FramePart,
    deadline: Option<(Instant, Duration)>,
) -> Result<(), TransportError>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut filled = 0;

    while filled < buf.len() {
        let read = conn.read(&mut buf[filled..]);
        let res = match deadline {
            Some((at, after)) => match timeout_at(at, read).await {
                Ok(res) => res,
                Err(_) => {
                    return Err(TransportError::ReadTimeout {
                        part,
                        after,
                        obtained: filled,
                    })
                }
            },
            None => read.await,
        };

        match res {
            Ok(0) => {
                return Err(TransportError::ShortRead {
                    part,
                    expected: buf.len(),
                    obtained: filled,
                    source: None,
                })
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(TransportError::ShortRead {
                    part,
                    expected: buf.len(),
                    obtained: filled,
                    source: Some(e),
                })
            }
        }
    }

    Ok(())
}
