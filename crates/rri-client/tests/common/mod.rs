// crates/rri-client/tests/common/mod.rs
//
// In-memory stand-in for the registry. Every complete frame written to
// it is recorded and answered with `reply(payload)`; reads drain the
// pending answer. Writing while an answer is still unread fails the
// write, so any test that passes also proves single-flight.
#![allow(dead_code)]

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::BytesMut;
use rri_protocol::{decode_frame, encode_frame_into};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

type Reply = Box<dyn FnMut(&[u8]) -> Vec<u8> + Send>;

pub struct ScriptedPeer {
    reply: Reply,
    inbound: Vec<u8>,
    outbound: BytesMut,
    /// Order payloads received, in arrival order.
    pub received: Vec<Vec<u8>>,
    fail_write_at: Option<usize>,
    answer_limit: Option<usize>,
    truncate_answers_to: Option<usize>,
    chunk: usize,
}

impl ScriptedPeer {
    pub fn new(reply: impl FnMut(&[u8]) -> Vec<u8> + Send + 'static) -> Self {
        Self {
            reply: Box::new(reply),
            inbound: Vec::new(),
            outbound: BytesMut::new(),
            received: Vec::new(),
            fail_write_at: None,
            answer_limit: None,
            truncate_answers_to: None,
            chunk: usize::MAX,
        }
    }

    pub fn echo() -> Self {
        Self::new(|p| p.to_vec())
    }

    pub fn uppercase() -> Self {
        Self::new(|p| p.to_ascii_uppercase())
    }

    /// Fail the first write of the `n`-th order (1-based).
    pub fn fail_write_at(mut self, n: usize) -> Self {
        self.fail_write_at = Some(n);
        self
    }

    /// Answer only the first `n` orders, then go quiet forever.
    pub fn answer_only(mut self, n: usize) -> Self {
        self.answer_limit = Some(n);
        self
    }

    /// Cut every answer frame after `n` bytes, then report EOF.
    pub fn truncate_answers_to(mut self, n: usize) -> Self {
        self.truncate_answers_to = Some(n);
        self
    }

    /// Hand out at most `n` bytes per read.
    pub fn chunked(mut self, n: usize) -> Self {
        self.chunk = n;
        self
    }

    pub fn received_text(&self) -> Vec<String> {
        self.received
            .iter()
            .map(|p| String::from_utf8_lossy(p).into_owned())
            .collect()
    }

    fn take_complete_frames(&mut self) {
        while let Ok((payload, used)) = decode_frame(&self.inbound) {
            let payload = payload.to_vec();
            self.inbound.drain(..used);
            self.received.push(payload.clone());

            let answered = self.received.len();
            if self.answer_limit.is_some_and(|limit| answered > limit) {
                continue;
            }

            let answer = (self.reply)(&payload);
            let mut frame = BytesMut::new();
            encode_frame_into(&answer, &mut frame).expect("answer fits a frame");
            if let Some(n) = self.truncate_answers_to {
                frame.truncate(n);
            }
            self.outbound.extend_from_slice(&frame);
        }
    }

    fn silent(&self) -> bool {
        self.answer_limit
            .is_some_and(|limit| self.received.len() > limit)
    }
}

impl AsyncWrite for ScriptedPeer {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();

        if this.inbound.is_empty() && this.fail_write_at == Some(this.received.len() + 1) {
            return Poll::Ready(Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "peer went away",
            )));
        }
        if !this.outbound.is_empty() {
            return Poll::Ready(Err(io::Error::new(
                io::ErrorKind::Other,
                "order written before previous answer was read",
            )));
        }

        this.inbound.extend_from_slice(buf);
        this.take_complete_frames();
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

impl AsyncRead for ScriptedPeer {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();

        if this.outbound.is_empty() {
            if this.silent() {
                // Never answers; only a deadline gets the reader out.
                return Poll::Pending;
            }
            // EOF
            return Poll::Ready(Ok(()));
        }

        let n = this.outbound.len().min(buf.remaining()).min(this.chunk);
        let bytes = this.outbound.split_to(n);
        buf.put_slice(&bytes);
        Poll::Ready(Ok(()))
    }
}
