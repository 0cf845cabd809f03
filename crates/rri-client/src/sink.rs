//! Destinations for answers.
//!
//! The exchange hands every answer to an [`AnswerSink`] before it sends
//! the next order. [`AnswerWriter`] renders answers in the answers file
//! format and flushes each one, so answers received before a failure
//! are never lost with it.

use std::io;

use async_trait::async_trait;
use rri_protocol::{format_answer, Answer};
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Receives answers in the order they arrive.
#[async_trait]
pub trait AnswerSink: Send {
    async fn deliver(&mut self, answer: &Answer) -> io::Result<()>;
}

/// Writes answers, each followed by the `\n=-=\n` terminator.
#[derive(Debug)]
pub struct AnswerWriter<W> {
    inner: W,
    buf: Vec<u8>,
}

impl<W> AnswerWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            buf: Vec::new(),
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

#[async_trait]
impl<W> AnswerSink for AnswerWriter<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn deliver(&mut self, answer: &Answer) -> io::Result<()> {
        self.buf.clear();
        format_answer(answer, &mut self.buf);

        self.inner.write_all(&self.buf).await?;
        self.inner.flush().await
    }
}

/// Collects answers in memory.
#[async_trait]
impl AnswerSink for Vec<Answer> {
    async fn deliver(&mut self, answer: &Answer) -> io::Result<()> {
        self.push(answer.clone());
        Ok(())
    }
}
