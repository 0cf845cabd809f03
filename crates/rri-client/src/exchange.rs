//! Batch exchange driver.
//!
//! Sends the orders of a batch one at a time over a single connection
//! and pairs each with its answer:
//!
//! ```text
//! Idle -> Sending(i) -> AwaitingAnswer(i) -> Delivered(i) -> Sending(i+1) -> ... -> Done
//!             |               |                   |
//!             +---------------+-------------------+--> Failed(i)
//! ```
//!
//! The registry treats the connection as strictly synchronous
//! request/response: order `i + 1` is only written once the answer to
//! order `i` has been read in full and handed to the sink. Any failure
//! aborts the rest of the batch; nothing is retried and answers already
//! delivered stay delivered.

use std::time::Duration;

use rri_protocol::wire_types::DEFAULT_MAX_FRAME_LEN;
use rri_protocol::{Answer, Order};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, error, info, trace};

use crate::error::ExchangeError;
use crate::framer::{read_frame, write_frame, ReadLimits};
use crate::sink::AnswerSink;

/// Tunables for a batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeOptions {
    /// Largest answer accepted from the peer.
    pub max_answer_len: u32,

    /// Deadline for each complete answer. `None` waits forever.
    pub read_timeout: Option<Duration>,

    /// Deadline for the first answer only (the login answer on a fresh
    /// connection). Falls back to `read_timeout` when unset.
    pub first_answer_timeout: Option<Duration>,
}

impl Default for ExchangeOptions {
    fn default() -> Self {
        Self {
            max_answer_len: DEFAULT_MAX_FRAME_LEN,
            read_timeout: None,
            first_answer_timeout: None,
        }
    }
}

/// Where a batch run currently stands. Positions are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeState {
    Idle,
    Sending(usize),
    AwaitingAnswer(usize),
    Delivered(usize),
    Done,
    Failed(usize),
}

impl ExchangeState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExchangeState::Done | ExchangeState::Failed(_))
    }
}

/// Totals for a completed batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExchangeSummary {
    pub orders_sent: usize,
    pub answers_delivered: usize,
    pub bytes_sent: usize,
    pub bytes_received: usize,
}

/// One batch run over a borrowed connection.
///
/// The connection stays exclusively borrowed for the whole run; opening
/// and closing it is the caller's job.
#[derive(Debug)]
pub struct Exchange<'c, C: ?Sized> {
    conn: &'c mut C,
    options: ExchangeOptions,
    state: ExchangeState,
    summary: ExchangeSummary,
}

impl<'c, C> Exchange<'c, C>
where
    C: AsyncRead + AsyncWrite + Unpin + Send + ?Sized,
{
    pub fn new(conn: &'c mut C, options: ExchangeOptions) -> Self {
        Self {
            conn,
            options,
            state: ExchangeState::Idle,
            summary: ExchangeSummary::default(),
        }
    }

    /// Drain `batch` in order, delivering every answer to `sink`.
    pub async fn run<S>(
        mut self,
        batch: &[Order],
        sink: &mut S,
    ) -> Result<ExchangeSummary, ExchangeError>
    where
        S: AnswerSink + ?Sized,
    {
        info!(orders = batch.len(), "starting batch");

        for (index, order) in batch.iter().enumerate() {
            let position = index + 1;
            if let Err(e) = self.exchange_one(position, order, sink).await {
                self.transition(ExchangeState::Failed(position));
                error!(position, delivered = e.delivered(), "batch aborted: {}", e);
                return Err(e);
            }
        }

        self.transition(ExchangeState::Done);
        info!(
            orders_sent = self.summary.orders_sent,
            bytes_sent = self.summary.bytes_sent,
            bytes_received = self.summary.bytes_received,
            "batch complete"
        );
        Ok(self.summary)
    }

    async fn exchange_one<S>(
        &mut self,
        position: usize,
        order: &Order,
        sink: &mut S,
    ) -> Result<(), ExchangeError>
    where
        S: AnswerSink + ?Sized,
    {
        let delivered = self.summary.answers_delivered;

        self.transition(ExchangeState::Sending(position));
        trace!(position, order = %order, "order");
        let written = write_frame(&mut *self.conn, order.as_bytes())
            .await
            .map_err(|source| ExchangeError::Send {
                position,
                delivered,
                source,
            })?;
        self.summary.orders_sent += 1;
        self.summary.bytes_sent += written;

        self.transition(ExchangeState::AwaitingAnswer(position));
        let limits = self.answer_limits(position);
        let payload = read_frame(&mut *self.conn, &limits)
            .await
            .map_err(|source| ExchangeError::Receive {
                position,
                delivered,
                source,
            })?;
        self.summary.bytes_received += payload.len();

        let answer = Answer::new(payload);
        trace!(position, answer = %answer, "answer");
        sink.deliver(&answer)
            .await
            .map_err(|source| ExchangeError::Sink {
                position,
                delivered,
                source,
            })?;
        self.summary.answers_delivered += 1;
        self.transition(ExchangeState::Delivered(position));

        debug!(
            position,
            order_bytes = written,
            answer_bytes = answer.len(),
            "order answered"
        );
        Ok(())
    }

    fn answer_limits(&self, position: usize) -> ReadLimits {
        let timeout = if position == 1 {
            self.options.first_answer_timeout.or(self.options.read_timeout)
        } else {
            self.options.read_timeout
        };

        ReadLimits {
            max_frame_len: self.options.max_answer_len,
            timeout,
        }
    }

    fn transition(&mut self, next: ExchangeState) {
        debug_assert!(!self.state.is_terminal(), "transition out of {:?}", self.state);
        trace!(from = ?self.state, to = ?next, "exchange state");
        self.state = next;
    }
}

/// Run `batch` against `conn` with a fresh [`Exchange`].
pub async fn run_exchange<C, S>(
    conn: &mut C,
    batch: &[Order],
    sink: &mut S,
    options: ExchangeOptions,
) -> Result<ExchangeSummary, ExchangeError>
where
    C: AsyncRead + AsyncWrite + Unpin + Send + ?Sized,
    S: AnswerSink + ?Sized,
{
    Exchange::new(conn, options).run(batch, sink).await
}
