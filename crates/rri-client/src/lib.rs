//! rri-client
//!
//! Submits batches of registry orders over one persistent connection
//! and collects the answers, strictly one order in flight at a time.
//!
//! - [`framer`]     : frames on a live stream (size limits, deadlines)
//! - [`exchange`]   : drives a batch order by order
//! - [`sink`]       : where answers go
//! - [`connection`] : TLS connection setup / teardown
//! - [`config`]     : environment-based configuration

pub mod config;
pub mod connection;
pub mod error;
pub mod exchange;
pub mod framer;
pub mod sink;

pub use error::{ExchangeError, FramePart, TransportError};
pub use exchange::{run_exchange, Exchange, ExchangeOptions, ExchangeState, ExchangeSummary};
pub use framer::{read_frame, write_frame, ReadLimits};
pub use sink::{AnswerSink, AnswerWriter};
