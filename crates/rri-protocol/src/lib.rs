//! rri-protocol
//!
//! Wire-level encoding/decoding for the registry order interface.
//!
//! This crate turns opaque order payloads into length-prefixed frames
//! and back again, and converts between batch files and individual
//! orders / answers.
//!
//! - [`frame_codec`] : `u32` big-endian length-prefixed frames
//! - [`batch_codec`] : `=-=` delimited batch files (orders in, answers out)

pub mod wire_types;
pub mod messages;
pub mod frame_codec;
pub mod batch_codec;

pub use messages::{Answer, Order};

pub use frame_codec::{
    FrameError,
    decode_frame,
    decode_length_prefix,
    encode_frame,
    encode_frame_into,
};

pub use batch_codec::{
    format_answer,
    format_answers,
    split_batch,
    split_orders,
};
