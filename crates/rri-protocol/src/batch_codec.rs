//! Batch file codec.
//!
//! Input format (batch file → orders):
//!
//! ```text
//! <order 1>=-=
//! <order 2>=-=
//! <order 3>
//! ```
//!
//! Orders are separated by the delimiter line `=-=\n`. Splitting is
//! literal and naive: a trailing delimiter produces a trailing empty
//! order, and an empty file produces a single empty order. Orders must
//! never contain the delimiter themselves; nothing escapes it.
//!
//! Output format (answers → answers file):
//!
//! ```text
//! <answer 1>
//! =-=
//! <answer 2>
//! =-=
//! ```
//!
//! Every answer is followed by `\n=-=\n`, in the order received.

use bytes::Bytes;

use crate::messages::{Answer, Order};
use crate::wire_types::{ANSWER_TERMINATOR, ORDER_DELIMITER};

/// Split a raw batch on every occurrence of `delimiter`.
///
/// Segments come back in their original order and share the input
/// buffer. An empty `delimiter` never matches, so the whole input
/// becomes a single order.
pub fn split_batch(raw: impl Into<Bytes>, delimiter: &[u8]) -> Vec<Order> {
    let raw: Bytes = raw.into();
    let mut orders = Vec::new();

    if delimiter.is_empty() {
        orders.push(Order::new(raw));
        return orders;
    }

    let mut start = 0;
    let mut pos = 0;
    while pos + delimiter.len() <= raw.len() {
        if &raw[pos..pos + delimiter.len()] == delimiter {
            orders.push(Order::new(raw.slice(start..pos)));
            pos += delimiter.len();
            start = pos;
        } else {
            pos += 1;
        }
    }
    orders.push(Order::new(raw.slice(start..)));

    orders
}

/// Split a batch file on the standard order delimiter.
pub fn split_orders(raw: impl Into<Bytes>) -> Vec<Order> {
    split_batch(raw, ORDER_DELIMITER)
}

/// Append one answer and its terminator to `out`.
pub fn format_answer(answer: &Answer, out: &mut Vec<u8>) {
    out.reserve(answer.len() + ANSWER_TERMINATOR.len());
    out.extend_from_slice(answer.as_bytes());
    out.extend_from_slice(ANSWER_TERMINATOR);
}

/// Render a sequence of answers as an answers file.
pub fn format_answers<'a>(answers: impl IntoIterator<Item = &'a Answer>) -> Vec<u8> {
    let mut out = Vec::new();
    for answer in answers {
        format_answer(answer, &mut out);
    }
    out
}
