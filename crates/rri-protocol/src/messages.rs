//! Order and answer payloads.
//!
//! Both are opaque byte blobs: the client never looks inside them.
//! An order's identity is its position in the batch it came from.

use std::fmt;

use bytes::Bytes;

/// One request payload sent to the registry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Order(Bytes);

/// The response payload to exactly one [`Order`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Answer(Bytes);

macro_rules! payload_type {
    ($name:ident) => {
        impl $name {
            pub fn new(payload: impl Into<Bytes>) -> Self {
                Self(payload.into())
            }

            pub fn as_bytes(&self) -> &[u8] {
                &self.0
            }

            pub fn len(&self) -> usize {
                self.0.len()
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            pub fn into_bytes(self) -> Bytes {
                self.0
            }

            /// Payload as text, for diagnostics only.
            pub fn to_text_lossy(&self) -> std::borrow::Cow<'_, str> {
                String::from_utf8_lossy(&self.0)
            }
        }

        impl From<Bytes> for $name {
            fn from(b: Bytes) -> Self {
                Self(b)
            }
        }

        impl From<Vec<u8>> for $name {
            fn from(v: Vec<u8>) -> Self {
                Self(Bytes::from(v))
            }
        }

        impl From<&'static str> for $name {
            fn from(s: &'static str) -> Self {
                Self(Bytes::from_static(s.as_bytes()))
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_text_lossy())
            }
        }
    };
}

payload_type!(Order);
payload_type!(Answer);
