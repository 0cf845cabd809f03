// crates/rri-protocol/tests/frame_codec.rs
use bytes::BytesMut;
use rri_protocol::wire_types::{fits_length_prefix, LENGTH_PREFIX_LEN};
use rri_protocol::{decode_frame, decode_length_prefix, encode_frame, encode_frame_into, FrameError};

#[test]
fn encodes_big_endian_length_then_payload() {
    let frame = encode_frame(b"version: 5.0\naction: LOGIN").unwrap();

    assert_eq!(&frame[..4], &[0, 0, 0, 26]);
    assert_eq!(&frame[4..], b"version: 5.0\naction: LOGIN");
}

#[test]
fn length_prefix_uses_network_byte_order() {
    let payload = vec![b'x'; 0x0102];
    let frame = encode_frame(&payload).unwrap();

    assert_eq!(&frame[..4], &[0x00, 0x00, 0x01, 0x02]);
    assert_eq!(decode_length_prefix([0x01, 0x02, 0x03, 0x04]), 0x0102_0304);
}

#[test]
fn empty_payload_is_a_bare_prefix() {
    let frame = encode_frame(b"").unwrap();
    assert_eq!(&frame[..], &[0, 0, 0, 0]);

    let (payload, used) = decode_frame(&frame).unwrap();
    assert!(payload.is_empty());
    assert_eq!(used, LENGTH_PREFIX_LEN);
}

#[test]
fn decode_inverts_encode() {
    let payloads: [&[u8]; 4] = [
        b"",
        b"ORDER-A",
        "Inhaber: M\u{fc}ller".as_bytes(),
        &[0u8, 255, 10, 13, 0],
    ];

    for p in payloads {
        let frame = encode_frame(p).unwrap();
        let (decoded, used) = decode_frame(&frame).unwrap();
        assert_eq!(decoded, p);
        assert_eq!(used, frame.len());
    }
}

#[test]
fn decode_steps_over_consecutive_frames() {
    let mut buf = BytesMut::new();
    encode_frame_into(b"first", &mut buf).unwrap();
    encode_frame_into(b"second", &mut buf).unwrap();

    let (a, used) = decode_frame(&buf).unwrap();
    assert_eq!(a, b"first");

    let (b, rest) = decode_frame(&buf[used..]).unwrap();
    assert_eq!(b, b"second");
    assert_eq!(used + rest, buf.len());
}

#[test]
fn decode_rejects_short_prefix() {
    let err = decode_frame(&[0, 0]).unwrap_err();
    assert_eq!(
        err,
        FrameError::Truncated {
            expected: 4,
            available: 2
        }
    );
}

#[test]
fn decode_rejects_short_payload() {
    let err = decode_frame(&[0, 0, 0, 5, b'a', b'b']).unwrap_err();
    assert_eq!(
        err,
        FrameError::Truncated {
            expected: 9,
            available: 6
        }
    );
}

#[test]
fn length_prefix_bounds() {
    assert!(fits_length_prefix(0));
    assert!(fits_length_prefix(u32::MAX as usize));
    #[cfg(target_pointer_width = "64")]
    assert!(!fits_length_prefix(u32::MAX as usize + 1));
}

#[test]
fn oversized_error_names_the_length() {
    let err = FrameError::OversizedPayload { len: 5_000_000_000 };
    assert_eq!(
        err.to_string(),
        "payload of 5000000000 bytes does not fit a 32-bit length prefix"
    );
}
