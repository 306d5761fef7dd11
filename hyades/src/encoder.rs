use bytes::{Bytes, BytesMut};

use crate::trailers::Trailers;

const CRLF: &[u8] = b"\r\n";
const LAST_CHUNK: &[u8] = b"0\r\n";

/// Encode one body fragment as a wire-format chunk.
///
/// Non-last fragments become `<hex-size>CRLF<content>CRLF`; an empty
/// non-last fragment produces nothing, since its frame would read as the
/// terminal marker. With `last` set, the terminal `0` line, any `trailers`,
/// and the closing blank line follow the content (trailers passed on a
/// non-last fragment are ignored). The returned buffer is freshly allocated
/// and owned by the caller.
pub fn encode(data: &[u8], last: bool, trailers: Option<&Trailers>) -> Bytes {
    if data.is_empty() && !last {
        return Bytes::new();
    }
    let mut dst = BytesMut::with_capacity(size_hint(data.len(), last, trailers));
    encode_into(&mut dst, data, last, trailers);
    dst.freeze()
}

/// [`encode`], but appending to a caller-supplied buffer.
pub fn encode_into(dst: &mut BytesMut, data: &[u8], last: bool, trailers: Option<&Trailers>) {
    if data.is_empty() && !last {
        return;
    }

    if !data.is_empty() {
        put_hex(dst, data.len() as u64);
        dst.extend_from_slice(CRLF);
        dst.extend_from_slice(data);
        dst.extend_from_slice(CRLF);
    }

    if last {
        dst.extend_from_slice(LAST_CHUNK);
        if let Some(trailers) = trailers {
            trailers.write_wire(dst);
        }
        dst.extend_from_slice(CRLF);
    }

    tracing::trace!(len = data.len(), last = last, "chunk encoded");
}

fn size_hint(len: usize, last: bool, trailers: Option<&Trailers>) -> usize {
    let mut hint = 0;
    if len > 0 {
        // Sixteen hex digits cover any u64 size line.
        hint += 16 + CRLF.len() + len + CRLF.len();
    }
    if last {
        hint += LAST_CHUNK.len() + trailers.map_or(0, Trailers::wire_len) + CRLF.len();
    }
    hint
}

// Lowercase, no leading zeros beyond a single "0".
fn put_hex(dst: &mut BytesMut, n: u64) {
    const DIGITS: &[u8; 16] = b"0123456789abcdef";

    let mut buf = [0u8; 16];
    let mut at = buf.len();
    let mut n = n;
    loop {
        at -= 1;
        buf[at] = DIGITS[(n & 0xf) as usize];
        n >>= 4;
        if n == 0 {
            break;
        }
    }
    dst.extend_from_slice(&buf[at..]);
}

#[cfg(test)]
mod tests {
    use http::header::HeaderValue;

    use super::*;

    #[test]
    fn frames_a_body_fragment() {
        assert_eq!(&encode(b"hello", false, None)[..], b"5\r\nhello\r\n");
    }

    #[test]
    fn sizes_are_lowercase_hex() {
        let data = vec![b'x'; 0x2b8];
        let wire = encode(&data, false, None);

        assert_eq!(&wire[..5], b"2b8\r\n");
        assert_eq!(&wire[wire.len() - 2..], b"\r\n");
        assert_eq!(wire.len(), 5 + data.len() + 2);
    }

    #[test]
    fn an_empty_interior_fragment_stays_off_the_wire() {
        assert!(encode(b"", false, None).is_empty());

        let mut dst = BytesMut::from(&b"untouched"[..]);
        encode_into(&mut dst, b"", false, None);
        assert_eq!(&dst[..], b"untouched");
    }

    #[test]
    fn a_bare_terminal_marker_closes_the_body() {
        assert_eq!(&encode(b"", true, None)[..], b"0\r\n\r\n");
    }

    #[test]
    fn the_terminal_marker_carries_trailers() {
        let mut trailers = Trailers::new();
        trailers.insert("x", HeaderValue::from_static("y"));

        assert_eq!(&encode(b"", true, Some(&trailers))[..], b"0\r\nx: y\r\n\r\n");
    }

    #[test]
    fn a_last_fragment_with_content_emits_both_chunks() {
        let mut trailers = Trailers::new();
        trailers.insert("x", HeaderValue::from_static("y"));

        assert_eq!(
            &encode(b"abc", true, Some(&trailers))[..],
            b"3\r\nabc\r\n0\r\nx: y\r\n\r\n"
        );
    }

    #[test]
    fn trailers_on_an_interior_fragment_are_ignored() {
        let mut trailers = Trailers::new();
        trailers.insert("x", HeaderValue::from_static("y"));

        assert_eq!(&encode(b"abc", false, Some(&trailers))[..], b"3\r\nabc\r\n");
    }

    #[test]
    fn hex_digits_never_carry_leading_zeros() {
        let mut dst = BytesMut::new();
        put_hex(&mut dst, 0);
        assert_eq!(&dst[..], b"0");

        let mut dst = BytesMut::new();
        put_hex(&mut dst, 0x10);
        assert_eq!(&dst[..], b"10");

        let mut dst = BytesMut::new();
        put_hex(&mut dst, u64::MAX);
        assert_eq!(&dst[..], "f".repeat(16).as_bytes());
    }
}
