//! Decode a chunked stream delivered a few bytes at a time.

use bytes::BytesMut;
use http::header::HeaderValue;
use hyades::{ChunkedDecoder, ContentState, Decoded, Trailers};

fn main() {
    let mut trailers = Trailers::new();
    trailers.insert("x-checksum", HeaderValue::from_static("2ef7bde6"));

    let mut wire = BytesMut::new();
    hyades::encode_into(&mut wire, b"hello, ", false, None);
    hyades::encode_into(&mut wire, b"world", false, None);
    hyades::encode_into(&mut wire, b"", true, Some(&trailers));
    let wire = wire.freeze();
    println!("wire: {:?}", wire);

    let decoder = ChunkedDecoder::new();
    let mut state = ContentState::new();
    let mut retained = BytesMut::new();
    let mut body = Vec::new();

    'drip: for piece in wire.chunks(3) {
        retained.extend_from_slice(piece);
        let mut region = Some(retained.split().freeze());
        while let Some(input) = region.take() {
            let parsed = decoder
                .decode(&mut state, input)
                .expect("well-formed stream");
            match parsed.unit {
                Some(Decoded::Content(data)) => {
                    body.extend_from_slice(&data);
                    region = parsed.remainder;
                }
                Some(Decoded::Trailer(trailers)) => {
                    println!("trailer: {:?}", trailers);
                    break 'drip;
                }
                None => {
                    if let Some(rest) = parsed.remainder {
                        retained.extend_from_slice(&rest);
                    }
                }
            }
        }
    }

    println!("body: {}", String::from_utf8_lossy(&body));
}
