//! Incremental HTTP/1.1 chunked transfer-coding codec.
//!
//! hyades turns an inbound byte stream, delivered in fragments of any size
//! and cut at any boundary, into the content units and terminal trailer of a
//! chunked message body, and turns outbound body fragments back into wire
//! chunks. It does no IO of its own: the connection layer feeds it
//! [`Bytes`](bytes::Bytes) regions as they arrive, keeps the per-message
//! [`ContentState`] between calls, and redispatches whatever a call leaves
//! over.
//!
//! ```
//! use bytes::Bytes;
//! use hyades::{ChunkedDecoder, ContentState, Decoded};
//!
//! let decoder = ChunkedDecoder::new();
//! let mut state = ContentState::new();
//!
//! let parsed = decoder
//!     .decode(&mut state, Bytes::from_static(b"5\r\nhello\r\n0\r\n\r\n"))
//!     .unwrap();
//! match parsed.unit {
//!     Some(Decoded::Content(data)) => assert_eq!(&data[..], b"hello"),
//!     _ => unreachable!(),
//! }
//!
//! // The rest of the region belongs to the terminal chunk; feed it back in.
//! let parsed = decoder.decode(&mut state, parsed.remainder.unwrap()).unwrap();
//! match parsed.unit {
//!     Some(Decoded::Trailer(trailers)) => assert!(trailers.is_empty()),
//!     _ => unreachable!(),
//! }
//! assert!(state.is_complete());
//! ```

#![forbid(unsafe_code)]

mod decoder;
mod encoder;
mod error;
mod scan;
mod state;
mod trailers;

pub use crate::decoder::{
    ChunkedDecoder, Decoded, Parsed, DEFAULT_MAX_TRAILER_LEN, MAX_TRAILER_HEADERS,
};
pub use crate::encoder::{encode, encode_into};
pub use crate::error::DecodeError;
pub use crate::scan::MAX_CHUNK_HEADER_LEN;
pub use crate::state::ContentState;
pub use crate::trailers::Trailers;
