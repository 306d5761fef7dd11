use bytes::Bytes;

use crate::error::DecodeError;
use crate::scan::{self, Scan};
use crate::state::ContentState;
use crate::trailers::Trailers;

/// Trailer byte budget used when none is configured.
pub const DEFAULT_MAX_TRAILER_LEN: usize = 8 * 1024;

/// Most trailer header lines a single message may carry.
pub const MAX_TRAILER_HEADERS: usize = 16;

/// Incremental decoder for chunked transfer coding.
///
/// The decoder itself is configuration only and may be shared across
/// messages; everything mutable lives in the per-message [`ContentState`].
#[derive(Debug)]
pub struct ChunkedDecoder {
    max_trailer_len: usize,
}

/// Outcome of one [`decode`](ChunkedDecoder::decode) call.
///
/// `unit` is the decoded unit, if the region completed one. `remainder` holds
/// the bytes `decode` did not claim:
///
/// - with a unit, the remainder belongs to the rest of the stream (the next
///   chunk, or a pipelined follow-on message) and should be fed back in
///   immediately;
/// - without a unit, more input is needed, and the remainder (possibly
///   empty) is exactly what must be retained and re-presented with new bytes
///   appended.
#[derive(Debug)]
pub struct Parsed {
    pub unit: Option<Decoded>,
    pub remainder: Option<Bytes>,
}

impl Parsed {
    fn unit(unit: Decoded, remainder: Option<Bytes>) -> Self {
        Parsed {
            unit: Some(unit),
            remainder,
        }
    }

    fn incomplete(remainder: Bytes) -> Self {
        Parsed {
            unit: None,
            remainder: Some(remainder),
        }
    }

    /// True when the call produced no unit and the caller must wait for more
    /// input.
    pub fn is_incomplete(&self) -> bool {
        self.unit.is_none()
    }
}

/// One decoded unit of a chunked message.
#[derive(Debug)]
pub enum Decoded {
    /// Content bytes of the current chunk. May be empty when a region ends
    /// right after a size line; empty units carry no information and may be
    /// dropped by the caller.
    Content(Bytes),
    /// The terminal unit: trailer headers (often none). The message is
    /// complete and its state is spent.
    Trailer(Trailers),
}

enum TrailerScan {
    Complete(usize),
    Partial,
}

impl ChunkedDecoder {
    pub fn new() -> Self {
        Self::with_max_trailer_len(DEFAULT_MAX_TRAILER_LEN)
    }

    /// A decoder that fails trailer sections longer than `max_trailer_len`
    /// bytes with [`DecodeError::TrailerTooLarge`].
    pub fn with_max_trailer_len(max_trailer_len: usize) -> Self {
        ChunkedDecoder { max_trailer_len }
    }

    pub fn max_trailer_len(&self) -> usize {
        self.max_trailer_len
    }

    /// Decode as much of `input` as one unit allows.
    ///
    /// Resumption contract: when no unit comes back, retain the returned
    /// remainder and call again once more bytes arrive, passing the retained
    /// bytes with the new ones appended; when a unit comes back together
    /// with a remainder, feed the remainder straight back in. Offsets
    /// persisted in `state` are only valid under that discipline.
    pub fn decode(&self, state: &mut ContentState, mut input: Bytes) -> Result<Parsed, DecodeError> {
        debug_assert!(!state.complete, "decode on a completed message");
        if state.complete {
            return Ok(Parsed::incomplete(input));
        }

        if !state.is_last_chunk && state.chunk_remainder == 0 {
            match scan::scan_size_line(&mut state.scan, &mut input)? {
                Scan::Complete {
                    content_start,
                    size,
                } => {
                    state.chunk_content_start = content_start;
                    state.chunk_length = size;
                    state.chunk_remainder = size;
                }
                Scan::Incomplete => return Ok(Parsed::incomplete(input)),
            }
        } else {
            // A chunk continued from an earlier region starts at its first
            // byte; the previous call consumed that region entirely.
            state.chunk_content_start = 0;
        }

        if state.chunk_length == 0 {
            if !state.is_last_chunk {
                state.is_last_chunk = true;
                state.trailer_start = state.chunk_content_start;
            }
            match self.scan_trailer(state, &input)? {
                TrailerScan::Complete(end) => state.chunk_content_start = end,
                TrailerScan::Partial => return Ok(Parsed::incomplete(input)),
            }
        }

        let available = input.len() - state.chunk_content_start;
        let (content, remainder) = if available as u64 > state.chunk_remainder {
            // This chunk ends inside the region; everything after it belongs
            // to the next header or a pipelined message.
            let take = state.chunk_remainder as usize;
            let split = state.chunk_content_start + take;
            let content = input.slice(state.chunk_content_start..split);
            let remainder = input.slice(split..);
            state.chunk_remainder = 0;
            (content, Some(remainder))
        } else {
            let content = input.slice(state.chunk_content_start..);
            state.chunk_remainder -= content.len() as u64;
            (content, None)
        };

        if state.is_last_chunk {
            state.complete = true;
            let trailers = std::mem::take(&mut state.trailers);
            tracing::trace!(
                trailer_count = trailers.len(),
                "chunked message complete"
            );
            Ok(Parsed::unit(Decoded::Trailer(trailers), remainder))
        } else {
            tracing::trace!(
                len = content.len(),
                remaining = state.chunk_remainder,
                "chunk content decoded"
            );
            Ok(Parsed::unit(Decoded::Content(content), remainder))
        }
    }

    /// Check that end-of-stream is a legal place for the message to stop.
    ///
    /// Chunked messages end at their trailer, never at EOF; anything still
    /// in flight means the peer cut the stream short.
    pub fn decode_eof(&self, state: &ContentState) -> Result<(), DecodeError> {
        if state.is_complete() {
            Ok(())
        } else {
            tracing::debug!("stream ended mid-message");
            Err(DecodeError::TruncatedStream)
        }
    }

    fn scan_trailer(
        &self,
        state: &mut ContentState,
        input: &Bytes,
    ) -> Result<TrailerScan, DecodeError> {
        let region = &input[state.trailer_start..];
        let mut headers = [httparse::EMPTY_HEADER; MAX_TRAILER_HEADERS];

        match httparse::parse_headers(region, &mut headers) {
            Ok(httparse::Status::Complete((used, parsed))) => {
                if used > self.max_trailer_len {
                    tracing::debug!(
                        len = used,
                        max = self.max_trailer_len,
                        "trailer section over budget"
                    );
                    return Err(DecodeError::TrailerTooLarge);
                }
                state.trailers.extend_parsed(parsed)?;
                tracing::trace!(len = used, count = parsed.len(), "trailer section parsed");
                Ok(TrailerScan::Complete(state.trailer_start + used))
            }
            Ok(httparse::Status::Partial) => {
                if region.len() > self.max_trailer_len {
                    tracing::debug!(
                        len = region.len(),
                        max = self.max_trailer_len,
                        "trailer section over budget"
                    );
                    return Err(DecodeError::TrailerTooLarge);
                }
                Ok(TrailerScan::Partial)
            }
            Err(httparse::Error::TooManyHeaders) => {
                tracing::debug!("too many trailer headers");
                Err(DecodeError::TrailerTooLarge)
            }
            Err(e) => {
                tracing::debug!(error = ?e, "malformed trailer section");
                Err(DecodeError::MalformedTrailer(e))
            }
        }
    }
}

impl Default for ChunkedDecoder {
    fn default() -> Self {
        Self::new()
    }
}
