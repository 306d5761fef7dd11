use crate::scan::MAX_CHUNK_HEADER_LEN;

/// Why a chunked message stopped decoding.
///
/// Every variant is connection-fatal: the caller discards the message state
/// and tears the exchange down. None of these overlap with the "need more
/// input" outcome, which is an ordinary [`Parsed`](crate::Parsed) value.
#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    #[error("invalid byte representing a hex value within a chunk length: {0}")]
    MalformedChunkHeader(u8),
    #[error("chunk size line did not terminate within {} bytes", MAX_CHUNK_HEADER_LEN)]
    ChunkHeaderTooLarge,
    #[error("trailer section exceeded its configured limits")]
    TrailerTooLarge,
    #[error("malformed trailer: {0}")]
    MalformedTrailer(httparse::Error),
    #[error("stream ended before the chunked message completed")]
    TruncatedStream,
}
