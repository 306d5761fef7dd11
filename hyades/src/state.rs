use crate::scan::ScannerState;
use crate::trailers::Trailers;

/// Decode state for one chunked message.
///
/// Created when a chunked body begins, passed by reference into every
/// [`decode`](crate::ChunkedDecoder::decode) call for that message, and
/// discarded once the trailer unit has been produced or the connection is
/// torn down. Nothing here is shared: one message, one state, one flow of
/// control.
#[derive(Debug)]
pub struct ContentState {
    pub(crate) scan: ScannerState,
    pub(crate) is_last_chunk: bool,
    pub(crate) chunk_length: u64,
    pub(crate) chunk_remainder: u64,
    pub(crate) chunk_content_start: usize,
    pub(crate) trailer_start: usize,
    pub(crate) trailers: Trailers,
    pub(crate) complete: bool,
}

impl ContentState {
    pub fn new() -> Self {
        ContentState {
            scan: ScannerState::new(),
            is_last_chunk: false,
            chunk_length: 0,
            chunk_remainder: 0,
            chunk_content_start: 0,
            trailer_start: 0,
            trailers: Trailers::new(),
            complete: false,
        }
    }

    /// True once the terminal zero-length chunk's size line has been seen.
    pub fn is_last_chunk(&self) -> bool {
        self.is_last_chunk
    }

    /// Declared size of the chunk currently being decoded.
    pub fn chunk_length(&self) -> u64 {
        self.chunk_length
    }

    /// Content bytes of the current chunk not yet handed out.
    pub fn chunk_remainder(&self) -> u64 {
        self.chunk_remainder
    }

    /// True once the trailer unit has been produced; the state is spent and
    /// must not see further input.
    pub fn is_complete(&self) -> bool {
        self.complete
    }
}

impl Default for ContentState {
    fn default() -> Self {
        Self::new()
    }
}
