use std::cmp;

use bytes::{Buf, Bytes};

use crate::error::DecodeError;

/// Longest permitted chunk size line: the hex digits, any extension, and the
/// terminating CRLF must all fit within this many bytes.
pub const MAX_CHUNK_HEADER_LEN: usize = 16;

const CR: u8 = b'\r';
const LF: u8 = b'\n';
const SEMICOLON: u8 = b';';

// Hex digit values for size-line bytes; -1 marks a non-digit.
const DEC: [i8; 256] = {
    let mut table = [-1i8; 256];
    let mut b = b'0';
    while b <= b'9' {
        table[b as usize] = (b - b'0') as i8;
        b += 1;
    }
    let mut b = b'a';
    while b <= b'f' {
        table[b as usize] = (b - b'a' + 10) as i8;
        b += 1;
    }
    let mut b = b'A';
    while b <= b'F' {
        table[b as usize] = (b - b'A' + 10) as i8;
        b += 1;
    }
    table
};

/// Size-line scanner state, persisted across "need more input" returns.
///
/// Offsets are relative to the region the caller retains: a suspended scan
/// resumes correctly as long as the next region is the previous remainder
/// with new bytes appended.
#[derive(Debug)]
pub(crate) struct ScannerState {
    phase: Phase,
    start: usize,
    offset: usize,
    limit: usize,
    value: u64,
    checkpoint: Option<usize>,
    overflowed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Ready to start a fresh size line at the front of the region.
    Init,
    /// Mid-line: `offset`, `value`, and `checkpoint` are live.
    Size,
    /// Consuming the CRLF that closed the previous chunk's content.
    SkipCrlf,
}

impl ScannerState {
    pub(crate) fn new() -> Self {
        ScannerState {
            phase: Phase::Init,
            start: 0,
            offset: 0,
            limit: 0,
            value: 0,
            checkpoint: None,
            overflowed: false,
        }
    }

    fn recycle(&mut self) {
        self.phase = Phase::Init;
        self.start = 0;
        self.offset = 0;
        self.limit = 0;
        self.value = 0;
        self.checkpoint = None;
    }
}

/// Outcome of a size-line scan.
#[derive(Debug)]
pub(crate) enum Scan {
    /// Line finished: the chunk's content begins at `content_start` within
    /// the (possibly advanced) region and declares `size` bytes.
    Complete { content_start: usize, size: u64 },
    /// Out of bytes mid-line. `input` now holds exactly the bytes the caller
    /// must retain and re-present with more data appended.
    Incomplete,
}

/// Scan one chunk size line out of `input`.
///
/// Bytes swallowed by the CRLF skip are dropped from `input` in place; all
/// other progress lives in `scan`. A byte that is neither a hex digit nor a
/// terminator fails immediately unless the checkpoint has been passed, after
/// which everything up to the LF is ignored extension content.
pub(crate) fn scan_size_line(
    scan: &mut ScannerState,
    input: &mut Bytes,
) -> Result<Scan, DecodeError> {
    if scan.overflowed {
        return Err(DecodeError::ChunkHeaderTooLarge);
    }

    loop {
        match scan.phase {
            Phase::SkipCrlf => match memchr::memchr(LF, &input[..]) {
                Some(at) => {
                    input.advance(at + 1);
                    scan.recycle();
                }
                None => {
                    let len = input.len();
                    input.advance(len);
                    return Ok(Scan::Incomplete);
                }
            },
            Phase::Init => {
                scan.start = 0;
                scan.offset = scan.start;
                scan.limit = scan.start + MAX_CHUNK_HEADER_LEN;
                scan.value = 0;
                scan.checkpoint = None;
                scan.phase = Phase::Size;
            }
            Phase::Size => {
                let mut offset = scan.offset;
                let mut value = scan.value;
                let end = cmp::min(input.len(), scan.limit);

                while offset < end {
                    let b = input[offset];
                    if b == LF {
                        scan.offset = offset;
                        scan.value = value;
                        scan.phase = Phase::SkipCrlf;
                        tracing::trace!(size = value, "chunk size line parsed");
                        return Ok(Scan::Complete {
                            content_start: offset + 1,
                            size: value,
                        });
                    }
                    if scan.checkpoint.is_none() {
                        if b == CR || b == SEMICOLON {
                            scan.checkpoint = Some(offset);
                        } else {
                            let digit = DEC[b as usize];
                            if digit < 0 {
                                tracing::debug!(byte = b, "non-hex byte in a chunk size line");
                                return Err(DecodeError::MalformedChunkHeader(b));
                            }
                            value = match value
                                .checked_mul(16)
                                .and_then(|v| v.checked_add(digit as u64))
                            {
                                Some(v) => v,
                                None => {
                                    scan.overflowed = true;
                                    tracing::debug!("chunk size overflows a u64");
                                    return Err(DecodeError::ChunkHeaderTooLarge);
                                }
                            };
                        }
                    }
                    offset += 1;
                }

                scan.offset = offset;
                scan.value = value;
                if offset >= scan.limit {
                    tracing::debug!(limit = scan.limit, "chunk size line exceeded its bound");
                    return Err(DecodeError::ChunkHeaderTooLarge);
                }
                return Ok(Scan::Incomplete);
            }
        }
    }
}
