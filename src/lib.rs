//! # codecbench
//!
//! Benchmarking harness for three classical lossless byte-stream compressors:
//! Shannon-Fano, LZ77, and LZW. Each codec has a companion bit-packed frame
//! format (see `framing`) that serializes its output to a byte blob and
//! parses it back.
//!
//! The codecs are one-shot: construct a codec over a whole input, encode it,
//! then discard it. There is no streaming or incremental API.
//!
//! ## Buffer Example
//!
//! ```rs
//! use codecbench::{lzw, framing};
//! let data = "the quick brown fox".as_bytes();
//! let result = lzw::LzwCodec::encode(data);
//! let bytes = framing::pack_lzw(&result).expect("pack failed");
//! let parsed = framing::unpack_lzw(&bytes).expect("unpack failed");
//! let restored = lzw::LzwCodec::decode(&parsed).expect("decode failed");
//! assert_eq!(restored, data);
//! ```

pub mod bitbuffer;
pub mod shannon_fano;
pub mod lz77;
pub mod lzw;
pub mod framing;
pub mod io;
pub mod stopwatch;
pub mod csv_report;

/// Errors raised while building a codec frame from in-memory data.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum EncodeError {
    #[error("value does not fit in the declared field width")]
    FieldOverflow,
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Errors raised while parsing a codec frame or decoding its payload.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum DecodeError {
    #[error("frame ended inside a header or payload field")]
    Truncated,
    #[error("Shannon-Fano payload ended in a non-root tree state")]
    DanglingBits,
    #[error("LZW code is neither known nor the pending code")]
    UnknownCode,
    #[error("LZ77 triple offset points before the start of output")]
    MalformedTriple,
}

/// Top-level error for the ambient layer (CLI, file I/O, CSV reporting).
/// The core codec/framing errors fold into this at the binary boundary,
/// the same way the teacher's `main.rs` lets `?` thread everything up to
/// `Result<(), Box<dyn std::error::Error>>`.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Csv(#[from] ::csv::Error),
}
