//! Bit-packed frame (de)serialization: one pair of functions per codec,
//! each a pure transform between the codec's in-memory result and a byte
//! blob. No state is carried between calls -- a fresh `BitBuffer` is built
//! for every pack, and every unpack parses its input from bit zero.

use crate::bitbuffer::BitBuffer;
use crate::lz77::Triple;
use crate::lzw::LzwResult;
use crate::shannon_fano::ShannonFanoCode;
use crate::{DecodeError, EncodeError};

/// Bits needed to represent the range `0..n` (i.e. `ceil(log2(n))`, with the
/// convention that 0 and 1 both need zero bits).
fn bits_for_range(n: usize) -> usize {
    if n <= 1 {
        0
    } else {
        (usize::BITS - (n - 1).leading_zeros()) as usize
    }
}

// ---------------------------------------------------------------- Shannon-Fano

/// Pack a built code and its payload into a frame:
/// `8 bits N-1 | N * (8 bits symbol, 8 bits length, L bits code) | 32 bits P | P bits payload`.
pub fn pack_shannon_fano(code: &ShannonFanoCode, payload: &BitBuffer) -> Result<Vec<u8>, EncodeError> {
    let n = code.values.len();
    if n == 0 || n > 256 {
        return Err(EncodeError::InvalidParameters("symbol count must be in 1..=256".into()));
    }
    let mut frame = BitBuffer::encode_uint((n - 1) as u64, 8)?;
    for (value, bits) in code.values.iter().zip(code.codes.iter()) {
        frame.append_bits(&BitBuffer::encode_uint(*value as u64, 8)?);
        frame.append_bits(&BitBuffer::encode_uint(bits.len() as u64, 8)?);
        frame.append_bits(bits);
    }
    frame.append_bits(&BitBuffer::encode_uint(payload.len() as u64, 32)?);
    frame.append_bits(payload);
    Ok(frame.to_bytes())
}

/// Parse a Shannon-Fano frame back into its code and payload.
pub fn unpack_shannon_fano(bytes: &[u8]) -> Result<(ShannonFanoCode, BitBuffer), DecodeError> {
    let frame = BitBuffer::from_bytes(bytes);
    let mut pos = 0usize;
    let n = frame.read_uint(pos, 8)? as usize + 1;
    pos += 8;
    let mut values = Vec::with_capacity(n);
    let mut codes = Vec::with_capacity(n);
    for _ in 0..n {
        let symbol = frame.read_uint(pos, 8)? as u8;
        pos += 8;
        let length = frame.read_uint(pos, 8)? as usize;
        pos += 8;
        let code = frame.read_slice(pos, length)?;
        pos += length;
        values.push(symbol);
        codes.push(code);
    }
    let payload_len = frame.read_uint(pos, 32)? as usize;
    pos += 32;
    let payload = frame.read_slice(pos, payload_len)?;
    Ok((ShannonFanoCode { values, codes }, payload))
}

// ----------------------------------------------------------------------- LZ77

/// Pack triples into a frame with parameter-derived field widths:
/// repeating `(offset, length, character)` groups, no header. `dict_size`
/// and `window_size` must match the values the triples were produced with;
/// the frame does not carry them.
pub fn pack_lz77(
    dict_size: usize,
    window_size: usize,
    triples: &[Triple],
) -> Result<Vec<u8>, EncodeError> {
    let buffer_size = window_size.checked_sub(dict_size).ok_or_else(|| {
        EncodeError::InvalidParameters("window_size must exceed dict_size".into())
    })?;
    let offset_width = bits_for_range(dict_size);
    let length_width =
        bits_for_range(buffer_size) + if buffer_size.is_power_of_two() { 1 } else { 0 };

    let mut frame = BitBuffer::new();
    for t in triples {
        let stored_offset = if t.offset == 0 { 0 } else { t.offset - 1 };
        frame.append_bits(&BitBuffer::encode_uint(stored_offset as u64, offset_width)?);
        frame.append_bits(&BitBuffer::encode_uint(t.length as u64, length_width)?);
        frame.append_bits(&BitBuffer::encode_uint(t.character as u64, 8)?);
    }
    Ok(frame.to_bytes())
}

/// Parse an LZ77 frame back into triples, reading until fewer bits than one
/// triple remain (the tail is zero-padding to a byte boundary, not data).
pub fn unpack_lz77(
    dict_size: usize,
    window_size: usize,
    bytes: &[u8],
) -> Result<Vec<Triple>, DecodeError> {
    let buffer_size = window_size
        .checked_sub(dict_size)
        .ok_or(DecodeError::Truncated)?;
    let offset_width = bits_for_range(dict_size);
    let length_width =
        bits_for_range(buffer_size) + if buffer_size.is_power_of_two() { 1 } else { 0 };
    let triple_width = offset_width + length_width + 8;

    let frame = BitBuffer::from_bytes(bytes);
    let mut pos = 0usize;
    let mut triples = Vec::new();
    while triple_width > 0 && pos + triple_width <= frame.len() {
        let stored_offset = frame.read_uint(pos, offset_width)? as usize;
        pos += offset_width;
        let length = frame.read_uint(pos, length_width)? as usize;
        pos += length_width;
        let character = frame.read_uint(pos, 8)? as u8;
        pos += 8;
        let offset = if stored_offset == 0 && length == 0 { 0 } else { stored_offset + 1 };
        triples.push(Triple { offset, length, character });
    }
    Ok(triples)
}

// ------------------------------------------------------------------------ LZW

/// Pack an `LzwResult` into a frame:
/// `8 bits N-1 | N * 8 bits symbol | 32 bits M | M * 32 bits code`.
pub fn pack_lzw(result: &LzwResult) -> Result<Vec<u8>, EncodeError> {
    let n = result.initial_symbols.len();
    if n == 0 || n > 256 {
        return Err(EncodeError::InvalidParameters("symbol count must be in 1..=256".into()));
    }
    let mut frame = BitBuffer::encode_uint((n - 1) as u64, 8)?;
    for &symbol in &result.initial_symbols {
        frame.append_bits(&BitBuffer::encode_uint(symbol as u64, 8)?);
    }
    frame.append_bits(&BitBuffer::encode_uint(result.codes.len() as u64, 32)?);
    for &code in &result.codes {
        frame.append_bits(&BitBuffer::encode_uint(code as u64, 32)?);
    }
    Ok(frame.to_bytes())
}

/// Parse an LZW frame back into an `LzwResult`.
pub fn unpack_lzw(bytes: &[u8]) -> Result<LzwResult, DecodeError> {
    let frame = BitBuffer::from_bytes(bytes);
    let mut pos = 0usize;
    let n = frame.read_uint(pos, 8)? as usize + 1;
    pos += 8;
    let mut initial_symbols = Vec::with_capacity(n);
    for _ in 0..n {
        initial_symbols.push(frame.read_uint(pos, 8)? as u8);
        pos += 8;
    }
    let m = frame.read_uint(pos, 32)? as usize;
    pos += 32;
    let mut codes = Vec::with_capacity(m);
    for _ in 0..m {
        codes.push(frame.read_uint(pos, 32)? as u32);
        pos += 32;
    }
    Ok(LzwResult { initial_symbols, codes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lz77::Lz77Codec;
    use crate::lzw::LzwCodec;
    use crate::shannon_fano::{ShannonFanoCodec, ShannonFanoTree};

    #[test]
    fn shannon_fano_frame_round_trips() {
        let data = b"the quick brown fox jumps over the lazy dog";
        let codec = ShannonFanoCodec::from_bytes(data).unwrap();
        let (code, payload) = codec.encode_bytes(data).unwrap();
        let bytes = pack_shannon_fano(&code, &payload).unwrap();
        let (parsed_code, parsed_payload) = unpack_shannon_fano(&bytes).unwrap();
        let tree = ShannonFanoTree::from_code(&parsed_code);
        assert_eq!(tree.decode_bits(&parsed_payload).unwrap(), data);
    }

    #[test]
    fn lz77_frame_round_trips() {
        let codec = Lz77Codec::new(16, 32).unwrap();
        let data = b"ababababababab and some more text to chew on";
        let triples = codec.encode(data);
        let bytes = pack_lz77(codec.dict_size(), 32, &triples).unwrap();
        let parsed = unpack_lz77(codec.dict_size(), 32, &bytes).unwrap();
        assert_eq!(Lz77Codec::decode(&parsed).unwrap(), data);
    }

    #[test]
    fn lz77_frame_handles_power_of_two_buffer() {
        let codec = Lz77Codec::new(15, 31).unwrap(); // buffer_size = 16, a power of two
        let data = b"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
        let triples = codec.encode(data);
        let bytes = pack_lz77(codec.dict_size(), 31, &triples).unwrap();
        let parsed = unpack_lz77(codec.dict_size(), 31, &bytes).unwrap();
        assert_eq!(Lz77Codec::decode(&parsed).unwrap(), data.to_vec());
    }

    #[test]
    fn lzw_frame_round_trips() {
        let data = b"dad_a_dadad_dadda";
        let result = LzwCodec::encode(data);
        let bytes = pack_lzw(&result).unwrap();
        let parsed = unpack_lzw(&bytes).unwrap();
        assert_eq!(LzwCodec::decode(&parsed).unwrap(), data.to_vec());
    }

    #[test]
    fn shannon_fano_frame_rejects_excess_symbols() {
        // not realistically reachable with a u8 alphabet, exercised directly
        let code = ShannonFanoCode { values: vec![], codes: vec![] };
        let payload = BitBuffer::new();
        assert!(pack_shannon_fano(&code, &payload).is_err());
    }

    #[test]
    fn lz77_frame_truncated_tail_is_treated_as_padding() {
        let codec = Lz77Codec::new(16, 32).unwrap();
        let data = b"hello hello hello";
        let triples = codec.encode(data);
        let mut bytes = pack_lz77(codec.dict_size(), 32, &triples).unwrap();
        bytes.push(0); // stray pad byte shorter than one triple is ignored
        let parsed = unpack_lz77(codec.dict_size(), 32, &bytes).unwrap();
        assert_eq!(Lz77Codec::decode(&parsed).unwrap(), data.to_vec());
    }

    #[test]
    fn lz77_frame_with_out_of_range_offset_is_rejected_at_decode() {
        let triples = vec![Triple { offset: 9, length: 2, character: b'x' }];
        let bytes = pack_lz77(16, 32, &triples).unwrap();
        let parsed = unpack_lz77(16, 32, &bytes).unwrap();
        assert_eq!(Lz77Codec::decode(&parsed), Err(crate::DecodeError::MalformedTriple));
    }
}
