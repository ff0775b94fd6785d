//! Shannon-Fano prefix coding.
//!
//! A codec is built once from either a raw byte sequence (frequencies are
//! counted and sorted internally) or a precomputed `(values, counts)` pair
//! that the caller has already placed in the desired order -- the codec
//! never re-sorts counts handed to it directly, only ones it counts itself.
//! Reusing one codec across multiple encode calls is not supported: its
//! `values`/`counts` are tied to the input it was built from.

use std::collections::BTreeMap;

use crate::bitbuffer::BitBuffer;
use crate::{DecodeError, EncodeError};

/// A built Shannon-Fano code: the sorted symbol list and a parallel list of
/// prefix codes, one per symbol.
#[derive(Clone, Debug)]
pub struct ShannonFanoCode {
    pub values: Vec<u8>,
    pub codes: Vec<BitBuffer>,
}

pub struct ShannonFanoCodec {
    values: Vec<u8>,
    counts: Vec<u64>,
}

impl ShannonFanoCodec {
    /// Count symbol frequencies in `data` and sort them
    /// `(count descending, symbol descending)`.
    pub fn from_bytes(data: &[u8]) -> Result<Self, EncodeError> {
        if data.is_empty() {
            return Err(EncodeError::InvalidParameters("input is empty".into()));
        }
        let mut counter: BTreeMap<u8, u64> = BTreeMap::new();
        for &b in data {
            *counter.entry(b).or_insert(0) += 1;
        }
        let mut pairs: Vec<(u8, u64)> = counter.into_iter().collect();
        pairs.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(&a.0)));
        let values = pairs.iter().map(|p| p.0).collect();
        let counts = pairs.iter().map(|p| p.1).collect();
        Ok(Self { values, counts })
    }

    /// Build directly from a precomputed, already-ordered `(values, counts)`
    /// pair, as when reconstructing a codec from a frame header.
    pub fn from_counts(values: Vec<u8>, counts: Vec<u64>) -> Result<Self, EncodeError> {
        if values.is_empty() || values.len() != counts.len() {
            return Err(EncodeError::InvalidParameters(
                "values and counts must be non-empty and equal length".into(),
            ));
        }
        Ok(Self { values, counts })
    }

    /// Recursively split `[start, end]` (inclusive) to build a prefix code,
    /// a literal port of the source's `build(start, end)`.
    fn build(counts: &[i64], start: usize, end: usize, bit_codes: &mut [BitBuffer]) {
        if start >= end {
            return;
        }
        let mut middle = end - 1;
        let mut left: i64 = counts[start..end].iter().sum();
        let mut right: i64 = counts[end];
        let mut distance = left - right;
        left -= counts[middle];
        right += counts[middle];
        while (left - right).abs() <= distance {
            distance = left - right;
            middle -= 1;
            left -= counts[middle];
            right += counts[middle];
        }
        for item in bit_codes.iter_mut().take(middle + 1).skip(start) {
            item.push_bit(false);
        }
        for item in bit_codes.iter_mut().take(end + 1).skip(middle + 1) {
            item.push_bit(true);
        }
        Self::build(counts, start, middle, bit_codes);
        Self::build(counts, middle + 1, end, bit_codes);
    }

    /// Build the prefix code for this codec's sorted `(values, counts)`.
    ///
    /// A single distinct symbol is a degenerate split `build()` never
    /// touches (there is nothing to divide), so it is given a designated
    /// 1-bit code directly: this way a run of `n` occurrences encodes to
    /// `n` bits and decodes back to `n` occurrences, rather than the
    /// zero-bit code `build()` would otherwise leave it with, which cannot
    /// carry a repeat count at all.
    pub fn build_code(&self) -> ShannonFanoCode {
        let n = self.values.len();
        let mut bit_codes = vec![BitBuffer::new(); n];
        if n == 1 {
            bit_codes[0].push_bit(false);
        } else {
            let signed_counts: Vec<i64> = self.counts.iter().map(|&c| c as i64).collect();
            Self::build(&signed_counts, 0, n - 1, &mut bit_codes);
        }
        ShannonFanoCode { values: self.values.clone(), codes: bit_codes }
    }

    /// Encode `data` against a freshly built code, concatenating each
    /// symbol's code in input order.
    pub fn encode_bytes(&self, data: &[u8]) -> Result<(ShannonFanoCode, BitBuffer), EncodeError> {
        let code = self.build_code();
        let map: BTreeMap<u8, &BitBuffer> =
            code.values.iter().cloned().zip(code.codes.iter()).collect();
        let mut payload = BitBuffer::new();
        for &b in data {
            let bits = map.get(&b).ok_or_else(|| {
                EncodeError::InvalidParameters(format!("symbol {b} has no code"))
            })?;
            payload.append_bits(bits);
        }
        Ok((code, payload))
    }
}

/// Arena-based decoding tree built from a `ShannonFanoCode`.
struct Node {
    left: Option<usize>,
    right: Option<usize>,
    symbol: Option<u8>,
}

pub struct ShannonFanoTree {
    nodes: Vec<Node>,
}

const ROOT: usize = 0;

impl ShannonFanoTree {
    /// Build the tree implied by `code`, one symbol at a time: walk/create
    /// nodes along each code's bit path and mark the final node as a leaf.
    pub fn from_code(code: &ShannonFanoCode) -> Self {
        let mut nodes = vec![Node { left: None, right: None, symbol: None }];
        for (value, bits) in code.values.iter().zip(code.codes.iter()) {
            let mut cursor = ROOT;
            for i in 0..bits.len() {
                let bit = bits.read_uint(i, 1).unwrap() == 1;
                let next = if bit { nodes[cursor].right } else { nodes[cursor].left };
                let next = match next {
                    Some(idx) => idx,
                    None => {
                        nodes.push(Node { left: None, right: None, symbol: None });
                        let idx = nodes.len() - 1;
                        if bit {
                            nodes[cursor].right = Some(idx);
                        } else {
                            nodes[cursor].left = Some(idx);
                        }
                        idx
                    }
                };
                cursor = next;
            }
            nodes[cursor].symbol = Some(*value);
        }
        Self { nodes }
    }

    fn is_leaf(&self, idx: usize) -> bool {
        self.nodes[idx].symbol.is_some()
    }

    /// Decode `payload` by walking the tree one bit per edge, emitting a
    /// symbol and restarting at the root each time a leaf is reached.
    ///
    /// Every symbol's code is at least one bit long (a single-symbol
    /// alphabet is given a designated 1-bit code in `build_code`, rather
    /// than the empty code a literal reading of `build()` would leave it
    /// with), so the tree always has at least one edge and this walk never
    /// needs to special-case a single-leaf root.
    pub fn decode_bits(&self, payload: &BitBuffer) -> Result<Vec<u8>, DecodeError> {
        let mut out = Vec::new();
        let mut cursor = ROOT;
        let mut pos = 0;
        while pos < payload.len() {
            let bit = payload.read_uint(pos, 1).map_err(|_| DecodeError::Truncated)? == 1;
            cursor = if bit { self.nodes[cursor].right } else { self.nodes[cursor].left }
                .ok_or(DecodeError::DanglingBits)?;
            pos += 1;
            if self.is_leaf(cursor) {
                out.push(self.nodes[cursor].symbol.unwrap());
                cursor = ROOT;
            }
        }
        if cursor != ROOT {
            return Err(DecodeError::DanglingBits);
        }
        Ok(out)
    }
}
