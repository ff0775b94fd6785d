//! LZW dictionary coding.
//!
//! The dictionary is an arena: a flat `Vec<TrieNode>`, child links are
//! indices into that vector, and the root is index 0 (no node carries a
//! symbol). Each non-root node's path from the root spells exactly one
//! previously observed phrase, and the node's own index is that phrase's
//! code. Codes are assigned in strictly increasing order starting at 1.

use std::collections::BTreeSet;

use crate::DecodeError;

const ROOT: usize = 0;

struct TrieNode {
    /// small ordered list rather than a fixed 256-slot array: fan-out per
    /// node is bounded by 256 but is usually tiny, so an array would cost
    /// 256x the memory for no benefit at these input sizes.
    children: Vec<(u8, usize)>,
    index: usize,
}

impl TrieNode {
    fn child(&self, symbol: u8) -> Option<usize> {
        self.children.iter().find(|(s, _)| *s == symbol).map(|(_, idx)| *idx)
    }
}

struct Trie {
    nodes: Vec<TrieNode>,
}

impl Trie {
    fn new() -> Self {
        Self { nodes: vec![TrieNode { children: Vec::new(), index: 0 }] }
    }

    fn insert_child(&mut self, parent: usize, symbol: u8, index: usize) -> usize {
        self.nodes.push(TrieNode { children: Vec::new(), index });
        let child = self.nodes.len() - 1;
        self.nodes[parent].children.push((symbol, child));
        child
    }
}

/// The result of encoding: the initial one-symbol dictionary (distinct bytes
/// present in the input, in ascending order, implicitly assigned indices
/// `1..=initial_symbols.len()`) plus the ordered sequence of codes that
/// reconstructs the input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LzwResult {
    pub initial_symbols: Vec<u8>,
    pub codes: Vec<u32>,
}

pub struct LzwCodec;

impl LzwCodec {
    /// Encode `data`, growing a fresh trie from one entry per distinct byte
    /// present, indices assigned in ascending symbol order starting at 1.
    /// At each step the longest phrase already in the dictionary matching
    /// the remaining input is emitted as a single code, then that phrase
    /// extended by the next byte is added as a new entry (`find_and_insert`).
    pub fn encode(data: &[u8]) -> LzwResult {
        let distinct: BTreeSet<u8> = data.iter().cloned().collect();
        let initial_symbols: Vec<u8> = distinct.into_iter().collect();

        let mut trie = Trie::new();
        let mut next_index = 1usize;
        for &symbol in &initial_symbols {
            trie.insert_child(ROOT, symbol, next_index);
            next_index += 1;
        }

        let mut codes = Vec::new();
        let mut p = 0usize;
        let n = data.len();
        while p < n {
            let mut node = ROOT;
            let mut depth = 0usize;
            while p + depth < n {
                match trie.nodes[node].child(data[p + depth]) {
                    Some(child) => {
                        node = child;
                        depth += 1;
                    }
                    None => break,
                }
            }
            codes.push(trie.nodes[node].index as u32);
            if p + depth < n {
                trie.insert_child(node, data[p + depth], next_index);
                next_index += 1;
            }
            p += depth.max(1);
        }

        LzwResult { initial_symbols, codes }
    }

    /// Invert an `LzwResult` back to the original byte sequence, regrowing
    /// the dictionary from the codes as it goes. `pending` holds the phrase
    /// just emitted together with the index that will be assigned to its
    /// extension -- LZW's classic self-referential case, where the next
    /// code names that not-yet-installed extension before it is installed.
    pub fn decode(result: &LzwResult) -> Result<Vec<u8>, DecodeError> {
        let mut dict: Vec<Vec<u8>> = Vec::with_capacity(result.initial_symbols.len() + 1);
        dict.push(Vec::new()); // index 0 unused, keeps 1-based indexing direct
        for &symbol in &result.initial_symbols {
            dict.push(vec![symbol]);
        }

        let mut out = Vec::new();
        let mut pending: Option<Vec<u8>> = None;

        for &code in &result.codes {
            let code = code as usize;
            let next_index = dict.len();
            let phrase: Vec<u8> = if code < dict.len() {
                dict[code].clone()
            } else if code == next_index {
                let prefix = pending.as_ref().ok_or(DecodeError::UnknownCode)?;
                let mut installed = prefix.clone();
                let first = prefix[0];
                installed.push(first);
                installed
            } else {
                return Err(DecodeError::UnknownCode);
            };

            if let Some(prefix) = pending.take() {
                let mut installed = prefix;
                installed.push(phrase[0]);
                dict.push(installed);
            }

            out.extend_from_slice(&phrase);
            pending = Some(phrase);
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_dictionary_is_sorted_distinct_symbols() {
        let result = LzwCodec::encode(b"dad_a_dadad_dadda");
        assert_eq!(result.initial_symbols, vec![b'_', b'a', b'd']);
    }

    #[test]
    fn round_trips_wikipedia_style_example() {
        let data = b"dad_a_dadad_dadda";
        let result = LzwCodec::encode(data);
        let decoded = LzwCodec::decode(&result).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn round_trips_repeated_runs() {
        let data = vec![b'x'; 500];
        let result = LzwCodec::encode(&data);
        let decoded = LzwCodec::decode(&result).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn round_trips_single_symbol() {
        let data = b"q";
        let result = LzwCodec::encode(data);
        assert_eq!(result.initial_symbols, vec![b'q']);
        assert_eq!(result.codes, vec![1]);
        let decoded = LzwCodec::decode(&result).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn round_trips_empty_input() {
        let result = LzwCodec::encode(b"");
        assert!(result.initial_symbols.is_empty());
        assert!(result.codes.is_empty());
        let decoded = LzwCodec::decode(&result).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn round_trips_prose() {
        let data = b"I am Sam. Sam I am. I do not like this Sam I am.\n";
        let result = LzwCodec::encode(data);
        let decoded = LzwCodec::decode(&result).unwrap();
        assert_eq!(decoded, data.to_vec());
    }

    #[test]
    fn unknown_code_is_rejected() {
        let mut result = LzwCodec::encode(b"abcabc");
        result.codes.push(9999);
        assert_eq!(LzwCodec::decode(&result), Err(DecodeError::UnknownCode));
    }

    #[test]
    fn all_256_distinct_symbols_round_trip() {
        let data: Vec<u8> = (0..=255u8).collect();
        let result = LzwCodec::encode(&data);
        assert_eq!(result.initial_symbols.len(), 256);
        let decoded = LzwCodec::decode(&result).unwrap();
        assert_eq!(decoded, data);
    }
}
