//! Bit-unpacking decoder.
//!
//! Walks the rebuilt code tree one bit at a time, most significant bit first,
//! emitting a symbol at every leaf. Every bit of every byte is consumed,
//! including the zero padding of the last byte: if the padding happens to
//! spell a complete code, a spurious trailing symbol is emitted. The encoded
//! format stores no length, so this cannot be detected here.

use std::io::{ErrorKind, Read, Write};

use crate::error::{Error, Result};
use crate::map::DecodeTree;

/// Summary of one decoding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Decoded {
    pub symbols: u64,
    /// Bits consumed after the last emitted symbol without reaching a leaf.
    pub dangling_bits: usize,
}

pub struct Decoder<'a> {
    tree: &'a DecodeTree,
    cursor: usize,
    depth: usize,
    offset: usize,
    symbols: u64,
}

impl<'a> Decoder<'a> {
    pub fn new(tree: &'a DecodeTree) -> Self {
        Self {
            tree,
            cursor: DecodeTree::ROOT,
            depth: 0,
            offset: 0,
            symbols: 0,
        }
    }

    /// Consumes the 8 bits of `byte`, pushing every completed symbol to `out`.
    pub fn feed(&mut self, byte: u8, out: &mut Vec<u8>) -> Result<()> {
        for bit in 0..8u8 {
            let set = (byte >> (7 - bit)) & 1 == 1;
            self.cursor = self
                .tree
                .step(self.cursor, set)
                .ok_or(Error::InvalidBitPath {
                    offset: self.offset,
                    bit,
                })?;
            self.depth += 1;

            if let Some(symbol) = self.tree.symbol(self.cursor) {
                out.push(symbol.value());
                self.symbols += 1;
                self.cursor = DecodeTree::ROOT;
                self.depth = 0;
            }
        }
        self.offset += 1;
        Ok(())
    }

    pub fn finish(self) -> Decoded {
        if self.depth > 0 {
            tracing::debug!("{} trailing bits did not complete a code", self.depth);
        }
        Decoded {
            symbols: self.symbols,
            dangling_bits: self.depth,
        }
    }

    pub fn decode(mut self, data: &[u8]) -> Result<(Vec<u8>, Decoded)> {
        let mut out = Vec::with_capacity(data.len() * 2);
        for &byte in data {
            self.feed(byte, &mut out)?;
        }
        Ok((out, self.finish()))
    }

    pub fn decode_to<R: Read, W: Write>(mut self, mut reader: R, mut writer: W) -> Result<Decoded> {
        let mut buf = [0u8; 8192];
        let mut out = Vec::new();
        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };

            out.clear();
            for &byte in &buf[..n] {
                self.feed(byte, &mut out)?;
            }
            writer.write_all(&out)?;
        }
        writer.flush()?;
        Ok(self.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::parse_map;

    #[test]
    fn decodes_aligned_stream() {
        // a=0 c=10 b=11, 16 bits in total
        let tree = parse_map("97 0\n98 11\n99 10\n").unwrap();
        let data = [0b1111_0010, 0b1010_0000];
        let (out, summary) = Decoder::new(&tree).decode(&data).unwrap();
        assert_eq!(out, b"bbaacccaaaa");
        assert_eq!(summary.symbols, 11);
        assert_eq!(summary.dangling_bits, 0);
    }

    #[test]
    fn padding_can_emit_spurious_symbols() {
        let tree = parse_map("97 0\n98 11\n99 10\n").unwrap();
        let (out, _) = Decoder::new(&tree).decode(&[0b0001_1111, 0]).unwrap();
        // "aaabbc" followed by seven zero padding bits, each decoding to 'a'
        assert_eq!(out, b"aaabbcaaaaaaa");
    }

    #[test]
    fn padding_can_leave_a_partial_path() {
        let tree = parse_map("97 00\n98 01\n99 1\n").unwrap();
        // c c c a a b, then seven padding bits: three 'a' and one left over
        let (out, summary) = Decoder::new(&tree).decode(&[0b1110_0000, 0b1000_0000]).unwrap();
        assert_eq!(&out[..6], b"cccaab");
        assert_eq!(summary.dangling_bits, 1);
    }

    #[test]
    fn single_symbol_decodes_every_bit() {
        let tree = parse_map("97 0\n").unwrap();
        let (out, _) = Decoder::new(&tree).decode(&[0]).unwrap();
        assert_eq!(out, b"aaaaaaaa");
    }

    #[test]
    fn undefined_branch_is_an_error() {
        let tree = parse_map("97 0\n").unwrap();
        let err = Decoder::new(&tree).decode(&[0, 0b0010_0000]).unwrap_err();
        assert!(matches!(err, Error::InvalidBitPath { offset: 1, bit: 2 }));
    }

    #[test]
    fn streaming_matches_slice() {
        let tree = parse_map("97 0\n98 11\n99 10\n").unwrap();
        let data = vec![0b1111_0010u8; 20_000];
        let (expected, summary) = Decoder::new(&tree).decode(&data).unwrap();

        let mut out = Vec::new();
        let streamed = Decoder::new(&tree).decode_to(&data[..], &mut out).unwrap();
        assert_eq!(out, expected);
        assert_eq!(streamed, summary);
    }

    #[test]
    fn empty_data_decodes_to_nothing() {
        let tree = parse_map("").unwrap();
        let (out, summary) = Decoder::new(&tree).decode(&[]).unwrap();
        assert!(out.is_empty());
        assert_eq!(summary, Decoded::default());
    }
}
