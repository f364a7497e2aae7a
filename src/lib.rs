//! Huffman codec over the 0-127 byte alphabet.
//!
//! Compression counts symbol frequencies, builds a Huffman tree, derives a
//! prefix-free code for every symbol and packs the input into a bit-dense
//! stream. The codes travel separately as a text map, one `<symbol> <code>`
//! line per symbol. Decompression rebuilds the tree from the map and walks it
//! bit by bit.
//!
//! ```
//! let compressed = huffmap::compress(b"aaabbc")?;
//! assert_eq!(compressed.map, "97 0\n98 11\n99 10\n");
//! assert_eq!(compressed.data.len(), 2);
//!
//! let (decoded, _) = huffmap::decompress(&compressed.map, &compressed.data)?;
//! // the zero padding of the last byte decodes to extra 'a' symbols
//! assert!(decoded.starts_with(b"aaabbc"));
//! # Ok::<(), huffmap::Error>(())
//! ```

pub mod cli;
pub mod code;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod frequency;
pub mod map;
pub mod queue;
pub mod report;
pub mod tree;

pub use code::{Code, Codebook};
pub use decoder::{Decoded, Decoder};
pub use encoder::{Encoded, Encoder};
pub use error::{Error, MapError, Result};
pub use frequency::{FrequencyTable, Symbol};
pub use map::DecodeTree;
pub use tree::HuffmanTree;

/// Everything produced by one compression run.
#[derive(Debug, Clone)]
pub struct Compressed {
    pub table: FrequencyTable,
    pub codebook: Codebook,
    pub map: String,
    pub data: Vec<u8>,
    pub encoded: Encoded,
}

/// Compresses `input` in two passes: count, then encode.
///
/// Fails with [`Error::EmptyAlphabet`] when no byte of `input` is below 128.
pub fn compress(input: &[u8]) -> Result<Compressed> {
    let table = FrequencyTable::from_bytes(input);
    let codebook = Codebook::from_tree(&HuffmanTree::build(&table)?);
    let map = map::map_to_string(&codebook);
    let (data, encoded) = Encoder::new(&codebook).encode(input)?;

    Ok(Compressed {
        table,
        codebook,
        map,
        data,
        encoded,
    })
}

/// Rebuilds the code tree from `map` and decodes `data`, returning the symbols
/// and a summary of the run.
///
/// Zero padding in the last byte of `data` may decode to extra trailing
/// symbols; see [`decoder`].
pub fn decompress(map: &str, data: &[u8]) -> Result<(Vec<u8>, Decoded)> {
    let tree = map::parse_map(map)?;
    Decoder::new(&tree).decode(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aaaa_scenario() {
        let compressed = compress(b"aaaa").unwrap();
        assert_eq!(compressed.map, "97 0\n");
        assert_eq!(compressed.data, vec![0]);
    }

    #[test]
    fn empty_input_produces_nothing() {
        assert!(matches!(compress(b""), Err(Error::EmptyAlphabet)));
        assert!(matches!(compress(&[0xff, 0x80]), Err(Error::EmptyAlphabet)));
    }

    #[test]
    fn byte_aligned_roundtrip() {
        // a=1 b=00 c=01: 4 + 2 + 2 = 8 bits
        let compressed = compress(b"aaaabc").unwrap();
        assert_eq!(compressed.encoded.padding, 0);
        let (decoded, summary) = decompress(&compressed.map, &compressed.data).unwrap();
        assert_eq!(decoded, b"aaaabc");
        assert_eq!(summary.dangling_bits, 0);
    }

    #[test]
    fn out_of_alphabet_bytes_are_dropped() {
        let compressed = compress(&[b'x', 0xe9, b'y', b'x', b'y', b'x', b'y', b'x', b'y']).unwrap();
        assert_eq!(compressed.table.out_of_alphabet(), 1);
        assert_eq!(compressed.encoded.skipped, 1);
        let (decoded, _) = decompress(&compressed.map, &compressed.data).unwrap();
        assert_eq!(decoded, b"xyxyxyxy");
    }
}
