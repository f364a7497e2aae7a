use std::fmt;
use std::str::FromStr;

use crate::error::MapError;
use crate::frequency::{ALPHABET_SIZE, FrequencyTable, Symbol};
use crate::tree::HuffmanTree;

/// Longest code a [`Code`] can hold. A tree over 128 leaves is at most 127 deep.
pub const MAX_CODE_LEN: usize = 128;

/// Path from the root to a leaf, first step in the most significant position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Code {
    bits: u128,
    len: u8,
}

impl Code {
    pub fn new() -> Self {
        Self::default()
    }

    /// Code extended by one step: `false` for left, `true` for right.
    pub fn with_bit(self, bit: bool) -> Self {
        debug_assert!((self.len as usize) < MAX_CODE_LEN);
        Code {
            bits: (self.bits << 1) | bit as u128,
            len: self.len + 1,
        }
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // `i` counts from the root and must be below `len`
    fn bit(&self, i: usize) -> bool {
        (self.bits >> (self.len() - 1 - i)) & 1 == 1
    }

    /// Steps of the path, from the root down.
    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len()).map(|i| self.bit(i))
    }

    pub fn is_prefix_of(&self, other: &Code) -> bool {
        if self.len > other.len {
            return false;
        }
        let shift = other.len() - self.len();
        // shifting a u128 by 128 overflows
        let head = if shift == MAX_CODE_LEN { 0 } else { other.bits >> shift };
        head == self.bits
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.bits() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for Code {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(MapError::EmptyCode);
        }
        if let Some(c) = s.chars().find(|c| !matches!(c, '0' | '1')) {
            return Err(MapError::InvalidCodeChar(c));
        }
        if s.len() > MAX_CODE_LEN {
            return Err(MapError::CodeTooLong(s.len()));
        }
        Ok(s.bytes().fold(Code::new(), |code, b| code.with_bit(b == b'1')))
    }
}

/// Code for every symbol that appeared in the input, indexed by symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Codebook {
    codes: [Option<Code>; ALPHABET_SIZE],
}

impl Default for Codebook {
    fn default() -> Self {
        Self {
            codes: [None; ALPHABET_SIZE],
        }
    }
}

impl Codebook {
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut book = Codebook::default();
        let root = tree.root();

        // a lone leaf still needs one bit on the wire
        if let Some(symbol) = root.symbol() {
            book.insert(symbol, Code::new().with_bit(false));
            return book;
        }

        let mut stack = vec![(root, Code::new())];
        while let Some((node, code)) = stack.pop() {
            match node.children() {
                Some((left, right)) => {
                    stack.push((right, code.with_bit(true)));
                    stack.push((left, code.with_bit(false)));
                }
                None => {
                    if let Some(symbol) = node.symbol() {
                        book.insert(symbol, code);
                    }
                }
            }
        }
        book
    }

    pub(crate) fn insert(&mut self, symbol: Symbol, code: Code) {
        self.codes[symbol.index()] = Some(code);
    }

    pub fn get(&self, symbol: Symbol) -> Option<Code> {
        self.codes[symbol.index()]
    }

    /// Looks up a raw input byte; `None` for bytes without a code.
    pub fn lookup(&self, byte: u8) -> Option<Code> {
        Symbol::new(byte).and_then(|s| self.get(s))
    }

    /// Codes in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, Code)> + '_ {
        Symbol::all().filter_map(|s| self.get(s).map(|c| (s, c)))
    }

    pub fn len(&self) -> usize {
        self.codes.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.iter().all(Option::is_none)
    }

    /// Bits needed to encode every counted symbol of `table`.
    pub fn encoded_bits(&self, table: &FrequencyTable) -> u64 {
        self.iter()
            .map(|(s, c)| table.count(s) * c.len() as u64)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(input: &[u8]) -> Codebook {
        let tree = HuffmanTree::build(&FrequencyTable::from_bytes(input)).unwrap();
        Codebook::from_tree(&tree)
    }

    fn code(s: &str) -> Code {
        s.parse().unwrap()
    }

    fn sym(b: u8) -> Symbol {
        Symbol::new(b).unwrap()
    }

    #[test]
    fn aaabbc_lengths() {
        let book = book(b"aaabbc");
        assert_eq!(book.get(sym(b'a')), Some(code("0")));
        assert_eq!(book.get(sym(b'c')), Some(code("10")));
        assert_eq!(book.get(sym(b'b')), Some(code("11")));
        assert_eq!(book.len(), 3);
        assert_eq!(book.encoded_bits(&FrequencyTable::from_bytes(b"aaabbc")), 9);
    }

    #[test]
    fn single_symbol_gets_one_bit() {
        let book = book(b"aaaa");
        assert_eq!(book.len(), 1);
        assert_eq!(book.get(sym(b'a')).map(|c| c.to_string()), Some("0".into()));
    }

    #[test]
    fn codes_are_prefix_free() {
        let book = book(b"it was the best of times, it was the worst of times");
        let codes: Vec<_> = book.iter().collect();
        for (a, ca) in &codes {
            for (b, cb) in &codes {
                if a != b {
                    assert!(!ca.is_prefix_of(cb), "{a}:{ca} prefixes {b}:{cb}");
                }
            }
        }
    }

    #[test]
    fn code_text_form() {
        let c = code("0110");
        assert_eq!(c.len(), 4);
        assert_eq!(c.to_string(), "0110");
        assert!(code("01").is_prefix_of(&c));
        assert!(!code("1").is_prefix_of(&c));
        assert!(!c.is_prefix_of(&code("01")));

        assert_eq!("".parse::<Code>(), Err(MapError::EmptyCode));
        assert_eq!("01x".parse::<Code>(), Err(MapError::InvalidCodeChar('x')));
        assert_eq!("1".repeat(129).parse::<Code>(), Err(MapError::CodeTooLong(129)));
    }

    #[test]
    fn longest_code_fits() {
        let long = "1".repeat(MAX_CODE_LEN);
        let c = code(&long);
        assert_eq!(c.len(), MAX_CODE_LEN);
        assert_eq!(c.to_string(), long);
        assert!(code("1").is_prefix_of(&c));
        assert!(Code::new().is_prefix_of(&c));
    }
}
