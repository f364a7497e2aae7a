use std::fmt;
use std::io::{ErrorKind, Read};

use crate::error::Result;

/// Number of symbols in the alphabet; bytes `0..ALPHABET_SIZE` are symbols.
pub const ALPHABET_SIZE: usize = 128;

/// One byte of input inside the 0-127 alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u8);

impl Symbol {
    pub fn new(byte: u8) -> Option<Self> {
        ((byte as usize) < ALPHABET_SIZE).then_some(Symbol(byte))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// All symbols in ascending order.
    pub fn all() -> impl Iterator<Item = Symbol> {
        (0..ALPHABET_SIZE as u8).map(Symbol)
    }
}

impl TryFrom<u8> for Symbol {
    type Error = u8;

    fn try_from(byte: u8) -> std::result::Result<Self, Self::Error> {
        Symbol::new(byte).ok_or(byte)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Occurrence counts for every symbol of the alphabet.
#[derive(Debug, Clone)]
pub struct FrequencyTable {
    counts: [u64; ALPHABET_SIZE],
    // bytes 128..=255, indexed by `byte - 128`
    rejected: [u64; 256 - ALPHABET_SIZE],
    unique: usize,
    max_count: u64,
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self {
            counts: [0; ALPHABET_SIZE],
            rejected: [0; 256 - ALPHABET_SIZE],
            unique: 0,
            max_count: 0,
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut table = Self::new();
        for &byte in bytes {
            table.record(byte);
        }
        table
    }

    /// Counts every byte until the reader is exhausted.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut table = Self::new();
        let mut buf = [0u8; 8192];
        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            for &byte in &buf[..n] {
                table.record(byte);
            }
        }
        Ok(table)
    }

    pub fn record(&mut self, byte: u8) {
        let Some(symbol) = Symbol::new(byte) else {
            let slot = &mut self.rejected[byte as usize - ALPHABET_SIZE];
            if *slot == 0 {
                tracing::warn!("byte {byte:#04x} is outside the 0-127 alphabet, ignoring it");
            }
            *slot += 1;
            return;
        };

        let count = &mut self.counts[symbol.index()];
        if *count == 0 {
            self.unique += 1;
        }
        *count += 1;
        self.max_count = self.max_count.max(*count);
    }

    pub fn count(&self, symbol: Symbol) -> u64 {
        self.counts[symbol.index()]
    }

    /// Number of distinct symbols with a nonzero count.
    pub fn unique(&self) -> usize {
        self.unique
    }

    pub fn max_count(&self) -> u64 {
        self.max_count
    }

    pub fn is_empty(&self) -> bool {
        self.unique == 0
    }

    /// Sum of all symbol counts.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Number of bytes seen outside the alphabet.
    pub fn out_of_alphabet(&self) -> u64 {
        self.rejected.iter().sum()
    }

    /// The full dense table, one entry per symbol.
    pub fn entries(&self) -> impl Iterator<Item = (Symbol, u64)> + '_ {
        Symbol::all().map(|s| (s, self.counts[s.index()]))
    }

    /// Entries with a nonzero count, ascending by symbol.
    pub fn present(&self) -> impl Iterator<Item = (Symbol, u64)> + '_ {
        self.entries().filter(|&(_, count)| count > 0)
    }
}
