use std::collections::TryReserveError;

use thiserror::Error;

/// Errors produced by the codec.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// No byte of the input falls inside the 0-127 alphabet.
    #[error("input holds no symbols of the 0-127 alphabet")]
    EmptyAlphabet,

    #[error("malformed map at line {line}: {source}")]
    MalformedMap {
        line: usize,
        #[source]
        source: MapError,
    },

    /// The encoded data steers onto a branch the map never defined.
    #[error("bit {bit} of encoded byte {offset} leads off the code tree")]
    InvalidBitPath { offset: usize, bit: u8 },

    #[error("allocation failed: {0}")]
    Allocation(#[from] TryReserveError),
}

/// What is wrong with a single map line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapError {
    #[error("expected `<symbol> <code>`")]
    Syntax,

    #[error("line is not valid UTF-8")]
    NotUtf8,

    #[error("symbol `{0}` is not an integer")]
    BadSymbol(String),

    #[error("symbol {0} is outside the 0-127 alphabet")]
    SymbolOutOfRange(u32),

    #[error("invalid character {0:?} in code")]
    InvalidCodeChar(char),

    #[error("empty code")]
    EmptyCode,

    #[error("code of {0} bits exceeds the 128-bit limit")]
    CodeTooLong(usize),

    #[error("symbol {0} is defined twice")]
    DuplicateSymbol(u8),

    #[error("code for symbol {0} overlaps another code path")]
    Overlap(u8),
}

pub type Result<T> = std::result::Result<T, Error>;
