//! Human-readable listings printed by the command line tool.

use std::fmt;

use crate::code::Codebook;
use crate::frequency::{FrequencyTable, Symbol};

/// Printable form of a symbol: quoted when printable, escaped or hex otherwise.
pub fn display_symbol(symbol: Symbol) -> String {
    match symbol.value() {
        b'\n' => "'\\n'".to_string(),
        b'\t' => "'\\t'".to_string(),
        b'\r' => "'\\r'".to_string(),
        0 => "'\\0'".to_string(),
        b @ 0x20..=0x7e => format!("'{}'", b as char),
        b => format!("{b:#04x}"),
    }
}

pub struct FrequencyListing<'a>(pub &'a FrequencyTable);

impl fmt::Display for FrequencyListing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Symbol\tValue\tCount")?;
        for (symbol, count) in self.0.present() {
            writeln!(f, "{}\t{}\t{}", display_symbol(symbol), symbol, count)?;
        }
        writeln!(f, "Largest frequency count: {}", self.0.max_count())?;
        write!(f, "Unique symbols: {}", self.0.unique())?;
        if self.0.out_of_alphabet() > 0 {
            write!(f, "\nIgnored bytes: {}", self.0.out_of_alphabet())?;
        }
        Ok(())
    }
}

pub struct CodeListing<'a>(pub &'a Codebook);

impl fmt::Display for CodeListing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol\tValue\tCode")?;
        for (symbol, code) in self.0.iter() {
            write!(f, "\n{}\t{}\t{}", display_symbol(symbol), symbol, code)?;
        }
        Ok(())
    }
}

/// Sizes, in bytes, before and after compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionStats {
    pub original: u64,
    pub data: u64,
    pub map: u64,
}

impl CompressionStats {
    /// Encoded data plus map.
    pub fn total(&self) -> u64 {
        self.data + self.map
    }

    /// Compressed size as a percentage of the original, `None` for an empty original.
    pub fn ratio(&self) -> Option<f64> {
        (self.original > 0).then(|| self.total() as f64 / self.original as f64 * 100.0)
    }

    pub fn space_saved(&self) -> Option<f64> {
        self.ratio().map(|r| 100.0 - r)
    }
}

impl fmt::Display for CompressionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Original size: {} bytes", self.original)?;
        writeln!(f, "Encoded data: {} bytes", self.data)?;
        writeln!(f, "Map: {} bytes", self.map)?;
        write!(f, "Total compressed size (data + map): {} bytes", self.total())?;
        match (self.ratio(), self.space_saved()) {
            (Some(ratio), Some(saved)) => {
                write!(f, "\nCompression ratio: {ratio:.2}%\nSpace saved: {saved:.2}%")
            }
            _ => write!(f, "\nCannot compute percentages for an empty original"),
        }
    }
}
