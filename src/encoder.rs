//! Bit-packing encoder.
//!
//! Codes are concatenated in input order and packed most significant bit
//! first. A partial last byte is padded with zero bits. The output carries no
//! header and no length, so the padding cannot be told apart from data.

use std::io::{ErrorKind, Read, Write};

use crate::code::{Code, Codebook};
use crate::error::Result;

pub struct BitWriter<W: Write> {
    inner: W,
    buffer: u8,
    filled: u8,
    bits: u64,
}

impl<W: Write> BitWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            buffer: 0,
            filled: 0,
            bits: 0,
        }
    }

    pub fn write_bit(&mut self, bit: bool) -> Result<()> {
        if bit {
            self.buffer |= 1 << (7 - self.filled);
        }
        self.filled += 1;
        self.bits += 1;

        if self.filled == 8 {
            self.inner.write_all(&[self.buffer])?;
            self.buffer = 0;
            self.filled = 0;
        }
        Ok(())
    }

    pub fn write_code(&mut self, code: &Code) -> Result<()> {
        for bit in code.bits() {
            self.write_bit(bit)?;
        }
        Ok(())
    }

    /// Bits written so far, excluding padding.
    pub fn bits_written(&self) -> u64 {
        self.bits
    }

    /// Emits the partial last byte, if any, and returns the writer with the
    /// number of padding bits added.
    pub fn finish(mut self) -> Result<(W, u8)> {
        let mut padding = 0;
        if self.filled > 0 {
            padding = 8 - self.filled;
            self.inner.write_all(&[self.buffer])?;
        }
        self.inner.flush()?;
        Ok((self.inner, padding))
    }
}

/// Summary of one encoding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Encoded {
    pub symbols: u64,
    pub bits: u64,
    pub bytes: u64,
    pub padding: u8,
    /// Input bytes without a code, left out of the output.
    pub skipped: u64,
}

pub struct Encoder<'a> {
    book: &'a Codebook,
}

impl<'a> Encoder<'a> {
    pub fn new(book: &'a Codebook) -> Self {
        Self { book }
    }

    pub fn encode(&self, input: &[u8]) -> Result<(Vec<u8>, Encoded)> {
        let mut out = Vec::with_capacity(input.len() / 2);
        let summary = self.encode_to(input, &mut out)?;
        Ok((out, summary))
    }

    pub fn encode_to<R: Read, W: Write>(&self, mut reader: R, writer: W) -> Result<Encoded> {
        let mut bits = BitWriter::new(writer);
        let mut summary = Encoded::default();
        let mut buf = [0u8; 8192];

        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };

            for &byte in &buf[..n] {
                let Some(code) = self.book.lookup(byte) else {
                    summary.skipped += 1;
                    continue;
                };
                bits.write_code(&code)?;
                summary.symbols += 1;
            }
        }

        if summary.skipped > 0 {
            tracing::warn!("skipped {} input bytes without a code", summary.skipped);
        }
        summary.bits = bits.bits_written();
        let (_, padding) = bits.finish()?;
        summary.padding = padding;
        summary.bytes = summary.bits.div_ceil(8);

        tracing::debug!(
            "packed {} symbols into {} bits ({} padding)",
            summary.symbols,
            summary.bits,
            summary.padding
        );
        Ok(summary)
    }
}
