//! Text form of a codebook, one `<symbol> <code>` line per symbol in ascending
//! symbol order, and the decode-side tree rebuilt from it.

use std::io::{BufRead, Write};

use crate::code::{Code, Codebook};
use crate::error::{Error, MapError, Result};
use crate::frequency::{ALPHABET_SIZE, Symbol};

pub fn write_map<W: Write>(book: &Codebook, mut writer: W) -> Result<()> {
    for (symbol, code) in book.iter() {
        writeln!(writer, "{symbol} {code}")?;
    }
    writer.flush()?;
    Ok(())
}

pub fn map_to_string(book: &Codebook) -> String {
    book.iter()
        .map(|(symbol, code)| format!("{symbol} {code}\n"))
        .collect()
}

/// Parses a map and rebuilds the code tree. Blank lines are skipped.
pub fn read_map<R: BufRead>(reader: R) -> Result<DecodeTree> {
    let mut tree = DecodeTree::new();
    for (idx, line) in reader.split(b'\n').enumerate() {
        let line = line?;
        let line = line.strip_suffix(b"\r").unwrap_or(&line);
        if line.trim_ascii().is_empty() {
            continue;
        }
        std::str::from_utf8(line)
            .map_err(|_| MapError::NotUtf8)
            .and_then(parse_line)
            .and_then(|(symbol, code)| tree.insert(symbol, &code))
            .map_err(|source| Error::MalformedMap {
                line: idx + 1,
                source,
            })?;
    }
    tracing::debug!("map defines {} symbols", tree.leaf_count());
    Ok(tree)
}

pub fn parse_map(text: &str) -> Result<DecodeTree> {
    read_map(text.as_bytes())
}

fn parse_line(line: &str) -> std::result::Result<(Symbol, Code), MapError> {
    let mut fields = line.split_whitespace();
    let (Some(symbol), Some(code), None) = (fields.next(), fields.next(), fields.next()) else {
        return Err(MapError::Syntax);
    };

    let value: u32 = symbol
        .parse()
        .map_err(|_| MapError::BadSymbol(symbol.to_string()))?;
    let symbol = u8::try_from(value)
        .ok()
        .and_then(Symbol::new)
        .ok_or(MapError::SymbolOutOfRange(value))?;

    Ok((symbol, code.parse()?))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Branch {
        left: Option<usize>,
        right: Option<usize>,
    },
    Leaf(Symbol),
}

/// Code tree rebuilt from a map. Nodes live in an arena and refer to their
/// children by index; the root is always a branch.
#[derive(Debug, Clone)]
pub struct DecodeTree {
    slots: Vec<Slot>,
    defined: [bool; ALPHABET_SIZE],
}

impl Default for DecodeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DecodeTree {
    pub const ROOT: usize = 0;

    pub fn new() -> Self {
        Self {
            slots: vec![Slot::Branch {
                left: None,
                right: None,
            }],
            defined: [false; ALPHABET_SIZE],
        }
    }

    pub fn from_codebook(book: &Codebook) -> std::result::Result<Self, MapError> {
        let mut tree = Self::new();
        for (symbol, code) in book.iter() {
            tree.insert(symbol, &code)?;
        }
        Ok(tree)
    }

    /// Extends the tree along `code` and places `symbol` at its end.
    pub fn insert(&mut self, symbol: Symbol, code: &Code) -> std::result::Result<(), MapError> {
        if code.is_empty() {
            return Err(MapError::EmptyCode);
        }
        if self.defined[symbol.index()] {
            return Err(MapError::DuplicateSymbol(symbol.value()));
        }

        let mut node = Self::ROOT;
        for bit in code.bits() {
            let next = match self.slots[node] {
                Slot::Leaf(_) => return Err(MapError::Overlap(symbol.value())),
                Slot::Branch { left, right } => if bit { right } else { left },
            };
            node = match next {
                Some(child) => child,
                None => self.add_child(node, bit),
            };
        }

        match self.slots[node] {
            Slot::Branch {
                left: None,
                right: None,
            } => {
                self.slots[node] = Slot::Leaf(symbol);
                self.defined[symbol.index()] = true;
                Ok(())
            }
            _ => Err(MapError::Overlap(symbol.value())),
        }
    }

    fn add_child(&mut self, parent: usize, bit: bool) -> usize {
        let child = self.slots.len();
        self.slots.push(Slot::Branch {
            left: None,
            right: None,
        });
        if let Slot::Branch { left, right } = &mut self.slots[parent] {
            if bit {
                *right = Some(child);
            } else {
                *left = Some(child);
            }
        }
        child
    }

    /// Child of `node` in direction `bit`, if the map defined one.
    pub fn step(&self, node: usize, bit: bool) -> Option<usize> {
        match self.slots.get(node)? {
            Slot::Branch { left, right } => if bit { *right } else { *left },
            Slot::Leaf(_) => None,
        }
    }

    pub fn symbol(&self, node: usize) -> Option<Symbol> {
        match self.slots.get(node)? {
            Slot::Leaf(symbol) => Some(*symbol),
            Slot::Branch { .. } => None,
        }
    }

    pub fn leaf_count(&self) -> usize {
        self.defined.iter().filter(|&&d| d).count()
    }

    pub fn is_empty(&self) -> bool {
        self.leaf_count() == 0
    }

    /// True when every branch has both children, i.e. every bit sequence decodes.
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(|slot| match slot {
            Slot::Branch { left, right } => left.is_some() && right.is_some(),
            Slot::Leaf(_) => true,
        })
    }

    /// Recovers the symbol-to-code mapping from the tree's leaf paths.
    pub fn codebook(&self) -> Codebook {
        let mut book = Codebook::default();
        let mut stack = vec![(Self::ROOT, Code::new())];
        while let Some((node, code)) = stack.pop() {
            match self.slots[node] {
                Slot::Leaf(symbol) => book.insert(symbol, code),
                Slot::Branch { left, right } => {
                    if let Some(right) = right {
                        stack.push((right, code.with_bit(true)));
                    }
                    if let Some(left) = left {
                        stack.push((left, code.with_bit(false)));
                    }
                }
            }
        }
        book
    }
}
