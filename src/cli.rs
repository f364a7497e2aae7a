use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::map::read_map;
use crate::report::{CodeListing, CompressionStats, FrequencyListing};
use crate::{Codebook, Decoder, Error, FrequencyTable, HuffmanTree};

#[derive(Debug, Parser)]
#[command(name = "huffmap", version, about = "Huffman codec with a separate text code map")]
pub struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Encode INPUT into ENCODED, writing the code map to MAP
    Compress {
        input: PathBuf,
        encoded: PathBuf,
        map: PathBuf,
        /// Print sizes and compression ratio
        #[arg(long)]
        stats: bool,
    },
    /// Decode ENCODED with MAP into OUTPUT
    Decompress {
        encoded: PathBuf,
        map: PathBuf,
        output: PathBuf,
    },
    /// Print the frequency table and codes for INPUT without writing files
    Codes { input: PathBuf },
}

pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Runs one command, printing reports to `out`.
pub fn run<W: Write>(command: &Command, out: &mut W) -> Result<()> {
    match command {
        Command::Compress {
            input,
            encoded,
            map,
            stats,
        } => compress(input, encoded, map, *stats, out),
        Command::Decompress {
            encoded,
            map,
            output,
        } => decompress(encoded, map, output),
        Command::Codes { input } => codes(input, out),
    }
}

fn compress<W: Write>(
    input: &Path,
    encoded: &Path,
    map: &Path,
    stats: bool,
    out: &mut W,
) -> Result<()> {
    let data = fs::read(input).with_context(|| format!("read {}", input.display()))?;

    let compressed = match crate::compress(&data) {
        Err(Error::EmptyAlphabet) => {
            tracing::warn!(
                "{} holds no symbols of the 0-127 alphabet, nothing written",
                input.display()
            );
            return Ok(());
        }
        result => result.with_context(|| format!("compress {}", input.display()))?,
    };

    write_all_or_nothing(&[
        (encoded, compressed.data.as_slice()),
        (map, compressed.map.as_bytes()),
    ])?;
    tracing::info!(
        "wrote {} bytes to {} and {} codes to {}",
        compressed.data.len(),
        encoded.display(),
        compressed.codebook.len(),
        map.display()
    );

    if stats {
        let stats = CompressionStats {
            original: data.len() as u64,
            data: compressed.data.len() as u64,
            map: compressed.map.len() as u64,
        };
        writeln!(out, "{stats}")?;
    }
    Ok(())
}

fn decompress(encoded: &Path, map: &Path, output: &Path) -> Result<()> {
    let map_bytes = fs::read(map).with_context(|| format!("read {}", map.display()))?;
    let data = fs::read(encoded).with_context(|| format!("read {}", encoded.display()))?;

    let tree =
        read_map(map_bytes.as_slice()).with_context(|| format!("parse {}", map.display()))?;
    let (decoded, summary) = Decoder::new(&tree)
        .decode(&data)
        .with_context(|| format!("decode {} with {}", encoded.display(), map.display()))?;

    write_all_or_nothing(&[(output, decoded.as_slice())])?;
    tracing::info!(
        "decoded {} symbols into {}",
        summary.symbols,
        output.display()
    );
    Ok(())
}

fn codes<W: Write>(input: &Path, out: &mut W) -> Result<()> {
    let data = fs::read(input).with_context(|| format!("read {}", input.display()))?;
    let table = FrequencyTable::from_bytes(&data);
    writeln!(out, "{}", FrequencyListing(&table))?;

    if table.is_empty() {
        writeln!(out, "No symbols found, no codes generated")?;
        return Ok(());
    }

    let book = Codebook::from_tree(&HuffmanTree::build(&table)?);
    writeln!(out, "\n{}", CodeListing(&book))?;
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Writes every file to a sibling staging path, then renames them into place.
/// If any write or rename fails, staged files and files already moved into
/// place are removed again.
fn write_all_or_nothing(files: &[(&Path, &[u8])]) -> Result<()> {
    let mut staged: Vec<(PathBuf, &Path)> = Vec::with_capacity(files.len());
    for &(path, bytes) in files {
        let tmp = staging_path(path);
        if let Err(e) = fs::write(&tmp, bytes) {
            let _ = fs::remove_file(&tmp);
            discard(staged.iter().map(|(tmp, _)| tmp.as_path()));
            return Err(e).with_context(|| format!("write {}", tmp.display()));
        }
        staged.push((tmp, path));
    }

    for (i, (tmp, path)) in staged.iter().enumerate() {
        if let Err(e) = fs::rename(tmp, path) {
            discard(staged[..i].iter().map(|&(_, path)| path));
            discard(staged[i..].iter().map(|(tmp, _)| tmp.as_path()));
            return Err(e).with_context(|| format!("move {} into place", path.display()));
        }
    }
    Ok(())
}

fn discard<'a>(paths: impl Iterator<Item = &'a Path>) {
    for path in paths {
        if let Err(e) = fs::remove_file(path) {
            tracing::warn!("could not remove {}: {e}", path.display());
        }
    }
}
