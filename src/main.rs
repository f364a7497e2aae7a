use std::io;

use anyhow::Result;
use clap::Parser;
use huffmap::cli::{self, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli::init_logging(cli.verbose);

    let stdout = io::stdout();
    cli::run(&cli.command, &mut stdout.lock())
}
