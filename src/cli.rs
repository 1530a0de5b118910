use crate::mappings::{Pair, parse_pair};
use clap::Parser;
use std::path::PathBuf;

/// Tap a key for one thing, hold it for another.
///
/// Every NATURAL:ARTIFICIAL pair makes a quick, uncombined tap of the
/// NATURAL key code also send the ARTIFICIAL key code.
#[derive(Parser, Debug)]
#[command(name = "oxidetap", version)]
pub(crate) struct Args {
    /// Key code pairs, e.g. 58:1 for CapsLock taps as Escape
    #[arg(value_name = "NATURAL:ARTIFICIAL", required = true, value_parser = pair)]
    pub pairs: Vec<Pair>,

    /// YAML settings file
    #[arg(short, long, value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Decide taps but only log them
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Longest hold in milliseconds that still counts as a tap
    #[arg(short, long, value_name = "MS")]
    pub timeout: Option<u64>,
}

fn pair(arg: &str) -> Result<Pair, String> {
    parse_pair(arg).map_err(|e| format!("{e:#}"))
}
