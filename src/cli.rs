//! Command-line interface definition for Sheetsieve
//!
//! This module defines the CLI structure using clap's derive API. The
//! filtering core takes no configuration; these flags belong to the
//! console frontend only.

use clap::Parser;
use std::path::PathBuf;

/// Sheetsieve - interactive spreadsheet filter
///
/// Upload an Excel (.xlsx) file, pick a column and a set of values, and
/// download the filtered result as xlsx, csv, or JSON records.
#[derive(Parser, Debug, Clone)]
#[command(name = "sheetsieve")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory where filtered files are saved
    #[arg(short, long, default_value = ".")]
    pub download_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["sheetsieve"]);
        assert_eq!(cli.download_dir, PathBuf::from("."));
        assert!(!cli.verbose);
    }

    #[test]
    fn test_download_dir_flag() {
        let cli = Cli::parse_from(["sheetsieve", "--download-dir", "/tmp/out", "-v"]);
        assert_eq!(cli.download_dir, PathBuf::from("/tmp/out"));
        assert!(cli.verbose);
    }
}
