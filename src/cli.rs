// src/cli.rs
//! CLI definitions for mspgen
//!
//! Build metadata (version, classification, vendor, ...) is not taken from
//! the command line; it comes from the `MSP_*` environment variables.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mspgen")]
#[command(version)]
#[command(about = "Generate an MSP patch from two MSI packages", long_about = None)]
pub struct Cli {
    /// The path to the old MSI file
    #[arg(short, long, value_name = "MSI")]
    pub old: PathBuf,

    /// The path to the new MSI file
    #[arg(short, long, value_name = "MSI")]
    pub new: PathBuf,

    /// Patch control file template (default: pcp/libreoffice.pcp next to the executable)
    #[arg(long, value_name = "PCP")]
    pub pcp: Option<PathBuf>,

    /// Where to write the MSP file (default: <Product>_<version>_<classification>.msp)
    #[arg(long, value_name = "MSP")]
    pub output: Option<PathBuf>,

    /// Tool configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Whether the generated msp file should be signed
    #[arg(short, long)]
    pub sign: bool,

    /// Enable printing out the debug log output
    #[arg(short, long)]
    pub log: bool,

    /// Keep the staging directory (with .sav table backups) after the run
    #[arg(long)]
    pub keep_staging: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_short_flags() {
        let cli = Cli::try_parse_from(["mspgen", "-o", "a.msi", "-n", "b.msi", "-s", "-l"]).unwrap();
        assert_eq!(cli.old, PathBuf::from("a.msi"));
        assert_eq!(cli.new, PathBuf::from("b.msi"));
        assert!(cli.sign);
        assert!(cli.log);
        assert!(cli.pcp.is_none());
    }

    #[test]
    fn test_old_and_new_required() {
        assert!(Cli::try_parse_from(["mspgen", "-o", "a.msi"]).is_err());
    }
}
