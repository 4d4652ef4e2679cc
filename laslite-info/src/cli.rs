use clap::Parser;
use std::path::PathBuf;

/// Prints summary information about a LAS file.
#[derive(Debug, Parser)]
pub struct AppOptions {
    /// Verbosity of the command line output.
    #[clap(long, default_value = "info")]
    pub log_level: log::Level,

    /// Output the summary as json.
    #[clap(long)]
    pub json: bool,

    /// Also decode the VLR and EVLR metadata regions.
    #[clap(long)]
    pub full: bool,

    /// Report raw integer coordinates instead of rescaled ones.
    #[clap(long)]
    pub raw: bool,

    /// Compare the decoded point bounds against the header bounds.
    #[clap(long)]
    pub validate: bool,

    /// The las file to inspect.
    #[clap()]
    pub file: PathBuf,
}
