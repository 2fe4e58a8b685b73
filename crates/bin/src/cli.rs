//! CLI argument definitions for the seria binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use seria::transform::ChildSelector;

use crate::output::OutputFormat;

/// Output format flag
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Format {
    /// Aligned tables and plain text
    Human,
    /// One JSON document per command
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Human => OutputFormat::Human,
            Format::Json => OutputFormat::Json,
        }
    }
}

/// Inspect and edit .seria game object files
#[derive(Parser, Debug)]
#[command(name = "seria")]
#[command(about = "Seria: order-preserving inspection and editing of .seria files")]
#[command(version)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human", env = "SERIA_FORMAT")]
    pub format: Format,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse files and verify they write back byte for byte
    Check(CheckArgs),
    /// Print the node outline of a file
    Tree(TreeArgs),
    /// Read an attribute
    Get(GetArgs),
    /// Set an attribute and write the file back
    Set(SetArgs),
    /// List the escadras of a world save
    Escadras(EscadrasArgs),
}

/// Arguments for the check command
#[derive(clap::Args, Debug)]
pub struct CheckArgs {
    /// Files to check
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

/// Arguments for the tree command
#[derive(clap::Args, Debug)]
pub struct TreeArgs {
    pub file: PathBuf,

    /// Stop descending below this depth
    #[arg(short, long)]
    pub depth: Option<usize>,
}

/// Arguments for the get command
#[derive(clap::Args, Debug)]
pub struct GetArgs {
    pub file: PathBuf,

    /// Dotted attribute key, e.g. m_position.x
    pub key: String,

    /// Descend into the first child matching SLOT, SLOT:CODE, :CODE or KEY=VALUE.
    /// Repeat to descend further.
    #[arg(long = "under", value_name = "SEL")]
    pub under: Vec<ChildSelector>,
}

/// Arguments for the set command
#[derive(clap::Args, Debug)]
pub struct SetArgs {
    pub file: PathBuf,

    /// Dotted attribute key, e.g. m_position.x
    pub key: String,

    /// New value text, classified the same way the parser classifies it
    pub value: String,

    /// Descend into the first child matching SLOT, SLOT:CODE, :CODE or KEY=VALUE.
    /// Repeat to descend further.
    #[arg(long = "under", value_name = "SEL")]
    pub under: Vec<ChildSelector>,

    /// Write to this file instead of overwriting the input
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the escadras command
#[derive(clap::Args, Debug)]
pub struct EscadrasArgs {
    /// World save file
    pub save: PathBuf,

    /// Only escadras strictly closer than R to (X, Y)
    #[arg(long, num_args = 3, value_names = ["X", "Y", "R"], allow_negative_numbers = true)]
    pub near: Option<Vec<f64>>,
}
