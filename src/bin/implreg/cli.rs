//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// implreg - implementor cross-reference fragments for generated Rust docs
#[derive(Parser)]
#[command(name = "implreg")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a JSON table as a fragment script
    Render(RenderArgs),

    /// Show what fragment scripts contain
    Inspect(InspectArgs),

    /// Splice tables into an existing fragment script
    Merge(MergeArgs),

    /// Load fragments into a registry the way a page does
    Replay(ReplayArgs),

    /// List the fragments under a documentation root
    Scan(ScanArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct RenderArgs {
    /// JSON table to render
    pub input: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long, conflicts_with = "trait_path")]
    pub output: Option<PathBuf>,

    /// Write to the trait's location under the documentation root
    #[arg(long = "trait", value_name = "PATH")]
    pub trait_path: Option<String>,

    /// Documentation root used with --trait (defaults to current directory)
    #[arg(long, requires = "trait_path")]
    pub doc_root: Option<PathBuf>,

    /// Omit the segment offset trailer
    #[arg(long)]
    pub no_offsets: bool,
}

#[derive(Args)]
pub struct InspectArgs {
    /// Fragment scripts to inspect
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Print reports as JSON
    #[arg(long)]
    pub json: bool,

    /// Fail unless every trailer matches its payload
    #[arg(long)]
    pub check: bool,
}

#[derive(Args)]
pub struct MergeArgs {
    /// Fragment script to update (created if missing)
    pub target: PathBuf,

    /// JSON tables or fragment scripts to merge, applied in order
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,
}

#[derive(Args)]
pub struct ReplayArgs {
    /// Fragment scripts, in load order
    #[arg(required = true)]
    pub fragments: Vec<PathBuf>,

    /// Install the index after this many fragments have loaded
    #[arg(long)]
    pub install_after: Option<usize>,

    /// Libraries rendered by the page itself (repeatable)
    #[arg(long = "local", value_name = "LIBRARY")]
    pub local_libraries: Vec<String>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ScanArgs {
    /// Documentation root containing `trait.impl/`
    #[arg(default_value = ".")]
    pub doc_root: PathBuf,

    /// Print the listing as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
