use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "logsift")]
#[command(about = "Search plain, gzip and bzip2 files under a directory tree, lazily", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (repeat for more: info, debug, trace)
    #[arg(long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print lines matching a pattern from every file whose name matches a glob
    Search {
        /// Regular expression to search for
        pattern: String,

        /// Directory to search
        #[arg(default_value = ".")]
        root: PathBuf,

        /// File-name glob (defaults to the config value, then "*")
        #[arg(short, long)]
        glob: Option<String>,

        /// Case-insensitive matching
        #[arg(short = 'i', long)]
        ignore_case: bool,

        /// Select non-matching lines
        #[arg(short = 'v', long = "invert-match")]
        invert_match: bool,

        /// Stop after NUM matching lines
        #[arg(short = 'm', long = "max-count", value_name = "NUM")]
        max_count: Option<usize>,

        /// Prefix each line with its file path and line number
        #[arg(long = "with-path", visible_alias = "with-filename")]
        with_path: bool,

        /// Skip files that cannot be opened instead of aborting
        #[arg(long = "skip-unreadable")]
        skip_unreadable: bool,

        /// Skip directories that cannot be traversed instead of aborting
        #[arg(long = "skip-traversal-errors")]
        skip_traversal_errors: bool,

        /// Configuration file (defaults to the nearest .logsift.toml)
        #[arg(long, env = "LOGSIFT_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Write a default .logsift.toml in the current directory
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}
