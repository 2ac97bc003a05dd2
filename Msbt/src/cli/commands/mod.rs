use clap::Subcommand;
use std::path::PathBuf;

pub mod convert;
pub mod edit;
mod execute;
pub mod inspect;

#[derive(Subcommand)]
pub enum Commands {
    /// Convert between .msbt and .json (a single file or a whole directory)
    Convert {
        /// Source file or directory
        #[arg(short, long)]
        source: PathBuf,

        /// Output file or directory
        #[arg(short, long)]
        destination: PathBuf,

        /// Worker threads for directory conversion
        #[arg(short, long)]
        threads: Option<usize>,

        /// Replace existing files during directory conversion
        #[arg(long)]
        overwrite: bool,

        /// Suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Show header fields and section counts
    Info {
        /// Source .msbt file
        source: PathBuf,
    },

    /// List labels with their text
    List {
        /// Source .msbt file
        source: PathBuf,

        /// Only show this label group
        #[arg(short, long)]
        group: Option<u32>,

        /// Print the resolved JSON view instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the text of a label
    Get {
        /// Source .msbt file
        source: PathBuf,

        /// Label name
        label: String,
    },

    /// Replace the text of a label
    Set {
        /// Source .msbt file
        source: PathBuf,

        /// Label name
        label: String,

        /// New text
        text: String,

        /// Write to this file instead of modifying the source
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Find and replace text across the string table
    Replace {
        /// Source .msbt file
        source: PathBuf,

        /// Text to search for
        find: String,

        /// Replacement text
        replace: String,

        /// Match ASCII letters regardless of case
        #[arg(short, long)]
        ignore_case: bool,

        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,

        /// Write to this file instead of modifying the source
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
