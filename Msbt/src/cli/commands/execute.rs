//! Command execution implementations

use super::Commands;
use super::{convert, edit, inspect};

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying command fails.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Convert {
                source,
                destination,
                threads,
                overwrite,
                quiet,
            } => convert::execute(source, destination, *threads, *overwrite, *quiet),
            Commands::Info { source } => inspect::info(source),
            Commands::List {
                source,
                group,
                json,
            } => inspect::list(source, *group, *json),
            Commands::Get { source, label } => inspect::get(source, label),
            Commands::Set {
                source,
                label,
                text,
                output,
            } => edit::set(source, label, text, output.as_deref()),
            Commands::Replace {
                source,
                find,
                replace,
                ignore_case,
                dry_run,
                output,
            } => edit::replace(
                source,
                find,
                replace,
                !*ignore_case,
                *dry_run,
                output.as_deref(),
            ),
        }
    }
}
