//! # msbt
//!
//! A pure-Rust library for working with MSBT localized-text containers.
//!
//! ## Supported Formats
//!
//! - **MSBT** - Binary message containers (label groups + UTF-16 string table)
//! - **JSON** - Editable structured-text form, stored as UTF-16LE
//!
//! ## Quick Start
//!
//! ### Reading and Editing a Container
//!
//! ```no_run
//! use msbt::formats::msbt::{read_msbt, write_msbt};
//!
//! let mut container = read_msbt("Menu.msbt")?;
//! println!("Found {} labels", container.label_count());
//!
//! container.set_text("title", "New Title\0");
//! write_msbt("Menu.msbt", &container)?;
//! # Ok::<(), msbt::Error>(())
//! ```
//!
//! ### Converting to JSON and Back
//!
//! ```no_run
//! use msbt::converter::convert_file;
//!
//! convert_file("Menu.msbt", "Menu.json")?;
//! convert_file("Menu.json", "Menu.msbt")?;
//! # Ok::<(), msbt::Error>(())
//! ```
//!
//! ### Converting a Directory
//!
//! ```no_run
//! use msbt::batch::{BatchOptions, batch_convert, find_convertible_files};
//! use std::path::Path;
//!
//! let options = BatchOptions::new().threads(4);
//! let pool = options.build_pool()?;
//! let files = find_convertible_files("Message");
//! let result = batch_convert(&pool, &files, Path::new("Message"), Path::new("out"), &options, |_| {});
//! println!("{} converted, {} failed", result.success_count, result.fail_count);
//! # Ok::<(), msbt::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `msbt` command-line binary

pub mod batch;
pub mod converter;
pub mod error;
pub mod formats;

// Re-exports for convenience
pub use error::{Error, ErrorKind, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, ErrorKind, Result};
    pub use crate::formats::msbt::{
        GroupId, Label, LabelGroup, LabelIndex, MsbtFile, RawSection, ReplaceResult,
        ResolvedView, SectionTag, parse_msbt_bytes, read_msbt, resolve, serialize_msbt,
        write_msbt,
    };

    pub use crate::converter::{self, convert_file};
    pub use crate::batch::{
        BatchConvertResult, BatchOptions, ConversionPlan, batch_convert, find_convertible_files,
        plan_conversion,
    };
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
