//! File format handlers
//!
//! - `msbt` - binary localized-text containers

pub mod msbt;

// Re-export main container types
pub use msbt::{
    GroupId, Label, LabelGroup, LabelIndex, MsbtFile, RawSection, ResolvedView,
    parse_msbt_bytes, read_msbt, resolve, serialize_msbt, write_msbt,
};
