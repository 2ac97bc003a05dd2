//! CLI commands for modifying containers

use std::path::Path;

use crate::formats::msbt::{read_msbt, write_msbt};

/// Replace the text of a label
///
/// If the old text ended with a NUL terminator and the new one does not, the
/// terminator is kept.
pub fn set(source: &Path, label: &str, text: &str, output: Option<&Path>) -> anyhow::Result<()> {
    let mut container = read_msbt(source)?;

    let Some(old) = container.get_text(label) else {
        anyhow::bail!("Label '{label}' not found in {}", source.display());
    };

    let new_text = with_terminator_of(old, text);
    container.set_text(label, new_text);

    let dest = output.unwrap_or(source);
    write_msbt(dest, &container)?;
    println!("Updated '{label}' in {}", dest.display());

    Ok(())
}

fn with_terminator_of(old: &str, text: &str) -> String {
    if old.ends_with('\0') && !text.ends_with('\0') {
        format!("{text}\0")
    } else {
        text.to_string()
    }
}

/// Find and replace across the string table
pub fn replace(
    source: &Path,
    find: &str,
    replace: &str,
    case_sensitive: bool,
    dry_run: bool,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let mut container = read_msbt(source)?;
    let result = container.replace_all(find, replace, case_sensitive);

    if result.replacements == 0 {
        println!("No matches for '{find}'");
        return Ok(());
    }

    println!(
        "{} replacements in {} strings",
        result.replacements, result.entries_modified
    );
    for &index in &result.modified_indices {
        let text = container.string_table[index].trim_end_matches('\0');
        println!("  [{index}] {}", text.replace('\n', "\\n"));
    }

    if dry_run {
        println!("Dry run, nothing written");
        return Ok(());
    }

    let dest = output.unwrap_or(source);
    write_msbt(dest, &container)?;
    println!("Saved {}", dest.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminator_is_kept() {
        assert_eq!(with_terminator_of("Old\0", "New"), "New\0");
        assert_eq!(with_terminator_of("Old\0", "New\0"), "New\0");
        assert_eq!(with_terminator_of("Old", "New"), "New");
    }
}
