//! CLI commands for reading containers

use std::path::Path;

use crate::formats::msbt::{MsbtFile, ResolvedView, read_msbt, resolve};

/// Show header fields and section counts
pub fn info(source: &Path) -> anyhow::Result<()> {
    let file_size = std::fs::metadata(source)?.len();
    let container = read_msbt(source)?;

    let non_empty_groups = container
        .label_groups
        .iter()
        .filter(|g| !g.is_empty())
        .count();

    println!("MSBT Information: {}", source.display());
    println!();
    println!("File size: {file_size} bytes");
    println!(
        "Byte-order mark: {:#06x} ({})",
        container.byte_order_mark,
        byte_order_name(&container)
    );
    println!("Version: {}", container.version);
    println!("Sections: {}", container.section_count);
    println!(
        "Label groups: {} ({} non-empty)",
        container.label_groups.len(),
        non_empty_groups
    );
    println!("Labels: {}", container.label_count());
    println!("Strings: {}", container.string_table.len());

    if !container.extra_sections.is_empty() {
        println!();
        println!("Other sections:");
        for section in &container.extra_sections {
            println!("  {}  {} bytes", section.tag, section.payload.len());
        }
    }

    Ok(())
}

fn byte_order_name(container: &MsbtFile) -> &'static str {
    match container.byte_order_mark {
        0xFEFF => "little-endian",
        0xFFFE => "big-endian",
        _ => "unknown",
    }
}

/// List labels with their resolved text
pub fn list(source: &Path, group: Option<u32>, json: bool) -> anyhow::Result<()> {
    let container = read_msbt(source)?;
    let mut view = resolve(&container)?;

    if let Some(id) = group {
        view.label_groups.retain(|g| g.id.0 == id);
        if view.label_groups.is_empty() {
            anyhow::bail!("No label group {id} (file has {})", container.label_groups.len());
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print_table(&view);
    }

    Ok(())
}

fn print_table(view: &ResolvedView) {
    for group in &view.label_groups {
        for label in &group.labels {
            println!(
                "{:>4}  {:<32}  {:>5}  {}",
                group.id,
                label.name,
                label.table_index,
                preview(&label.value)
            );
        }
    }
}

/// Single-line rendering of a string table entry
fn preview(text: &str) -> String {
    let text = text.trim_end_matches('\0').replace('\n', "\\n");
    if text.chars().count() > 80 {
        let truncated: String = text.chars().take(77).collect();
        format!("{truncated}...")
    } else {
        text
    }
}

/// Print the text of a label
pub fn get(source: &Path, label: &str) -> anyhow::Result<()> {
    let container = read_msbt(source)?;

    match container.get_text(label) {
        Some(text) => {
            println!("{}", text.trim_end_matches('\0'));
            Ok(())
        }
        None => anyhow::bail!("Label '{label}' not found in {}", source.display()),
    }
}
