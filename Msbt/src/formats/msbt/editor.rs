//! MSBT editing operations
//!
//! Provides functions for modifying containers:
//! - Replace the string table
//! - Add label groups and labels
//! - Read and update text by label name
//! - Bulk find-and-replace

use super::resolve::text_of;
use super::{GroupId, Label, LabelGroup, MsbtFile};

/// Result of a bulk replace operation
#[derive(Debug, Clone, Default)]
pub struct ReplaceResult {
    /// Number of strings modified
    pub entries_modified: usize,
    /// Total number of replacements made
    pub replacements: usize,
    /// String table positions of modified entries
    pub modified_indices: Vec<usize>,
}

// ============================================================================
// MsbtFile editing methods
// ============================================================================

impl MsbtFile {
    /// Replace the whole string table, returning the previous one
    ///
    /// Label indices are left untouched.
    pub fn set_string_table(&mut self, table: Vec<String>) -> Vec<String> {
        std::mem::replace(&mut self.string_table, table)
    }

    /// Append a label group and return its id
    pub fn push_group(&mut self, labels: Vec<Label>) -> GroupId {
        let id = GroupId(self.label_groups.len() as u32);
        self.label_groups.push(LabelGroup { id, labels });
        id
    }

    /// Append `text` to the string table and a label pointing at it
    ///
    /// # Returns
    /// The new table index, or `None` if `group` does not exist
    pub fn add_label(
        &mut self,
        group: GroupId,
        name: impl Into<String>,
        text: impl Into<String>,
    ) -> Option<i32> {
        let table_index = i32::try_from(self.string_table.len()).ok()?;
        let group = self.label_groups.get_mut(group.index())?;

        group.add(Label::new(name, table_index));
        self.string_table.push(text.into());
        Some(table_index)
    }

    /// Find the first label with the given name
    #[must_use]
    pub fn find_label(&self, name: &str) -> Option<&Label> {
        self.label_groups
            .iter()
            .flat_map(|group| group.labels.iter())
            .find(|label| label.name == name)
    }

    /// Text of the first label with the given name
    ///
    /// Returns `None` if no such label exists or its index is out of range.
    #[must_use]
    pub fn get_text(&self, name: &str) -> Option<&str> {
        let label = self.find_label(name)?;
        text_of(self, label).ok()
    }

    /// Overwrite the text of the first label with the given name
    ///
    /// Other labels sharing the same table index see the change as well.
    ///
    /// # Returns
    /// `true` if the label was found and its index is valid
    pub fn set_text(&mut self, name: &str, text: impl Into<String>) -> bool {
        let Some(index) = self
            .find_label(name)
            .and_then(|label| usize::try_from(label.table_index).ok())
        else {
            return false;
        };

        match self.string_table.get_mut(index) {
            Some(entry) => {
                *entry = text.into();
                true
            }
            None => false,
        }
    }

    /// Renumber group ids to match their current positions
    pub fn renumber_groups(&mut self) {
        for (position, group) in self.label_groups.iter_mut().enumerate() {
            group.id = GroupId(position as u32);
        }
    }

    /// Set the header section count to the number of sections that will be written
    pub fn sync_section_count(&mut self) -> u16 {
        self.section_count = u16::try_from(self.populated_section_count()).unwrap_or(u16::MAX);
        self.section_count
    }

    /// Bulk replace text in all strings
    ///
    /// Case-insensitive matching folds ASCII letters only.
    pub fn replace_all(&mut self, find: &str, replace: &str, case_sensitive: bool) -> ReplaceResult {
        let mut result = ReplaceResult::default();

        for (index, text) in self.string_table.iter_mut().enumerate() {
            let (new_text, count) = if case_sensitive {
                replace_counting(text, find, replace)
            } else {
                replace_case_insensitive_counting(text, find, replace)
            };

            if count > 0 {
                *text = new_text;
                result.entries_modified += 1;
                result.replacements += count;
                result.modified_indices.push(index);
            }
        }

        result
    }
}

fn replace_counting(text: &str, find: &str, replace: &str) -> (String, usize) {
    if find.is_empty() {
        return (text.to_string(), 0);
    }
    let count = text.matches(find).count();
    let new_text = text.replace(find, replace);
    (new_text, count)
}

/// Case-insensitive replace with counting
fn replace_case_insensitive_counting(text: &str, find: &str, replace: &str) -> (String, usize) {
    if find.is_empty() {
        return (text.to_string(), 0);
    }

    let haystack = text.as_bytes();
    let needle = find.as_bytes();

    let mut result = String::with_capacity(text.len());
    let mut count = 0;
    let mut last_end = 0;
    let mut pos = 0;

    while pos + needle.len() <= haystack.len() {
        if text.is_char_boundary(pos) && haystack[pos..pos + needle.len()].eq_ignore_ascii_case(needle) {
            result.push_str(&text[last_end..pos]);
            result.push_str(replace);
            pos += needle.len();
            last_end = pos;
            count += 1;
        } else {
            pos += 1;
        }
    }
    result.push_str(&text[last_end..]);

    (result, count)
}
