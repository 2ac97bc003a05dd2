//! Dereferenced views over a container
//!
//! Labels only store an index into the string table. [`resolve`] builds a
//! read-only projection that pairs each label with its text, and
//! [`LabelIndex`] maps label names to their location. Neither is ever
//! written back to disk.

use indexmap::IndexMap;
use serde::Serialize;

use super::{GroupId, Label, MsbtFile};
use crate::error::{Error, Result};

/// A label together with the text it points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLabel {
    pub name: String,
    pub table_index: i32,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedGroup {
    pub id: GroupId,
    pub labels: Vec<ResolvedLabel>,
}

/// Display projection of a container's labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedView {
    pub label_groups: Vec<ResolvedGroup>,
}

impl ResolvedView {
    /// Iterate over every resolved label in group order
    pub fn labels(&self) -> impl Iterator<Item = &ResolvedLabel> {
        self.label_groups.iter().flat_map(|group| group.labels.iter())
    }
}

/// Look up the text a label points at
pub(super) fn text_of<'a>(msbt: &'a MsbtFile, label: &Label) -> Result<&'a str> {
    usize::try_from(label.table_index)
        .ok()
        .and_then(|index| msbt.string_table.get(index))
        .map(String::as_str)
        .ok_or_else(|| Error::InvalidTableIndex {
            label: label.name.clone(),
            index: label.table_index,
            table_len: msbt.string_table.len(),
        })
}

/// Pair every label with its string table entry
///
/// # Errors
/// Returns [`Error::InvalidTableIndex`] for the first label whose index is
/// outside the string table.
///
/// [`Error::InvalidTableIndex`]: crate::Error::InvalidTableIndex
pub fn resolve(msbt: &MsbtFile) -> Result<ResolvedView> {
    let label_groups = msbt
        .label_groups
        .iter()
        .map(|group| {
            let labels = group
                .labels
                .iter()
                .map(|label| {
                    Ok(ResolvedLabel {
                        name: label.name.clone(),
                        table_index: label.table_index,
                        value: text_of(msbt, label)?.to_string(),
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(ResolvedGroup {
                id: group.id,
                labels,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ResolvedView { label_groups })
}

/// Where a label lives inside a container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelRef {
    /// Group position
    pub group: GroupId,
    /// Position within the group
    pub position: usize,
    pub table_index: i32,
}

/// Name lookup built from parsed label groups
///
/// Entries keep file order. If a name occurs more than once, the first
/// occurrence wins.
#[derive(Debug, Clone, Default)]
pub struct LabelIndex {
    entries: IndexMap<String, LabelRef>,
}

impl LabelIndex {
    /// Index every label of `msbt` by name
    #[must_use]
    pub fn build(msbt: &MsbtFile) -> Self {
        let mut entries = IndexMap::with_capacity(msbt.label_count());

        for (group_pos, group) in msbt.label_groups.iter().enumerate() {
            for (position, label) in group.labels.iter().enumerate() {
                entries.entry(label.name.clone()).or_insert(LabelRef {
                    group: GroupId(group_pos as u32),
                    position,
                    table_index: label.table_index,
                });
            }
        }

        Self { entries }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<LabelRef> {
        self.entries.get(name).copied()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Label names in file order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl MsbtFile {
    /// Build a name lookup over this container's labels
    #[must_use]
    pub fn label_index(&self) -> LabelIndex {
        LabelIndex::build(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::formats::msbt::LabelGroup;

    fn sample() -> MsbtFile {
        let mut msbt = MsbtFile::new();
        msbt.string_table = vec!["Hello".into(), "World".into()];

        let mut first = LabelGroup::new(GroupId(0));
        first.add(Label::new("greeting", 0));
        let empty = LabelGroup::new(GroupId(1));
        let mut third = LabelGroup::new(GroupId(2));
        third.add(Label::new("noun", 1));
        third.add(Label::new("greeting", 1));

        msbt.label_groups = vec![first, empty, third];
        msbt
    }

    #[test]
    fn test_resolve_values() {
        let view = resolve(&sample()).unwrap();
        assert_eq!(view.label_groups.len(), 3);
        assert!(view.label_groups[1].labels.is_empty());

        let values: Vec<_> = view.labels().map(|l| (l.name.as_str(), l.value.as_str())).collect();
        assert_eq!(
            values,
            vec![("greeting", "Hello"), ("noun", "World"), ("greeting", "World")]
        );
    }

    #[test]
    fn test_resolve_rejects_bad_index() {
        let mut msbt = sample();
        msbt.label_groups[0].labels[0].table_index = 5;
        let err = resolve(&msbt).unwrap_err();
        assert!(matches!(err, Error::InvalidTableIndex { index: 5, table_len: 2, .. }));
        assert_eq!(err.kind(), ErrorKind::OutOfBounds);

        msbt.label_groups[0].labels[0].table_index = -1;
        assert!(resolve(&msbt).is_err());
    }

    #[test]
    fn test_label_index() {
        let index = sample().label_index();
        assert_eq!(index.len(), 2);
        assert_eq!(index.names().collect::<Vec<_>>(), vec!["greeting", "noun"]);

        let noun = index.get("noun").unwrap();
        assert_eq!(noun.group, GroupId(2));
        assert_eq!(noun.position, 0);
        assert_eq!(noun.table_index, 1);

        // First occurrence wins
        assert_eq!(index.get("greeting").unwrap().group, GroupId(0));
        assert!(!index.contains("missing"));
    }
}
