//! Feature catalog construction
//!
//! The catalog is the ordered set of every feature tag observed across all
//! records. It is built once from a full scan and then only read: each record
//! is projected onto it as one check mark (or empty cell) per entry.
//!
//! # Ordering
//!
//! Entries are ranked by the taxonomy keyword found in their label:
//!
//! | rank | label contains |
//! |------|----------------|
//! | 1    | `non local`    |
//! | 2    | `borrow`       |
//! | 3    | `lifetime`     |
//! | 4    | anything else  |
//!
//! Within a rank, entries are ordered alphabetically by label, then by tag.
//!
//! # Examples
//!
//! ```
//! use refbench_report::catalog::FeatureCatalog;
//!
//! let tags = [
//!     vec!["struct_has_lifetime_slot".to_owned()],
//!     vec!["mutable_borrow".to_owned(), "non_local_loop".to_owned()],
//! ];
//! let catalog = FeatureCatalog::build(tags.iter().map(Vec::as_slice), 4);
//!
//! let labels = catalog.iter().map(|e| e.label.as_str()).collect::<Vec<_>>();
//! assert_eq!(labels, ["Non local loop", "Mutable borrow", "Struct has lifetime slot"]);
//! assert_eq!(catalog.entries()[2].abbreviation, "SHLS");
//! ```

use std::collections::BTreeSet;

use crate::outcome::Glyph;

/// Abbreviation width used by the wide tables.
pub const DEFAULT_ABBREVIATION_WIDTH: usize = 4;

/// A feature column: the raw tag plus its display forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureEntry {
    pub tag: String,
    /// Human-readable label, e.g. `Non local control flow`
    pub label: String,
    /// Upper-cased initials of the label words, e.g. `NLCF`
    pub abbreviation: String,
}

impl FeatureEntry {
    #[must_use]
    pub fn new(tag: &str, abbreviation_width: usize) -> Self {
        let label = feature_label(tag);
        let abbreviation = abbreviate(&label, abbreviation_width);
        Self {
            tag: tag.to_owned(),
            label,
            abbreviation,
        }
    }

    fn rank(&self) -> u8 {
        let label = self.label.to_lowercase();
        if label.contains("non local") {
            1
        } else if label.contains("borrow") {
            2
        } else if label.contains("lifetime") {
            3
        } else {
            4
        }
    }
}

/// The deterministically ordered set of feature columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureCatalog {
    entries: Vec<FeatureEntry>,
}

impl FeatureCatalog {
    /// Builds the catalog from every record's tag list.
    pub fn build<'a, I>(tag_lists: I, abbreviation_width: usize) -> Self
    where
        I: IntoIterator<Item = &'a [String]>,
    {
        let tags = tag_lists
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect::<BTreeSet<_>>();

        let mut entries = tags
            .into_iter()
            .map(|tag| FeatureEntry::new(tag, abbreviation_width))
            .collect::<Vec<_>>();
        entries.sort_by(|a, b| {
            (a.rank(), &a.label, &a.tag).cmp(&(b.rank(), &b.label, &b.tag))
        });

        log::debug!(
            "feature catalog: {}",
            entries
                .iter()
                .map(|e| e.abbreviation.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[FeatureEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeatureEntry> + '_ {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `tags` carries the feature of `entry`.
    #[must_use]
    pub fn contains(entry: &FeatureEntry, tags: &[String]) -> bool {
        tags.iter().any(|t| *t == entry.tag)
    }

    /// Projects a record's tags onto the catalog.
    ///
    /// Yields the check glyph for present features and an empty string for
    /// absent ones, in catalog order.
    #[must_use]
    pub fn marks(&self, tags: &[String]) -> Vec<&'static str> {
        self.entries
            .iter()
            .map(|entry| {
                if Self::contains(entry, tags) {
                    Glyph::Check.as_str()
                } else {
                    ""
                }
            })
            .collect()
    }
}

/// `non_local_loop` -> `Non local loop`
fn feature_label(tag: &str) -> String {
    let mut chars = tag.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let rest = chars.as_str().split('_').collect::<Vec<_>>().join(" ");
    first.to_uppercase().chain(rest.chars()).collect()
}

/// `Non local loop` -> `NLL`, truncated to `width` characters.
fn abbreviate(label: &str, width: usize) -> String {
    label
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(width)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag_lists(lists: &[&[&str]]) -> Vec<Vec<String>> {
        lists
            .iter()
            .map(|l| l.iter().map(|t| (*t).to_owned()).collect())
            .collect()
    }

    fn build(lists: &[Vec<String>], width: usize) -> FeatureCatalog {
        FeatureCatalog::build(lists.iter().map(Vec::as_slice), width)
    }

    #[test]
    fn test_label_and_abbreviation() {
        let entry = FeatureEntry::new("non_local_control_flow", 4);
        assert_eq!(entry.label, "Non local control flow");
        assert_eq!(entry.abbreviation, "NLCF");

        let entry = FeatureEntry::new("struct_has_lifetime_slot", 3);
        assert_eq!(entry.label, "Struct has lifetime slot");
        assert_eq!(entry.abbreviation, "SHL");
    }

    #[test]
    fn test_label_edge_cases() {
        assert_eq!(feature_label(""), "");
        assert_eq!(feature_label("x"), "X");
        assert_eq!(feature_label("a__b"), "A  b");
        assert_eq!(abbreviate("A  b", 4), "AB");
    }

    #[test]
    fn test_catalog_size_is_distinct_tag_count() {
        let lists = tag_lists(&[&["a", "b"], &["b"], &[], &["c", "a"]]);
        let catalog = build(&lists, 4);
        assert_eq!(catalog.len(), 3);

        let mut more = lists.clone();
        more.push(tag_lists(&[&["c", "b"]]).remove(0));
        assert_eq!(build(&more, 4).len(), 3);
    }

    #[test]
    fn test_catalog_rank_order() {
        let lists = tag_lists(&[
            &["zeta_misc", "non_elidible_lifetimes", "immutable_borrow"],
            &["alpha_misc", "mutable_borrow", "non_local_return", "non_local_loop"],
        ]);
        let catalog = build(&lists, 4);
        let tags = catalog.iter().map(|e| e.tag.as_str()).collect::<Vec<_>>();
        assert_eq!(
            tags,
            [
                "non_local_loop",
                "non_local_return",
                "immutable_borrow",
                "mutable_borrow",
                "non_elidible_lifetimes",
                "alpha_misc",
                "zeta_misc",
            ]
        );
    }

    #[test]
    fn test_catalog_independent_of_input_order() {
        let forward = tag_lists(&[&["b_x", "a_y"], &["non_local_loop"]]);
        let backward = tag_lists(&[&["non_local_loop"], &["a_y", "b_x"]]);
        assert_eq!(build(&forward, 4), build(&backward, 4));
    }

    #[test]
    fn test_marks_presence_and_absence() {
        let lists = tag_lists(&[&["x"], &[], &["y"]]);
        let catalog = build(&lists, 4);
        assert_eq!(catalog.marks(&lists[0]), [r"\cmark", ""]);
        assert_eq!(catalog.marks(&lists[1]), ["", ""]);
        assert_eq!(catalog.marks(&lists[2]), ["", r"\cmark"]);

        for list in &lists {
            for entry in catalog.iter() {
                assert_eq!(
                    FeatureCatalog::contains(entry, list),
                    list.contains(&entry.tag)
                );
            }
        }
    }
}
