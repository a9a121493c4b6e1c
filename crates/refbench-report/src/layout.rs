//! Declarative table layouts
//!
//! A [`TableLayout`] lists the table's column groups in display order. It is
//! plain configuration: it can be serialized to JSON, edited, and loaded back.
//!
//! ```json
//! {
//!   "name": "overall",
//!   "caption": "\\tool results on {{{REPLACE_ME}}} experiments",
//!   "landscape": true,
//!   "columns": [
//!     { "kind": "row_number", "label": "\\#" },
//!     { "kind": "project", "label": "Project", "field": "PROJECT", "size_field": "PROJECT_SIZE" },
//!     { "kind": "field", "label": "Type", "field": "BRANCH", "format": "example_kind" },
//!     { "kind": "features", "label": "Code Features" }
//!   ]
//! }
//! ```
//!
//! The layout is resolved against a [`FeatureCatalog`] into a [`HeaderSpec`]
//! with [`TableLayout::header_spec`].

use serde::{Deserialize, Serialize};

use crate::{
    catalog::{DEFAULT_ABBREVIATION_WIDTH, FeatureCatalog},
    example,
    group::format_thousands,
    header::{HeaderCell, HeaderSpec},
    outcome::OutcomeSource,
};

/// Column alignment, as used in a `tabular` column spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Align {
    #[default]
    #[serde(rename = "l")]
    Left,
    #[serde(rename = "c")]
    Center,
    #[serde(rename = "r")]
    Right,
}

impl Align {
    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Align::Left => 'l',
            Align::Center => 'c',
            Align::Right => 'r',
        }
    }

    fn center() -> Self {
        Align::Center
    }

    fn right() -> Self {
        Align::Right
    }
}

/// How a plain field value is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldFormat {
    #[default]
    Raw,
    /// Branch name rendered as an example label
    ExampleKind,
    /// Integer rendered with thousands separators above 1000
    Thousands,
    /// Decimal rounded to [`ROUNDED_DIGITS`] fractional digits
    Rounded,
}

/// Fractional digits kept by [`FieldFormat::Rounded`].
pub const ROUNDED_DIGITS: i32 = 3;

impl FieldFormat {
    /// Formats a raw value.
    ///
    /// `None` when a `thousands` value is not an integer or a `rounded` value
    /// is not a finite number.
    #[must_use]
    pub fn apply(self, raw: &str) -> Option<String> {
        match self {
            FieldFormat::Raw => Some(raw.to_owned()),
            FieldFormat::ExampleKind => Some(example::example_label(raw)),
            FieldFormat::Thousands => raw.trim().parse().ok().map(format_thousands),
            FieldFormat::Rounded => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(round_decimal),
        }
    }
}

fn round_decimal(value: f64) -> String {
    let scale = 10_f64.powi(ROUNDED_DIGITS);
    // Adding zero turns -0.0 into 0.0.
    ((value * scale).round() / scale + 0.0).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldLeaf {
    pub label: String,
    pub field: String,
    #[serde(default)]
    pub format: FieldFormat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeLeaf {
    pub label: String,
    pub field: String,
    pub source: OutcomeSource,
}

/// One top-level header entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnGroup {
    /// 1-based row index
    RowNumber {
        label: String,
        #[serde(default)]
        align: Align,
    },
    /// Project key, merged over each run of equal projects
    Project {
        label: String,
        field: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        size_field: Option<String>,
        #[serde(default)]
        align: Align,
    },
    /// A single source field
    Field {
        label: String,
        field: String,
        #[serde(default)]
        format: FieldFormat,
        #[serde(default)]
        align: Align,
    },
    /// Several source fields under one merged header
    FieldGroup {
        label: String,
        #[serde(default = "Align::right")]
        align: Align,
        leaves: Vec<FieldLeaf>,
    },
    /// One column per feature catalog entry
    Features {
        label: String,
        #[serde(default = "Align::center")]
        align: Align,
    },
    /// One glyph column per comparison tool, in the listed order
    Outcomes {
        label: String,
        #[serde(default = "Align::center")]
        align: Align,
        leaves: Vec<OutcomeLeaf>,
    },
}

impl ColumnGroup {
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            ColumnGroup::RowNumber { label, .. }
            | ColumnGroup::Project { label, .. }
            | ColumnGroup::Field { label, .. }
            | ColumnGroup::FieldGroup { label, .. }
            | ColumnGroup::Features { label, .. }
            | ColumnGroup::Outcomes { label, .. } => label,
        }
    }

    fn outcome_leaves(&self) -> &[OutcomeLeaf] {
        match self {
            ColumnGroup::Outcomes { leaves, .. } => leaves,
            _ => &[],
        }
    }

    /// Whether the group contributes no column at all.
    fn is_empty(&self, catalog: &FeatureCatalog) -> bool {
        match self {
            ColumnGroup::RowNumber { .. }
            | ColumnGroup::Project { .. }
            | ColumnGroup::Field { .. } => false,
            ColumnGroup::FieldGroup { leaves, .. } => leaves.is_empty(),
            ColumnGroup::Features { .. } => catalog.is_empty(),
            ColumnGroup::Outcomes { leaves, .. } => leaves.is_empty(),
        }
    }
}

const EFFICIENCY_LABEL_PREFIX: &str = "eff";

fn default_abbreviation_width() -> usize {
    DEFAULT_ABBREVIATION_WIDTH
}

/// A complete table description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableLayout {
    /// Logical table name, used for the caption, label and file names
    pub name: String,
    /// Caption template; every placeholder is replaced with the table name
    pub caption: String,
    /// Inserted between `table:` and the name in the cross-reference label
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label_prefix: String,
    /// Wrap the table in a `landscape` environment
    #[serde(default)]
    pub landscape: bool,
    /// Maximum length of feature abbreviations (3 or 4)
    #[serde(default = "default_abbreviation_width")]
    pub abbreviation_width: usize,
    pub columns: Vec<ColumnGroup>,
}

impl TableLayout {
    /// The wide table covering every trial of every project.
    #[must_use]
    pub fn overall() -> Self {
        Self {
            name: "overall".to_owned(),
            caption: r"\tool results on {{{REPLACE_ME}}} experiments".to_owned(),
            label_prefix: EFFICIENCY_LABEL_PREFIX.to_owned(),
            landscape: true,
            abbreviation_width: DEFAULT_ABBREVIATION_WIDTH,
            columns: vec![
                ColumnGroup::RowNumber {
                    label: r"\#".to_owned(),
                    align: Align::Right,
                },
                ColumnGroup::Project {
                    label: "Project".to_owned(),
                    field: "PROJECT".to_owned(),
                    size_field: Some("PROJECT_SIZE".to_owned()),
                    align: Align::Left,
                },
                ColumnGroup::Field {
                    label: "Type".to_owned(),
                    field: "BRANCH".to_owned(),
                    format: FieldFormat::ExampleKind,
                    align: Align::Left,
                },
                ColumnGroup::FieldGroup {
                    label: "Size".to_owned(),
                    align: Align::Right,
                    leaves: vec![
                        field_leaf("SRC", "SRC_SIZE"),
                        field_leaf("SNP", "CALLEE_SIZE"),
                    ],
                },
                ColumnGroup::Features {
                    label: "Code Features".to_owned(),
                    align: Align::Center,
                },
                ColumnGroup::Outcomes {
                    label: "Outcome".to_owned(),
                    align: Align::Center,
                    leaves: vec![
                        outcome_leaf("REM", "SUCCESS", OutcomeSource::Boolean),
                        outcome_leaf("IJR", "INTELLIJ_RUST_OLD", OutcomeSource::Legacy),
                        outcome_leaf("RA", "RUST_ANALYZER", OutcomeSource::Legacy),
                    ],
                },
            ],
        }
    }

    /// The narrower table for a single project.
    #[must_use]
    pub fn per_project(project: &str) -> Self {
        Self {
            name: project.to_owned(),
            caption: r"\tool efficiency on {{{REPLACE_ME}}} project".to_owned(),
            label_prefix: EFFICIENCY_LABEL_PREFIX.to_owned(),
            landscape: false,
            abbreviation_width: 3,
            columns: vec![
                ColumnGroup::Field {
                    label: format!("{project} examples"),
                    field: "BRANCH".to_owned(),
                    format: FieldFormat::ExampleKind,
                    align: Align::Left,
                },
                ColumnGroup::FieldGroup {
                    label: "Size".to_owned(),
                    align: Align::Right,
                    leaves: vec![FieldLeaf {
                        label: "MOD".to_owned(),
                        field: "PROJECT_SIZE".to_owned(),
                        format: FieldFormat::Thousands,
                    }],
                },
                ColumnGroup::Field {
                    label: "Repair count".to_owned(),
                    field: "CARGO_CYCLES".to_owned(),
                    format: FieldFormat::Raw,
                    align: Align::Right,
                },
                ColumnGroup::Features {
                    label: "Code Features".to_owned(),
                    align: Align::Center,
                },
                ColumnGroup::Field {
                    label: "Extraction duration(s)".to_owned(),
                    field: "TOTAL_DURATION_S".to_owned(),
                    format: FieldFormat::Rounded,
                    align: Align::Right,
                },
            ],
        }
    }

    /// The appendix listing every trial with its raw measurements.
    #[must_use]
    pub fn appendix() -> Self {
        let field = |label: &str, field: &str, align: Align| ColumnGroup::Field {
            label: label.to_owned(),
            field: field.to_owned(),
            format: FieldFormat::Raw,
            align,
        };
        Self {
            name: "overallExprResult".to_owned(),
            caption: r"\tool overall experiment result".to_owned(),
            label_prefix: String::new(),
            landscape: true,
            abbreviation_width: DEFAULT_ABBREVIATION_WIDTH,
            columns: vec![
                ColumnGroup::Project {
                    label: "Project".to_owned(),
                    field: "PROJECT".to_owned(),
                    size_field: None,
                    align: Align::Left,
                },
                field("Branch", "BRANCH", Align::Left),
                field("NLCF(ms)", "FIX_NLCF_DURATION_MS", Align::Right),
                field("Borrow(ms)", "FIX_BORROW_DURATION_MS", Align::Right),
                field("Lifetime(ms)", "FIX_LIFETIME_CARGO_MS", Align::Right),
                field("Repair count", "CARGO_CYCLES", Align::Right),
                field("Total(ms)", "TOTAL_DURATION_MS", Align::Right),
                field("Commit", "COMMIT_URL", Align::Left),
                ColumnGroup::Outcomes {
                    label: "Success".to_owned(),
                    align: Align::Center,
                    leaves: vec![outcome_leaf("REM", "SUCCESS", OutcomeSource::Boolean)],
                },
                field("Failed at", "FAILED_AT", Align::Left),
                field("Features", "FEATURES", Align::Left),
            ],
        }
    }

    /// Column groups that produce at least one column.
    pub fn visible_columns<'a>(
        &'a self,
        catalog: &'a FeatureCatalog,
    ) -> impl Iterator<Item = &'a ColumnGroup> + 'a {
        self.columns.iter().filter(|c| !c.is_empty(catalog))
    }

    /// The project column, if the layout has one.
    #[must_use]
    pub fn project_column(&self) -> Option<(&str, Option<&str>)> {
        self.columns.iter().find_map(|c| match c {
            ColumnGroup::Project {
                field, size_field, ..
            } => Some((field.as_str(), size_field.as_deref())),
            _ => None,
        })
    }

    /// Outcome leaves of every outcome group, in display order.
    pub fn outcome_leaves(&self) -> impl Iterator<Item = &OutcomeLeaf> + '_ {
        self.columns.iter().flat_map(ColumnGroup::outcome_leaves)
    }

    /// Resolves the layout into a merged header description.
    ///
    /// Single columns become vertical merges, clusters become horizontal merges
    /// whose leaves are the field labels, the feature abbreviations in catalog
    /// order, or the outcome tool labels.
    #[must_use]
    pub fn header_spec(&self, catalog: &FeatureCatalog) -> HeaderSpec {
        let cells = self
            .visible_columns(catalog)
            .map(|column| match column {
                ColumnGroup::RowNumber { label, align }
                | ColumnGroup::Project { label, align, .. }
                | ColumnGroup::Field { label, align, .. } => HeaderCell::single(label, *align),
                ColumnGroup::FieldGroup {
                    label,
                    align,
                    leaves,
                } => HeaderCell::cluster(label, *align, leaves.iter().map(|l| l.label.clone())),
                ColumnGroup::Features { label, align } => HeaderCell::cluster(
                    label,
                    *align,
                    catalog.iter().map(|e| e.abbreviation.clone()),
                ),
                ColumnGroup::Outcomes {
                    label,
                    align,
                    leaves,
                } => HeaderCell::cluster(label, *align, leaves.iter().map(|l| l.label.clone())),
            })
            .collect();
        HeaderSpec::new(cells)
    }
}

fn field_leaf(label: &str, field: &str) -> FieldLeaf {
    FieldLeaf {
        label: label.to_owned(),
        field: field.to_owned(),
        format: FieldFormat::Raw,
    }
}

fn outcome_leaf(label: &str, field: &str, source: OutcomeSource) -> OutcomeLeaf {
    OutcomeLeaf {
        label: label.to_owned(),
        field: field.to_owned(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::Merge;

    fn catalog(tags: &[&str]) -> FeatureCatalog {
        let list = tags.iter().map(|t| (*t).to_owned()).collect::<Vec<_>>();
        FeatureCatalog::build([list.as_slice()], 4)
    }

    #[test]
    fn test_overall_header_spec() {
        let layout = TableLayout::overall();
        let spec = layout.header_spec(&catalog(&["mutable_borrow", "non_local_loop"]));

        let summary = spec
            .cells()
            .iter()
            .map(|c| (c.label.as_str(), c.merge))
            .collect::<Vec<_>>();
        assert_eq!(
            summary,
            [
                (r"\#", Merge::Rows(2)),
                ("Project", Merge::Rows(2)),
                ("Type", Merge::Rows(2)),
                ("Size", Merge::Cols(2)),
                ("Code Features", Merge::Cols(2)),
                ("Outcome", Merge::Cols(3)),
            ]
        );
        assert_eq!(spec.cells()[4].leaves, ["NLL", "MB"]);
        assert_eq!(spec.cells()[5].leaves, ["REM", "IJR", "RA"]);
        assert_eq!(spec.alignment(), "rllrrccccc");
    }

    #[test]
    fn test_empty_catalog_drops_feature_group() {
        let layout = TableLayout::overall();
        let spec = layout.header_spec(&FeatureCatalog::default());
        assert!(spec.cells().iter().all(|c| c.label != "Code Features"));
        assert_eq!(spec.column_count(), 8);
    }

    #[test]
    fn test_layout_json_round_trip_keeps_order() {
        let layout = TableLayout::overall();
        let json = serde_json::to_string_pretty(&layout).unwrap();
        let loaded: TableLayout = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, layout);
    }

    #[test]
    fn test_layout_defaults_from_json() {
        let layout: TableLayout = serde_json::from_str(
            r#"{
                "name": "t",
                "caption": "c",
                "columns": [
                    { "kind": "field", "label": "A", "field": "A" },
                    { "kind": "features", "label": "F" },
                    { "kind": "field_group", "label": "S", "leaves": [
                        { "label": "X", "field": "X" }
                    ] }
                ]
            }"#,
        )
        .unwrap();
        assert!(!layout.landscape);
        assert_eq!(layout.abbreviation_width, DEFAULT_ABBREVIATION_WIDTH);
        assert_eq!(
            layout.columns[0],
            ColumnGroup::Field {
                label: "A".to_owned(),
                field: "A".to_owned(),
                format: FieldFormat::Raw,
                align: Align::Left,
            }
        );
        assert!(matches!(
            layout.columns[1],
            ColumnGroup::Features {
                align: Align::Center,
                ..
            }
        ));
        assert!(matches!(
            layout.columns[2],
            ColumnGroup::FieldGroup {
                align: Align::Right,
                ..
            }
        ));
    }

    #[test]
    fn test_field_format() {
        assert_eq!(FieldFormat::Raw.apply("a_b").as_deref(), Some("a_b"));
        assert_eq!(
            FieldFormat::ExampleKind.apply("ext2-expr-active").as_deref(),
            Some("Arbitrary extraction 2")
        );
        assert_eq!(FieldFormat::Thousands.apply("4567").as_deref(), Some("4,567"));
        assert_eq!(FieldFormat::Thousands.apply("n/a"), None);
    }

    #[test]
    fn test_rounded_format() {
        assert_eq!(FieldFormat::Rounded.apply("12.3456789").as_deref(), Some("12.346"));
        assert_eq!(FieldFormat::Rounded.apply(" 2.5\n").as_deref(), Some("2.5"));
        assert_eq!(FieldFormat::Rounded.apply("7").as_deref(), Some("7"));
        assert_eq!(FieldFormat::Rounded.apply("-0.0001").as_deref(), Some("0"));
        assert_eq!(FieldFormat::Rounded.apply("slow"), None);
        assert_eq!(FieldFormat::Rounded.apply("NaN"), None);
        assert_eq!(FieldFormat::Rounded.apply(""), None);
    }

    #[test]
    fn test_per_project_columns() {
        let layout = TableLayout::per_project("gix");
        let spec = layout.header_spec(&catalog(&["borrow"]));
        let labels = spec
            .cells()
            .iter()
            .map(|c| c.label.as_str())
            .collect::<Vec<_>>();
        assert_eq!(
            labels,
            ["gix examples", "Size", "Repair count", "Code Features", "Extraction duration(s)"]
        );
        assert_eq!(spec.cells()[1].leaves, ["MOD"]);
        assert!(matches!(
            layout.columns.last(),
            Some(ColumnGroup::Field {
                format: FieldFormat::Rounded,
                ..
            })
        ));
        assert_eq!(layout.label_prefix, "eff");
    }

    #[test]
    fn test_appendix_ends_with_feature_tags() {
        let layout = TableLayout::appendix();
        let spec = layout.header_spec(&FeatureCatalog::default());
        let labels = spec
            .cells()
            .iter()
            .map(|c| c.label.as_str())
            .collect::<Vec<_>>();
        assert_eq!(labels.last(), Some(&"Features"));
        assert!(matches!(
            layout.columns.last(),
            Some(ColumnGroup::Field { field, format: FieldFormat::Raw, .. }) if field == "FEATURES"
        ));
        assert!(layout.label_prefix.is_empty());
    }

    #[test]
    fn test_layout_accessors() {
        let layout = TableLayout::overall();
        assert_eq!(layout.project_column(), Some(("PROJECT", Some("PROJECT_SIZE"))));
        let fields = layout
            .outcome_leaves()
            .map(|l| l.field.as_str())
            .collect::<Vec<_>>();
        assert_eq!(fields, ["SUCCESS", "INTELLIJ_RUST_OLD", "RUST_ANALYZER"]);
        assert_eq!(TableLayout::per_project("gitoxide").project_column(), None);
    }
}
