//! Grouped report-table synthesis for refactoring experiment results
//!
//! This crate turns in-memory experiment records (one per trial of a refactoring
//! tool run against a project example) into two artifacts:
//!
//! - a **flat export**: the source fields plus derived feature and outcome columns, as CSV
//! - a **LaTeX table**: two-level merged header, per-project merged rows,
//!   feature check marks and outcome glyphs
//!
//! # Overview
//!
//! The rendering pipeline runs leaves first:
//!
//! 1. **Feature Catalog** ([`catalog::FeatureCatalog`]): discover and order the feature columns
//! 2. **Outcome Normalizer** ([`outcome::normalize`]): map raw outcome values to glyphs
//! 3. **Project Groups** ([`group::ProjectGroups`]): row spans and size figures per project
//! 4. **Header** ([`header::HeaderSpec`]): merged multi-level column header
//! 5. **Body** ([`body::BodyRenderer`]): one markup row per record
//! 6. **Assembler** ([`report::ReportTable`]): preamble, header, body and footer
//!
//! All markup fragments are produced through the placeholder templates in
//! [`template`], which separate "fill every slot" from "fill the next slot".
//!
//! Which columns appear, in which order and under which merged headers is
//! declared by a [`layout::TableLayout`].
//!
//! # Examples
//!
//! ```
//! use refbench_report::{layout::TableLayout, record::Record, report::ReportTable};
//!
//! let record = |project: &str, tags: &[&str], success: &str| {
//!     Record::new(
//!         vec![
//!             ("PROJECT".to_owned(), project.to_owned()),
//!             ("SUCCESS".to_owned(), success.to_owned()),
//!         ],
//!         tags.iter().map(|t| (*t).to_owned()).collect(),
//!     )
//! };
//! let records = vec![
//!     record("gitoxide", &["non_local_loop"], "true"),
//!     record("gitoxide", &[], "false"),
//! ];
//!
//! let layout: TableLayout = serde_json::from_str(
//!     r#"{
//!         "name": "demo",
//!         "caption": "Results on {{{REPLACE_ME}}}",
//!         "columns": [
//!             { "kind": "row_number", "label": "\\#" },
//!             { "kind": "project", "label": "Project", "field": "PROJECT" },
//!             { "kind": "features", "label": "Code Features" },
//!             { "kind": "outcomes", "label": "Outcome", "leaves": [
//!                 { "label": "REM", "field": "SUCCESS", "source": "boolean" }
//!             ] }
//!         ]
//!     }"#,
//! )?;
//!
//! let table = ReportTable::build(&layout, &records)?;
//! let latex = table.render_markup();
//! assert!(latex.contains(r"\multirow{2}{*}{gitoxide}"));
//! assert!(latex.contains(r"\label{table:demo}"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod body;
pub mod catalog;
pub mod example;
pub mod group;
pub mod header;
pub mod layout;
pub mod outcome;
pub mod record;
pub mod report;
pub mod template;

/// Errors that abort a render pass.
///
/// No partial or degraded output is produced once any of these is raised.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ReportError {
    #[display("record {row}: unrecognized {field} outcome value '{value}'")]
    UnrecognizedOutcomeValue {
        row: usize,
        field: String,
        value: String,
    },
    #[display("record {row}: project '{project}' reappears after another project; group rows by project first")]
    FragmentedProjectGroup { row: usize, project: String },
    #[display("record {row}: malformed feature tag list: {source}")]
    MalformedFeatureTagList {
        row: usize,
        source: serde_json::Error,
    },
    #[display("record {row}: missing field '{field}'")]
    MissingField { row: usize, field: String },
    #[display("record {row}: field '{field}' is not a non-negative integer: '{value}'")]
    InvalidNumber {
        row: usize,
        field: String,
        value: String,
    },
    #[display("failed to write flat export: {source}")]
    FlatExport { source: csv::Error },
}
