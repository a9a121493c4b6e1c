//! Table assembly and flat export
//!
//! [`ReportTable::build`] performs every fallible step of a render pass up
//! front (catalog, project groups, per-row projection and outcome
//! normalization). Once built, rendering the markup and writing the flat
//! export are deterministic: identical records in identical order always give
//! byte-identical output.

use std::io;

use crate::{
    ReportError,
    body::{BodyRenderer, TableRow},
    catalog::FeatureCatalog,
    group::ProjectGroups,
    header::HeaderSpec,
    layout::TableLayout,
    record::Record,
    template::{self, Template},
};

const LANDSCAPE_BEGIN: &str = r"\begin{landscape}";
const LANDSCAPE_END: &str = r"\end{landscape}";

const PREAMBLE: Template = Template::new(
    r"\begin{table}[]
\resizebox{\columnwidth}{!}{%
\begin{tabular}{{{{REPLACE_ME}}}}
\hline",
);

const FOOTER: Template = Template::new(
    r" \hline
\end{tabular}%
}
\caption{{{{REPLACE_ME}}}}
\label{{{{REPLACE_ME}}}}
\end{table}",
);

/// A fully validated table, ready to render.
#[derive(Debug, Clone)]
pub struct ReportTable<'a> {
    layout: &'a TableLayout,
    catalog: FeatureCatalog,
    groups: ProjectGroups,
    header: HeaderSpec,
    rows: Vec<TableRow<'a>>,
}

impl<'a> ReportTable<'a> {
    /// Builds and validates a table over `records`.
    ///
    /// `records` must already be grouped by project for the merged project
    /// cells to come out whole; see [`crate::group::check_contiguous`].
    pub fn build(layout: &'a TableLayout, records: &'a [Record]) -> Result<Self, ReportError> {
        let catalog =
            FeatureCatalog::build(records.iter().map(Record::tags), layout.abbreviation_width);

        let groups = match layout.project_column() {
            Some((field, size_field)) => ProjectGroups::collect(records, field, size_field)?,
            None => ProjectGroups::default(),
        };

        let header = layout.header_spec(&catalog);

        let rows = records
            .iter()
            .enumerate()
            .map(|(row, record)| TableRow::project(row, record, layout, &catalog))
            .collect::<Result<Vec<_>, _>>()?;

        log::info!(
            "table '{}': {} rows, {} projects, {} features, {} columns",
            layout.name,
            rows.len(),
            groups.len(),
            catalog.len(),
            header.column_count()
        );

        Ok(Self {
            layout,
            catalog,
            groups,
            header,
            rows,
        })
    }

    #[must_use]
    pub fn catalog(&self) -> &FeatureCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn groups(&self) -> &ProjectGroups {
        &self.groups
    }

    #[must_use]
    pub fn header(&self) -> &HeaderSpec {
        &self.header
    }

    #[must_use]
    pub fn rows(&self) -> &[TableRow<'a>] {
        &self.rows
    }

    /// Cross-reference label, e.g. `table:effoverall`.
    ///
    /// The layout's label prefix followed by the alphanumeric characters of
    /// the table name.
    #[must_use]
    pub fn label(&self) -> String {
        let stem = self
            .layout
            .name
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect::<String>();
        format!("table:{}{stem}", self.layout.label_prefix)
    }

    fn caption(&self) -> String {
        Template::new(&self.layout.caption).fill_all(&template::escape(&self.layout.name))
    }

    /// Renders the complete LaTeX table, terminated by a newline.
    #[must_use]
    pub fn render_markup(&self) -> String {
        let mut out = String::new();
        if self.layout.landscape {
            out.push_str(LANDSCAPE_BEGIN);
            out.push('\n');
        }
        out.push_str(&PREAMBLE.fill_all(&self.header.alignment()));
        out.push('\n');
        out.push_str(&self.header.render());

        let body = BodyRenderer::new(&self.groups).render(&self.rows);
        if !body.is_empty() {
            out.push_str(&body);
            out.push('\n');
        }

        out.push_str(
            &FOOTER
                .fill_first(&self.caption())
                .fill_first(&self.label())
                .finish(),
        );
        out.push('\n');
        if self.layout.landscape {
            out.push_str(LANDSCAPE_END);
            out.push('\n');
        }
        out
    }

    /// Column names of the flat export.
    ///
    /// Source fields (in the first record's column order), then one column per
    /// feature label, then one `<tool> outcome` column per outcome leaf.
    #[must_use]
    pub fn flat_export_header(&self) -> Vec<String> {
        let source = self
            .rows
            .first()
            .map(|row| row.record.fields().iter().map(|(name, _)| name.clone()))
            .into_iter()
            .flatten();
        let features = self.catalog.iter().map(|e| e.label.clone());
        let outcomes = self
            .layout
            .outcome_leaves()
            .map(|leaf| format!("{} outcome", leaf.label));
        source.chain(features).chain(outcomes).collect()
    }

    /// Writes the flat export as CSV.
    pub fn write_flat_export<W>(&self, writer: W) -> Result<(), ReportError>
    where
        W: io::Write,
    {
        let header = self.flat_export_header();
        let source_columns = self
            .rows
            .first()
            .map_or(0, |row| row.record.fields().len());

        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(&header)
            .map_err(|source| ReportError::FlatExport { source })?;

        for row in &self.rows {
            let source = header[..source_columns]
                .iter()
                .map(|name| row.record.get(name).unwrap_or_default());
            // Every catalog feature is exported, even without a feature column.
            let marks = self.catalog.marks(row.record.tags());
            let glyphs = row.glyphs().map(|g| g.as_str());
            let values = source.chain(marks).chain(glyphs).collect::<Vec<_>>();
            csv.write_record(&values)
                .map_err(|source| ReportError::FlatExport { source })?;
        }
        csv.flush()
            .map_err(|source| ReportError::FlatExport { source: source.into() })?;
        Ok(())
    }
}
