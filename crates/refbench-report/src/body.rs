//! Table body rendering
//!
//! Each record is first projected into a [`TableRow`]: the formatted values of
//! every visible column group, feature marks and outcome glyphs. Projection
//! performs all fallible work, so rendering the body itself cannot fail.
//!
//! [`BodyRenderer`] then emits one markup line per row:
//!
//! - the project column opens a `\multirow` cell whenever the project differs
//!   from the previous row, and is left empty on continuation rows
//! - a `\hline` is appended to the last row of each project group that is
//!   followed by another group
//! - values starting with `\` are inserted verbatim, empty values leave an
//!   empty cell, anything else is escaped and wrapped in `\textit{..}`

use crate::{
    ReportError,
    catalog::FeatureCatalog,
    group::ProjectGroups,
    layout::{ColumnGroup, FieldFormat, TableLayout},
    outcome::{self, Glyph},
    record::Record,
    template::{self, Template},
};

const PROJECT_CELL: Template = Template::new(r"\multirow{{{{REPLACE_ME}}}}{*}{{{{REPLACE_ME}}}}");
const ROW_END: &str = r" \\";
const GROUP_RULE: &str = r" \hline";

/// Cells contributed by one column group for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowCells<'a> {
    RowNumber,
    Project(&'a str),
    Values(Vec<String>),
    Marks(Vec<&'static str>),
    Glyphs(Vec<Glyph>),
}

/// A record projected onto a layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow<'a> {
    pub record: &'a Record,
    pub cells: Vec<RowCells<'a>>,
}

impl<'a> TableRow<'a> {
    /// Projects `record` onto the visible columns of `layout`.
    ///
    /// # Arguments
    ///
    /// * `row` - Record index, for error reporting
    /// * `record` - The source record
    /// * `layout` - Table layout
    /// * `catalog` - Feature catalog built from all records
    pub fn project(
        row: usize,
        record: &'a Record,
        layout: &TableLayout,
        catalog: &FeatureCatalog,
    ) -> Result<Self, ReportError> {
        let formatted = |field: &str, format: FieldFormat| -> Result<String, ReportError> {
            let raw = record.field(row, field)?;
            format.apply(raw).ok_or_else(|| ReportError::InvalidNumber {
                row,
                field: field.to_owned(),
                value: raw.to_owned(),
            })
        };

        let cells = layout
            .visible_columns(catalog)
            .map(|column| -> Result<RowCells<'a>, ReportError> {
                Ok(match column {
                    ColumnGroup::RowNumber { .. } => RowCells::RowNumber,
                    ColumnGroup::Project { field, .. } => {
                        RowCells::Project(record.field(row, field)?)
                    }
                    ColumnGroup::Field { field, format, .. } => {
                        RowCells::Values(vec![formatted(field, *format)?])
                    }
                    ColumnGroup::FieldGroup { leaves, .. } => RowCells::Values(
                        leaves
                            .iter()
                            .map(|leaf| formatted(&leaf.field, leaf.format))
                            .collect::<Result<_, _>>()?,
                    ),
                    ColumnGroup::Features { .. } => RowCells::Marks(catalog.marks(record.tags())),
                    ColumnGroup::Outcomes { leaves, .. } => RowCells::Glyphs(
                        leaves
                            .iter()
                            .map(|leaf| -> Result<Glyph, ReportError> {
                                let raw = record.field(row, &leaf.field)?;
                                outcome::normalize(leaf.source, row, &leaf.field, raw)
                            })
                            .collect::<Result<_, _>>()?,
                    ),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { record, cells })
    }

    /// Project key of the row, if the layout has a project column.
    #[must_use]
    pub fn project_key(&self) -> Option<&'a str> {
        self.cells.iter().find_map(|c| match c {
            RowCells::Project(p) => Some(*p),
            _ => None,
        })
    }

    /// Feature marks in catalog order.
    #[must_use]
    pub fn marks(&self) -> &[&'static str] {
        self.cells
            .iter()
            .find_map(|c| match c {
                RowCells::Marks(m) => Some(m.as_slice()),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Outcome glyphs in layout order.
    pub fn glyphs(&self) -> impl Iterator<Item = Glyph> + '_ {
        self.cells
            .iter()
            .filter_map(|c| match c {
                RowCells::Glyphs(g) => Some(g.iter().copied()),
                _ => None,
            })
            .flatten()
    }
}

/// Renders projected rows into body markup.
#[derive(Debug, Clone, Copy)]
pub struct BodyRenderer<'a> {
    groups: &'a ProjectGroups,
}

impl<'a> BodyRenderer<'a> {
    #[must_use]
    pub fn new(groups: &'a ProjectGroups) -> Self {
        Self { groups }
    }

    fn project_cell(&self, project: &str) -> String {
        let span = self.groups.span(project).to_string();
        let mut display = template::escape(project).into_owned();
        if let Some(size) = self.groups.size_label(project) {
            display.push_str(&format!(" ({size})"));
        }
        PROJECT_CELL
            .fill_first(&span)
            .fill_first(&display)
            .finish()
    }

    /// Renders every row, one line each, without a trailing newline.
    ///
    /// Rows must already be grouped by project; merges follow adjacency only.
    #[must_use]
    pub fn render(&self, rows: &[TableRow<'_>]) -> String {
        let mut lines = Vec::<String>::with_capacity(rows.len());
        let mut previous = None;

        for (i, row) in rows.iter().enumerate() {
            let project = row.project_key();
            let starts_group = project.is_some() && project != previous;
            if starts_group {
                if let Some(last) = lines.last_mut() {
                    last.push_str(GROUP_RULE);
                }
            }

            let mut line = Vec::<String>::new();
            for cells in &row.cells {
                match cells {
                    RowCells::RowNumber => line.push((i + 1).to_string()),
                    RowCells::Project(p) if starts_group => line.push(self.project_cell(p)),
                    RowCells::Project(_) => line.push(String::new()),
                    RowCells::Values(values) => {
                        line.extend(values.iter().map(|v| template::cell(v).into_owned()));
                    }
                    RowCells::Marks(marks) => line.extend(marks.iter().map(|&m| m.to_owned())),
                    RowCells::Glyphs(glyphs) => {
                        line.extend(glyphs.iter().map(|g| g.as_str().to_owned()));
                    }
                }
            }
            lines.push(template::join_cells(line) + ROW_END);
            previous = project;
        }

        log::debug!("rendered {} body rows", lines.len());
        lines.join("\n")
    }
}
