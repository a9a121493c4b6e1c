//! Multi-level merged column header
//!
//! A [`HeaderSpec`] is an ordered list of top-level header cells, each either a
//! vertical merge (one column spanning every header row) or a horizontal merge
//! (a super-header spanning several leaf columns). When any horizontal merge is
//! present the header has two rows:
//!
//! ```text
//! \multirow{2}{*}{..} & \multicolumn{2}{c}{Size} & ... \\
//! \cline{2-3}
//!  & \textit{SRC} & \textit{SNP} & ... \\ \hline
//! ```
//!
//! Otherwise it is a single row of labels.

use crate::{
    layout::Align,
    template::{self, HEADER_CELL, ROW_CELL, Template},
};

const MULTIROW: Template = Template::new(r"\multirow{{{{REPLACE_ME}}}}{*}{{{{REPLACE_ME}}}}");
/// Super-headers are always centred; a cell's `align` only sets the `tabular`
/// alignment of the leaf columns beneath it.
const MULTICOLUMN: Template = Template::new(r"\multicolumn{{{{REPLACE_ME}}}}{c}{{{{REPLACE_ME}}}}");
const CLINE: Template = Template::new(r"\cline{{{{REPLACE_ME}}}-{{{REPLACE_ME}}}}");

/// Merge descriptor of a top-level header cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Merge {
    /// Vertical merge over `n` header rows (a single column)
    Rows(usize),
    /// Horizontal merge over `n` leaf columns
    Cols(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub label: String,
    pub merge: Merge,
    /// Alignment of the covered columns; the label itself is centred
    pub align: Align,
    /// Leaf labels under a horizontal merge; empty for vertical merges
    pub leaves: Vec<String>,
}

impl HeaderCell {
    /// A column whose label spans every header row.
    #[must_use]
    pub fn single(label: &str, align: Align) -> Self {
        Self {
            label: label.to_owned(),
            merge: Merge::Rows(1),
            align,
            leaves: vec![],
        }
    }

    /// A super-header over one leaf column per item of `leaves`.
    #[must_use]
    pub fn cluster<I>(label: &str, align: Align, leaves: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let leaves = leaves.into_iter().collect::<Vec<_>>();
        Self {
            label: label.to_owned(),
            merge: Merge::Cols(leaves.len()),
            align,
            leaves,
        }
    }

    /// Number of table columns this cell covers.
    #[must_use]
    pub fn width(&self) -> usize {
        match self.merge {
            Merge::Rows(_) => 1,
            Merge::Cols(n) => n,
        }
    }
}

/// An ordered, resolved header description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderSpec {
    cells: Vec<HeaderCell>,
}

impl HeaderSpec {
    /// Builds a spec; vertical merges are stretched over the header depth.
    #[must_use]
    pub fn new(mut cells: Vec<HeaderCell>) -> Self {
        let depth = if cells.iter().any(|c| matches!(c.merge, Merge::Cols(_))) {
            2
        } else {
            1
        };
        for cell in &mut cells {
            if let Merge::Rows(_) = cell.merge {
                cell.merge = Merge::Rows(depth);
            }
        }
        Self { cells }
    }

    #[must_use]
    pub fn cells(&self) -> &[HeaderCell] {
        &self.cells
    }

    /// Number of header rows.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.cells
            .iter()
            .map(|c| match c.merge {
                Merge::Rows(n) => n,
                Merge::Cols(_) => 2,
            })
            .max()
            .unwrap_or(1)
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.cells.iter().map(HeaderCell::width).sum()
    }

    /// The `tabular` alignment token, one character per column.
    #[must_use]
    pub fn alignment(&self) -> String {
        self.cells
            .iter()
            .flat_map(|c| std::iter::repeat_n(c.align.as_char(), c.width()))
            .collect()
    }

    /// Renders the header rows, ending with the rule under the header.
    #[must_use]
    pub fn render(&self) -> String {
        if self.depth() == 1 {
            let labels = self
                .cells
                .iter()
                .map(|c| HEADER_CELL.fill_all(&template::escape(&c.label)))
                .collect::<Vec<_>>();
            return format!("{} \\\\ \\hline\n", template::join_cells(labels));
        }

        let depth = self.depth().to_string();
        let mut top = Vec::with_capacity(self.cells.len());
        let mut leaves = Vec::with_capacity(self.column_count());
        let mut clines = Vec::new();
        let mut column = 1;
        for cell in &self.cells {
            let label = HEADER_CELL.fill_all(&template::escape(&cell.label));
            match cell.merge {
                Merge::Rows(_) => {
                    top.push(MULTIROW.fill_first(&depth).fill_first(&label).finish());
                    leaves.push(String::new());
                }
                Merge::Cols(n) => {
                    top.push(
                        MULTICOLUMN
                            .fill_first(&n.to_string())
                            .fill_first(&label)
                            .finish(),
                    );
                    leaves.extend(
                        cell.leaves
                            .iter()
                            .map(|leaf| ROW_CELL.fill_all(&template::escape(leaf))),
                    );
                    clines.push(
                        CLINE
                            .fill_first(&column.to_string())
                            .fill_first(&(column + n - 1).to_string())
                            .finish(),
                    );
                }
            }
            column += cell.width();
        }

        let mut out = String::new();
        out.push_str(&template::join_cells(top));
        out.push_str(" \\\\\n");
        out.push_str(&clines.join(" "));
        out.push('\n');
        out.push_str(&template::join_cells(leaves));
        out.push_str(" \\\\ \\hline\n");
        out
    }
}
