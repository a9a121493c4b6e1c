//! Single-placeholder markup templates
//!
//! Every markup fragment in a report is a template containing zero or more
//! occurrences of one reserved token, [`PLACEHOLDER`]. Two substitution
//! primitives exist and are kept on separate types so they cannot be mixed up:
//!
//! - [`Template::fill_all`] substitutes **every** slot with the same value
//!   (e.g. the alignment token stamped into a preamble)
//! - [`Template::fill_first`] substitutes only the **leftmost** slot and returns a
//!   [`PartialFill`] whose own [`fill_first`](PartialFill::fill_first) fills the
//!   next one (e.g. a span count, then a display value)
//!
//! # Examples
//!
//! ```
//! use refbench_report::template::Template;
//!
//! let multirow = Template::new(r"\multirow{{{{REPLACE_ME}}}}{*}{{{{REPLACE_ME}}}}");
//! assert_eq!(multirow.slots(), 2);
//!
//! let cell = multirow.fill_first("3").fill_first("gitoxide").finish();
//! assert_eq!(cell, r"\multirow{3}{*}{gitoxide}");
//!
//! let both = multirow.fill_all("x");
//! assert_eq!(both, r"\multirow{x}{*}{x}");
//! ```

use std::borrow::Cow;

/// The reserved substitution token.
pub const PLACEHOLDER: &str = "{{{REPLACE_ME}}}";

/// Cell template used for plain textual body and leaf values.
pub const ROW_CELL: Template = Template::new(r"\textit{{{{REPLACE_ME}}}}");

/// Cell template used for header labels.
pub const HEADER_CELL: Template = Template::new(r"\textit{\textbf{{{{REPLACE_ME}}}}}");

/// A markup fragment with placeholder slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template<'t> {
    text: &'t str,
}

impl<'t> Template<'t> {
    #[must_use]
    pub const fn new(text: &'t str) -> Self {
        Self { text }
    }

    /// Number of placeholder slots in the template.
    #[must_use]
    pub fn slots(&self) -> usize {
        self.text.matches(PLACEHOLDER).count()
    }

    /// Substitutes every slot with `value`.
    #[must_use]
    pub fn fill_all(&self, value: &str) -> String {
        self.text.replace(PLACEHOLDER, value)
    }

    /// Substitutes the leftmost slot with `value`, leaving the rest for later calls.
    #[must_use]
    pub fn fill_first(&self, value: &str) -> PartialFill {
        PartialFill {
            text: self.text.to_owned(),
            cursor: 0,
        }
        .fill_first(value)
    }
}

/// A template whose leading slots have been filled one at a time.
///
/// Slots are searched only after the most recently inserted value, so a value
/// that happens to contain [`PLACEHOLDER`] is never substituted again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialFill {
    text: String,
    cursor: usize,
}

impl PartialFill {
    /// Substitutes the next unfilled slot with `value`.
    ///
    /// Does nothing once every slot has been filled.
    #[must_use]
    pub fn fill_first(mut self, value: &str) -> Self {
        if let Some(offset) = self.text[self.cursor..].find(PLACEHOLDER) {
            let start = self.cursor + offset;
            self.text
                .replace_range(start..start + PLACEHOLDER.len(), value);
            self.cursor = start + value.len();
        }
        self
    }

    /// Number of slots still unfilled.
    #[must_use]
    pub fn remaining_slots(&self) -> usize {
        self.text[self.cursor..].matches(PLACEHOLDER).count()
    }

    #[must_use]
    pub fn finish(self) -> String {
        self.text
    }
}

/// Escapes the reserved underscore character for LaTeX.
#[must_use]
pub fn escape(value: &str) -> Cow<'_, str> {
    if value.contains('_') {
        Cow::Owned(value.replace('_', r"\_"))
    } else {
        Cow::Borrowed(value)
    }
}

/// Renders a textual cell value.
///
/// Empty values stay empty, values that already start with markup (`\`) are
/// inserted verbatim, anything else is escaped and wrapped in [`ROW_CELL`].
#[must_use]
pub fn cell(value: &str) -> Cow<'_, str> {
    let value = value.trim_matches('\n');
    if value.is_empty() || value.starts_with('\\') {
        Cow::Borrowed(value)
    } else {
        Cow::Owned(ROW_CELL.fill_all(&escape(value)))
    }
}

/// Joins the cells of one table line.
///
/// Empty cells leave a bare `&` so visually-empty cells carry no content.
#[must_use]
pub fn join_cells<I, S>(cells: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut line = String::new();
    for (i, cell) in cells.into_iter().enumerate() {
        let cell = cell.as_ref();
        if i == 0 {
            line.push_str(cell);
        } else if cell.is_empty() {
            line.push_str(" &");
        } else {
            line.push_str(" & ");
            line.push_str(cell);
        }
    }
    line
}
