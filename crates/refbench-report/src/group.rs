//! Project grouping and row spans
//!
//! Two notions of "group" are kept apart:
//!
//! - **Group by identity** ([`ProjectGroups`]): every record carrying a project
//!   value counts towards that project's span, wherever it appears. This is the
//!   declared `\multirow` span and the per-project size figure.
//! - **Merge by adjacency** ([`contiguous_runs`]): the body renderer opens a new
//!   merged cell whenever the project differs from the previous row. Callers
//!   must group rows by project beforehand ([`check_contiguous`],
//!   [`sort_by_project`]) or the merged cells fragment.

use std::collections::HashMap;

use crate::{ReportError, record::Record};

/// Per-project statistics for one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectGroup {
    pub project: String,
    /// Number of records with this project, anywhere in the input
    pub rows: usize,
    /// Largest size figure among those records, if a size field is configured
    pub max_size: Option<u64>,
}

/// All projects in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectGroups {
    groups: Vec<ProjectGroup>,
    index: HashMap<String, usize>,
}

impl ProjectGroups {
    /// Collects row counts (and optionally maximum sizes) per project.
    ///
    /// # Arguments
    ///
    /// * `records` - All records in render order
    /// * `project_field` - Field holding the project key
    /// * `size_field` - Field holding the project size, if any
    ///
    /// # Examples
    ///
    /// ```
    /// use refbench_report::{group::ProjectGroups, record::Record};
    ///
    /// let record = |p: &str, size: &str| {
    ///     Record::new(
    ///         vec![("P".into(), p.into()), ("SIZE".into(), size.into())],
    ///         vec![],
    ///     )
    /// };
    /// let records = [record("A", "900"), record("B", "10"), record("A", "12345")];
    /// let groups = ProjectGroups::collect(&records, "P", Some("SIZE"))?;
    ///
    /// assert_eq!(groups.span("A"), 2);
    /// assert_eq!(groups.span("B"), 1);
    /// assert_eq!(groups.size_label("A").as_deref(), Some("12,345"));
    /// # Ok::<(), refbench_report::ReportError>(())
    /// ```
    pub fn collect(
        records: &[Record],
        project_field: &str,
        size_field: Option<&str>,
    ) -> Result<Self, ReportError> {
        let mut this = Self::default();
        for (row, record) in records.iter().enumerate() {
            let project = record.field(row, project_field)?;
            let size = size_field
                .map(|field| record.number(row, field))
                .transpose()?;

            let i = match this.index.get(project) {
                Some(&i) => i,
                None => {
                    this.index.insert(project.to_owned(), this.groups.len());
                    this.groups.push(ProjectGroup {
                        project: project.to_owned(),
                        rows: 0,
                        max_size: None,
                    });
                    this.groups.len() - 1
                }
            };
            let group = &mut this.groups[i];
            group.rows += 1;
            group.max_size = group.max_size.max(size);
        }
        log::debug!(
            "collected {} project groups over {} records",
            this.groups.len(),
            records.len()
        );
        Ok(this)
    }

    #[must_use]
    pub fn get(&self, project: &str) -> Option<&ProjectGroup> {
        self.index.get(project).map(|&i| &self.groups[i])
    }

    /// Declared row span of a project; `0` for unknown projects.
    #[must_use]
    pub fn span(&self, project: &str) -> usize {
        self.get(project).map_or(0, |g| g.rows)
    }

    /// Formatted size figure of a project.
    #[must_use]
    pub fn size_label(&self, project: &str) -> Option<String> {
        self.get(project)?.max_size.map(format_thousands)
    }

    /// Sum of all spans, equal to the number of records collected.
    #[must_use]
    pub fn total_rows(&self) -> usize {
        self.groups.iter().map(|g| g.rows).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProjectGroup> + '_ {
        self.groups.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Formats a size figure.
///
/// Values up to and including 1000 are rendered as-is; larger values get a
/// `,` every three digits from the right.
///
/// # Examples
///
/// ```
/// use refbench_report::group::format_thousands;
///
/// assert_eq!(format_thousands(999), "999");
/// assert_eq!(format_thousands(1000), "1000");
/// assert_eq!(format_thousands(123_456), "123,456");
/// ```
#[must_use]
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    if value <= 1000 {
        return digits;
    }
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Number of maximal runs of equal consecutive project values.
///
/// This is the number of merged project cells the body renderer emits.
pub fn contiguous_runs(records: &[Record], project_field: &str) -> Result<usize, ReportError> {
    let mut runs = 0;
    let mut previous = None;
    for (row, record) in records.iter().enumerate() {
        let project = record.field(row, project_field)?;
        if previous != Some(project) {
            runs += 1;
            previous = Some(project);
        }
    }
    Ok(runs)
}

/// Verifies that every project occupies a single contiguous run of rows.
///
/// The renderer trusts adjacency and never calls this itself.
pub fn check_contiguous(records: &[Record], project_field: &str) -> Result<(), ReportError> {
    let mut closed = Vec::<&str>::new();
    let mut previous: Option<&str> = None;
    for (row, record) in records.iter().enumerate() {
        let project = record.field(row, project_field)?;
        if previous == Some(project) {
            continue;
        }
        if closed.contains(&project) {
            return Err(ReportError::FragmentedProjectGroup {
                row,
                project: project.to_owned(),
            });
        }
        closed.extend(previous);
        previous = Some(project);
    }
    Ok(())
}

/// Stably reorders records so each project forms one run, in first-seen order.
pub fn sort_by_project(records: &mut [Record], project_field: &str) -> Result<(), ReportError> {
    let mut first_seen = HashMap::<String, usize>::new();
    for (row, record) in records.iter().enumerate() {
        let project = record.field(row, project_field)?;
        let next = first_seen.len();
        first_seen.entry(project.to_owned()).or_insert(next);
    }
    records.sort_by_key(|record| {
        record
            .get(project_field)
            .and_then(|p| first_seen.get(p).copied())
            .unwrap_or(usize::MAX)
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(projects: &[&str]) -> Vec<Record> {
        projects
            .iter()
            .enumerate()
            .map(|(i, p)| {
                Record::new(
                    vec![
                        ("PROJECT".to_owned(), (*p).to_owned()),
                        ("SIZE".to_owned(), (i * 600).to_string()),
                    ],
                    vec![],
                )
            })
            .collect()
    }

    fn projects(records: &[Record]) -> Vec<&str> {
        records.iter().map(|r| r.get("PROJECT").unwrap()).collect()
    }

    #[test]
    fn test_spans_count_interleaved_rows() {
        let recs = records(&["A", "B", "A", "C", "A"]);
        let groups = ProjectGroups::collect(&recs, "PROJECT", None).unwrap();
        assert_eq!(groups.span("A"), 3);
        assert_eq!(groups.span("B"), 1);
        assert_eq!(groups.span("C"), 1);
        assert_eq!(groups.span("D"), 0);
        assert_eq!(groups.total_rows(), recs.len());
        let order = groups.iter().map(|g| g.project.as_str()).collect::<Vec<_>>();
        assert_eq!(order, ["A", "B", "C"]);
        assert_eq!(groups.size_label("A"), None);
    }

    #[test]
    fn test_max_size_per_project() {
        let recs = records(&["A", "A", "B"]);
        let groups = ProjectGroups::collect(&recs, "PROJECT", Some("SIZE")).unwrap();
        assert_eq!(groups.get("A").unwrap().max_size, Some(600));
        assert_eq!(groups.size_label("B").as_deref(), Some("1,200"));
    }

    #[test]
    fn test_format_thousands_boundaries() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1000");
        assert_eq!(format_thousands(1001), "1,001");
        assert_eq!(format_thousands(12345), "12,345");
        assert_eq!(format_thousands(123_456), "123,456");
        assert_eq!(format_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn test_contiguous_runs() {
        assert_eq!(contiguous_runs(&records(&[]), "PROJECT").unwrap(), 0);
        assert_eq!(contiguous_runs(&records(&["A", "A", "B"]), "PROJECT").unwrap(), 2);
        assert_eq!(contiguous_runs(&records(&["A", "B", "A"]), "PROJECT").unwrap(), 3);
    }

    #[test]
    fn test_check_contiguous() {
        assert!(check_contiguous(&records(&["A", "A", "B", "C", "C"]), "PROJECT").is_ok());
        let err = check_contiguous(&records(&["A", "B", "B", "A"]), "PROJECT").unwrap_err();
        match err {
            ReportError::FragmentedProjectGroup { row, project } => {
                assert_eq!(row, 3);
                assert_eq!(project, "A");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_sort_by_project_is_stable() {
        let mut recs = records(&["B", "A", "B", "C", "A"]);
        sort_by_project(&mut recs, "PROJECT").unwrap();
        assert_eq!(projects(&recs), ["B", "B", "A", "A", "C"]);
        let sizes = recs.iter().map(|r| r.get("SIZE").unwrap()).collect::<Vec<_>>();
        assert_eq!(sizes, ["0", "1200", "600", "2400", "1800"]);
        assert!(check_contiguous(&recs, "PROJECT").is_ok());
    }

    #[test]
    fn test_missing_project_field() {
        let recs = vec![Record::new(vec![], vec![])];
        assert!(matches!(
            ProjectGroups::collect(&recs, "PROJECT", None),
            Err(ReportError::MissingField { row: 0, .. })
        ));
    }
}
