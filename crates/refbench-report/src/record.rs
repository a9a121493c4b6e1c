//! Experiment records
//!
//! A [`Record`] is one trial as handed over by the input collaborator: the
//! source fields in input column order, plus its feature tags already
//! deserialized. Records are never mutated by the renderer; derived columns are
//! computed alongside them.

use crate::ReportError;

/// One experiment trial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
    tags: Vec<String>,
}

impl Record {
    #[must_use]
    pub fn new(fields: Vec<(String, String)>, tags: Vec<String>) -> Self {
        Self { fields, tags }
    }

    /// Builds a record whose tags are read from the serialized `tag_field`.
    ///
    /// # Arguments
    ///
    /// * `row` - Record index, for error reporting
    /// * `fields` - Source fields in column order
    /// * `tag_field` - Name of the field holding the JSON tag list
    pub fn from_fields(
        row: usize,
        fields: Vec<(String, String)>,
        tag_field: &str,
    ) -> Result<Self, ReportError> {
        let raw = fields
            .iter()
            .find(|(name, _)| name == tag_field)
            .map(|(_, value)| value.as_str())
            .ok_or_else(|| ReportError::MissingField {
                row,
                field: tag_field.to_owned(),
            })?;
        let tags = parse_tag_list(row, raw)?;
        Ok(Self::new(fields, tags))
    }

    /// Source fields in input column order.
    #[must_use]
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Looks up a field that the layout requires.
    pub fn field(&self, row: usize, name: &str) -> Result<&str, ReportError> {
        self.get(name).ok_or_else(|| ReportError::MissingField {
            row,
            field: name.to_owned(),
        })
    }

    /// Looks up a field holding a non-negative integer.
    pub fn number(&self, row: usize, name: &str) -> Result<u64, ReportError> {
        let value = self.field(row, name)?;
        value
            .trim()
            .parse()
            .map_err(|_| ReportError::InvalidNumber {
                row,
                field: name.to_owned(),
                value: value.to_owned(),
            })
    }
}

/// Deserializes a feature tag list such as `["non_local_loop","mutable_borrow"]`.
///
/// # Examples
///
/// ```
/// use refbench_report::record::parse_tag_list;
///
/// assert_eq!(parse_tag_list(0, r#"["mutable_borrow"]"#)?, ["mutable_borrow"]);
/// assert!(parse_tag_list(0, "mutable_borrow").is_err());
/// # Ok::<(), refbench_report::ReportError>(())
/// ```
pub fn parse_tag_list(row: usize, raw: &str) -> Result<Vec<String>, ReportError> {
    serde_json::from_str(raw).map_err(|source| ReportError::MalformedFeatureTagList { row, source })
}
