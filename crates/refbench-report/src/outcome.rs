//! Outcome normalization
//!
//! Trial outcomes arrive in two forms:
//!
//! - **Legacy** three-state values (`success`, `failure`, `refused_to_extract`)
//!   produced by the older comparison tools
//! - **Boolean** values (`true`, `false`) produced by the newer outcome model,
//!   where failure and refusal are collapsed into one non-success state
//!
//! Both are mapped to fixed [`Glyph`]s. A boolean never yields [`Glyph::Cross`].

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::ReportError;

/// Symbolic rendering of a categorical result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Glyph {
    Check,
    Cross,
    Stop,
}

impl Glyph {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Glyph::Check => r"\cmark",
            Glyph::Cross => r"\xmark",
            Glyph::Stop => r"\stopmark",
        }
    }
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_str(), f)
    }
}

/// Which mapping table an outcome column uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeSource {
    Legacy,
    Boolean,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyOutcome {
    Success,
    Failure,
    RefusedToExtract,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOutcome;

impl FromStr for LegacyOutcome {
    type Err = UnknownOutcome;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "success" => Ok(LegacyOutcome::Success),
            "failure" => Ok(LegacyOutcome::Failure),
            "refused_to_extract" => Ok(LegacyOutcome::RefusedToExtract),
            _ => Err(UnknownOutcome),
        }
    }
}

impl LegacyOutcome {
    #[must_use]
    pub fn glyph(self) -> Glyph {
        match self {
            LegacyOutcome::Success => Glyph::Check,
            LegacyOutcome::Failure => Glyph::Cross,
            LegacyOutcome::RefusedToExtract => Glyph::Stop,
        }
    }
}

fn parse_bool(s: &str) -> Result<bool, UnknownOutcome> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if s.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(UnknownOutcome)
    }
}

fn bool_glyph(success: bool) -> Glyph {
    if success { Glyph::Check } else { Glyph::Stop }
}

/// Maps one raw outcome value to its glyph.
///
/// # Arguments
///
/// * `source` - Mapping table to use
/// * `row` - Record index, for error reporting
/// * `field` - Outcome field name, for error reporting
/// * `raw` - The raw value
///
/// # Examples
///
/// ```
/// use refbench_report::outcome::{Glyph, OutcomeSource, normalize};
///
/// assert_eq!(normalize(OutcomeSource::Legacy, 0, "RA", "failure")?, Glyph::Cross);
/// assert_eq!(normalize(OutcomeSource::Boolean, 0, "SUCCESS", "false")?, Glyph::Stop);
/// assert!(normalize(OutcomeSource::Boolean, 0, "SUCCESS", "failure").is_err());
/// # Ok::<(), refbench_report::ReportError>(())
/// ```
pub fn normalize(
    source: OutcomeSource,
    row: usize,
    field: &str,
    raw: &str,
) -> Result<Glyph, ReportError> {
    let glyph = match source {
        OutcomeSource::Legacy => raw.parse::<LegacyOutcome>().map(LegacyOutcome::glyph),
        OutcomeSource::Boolean => parse_bool(raw).map(bool_glyph),
    };
    glyph.map_err(|UnknownOutcome| ReportError::UnrecognizedOutcomeValue {
        row,
        field: field.to_owned(),
        value: raw.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_mapping_is_exhaustive() {
        let cases = [
            ("success", Glyph::Check),
            ("failure", Glyph::Cross),
            ("refused_to_extract", Glyph::Stop),
        ];
        for (raw, glyph) in cases {
            assert_eq!(normalize(OutcomeSource::Legacy, 0, "f", raw).unwrap(), glyph);
        }
    }

    #[test]
    fn test_boolean_mapping_has_no_cross() {
        assert_eq!(
            normalize(OutcomeSource::Boolean, 0, "f", "true").unwrap(),
            Glyph::Check
        );
        assert_eq!(
            normalize(OutcomeSource::Boolean, 0, "f", "False").unwrap(),
            Glyph::Stop
        );
    }

    #[test]
    fn test_unrecognized_values_rejected() {
        for (source, raw) in [
            (OutcomeSource::Legacy, "true"),
            (OutcomeSource::Legacy, "Success"),
            (OutcomeSource::Legacy, ""),
            (OutcomeSource::Boolean, "success"),
            (OutcomeSource::Boolean, "1"),
            (OutcomeSource::Boolean, ""),
        ] {
            let err = normalize(source, 7, "RUST_ANALYZER", raw).unwrap_err();
            match err {
                ReportError::UnrecognizedOutcomeValue { row, field, value } => {
                    assert_eq!(row, 7);
                    assert_eq!(field, "RUST_ANALYZER");
                    assert_eq!(value, raw);
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_glyph_markup() {
        assert_eq!(Glyph::Check.to_string(), r"\cmark");
        assert_eq!(Glyph::Cross.to_string(), r"\xmark");
        assert_eq!(Glyph::Stop.to_string(), r"\stopmark");
    }
}
