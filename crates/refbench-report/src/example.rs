//! Display names for experiment branches
//!
//! Experiment branches are named `<kind><n>-expr` (the base) and
//! `<kind><n>-expr-active` (the branch the tool ran on). Tables show the kind
//! in words followed by the trial number.

/// Known experiment kinds, longest prefix first so `ext-com` wins over `ext`.
const EXAMPLE_KINDS: [(&str, &str); 3] = [
    ("inline-ext", "Inline and extract"),
    ("ext-com", "Developer extraction"),
    ("ext", "Arbitrary extraction"),
];

/// Turns a branch name into its example label.
///
/// Branches of an unknown kind are returned unchanged.
///
/// # Examples
///
/// ```
/// use refbench_report::example::example_label;
///
/// assert_eq!(example_label("ext-com2-expr-active"), "Developer extraction 2");
/// assert_eq!(example_label("inline-ext7-expr"), "Inline and extract 7");
/// assert_eq!(example_label("main"), "main");
/// ```
#[must_use]
pub fn example_label(branch: &str) -> String {
    let base = branch
        .strip_suffix("-expr-active")
        .or_else(|| branch.strip_suffix("-expr"))
        .unwrap_or(branch);

    EXAMPLE_KINDS
        .iter()
        .find_map(|(prefix, name)| {
            let trial = base.strip_prefix(prefix)?;
            trial
                .chars()
                .all(|c| c.is_ascii_digit())
                .then(|| format!("{name} {trial}").trim_end().to_owned())
        })
        .unwrap_or_else(|| branch.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_kinds() {
        assert_eq!(example_label("ext1-expr-active"), "Arbitrary extraction 1");
        assert_eq!(example_label("ext-com12-expr"), "Developer extraction 12");
        assert_eq!(example_label("inline-ext3-expr-active"), "Inline and extract 3");
    }

    #[test]
    fn test_missing_trial_number() {
        assert_eq!(example_label("ext-expr"), "Arbitrary extraction");
    }

    #[test]
    fn test_unknown_kind_is_unchanged() {
        assert_eq!(example_label("extra3-expr"), "extra3-expr");
        assert_eq!(example_label("feature/x"), "feature/x");
        assert_eq!(example_label(""), "");
    }
}
