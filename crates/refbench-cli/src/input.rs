//! Loading experiment results
//!
//! Result files are CSV with a header row. Every column is kept as a string
//! field; the `FEATURES` column additionally holds a JSON list of feature tags.
//! Runs are numbered `result_<N>.csv`, and the newest (highest `N`) is used when
//! no file is named explicitly.

use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
};

use anyhow::{Context, bail};
use refbench_report::{group, layout::TableLayout, record::Record};

pub(crate) const PROJECT_FIELD: &str = "PROJECT";
pub(crate) const TAG_FIELD: &str = "FEATURES";

const RESULT_PREFIX: &str = "result_";
const RESULT_SUFFIX: &str = ".csv";

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct InputArg {
    /// Result CSV file; the newest `result_<N>.csv` in `--results-dir` when omitted
    csv: Option<PathBuf>,

    /// Directory searched for `result_<N>.csv` files
    #[arg(long, default_value = "results")]
    results_dir: PathBuf,
}

impl InputArg {
    /// Path of the result file this invocation reads.
    pub(crate) fn resolve(&self) -> anyhow::Result<PathBuf> {
        match &self.csv {
            Some(path) => Ok(path.clone()),
            None => latest_result(&self.results_dir),
        }
    }

    /// Reads every record of the selected result file.
    pub(crate) fn load(&self) -> anyhow::Result<Vec<Record>> {
        let path = self.resolve()?;
        let records = read_records_file(&path)?;
        log::info!("loaded {} records from {}", records.len(), path.display());
        Ok(records)
    }
}

/// Reads result records from CSV.
pub(crate) fn read_records<R>(reader: R) -> anyhow::Result<Vec<Record>>
where
    R: io::Read,
{
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader
        .headers()
        .context("Failed to read CSV header row")?
        .clone();

    let mut records = vec![];
    for (row, result) in reader.records().enumerate() {
        let raw = result.with_context(|| format!("Failed to read CSV record {row}"))?;
        let fields = headers
            .iter()
            .zip(raw.iter())
            .map(|(name, value)| (name.to_owned(), value.to_owned()))
            .collect();
        records.push(Record::from_fields(row, fields, TAG_FIELD)?);
    }
    Ok(records)
}

pub(crate) fn read_records_file<P>(path: P) -> anyhow::Result<Vec<Record>>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open result file: {}", path.display()))?;
    read_records(io::BufReader::new(file))
        .with_context(|| format!("Failed to parse result file: {}", path.display()))
}

/// Run number of a `result_<N>.csv` file name.
fn result_index(file_name: &str) -> Option<u64> {
    file_name
        .strip_prefix(RESULT_PREFIX)?
        .strip_suffix(RESULT_SUFFIX)?
        .parse()
        .ok()
}

/// Picks the path with the highest run number.
fn pick_latest<I>(paths: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = PathBuf>,
{
    paths
        .into_iter()
        .filter_map(|path| {
            let index = result_index(path.file_name()?.to_str()?)?;
            Some((index, path))
        })
        .max_by_key(|(index, _)| *index)
        .map(|(_, path)| path)
}

pub(crate) fn latest_result(dir: &Path) -> anyhow::Result<PathBuf> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read results directory: {}", dir.display()))?;
    let paths = entries
        .map(|entry| entry.map(|e| e.path()))
        .collect::<io::Result<Vec<_>>>()
        .with_context(|| format!("Failed to list results directory: {}", dir.display()))?;

    let Some(latest) = pick_latest(paths) else {
        bail!("No {RESULT_PREFIX}<N>{RESULT_SUFFIX} file in {}", dir.display());
    };
    log::debug!("latest result file: {}", latest.display());
    Ok(latest)
}

/// Brings records into the row order the layout's project merges require.
///
/// With `group_projects`, rows are stably grouped by project first; either way
/// an interleaved project is rejected before anything is rendered.
pub(crate) fn arrange(
    layout: &TableLayout,
    records: &mut [Record],
    group_projects: bool,
) -> anyhow::Result<()> {
    let Some((field, _)) = layout.project_column() else {
        return Ok(());
    };
    if group_projects {
        group::sort_by_project(records, field)?;
    }
    group::check_contiguous(records, field)
        .context("Rows of one project must be adjacent (try --group-projects)")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
SUCCESS,PROJECT,BRANCH,FEATURES,NOTES
true,gitoxide,ext-com1,\"[\"\"non_local_loop\"\", \"\"borrow\"\"]\",
false,gitoxide,ext2,[],\"multi
line\"
";

    #[test]
    fn test_read_records() {
        let records = read_records(SAMPLE.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("BRANCH"), Some("ext-com1"));
        assert_eq!(records[0].tags(), ["non_local_loop", "borrow"]);
        assert!(records[1].tags().is_empty());
        assert_eq!(records[1].get("NOTES"), Some("multi\nline"));
        let names = records[0]
            .fields()
            .iter()
            .map(|(name, _)| name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, ["SUCCESS", "PROJECT", "BRANCH", "FEATURES", "NOTES"]);
    }

    #[test]
    fn test_read_records_rejects_bad_tag_list() {
        let csv = "PROJECT,FEATURES\ngitoxide,not-json\n";
        let err = read_records(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("record 0"));
    }

    #[test]
    fn test_read_records_requires_tag_column() {
        let csv = "PROJECT\ngitoxide\n";
        assert!(read_records(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_result_index() {
        assert_eq!(result_index("result_12.csv"), Some(12));
        assert_eq!(result_index("result_.csv"), None);
        assert_eq!(result_index("result_3.json"), None);
        assert_eq!(result_index("summary_3.csv"), None);
    }

    #[test]
    fn test_pick_latest_is_numeric() {
        let paths = ["results/result_9.csv", "results/result_10.csv", "results/notes.txt"]
            .map(PathBuf::from);
        assert_eq!(
            pick_latest(paths),
            Some(PathBuf::from("results/result_10.csv"))
        );
        assert_eq!(pick_latest(Vec::new()), None);
    }

    #[test]
    fn test_arrange_groups_or_rejects() {
        let layout = TableLayout::overall();
        let csv = "PROJECT,FEATURES\na,[]\nb,[]\na,[]\n";

        let mut records = read_records(csv.as_bytes()).unwrap();
        assert!(arrange(&layout, &mut records, false).is_err());

        arrange(&layout, &mut records, true).unwrap();
        let projects = records
            .iter()
            .filter_map(|r| r.get(PROJECT_FIELD))
            .collect::<Vec<_>>();
        assert_eq!(projects, ["a", "a", "b"]);
    }

    #[test]
    fn test_arrange_without_project_column() {
        let layout = TableLayout::per_project("a");
        let csv = "PROJECT,FEATURES\na,[]\nb,[]\na,[]\n";
        let mut records = read_records(csv.as_bytes()).unwrap();
        arrange(&layout, &mut records, false).unwrap();
    }
}
