//! Per-project efficiency tables
//!
//! Only trials carrying at least one feature tag are listed. Projects are
//! visited in first-seen order and skipped when none of their trials is tagged.

use std::path::PathBuf;

use anyhow::Context;
use refbench_report::{layout::TableLayout, record::Record, report::ReportTable};

use crate::{
    input::{InputArg, PROJECT_FIELD},
    util,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ByProjectArg {
    #[clap(flatten)]
    input: InputArg,

    /// Directory receiving one `<project>StatsTbl.tex`/`.csv` pair per project
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

pub(crate) fn run(arg: &ByProjectArg) -> anyhow::Result<()> {
    let records = arg.input.load()?;
    let partitions = partition_tagged(&records)?;
    if partitions.is_empty() {
        log::warn!("no tagged trials found, nothing to render");
    }

    for (project, subset) in &partitions {
        let layout = TableLayout::per_project(project);
        let table = ReportTable::build(&layout, subset)
            .with_context(|| format!("Failed to build table for project '{project}'"))?;
        util::write_table(&arg.output_dir, &format!("{}StatsTbl", layout.name), &table)?;
    }
    Ok(())
}

/// Splits tagged records by project, in first-seen project order.
fn partition_tagged(records: &[Record]) -> anyhow::Result<Vec<(String, Vec<Record>)>> {
    let mut partitions = Vec::<(String, Vec<Record>)>::new();
    for (row, record) in records.iter().enumerate() {
        let project = record.field(row, PROJECT_FIELD)?;
        let index = match partitions.iter().position(|(p, _)| p == project) {
            Some(index) => index,
            None => {
                partitions.push((project.to_owned(), vec![]));
                partitions.len() - 1
            }
        };
        if !record.tags().is_empty() {
            partitions[index].1.push(record.clone());
        }
    }

    partitions.retain(|(project, subset)| {
        if subset.is_empty() {
            log::info!("skipping project '{project}': no tagged trials");
        }
        !subset.is_empty()
    });
    Ok(partitions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(project: &str, tags: &[&str]) -> Record {
        Record::new(
            vec![(PROJECT_FIELD.to_owned(), project.to_owned())],
            tags.iter().map(|t| (*t).to_owned()).collect(),
        )
    }

    #[test]
    fn test_partition_keeps_first_seen_order() {
        let records = [
            record("zed", &["borrow"]),
            record("alpha", &["lifetime"]),
            record("zed", &[]),
            record("zed", &["non_local_loop"]),
        ];
        let partitions = partition_tagged(&records).unwrap();
        let summary = partitions
            .iter()
            .map(|(p, subset)| (p.as_str(), subset.len()))
            .collect::<Vec<_>>();
        assert_eq!(summary, [("zed", 2), ("alpha", 1)]);
    }

    #[test]
    fn test_partition_skips_untagged_projects() {
        let records = [record("a", &[]), record("b", &["borrow"]), record("a", &[])];
        let partitions = partition_tagged(&records).unwrap();
        assert_eq!(partitions.len(), 1);
        assert_eq!(partitions[0].0, "b");
    }

    #[test]
    fn test_partition_requires_project_field() {
        let records = [Record::new(vec![], vec!["x".to_owned()])];
        assert!(partition_tagged(&records).is_err());
    }
}
