use std::path::PathBuf;

use anyhow::Context;
use refbench_report::{layout::TableLayout, report::ReportTable};

use crate::{input::InputArg, util};

const APPENDIX_FILE_STEM: &str = "overallExperimentTbl";

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AppendixArg {
    #[clap(flatten)]
    input: InputArg,

    /// Directory receiving the appendix table
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Reorder rows so each project forms one block
    #[arg(long)]
    group_projects: bool,
}

pub(crate) fn run(arg: &AppendixArg) -> anyhow::Result<()> {
    let layout = TableLayout::appendix();
    let mut records = arg.input.load()?;
    crate::input::arrange(&layout, &mut records, arg.group_projects)?;

    let table = ReportTable::build(&layout, &records)
        .context("Failed to build the appendix table")?;
    util::write_markup(&arg.output_dir, APPENDIX_FILE_STEM, &table)?;
    Ok(())
}
