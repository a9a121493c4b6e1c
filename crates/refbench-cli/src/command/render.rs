use std::path::PathBuf;

use anyhow::Context;
use refbench_report::{layout::TableLayout, report::ReportTable};

use crate::{input::InputArg, util};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct RenderArg {
    #[clap(flatten)]
    input: InputArg,

    /// Table layout JSON file; the built-in overall layout when omitted
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Table name, used for the output file names, caption and label
    #[arg(long)]
    name: Option<String>,

    /// Directory receiving `<name>StatsTbl.tex` and `<name>StatsTbl.csv`
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Reorder rows so each project forms one block instead of rejecting
    /// interleaved projects
    #[arg(long)]
    group_projects: bool,
}

pub(crate) fn run(arg: &RenderArg) -> anyhow::Result<()> {
    let mut layout = match &arg.layout {
        Some(path) => util::read_layout_file(path)?,
        None => TableLayout::overall(),
    };
    if let Some(name) = &arg.name {
        layout.name.clone_from(name);
    }

    let mut records = arg.input.load()?;
    crate::input::arrange(&layout, &mut records, arg.group_projects)?;

    let table = ReportTable::build(&layout, &records)
        .with_context(|| format!("Failed to build table '{}'", layout.name))?;
    util::write_table(&arg.output_dir, &format!("{}StatsTbl", layout.name), &table)?;
    Ok(())
}
