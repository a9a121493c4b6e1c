use std::path::PathBuf;

use refbench_report::layout::TableLayout;

use crate::util::Output;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
enum Preset {
    #[default]
    Overall,
    PerProject,
    Appendix,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct LayoutArg {
    /// Built-in layout to print
    #[arg(long, value_enum, default_value_t)]
    preset: Preset,

    /// Project name substituted into the per-project layout
    #[arg(long, default_value = "project")]
    project: String,

    /// Output file path; stdout when omitted
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &LayoutArg) -> anyhow::Result<()> {
    let layout = preset_layout(arg.preset, &arg.project);
    Output::save_json(&layout, arg.output.clone())
}

fn preset_layout(preset: Preset, project: &str) -> TableLayout {
    match preset {
        Preset::Overall => TableLayout::overall(),
        Preset::PerProject => TableLayout::per_project(project),
        Preset::Appendix => TableLayout::appendix(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_round_trip_through_json() {
        for preset in [Preset::Overall, Preset::PerProject, Preset::Appendix] {
            let layout = preset_layout(preset, "gitoxide");
            let json = serde_json::to_string_pretty(&layout).unwrap();
            let parsed: TableLayout = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, layout);
        }
    }

    #[test]
    fn test_per_project_preset_uses_project_name() {
        let layout = preset_layout(Preset::PerProject, "gitoxide");
        assert_eq!(layout.name, "gitoxide");
    }
}
