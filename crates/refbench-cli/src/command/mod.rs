use clap::{Parser, Subcommand};

use self::{
    appendix::AppendixArg, by_project::ByProjectArg, layout::LayoutArg, render::RenderArg,
};

mod appendix;
mod by_project;
mod layout;
mod render;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Enable debug logging (overridden by `RUST_LOG`)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// What to render
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Render one grouped table and its flat CSV export
    Render(#[clap(flatten)] RenderArg),
    /// Render one table per project from the tagged trials
    ByProject(#[clap(flatten)] ByProjectArg),
    /// Render the appendix table listing every trial
    Appendix(#[clap(flatten)] AppendixArg),
    /// Print a built-in table layout as JSON
    Layout(#[clap(flatten)] LayoutArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match &args.mode {
        Mode::Render(arg) => render::run(arg)?,
        Mode::ByProject(arg) => by_project::run(arg)?,
        Mode::Appendix(arg) => appendix::run(arg)?,
        Mode::Layout(arg) => layout::run(arg)?,
    }
    Ok(())
}
