use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use survchart_analysis::strata::StrataSplit;

use self::{export_curves::ExportCurvesArg, render::RenderArg, summary::SummaryArg};
use crate::util;

mod export_curves;
mod render;
mod summary;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Render one PNG survival chart per analysis title
    Render(#[clap(flatten)] RenderArg),
    /// Print a survival summary table per analysis title
    Summary(#[clap(flatten)] SummaryArg),
    /// Export the computed curves as CSV, one file per analysis title
    ExportCurves(#[clap(flatten)] ExportCurvesArg),
}

/// Input file and grouping options shared by all commands
#[derive(Debug, Clone, Args)]
pub(crate) struct InputArg {
    /// Path to the life-table CSV file
    #[arg(long, default_value = "data.csv")]
    pub input: PathBuf,

    /// How strata dimensions split into chart title and curve label (joined, leading)
    #[arg(long, default_value_t = StrataSplit::Joined)]
    pub split: StrataSplit,
}

impl Default for InputArg {
    fn default() -> Self {
        Self {
            input: PathBuf::from("data.csv"),
            split: StrataSplit::Joined,
        }
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    util::init_logging();
    match args
        .mode
        .unwrap_or_else(|| Mode::Render(RenderArg::default()))
    {
        Mode::Render(arg) => render::run(&arg)?,
        Mode::Summary(arg) => summary::run(&arg)?,
        Mode::ExportCurves(arg) => export_curves::run(&arg)?,
    }
    Ok(())
}
