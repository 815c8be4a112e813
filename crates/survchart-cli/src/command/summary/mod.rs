//! Survival summary command
//!
//! Prints one table per analysis title with the Kaplan-Meier figures behind
//! each curve of the chart.

mod table;

use std::{io::Write as _, path::PathBuf};

use anyhow::Context;
use clap::Args;

use super::InputArg;
use crate::util::{self, Output};

#[derive(Debug, Clone, Args)]
pub(crate) struct SummaryArg {
    #[command(flatten)]
    pub input: InputArg,

    /// Write the report to this file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &SummaryArg) -> anyhow::Result<()> {
    let dataset = util::read_dataset_file(&arg.input.input, arg.input.split)?;
    let mut output = Output::from_output_path(arg.output.clone())?;

    let target = output.display_path();
    let write_context = || format!("Failed to write summary to {target}");
    let header = format!(
        "Survival Summary ({} charts, {} rows)",
        dataset.len(),
        dataset.row_count()
    );

    writeln!(output, "{header}").with_context(write_context)?;
    writeln!(output, "{}\n", "=".repeat(header.len())).with_context(write_context)?;
    table::write_legend(&mut output).with_context(write_context)?;

    for chart in dataset.charts() {
        let chart = chart?;
        writeln!(output).with_context(write_context)?;
        table::write_chart_table(&mut output, &chart).with_context(write_context)?;
    }

    output.flush().with_context(write_context)?;
    Ok(())
}
