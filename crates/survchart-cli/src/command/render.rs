//! Chart rendering command
//!
//! Draws one PNG per analysis title into the output directory, optionally with
//! the chart metadata as a JSON file next to it.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use super::InputArg;
use crate::{
    plot,
    util::{self, Output},
};

#[derive(Debug, Clone, Args)]
pub(crate) struct RenderArg {
    #[command(flatten)]
    pub input: InputArg,

    /// Directory the charts are written to (created if absent)
    #[arg(long, default_value = "plots")]
    pub output_dir: PathBuf,

    /// Image width in pixels
    #[arg(long, default_value_t = 1920)]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = 1440)]
    pub height: u32,

    /// Also write each chart's metadata as `<title>.json`
    #[arg(long)]
    pub metadata: bool,
}

impl Default for RenderArg {
    fn default() -> Self {
        Self {
            input: InputArg::default(),
            output_dir: PathBuf::from("plots"),
            width: 1920,
            height: 1440,
            metadata: false,
        }
    }
}

pub(crate) fn run(arg: &RenderArg) -> anyhow::Result<()> {
    let dataset = util::read_dataset_file(&arg.input.input, arg.input.split)?;
    util::create_output_dir(&arg.output_dir)?;

    for chart in dataset.charts() {
        let chart = chart?;
        if chart.series.is_empty() {
            tracing::warn!(title = %chart.title, "no sub-group to draw, writing an empty chart");
        }

        let path = util::chart_path(&arg.output_dir, &chart.title, ".png");
        plot::draw_chart(&chart, &path, (arg.width, arg.height)).with_context(|| {
            format!(
                "Failed to render chart '{}' to {}",
                chart.title,
                path.display()
            )
        })?;
        tracing::info!(path = %path.display(), curves = chart.series.len(), "saved chart");

        if arg.metadata {
            let meta_path = util::chart_path(&arg.output_dir, &chart.title, ".json");
            Output::save_json(&chart, Some(meta_path))?;
        }
    }

    tracing::info!(
        charts = dataset.len(),
        dir = %arg.output_dir.display(),
        "rendering finished"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use survchart_analysis::strata::StrataSplit;

    use super::*;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

    #[test]
    fn test_render_writes_chart_per_title() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("data.csv");
        fs::write(
            &input,
            "\
id,strata,metric,time,events,population,at_risk,std_error
1,eth_maori=1,Stage1,0,0,10,10,0
2,eth_maori=1,Stage1,6,5,10,10,0.1
3,eth_maori=0,Stage1,0,1,10,10,0.01
4,rural_ind=Unknown,Stage2,0,0,10,10,0
",
        )
        .unwrap();

        let output_dir = dir.path().join("plots");
        let arg = RenderArg {
            input: InputArg {
                input,
                split: StrataSplit::Joined,
            },
            output_dir: output_dir.clone(),
            width: 320,
            height: 240,
            metadata: true,
        };
        run(&arg).unwrap();

        let mut names = fs::read_dir(&output_dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect::<Vec<_>>();
        names.sort();
        assert_eq!(
            names,
            [
                "Stage1 - Maori.json",
                "Stage1 - Maori.png",
                "Stage2 - Rural.json",
                "Stage2 - Rural.png",
            ]
        );

        for name in ["Stage1 - Maori.png", "Stage2 - Rural.png"] {
            let bytes = fs::read(output_dir.join(name)).unwrap();
            assert!(bytes.starts_with(&PNG_SIGNATURE), "{name} is not a PNG");
        }

        let read_json = |name: &str| -> serde_json::Value {
            let text = fs::read_to_string(output_dir.join(name)).unwrap();
            serde_json::from_str(&text).unwrap()
        };

        let meta = read_json("Stage1 - Maori.json");
        assert_eq!(meta["title"], "Stage1 - Maori");
        assert_eq!(meta["series"][0]["label"], "True");
        assert_eq!(meta["series"][1]["label"], "False");
        assert_eq!(meta["series"][0]["crosshair"]["time"], 6);
        assert_eq!(meta["x_axis"]["max"], 6.0);

        let empty = read_json("Stage2 - Rural.json");
        assert_eq!(empty["series"].as_array().unwrap().len(), 0);
        assert_eq!(empty["skipped"][0], "Unknown");
    }
}
