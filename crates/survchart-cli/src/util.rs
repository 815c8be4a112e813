use std::{
    fs::File,
    io::{self, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use survchart_analysis::{dataset::GroupedDataset, strata::StrataSplit};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    pub fn save_json<T>(value: &T, output_path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = Output::from_output_path(output_path)?;
        output.write_json(value)
    }

    pub fn from_output_path(output_path: Option<PathBuf>) -> anyhow::Result<Self> {
        match output_path {
            Some(path) => Output::open(path),
            None => Ok(Output::stdout()),
        }
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_string(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    pub fn write_json<T>(&mut self, value: T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, &value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self).with_context(|| {
            format!(
                "Failed to write newline after JSON to {}",
                self.display_path()
            )
        })?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        Ok(())
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` overrides the default `info` level.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Read and group a life-table CSV file
///
/// # Arguments
///
/// * `path` - Path to the CSV file
/// * `split` - How strata dimensions map to chart titles and curve labels
pub fn read_dataset_file<P>(path: P, split: StrataSplit) -> anyhow::Result<GroupedDataset>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    tracing::info!(path = %path.display(), %split, "loading life table");
    let dataset = GroupedDataset::load(path, split)
        .with_context(|| format!("Failed to load life table: {}", path.display()))?;
    tracing::info!(
        charts = dataset.len(),
        rows = dataset.row_count(),
        "grouped life table"
    );
    Ok(dataset)
}

/// Path of a per-chart output file. The title is used as-is, without sanitizing.
#[must_use]
pub fn chart_path(dir: &Path, title: &str, suffix: &str) -> PathBuf {
    dir.join(format!("{title}{suffix}"))
}

pub fn create_output_dir(dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_chart_path_keeps_title() {
        let dir = Path::new("plots");
        assert_eq!(
            chart_path(dir, "Stage1 - Young Mothers (Before 19)", ".png"),
            Path::new("plots/Stage1 - Young Mothers (Before 19).png")
        );
        assert_eq!(
            chart_path(dir, "Stage 1.5 - Rural", "_km.csv"),
            Path::new("plots/Stage 1.5 - Rural_km.csv")
        );
    }

    #[test]
    fn test_save_json_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meta.json");
        Output::save_json(&vec![1, 2], Some(path.clone())).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[\n  1,\n  2\n]\n");
    }

    #[test]
    fn test_create_output_dir_nested() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        create_output_dir(&nested).unwrap();
        create_output_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn test_read_missing_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_dataset_file(dir.path().join("data.csv"), StrataSplit::Joined).unwrap_err();
        assert!(err.to_string().starts_with("Failed to load life table"));
    }
}
