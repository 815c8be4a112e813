//! Grouped life-table dataset
//!
//! Rows are grouped twice: by chart title, then by curve label within the chart.
//! Rows of one (title, label) pair stay in file order, and labels keep the order
//! in which they first appear.

use std::{
    collections::BTreeMap,
    io,
    path::{Path, PathBuf},
};

use crate::{
    chart::{ChartError, ChartSpec},
    record::{FIELD_COUNT, LifeTableRow},
    strata::{GroupKey, Strata, StrataError, StrataSplit},
};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum LoadError {
    #[display("failed to open {}", path.display())]
    Open { path: PathBuf, source: csv::Error },
    #[display("failed to read CSV record")]
    Csv { source: csv::Error },
    #[display("line {line}: expected {} fields, found {found}", FIELD_COUNT)]
    FieldCount { line: u64, found: usize },
    #[display("line {line}: invalid strata {strata:?}")]
    Strata {
        line: u64,
        strata: String,
        source: StrataError,
    },
}

/// Rows sharing one curve label within a chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubGroup {
    pub label: String,
    pub rows: Vec<LifeTableRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedDataset {
    pub groups: BTreeMap<String, Vec<SubGroup>>,
}

impl GroupedDataset {
    /// Loads and groups a CSV file. The first line is a header and is skipped.
    pub fn load<P>(path: P, split: StrataSplit) -> Result<Self, LoadError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let reader = reader_builder()
            .from_path(path)
            .map_err(|source| LoadError::Open {
                path: path.to_owned(),
                source,
            })?;
        Self::from_csv(reader, split)
    }

    /// Groups CSV data read from `reader`. The first line is a header and is skipped.
    pub fn from_reader<R>(reader: R, split: StrataSplit) -> Result<Self, LoadError>
    where
        R: io::Read,
    {
        Self::from_csv(reader_builder().from_reader(reader), split)
    }

    fn from_csv<R>(mut reader: csv::Reader<R>, split: StrataSplit) -> Result<Self, LoadError>
    where
        R: io::Read,
    {
        let mut dataset = Self::default();
        for record in reader.records() {
            let record = record.map_err(|source| LoadError::Csv { source })?;
            let line = record.position().map_or(0, csv::Position::line);
            if record.len() != FIELD_COUNT {
                return Err(LoadError::FieldCount {
                    line,
                    found: record.len(),
                });
            }

            let row: LifeTableRow = record
                .deserialize(None)
                .map_err(|source| LoadError::Csv { source })?;
            let strata = Strata::parse(&row.strata).map_err(|source| LoadError::Strata {
                line,
                strata: row.strata.clone(),
                source,
            })?;
            let key = split.group_key(&row.metric, &strata);
            dataset.insert(key, row);
        }
        Ok(dataset)
    }

    /// Appends a row to the sub-group identified by `key`.
    pub fn insert(&mut self, key: GroupKey, row: LifeTableRow) {
        let GroupKey { title, label } = key;
        let groups = self.groups.entry(title).or_default();
        match groups.iter_mut().find(|group| group.label == label) {
            Some(group) => group.rows.push(row),
            None => groups.push(SubGroup {
                label,
                rows: vec![row],
            }),
        }
    }

    /// Number of chart titles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of rows over all groups.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.groups
            .values()
            .flatten()
            .map(|group| group.rows.len())
            .sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[SubGroup])> {
        self.groups
            .iter()
            .map(|(title, groups)| (title.as_str(), groups.as_slice()))
    }

    /// Builds the chart model of every title, one at a time.
    pub fn charts(&self) -> impl Iterator<Item = Result<ChartSpec, ChartError>> + '_ {
        self.iter()
            .map(|(title, groups)| ChartSpec::from_group(title, groups))
    }
}

fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.has_headers(true).flexible(true).quote(b'"');
    builder
}
