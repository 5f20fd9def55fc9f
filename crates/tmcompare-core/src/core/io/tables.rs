use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Metric names used in persisted table file names. The downstream display
/// collaborator looks tables up by these exact names.
pub const METRIC_SASA: &str = "sasa";
pub const METRIC_RMSD: &str = "rmsd";
pub const METRIC_TM: &str = "TM";

#[derive(Debug, Error)]
pub enum TableError {
    #[error("I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
}

/// One flat persisted table: `label,value` header plus one row per entry.
///
/// Rows keep insertion order, which the orchestrator guarantees to be the
/// pair-enumeration order. Tables accumulate in memory for the whole run
/// and are written exactly once at the end; writing is a full overwrite of
/// the destination, never a merge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricTable {
    rows: Vec<(String, f64)>,
}

impl MetricTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, label: impl Into<String>, value: f64) {
        self.rows.push((label.into(), value));
    }

    pub fn rows(&self) -> &[(String, f64)] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.rows
            .iter()
            .find(|(l, _)| l == label)
            .map(|&(_, v)| v)
    }

    pub fn write_csv(&self, path: &Path) -> Result<(), TableError> {
        let mut writer = csv::Writer::from_path(path).map_err(|e| TableError::Csv {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        writer
            .write_record(["label", "value"])
            .and_then(|_| {
                for (label, value) in &self.rows {
                    writer.write_record([label.as_str(), &value.to_string()])?;
                }
                writer.flush().map_err(csv::Error::from)
            })
            .map_err(|e| TableError::Csv {
                path: path.to_string_lossy().to_string(),
                source: e,
            })
    }

    pub fn read_csv(path: &Path) -> Result<Self, TableError> {
        #[derive(Deserialize)]
        struct Row {
            label: String,
            value: f64,
        }

        let mut reader = csv::Reader::from_path(path).map_err(|e| TableError::Csv {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let mut table = Self::new();
        for result in reader.deserialize::<Row>() {
            let row = result.map_err(|e| TableError::Csv {
                path: path.to_string_lossy().to_string(),
                source: e,
            })?;
            table.push(row.label, row.value);
        }
        Ok(table)
    }
}

/// Maps a dataset name and metric name to the persisted table location:
/// `<root>/<dataset>/dfs/<metric>_data.csv`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub root: PathBuf,
    pub dataset: String,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>, dataset: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            dataset: dataset.into(),
        }
    }

    pub fn dataset_dir(&self) -> PathBuf {
        self.root.join(&self.dataset)
    }

    pub fn tables_dir(&self) -> PathBuf {
        self.dataset_dir().join("dfs")
    }

    pub fn table_path(&self, metric: &str) -> PathBuf {
        self.tables_dir().join(format!("{metric}_data.csv"))
    }

    pub fn superposed_dir(&self) -> PathBuf {
        self.dataset_dir().join("superposed")
    }

    pub fn ensure_tables_dir(&self) -> Result<(), TableError> {
        let dir = self.tables_dir();
        std::fs::create_dir_all(&dir).map_err(|e| TableError::Io {
            path: dir.to_string_lossy().to_string(),
            source: e,
        })
    }
}
