//! Static dataset catalog
//!
//! The catalog is configuration, not computed: a list of `{name, key?}`
//! records plus the directory the CSV resources live in. A dataset's
//! identity is its `key`, falling back to its `name`, and its resource is
//! `<data_dir>/<identity>.csv`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::csv_reader::CsvReader;
use crate::reader::{IoError, IoResult, TableReader};
use crate::table::Table;

/// A loadable dataset as listed in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetMeta {
    /// Human-readable name, shown in the dataset menu
    pub name: String,

    /// Optional resource key; overrides `name` as the identity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl DatasetMeta {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: None,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// `key || name`
    pub fn identity(&self) -> &str {
        match self.key.as_deref() {
            Some(key) if !key.is_empty() => key,
            _ => &self.name,
        }
    }

    /// File name of the CSV resource
    pub fn resource_name(&self) -> String {
        format!("{}.csv", self.identity())
    }
}

/// The dataset list plus the directory holding its resources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Directory containing `<identity>.csv` files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Datasets in menu order
    #[serde(default)]
    pub datasets: Vec<DatasetMeta>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data/csv")
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            datasets: Vec::new(),
        }
    }
}

impl Catalog {
    pub fn new(data_dir: impl AsRef<Path>, datasets: Vec<DatasetMeta>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            datasets,
        }
    }

    /// Find a dataset by identity
    pub fn find(&self, identity: &str) -> Option<&DatasetMeta> {
        self.datasets.iter().find(|d| d.identity() == identity)
    }

    /// Path of a dataset's CSV resource
    pub fn resolve(&self, dataset: &DatasetMeta) -> PathBuf {
        self.data_dir.join(dataset.resource_name())
    }

    /// Identities that appear more than once
    pub fn duplicate_identities(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        let mut duplicates = Vec::new();
        for dataset in &self.datasets {
            let identity = dataset.identity();
            if !seen.insert(identity) && !duplicates.contains(&identity) {
                duplicates.push(identity);
            }
        }
        duplicates
    }

    /// Read and parse a dataset synchronously
    pub fn load(&self, dataset: &DatasetMeta) -> IoResult<Table> {
        let path = self.resolve(dataset);
        let path = path
            .to_str()
            .ok_or_else(|| IoError::UnknownDataset(dataset.identity().to_string()))?;
        CsvReader::open(path)?.read_table()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_prefers_key() {
        let plain = DatasetMeta::new("Iris");
        let keyed = DatasetMeta::new("Iris").with_key("iris-v2");
        assert_eq!(plain.identity(), "Iris");
        assert_eq!(keyed.identity(), "iris-v2");
        assert_eq!(keyed.resource_name(), "iris-v2.csv");
    }

    #[test]
    fn test_empty_key_falls_back_to_name() {
        let meta = DatasetMeta::new("cars").with_key("");
        assert_eq!(meta.identity(), "cars");
    }

    #[test]
    fn test_resolve_and_find() {
        let catalog = Catalog::new(
            "/data",
            vec![DatasetMeta::new("cars"), DatasetMeta::new("Iris").with_key("iris")],
        );
        assert_eq!(
            catalog.resolve(&catalog.datasets[1]),
            PathBuf::from("/data/iris.csv")
        );
        assert_eq!(catalog.find("iris").map(|d| d.name.as_str()), Some("Iris"));
        assert!(catalog.find("Iris").is_none());
    }

    #[test]
    fn test_duplicate_identities() {
        let catalog = Catalog::new(
            "/data",
            vec![
                DatasetMeta::new("a"),
                DatasetMeta::new("b").with_key("a"),
                DatasetMeta::new("c"),
            ],
        );
        assert_eq!(catalog.duplicate_identities(), vec!["a"]);
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cars.csv"), "mpg,hp\n21,110\n22.8,93\n").unwrap();

        let catalog = Catalog::new(dir.path(), vec![DatasetMeta::new("cars")]);
        let table = catalog.load(&catalog.datasets[0]).unwrap();
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.numeric_column("mpg").unwrap(), vec![21.0, 22.8]);

        let missing = DatasetMeta::new("trucks");
        assert!(matches!(catalog.load(&missing), Err(IoError::FileNotFound(_))));
    }
}
