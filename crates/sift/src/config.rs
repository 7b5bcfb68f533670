//! Explorer configuration, loadable from JSON.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SiftError};
use crate::filter::{ClassifierConfig, DEFAULT_CATEGORICAL_THRESHOLD, EmptySelection};

/// Rows shown in a dataset preview.
pub const DEFAULT_PREVIEW_ROWS: usize = 50;

/// A documented link between two datasets. Never enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinKey {
    /// Column holding the key in this dataset.
    pub column: String,
    /// Label of the dataset it refers to.
    pub dataset: String,
}

/// A fixed local dataset with an optional column schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Label shown in the UI and used for export names.
    pub label: String,
    /// Local file path (relative paths resolve against the config file).
    pub path: PathBuf,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Only these columns get filter widgets (None = all columns).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_columns: Option<Vec<String>>,
    /// Columns that always get a multi-select.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categorical_columns: Vec<String>,
    /// Join keys to other datasets, for documentation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<JoinKey>,
}

impl DatasetConfig {
    /// Create a dataset entry without a schema.
    pub fn new(label: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
            description: None,
            filter_columns: None,
            categorical_columns: Vec::new(),
            links: Vec::new(),
        }
    }

    /// Restrict filtering to the given columns.
    pub fn with_filter_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Force multi-selects for the given columns.
    pub fn with_categorical_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categorical_columns = columns.into_iter().map(Into::into).collect();
        self
    }
}

/// Settings for an [`Explorer`](crate::Explorer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Maximum distinct text values for a multi-select.
    pub categorical_threshold: usize,
    /// What an empty multi-select means.
    pub empty_selection: EmptySelection,
    /// Rows shown in a dataset preview.
    pub preview_rows: usize,
    /// Fixed local datasets.
    pub datasets: Vec<DatasetConfig>,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            categorical_threshold: DEFAULT_CATEGORICAL_THRESHOLD,
            empty_selection: EmptySelection::default(),
            preview_rows: DEFAULT_PREVIEW_ROWS,
            datasets: Vec::new(),
        }
    }
}

impl ExplorerConfig {
    /// Load configuration from a JSON file.
    ///
    /// Relative dataset paths are resolved against the file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| SiftError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut config: ExplorerConfig = serde_json::from_str(&content)?;

        if let Some(base) = path.parent() {
            for dataset in &mut config.datasets {
                if dataset.path.is_relative() {
                    dataset.path = base.join(&dataset.path);
                }
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Check labels are non-empty and unique.
    pub fn validate(&self) -> Result<()> {
        let mut labels = HashSet::new();
        for dataset in &self.datasets {
            if dataset.label.trim().is_empty() {
                return Err(SiftError::Config(format!(
                    "dataset '{}' has an empty label",
                    dataset.path.display()
                )));
            }
            if !labels.insert(dataset.label.as_str()) {
                return Err(SiftError::Config(format!(
                    "duplicate dataset label '{}'",
                    dataset.label
                )));
            }
        }
        Ok(())
    }

    /// Configured dataset by label.
    pub fn dataset(&self, label: &str) -> Option<&DatasetConfig> {
        self.datasets.iter().find(|d| d.label == label)
    }

    /// Classifier settings for a dataset, or the generic explorer's
    /// settings when `dataset` is None.
    pub fn classifier_config(&self, dataset: Option<&DatasetConfig>) -> ClassifierConfig {
        let config = ClassifierConfig::default().with_threshold(self.categorical_threshold);
        match dataset {
            Some(dataset) => {
                let config =
                    config.with_categorical_columns(dataset.categorical_columns.iter().cloned());
                match &dataset.filter_columns {
                    Some(columns) => config.with_allow_list(columns.iter().cloned()),
                    None => config,
                }
            }
            None => config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config: ExplorerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ExplorerConfig::default());
        assert_eq!(config.categorical_threshold, 40);
        assert_eq!(config.empty_selection, EmptySelection::NoFilter);
    }

    #[test]
    fn test_load_resolves_relative_paths() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "empty_selection": "match_nothing",
                "datasets": [
                    {{
                        "label": "household",
                        "path": "household.csv",
                        "filter_columns": ["village", "size"],
                        "links": [{{"column": "deidentified_village", "dataset": "settlement"}}]
                    }}
                ]
            }}"#
        )
        .unwrap();

        let config = ExplorerConfig::load(file.path()).unwrap();
        let dataset = config.dataset("household").unwrap();

        assert_eq!(config.empty_selection, EmptySelection::MatchNothing);
        assert_eq!(dataset.path, file.path().parent().unwrap().join("household.csv"));
        assert_eq!(dataset.links[0].column, "deidentified_village");
    }

    #[test]
    fn test_duplicate_labels_rejected() {
        let config = ExplorerConfig {
            datasets: vec![
                DatasetConfig::new("a", "a.csv"),
                DatasetConfig::new("a", "b.csv"),
            ],
            ..ExplorerConfig::default()
        };
        assert!(matches!(config.validate(), Err(SiftError::Config(_))));
    }

    #[test]
    fn test_classifier_config_for_dataset() {
        let config = ExplorerConfig {
            categorical_threshold: 10,
            ..ExplorerConfig::default()
        };
        let dataset = DatasetConfig::new("individual", "individual.csv")
            .with_filter_columns(["sex", "age"])
            .with_categorical_columns(["sex"]);

        let classifier = config.classifier_config(Some(&dataset));
        assert_eq!(classifier.categorical_threshold, 10);
        assert!(classifier.allow_list.as_ref().unwrap().contains("age"));
        assert!(classifier.categorical_columns.contains("sex"));

        assert!(config.classifier_config(None).allow_list.is_none());
    }
}
