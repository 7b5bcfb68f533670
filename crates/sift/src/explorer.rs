//! Main Explorer struct and public API.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{DatasetConfig, ExplorerConfig};
use crate::error::{Result, SiftError};
use crate::export::{export_file_name, view_to_csv};
use crate::filter::{
    ColumnClassifier, FilterComposer, FilterPlan, FilterSet, FilteredView, format_count,
};
use crate::inference::Profiler;
use crate::input::{DataSource, Parser, ParserConfig, SourceCache, SourceMetadata};
use crate::schema::{ColumnProfile, Table};
use crate::summary::{SummaryEngine, SummaryOutcome, SummarySpec};

/// A loaded table with everything needed to render its filters.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Label used in the UI and for export names.
    pub label: String,
    /// Where the table came from.
    pub source: SourceMetadata,
    /// The typed table (shared with the source cache).
    pub table: Arc<Table>,
    /// Per-column profiles, in column order.
    pub profiles: Vec<ColumnProfile>,
    /// Filter widgets for each column.
    pub plan: FilterPlan,
}

impl Dataset {
    /// "Loaded dataset with N rows and M columns."
    pub fn loaded_message(&self) -> String {
        format!(
            "Loaded dataset with {} rows and {} columns.",
            format_count(self.table.row_count()),
            format_count(self.table.column_count())
        )
    }

    /// First `n` rows.
    pub fn preview(&self, n: usize) -> Table {
        self.table.head(n)
    }

    /// Download name for this dataset's filtered subset.
    pub fn export_file_name(&self) -> String {
        export_file_name(Some(&self.label))
    }

    /// Serializable description of the dataset with a preview.
    pub fn overview(&self, preview_rows: usize) -> DatasetOverview {
        DatasetOverview {
            label: self.label.clone(),
            message: self.loaded_message(),
            source: self.source.clone(),
            row_count: self.table.row_count(),
            column_count: self.table.column_count(),
            profiles: self.profiles.clone(),
            plan: self.plan.clone(),
            preview: self.preview(preview_rows),
        }
    }
}

/// What the UI shows right after a load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetOverview {
    pub label: String,
    pub message: String,
    pub source: SourceMetadata,
    pub row_count: usize,
    pub column_count: usize,
    pub profiles: Vec<ColumnProfile>,
    pub plan: FilterPlan,
    pub preview: Table,
}

/// The main explorer engine.
///
/// Loads sources through a memoizing cache, builds filter plans, and runs
/// filters and summaries against loaded datasets.
pub struct Explorer {
    config: ExplorerConfig,
    parser: Parser,
    profiler: Profiler,
    composer: FilterComposer,
    cache: SourceCache,
}

impl Explorer {
    /// Create an explorer with default configuration.
    pub fn new() -> Self {
        Self::with_config(ExplorerConfig::default())
    }

    /// Create an explorer with custom configuration.
    pub fn with_config(config: ExplorerConfig) -> Self {
        let composer = FilterComposer::with_empty_selection(config.empty_selection);
        Self {
            config,
            parser: Parser::new(),
            profiler: Profiler::new(),
            composer,
            cache: SourceCache::new(),
        }
    }

    /// Override the parser settings (e.g. a fixed delimiter).
    pub fn with_parser_config(mut self, parser: ParserConfig) -> Self {
        self.parser = Parser::with_config(parser);
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    /// Number of sources held in the cache.
    pub fn cached_sources(&self) -> usize {
        self.cache.len()
    }

    /// Load a source into a dataset.
    ///
    /// If `label` names a configured dataset, its column schema applies.
    /// Without a label the source's file name is used.
    pub fn load(&mut self, source: DataSource, label: Option<&str>) -> Result<Dataset> {
        let label = label
            .map(str::to_string)
            .unwrap_or_else(|| source.default_label());
        let dataset_config = self.config.dataset(&label).cloned();
        self.load_with(&source, label, dataset_config.as_ref())
    }

    /// Load a configured dataset by label.
    pub fn load_configured(&mut self, label: &str) -> Result<Dataset> {
        let dataset_config = self
            .config
            .dataset(label)
            .cloned()
            .ok_or_else(|| SiftError::Config(format!("no dataset labelled '{label}'")))?;
        let source = DataSource::Path(dataset_config.path.clone());
        self.load_with(&source, dataset_config.label.clone(), Some(&dataset_config))
    }

    /// Load every configured dataset, in configuration order.
    ///
    /// One failing dataset does not stop the others; each outcome is
    /// returned with its label.
    pub fn load_all_configured(&mut self) -> Vec<(String, Result<Dataset>)> {
        let labels: Vec<String> = self.config.datasets.iter().map(|d| d.label.clone()).collect();
        labels
            .into_iter()
            .map(|label| {
                let outcome = self.load_configured(&label);
                (label, outcome)
            })
            .collect()
    }

    fn load_with(
        &mut self,
        source: &DataSource,
        label: String,
        dataset_config: Option<&DatasetConfig>,
    ) -> Result<Dataset> {
        let loaded = self.cache.load(&self.parser, source)?;
        let classifier = ColumnClassifier::with_config(self.config.classifier_config(dataset_config));

        let profiles = self.profiler.profile_table(&loaded.table);
        let plan = FilterPlan::build(&loaded.table, &profiles, &classifier);
        debug!(
            label = %label,
            filterable = plan.filterable().count(),
            "built filter plan"
        );

        let dataset = Dataset {
            label,
            source: loaded.metadata,
            table: loaded.table,
            profiles,
            plan,
        };
        info!(label = %dataset.label, "{}", dataset.loaded_message());
        Ok(dataset)
    }

    /// Apply filters to a dataset.
    pub fn filter<'a>(&self, dataset: &'a Dataset, filters: &FilterSet) -> FilteredView<'a> {
        self.composer.compose(&dataset.table, filters)
    }

    /// Summarize a filtered view.
    pub fn summarize(&self, view: &FilteredView<'_>, spec: &SummarySpec) -> Result<SummaryOutcome> {
        SummaryEngine::summarize_view(view, spec)
    }

    /// Export a filtered view as CSV text.
    pub fn export(&self, view: &FilteredView<'_>) -> Result<String> {
        view_to_csv(view)
    }
}

impl Default for Explorer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterKind, FilterParams};
    use crate::summary::Aggregation;

    const HOUSEHOLDS: &str = "village,size,rural\nA,4,true\nB,2,false\nA,6,true\nC,,false\n";

    fn upload(text: &str) -> DataSource {
        DataSource::Upload {
            name: "households.csv".to_string(),
            bytes: text.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_load_builds_plan() {
        let mut explorer = Explorer::new();
        let dataset = explorer.load(upload(HOUSEHOLDS), None).unwrap();

        assert_eq!(dataset.label, "households");
        assert_eq!(dataset.loaded_message(), "Loaded dataset with 4 rows and 3 columns.");
        assert_eq!(dataset.export_file_name(), "households_filtered.csv");
        assert_eq!(
            dataset.plan.widget("village").unwrap().filter,
            FilterKind::CategoricalSelect
        );
        assert_eq!(
            dataset.plan.widget("size").unwrap().filter,
            FilterKind::NumericRange { min: 2.0, max: 6.0 }
        );
        assert_eq!(
            dataset.plan.widget("rural").unwrap().filter,
            FilterKind::BooleanTriState
        );
    }

    #[test]
    fn test_repeat_load_hits_cache() {
        let mut explorer = Explorer::new();
        let first = explorer.load(upload(HOUSEHOLDS), None).unwrap();
        let second = explorer.load(upload(HOUSEHOLDS), Some("again")).unwrap();

        assert!(Arc::ptr_eq(&first.table, &second.table));
        assert_eq!(explorer.cached_sources(), 1);
        assert_eq!(second.label, "again");
    }

    #[test]
    fn test_filter_summarize_export() {
        let mut explorer = Explorer::new();
        let dataset = explorer.load(upload(HOUSEHOLDS), None).unwrap();

        let filters = FilterSet::new().with("village", FilterParams::select(["A"]));
        let view = explorer.filter(&dataset, &filters);
        assert_eq!(view.indices(), &[0, 2]);

        let outcome = explorer
            .summarize(&view, &SummarySpec::new("village", Aggregation::Mean))
            .unwrap();
        let summary = outcome.table().unwrap();
        assert_eq!(summary.rows.len(), 1);
        assert_eq!(summary.rows[0].values, vec![crate::schema::Cell::Number(5.0)]);

        let csv = explorer.export(&view).unwrap();
        assert_eq!(csv, "village,size,rural\nA,4,true\nA,6,true\n");
    }

    #[test]
    fn test_unknown_configured_label() {
        let mut explorer = Explorer::new();
        assert!(matches!(
            explorer.load_configured("missing"),
            Err(SiftError::Config(_))
        ));
    }

    #[test]
    fn test_loaded_message_groups_thousands() {
        let mut text = String::from("id,value\n");
        for i in 0..1234 {
            text.push_str(&format!("{i},{}\n", i % 7));
        }
        let mut explorer = Explorer::new();
        let dataset = explorer.load(upload(&text), None).unwrap();
        assert_eq!(
            dataset.loaded_message(),
            "Loaded dataset with 1,234 rows and 2 columns."
        );
    }

    #[test]
    fn test_fixed_delimiter_overrides_default() {
        let tsv = "village\tsize\nA\t4\nB\t2\n";

        let mut comma = Explorer::new();
        let dataset = comma.load(upload(tsv), None).unwrap();
        assert_eq!(dataset.table.column_count(), 1);

        let mut tab = Explorer::new().with_parser_config(ParserConfig::with_delimiter(b'\t'));
        let dataset = tab.load(upload(tsv), None).unwrap();
        assert_eq!(dataset.table.column_names(), vec!["village", "size"]);
        assert_eq!(dataset.source.format, "tsv");
    }

    #[test]
    fn test_load_all_configured_keeps_going_after_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("households.csv");
        std::fs::write(&path, HOUSEHOLDS).unwrap();

        let config = ExplorerConfig {
            datasets: vec![
                DatasetConfig::new("missing", dir.path().join("missing.csv")),
                DatasetConfig::new("households", &path).with_filter_columns(["size"]),
            ],
            ..ExplorerConfig::default()
        };
        let mut explorer = Explorer::with_config(config);

        let outcomes = explorer.load_all_configured();
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].0, "missing");
        assert!(matches!(outcomes[0].1, Err(SiftError::Io { .. })));

        let (label, loaded) = &outcomes[1];
        assert_eq!(label, "households");
        let dataset = loaded.as_ref().unwrap();
        assert_eq!(dataset.label, "households");
        assert!(!dataset.plan.widget("village").unwrap().filter.is_filterable());
    }
}
