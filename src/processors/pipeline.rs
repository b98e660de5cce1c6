use serde::Serialize;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

use crate::charts::DashboardCharts;
use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use crate::models::{Dataset, Pollutant, PreviewTable};
use crate::processors::{FilterDomains, FilterEngine, FilterState, Metrics, MetricsSummarizer};
use crate::readers::CsvReader;
use crate::writers::{CsvExporter, ExportArtifact};

/// Everything the dashboard shows for one filter state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderResult {
    /// First rows of the full dataset, independent of the filters
    pub preview: PreviewTable,
    pub domains: FilterDomains,
    pub selection: FilterState,
    pub pollutant: Pollutant,
    pub metrics: Metrics,
    pub charts: DashboardCharts,
    pub export: ExportArtifact,
}

/// Filter, summarize, chart and export one dataset.
pub fn render(
    dataset: &Dataset,
    state: &FilterState,
    pollutant: Pollutant,
    config: &DashboardConfig,
) -> Result<RenderResult> {
    let domains = FilterDomains::from_dataset(dataset);
    render_with_domains(dataset, &domains, state, pollutant, config)
}

fn render_with_domains(
    dataset: &Dataset,
    domains: &FilterDomains,
    state: &FilterState,
    pollutant: Pollutant,
    config: &DashboardConfig,
) -> Result<RenderResult> {
    let start = Instant::now();

    if !state.country.is_all() && !domains.contains_country(&state.country) {
        warn!(country = %state.country, "Country is not in the dataset");
    }
    if !state.city.is_all() && !domains.contains_city(&state.city) {
        warn!(city = %state.city, "City is not in the dataset");
    }

    let subset = FilterEngine::new().filter(dataset, state);
    let metrics = MetricsSummarizer::new().summarize(&subset);
    let charts = DashboardCharts::render(&subset, pollutant, config);
    let export = CsvExporter::from_config(config).export(&subset)?;

    info!(
        rows = subset.len(),
        country = %state.country,
        city = %state.city,
        pollutant = %pollutant,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Rendered dashboard"
    );

    Ok(RenderResult {
        preview: dataset.preview(config.preview_rows),
        domains: domains.clone(),
        selection: state.clone(),
        pollutant,
        metrics,
        charts,
        export,
    })
}

/// A loaded dataset kept across interactions.
///
/// Selector changes re-render from the cached rows without parsing the upload
/// again.
pub struct DashboardSession {
    config: DashboardConfig,
    dataset: Dataset,
    domains: FilterDomains,
}

impl DashboardSession {
    /// Parse and validate an upload. Parse and schema failures end here.
    pub fn load(bytes: &[u8], config: DashboardConfig) -> Result<Self> {
        let dataset = CsvReader::from_config(&config).load_dataset(bytes)?;
        Ok(Self::from_dataset(dataset, config))
    }

    pub fn load_path(path: &Path, config: DashboardConfig) -> Result<Self> {
        let dataset = CsvReader::from_config(&config).load_path(path)?;
        Ok(Self::from_dataset(dataset, config))
    }

    pub fn from_dataset(dataset: Dataset, config: DashboardConfig) -> Self {
        let domains = FilterDomains::from_dataset(&dataset);
        info!(
            rows = dataset.len(),
            countries = domains.countries.len() - 1,
            cities = domains.cities.len() - 1,
            "Dataset loaded"
        );
        Self {
            config,
            dataset,
            domains,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn domains(&self) -> &FilterDomains {
        &self.domains
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn render(&self, state: &FilterState, pollutant: Pollutant) -> Result<RenderResult> {
        render_with_domains(&self.dataset, &self.domains, state, pollutant, &self.config)
    }

    /// Like [`render`](Self::render) but rejects selections absent from the
    /// selector domains.
    pub fn render_checked(&self, state: &FilterState, pollutant: Pollutant) -> Result<RenderResult> {
        if !self.domains.contains_country(&state.country) {
            return Err(DashboardError::InvalidSelection(format!(
                "unknown country '{}'",
                state.country
            )));
        }
        if !self.domains.contains_city(&state.city) {
            return Err(DashboardError::InvalidSelection(format!(
                "unknown city '{}'",
                state.city
            )));
        }
        self.render(state, pollutant)
    }
}
