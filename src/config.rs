use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;
use validator::Validate;

use crate::error::Result;
use crate::utils::constants::{
    DEFAULT_HISTOGRAM_BINS, DEFAULT_HISTOGRAM_OPACITY, DEFAULT_MAP_PROJECTION,
    DEFAULT_MARKER_SIZE_MAX, DEFAULT_PREVIEW_ROWS, DEFAULT_TEMPLATE, DEFAULT_TOP_N,
    EXPORT_FILE_NAME,
};

/// Environment variable prefix, e.g. `AQI_HISTOGRAM_BINS=60`
pub const ENV_PREFIX: &str = "AQI";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct DashboardConfig {
    #[validate(range(min = 1, max = 1000))]
    pub histogram_bins: usize,

    #[validate(range(min = 0.0, max = 1.0))]
    pub histogram_opacity: f64,

    #[validate(range(min = 1, max = 1000))]
    pub top_n: usize,

    #[validate(range(max = 1000))]
    pub preview_rows: usize,

    #[validate(length(min = 1))]
    pub map_projection: String,

    #[validate(range(min = 1.0, max = 200.0))]
    pub marker_size_max: f64,

    #[validate(length(min = 1))]
    pub template: String,

    #[validate(length(min = 1))]
    pub export_file_name: String,

    #[validate(range(min = 1))]
    pub max_upload_bytes: Option<u64>,

    pub strict_validation: bool,

    pub parallel_charts: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            histogram_opacity: DEFAULT_HISTOGRAM_OPACITY,
            top_n: DEFAULT_TOP_N,
            preview_rows: DEFAULT_PREVIEW_ROWS,
            map_projection: DEFAULT_MAP_PROJECTION.to_string(),
            marker_size_max: DEFAULT_MARKER_SIZE_MAX,
            template: DEFAULT_TEMPLATE.to_string(),
            export_file_name: EXPORT_FILE_NAME.to_string(),
            max_upload_bytes: None,
            strict_validation: false,
            parallel_charts: true,
        }
    }
}

impl DashboardConfig {
    /// Load configuration layered as defaults, then the optional file, then
    /// `AQI_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = Self::default();

        let mut builder = ::config::Config::builder()
            .set_default("histogram_bins", defaults.histogram_bins as i64)?
            .set_default("histogram_opacity", defaults.histogram_opacity)?
            .set_default("top_n", defaults.top_n as i64)?
            .set_default("preview_rows", defaults.preview_rows as i64)?
            .set_default("map_projection", defaults.map_projection.as_str())?
            .set_default("marker_size_max", defaults.marker_size_max)?
            .set_default("template", defaults.template.as_str())?
            .set_default("export_file_name", defaults.export_file_name.as_str())?
            .set_default("strict_validation", defaults.strict_validation)?
            .set_default("parallel_charts", defaults.parallel_charts)?;

        if let Some(path) = path {
            debug!(path = %path.display(), "Loading configuration file");
            builder = builder.add_source(::config::File::from(path));
        }

        let settings = builder
            .add_source(::config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let config: DashboardConfig = settings.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    pub fn with_histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = bins;
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_parallel_charts(mut self, parallel: bool) -> Self {
        self.parallel_charts = parallel;
        self
    }

    pub fn with_strict_validation(mut self, strict: bool) -> Self {
        self.strict_validation = strict;
        self
    }
}
