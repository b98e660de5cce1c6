use serde::Serialize;
use tracing::debug;

use crate::charts::spec::{group_by_category, ChartLayout};
use crate::config::DashboardConfig;
use crate::models::{category_color, Dataset};
use crate::utils::constants::{COL_AQI_CATEGORY, COL_AQI_VALUE};

const TITLE: &str = "AQI Distribution by Category";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramSpec {
    pub layout: ChartLayout,
    pub x_column: String,
    pub color_column: String,
    pub bar_mode: String,
    pub opacity: f64,
    /// `bins + 1` ascending edges; empty when there is no data
    pub bin_edges: Vec<f64>,
    pub series: Vec<HistogramSeries>,
}

/// Per-category bar counts, one count per bin
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramSeries {
    pub category: String,
    pub color: String,
    pub counts: Vec<usize>,
}

impl HistogramSeries {
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

pub struct HistogramRenderer {
    bins: usize,
    opacity: f64,
    template: String,
}

impl HistogramRenderer {
    pub fn new(bins: usize, opacity: f64) -> Self {
        Self {
            bins: bins.max(1),
            opacity,
            template: crate::utils::constants::DEFAULT_TEMPLATE.to_string(),
        }
    }

    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new(config.histogram_bins, config.histogram_opacity).with_template(&config.template)
    }

    pub fn with_template(mut self, template: &str) -> Self {
        self.template = template.to_string();
        self
    }

    /// Stacked histogram of AQI Value, colored by category.
    pub fn render(&self, subset: &Dataset) -> HistogramSpec {
        let layout = ChartLayout::new(TITLE, &self.template).with_axes(COL_AQI_VALUE, "count");

        let mut spec = HistogramSpec {
            layout,
            x_column: COL_AQI_VALUE.to_string(),
            color_column: COL_AQI_CATEGORY.to_string(),
            bar_mode: "relative".to_string(),
            opacity: self.opacity,
            bin_edges: Vec::new(),
            series: Vec::new(),
        };

        let Some((min, max)) = value_range(subset) else {
            return spec;
        };

        let range = max - min;
        let width = if range > 0.0 {
            range / self.bins as f64
        } else {
            1.0
        };

        spec.bin_edges = (0..=self.bins).map(|i| min + i as f64 * width).collect();

        for (category, records) in group_by_category(subset) {
            let mut counts = vec![0usize; self.bins];
            for value in records.iter().filter_map(|r| r.aqi_value) {
                counts[bin_index(value, min, width, self.bins)] += 1;
            }
            if counts.iter().all(|c| *c == 0) {
                continue;
            }
            spec.series.push(HistogramSeries {
                category: category.to_string(),
                color: category_color(category).to_string(),
                counts,
            });
        }

        debug!(
            bins = self.bins,
            series = spec.series.len(),
            "Rendered AQI histogram"
        );

        spec
    }
}

fn value_range(subset: &Dataset) -> Option<(f64, f64)> {
    subset.records().filter_map(|r| r.aqi_value).fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// The maximum value lands in the last bin rather than one past it
fn bin_index(value: f64, min: f64, width: f64, bins: usize) -> usize {
    let idx = ((value - min) / width).floor();
    if idx <= 0.0 {
        0
    } else {
        (idx as usize).min(bins - 1)
    }
}
