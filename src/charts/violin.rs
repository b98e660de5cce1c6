use serde::Serialize;
use tracing::debug;

use crate::charts::spec::{group_by_category, percentile, ChartLayout};
use crate::config::DashboardConfig;
use crate::models::{category_color, Dataset, Pollutant};
use crate::utils::constants::{COL_AQI_CATEGORY, DEFAULT_TEMPLATE, VIOLIN_GRID_POINTS};

const TITLE: &str = "Pollutant-wise Distribution";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViolinSpec {
    pub layout: ChartLayout,
    pub x_column: String,
    pub y_column: String,
    pub pollutant: Pollutant,
    pub show_box: bool,
    pub points: String,
    pub series: Vec<ViolinSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViolinSeries {
    pub category: String,
    pub color: String,
    /// Every observation, drawn as points beside the violin
    pub values: Vec<f64>,
    pub box_summary: BoxSummary,
    pub density: DensityCurve,
}

/// Five-number summary plus whisker ends at 1.5 IQR, clipped to the data
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub lower_fence: f64,
    pub upper_fence: f64,
}

impl BoxSummary {
    pub fn from_sorted(sorted: &[f64]) -> Self {
        let q1 = percentile(sorted, 0.25);
        let q3 = percentile(sorted, 0.75);
        let iqr = q3 - q1;
        let low_limit = q1 - 1.5 * iqr;
        let high_limit = q3 + 1.5 * iqr;

        let min = sorted.first().copied().unwrap_or(0.0);
        let max = sorted.last().copied().unwrap_or(0.0);

        Self {
            min,
            q1,
            median: percentile(sorted, 0.5),
            q3,
            max,
            lower_fence: sorted.iter().copied().find(|v| *v >= low_limit).unwrap_or(min),
            upper_fence: sorted
                .iter()
                .rev()
                .copied()
                .find(|v| *v <= high_limit)
                .unwrap_or(max),
        }
    }
}

/// Kernel density estimate sampled on a regular grid, peak scaled to 1
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensityCurve {
    pub bandwidth: f64,
    pub y: Vec<f64>,
    pub density: Vec<f64>,
}

pub struct ViolinRenderer {
    template: String,
    grid_points: usize,
}

impl ViolinRenderer {
    pub fn new() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
            grid_points: VIOLIN_GRID_POINTS,
        }
    }

    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new().with_template(&config.template)
    }

    pub fn with_template(mut self, template: &str) -> Self {
        self.template = template.to_string();
        self
    }

    /// One violin per category for the chosen pollutant column.
    pub fn render(&self, subset: &Dataset, pollutant: Pollutant) -> ViolinSpec {
        let column = pollutant.column();

        let series: Vec<ViolinSeries> = group_by_category(subset)
            .into_iter()
            .filter_map(|(category, records)| {
                let values: Vec<f64> = records.iter().filter_map(|r| pollutant.value(r)).collect();
                if values.is_empty() {
                    return None;
                }
                let mut sorted = values.clone();
                sorted.sort_by(|a, b| a.total_cmp(b));

                Some(ViolinSeries {
                    category: category.to_string(),
                    color: category_color(category).to_string(),
                    box_summary: BoxSummary::from_sorted(&sorted),
                    density: compute_kde(&sorted, self.grid_points),
                    values,
                })
            })
            .collect();

        debug!(pollutant = %pollutant, series = series.len(), "Rendered pollutant violins");

        ViolinSpec {
            layout: ChartLayout::new(TITLE, &self.template).with_axes(COL_AQI_CATEGORY, column),
            x_column: COL_AQI_CATEGORY.to_string(),
            y_column: column.to_string(),
            pollutant,
            show_box: true,
            points: "all".to_string(),
            series,
        }
    }
}

impl Default for ViolinRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Silverman's rule of thumb: 0.9 * min(std, IQR/1.34) * n^(-1/5)
pub fn silverman_bandwidth(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n < 2 {
        return 1.0;
    }

    let mean = sorted.iter().sum::<f64>() / n as f64;
    let variance = sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let std_dev = variance.sqrt();

    let iqr = percentile(sorted, 0.75) - percentile(sorted, 0.25);
    let scale = if iqr > 0.0 {
        std_dev.min(iqr / 1.34)
    } else {
        std_dev
    };

    if scale <= 0.0 {
        return 1.0;
    }

    0.9 * scale * (n as f64).powf(-0.2)
}

fn gaussian_kernel(u: f64) -> f64 {
    (-0.5 * u * u).exp() / (2.0 * std::f64::consts::PI).sqrt()
}

/// Density over [min - 2h, max + 2h]
pub fn compute_kde(sorted: &[f64], grid_points: usize) -> DensityCurve {
    let bandwidth = silverman_bandwidth(sorted);

    let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
        return DensityCurve {
            bandwidth,
            y: Vec::new(),
            density: Vec::new(),
        };
    };

    let lo = min - 2.0 * bandwidth;
    let hi = max + 2.0 * bandwidth;
    let steps = grid_points.max(2) - 1;
    let step = (hi - lo) / steps as f64;

    let n = sorted.len() as f64;
    let y: Vec<f64> = (0..=steps).map(|i| lo + i as f64 * step).collect();
    let mut density: Vec<f64> = y
        .iter()
        .map(|point| {
            sorted
                .iter()
                .map(|x| gaussian_kernel((point - x) / bandwidth))
                .sum::<f64>()
                / (n * bandwidth)
        })
        .collect();

    let peak = density.iter().copied().fold(0.0f64, f64::max);
    if peak > 0.0 {
        for d in density.iter_mut() {
            *d /= peak;
        }
    }

    DensityCurve {
        bandwidth,
        y,
        density,
    }
}
