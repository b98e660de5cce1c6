use serde::Serialize;
use std::collections::HashMap;

use crate::charts::{GeoScatterSpec, HistogramSpec, RankingBarSpec, ViolinSpec};
use crate::models::{AirQualityRecord, Dataset};

/// Declarative chart description handed to the external charting engine
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartSpec {
    Histogram(HistogramSpec),
    Violin(ViolinSpec),
    GeoScatter(GeoScatterSpec),
    RankingBar(RankingBarSpec),
}

impl ChartSpec {
    pub fn title(&self) -> &str {
        match self {
            ChartSpec::Histogram(spec) => &spec.layout.title,
            ChartSpec::Violin(spec) => &spec.layout.title,
            ChartSpec::GeoScatter(spec) => &spec.layout.title,
            ChartSpec::RankingBar(spec) => &spec.layout.title,
        }
    }

    /// True when the chart has nothing to draw
    pub fn is_blank(&self) -> bool {
        match self {
            ChartSpec::Histogram(spec) => spec.series.is_empty(),
            ChartSpec::Violin(spec) => spec.series.is_empty(),
            ChartSpec::GeoScatter(spec) => spec.series.is_empty(),
            ChartSpec::RankingBar(spec) => spec.bars.is_empty(),
        }
    }
}

/// Title, axis labels and theme shared by every chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartLayout {
    pub title: String,
    pub template: String,
    pub x_title: Option<String>,
    pub y_title: Option<String>,
}

impl ChartLayout {
    pub fn new(title: &str, template: &str) -> Self {
        Self {
            title: title.to_string(),
            template: template.to_string(),
            x_title: None,
            y_title: None,
        }
    }

    pub fn with_axes(mut self, x_title: &str, y_title: &str) -> Self {
        self.x_title = Some(x_title.to_string());
        self.y_title = Some(y_title.to_string());
        self
    }
}

/// Records grouped by category label, groups in first-appearance order
pub(crate) fn group_by_category(subset: &Dataset) -> Vec<(&str, Vec<&AirQualityRecord>)> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<&AirQualityRecord>)> = Vec::new();

    for record in subset.records() {
        let label = record.aqi_category.as_str();
        let idx = *positions.entry(label).or_insert_with(|| {
            groups.push((label, Vec::new()));
            groups.len() - 1
        });
        groups[idx].1.push(record);
    }

    groups
}

/// Linear-interpolation percentile of already sorted data
pub(crate) fn percentile(sorted_data: &[f64], p: f64) -> f64 {
    let n = sorted_data.len();
    if n == 0 {
        return 0.0;
    }
    if n == 1 {
        return sorted_data[0];
    }

    let rank = p * (n - 1) as f64;
    let lower_idx = rank.floor() as usize;
    let upper_idx = rank.ceil() as usize;

    if lower_idx == upper_idx {
        sorted_data[lower_idx]
    } else {
        let weight = rank - lower_idx as f64;
        sorted_data[lower_idx] * (1.0 - weight) + sorted_data[upper_idx] * weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_by_category_first_appearance_order() {
        let records = ["Moderate", "Good", "Moderate", "Hazardous"]
            .iter()
            .map(|c| AirQualityRecord::builder().aqi(1.0, c).build())
            .collect();
        let dataset = Dataset::from_records(records);

        let groups = group_by_category(&dataset);
        let labels: Vec<&str> = groups.iter().map(|(l, _)| *l).collect();
        assert_eq!(labels, vec!["Moderate", "Good", "Hazardous"]);
        assert_eq!(groups[0].1.len(), 2);
    }

    #[test]
    fn test_percentile() {
        let data = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile(&data, 0.0), 1.0);
        assert_eq!(percentile(&data, 1.0), 4.0);
        assert_eq!(percentile(&data, 0.5), 2.5);
        assert_eq!(percentile(&[7.0], 0.25), 7.0);
        assert_eq!(percentile(&[], 0.5), 0.0);
    }
}
