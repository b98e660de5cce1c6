use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::models::Dataset;
use crate::utils::constants::NOT_AVAILABLE;

/// The four KPI values shown above the charts.
///
/// Mean, max and mode are undefined for an empty subset and stay `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub count: usize,
    pub avg_aqi: Option<f64>,
    pub max_aqi: Option<i64>,
    pub dominant_category: Option<String>,
}

impl Metrics {
    pub fn empty() -> Self {
        Self {
            count: 0,
            avg_aqi: None,
            max_aqi: None,
            dominant_category: None,
        }
    }

    pub fn display_count(&self) -> String {
        self.count.to_string()
    }

    pub fn display_avg_aqi(&self) -> String {
        self.avg_aqi
            .map(|v| format!("{:.1}", v))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    pub fn display_max_aqi(&self) -> String {
        self.max_aqi
            .map(|v| v.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    pub fn display_dominant_category(&self) -> String {
        self.dominant_category
            .clone()
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    pub fn summary(&self) -> String {
        format!(
            "Locations: {}\nAverage AQI: {}\nMax AQI: {}\nDominant Category: {}",
            self.display_count(),
            self.display_avg_aqi(),
            self.display_max_aqi(),
            self.display_dominant_category()
        )
    }
}

pub struct MetricsSummarizer;

impl MetricsSummarizer {
    pub fn new() -> Self {
        Self
    }

    pub fn summarize(&self, subset: &Dataset) -> Metrics {
        if subset.is_empty() {
            warn!("Working subset is empty, KPIs fall back to N/A");
            return Metrics::empty();
        }

        // Missing AQI values count as rows but not toward mean or max
        let mut sum = 0.0f64;
        let mut present = 0usize;
        let mut max: Option<f64> = None;
        for value in subset.records().filter_map(|r| r.aqi_value) {
            sum += value;
            present += 1;
            max = Some(max.map_or(value, |m| m.max(value)));
        }

        if present < subset.len() {
            debug!(missing = subset.len() - present, "Skipped rows without an AQI value");
        }

        let metrics = Metrics {
            count: subset.len(),
            avg_aqi: (present > 0).then(|| round_to_one_decimal(sum / present as f64)),
            max_aqi: max.map(|m| m.trunc() as i64),
            dominant_category: dominant_category(subset),
        };

        debug!(
            count = metrics.count,
            avg = ?metrics.avg_aqi,
            max = ?metrics.max_aqi,
            dominant = ?metrics.dominant_category,
            "Summarized working subset"
        );

        metrics
    }
}

impl Default for MetricsSummarizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Round to one decimal place, ties to even (102.5 tenths becomes 10.2)
pub fn round_to_one_decimal(value: f64) -> f64 {
    let scaled = value * 10.0;
    let rounded = scaled.round();
    let tie = (scaled - scaled.trunc()).abs() == 0.5;

    if tie && rounded % 2.0 != 0.0 {
        (rounded - scaled.signum()) / 10.0
    } else {
        rounded / 10.0
    }
}

/// Most frequent category label, ignoring blank labels.
///
/// Ties resolve to the label that sorts first, so the result does not
/// depend on row order.
pub fn dominant_category(subset: &Dataset) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in subset.records() {
        if !record.aqi_category.is_empty() {
            *counts.entry(record.aqi_category.as_str()).or_default() += 1;
        }
    }

    counts
        .into_iter()
        .max_by(|(label_a, count_a), (label_b, count_b)| {
            count_a.cmp(count_b).then_with(|| label_b.cmp(label_a))
        })
        .map(|(label, _)| label.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AirQualityRecord;

    fn record(country: &str, city: &str, aqi: f64, category: &str) -> AirQualityRecord {
        AirQualityRecord::builder()
            .country(country)
            .city(city)
            .aqi(aqi, category)
            .build()
    }

    #[test]
    fn test_two_row_subset() {
        let subset = Dataset::from_records(vec![
            record("X", "A", 50.0, "Good"),
            record("X", "B", 80.0, "Moderate"),
        ]);

        let metrics = MetricsSummarizer::new().summarize(&subset);
        assert_eq!(metrics.count, 2);
        assert_eq!(metrics.avg_aqi, Some(65.0));
        assert_eq!(metrics.max_aqi, Some(80));
    }

    #[test]
    fn test_empty_subset_falls_back() {
        let subset = Dataset::from_records(Vec::new());
        let metrics = MetricsSummarizer::new().summarize(&subset);

        assert_eq!(metrics, Metrics::empty());
        assert_eq!(metrics.display_count(), "0");
        assert_eq!(metrics.display_avg_aqi(), "N/A");
        assert_eq!(metrics.display_max_aqi(), "N/A");
        assert_eq!(metrics.display_dominant_category(), "N/A");
    }

    #[test]
    fn test_mean_rounds_to_one_decimal() {
        let subset = Dataset::from_records(vec![
            record("X", "A", 10.0, "Good"),
            record("X", "B", 10.0, "Good"),
            record("X", "C", 11.0, "Good"),
        ]);
        let metrics = MetricsSummarizer::new().summarize(&subset);
        assert_eq!(metrics.avg_aqi, Some(10.3));
        assert_eq!(metrics.display_avg_aqi(), "10.3");
    }

    #[test]
    fn test_mean_ties_round_to_even() {
        let subset = Dataset::from_records(vec![
            record("X", "A", 10.0, "Good"),
            record("X", "B", 10.0, "Good"),
            record("X", "C", 10.0, "Good"),
            record("X", "D", 11.0, "Good"),
        ]);
        let metrics = MetricsSummarizer::new().summarize(&subset);
        assert_eq!(metrics.avg_aqi, Some(10.2));

        assert_eq!(round_to_one_decimal(0.25), 0.2);
        assert_eq!(round_to_one_decimal(0.75), 0.8);
        assert_eq!(round_to_one_decimal(-0.25), -0.2);
        assert_eq!(round_to_one_decimal(65.0), 65.0);
    }

    #[test]
    fn test_missing_aqi_values_are_skipped() {
        let mut subset_records = vec![
            record("X", "A", 50.0, "Good"),
            record("X", "B", 80.0, "Moderate"),
        ];
        subset_records.push(AirQualityRecord::builder().country("X").city("C").build());
        let subset = Dataset::from_records(subset_records);

        let metrics = MetricsSummarizer::new().summarize(&subset);
        assert_eq!(metrics.count, 3);
        assert_eq!(metrics.avg_aqi, Some(65.0));
        assert_eq!(metrics.max_aqi, Some(80));
        // Blank category label is not a candidate
        assert_eq!(metrics.dominant_category, Some("Good".to_string()));
    }

    #[test]
    fn test_all_aqi_values_missing() {
        let subset = Dataset::from_records(vec![AirQualityRecord::builder()
            .city("A")
            .build()]);

        let metrics = MetricsSummarizer::new().summarize(&subset);
        assert_eq!(metrics.count, 1);
        assert_eq!(metrics.display_avg_aqi(), "N/A");
        assert_eq!(metrics.display_max_aqi(), "N/A");
        assert_eq!(metrics.display_dominant_category(), "N/A");
    }

    #[test]
    fn test_max_truncates_to_integer() {
        let subset = Dataset::from_records(vec![record("X", "A", 99.9, "Moderate")]);
        let metrics = MetricsSummarizer::new().summarize(&subset);
        assert_eq!(metrics.max_aqi, Some(99));
    }

    #[test]
    fn test_dominant_category_majority() {
        let subset = Dataset::from_records(vec![
            record("X", "A", 10.0, "Good"),
            record("X", "B", 60.0, "Moderate"),
            record("X", "C", 70.0, "Moderate"),
        ]);
        assert_eq!(dominant_category(&subset), Some("Moderate".to_string()));
    }

    #[test]
    fn test_dominant_category_tie_breaks_by_sorted_label() {
        let subset = Dataset::from_records(vec![
            record("X", "A", 160.0, "Unhealthy"),
            record("X", "B", 60.0, "Moderate"),
            record("X", "C", 10.0, "Good"),
        ]);
        assert_eq!(dominant_category(&subset), Some("Good".to_string()));

        // Row order does not matter
        let reversed = Dataset::from_records(vec![
            record("X", "C", 10.0, "Good"),
            record("X", "B", 60.0, "Moderate"),
            record("X", "A", 160.0, "Unhealthy"),
        ]);
        assert_eq!(dominant_category(&reversed), Some("Good".to_string()));
    }

    #[test]
    fn test_summary_text() {
        let summary = Metrics::empty().summary();
        assert!(summary.contains("Locations: 0"));
        assert!(summary.contains("Average AQI: N/A"));
    }
}
