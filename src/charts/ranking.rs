use serde::Serialize;
use std::cmp::Ordering;
use tracing::debug;

use crate::charts::spec::ChartLayout;
use crate::config::DashboardConfig;
use crate::models::{AirQualityRecord, Dataset};
use crate::utils::constants::{COL_AQI_VALUE, COL_CITY, DEFAULT_TEMPLATE, DEFAULT_TOP_N};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingBarSpec {
    pub layout: ChartLayout,
    pub orientation: String,
    pub x_column: String,
    pub y_column: String,
    /// Highest value at the top
    pub y_axis_reversed: bool,
    pub limit: usize,
    pub bars: Vec<RankingBar>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingBar {
    pub rank: usize,
    pub city: String,
    pub country: String,
    /// `None` keeps the city on the axis without a bar
    pub aqi_value: Option<f64>,
    pub category: String,
    pub color: String,
}

pub struct RankingRenderer {
    limit: usize,
    template: String,
}

impl RankingRenderer {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }

    pub fn from_config(config: &DashboardConfig) -> Self {
        Self {
            limit: config.top_n,
            template: config.template.clone(),
        }
    }

    pub fn render(&self, subset: &Dataset) -> RankingBarSpec {
        let bars: Vec<RankingBar> = top_n(subset, self.limit)
            .into_iter()
            .enumerate()
            .map(|(i, record)| RankingBar {
                rank: i + 1,
                city: record.city.clone(),
                country: record.country.clone(),
                aqi_value: record.aqi_value,
                category: record.aqi_category.clone(),
                color: record.color().to_string(),
            })
            .collect();

        debug!(bars = bars.len(), limit = self.limit, "Rendered city ranking");

        let title = format!("Top {} Most Polluted Cities", self.limit);
        RankingBarSpec {
            layout: ChartLayout::new(&title, &self.template).with_axes(COL_AQI_VALUE, COL_CITY),
            orientation: "h".to_string(),
            x_column: COL_AQI_VALUE.to_string(),
            y_column: COL_CITY.to_string(),
            y_axis_reversed: true,
            limit: self.limit,
            bars,
        }
    }
}

impl Default for RankingRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_N)
    }
}

/// The `n` rows with the highest AQI Value, descending.
///
/// Rows with equal values keep their subset order; rows without a value
/// sort after every valued row.
pub fn top_n(subset: &Dataset, n: usize) -> Vec<&AirQualityRecord> {
    let mut records: Vec<&AirQualityRecord> = subset.records().collect();
    records.sort_by(|a, b| descending_missing_last(a.aqi_value, b.aqi_value));
    records.truncate(n);
    records
}

fn descending_missing_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dataset(values: &[(&str, f64)]) -> Dataset {
        Dataset::from_records(
            values
                .iter()
                .map(|(city, aqi)| {
                    AirQualityRecord::builder()
                        .country("X")
                        .city(city)
                        .aqi(*aqi, "Moderate")
                        .build()
                })
                .collect(),
        )
    }

    #[test]
    fn test_fifteen_rows_give_ten_bars_descending() {
        let values: Vec<(String, f64)> = (0..15)
            .map(|i| (format!("City{}", i), ((i * 37) % 101) as f64))
            .collect();
        let refs: Vec<(&str, f64)> = values.iter().map(|(c, v)| (c.as_str(), *v)).collect();

        let spec = RankingRenderer::default().render(&dataset(&refs));
        assert_eq!(spec.bars.len(), 10);
        assert!(spec.bars.windows(2).all(|w| w[0].aqi_value >= w[1].aqi_value));

        let mut all: Vec<f64> = refs.iter().map(|(_, v)| *v).collect();
        all.sort_by(|a, b| b.total_cmp(a));
        let shown: Vec<f64> = spec.bars.iter().filter_map(|b| b.aqi_value).collect();
        assert_eq!(shown, all[..10].to_vec());
        assert_eq!(spec.bars[0].rank, 1);
        assert_eq!(spec.layout.title, "Top 10 Most Polluted Cities");
    }

    #[test]
    fn test_fewer_rows_than_limit() {
        let spec = RankingRenderer::default().render(&dataset(&[("A", 1.0), ("B", 3.0), ("C", 2.0)]));
        let cities: Vec<&str> = spec.bars.iter().map(|b| b.city.as_str()).collect();
        assert_eq!(cities, vec!["B", "C", "A"]);
        assert_eq!(spec.orientation, "h");
        assert!(spec.y_axis_reversed);
    }

    #[test]
    fn test_ties_keep_subset_order() {
        let subset = dataset(&[("A", 5.0), ("B", 9.0), ("C", 5.0), ("D", 5.0)]);
        let cities: Vec<&str> = top_n(&subset, 3).iter().map(|r| r.city.as_str()).collect();
        assert_eq!(cities, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_missing_values_sort_last() {
        let mut subset = dataset(&[("A", 5.0), ("B", 0.0), ("C", 9.0), ("D", 0.0)]);
        let mut rows = subset.rows().to_vec();
        rows[1].record.aqi_value = None;
        rows[3].record.aqi_value = None;
        subset = subset.with_rows(rows);

        let cities: Vec<&str> = top_n(&subset, 10).iter().map(|r| r.city.as_str()).collect();
        assert_eq!(cities, vec!["C", "A", "B", "D"]);

        let spec = RankingRenderer::new(3).render(&subset);
        let values: Vec<Option<f64>> = spec.bars.iter().map(|b| b.aqi_value).collect();
        assert_eq!(values, vec![Some(9.0), Some(5.0), None]);
    }

    #[test]
    fn test_empty_subset() {
        let spec = RankingRenderer::default().render(&dataset(&[]));
        assert!(spec.bars.is_empty());
    }
}
