use serde::Serialize;
use tracing::debug;

use crate::charts::spec::{group_by_category, ChartLayout};
use crate::config::DashboardConfig;
use crate::models::{category_color, AirQualityRecord, Dataset};
use crate::utils::constants::{
    COL_AQI_VALUE, COL_CITY, COL_COUNTRY, DEFAULT_MAP_PROJECTION, DEFAULT_MARKER_SIZE_MAX,
    DEFAULT_TEMPLATE,
};

const TITLE: &str = "Global AQI Map";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoScatterSpec {
    pub layout: ChartLayout,
    pub projection: String,
    pub size_column: String,
    pub size_mode: String,
    /// Plotly `sizeref`: 2 * max(size) / size_max^2
    pub size_ref: f64,
    pub size_max: f64,
    pub hover_name_column: String,
    pub hover_data_columns: Vec<String>,
    pub bounds: Option<GeographicBounds>,
    pub series: Vec<GeoSeries>,
}

impl GeoScatterSpec {
    pub fn marker_count(&self) -> usize {
        self.series.iter().map(|s| s.markers.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoSeries {
    pub category: String,
    pub color: String,
    pub markers: Vec<GeoMarker>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoMarker {
    pub lat: f64,
    pub lon: f64,
    pub size: f64,
    pub hover_name: String,
    pub country: String,
    pub aqi_value: f64,
}

impl GeoMarker {
    /// Rows without coordinates or an AQI value cannot be placed or sized
    fn from_record(record: &AirQualityRecord) -> Option<Self> {
        let (lat, lon) = record.location()?;
        let aqi_value = record.aqi_value?;
        Some(Self {
            lat,
            lon,
            size: aqi_value,
            hover_name: record.city.clone(),
            country: record.country.clone(),
            aqi_value,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeographicBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl GeographicBounds {
    pub fn from_markers<'a>(markers: impl Iterator<Item = &'a GeoMarker>) -> Option<Self> {
        markers.fold(None, |acc, m| {
            Some(match acc {
                None => Self {
                    min_lat: m.lat,
                    max_lat: m.lat,
                    min_lng: m.lon,
                    max_lng: m.lon,
                },
                Some(b) => Self {
                    min_lat: b.min_lat.min(m.lat),
                    max_lat: b.max_lat.max(m.lat),
                    min_lng: b.min_lng.min(m.lon),
                    max_lng: b.max_lng.max(m.lon),
                },
            })
        })
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }
}

pub struct GeoScatterRenderer {
    projection: String,
    size_max: f64,
    template: String,
}

impl GeoScatterRenderer {
    pub fn new() -> Self {
        Self {
            projection: DEFAULT_MAP_PROJECTION.to_string(),
            size_max: DEFAULT_MARKER_SIZE_MAX,
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }

    pub fn from_config(config: &DashboardConfig) -> Self {
        Self {
            projection: config.map_projection.clone(),
            size_max: config.marker_size_max,
            template: config.template.clone(),
        }
    }

    /// One marker per row, area-scaled by AQI Value and colored by category.
    pub fn render(&self, subset: &Dataset) -> GeoScatterSpec {
        let series: Vec<GeoSeries> = group_by_category(subset)
            .into_iter()
            .filter_map(|(category, records)| {
                let markers: Vec<GeoMarker> =
                    records.into_iter().filter_map(GeoMarker::from_record).collect();
                (!markers.is_empty()).then(|| GeoSeries {
                    category: category.to_string(),
                    color: category_color(category).to_string(),
                    markers,
                })
            })
            .collect();

        let markers = || series.iter().flat_map(|s| s.markers.iter());

        let max_aqi = markers().map(|m| m.size).fold(f64::NEG_INFINITY, f64::max);
        let size_ref = if max_aqi.is_finite() && max_aqi > 0.0 {
            2.0 * max_aqi / (self.size_max * self.size_max)
        } else {
            1.0
        };
        let bounds = GeographicBounds::from_markers(markers());

        let skipped = subset.len() - markers().count();
        if skipped > 0 {
            debug!(rows = skipped, "Rows without coordinates or AQI left off the map");
        }

        let spec = GeoScatterSpec {
            layout: ChartLayout::new(TITLE, &self.template),
            projection: self.projection.clone(),
            size_column: COL_AQI_VALUE.to_string(),
            size_mode: "area".to_string(),
            size_ref,
            size_max: self.size_max,
            hover_name_column: COL_CITY.to_string(),
            hover_data_columns: vec![COL_COUNTRY.to_string(), COL_AQI_VALUE.to_string()],
            bounds,
            series,
        };

        debug!(markers = spec.marker_count(), projection = %spec.projection, "Rendered AQI map");

        spec
    }
}

impl Default for GeoScatterRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(city: &str, aqi: f64, category: &str, lat: f64, lng: f64) -> AirQualityRecord {
        AirQualityRecord::builder()
            .country("X")
            .city(city)
            .aqi(aqi, category)
            .location(lat, lng)
            .build()
    }

    #[test]
    fn test_one_marker_per_row() {
        let subset = Dataset::from_records(vec![
            record("A", 50.0, "Good", 10.0, 20.0),
            record("B", 200.0, "Very Unhealthy", -5.0, 100.0),
            record("C", 40.0, "Good", 1.0, -3.0),
        ]);

        let spec = GeoScatterRenderer::new().render(&subset);
        assert_eq!(spec.marker_count(), 3);
        assert_eq!(spec.projection, "natural earth");
        assert_eq!(spec.size_mode, "area");
        assert_eq!(spec.size_ref, 2.0 * 200.0 / 400.0);
        assert_eq!(spec.hover_name_column, "City");
        assert_eq!(spec.hover_data_columns, vec!["Country", "AQI Value"]);

        let marker = &spec.series[1].markers[0];
        assert_eq!(marker.hover_name, "B");
        assert_eq!(marker.lat, -5.0);
        assert_eq!(marker.lon, 100.0);
        assert_eq!(spec.series[1].color, "#B5179E");
    }

    #[test]
    fn test_bounds() {
        let subset = Dataset::from_records(vec![
            record("A", 50.0, "Good", 10.0, 20.0),
            record("B", 60.0, "Moderate", -30.0, 100.0),
        ]);
        let spec = GeoScatterRenderer::new().render(&subset);
        let bounds = spec.bounds.unwrap();
        assert_eq!(bounds.min_lat, -30.0);
        assert_eq!(bounds.max_lng, 100.0);
        assert_eq!(bounds.center(), (-10.0, 60.0));
    }

    #[test]
    fn test_rows_missing_coordinates_or_aqi_are_not_plotted() {
        let mut no_location = record("B", 500.0, "Hazardous", 0.0, 0.0);
        no_location.lat = None;
        let mut no_aqi = record("C", 0.0, "Good", 40.0, 40.0);
        no_aqi.aqi_value = None;

        let subset = Dataset::from_records(vec![
            record("A", 100.0, "Good", 10.0, 20.0),
            no_location,
            no_aqi,
        ]);
        let spec = GeoScatterRenderer::new().render(&subset);

        assert_eq!(spec.marker_count(), 1);
        assert_eq!(spec.series.len(), 1);
        // Sized and bounded by the plotted marker only
        assert_eq!(spec.size_ref, 2.0 * 100.0 / 400.0);
        assert_eq!(spec.bounds.unwrap().max_lat, 10.0);
    }

    #[test]
    fn test_projection_from_config() {
        let mut config = DashboardConfig::default();
        config.map_projection = "orthographic".to_string();
        let spec = GeoScatterRenderer::from_config(&config).render(&Dataset::from_records(Vec::new()));

        assert_eq!(spec.projection, "orthographic");
        assert_eq!(spec.marker_count(), 0);
        assert!(spec.bounds.is_none());
        assert_eq!(spec.size_ref, 1.0);
    }
}
