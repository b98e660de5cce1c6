use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::category::{category_color, AqiCategory};

/// One typed row of an uploaded air-quality table.
///
/// Numeric cells left blank (or holding a missing-value marker such as `NaN`)
/// are `None` and are skipped by the metrics and charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AirQualityRecord {
    pub country: String,

    pub city: String,

    #[validate(range(min = 0.0))]
    pub aqi_value: Option<f64>,

    pub aqi_category: String,

    #[validate(range(min = 0.0))]
    pub co_aqi_value: Option<f64>,

    #[validate(range(min = 0.0))]
    pub ozone_aqi_value: Option<f64>,

    #[validate(range(min = 0.0))]
    pub no2_aqi_value: Option<f64>,

    #[validate(range(min = 0.0))]
    pub pm25_aqi_value: Option<f64>,

    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: Option<f64>,
}

impl AirQualityRecord {
    pub fn builder() -> AirQualityRecordBuilder {
        AirQualityRecordBuilder::new()
    }

    pub fn category(&self) -> Option<AqiCategory> {
        AqiCategory::parse(&self.aqi_category)
    }

    pub fn color(&self) -> &'static str {
        category_color(&self.aqi_category)
    }

    /// (lat, lng) when both coordinates are present
    pub fn location(&self) -> Option<(f64, f64)> {
        self.lat.zip(self.lng)
    }
}

/// Builder used by tests, benchmarks and callers assembling records by hand
pub struct AirQualityRecordBuilder {
    country: Option<String>,
    city: Option<String>,
    aqi_value: Option<f64>,
    aqi_category: Option<String>,
    co_aqi_value: Option<f64>,
    ozone_aqi_value: Option<f64>,
    no2_aqi_value: Option<f64>,
    pm25_aqi_value: Option<f64>,
    lat: Option<f64>,
    lng: Option<f64>,
}

impl Default for AirQualityRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AirQualityRecordBuilder {
    pub fn new() -> Self {
        Self {
            country: None,
            city: None,
            aqi_value: None,
            aqi_category: None,
            co_aqi_value: None,
            ozone_aqi_value: None,
            no2_aqi_value: None,
            pm25_aqi_value: None,
            lat: None,
            lng: None,
        }
    }

    pub fn country(mut self, country: &str) -> Self {
        self.country = Some(country.to_string());
        self
    }

    pub fn city(mut self, city: &str) -> Self {
        self.city = Some(city.to_string());
        self
    }

    pub fn aqi(mut self, value: f64, category: &str) -> Self {
        self.aqi_value = Some(value);
        self.aqi_category = Some(category.to_string());
        self
    }

    pub fn pollutants(mut self, co: f64, ozone: f64, no2: f64, pm25: f64) -> Self {
        self.co_aqi_value = Some(co);
        self.ozone_aqi_value = Some(ozone);
        self.no2_aqi_value = Some(no2);
        self.pm25_aqi_value = Some(pm25);
        self
    }

    pub fn location(mut self, lat: f64, lng: f64) -> Self {
        self.lat = Some(lat);
        self.lng = Some(lng);
        self
    }

    /// Missing text fields become empty strings; unset numbers stay missing
    pub fn build(self) -> AirQualityRecord {
        AirQualityRecord {
            country: self.country.unwrap_or_default(),
            city: self.city.unwrap_or_default(),
            aqi_value: self.aqi_value,
            aqi_category: self.aqi_category.unwrap_or_default(),
            co_aqi_value: self.co_aqi_value,
            ozone_aqi_value: self.ozone_aqi_value,
            no2_aqi_value: self.no2_aqi_value,
            pm25_aqi_value: self.pm25_aqi_value,
            lat: self.lat,
            lng: self.lng,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_validation() {
        let record = AirQualityRecord::builder()
            .country("India")
            .city("Delhi")
            .aqi(152.0, "Unhealthy")
            .pollutants(3.0, 40.0, 12.0, 152.0)
            .location(28.6139, 77.2090)
            .build();

        assert!(record.validate().is_ok());
        assert_eq!(record.category(), Some(AqiCategory::Unhealthy));
        assert_eq!(record.color(), "#FF3B3B");
    }

    #[test]
    fn test_invalid_coordinates() {
        let record = AirQualityRecord::builder()
            .country("Nowhere")
            .city("Invalid")
            .aqi(10.0, "Good")
            .location(91.0, 0.0) // Invalid latitude
            .build();

        assert!(record.validate().is_err());
    }

    #[test]
    fn test_negative_aqi_rejected() {
        let record = AirQualityRecord::builder().aqi(-1.0, "Good").build();
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_missing_values_pass_validation() {
        let record = AirQualityRecord::builder().country("X").city("A").build();

        assert!(record.validate().is_ok());
        assert_eq!(record.aqi_value, None);
        assert_eq!(record.location(), None);
    }
}
