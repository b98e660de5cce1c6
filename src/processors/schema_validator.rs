use tracing::{debug, warn};

use crate::error::{DashboardError, Result};
use crate::readers::RawTable;
use crate::utils::constants::REQUIRED_COLUMNS;

/// Header positions of the ten required columns within an uploaded table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndex {
    pub country: usize,
    pub city: usize,
    pub aqi_value: usize,
    pub aqi_category: usize,
    pub co_aqi_value: usize,
    pub ozone_aqi_value: usize,
    pub no2_aqi_value: usize,
    pub pm25_aqi_value: usize,
    pub lat: usize,
    pub lng: usize,
}

impl ColumnIndex {
    /// (column name, position) pairs for the numeric columns
    pub fn numeric_columns(&self) -> [(&'static str, usize); 7] {
        [
            (REQUIRED_COLUMNS[2], self.aqi_value),
            (REQUIRED_COLUMNS[4], self.co_aqi_value),
            (REQUIRED_COLUMNS[5], self.ozone_aqi_value),
            (REQUIRED_COLUMNS[6], self.no2_aqi_value),
            (REQUIRED_COLUMNS[7], self.pm25_aqi_value),
            (REQUIRED_COLUMNS[8], self.lat),
            (REQUIRED_COLUMNS[9], self.lng),
        ]
    }
}

/// Required columns absent from `headers`, in required-list order
pub fn missing_columns(headers: &[String]) -> Vec<String> {
    REQUIRED_COLUMNS
        .iter()
        .filter(|required| !headers.iter().any(|h| h == *required))
        .map(|required| required.to_string())
        .collect()
}

pub struct SchemaValidator;

impl SchemaValidator {
    pub fn new() -> Self {
        Self
    }

    /// Confirm every required column is present and resolve its position.
    pub fn validate(&self, table: &RawTable) -> Result<ColumnIndex> {
        self.validate_headers(&table.headers)
    }

    pub fn validate_headers(&self, headers: &[String]) -> Result<ColumnIndex> {
        let missing = missing_columns(headers);
        if !missing.is_empty() {
            warn!(missing = ?missing, "Dataset is missing required columns");
            return Err(DashboardError::Schema { missing });
        }

        // First occurrence wins when a header is duplicated
        let position = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| DashboardError::Schema {
                    missing: vec![name.to_string()],
                })
        };

        let index = ColumnIndex {
            country: position(REQUIRED_COLUMNS[0])?,
            city: position(REQUIRED_COLUMNS[1])?,
            aqi_value: position(REQUIRED_COLUMNS[2])?,
            aqi_category: position(REQUIRED_COLUMNS[3])?,
            co_aqi_value: position(REQUIRED_COLUMNS[4])?,
            ozone_aqi_value: position(REQUIRED_COLUMNS[5])?,
            no2_aqi_value: position(REQUIRED_COLUMNS[6])?,
            pm25_aqi_value: position(REQUIRED_COLUMNS[7])?,
            lat: position(REQUIRED_COLUMNS[8])?,
            lng: position(REQUIRED_COLUMNS[9])?,
        };

        debug!(columns = headers.len(), "Schema validation passed");
        Ok(index)
    }
}

impl Default for SchemaValidator {
    fn default() -> Self {
        Self::new()
    }
}
