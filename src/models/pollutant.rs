use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::DashboardError;
use crate::models::AirQualityRecord;
use crate::utils::constants::{COL_CO_AQI, COL_NO2_AQI, COL_OZONE_AQI, COL_PM25_AQI};

/// Pollutant sub-metrics selectable for the violin chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Pollutant {
    #[default]
    #[serde(rename = "CO AQI Value")]
    Co,
    #[serde(rename = "Ozone AQI Value")]
    Ozone,
    #[serde(rename = "NO2 AQI Value")]
    No2,
    #[serde(rename = "PM2.5 AQI Value")]
    Pm25,
}

impl Pollutant {
    pub const ALL: [Pollutant; 4] = [
        Pollutant::Co,
        Pollutant::Ozone,
        Pollutant::No2,
        Pollutant::Pm25,
    ];

    pub fn column(&self) -> &'static str {
        match self {
            Pollutant::Co => COL_CO_AQI,
            Pollutant::Ozone => COL_OZONE_AQI,
            Pollutant::No2 => COL_NO2_AQI,
            Pollutant::Pm25 => COL_PM25_AQI,
        }
    }

    pub fn from_column(column: &str) -> Result<Self, DashboardError> {
        Pollutant::ALL
            .into_iter()
            .find(|p| p.column() == column)
            .ok_or_else(|| DashboardError::MissingField(column.to_string()))
    }

    pub fn value(&self, record: &AirQualityRecord) -> Option<f64> {
        match self {
            Pollutant::Co => record.co_aqi_value,
            Pollutant::Ozone => record.ozone_aqi_value,
            Pollutant::No2 => record.no2_aqi_value,
            Pollutant::Pm25 => record.pm25_aqi_value,
        }
    }
}

impl std::fmt::Display for Pollutant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.column())
    }
}

impl FromStr for Pollutant {
    type Err = String;

    /// Accepts the column name or a short alias (`co`, `ozone`, `no2`, `pm25`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(pollutant) = Pollutant::from_column(trimmed) {
            return Ok(pollutant);
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "co" => Ok(Pollutant::Co),
            "ozone" | "o3" => Ok(Pollutant::Ozone),
            "no2" => Ok(Pollutant::No2),
            "pm25" | "pm2.5" => Ok(Pollutant::Pm25),
            _ => Err(format!(
                "unknown pollutant '{}', expected one of: {}",
                s,
                Pollutant::ALL
                    .iter()
                    .map(|p| p.column())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}
