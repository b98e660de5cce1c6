use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::Result;
use crate::processors::RenderResult;
use crate::utils::constants::REPORT_FILE_NAME;

/// Writes a rendered dashboard as pretty-printed JSON for an external
/// charting front end. The export bytes are not embedded.
pub struct ReportWriter {
    file_name: String,
}

impl ReportWriter {
    pub fn new() -> Self {
        Self {
            file_name: REPORT_FILE_NAME.to_string(),
        }
    }

    pub fn write(&self, result: &RenderResult, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);

        let writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(writer, result)?;

        info!(path = %path.display(), "Wrote dashboard report");
        Ok(path)
    }
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use crate::models::{AirQualityRecord, Dataset, Pollutant};
    use crate::processors::{render, FilterState};
    use tempfile::TempDir;

    #[test]
    fn test_report_is_valid_json() -> Result<()> {
        let dataset = Dataset::from_records(vec![AirQualityRecord::builder()
            .country("X")
            .city("A")
            .aqi(42.0, "Good")
            .build()]);
        let result = render(&dataset, &FilterState::all(), Pollutant::Co, &DashboardConfig::default())?;

        let dir = TempDir::new()?;
        let path = ReportWriter::new().write(&result, dir.path())?;

        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(path)?)?;
        assert_eq!(value["metrics"]["count"], 1);
        assert_eq!(value["charts"]["distribution"]["bin_edges"].as_array().unwrap().len(), 41);
        assert_eq!(value["export"]["file_name"], "filtered_air_quality_data.csv");
        assert!(value["export"].get("bytes").is_none());
        Ok(())
    }
}
