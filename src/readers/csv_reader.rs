use encoding_rs::UTF_8;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};
use validator::Validate;

use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use crate::models::{AirQualityRecord, DataRow, Dataset};
use crate::processors::schema_validator::{ColumnIndex, SchemaValidator};
use crate::utils::constants::{COL_CITY, COL_COUNTRY, MISSING_VALUE_MARKERS};

/// An uploaded table after header and text normalization, before typing
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

pub struct CsvReader {
    max_bytes: Option<u64>,
    strict_validation: bool,
}

impl CsvReader {
    pub fn new() -> Self {
        Self {
            max_bytes: None,
            strict_validation: false,
        }
    }

    pub fn from_config(config: &DashboardConfig) -> Self {
        Self {
            max_bytes: config.max_upload_bytes,
            strict_validation: config.strict_validation,
        }
    }

    pub fn with_max_bytes(mut self, max_bytes: Option<u64>) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn with_strict_validation(mut self, strict: bool) -> Self {
        self.strict_validation = strict;
        self
    }

    /// Read, validate and type an uploaded file in one step.
    pub fn load_dataset(&self, bytes: &[u8]) -> Result<Dataset> {
        let table = self.read_table(bytes)?;
        let index = SchemaValidator::new().validate(&table)?;
        self.build_dataset(table, &index)
    }

    pub fn load_path(&self, path: &Path) -> Result<Dataset> {
        let bytes = fs::read(path)?;
        debug!(path = %path.display(), bytes = bytes.len(), "Read upload from disk");
        self.load_dataset(&bytes)
    }

    /// Parse delimited text into a [`RawTable`].
    ///
    /// Headers are trimmed; `Country` and `City` values are trimmed when
    /// those columns exist. Anything that is not well-formed delimited text
    /// fails with [`DashboardError::Parse`].
    pub fn read_table(&self, bytes: &[u8]) -> Result<RawTable> {
        if let Some(limit) = self.max_bytes {
            if bytes.len() as u64 > limit {
                return Err(DashboardError::Parse(format!(
                    "upload is {} bytes, limit is {} bytes",
                    bytes.len(),
                    limit
                )));
            }
        }

        // Sniffs a BOM (UTF-8 or UTF-16) and falls back to UTF-8
        let (text, encoding, had_errors) = UTF_8.decode(bytes);
        if had_errors {
            return Err(DashboardError::Parse(format!(
                "content is not valid {} text",
                encoding.name()
            )));
        }

        if text.trim().is_empty() {
            return Err(DashboardError::Parse("no columns to parse from file".to_string()));
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| DashboardError::Parse(e.to_string()))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let country_idx = headers.iter().position(|h| h == COL_COUNTRY);
        let city_idx = headers.iter().position(|h| h == COL_CITY);

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| DashboardError::Parse(e.to_string()))?;
            let mut fields: Vec<String> = record.iter().map(|f| f.to_string()).collect();

            for idx in [country_idx, city_idx].into_iter().flatten() {
                if let Some(value) = fields.get_mut(idx) {
                    let trimmed = value.trim();
                    if trimmed.len() != value.len() {
                        *value = trimmed.to_string();
                    }
                }
            }

            rows.push(fields);
        }

        info!(
            columns = headers.len(),
            rows = rows.len(),
            encoding = encoding.name(),
            "Parsed uploaded table"
        );

        Ok(RawTable { headers, rows })
    }

    /// Convert validated raw rows into typed records.
    pub fn build_dataset(&self, table: RawTable, index: &ColumnIndex) -> Result<Dataset> {
        let mut rows = Vec::with_capacity(table.rows.len());
        let mut out_of_range = 0usize;

        for (row_idx, fields) in table.rows.into_iter().enumerate() {
            let record = parse_record(&fields, index, row_idx + 1)?;

            if let Err(e) = record.validate() {
                if self.strict_validation {
                    return Err(DashboardError::Validation(e));
                }
                out_of_range += 1;
                debug!(row = row_idx + 1, error = %e, "Row has out-of-range values");
            }

            rows.push(DataRow::new(record, fields));
        }

        if out_of_range > 0 {
            warn!(rows = out_of_range, "Rows with out-of-range values were kept");
        }

        Ok(Dataset::new(table.headers, rows))
    }
}

impl Default for CsvReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse one raw row; `row_number` is 1-based and excludes the header.
///
/// Blank numeric cells and missing-value markers are read as `None`.
fn parse_record(fields: &[String], index: &ColumnIndex, row_number: usize) -> Result<AirQualityRecord> {
    let text = |idx: usize| -> String { fields.get(idx).cloned().unwrap_or_default() };

    let number = |column: &str, idx: usize| -> Result<Option<f64>> {
        let raw = fields.get(idx).map(|s| s.trim()).unwrap_or("");
        if MISSING_VALUE_MARKERS.contains(&raw) {
            return Ok(None);
        }
        let value = raw.parse::<f64>().map_err(|_| {
            DashboardError::Parse(format!(
                "row {}: column '{}' has non-numeric value '{}'",
                row_number, column, raw
            ))
        })?;
        Ok(Some(value).filter(|v| !v.is_nan()))
    };

    let numeric = index.numeric_columns();

    Ok(AirQualityRecord {
        country: text(index.country),
        city: text(index.city),
        aqi_value: number(numeric[0].0, numeric[0].1)?,
        aqi_category: text(index.aqi_category),
        co_aqi_value: number(numeric[1].0, numeric[1].1)?,
        ozone_aqi_value: number(numeric[2].0, numeric[2].1)?,
        no2_aqi_value: number(numeric[3].0, numeric[3].1)?,
        pm25_aqi_value: number(numeric[4].0, numeric[4].1)?,
        lat: number(numeric[5].0, numeric[5].1)?,
        lng: number(numeric[6].0, numeric[6].1)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "Country,City,AQI Value,AQI Category,CO AQI Value,Ozone AQI Value,NO2 AQI Value,PM2.5 AQI Value,lat,lng";

    fn sample_csv() -> String {
        format!(
            "{}\n\
             India , Delhi ,152,Unhealthy,3,40,12,152,28.61,77.20\n\
             Chile,Santiago,55,Moderate,1,30,5,55,-33.45,-70.66\n",
            HEADER
        )
    }

    #[test]
    fn test_headers_and_text_columns_are_trimmed() -> Result<()> {
        let csv = " Country ,City, AQI Value\n  India ,  Delhi , 152 \n";
        let table = CsvReader::new().read_table(csv.as_bytes())?;

        assert_eq!(table.headers, vec!["Country", "City", "AQI Value"]);
        // Only Country and City are normalized
        assert_eq!(table.rows[0], vec!["India", "Delhi", " 152 "]);

        Ok(())
    }

    #[test]
    fn test_load_dataset_types_records() -> Result<()> {
        let dataset = CsvReader::new().load_dataset(sample_csv().as_bytes())?;

        assert_eq!(dataset.len(), 2);
        let delhi = &dataset.rows()[0].record;
        assert_eq!(delhi.country, "India");
        assert_eq!(delhi.city, "Delhi");
        assert_eq!(delhi.aqi_value, Some(152.0));
        assert_eq!(delhi.aqi_category, "Unhealthy");
        assert_eq!(delhi.lng, Some(77.20));
        assert_eq!(dataset.rows()[0].fields[0], "India");

        Ok(())
    }

    #[test]
    fn test_numeric_looking_city_stays_text() -> Result<()> {
        let csv = format!("{}\nX, 1234 ,10,Good,1,1,1,1,0,0\n", HEADER);
        let dataset = CsvReader::new().load_dataset(csv.as_bytes())?;
        assert_eq!(dataset.rows()[0].record.city, "1234");
        Ok(())
    }

    #[test]
    fn test_extra_columns_preserved() -> Result<()> {
        let csv = format!(
            "{},CO AQI Category\nX,A,10,Good,1,1,1,1,0,0,Good\n",
            HEADER
        );
        let dataset = CsvReader::new().load_dataset(csv.as_bytes())?;
        assert_eq!(dataset.headers().len(), 11);
        assert_eq!(dataset.rows()[0].fields[10], "Good");
        Ok(())
    }

    #[test]
    fn test_empty_upload_is_parse_error() {
        let err = CsvReader::new().read_table(b"").unwrap_err();
        assert!(matches!(err, DashboardError::Parse(_)));

        let err = CsvReader::new().read_table(b"  \n\n").unwrap_err();
        assert!(matches!(err, DashboardError::Parse(_)));
    }

    #[test]
    fn test_ragged_rows_are_parse_error() {
        let csv = "a,b,c\n1,2\n";
        let err = CsvReader::new().read_table(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DashboardError::Parse(_)));
    }

    #[test]
    fn test_invalid_utf8_is_parse_error() {
        let bytes = [b'a', b',', b'b', b'\n', 0xff, 0xfe, 0xfd, b',', b'1', b'\n'];
        let err = CsvReader::new().read_table(&bytes).unwrap_err();
        assert!(matches!(err, DashboardError::Parse(_)));
    }

    #[test]
    fn test_utf8_bom_is_stripped() -> Result<()> {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(sample_csv().as_bytes());

        let table = CsvReader::new().read_table(&bytes)?;
        assert_eq!(table.headers[0], "Country");
        Ok(())
    }

    #[test]
    fn test_non_numeric_value_names_row_and_column() {
        let csv = format!("{}\nX,A,high,Good,1,1,1,1,0,0\n", HEADER);
        let err = CsvReader::new().load_dataset(csv.as_bytes()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("row 1"));
        assert!(message.contains("AQI Value"));
    }

    #[test]
    fn test_blank_numeric_cells_are_missing() -> Result<()> {
        let csv = format!(
            "{}\nX,A,,Good,,1,NaN,1,10.0,20.0\nX,B,40,Good,2,1,1,nan,,\n",
            HEADER
        );
        let dataset = CsvReader::new().load_dataset(csv.as_bytes())?;

        let first = &dataset.rows()[0].record;
        assert_eq!(first.aqi_value, None);
        assert_eq!(first.co_aqi_value, None);
        assert_eq!(first.no2_aqi_value, None);
        assert_eq!(first.ozone_aqi_value, Some(1.0));

        let second = &dataset.rows()[1].record;
        assert_eq!(second.pm25_aqi_value, None);
        assert_eq!(second.location(), None);
        // Raw cells are kept for export
        assert_eq!(dataset.rows()[1].fields[7], "nan");
        Ok(())
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let csv = "Country,City\nX,A\n";
        let err = CsvReader::new().load_dataset(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DashboardError::Schema { .. }));
    }

    #[test]
    fn test_upload_size_limit() {
        let reader = CsvReader::new().with_max_bytes(Some(10));
        let err = reader.read_table(sample_csv().as_bytes()).unwrap_err();
        assert!(matches!(err, DashboardError::Parse(_)));
    }

    #[test]
    fn test_strict_validation_rejects_out_of_range_rows() {
        let csv = format!("{}\nX,A,10,Good,1,1,1,1,95.0,0\n", HEADER);

        let lenient = CsvReader::new().load_dataset(csv.as_bytes());
        assert!(lenient.is_ok());

        let strict = CsvReader::new()
            .with_strict_validation(true)
            .load_dataset(csv.as_bytes());
        assert!(matches!(strict, Err(DashboardError::Validation(_))));
    }

    #[test]
    fn test_load_path() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        write!(temp_file, "{}", sample_csv())?;

        let dataset = CsvReader::new().load_path(temp_file.path())?;
        assert_eq!(dataset.len(), 2);
        Ok(())
    }
}
