use serde::Serialize;

use crate::models::AirQualityRecord;

/// A typed record together with every raw field of its source row.
///
/// The raw fields keep columns outside the required schema so an export
/// reproduces the uploaded table exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct DataRow {
    pub record: AirQualityRecord,
    pub fields: Vec<String>,
}

impl DataRow {
    pub fn new(record: AirQualityRecord, fields: Vec<String>) -> Self {
        Self { record, fields }
    }
}

/// An ordered sequence of rows sharing one header list.
///
/// The same type serves as the working subset produced by filtering: a subset
/// always carries the headers of the dataset it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<DataRow>,
}

/// Header and raw rows shown as the table preview
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Dataset {
    pub fn new(headers: Vec<String>, rows: Vec<DataRow>) -> Self {
        Self { headers, rows }
    }

    /// Build a dataset from typed records only, synthesising the raw fields
    /// for the required columns.
    pub fn from_records(records: Vec<AirQualityRecord>) -> Self {
        let headers = crate::utils::constants::REQUIRED_COLUMNS
            .iter()
            .map(|h| h.to_string())
            .collect();

        let rows = records
            .into_iter()
            .map(|record| {
                let fields = vec![
                    record.country.clone(),
                    record.city.clone(),
                    format_number(record.aqi_value),
                    record.aqi_category.clone(),
                    format_number(record.co_aqi_value),
                    format_number(record.ozone_aqi_value),
                    format_number(record.no2_aqi_value),
                    format_number(record.pm25_aqi_value),
                    format_number(record.lat),
                    format_number(record.lng),
                ];
                DataRow::new(record, fields)
            })
            .collect();

        Self { headers, rows }
    }

    /// A dataset with the same headers and the given rows
    pub fn with_rows(&self, rows: Vec<DataRow>) -> Self {
        Self {
            headers: self.headers.clone(),
            rows,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[DataRow] {
        &self.rows
    }

    pub fn records(&self) -> impl Iterator<Item = &AirQualityRecord> + '_ {
        self.rows.iter().map(|row| &row.record)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn preview(&self, n: usize) -> PreviewTable {
        PreviewTable {
            headers: self.headers.clone(),
            rows: self
                .rows
                .iter()
                .take(n)
                .map(|row| row.fields.clone())
                .collect(),
        }
    }
}

/// Missing numbers are written back as empty cells
fn format_number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
