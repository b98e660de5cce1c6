use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use crate::models::Dataset;
use crate::utils::constants::EXPORT_FILE_NAME;
use crate::utils::filename::sanitize_export_file_name;

/// A downloadable CSV of the working subset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportArtifact {
    pub file_name: String,
    pub row_count: usize,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    /// Write the artifact into `dir` under its file name.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.bytes)?;
        info!(path = %path.display(), rows = self.row_count, "Wrote CSV export");
        Ok(path)
    }
}

pub struct CsvExporter {
    file_name: String,
}

impl CsvExporter {
    pub fn new() -> Self {
        Self {
            file_name: EXPORT_FILE_NAME.to_string(),
        }
    }

    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new().with_file_name(&config.export_file_name)
    }

    pub fn with_file_name(mut self, file_name: &str) -> Self {
        self.file_name = sanitize_export_file_name(file_name);
        self
    }

    /// Header line plus the raw fields of each row, comma-delimited with
    /// no index column. Every column of the upload is kept.
    pub fn export(&self, subset: &Dataset) -> Result<ExportArtifact> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());

        writer.write_record(subset.headers())?;
        for row in subset.rows() {
            writer.write_record(&row.fields)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| DashboardError::Io(e.into_error()))?;

        debug!(rows = subset.len(), bytes = bytes.len(), "Serialized working subset");

        Ok(ExportArtifact {
            file_name: self.file_name.clone(),
            row_count: subset.len(),
            bytes,
        })
    }
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new()
    }
}
