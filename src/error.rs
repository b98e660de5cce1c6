use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Could not parse uploaded file: {0}")]
    Parse(String),

    #[error("Dataset is missing required columns: {}", missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("Column '{0}' is not available for charting")]
    MissingField(String),

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration load error: {0}")]
    ConfigLoad(#[from] ::config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

impl DashboardError {
    /// Errors that stop the pipeline before any metric or chart is produced.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DashboardError::Parse(_) | DashboardError::Schema { .. })
    }
}
