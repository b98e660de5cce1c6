/// Column names
pub const COL_COUNTRY: &str = "Country";
pub const COL_CITY: &str = "City";
pub const COL_AQI_VALUE: &str = "AQI Value";
pub const COL_AQI_CATEGORY: &str = "AQI Category";
pub const COL_CO_AQI: &str = "CO AQI Value";
pub const COL_OZONE_AQI: &str = "Ozone AQI Value";
pub const COL_NO2_AQI: &str = "NO2 AQI Value";
pub const COL_PM25_AQI: &str = "PM2.5 AQI Value";
pub const COL_LAT: &str = "lat";
pub const COL_LNG: &str = "lng";

/// Columns every uploaded dataset must carry, in reporting order
pub const REQUIRED_COLUMNS: [&str; 10] = [
    COL_COUNTRY,
    COL_CITY,
    COL_AQI_VALUE,
    COL_AQI_CATEGORY,
    COL_CO_AQI,
    COL_OZONE_AQI,
    COL_NO2_AQI,
    COL_PM25_AQI,
    COL_LAT,
    COL_LNG,
];

/// Selector sentinel meaning "no filter"
pub const ALL_SELECTION: &str = "All";

/// Rendering defaults
pub const DEFAULT_HISTOGRAM_BINS: usize = 40;
pub const DEFAULT_HISTOGRAM_OPACITY: f64 = 0.75;
pub const DEFAULT_TOP_N: usize = 10;
pub const DEFAULT_PREVIEW_ROWS: usize = 5;
pub const DEFAULT_MARKER_SIZE_MAX: f64 = 20.0;
pub const DEFAULT_MAP_PROJECTION: &str = "natural earth";
pub const DEFAULT_TEMPLATE: &str = "plotly_dark";
pub const VIOLIN_GRID_POINTS: usize = 64;

/// Output file names
pub const EXPORT_FILE_NAME: &str = "filtered_air_quality_data.csv";
pub const REPORT_FILE_NAME: &str = "dashboard.json";

/// Placeholder shown for KPIs of an empty subset
pub const NOT_AVAILABLE: &str = "N/A";

/// Numeric cell contents read as a missing value
pub const MISSING_VALUE_MARKERS: [&str; 13] = [
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "#N/A", "<NA>",
];
