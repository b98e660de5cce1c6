use chrono::{Datelike, Local};
use std::path::PathBuf;

/// Generate default output directory with format: output/aqi-dashboard-{YYMMDD}
pub fn generate_default_output_dir() -> PathBuf {
    let now = Local::now();
    let year = now.year() % 100; // Get last 2 digits of year
    let month = now.month();
    let day = now.day();

    let dirname = format!("aqi-dashboard-{:02}{:02}{:02}", year, month, day);
    PathBuf::from("output").join(dirname)
}

/// Make an export file name safe to write: path separators and control
/// characters are replaced and a `.csv` extension is enforced.
pub fn sanitize_export_file_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if c == '/' || c == '\\' || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();

    let cleaned = if cleaned.is_empty() {
        crate::utils::constants::EXPORT_FILE_NAME.to_string()
    } else {
        cleaned
    };

    if cleaned.to_ascii_lowercase().ends_with(".csv") {
        cleaned
    } else {
        format!("{}.csv", cleaned)
    }
}
