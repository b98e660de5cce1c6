pub mod constants;
pub mod filename;
pub mod progress;

pub use constants::*;
pub use filename::{generate_default_output_dir, sanitize_export_file_name};
pub use progress::ProgressReporter;
