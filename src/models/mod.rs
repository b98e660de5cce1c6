pub mod category;
pub mod dataset;
pub mod pollutant;
pub mod record;
pub mod selection;

pub use category::{category_color, category_color_map, AqiCategory, FALLBACK_COLOR};
pub use dataset::{DataRow, Dataset, PreviewTable};
pub use pollutant::Pollutant;
pub use record::{AirQualityRecord, AirQualityRecordBuilder};
pub use selection::Selection;
