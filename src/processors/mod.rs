pub mod filter_engine;
pub mod metrics;
pub mod pipeline;
pub mod schema_validator;

pub use filter_engine::{FilterDomains, FilterEngine, FilterState};
pub use metrics::{Metrics, MetricsSummarizer};
pub use pipeline::{render, DashboardSession, RenderResult};
pub use schema_validator::{missing_columns, ColumnIndex, SchemaValidator};
