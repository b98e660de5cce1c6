pub mod charts;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod processors;
pub mod readers;
pub mod utils;
pub mod writers;

pub use config::DashboardConfig;
pub use error::{DashboardError, Result};
pub use processors::{render, DashboardSession, FilterState, RenderResult};
