use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::models::Pollutant;

#[derive(Parser)]
#[command(name = "aqi-dashboard")]
#[command(about = "Air quality dashboard pipeline: filter, summarize and chart AQI datasets")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Configuration file (TOML, YAML or JSON)")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Hide progress spinners")]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the dashboard for a filter state
    Render {
        #[arg(short, long, help = "Input CSV file")]
        input: PathBuf,

        #[arg(long, help = "Country filter [default: All]")]
        country: Option<String>,

        #[arg(long, help = "City filter [default: All]")]
        city: Option<String>,

        #[arg(
            short,
            long,
            default_value = "co",
            help = "Pollutant for the distribution chart (co, ozone, no2, pm25)"
        )]
        pollutant: Pollutant,

        #[arg(
            short,
            long,
            help = "Output directory [default: output/aqi-dashboard-{YYMMDD}]"
        )]
        output_dir: Option<PathBuf>,
    },

    /// Check that a file parses and carries every required column
    Validate {
        #[arg(short, long, help = "Input CSV file")]
        input: PathBuf,
    },

    /// List the country and city selector options
    Domains {
        #[arg(short, long, help = "Input CSV file")]
        input: PathBuf,
    },

    /// Write the filtered rows as CSV
    Export {
        #[arg(short, long, help = "Input CSV file")]
        input: PathBuf,

        #[arg(long)]
        country: Option<String>,

        #[arg(long)]
        city: Option<String>,

        #[arg(
            short,
            long,
            help = "Output CSV path [default: filtered_air_quality_data.csv]"
        )]
        output: Option<PathBuf>,
    },

    /// Display a preview and whole-dataset KPIs
    Info {
        #[arg(short, long, help = "Input CSV file")]
        input: PathBuf,

        #[arg(short, long, default_value = "5")]
        sample: usize,
    },
}
