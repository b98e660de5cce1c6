use std::path::Path;
use tracing::{error, info};

use crate::cli::args::{Cli, Commands};
use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use crate::models::{PreviewTable, Selection};
use crate::processors::{
    DashboardSession, FilterEngine, FilterState, MetricsSummarizer, SchemaValidator,
};
use crate::readers::CsvReader;
use crate::utils::filename::generate_default_output_dir;
use crate::utils::progress::ProgressReporter;
use crate::writers::{CsvExporter, ReportWriter};

pub fn run(cli: Cli) -> Result<()> {
    let config = DashboardConfig::load(cli.config.as_deref())?;
    let quiet = cli.quiet;

    match cli.command {
        Commands::Render {
            input,
            country,
            city,
            pollutant,
            output_dir,
        } => {
            let output_dir = output_dir.unwrap_or_else(generate_default_output_dir);

            println!("Rendering AQI dashboard...");
            println!("Input file: {}", input.display());
            println!("Output directory: {}", output_dir.display());

            let session = load_session(&input, config, quiet)?;
            let state = FilterState::from_choices(country.as_deref(), city.as_deref());
            let result = session.render(&state, pollutant)?;

            println!(
                "\nSelection: Country = {}, City = {}, Pollutant = {}",
                state.country, state.city, pollutant
            );
            println!("\n{}", result.metrics.summary());

            let report_path = ReportWriter::new().write(&result, &output_dir)?;
            let export_path = result.export.write_to(&output_dir)?;

            println!("\nDashboard report: {}", report_path.display());
            println!(
                "Filtered data: {} ({} rows)",
                export_path.display(),
                result.export.row_count
            );
            println!("Render complete!");
        }

        Commands::Validate { input } => {
            println!("Validating dataset: {}", input.display());

            let bytes = std::fs::read(&input)?;
            let reader = CsvReader::from_config(&config);
            let table = reader.read_table(&bytes)?;

            let index = match SchemaValidator::new().validate(&table) {
                Ok(index) => index,
                Err(DashboardError::Schema { missing }) => {
                    println!("❌ Missing required columns: {}", missing.join(", "));
                    return Err(DashboardError::Schema { missing });
                }
                Err(e) => return Err(e),
            };
            let dataset = reader.build_dataset(table, &index)?;

            println!("Columns: {}", dataset.headers().len());
            println!("Rows: {}", dataset.len());
            println!("✅ Dataset passed schema validation");
        }

        Commands::Domains { input } => {
            let session = load_session(&input, config, quiet)?;
            let domains = session.domains();

            println!("Countries ({}):", domains.countries.len() - 1);
            for country in &domains.countries {
                println!("  {}", country);
            }
            println!("\nCities ({}):", domains.cities.len() - 1);
            for city in &domains.cities {
                println!("  {}", city);
            }
        }

        Commands::Export {
            input,
            country,
            city,
            output,
        } => {
            let reader = CsvReader::from_config(&config);
            let dataset = reader.load_path(&input)?;

            let state = FilterState::new(
                Selection::from_option(country.as_deref()),
                Selection::from_option(city.as_deref()),
            );
            let subset = FilterEngine::new().filter(&dataset, &state);
            let artifact = CsvExporter::from_config(&config).export(&subset)?;

            let path = match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &artifact.bytes)?;
                    path
                }
                None => artifact.write_to(Path::new("."))?,
            };

            println!(
                "Exported {} of {} rows to {}",
                artifact.row_count,
                dataset.len(),
                path.display()
            );
        }

        Commands::Info { input, sample } => {
            println!("Analyzing dataset: {}", input.display());

            let session = load_session(&input, config, quiet)?;
            let dataset = session.dataset();

            println!("\nColumns ({}): {}", dataset.headers().len(), dataset.headers().join(", "));
            println!("Rows: {}", dataset.len());

            let metrics = MetricsSummarizer::new().summarize(dataset);
            println!("\n{}", metrics.summary());

            if sample > 0 {
                println!("\nSample Records (showing up to {} records):", sample);
                print_preview(&dataset.preview(sample));
            }
        }
    }

    Ok(())
}

fn load_session(input: &Path, config: DashboardConfig, quiet: bool) -> Result<DashboardSession> {
    let progress = ProgressReporter::new_spinner("Loading dataset...", quiet);

    match DashboardSession::load_path(input, config) {
        Ok(session) => {
            progress.finish_with_message(&format!("Loaded {} rows", session.dataset().len()));
            info!(path = %input.display(), "Dataset ready");
            Ok(session)
        }
        Err(e) => {
            progress.abandon();
            if e.is_fatal() {
                error!(error = %e, "Dataset rejected");
            }
            Err(e)
        }
    }
}

fn print_preview(preview: &PreviewTable) {
    println!("  {}", preview.headers.join(" | "));
    for (i, row) in preview.rows.iter().enumerate() {
        println!("  {}. {}", i + 1, row.join(" | "));
    }
}
