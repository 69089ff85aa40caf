//! Trainmap CLI
//!
//! Thin glue around the library: load cells, render, write files.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use trainmap::rendering::grid::load_records_from_path;
use trainmap::rendering::{normalize_with, RasterBuffer};
use trainmap::stations::StationDirectory;
use trainmap::{pipeline, Delivery, RenderConfig};

#[derive(Parser)]
#[command(name = "trainmap")]
#[command(about = "Render a cell grid into a normalized departure-board image", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the composed HTML document
    Html {
        /// JSON cells file
        #[arg(long)]
        cells: PathBuf,
        #[arg(long, default_value = "trainmap_table.html")]
        output: PathBuf,
        /// Current time label for highlighted destinations (defaults to now)
        #[arg(long)]
        time: Option<String>,
    },

    /// Render cells through headless Chrome and write the normalized PNG
    Render {
        #[arg(long)]
        cells: PathBuf,
        #[arg(long, default_value = "trainmap_table_only.png")]
        output: PathBuf,
        #[arg(long)]
        time: Option<String>,
        /// CSS selector of the captured region
        #[arg(long, default_value = "table")]
        selector: String,
        /// Document delivery: `served` or `file`
        #[arg(long, default_value = "served")]
        delivery: Delivery,
        #[arg(long, default_value_t = 15_000)]
        timeout_ms: u64,
        /// Also write the capture before normalization
        #[arg(long)]
        raw: Option<PathBuf>,
        /// Annotate destinations with station numbers before rendering
        #[arg(long)]
        stations: Option<PathBuf>,
    },

    /// Apply the normalization recipe to an existing PNG
    Normalize {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
        #[arg(long, default_value_t = 1200)]
        max_width: u32,
    },

    /// Attach station numbers to destination cells
    Annotate {
        #[arg(long)]
        cells: PathBuf,
        /// `eva_number;station_name` list
        #[arg(long)]
        stations: PathBuf,
        #[arg(long, default_value = "trainmap_with_eva.json")]
        output: PathBuf,
    },
}

fn current_time_label(explicit: Option<String>) -> String {
    explicit.unwrap_or_else(|| chrono::Local::now().format("%H:%M:%S").to_string())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Html { cells, output, time } => {
            let records = load_records_from_path(&cells)
                .with_context(|| format!("Failed to load cells from {}", cells.display()))?;
            let html = pipeline::render_document(&records, Some(&current_time_label(time)));
            std::fs::write(&output, html).with_context(|| format!("Failed to write {}", output.display()))?;
            info!("HTML document saved as {}", output.display());
        }

        Commands::Render {
            cells,
            output,
            time,
            selector,
            delivery,
            timeout_ms,
            raw,
            stations,
        } => {
            let mut records = load_records_from_path(&cells)
                .with_context(|| format!("Failed to load cells from {}", cells.display()))?;
            if let Some(path) = stations {
                let directory = StationDirectory::from_path(&path)
                    .with_context(|| format!("Failed to load stations from {}", path.display()))?;
                directory.annotate(&mut records);
            }

            let config = RenderConfig {
                region_selector: selector,
                delivery,
                timeout_ms,
                ..Default::default()
            };
            let captured = render(&records, &current_time_label(time), &config)?;
            if let Some(path) = raw {
                std::fs::write(&path, &captured.data)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                info!("Raw capture saved as {}", path.display());
            }
            let image = normalize_with(&captured, &config.normalize)?;
            image
                .save(&output)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            info!("Table screenshot saved as {}", output.display());
        }

        Commands::Normalize { input, output, max_width } => {
            let data = std::fs::read(&input).with_context(|| format!("Failed to read {}", input.display()))?;
            let raw = RasterBuffer::from_encoded(data)?;
            let options = trainmap::NormalizeOptions {
                max_width,
                ..Default::default()
            };
            let image = normalize_with(&raw, &options)?;
            image
                .save(&output)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            info!("Normalized image saved as {} ({}x{})", output.display(), image.width(), image.height());
        }

        Commands::Annotate { cells, stations, output } => {
            let mut records = load_records_from_path(&cells)
                .with_context(|| format!("Failed to load cells from {}", cells.display()))?;
            let directory = StationDirectory::from_path(&stations)
                .with_context(|| format!("Failed to load stations from {}", stations.display()))?;
            let unknown = directory.annotate(&mut records);
            let json = serde_json::to_string_pretty(&records)?;
            std::fs::write(&output, json).with_context(|| format!("Failed to write {}", output.display()))?;
            info!(
                "Updated cells with station numbers saved to {} ({} unknown)",
                output.display(),
                unknown
            );
        }
    }

    Ok(())
}

#[cfg(feature = "cdp")]
fn render(
    records: &[trainmap::CellRecord],
    current_time: &str,
    config: &RenderConfig,
) -> Result<RasterBuffer> {
    let mut backend = trainmap::cdp::CdpBackend::launch(config)?;
    Ok(pipeline::run_capture(&mut backend, records, Some(current_time), config)?)
}

#[cfg(not(feature = "cdp"))]
fn render(
    _records: &[trainmap::CellRecord],
    _current_time: &str,
    _config: &RenderConfig,
) -> Result<RasterBuffer> {
    anyhow::bail!("rendering requires the 'cdp' feature; rebuild with --features cdp")
}
