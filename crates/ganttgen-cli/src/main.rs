//! ganttgen CLI - Gantt chart generator
//!
//! Turns an effort-day task spreadsheet into an SVG Gantt chart with
//! planned/completed progress bars and milestone markers.

mod config;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use config::ChartConfig;
use ganttgen_core::{compute, sort_by_group_desc, TaskRow};
use ganttgen_ingest::template;
use ganttgen_render::SvgRenderer;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "ganttgen")]
#[command(author, version, about = "Gantt chart generator", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a fillable task template (.csv or .xlsx, by extension)
    Template {
        /// Output file path
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
    },

    /// Validate a task spreadsheet without rendering
    Check {
        /// Input file path
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Render a task spreadsheet as an SVG Gantt chart
    Render {
        /// Input file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Output format (svg, json)
        #[arg(short, long, default_value = "svg")]
        format: String,

        /// Chart configuration (TOML: sizing and group colors)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Chart area width in pixels
        #[arg(long)]
        width: Option<u32>,

        /// Row height in pixels
        #[arg(long)]
        row_height: Option<u32>,

        /// Font size in pixels
        #[arg(long)]
        font_size: Option<u32>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::from_default_env(),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Template { output } => write_template(&output),
        Commands::Check { file } => check(&file),
        Commands::Render {
            file,
            output,
            format,
            config,
            width,
            row_height,
            font_size,
        } => render(
            &file,
            &output,
            &format,
            config.as_deref(),
            width,
            row_height,
            font_size,
        ),
    }
}

fn write_template(output: &Path) -> Result<()> {
    match output.extension().and_then(|e| e.to_str()) {
        Some("csv") => template::write_template_csv(output)?,
        Some("xlsx") => template::write_template_xlsx(output)?,
        _ => bail!(
            "unsupported template format for '{}': use a .csv or .xlsx extension",
            output.display()
        ),
    }
    println!("Created: {}", output.display());
    Ok(())
}

fn check(file: &Path) -> Result<()> {
    let rows = load_rows(file)?;
    let groups: std::collections::BTreeSet<u32> = rows.iter().map(TaskRow::group_key).collect();
    println!(
        "OK: {} task(s) across {} group(s)",
        rows.len(),
        groups.len()
    );
    Ok(())
}

fn render(
    file: &Path,
    output: &Path,
    format: &str,
    config: Option<&Path>,
    width: Option<u32>,
    row_height: Option<u32>,
    font_size: Option<u32>,
) -> Result<()> {
    let mut rows = load_rows(file)?;
    if rows.is_empty() {
        bail!("'{}' contains no task rows", file.display());
    }
    sort_by_group_desc(&mut rows);

    let chart_config = match config {
        Some(path) => ChartConfig::load(path)?,
        None => ChartConfig::default(),
    };

    let colors = chart_config.color_map(rows.iter().map(TaskRow::group_key));
    colors.validate_for(&rows)?;
    let bars = compute(&rows, &colors)?;
    tracing::debug!(tasks = bars.len(), "schedule computed");

    match format {
        "svg" => {
            let mut renderer = SvgRenderer::new();
            if let Some(width) = width.or(chart_config.width) {
                renderer = renderer.chart_width(width);
            }
            if let Some(height) = row_height.or(chart_config.row_height) {
                renderer = renderer.row_height(height);
            }
            if let Some(size) = font_size.or(chart_config.font_size) {
                renderer = renderer.font_size(size);
            }
            renderer
                .render_to_file(output, &bars)
                .with_context(|| format!("writing chart to {}", output.display()))?;
        }
        "json" => {
            let json = serde_json::to_string_pretty(&bars)?;
            std::fs::write(output, json)
                .with_context(|| format!("writing bars to {}", output.display()))?;
        }
        other => bail!("unknown output format '{other}': use svg or json"),
    }
    println!("Created: {}", output.display());
    Ok(())
}

fn load_rows(file: &Path) -> Result<Vec<TaskRow>> {
    let rows = ganttgen_ingest::read_tasks_file(file)
        .with_context(|| format!("reading tasks from {}", file.display()))?;
    tracing::info!(tasks = rows.len(), file = %file.display(), "tasks ingested");
    Ok(rows)
}
