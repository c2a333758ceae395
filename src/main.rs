use anyhow::{Context, Result};
use atc_traffic::{
    config::{PipelineConfig, RegionColumn, DEFAULT_INPUT},
    pipeline::{Dashboard, View},
    present::{render_grid, write_records_parquet},
    process::Selection,
};
use clap::Parser;
use std::{
    io::{self, BufRead},
    path::PathBuf,
};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Monthly air-traffic-control counts per Korean airport"
)]
struct Args {
    /// CSV export with one `YYYY.MM` column per month
    #[arg(short, long, default_value = DEFAULT_INPUT)]
    input: PathBuf,
    /// YAML file overriding encodings, column names and chart titles
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Header of the region column
    #[arg(long, conflicts_with = "first_column")]
    region_column: Option<String>,
    /// Treat the first column as the region column
    #[arg(long)]
    first_column: bool,
    /// Regions to chart (comma-separated); defaults to all
    #[arg(long, value_delimiter = ',', conflicts_with = "no_regions")]
    regions: Option<Vec<String>>,
    /// Chart nothing
    #[arg(long)]
    no_regions: bool,
    /// Print the selectable regions and exit
    #[arg(long)]
    list_regions: bool,
    /// Write the chart description as JSON
    #[arg(long)]
    chart_out: Option<PathBuf>,
    /// Write the selected long records as Parquet
    #[arg(long)]
    parquet_out: Option<PathBuf>,
    /// Skip the table view
    #[arg(long)]
    no_table: bool,
    /// Read one selection per stdin line (`*` = all, blank = none)
    #[arg(long)]
    interactive: bool,
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    // ─── 2) config: file, then flags ─────────────────────────────────
    let config = build_config(&args)?;

    // ─── 3) one pipeline run per interaction ─────────────────────────
    if args.interactive {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = line.context("reading selection from stdin")?;
            if let Err(e) = run(&args, &config, Some(&line)) {
                error!("{:#}", e);
            }
        }
        return Ok(());
    }

    if let Err(e) = run(&args, &config, None) {
        error!("{:#}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn build_config(args: &Args) -> Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_yaml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if let Some(name) = &args.region_column {
        config.region_column = RegionColumn::Named(name.clone());
    }
    if args.first_column {
        config.region_column = RegionColumn::First;
    }
    config.validate()?;
    Ok(config)
}

fn run(args: &Args, config: &PipelineConfig, line: Option<&str>) -> Result<()> {
    let dash = Dashboard::load(&args.input, config.clone())
        .with_context(|| format!("loading {}", args.input.display()))?;

    if args.list_regions {
        for region in dash.regions() {
            println!("{}", region);
        }
        return Ok(());
    }

    let selection = match (line, &args.regions) {
        (Some(line), _) => Selection::parse(line, dash.table()),
        (None, _) if args.no_regions => Selection::none(),
        (None, Some(labels)) => Selection::from_labels(labels.iter().cloned()),
        (None, None) => dash.default_selection(),
    };

    match dash.view(&selection) {
        View::EmptySelection => {
            warn!("select at least one region to draw the chart");
        }
        View::Chart { records, spec } => {
            info!(title = %spec.title, series = spec.series.len(), "chart ready");
            if let Some(path) = &args.chart_out {
                spec.write_json(path)?;
                info!(path = %path.display(), "wrote chart");
            }
            if let Some(path) = &args.parquet_out {
                write_records_parquet(path, &records)?;
            }
        }
    }

    if !args.no_table {
        print!("{}", render_grid(dash.table()));
    }
    Ok(())
}
