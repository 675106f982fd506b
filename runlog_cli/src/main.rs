use clap::{Parser, Subcommand, ValueEnum};
use runlog_core::export::{export_to_path, runner_rows, write_rows};
use runlog_core::series::{daily_totals, moving_average, person_totals, weekly_totals};
use runlog_core::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "runlog")]
#[command(about = "Running log statistics and forecasts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Overall statistics for every runner in the log
    Summary {
        /// Run log CSV (falls back to data.default_csv)
        file: Option<PathBuf>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Statistics and forecast for one runner
    Person {
        /// Runner name, exactly as written in the log
        name: String,

        /// Run log CSV (falls back to data.default_csv)
        file: Option<PathBuf>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// Moving-average window for the trend line
        #[arg(long)]
        window: Option<usize>,
    },

    /// Side-by-side metrics for all runners, alphabetical
    Compare {
        /// Run log CSV (falls back to data.default_csv)
        file: Option<PathBuf>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Parse and validate a run log without computing anything
    Check {
        /// Run log CSV (falls back to data.default_csv)
        file: Option<PathBuf>,
    },

    /// Write a derived series as CSV
    Export {
        /// Which series to write
        #[arg(value_enum)]
        kind: ExportKind,

        /// Run log CSV (falls back to data.default_csv)
        file: Option<PathBuf>,

        /// Destination file (stdout if omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Runner for the trend series
        #[arg(long, required_if_eq("kind", "trend"))]
        person: Option<String>,

        /// Moving-average window for the trend series
        #[arg(long)]
        window: Option<usize>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportKind {
    Daily,
    Weekly,
    Leaderboard,
    Runners,
    Trend,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    runlog_core::logging::init_with_level(&config.logging.level);

    match cli.command {
        Commands::Summary { file, json } => {
            let entries = load_entries(file, &config)?;
            cmd_summary(&entries, json || config.report.json)
        }
        Commands::Person {
            name,
            file,
            json,
            window,
        } => {
            let window = resolve_window(window, &config)?;
            let entries = load_entries(file, &config)?;
            cmd_person(&entries, &name, window, json || config.report.json)
        }
        Commands::Compare { file, json } => {
            let entries = load_entries(file, &config)?;
            cmd_compare(&entries, json || config.report.json)
        }
        Commands::Check { file } => {
            let entries = load_entries(file, &config)?;
            let runners = metrics_by_person(&entries);
            println!(
                "✓ {} runs from {} runners look valid",
                entries.len(),
                runners.len()
            );
            Ok(())
        }
        Commands::Export {
            kind,
            file,
            output,
            person,
            window,
        } => {
            let window = resolve_window(window, &config)?;
            let entries = load_entries(file, &config)?;
            cmd_export(&entries, kind, output.as_deref(), person.as_deref(), window)
        }
    }
}

/// Resolve the input path and run it through the parse + validate gate
fn load_entries(file: Option<PathBuf>, config: &Config) -> Result<Vec<RunEntry>> {
    let path = file.or_else(|| config.data.default_csv.clone()).ok_or_else(|| {
        Error::Config("No run log given; pass a FILE or set data.default_csv".into())
    })?;
    tracing::debug!("Loading run log from {:?}", path);
    load_file(&path)
}

/// Command-line window if given, else the configured one; 0 is rejected
fn resolve_window(window: Option<usize>, config: &Config) -> Result<usize> {
    match window {
        Some(0) => Err(Error::Config("--window must be at least 1".into())),
        Some(window) => Ok(window),
        None => Ok(config.report.moving_average_window),
    }
}

fn cmd_summary(entries: &[RunEntry], json: bool) -> Result<()> {
    let report = OverallReport::build(entries);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_header("ALL RUNNERS");
    print_metrics(&report.metrics);
    print_prediction(&report.prediction, None);

    println!();
    println!("  Leaderboard");
    for (rank, total) in report.leaderboard.iter().enumerate() {
        println!("    {}. {:<16} {:>8.1} mi", rank + 1, total.person, total.miles);
    }
    println!();

    Ok(())
}

fn cmd_person(entries: &[RunEntry], name: &str, window: usize, json: bool) -> Result<()> {
    let report = PersonReport::build(entries, name, window)
        .ok_or_else(|| Error::Other(format!("No runs found for \"{}\"", name)))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_header(&report.person);
    print_metrics(&report.metrics);
    print_prediction(&report.prediction, Some(report.month_confidence));

    println!();
    println!("  Recent runs ({}-run moving average)", window);
    let skip = report.trend_line.len().saturating_sub(10);
    for point in &report.trend_line[skip..] {
        println!(
            "    {}  {:>6.2} mi  avg {:>6.2}",
            point.date, point.miles, point.moving_average
        );
    }
    println!();

    Ok(())
}

fn cmd_compare(entries: &[RunEntry], json: bool) -> Result<()> {
    let runners = advanced_metrics_by_person(entries);

    if json {
        println!("{}", serde_json::to_string_pretty(&runners)?);
        return Ok(());
    }

    println!(
        "{:<16} {:>5} {:>9} {:>8} {:>6} {:>6}  {}",
        "RUNNER", "RUNS", "TOTAL", "AVG", "PACE", "CONS", "TREND"
    );
    for name in runners.sorted_names() {
        if let Some(m) = runners.get(name) {
            println!(
                "{:<16} {:>5} {:>9.2} {:>8.2} {:>6.2} {:>5}%  {}",
                name,
                m.basic.count,
                m.basic.total,
                m.basic.average,
                m.pace,
                m.consistency,
                m.trend
            );
        }
    }

    Ok(())
}

fn cmd_export(
    entries: &[RunEntry],
    kind: ExportKind,
    output: Option<&Path>,
    person: Option<&str>,
    window: usize,
) -> Result<()> {
    match kind {
        ExportKind::Daily => emit(output, &daily_totals(entries)),
        ExportKind::Weekly => emit(output, &weekly_totals(entries)),
        ExportKind::Leaderboard => emit(output, &person_totals(entries)),
        ExportKind::Runners => {
            emit(output, &runner_rows(&advanced_metrics_by_person(entries)))
        }
        ExportKind::Trend => {
            let name = person.ok_or_else(|| Error::Other("--person is required".into()))?;
            let runs: Vec<RunEntry> = entries
                .iter()
                .filter(|e| e.person == name)
                .cloned()
                .collect();
            if runs.is_empty() {
                return Err(Error::Other(format!("No runs found for \"{}\"", name)));
            }
            emit(output, &moving_average(&runs, window))
        }
    }
}

fn emit<T: serde::Serialize>(output: Option<&Path>, rows: &[T]) -> Result<()> {
    match output {
        Some(path) => {
            let count = export_to_path(path, rows)?;
            eprintln!("✓ Wrote {} rows to {}", count, path.display());
        }
        None => {
            write_rows(std::io::stdout().lock(), rows)?;
        }
    }
    Ok(())
}

fn print_header(title: &str) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {}", title);
    println!("╰─────────────────────────────────────────╯");
    println!();
}

fn print_metrics(metrics: &AdvancedMetrics) {
    println!("  Runs:            {}", metrics.basic.count);
    println!("  Total:           {:.1} mi", metrics.basic.total);
    println!(
        "  Average:         {:.2} mi  (min {:.2}, max {:.2})",
        metrics.basic.average, metrics.basic.min, metrics.basic.max
    );
    println!("  Pace:            {:.2} min/mi", metrics.pace);
    println!("  Consistency:     {}%", metrics.consistency);
    println!("  Trend:           {}", metrics.trend);
    println!(
        "  Weekly:          avg {:.2}, best {:.2}, worst {:.2}",
        metrics.weekly_average, metrics.best_week, metrics.worst_week
    );
}

fn print_prediction(prediction: &PerformancePrediction, month_confidence: Option<u32>) {
    println!();
    println!(
        "  → Next week:     {:.1} mi ({}% confidence)",
        prediction.next_week_prediction, prediction.confidence
    );
    println!(
        "  → Next month:    {:.1} mi ({}% confidence)",
        prediction.next_month_prediction,
        month_confidence.unwrap_or(prediction.confidence)
    );
}
