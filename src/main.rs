use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use eno_trace::config::Config;
use eno_trace::data::filter::FilterCriteria;
use eno_trace::export::{write_json, write_series_csv};
use eno_trace::plot::{PlotOptions, PlotOutcome};
use eno_trace::state::{MetricPanel, ViewerState};

#[derive(Parser, Debug)]
#[command(name = "eno-trace")]
#[command(about = "Browse Evosep Eno runs and extract their pump traces")]
struct Cli {
    /// Parent folder containing one subdirectory per run
    /// [default: $EVOSEP_DEFAULT_DATA_PATH]
    #[arg(long, global = true)]
    data_root: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List runs with their journal metadata
    Runs {
        #[command(flatten)]
        filter: FilterArgs,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List the metric files of a run, grouped by pump
    Metrics {
        run: String,

        #[arg(long)]
        json: bool,
    },

    /// Dump one metric file as CSV (`time_s,value`)
    Series {
        run: String,
        file: String,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build plot data for the selected runs and metrics as JSON
    Plot {
        #[command(flatten)]
        filter: FilterArgs,

        /// Run to include (repeatable); defaults to the first filtered run
        #[arg(long = "run")]
        runs: Vec<String>,

        /// Metric file to include (repeatable); defaults to Pump-HP pressure and actual flow
        #[arg(long = "metric")]
        metrics: Vec<String>,

        /// Put every trace on one y-axis
        #[arg(long)]
        single_axis: bool,

        /// Upper limit of the pressure axis
        #[arg(long)]
        pressure_max: Option<f64>,

        /// Upper limit of the flow axis
        #[arg(long)]
        flow_max: Option<f64>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Substring of the run folder name
    #[arg(long, default_value = "")]
    search: String,

    #[arg(long, default_value = "")]
    procedure: String,

    #[arg(long, default_value = "")]
    sample: String,

    #[arg(long, default_value = "")]
    vial: String,
}

impl From<FilterArgs> for FilterCriteria {
    fn from(args: FilterArgs) -> Self {
        FilterCriteria {
            name: args.search,
            procedure: args.procedure,
            sample: args.sample,
            vial: args.vial,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = match cli.data_root.as_deref() {
        Some(path) => Config::from_default_path(Some(path)),
        None => Config::from_env(),
    };
    if config.status.is_error() {
        log::error!("{}", config.status);
    } else {
        log::info!("{}", config.status);
    }

    match cli.command {
        Command::Runs { filter, json } => cmd_runs(config, filter.into(), json),
        Command::Metrics { run, json } => cmd_metrics(config, &run, json),
        Command::Series { run, file, output } => {
            cmd_series(config, &run, &file, output.as_deref())
        }
        Command::Plot {
            filter,
            runs,
            metrics,
            single_axis,
            pressure_max,
            flow_max,
            output,
        } => {
            let options = PlotOptions {
                dual_axis: !single_axis,
                pressure_max,
                flow_max,
            };
            cmd_plot(config, filter.into(), &runs, &metrics, options, output.as_deref())
        }
    }
}

fn require_root(config: &Config) -> Result<()> {
    if config.data_root.is_none() {
        bail!("{}", config.status);
    }
    Ok(())
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    })
}

fn cmd_runs(config: Config, criteria: FilterCriteria, json: bool) -> Result<()> {
    require_root(&config)?;
    let mut state = ViewerState::new(config);
    state.set_criteria(criteria);

    let mut out = io::stdout().lock();
    if json {
        return write_json(&state.runs, &mut out);
    }
    writeln!(
        out,
        "{:<40} {:<20} {:<24} {:<16} Vial",
        "Folder", "Date & Time", "Procedure", "Sample"
    )?;
    for run in &state.runs {
        writeln!(
            out,
            "{:<40} {:<20} {:<24} {:<16} {}",
            run.name,
            run.date_time(),
            run.procedure(),
            run.sample(),
            run.vial()
        )?;
    }
    Ok(())
}

fn cmd_metrics(config: Config, run: &str, json: bool) -> Result<()> {
    require_root(&config)?;
    let state = ViewerState::new(config);
    let metrics = state.catalog.metrics(run);

    let mut out = io::stdout().lock();
    if json {
        return write_json(&metrics, &mut out);
    }
    if metrics.is_empty() {
        writeln!(out, "No metrics found")?;
    }
    for (pump, refs) in &metrics {
        writeln!(out, "{pump}")?;
        for metric in refs {
            writeln!(out, "  {:<28} {}", metric.display_label(), metric.filename)?;
        }
    }
    Ok(())
}

fn cmd_series(config: Config, run: &str, file: &str, output: Option<&Path>) -> Result<()> {
    require_root(&config)?;
    let state = ViewerState::new(config);
    let Some(series) = state.catalog.series(run, file) else {
        bail!("no data in {run}/{file}");
    };
    log::info!("{run}/{file}: {} samples of {}", series.len(), series.metric_info);
    write_series_csv(&series, open_output(output)?)
}

fn cmd_plot(
    config: Config,
    criteria: FilterCriteria,
    runs: &[String],
    metrics: &[String],
    options: PlotOptions,
    output: Option<&Path>,
) -> Result<()> {
    let mut state = ViewerState::new(config);
    state.set_criteria(criteria);
    state.plot_options = options;

    if !runs.is_empty() {
        state.selected_rows = runs
            .iter()
            .filter_map(|name| state.runs.iter().position(|r| &r.name == name))
            .collect();
        if state.selected_rows.len() != runs.len() {
            log::warn!("Some requested runs are not in the filtered run table");
        }
        state.reset_metric_selection();
    }

    if !metrics.is_empty() {
        state.unselect_all_metrics();
        for metric in metrics {
            let pump = metric.split('_').next().unwrap_or_default();
            state.check_metric(pump, metric);
        }
    } else if let MetricPanel::Notice(msg) = state.metric_panel() {
        log::warn!("{msg}");
    }

    let outcome = state.build_plot();
    if let PlotOutcome::Notice { message, .. } = &outcome {
        log::warn!("{message}");
    }
    write_json(&outcome, open_output(output)?)
}
