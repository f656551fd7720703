use chrono::{Datelike, Days, Local};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

// Import from organized modules
use ccexplorer::config::{OutputConfig, VectorStoreConfig};
use ccexplorer::logging::init_tracing;
use ccexplorer::render::ForecastRenderer;
use ccexplorer::{
    CexError, CostMetric, GetCostAndUsageResponse, GetCostForecastResponse, Granularity,
    OutputFormat, Renderer, ReportInput, ReportWriter, Request, Result, compile_cost_and_usage,
    compile_forecast, curate,
};

#[derive(Debug, Parser)]
#[command(
    name = "ccexplorer",
    version,
    about = "Compile cost queries and render billing results"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the GetCostAndUsage request body for a query
    Query(QueryArgs),

    /// Print the GetCostForecast request body for a query
    Forecast(QueryArgs),

    /// Render a GetCostAndUsage response read from a file or stdin
    Report {
        #[command(flatten)]
        query: QueryArgs,

        /// Response JSON file; stdin when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// table, csv, chart or vector
        #[arg(short, long, default_value = "table", env = "CCEXPLORER_OUTPUT")]
        output: OutputFormat,

        /// Directory for CSV and chart files
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Render a GetCostForecast response read from a file or stdin
    ForecastReport {
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
struct QueryArgs {
    #[arg(short, long, default_value = "MONTHLY", env = "CCEXPLORER_GRANULARITY")]
    granularity: Granularity,

    /// Inclusive start date (YYYY-MM-DD), defaults to the first of this month
    #[arg(long)]
    start: Option<String>,

    /// Exclusive end date (YYYY-MM-DD), defaults to tomorrow
    #[arg(long)]
    end: Option<String>,

    /// Group by dimension (repeatable)
    #[arg(short = 'd', long = "dimension")]
    dimensions: Vec<String>,

    /// Group by cost allocation tag (repeatable)
    #[arg(short = 't', long = "tag")]
    tags: Vec<String>,

    /// Drop refunds, credits and discounts
    #[arg(long)]
    exclude_discounts: bool,

    /// Keep only results whose first tag has this value
    #[arg(long)]
    filter_tag: Option<String>,

    /// Keep only results with KEY=VALUE on a dimension (at most two)
    #[arg(long = "filter-dimension", value_parser = parse_key_value)]
    filter_dimensions: Vec<(String, String)>,

    /// Metric to report (repeatable), defaults to UnblendedCost
    #[arg(short, long = "metric")]
    metrics: Vec<CostMetric>,

    /// Order by bucket start instead of cost
    #[arg(long)]
    sort_by_date: bool,
}

impl QueryArgs {
    fn into_request(self, output: OutputFormat) -> Request {
        let today = Local::now().date_naive();
        let start = self.start.unwrap_or_else(|| {
            today
                .with_day(1)
                .unwrap_or(today)
                .format("%Y-%m-%d")
                .to_string()
        });
        let end = self.end.unwrap_or_else(|| {
            today
                .checked_add_days(Days::new(1))
                .unwrap_or(today)
                .format("%Y-%m-%d")
                .to_string()
        });

        let mut request = Request::new(self.granularity, start, end)
            .with_dimensions(self.dimensions)
            .with_tags(self.tags)
            .sorted_by_date(self.sort_by_date)
            .with_output(output);

        if !self.metrics.is_empty() {
            request = request.with_metrics(self.metrics);
        }
        if self.exclude_discounts {
            request = request.excluding_discounts();
        }
        if let Some(value) = self.filter_tag {
            request = request.with_tag_filter(value);
        }
        for (key, value) in self.filter_dimensions {
            request = request.with_dimension_filter(key, value);
        }

        request
    }
}

fn parse_key_value(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    Ok((key.trim().to_string(), value.trim().to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Configure rayon thread pool for optimal performance
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_cpus::get())
        .thread_name(|i| format!("ccexplorer-worker-{}", i))
        .build_global()
        .unwrap_or_else(|e| warn!("Failed to configure thread pool: {}", e));

    match cli.command {
        Command::Query(args) => {
            let request = args.into_request(OutputFormat::Table);
            request.validate()?;
            print_json(&compile_cost_and_usage(&request))
        }
        Command::Forecast(args) => {
            let request = args.into_request(OutputFormat::Table);
            request.validate()?;
            print_json(&compile_forecast(&request)?)
        }
        Command::Report {
            query,
            input,
            output,
            output_dir,
        } => {
            let mut request = query.into_request(output);
            if output == OutputFormat::Vector {
                request = request.with_vector_store(VectorStoreConfig::from_env()?);
            }
            request.validate()?;

            let response: GetCostAndUsageResponse = read_json(input.as_deref())?;
            let services = curate(&response, &request)?;
            info!(services = services.len(), format = %output, "rendering report");

            let writer = ReportWriter::for_request(&request, &OutputConfig::resolve(output_dir))?;
            writer.write(&ReportInput::new(&request, services)).await
        }
        Command::ForecastReport { input } => {
            let response: GetCostForecastResponse = read_json(input.as_deref())?;
            ForecastRenderer.write(&response).await
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let body = serde_json::to_string_pretty(value).map_err(|source| CexError::Json {
        context: "compiled request".to_string(),
        source,
    })?;
    println!("{}", body);
    Ok(())
}

// Read provider JSON from a file, or stdin when no path is given
fn read_json<T: serde::de::DeserializeOwned>(path: Option<&Path>) -> Result<T> {
    let (contents, context) = match path {
        Some(path) => (
            std::fs::read_to_string(path).map_err(|source| CexError::FileRead {
                path: path.to_path_buf(),
                source,
            })?,
            path.display().to_string(),
        ),
        None => (io::read_to_string(io::stdin())?, "stdin".to_string()),
    };

    serde_json::from_str(&contents).map_err(|source| CexError::Json { context, source })
}
