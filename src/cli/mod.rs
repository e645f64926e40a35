use clap::{Args, Parser, Subcommand, ValueEnum};
use std::ffi::OsString;
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::core::{CAP, MONTH_NAMES, Preset, Scenario, run_scenarios};
use crate::error::CliResult;
use crate::input::{ScenarioRequest, parse_annual_estimate, parse_start_month};
use crate::report::{
    ChartOptions, ScenarioReport, format_currency, format_month_table, scenario_chart,
    smoothing_chart,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliPreset {
    Custom,
    HighCostOncology,
    InsulinDependent,
    ChronicMixedMeds,
    OccasionalUser,
}

impl From<CliPreset> for Preset {
    fn from(value: CliPreset) -> Self {
        match value {
            CliPreset::Custom => Preset::Custom,
            CliPreset::HighCostOncology => Preset::HighCostOncology,
            CliPreset::InsulinDependent => Preset::InsulinDependent,
            CliPreset::ChronicMixedMeds => Preset::ChronicMixedMeds,
            CliPreset::OccasionalUser => Preset::OccasionalUser,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "capsmooth",
    version,
    about = "Monthly out of pocket spending under an annual cap, with and without smoothing"
)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the browser explorer and JSON API
    Serve(ServeArgs),
    /// Compute all three scenarios for one estimate
    Calc(CalcArgs),
    /// Prompt for an estimate and start month
    Interactive(ChartArgs),
    /// Print the fixed demonstration scenarios
    Demo(ChartArgs),
    /// List the persona presets
    Presets,
}

#[derive(Args, Debug)]
struct ServeArgs {
    #[arg(long, env = "CAPSMOOTH_PORT", default_value_t = 8080)]
    port: u16,
    #[arg(long, env = "CAPSMOOTH_BIND", default_value = "0.0.0.0")]
    bind: IpAddr,
}

#[derive(Args, Debug)]
struct CalcArgs {
    #[arg(
        long,
        allow_negative_numbers = true,
        help = "Estimated annual out of pocket spending before the cap; defaults to the preset's"
    )]
    annual_estimate: Option<f64>,
    #[arg(
        long,
        allow_negative_numbers = true,
        help = "Month the monthly payment plan starts (1-12); defaults to the preset's, else 1"
    )]
    start_month: Option<i64>,
    #[arg(long, value_enum)]
    preset: Option<CliPreset>,
    #[arg(long, help = "Write the three-scenario chart as SVG to this path")]
    chart: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Args, Debug)]
struct ChartArgs {
    #[arg(long, help = "Write the smoothing comparison chart as SVG to this path")]
    chart: Option<PathBuf>,
}

/// Run using the current process arguments.
pub async fn run() -> CliResult<()> {
    run_with_args(std::env::args_os()).await
}

pub async fn run_with_args<I, T>(args: I) -> CliResult<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);
    init_tracing(cli.verbose);

    match cli.command {
        Command::Serve(args) => {
            let addr = SocketAddr::new(args.bind, args.port);
            crate::api::run_http_server(addr).await?;
        }
        Command::Calc(args) => {
            let (output, request) = calc(&args)?;
            if let Some(path) = &args.chart {
                let svg = scenario_chart(&request.run(), &ChartOptions::default());
                write_chart(path, &svg)?;
            }
            print!("{output}");
        }
        Command::Interactive(args) => interactive(&args)?,
        Command::Demo(args) => {
            print!("{}", demo_report());
            if let Some(path) = &args.chart {
                write_chart(path, &demo_chart())?;
            }
        }
        Command::Presets => print!("{}", presets_listing()),
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time(),
        )
        .init();
}

fn write_chart(path: &Path, svg: &str) -> CliResult<()> {
    fs::write(path, svg)?;
    info!(path = %path.display(), "chart written");
    Ok(())
}

fn calc(args: &CalcArgs) -> CliResult<(String, ScenarioRequest)> {
    let request = ScenarioRequest::resolve(
        args.preset.map(Preset::from),
        args.annual_estimate,
        args.start_month,
    )?;
    debug!(?request, "calc request resolved");

    let report = ScenarioReport::build(&request);
    let output = match args.format {
        OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => calc_text(&report),
    };
    Ok((output, request))
}

fn calc_text(report: &ScenarioReport) -> String {
    let set = &report.scenarios;
    let summary = &report.summary;
    let mut out = format!(
        "Annual estimate: {}   Start month: {} ({})   Preset: {}\n\n",
        format_currency(set.annual_estimate, 2),
        set.start_month,
        MONTH_NAMES[(set.start_month - 1) as usize],
        report.preset,
    );
    for scenario in Scenario::ALL {
        out.push_str(&format_month_table(scenario.label(), set.series(scenario)));
    }
    out.push('\n');
    for (label, value) in [
        ("Total paid without a cap:", summary.uncapped.total),
        ("Total paid with the cap:", summary.capped.total),
        ("Total paid with cap and smoothing:", summary.smoothed.total),
        ("Amount avoided by the cap:", summary.amount_avoided),
    ] {
        out.push_str(&format!("{label:<36}{}\n", format_currency(value, 2)));
    }
    out.push('\n');
    out.push_str(&report.narrative);
    out
}

fn interactive(args: &ChartArgs) -> CliResult<()> {
    println!("Out of Pocket Cap Calculator");
    println!("----------------------------");
    println!(
        "This tool uses a simplified model to illustrate the {} annual cap",
        format_currency(CAP, 0)
    );
    println!("and the optional monthly payment (smoothing) plan.\n");

    let annual_text: String = dialoguer::Input::new()
        .with_prompt("Estimated annual out of pocket spending before the cap ($)")
        .validate_with(|input: &String| -> Result<(), String> {
            parse_annual_estimate(input)
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact_text()?;
    let month_text: String = dialoguer::Input::new()
        .with_prompt("Month you enroll in the monthly payment option (1 = January, 12 = December)")
        .validate_with(|input: &String| -> Result<(), String> {
            parse_start_month(input)
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact_text()?;

    let annual_estimate = parse_annual_estimate(&annual_text)?;
    let start_month = parse_start_month(&month_text)?;
    print!("{}", interactive_results(annual_estimate, start_month));

    if let Some(path) = &args.chart {
        let options = ChartOptions {
            title: Some(format!(
                "Monthly payments, annual estimate {}, smoothing start month {}",
                format_currency(annual_estimate, 0),
                start_month
            )),
            ..ChartOptions::default()
        };
        let set = run_scenarios(annual_estimate, i64::from(start_month));
        write_chart(path, &smoothing_chart(&set, &options))?;
    }
    Ok(())
}

fn interactive_results(annual_estimate: f64, start_month: u32) -> String {
    let summary = run_scenarios(annual_estimate, i64::from(start_month)).summary();
    let cap = format_currency(CAP, 0);
    format!(
        "\nRESULTS\n\
         -------\n\
         Total paid WITHOUT smoothing (capped at {cap}): {}\n\
         Total paid WITH smoothing (capped at {cap}):    {}\n\
         \n\
         Note: The monthly payment plan does not reduce your total cost; \
         it spreads payments over remaining months.\n",
        format_currency(summary.capped.total, 2),
        format_currency(summary.smoothed.total, 2),
    )
}

/// Fixed walk-through: a high spender with and without smoothing, then a
/// lower spender smoothing from January.
fn demo_report() -> String {
    let high = run_scenarios(3000.0, 1);
    let high_july = run_scenarios(3000.0, 7);
    let low = run_scenarios(1500.0, 1);

    [
        format_month_table("No smoothing, annual estimate $3,000", &high.capped),
        format_month_table(
            "Smoothing ON from January, annual estimate $3,000",
            &high.smoothed,
        ),
        format_month_table(
            "Smoothing ON from July, annual estimate $3,000",
            &high_july.smoothed,
        ),
        format_month_table(
            "Smoothing ON from January, annual estimate $1,500",
            &low.smoothed,
        ),
    ]
    .concat()
}

fn demo_chart() -> String {
    let options = ChartOptions {
        title: Some("Monthly payments, annual estimate $3,000, start month 1".to_string()),
        ..ChartOptions::default()
    };
    smoothing_chart(&run_scenarios(3000.0, 1), &options)
}

fn presets_listing() -> String {
    let mut out = String::new();
    for preset in Preset::ALL {
        match preset.profile() {
            Some(profile) => out.push_str(&format!(
                "{:<34}{:>10}  month {:>2}  {}\n",
                preset.label(),
                format_currency(profile.annual_estimate, 0),
                profile.start_month,
                profile.description
            )),
            None => out.push_str(&format!(
                "{:<34}{:>10}  {:>8}  {}\n",
                preset.label(),
                "-",
                "-",
                preset.description()
            )),
        }
    }
    out
}
