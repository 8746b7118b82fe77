use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use accel_verify::calibration::{
    AxisRange, CalibrationSession, ExtremaState, SessionDisplay, SessionRunner, StopReason,
    VerificationReport,
};
use accel_verify::cancel::CancelSignal;
use accel_verify::clock::{Clock, SimulatedClock, SystemClock};
use accel_verify::config::AppConfig;
use accel_verify::display::ConsoleDisplay;
use accel_verify::live::{LiveMonitor, LiveSummary};
use accel_verify::sensor::{AxisTriple, FixtureSource, FixtureSpec, SampleSource, SyntheticSpec};
use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;

fn main() -> ExitCode {
    let cli = Cli::parse();
    accel_verify::init_logging(cli.log_level);
    match cli.execute() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("accel-verify error: {err:?}");
            ExitCode::from(1)
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "accel-verify",
    about = "Accelerometer calibration verification harness"
)]
struct Cli {
    /// JSON config file (defaults to assets/accel_verify.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Maximum level for diagnostic logging on stderr
    #[arg(long, global = true, default_value_t = tracing::Level::INFO)]
    log_level: tracing::Level,
    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn execute(self) -> Result<ExitCode> {
        let config = match &self.config {
            Some(path) => AppConfig::load_from_file(path),
            None => AppConfig::load(),
        };
        config.validate().context("validating configuration")?;

        match self.command {
            Command::Verify(args) => verify_command(config, args),
            Command::Live(args) => live_command(config, args),
            Command::Evaluate(args) => evaluate_command(config, args),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a verification session until Ctrl-C or the duration limit.
    Verify(VerifyArgs),
    /// Show the live acc x/y/z and tilt readout.
    Live(LiveArgs),
    /// Score extrema given on the command line.
    Evaluate(EvaluateArgs),
}

#[derive(Args, Debug, Clone)]
struct VerifyArgs {
    #[command(flatten)]
    source: SourceArgs,
    /// Stop the session after this many milliseconds.
    #[arg(long)]
    duration_ms: Option<u64>,
    /// Override the pose dwell interval (milliseconds).
    #[arg(long)]
    dwell_ms: Option<u64>,
    /// Output format for the verification report.
    #[arg(long, value_enum, default_value_t = ReportFormat::Table)]
    format: ReportFormat,
    /// Also write the JSON report to this file.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Exit with status 2 when the rating is Poor.
    #[arg(long, default_value_t = false)]
    fail_on_poor: bool,
}

#[derive(Args, Debug, Clone)]
struct LiveArgs {
    #[command(flatten)]
    source: SourceArgs,
    /// Stop after this many readout frames.
    #[arg(long)]
    refreshes: Option<u64>,
}

#[derive(Args, Debug, Clone)]
struct EvaluateArgs {
    /// X extrema as MIN,MAX in g.
    #[arg(long, value_parser = parse_range, allow_hyphen_values = true)]
    x: AxisRange,
    /// Y extrema as MIN,MAX in g.
    #[arg(long, value_parser = parse_range, allow_hyphen_values = true)]
    y: AxisRange,
    /// Z extrema as MIN,MAX in g.
    #[arg(long, value_parser = parse_range, allow_hyphen_values = true)]
    z: AxisRange,
    #[arg(long, value_enum, default_value_t = ReportFormat::Table)]
    format: ReportFormat,
}

#[derive(Args, Debug, Clone)]
struct SourceArgs {
    /// Path to a JSON sample fixture.
    #[arg(long)]
    fixture: Option<PathBuf>,
    /// Generate a six-pose rotation instead of reading a fixture.
    #[arg(long, default_value_t = false)]
    synthetic: bool,
    /// Synthetic gain error (0.05 reads 1.05g).
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    gain_error: f32,
    /// Synthetic bias as X,Y,Z in g.
    #[arg(long, value_parser = parse_triple, allow_hyphen_values = true)]
    offset: Option<AxisTriple>,
    /// Synthetic noise amplitude in g.
    #[arg(long, default_value_t = 0.0)]
    noise: f32,
    /// Synthetic readings per pose.
    #[arg(long)]
    samples_per_pose: Option<u32>,
    /// Seed for synthetic noise.
    #[arg(long)]
    seed: Option<u64>,
    /// Run on a virtual clock that advances only on pauses.
    #[arg(long, default_value_t = false)]
    simulated: bool,
}

impl SourceArgs {
    fn validate(&self) -> Result<()> {
        let selected = self.fixture.is_some() as u8 + u8::from(self.synthetic);
        if selected != 1 {
            bail!("Provide exactly one source via --fixture or --synthetic");
        }
        if let Some(path) = &self.fixture {
            if !path.exists() {
                bail!("fixture file {} does not exist", path.display());
            }
        }
        Ok(())
    }

    fn build_spec(&self) -> Result<FixtureSpec> {
        if let Some(path) = &self.fixture {
            return FixtureSpec::load_from_file(path)
                .with_context(|| format!("loading fixture {}", path.display()));
        }

        let defaults = SyntheticSpec::default();
        let spec = FixtureSpec {
            id: "synthetic-rotation".to_string(),
            source: FixtureSource::Synthetic(SyntheticSpec {
                gain_error: self.gain_error,
                offset: self.offset.unwrap_or_default(),
                noise: self.noise,
                samples_per_pose: self.samples_per_pose.unwrap_or(defaults.samples_per_pose),
                seed: self.seed.unwrap_or(defaults.seed),
            }),
            loop_count: 1,
        };
        spec.validate().context("validating synthetic source")?;
        Ok(spec)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum ReportFormat {
    Json,
    Table,
}

#[derive(Serialize)]
struct VerifyPayload<'a> {
    fixture_id: &'a str,
    stop_reason: Option<StopReason>,
    report: &'a VerificationReport,
    log_record: Vec<String>,
}

struct VerifyOutcome {
    report: VerificationReport,
    stop_reason: Option<StopReason>,
}

fn verify_command(mut config: AppConfig, args: VerifyArgs) -> Result<ExitCode> {
    args.source.validate()?;
    if let Some(dwell_ms) = args.dwell_ms {
        config.calibration.dwell_ms = dwell_ms;
    }
    if args.duration_ms.is_some() {
        config.calibration.max_duration_ms = args.duration_ms;
    }
    if args.source.simulated && config.calibration.max_duration_ms.is_none() {
        bail!("--simulated needs --duration-ms (a virtual clock cannot wait for Ctrl-C)");
    }
    config.validate().context("validating configuration")?;

    let spec = args.source.build_spec()?;
    let fixture_id = spec.id.clone();
    let simulated = args.source.simulated;
    let format = args.format;

    let outcome = with_ctrl_c(move |cancel| -> Result<VerifyOutcome> {
        let source = spec.build_source().context("building sample source")?;
        let session = CalibrationSession::new(config.calibration.clone(), config.evaluation);
        let mut display: Box<dyn SessionDisplay + Send> = match format {
            ReportFormat::Table => Box::new(ConsoleDisplay::stdout()),
            ReportFormat::Json => Box::new(ConsoleDisplay::stderr()),
        };
        if simulated {
            run_session(session, source, cancel, SimulatedClock::new(), &mut *display)
        } else {
            run_session(session, source, cancel, SystemClock::new(), &mut *display)
        }
    })??;

    let payload = VerifyPayload {
        fixture_id: &fixture_id,
        stop_reason: outcome.stop_reason,
        report: &outcome.report,
        log_record: outcome.report.log_lines(),
    };

    if let Some(path) = &args.output {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("creating report output directory")?;
        }
        let json = serde_json::to_string_pretty(&payload).context("serializing report")?;
        std::fs::write(path, json)
            .with_context(|| format!("writing report to {}", path.display()))?;
    }

    match format {
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(&payload).context("serializing report")?;
            println!("{json}");
        }
        ReportFormat::Table => print_session_table(&outcome.report, outcome.stop_reason),
    }

    Ok(rating_exit_code(&outcome.report, args.fail_on_poor))
}

fn run_session<S, C, K, D>(
    session: CalibrationSession,
    source: S,
    cancel: C,
    clock: K,
    display: D,
) -> Result<VerifyOutcome>
where
    S: SampleSource,
    C: CancelSignal,
    K: Clock,
    D: SessionDisplay,
{
    let mut runner = SessionRunner::new(session, source, cancel, clock, display);
    let report = runner.run().context("running verification session")?;
    Ok(VerifyOutcome {
        report,
        stop_reason: runner.stop_reason(),
    })
}

fn live_command(config: AppConfig, args: LiveArgs) -> Result<ExitCode> {
    args.source.validate()?;
    if args.source.simulated && args.refreshes.is_none() {
        bail!("--simulated needs --refreshes (a virtual clock cannot wait for Ctrl-C)");
    }

    let spec = args.source.build_spec()?;
    let simulated = args.source.simulated;
    let refreshes = args.refreshes;
    let live_config = config.live;

    let summary = with_ctrl_c(move |cancel| -> Result<LiveSummary> {
        let source = spec.build_source().context("building sample source")?;
        let display = ConsoleDisplay::stdout();
        let summary = if simulated {
            LiveMonitor::new(live_config, source, cancel, SimulatedClock::new(), display)
                .run(refreshes)
        } else {
            LiveMonitor::new(live_config, source, cancel, SystemClock::new(), display)
                .run(refreshes)
        };
        Ok(summary)
    })??;

    println!(
        "Live frames shown        : {} ({} polls{})",
        summary.frames,
        summary.polls,
        if summary.cancelled { ", cancelled" } else { "" }
    );
    Ok(ExitCode::SUCCESS)
}

fn evaluate_command(config: AppConfig, args: EvaluateArgs) -> Result<ExitCode> {
    for (axis, range) in [('x', args.x), ('y', args.y), ('z', args.z)] {
        if range.min > range.max {
            bail!(
                "{axis} range minimum {} exceeds maximum {}",
                range.min,
                range.max
            );
        }
    }

    let extrema = ExtremaState::from_ranges(args.x, args.y, args.z);
    let report = VerificationReport::from_extrema(extrema, &config.evaluation);

    match args.format {
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(&report).context("serializing report")?;
            println!("{json}");
        }
        ReportFormat::Table => {
            for line in report.display_lines() {
                println!("{line}");
            }
            println!("{}", report.log_lines().last().map(String::as_str).unwrap_or(""));
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn print_session_table(report: &VerificationReport, stop_reason: Option<StopReason>) {
    println!(
        "Samples accepted         : {} (rejected {})",
        report.samples_accepted, report.samples_rejected
    );
    println!("Prompt advances          : {}", report.steps_advanced);
    println!("Session duration (ms)    : {}", report.duration_ms);
    match stop_reason {
        Some(reason) => println!("Stopped by               : {reason:?}"),
        None => println!("Stopped by               : n/a"),
    }
}

fn rating_exit_code(report: &VerificationReport, fail_on_poor: bool) -> ExitCode {
    if fail_on_poor && report.rating.needs_recalibration() {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    }
}

/// Run `job` on a blocking thread while Ctrl-C sets its cancel flag
fn with_ctrl_c<T, F>(job: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(Arc<AtomicBool>) -> T + Send + 'static,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("building signal runtime")?;

    runtime.block_on(async move {
        let cancel = Arc::new(AtomicBool::new(false));
        let signal_flag = Arc::clone(&cancel);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Ctrl-C received, stopping");
                signal_flag.store(true, Ordering::Release);
            }
        });

        tokio::task::spawn_blocking(move || job(cancel))
            .await
            .map_err(|err| anyhow!("worker thread failed: {err}"))
    })
}

fn parse_range(value: &str) -> std::result::Result<AxisRange, String> {
    let parts = parse_floats(value)?;
    match parts.as_slice() {
        [min, max] => Ok(AxisRange::new(*min, *max)),
        _ => Err(format!("expected MIN,MAX but got '{value}'")),
    }
}

fn parse_triple(value: &str) -> std::result::Result<AxisTriple, String> {
    let parts = parse_floats(value)?;
    match parts.as_slice() {
        [x, y, z] => Ok(AxisTriple::new(*x, *y, *z)),
        _ => Err(format!("expected X,Y,Z but got '{value}'")),
    }
}

fn parse_floats(value: &str) -> std::result::Result<Vec<f32>, String> {
    value
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f32>()
                .map_err(|err| format!("invalid number '{}': {err}", part.trim()))
        })
        .collect()
}
