use crate::{
    config::Config,
    erosion::{ErosionSummary, MUMBAI_SHORELINE},
    image::ImageFile,
    prediction::{self, ClimateRecord, ModelKind},
    util::ensure_dir,
    wizard::{IssueType, ReportWizard, TextField, WizardEvent},
};
use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use rand::{SeedableRng, rngs::StdRng};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "shorescan")]
#[command(about = "Report coastal issues and review shoreline erosion figures")]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,

    /// Path to config TOML. If omitted, uses ./shorescan.toml if present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Walk the four-step report form and submit it.
    Report(ReportArgs),
    /// List the issue types a report can carry.
    IssueTypes {},
    /// Shoreline erosion readings and their summary.
    Stats {},
    /// Train an erosion model on synthetic history and predict with it.
    Predict(PredictArgs),
}

#[derive(clap::Args, Debug)]
pub struct ReportArgs {
    /// pollution, dumping, wildlife, erosion, facilities or other.
    #[arg(long)]
    pub issue: Option<IssueType>,
    #[arg(long)]
    pub photo: Option<PathBuf>,
    /// Beach or area name.
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long, conflicts_with = "locate")]
    pub coordinates: Option<String>,
    /// Fill the coordinates from the device location.
    #[arg(long)]
    pub locate: bool,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct PredictArgs {
    /// Overrides [prediction].model: random_forest, gradient_boosting, linear, ridge or lasso.
    #[arg(long)]
    pub model: Option<ModelKind>,
    #[command(subcommand)]
    pub cmd: PredictCommand,
}

#[derive(Subcommand, Debug)]
pub enum PredictCommand {
    /// Print the held-out metrics of the trained model.
    Train {},
    /// Predict the erosion rate of one month.
    Point {
        #[arg(long)]
        year: i32,
        #[arg(long)]
        month: u32,
        /// Millimetres.
        #[arg(long)]
        rainfall: f64,
        /// Degrees Celsius.
        #[arg(long)]
        temperature: f64,
        /// Metres.
        #[arg(long)]
        tidal_range: f64,
        /// 0 or 1. Derived from the month if omitted.
        #[arg(long)]
        monsoon: Option<u8>,
    },
    /// Predict every record of a JSON file.
    Batch {
        /// A JSON array of records, or an object with a `data_points` array.
        #[arg(long)]
        input: PathBuf,
    },
    /// Project monthly climate for a span of years and predict each month.
    Future {
        #[arg(long, default_value_t = 2025)]
        start_year: i32,
        #[arg(long, default_value_t = 2030)]
        end_year: i32,
    },
}

pub async fn dispatch(args: Args) -> Result<()> {
    let cfg = match resolve_config_path(args.config.as_deref()) {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };
    let _guard = init_logging(&args, &cfg, resolve_log_path(&cfg).as_deref())?;

    match &args.cmd {
        Command::Report(report_args) => report(&cfg, report_args).await,
        Command::IssueTypes {} => issue_types(),
        Command::Stats {} => stats(),
        Command::Predict(predict_args) => predict(&cfg, predict_args),
    }
}

fn resolve_config_path(user: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = user {
        return Some(p.to_path_buf());
    }
    let default = PathBuf::from("shorescan.toml");
    default.exists().then_some(default)
}

fn init_logging(args: &Args, cfg: &Config, file_path: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(cfg.logging.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stderr_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    };

    let (file_layer, guard) = if let Some(path) = file_path {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        ensure_dir(parent)?;
        let file = std::fs::File::create(path)
            .with_context(|| format!("create log file: {}", path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}

fn resolve_log_path(cfg: &Config) -> Option<PathBuf> {
    if !cfg.logging.write_to_file {
        return None;
    }
    if !cfg.logging.file_path.is_empty() {
        return Some(PathBuf::from(&cfg.logging.file_path));
    }
    Some(PathBuf::from("shorescan.log"))
}

async fn report(cfg: &Config, args: &ReportArgs) -> Result<()> {
    let mut wizard = ReportWizard::simulated(cfg);

    if let Some(issue) = args.issue {
        wizard.select_issue_type(issue)?;
    }
    wizard.advance()?;

    if let Some(photo) = &args.photo {
        wizard.attach_image(ImageFile::from_path(photo))?;
        for event in wizard.settle().await {
            if let WizardEvent::ImageFailed(e) = event {
                return Err(e).context("attaching photo");
            }
        }
    }
    wizard.advance()?;

    if let Some(location) = &args.location {
        wizard.set_field(TextField::Location, location.as_str())?;
    }
    if let Some(coordinates) = &args.coordinates {
        wizard.set_field(TextField::Coordinates, coordinates.as_str())?;
    } else if args.locate {
        wizard.request_device_location()?;
        for event in wizard.settle().await {
            if let WizardEvent::LocationFailed(e) = event {
                return Err(e).context("locating device");
            }
        }
    }
    wizard.advance()?;

    if let Some(description) = &args.description {
        wizard.set_field(TextField::Description, description.as_str())?;
    }
    if let Some(email) = &args.email {
        wizard.set_field(TextField::ContactEmail, email.as_str())?;
    }
    debug!(summary = ?wizard.summary(), "reviewing report");

    wizard.submit()?;
    let receipt = loop {
        match wizard.next_event().await {
            Some(WizardEvent::Submitted(receipt)) => break receipt,
            Some(WizardEvent::SubmissionFailed(e)) => return Err(e).context("submitting report"),
            Some(_) => continue,
            None => return Err(anyhow!("submission finished without a result")),
        }
    };
    info!("report {} accepted", receipt.reference);

    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "summary": wizard.summary(),
            "receipt": receipt,
            "status": "submitted",
        }))?
    );
    Ok(())
}

fn issue_types() -> Result<()> {
    let types: Vec<_> = IssueType::ALL
        .iter()
        .map(|t| serde_json::json!({ "value": t.value(), "label": t.label() }))
        .collect();
    println!("{}", serde_json::to_string_pretty(&types)?);
    Ok(())
}

fn stats() -> Result<()> {
    let summary = ErosionSummary::from_readings(&MUMBAI_SHORELINE)
        .ok_or_else(|| anyhow!("no erosion readings"))?;
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "summary": summary,
            "readings": MUMBAI_SHORELINE,
        }))?
    );
    Ok(())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BatchInput {
    Wrapped { data_points: Vec<ClimateRecord> },
    Bare(Vec<ClimateRecord>),
}

impl BatchInput {
    fn into_records(self) -> Vec<ClimateRecord> {
        match self {
            BatchInput::Wrapped { data_points } => data_points,
            BatchInput::Bare(records) => records,
        }
    }
}

fn predict(cfg: &Config, args: &PredictArgs) -> Result<()> {
    let mut settings = cfg.prediction.clone();
    if let Some(model) = args.model {
        settings.model = model;
    }

    // a fixed seed keeps runs reproducible
    let mut rng = StdRng::seed_from_u64(settings.seed);
    let history =
        prediction::generate_sample_data(settings.sample_start_year, settings.sample_end_year, &mut rng)
            .context("generating training history")?;
    let (model, training) = prediction::train(&history, &settings).context("training erosion model")?;

    let out = match &args.cmd {
        PredictCommand::Train {} => serde_json::to_value(&training)?,
        PredictCommand::Point {
            year,
            month,
            rainfall,
            temperature,
            tidal_range,
            monsoon,
        } => {
            let record = ClimateRecord {
                year: *year,
                month: *month,
                rainfall: *rainfall,
                temperature: *temperature,
                tidal_range: *tidal_range,
                is_monsoon: *monsoon,
            };
            let rate = model.predict(&record)?;
            serde_json::json!({ "model": model.kind(), "erosion_rate": rate })
        }
        PredictCommand::Batch { input } => {
            let raw = std::fs::read_to_string(input)
                .with_context(|| format!("reading batch: {}", input.display()))?;
            let records = serde_json::from_str::<BatchInput>(&raw)
                .with_context(|| "parsing batch JSON")?
                .into_records();
            let rates = model.predict_batch(&records)?;
            serde_json::json!({ "model": model.kind(), "predictions": rates })
        }
        PredictCommand::Future {
            start_year,
            end_year,
        } => {
            let future = model.predict_future(*start_year, *end_year, &mut rng)?;
            serde_json::json!({ "model": model.kind(), "predictions": future })
        }
    };
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
