use clap::Args;
use serde::Serialize;
use std::num::NonZeroU32;
use std::path::PathBuf;
use tracing::{debug, info};
use tsfm_loader::{
    resolve_source, ConfigError, Device, FsProbe, LoadError, LoadPlan, ModelFamily,
    ModelReference, SourceKind,
};

#[derive(Args, Clone, Debug)]
#[command(about = "Show where a model would be loaded from and with which parameters")]
pub struct ResolveArgs {
    /// Model source (HuggingFace repo or local path)
    #[arg(long, short, help = "Model source (HuggingFace repo or local path)")]
    pub model: Option<String>,

    /// JSON file holding a model reference
    #[arg(long, help = "JSON file holding a model reference")]
    pub config: Option<PathBuf>,

    /// Model family, detected from the repo id when omitted
    #[arg(long, help = "Model family (v1, v2.5); detected from the repo id when omitted")]
    pub family: Option<ModelFamily>,

    /// Forecast horizon
    #[arg(long, short, help = "Number of steps to forecast")]
    pub prediction_length: u32,

    #[arg(long, help = "Maximum input window")]
    pub context_length: Option<u32>,

    #[arg(long, help = "Batch size for model operations")]
    pub batch_size: Option<u32>,

    #[arg(long, help = "Display name for the model")]
    pub alias: Option<String>,

    /// Compute backend for TimesFM 1.x/2.0
    #[arg(long, default_value = "cpu", help = "Compute backend (cpu, gpu)")]
    pub device: Device,

    /// Print the report as JSON
    #[arg(long, help = "Print the report as JSON")]
    pub json: bool,

    /// Enable debug output
    #[arg(long, help = "Enable debug output")]
    pub debug: bool,
}

/// What a load of the requested model would do
#[derive(Debug, Clone, Serialize)]
pub struct ResolveReport {
    pub reference: ModelReference,
    pub family: ModelFamily,
    pub source: SourceKind,
    pub plan: LoadPlan,
}

impl std::fmt::Display for ResolveReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Model: {} ({})", self.reference.alias(), self.family)?;
        writeln!(f, "Source: {}", self.source)?;
        write!(f, "{}", self.plan)
    }
}

/// Validate arguments that clap cannot check on its own.
///
/// Returns the checked prediction length.
pub fn validate_resolve_args(args: &ResolveArgs) -> Result<NonZeroU32, ConfigError> {
    let prediction_length = NonZeroU32::new(args.prediction_length)
        .ok_or_else(|| ConfigError::invalid("Prediction length must be greater than 0"))?;

    if let Some(model) = &args.model {
        if model.trim().is_empty() {
            return Err(ConfigError::invalid(
                "Model path cannot be empty\n💡 Provide either a HuggingFace repo (e.g., 'google/timesfm-2.5-200m-pytorch') or local path",
            ));
        }
    }

    if let Some(config) = &args.config {
        if !config.is_file() {
            return Err(ConfigError::invalid(format!(
                "Config file does not exist: {}",
                config.display()
            )));
        }
    }

    Ok(prediction_length)
}

/// Merge the config file, family defaults and command-line overrides
pub fn build_reference(args: &ResolveArgs) -> Result<ModelReference, ConfigError> {
    let base = match &args.config {
        Some(path) => {
            debug!("Reading model reference from {}", path.display());
            ModelReference::from_json_file(path)?
        }
        None => {
            let family = match (&args.family, &args.model) {
                (Some(family), _) => *family,
                (None, Some(model)) => ModelFamily::detect(model),
                (None, None) => ModelFamily::TimesFmV2p5,
            };
            ModelReference::default_for(family)
        }
    };

    ModelReference::new(
        args.model.as_deref().unwrap_or(base.repo_id()),
        args.context_length.unwrap_or(base.context_length()),
        args.batch_size.unwrap_or(base.batch_size()),
        args.alias.as_deref().unwrap_or(base.alias()),
    )
}

/// Probe the model source and plan its load without constructing anything
pub fn resolve_report(args: &ResolveArgs) -> anyhow::Result<ResolveReport> {
    let prediction_length = validate_resolve_args(args)?;
    let reference = build_reference(args)?;
    let family = args.family.unwrap_or_else(|| reference.family());

    info!("Resolving {} model: {}", family, reference.repo_id());
    let source = resolve_source(&FsProbe, reference.repo_id())
        .map_err(|e| LoadError::new(reference.repo_id(), family, e))?;

    let plan = LoadPlan::for_family(family, &reference, args.device, &source, prediction_length);

    Ok(ResolveReport {
        reference,
        family,
        source,
        plan,
    })
}

/// Run the resolve command and print its report
pub fn run_resolve(args: ResolveArgs) -> anyhow::Result<ResolveReport> {
    let report = resolve_report(&args)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report);
    }
    Ok(report)
}
