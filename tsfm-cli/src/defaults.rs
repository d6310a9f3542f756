use clap::Args;
use tracing::debug;
use tsfm_loader::{ModelFamily, ModelReference};

#[derive(Args, Clone, Debug)]
#[command(about = "Print the default model reference for a family as JSON")]
pub struct DefaultsArgs {
    /// Model family
    #[arg(long, default_value = "timesfm-2.5", help = "Model family (v1, v2.5)")]
    pub family: ModelFamily,

    /// Enable debug output
    #[arg(long, help = "Enable debug output")]
    pub debug: bool,
}

/// Render the default reference, ready to be saved as a `--config` file
pub fn render_defaults(args: &DefaultsArgs) -> anyhow::Result<String> {
    let reference = ModelReference::default_for(args.family);
    debug!("Default reference for {}: {}", args.family, reference.repo_id());
    Ok(serde_json::to_string_pretty(&reference)?)
}

pub fn run_defaults(args: DefaultsArgs) -> anyhow::Result<()> {
    println!("{}", render_defaults(&args)?);
    Ok(())
}
