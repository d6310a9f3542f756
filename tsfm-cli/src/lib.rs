pub mod defaults;
pub mod resolve;

pub use defaults::{run_defaults, DefaultsArgs};
pub use resolve::{resolve_report, run_resolve, validate_resolve_args, ResolveArgs, ResolveReport};

/// Process exit code for an error returned by a command
pub fn exit_code(error: &anyhow::Error) -> i32 {
    if error.downcast_ref::<tsfm_loader::ConfigError>().is_some() {
        // Validation error
        2
    } else if error.downcast_ref::<tsfm_loader::LoadError>().is_some() {
        // Model loading error
        3
    } else {
        1
    }
}
