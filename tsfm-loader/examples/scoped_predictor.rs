/// Example demonstrating scoped predictor acquisition
/// This example plugs a toy TimesFM 2.5 package into the loader and shows
/// the local, remote and failure paths.
use tsfm_loader::timesfm::{
    ForecastConfig, TimesFmV2p5Checkpoint, TimesFmV2p5Library, TimesFmV2p5Model,
};
use tsfm_loader::{BoxError, ModelReference, ModelVariant, Predictor, ReleaseToken, TimesFmV2p5};

/// Stand-in for the real TimesFM 2.5 bindings
struct ToyLibrary {
    reject_hub: bool,
}

struct ToyModel {
    checkpoint: Option<TimesFmV2p5Checkpoint>,
    horizon: u32,
}

impl Predictor for ToyModel {
    fn release(&mut self, _token: ReleaseToken) {
        println!("  released model loaded from {:?}", self.checkpoint);
    }
}

impl TimesFmV2p5Model for ToyModel {
    fn load_checkpoint(&mut self, checkpoint: &TimesFmV2p5Checkpoint) -> Result<(), BoxError> {
        self.checkpoint = Some(checkpoint.clone());
        Ok(())
    }

    fn compile(&mut self, config: &ForecastConfig) -> Result<(), BoxError> {
        self.horizon = config.max_horizon;
        Ok(())
    }
}

impl TimesFmV2p5Library for ToyLibrary {
    type Model = ToyModel;

    fn create(&self) -> Result<ToyModel, BoxError> {
        if self.reject_hub {
            return Err("hub access disabled".into());
        }
        Ok(ToyModel {
            checkpoint: None,
            horizon: 0,
        })
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Scoped predictor example");

    // A directory that exists resolves to <dir>/model.safetensors
    let local_dir = std::env::temp_dir();
    let reference = ModelReference::new(local_dir.to_string_lossy(), 512, 32, "local")?;
    let variant = TimesFmV2p5::new(reference, ToyLibrary { reject_hub: false });
    let horizon = variant.with_predictor(24, |model| model.horizon)?;
    println!("Local model compiled for horizon {}", horizon);

    // Anything else is treated as a hub repository id
    let reference = ModelReference::new("google/timesfm-2.5-200m-pytorch", 2048, 64, "hub")?;
    let variant = TimesFmV2p5::new(reference, ToyLibrary { reject_hub: false });
    {
        let model = variant.get_predictor(12)?;
        println!("Hub model loaded from {:?}", model.checkpoint);
    }

    // Failures come back as a single load error with the cause attached
    let reference = ModelReference::new("bad/path", 64, 32, "broken")?;
    let variant = TimesFmV2p5::new(reference, ToyLibrary { reject_hub: true });
    match variant.get_predictor(12) {
        Ok(_) => println!("Unexpectedly loaded"),
        Err(e) => println!("Load failed as expected: {} (cause: {})", e, e.cause()),
    }

    println!("Scoped predictor example completed successfully!");
    Ok(())
}
