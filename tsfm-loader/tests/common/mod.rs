//! Recording stand-ins for the external TimesFM packages.

#![allow(dead_code)]

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, Once};
use tsfm_loader::timesfm::{
    ForecastConfig, TimesFmV1Checkpoint, TimesFmV1Hparams, TimesFmV1Library,
    TimesFmV2p5Checkpoint, TimesFmV2p5Library, TimesFmV2p5Model,
};
use tsfm_loader::{BoxError, ModelReference, Predictor, ReleaseToken, SourceProbe};

static INIT: Once = Once::new();

/// Initialize logging once for all tests
pub fn init_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    });
}

pub fn reference(repo_id: &str) -> ModelReference {
    ModelReference::new(repo_id, 64, 32, "test").unwrap()
}

/// One call made against a fake library or model
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Construct {
        id: u32,
        hparams: TimesFmV1Hparams,
        checkpoint: TimesFmV1Checkpoint,
    },
    Create {
        id: u32,
    },
    LoadCheckpoint {
        id: u32,
        checkpoint: TimesFmV2p5Checkpoint,
    },
    Compile {
        id: u32,
        config: ForecastConfig,
    },
    Release {
        id: u32,
    },
}

/// Shared, ordered record of calls
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<Call>>>,
    next_id: Arc<AtomicU32>,
}

impl CallLog {
    pub fn push(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn next_id(&self) -> u32 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Number of model objects that came into existence
    pub fn created(&self) -> usize {
        self.next_id.load(Ordering::SeqCst) as usize
    }

    pub fn released(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::Release { .. }))
            .count()
    }

    pub fn released_ids(&self) -> Vec<u32> {
        self.calls()
            .iter()
            .filter_map(|call| match call {
                Call::Release { id } => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn v1_checkpoints(&self) -> Vec<TimesFmV1Checkpoint> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Construct { checkpoint, .. } => Some(checkpoint),
                _ => None,
            })
            .collect()
    }

    pub fn v2p5_checkpoints(&self) -> Vec<TimesFmV2p5Checkpoint> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::LoadCheckpoint { checkpoint, .. } => Some(checkpoint),
                _ => None,
            })
            .collect()
    }
}

/// Step at which a fake library reports an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailAt {
    #[default]
    Nowhere,
    Construct,
    LoadCheckpoint,
    Compile,
}

fn mocked_failure() -> BoxError {
    "mocked failure".into()
}

/// Model object handed out by both fakes
#[derive(Debug)]
pub struct FakeModel {
    pub id: u32,
    fail_at: FailAt,
    log: CallLog,
}

impl Predictor for FakeModel {
    fn release(&mut self, _token: ReleaseToken) {
        self.log.push(Call::Release { id: self.id });
    }
}

impl TimesFmV2p5Model for FakeModel {
    fn load_checkpoint(&mut self, checkpoint: &TimesFmV2p5Checkpoint) -> Result<(), BoxError> {
        self.log.push(Call::LoadCheckpoint {
            id: self.id,
            checkpoint: checkpoint.clone(),
        });
        if self.fail_at == FailAt::LoadCheckpoint {
            return Err(mocked_failure());
        }
        Ok(())
    }

    fn compile(&mut self, config: &ForecastConfig) -> Result<(), BoxError> {
        self.log.push(Call::Compile {
            id: self.id,
            config: config.clone(),
        });
        if self.fail_at == FailAt::Compile {
            return Err(mocked_failure());
        }
        Ok(())
    }
}

/// Fake single-step TimesFM 1.x/2.0 package
#[derive(Debug, Clone, Default)]
pub struct FakeV1Library {
    pub log: CallLog,
    pub fail_at: FailAt,
}

impl FakeV1Library {
    pub fn failing() -> Self {
        Self {
            log: CallLog::default(),
            fail_at: FailAt::Construct,
        }
    }
}

impl TimesFmV1Library for FakeV1Library {
    type Model = FakeModel;

    fn construct(
        &self,
        hparams: &TimesFmV1Hparams,
        checkpoint: &TimesFmV1Checkpoint,
    ) -> Result<FakeModel, BoxError> {
        if self.fail_at == FailAt::Construct {
            // The constructor raises before any object exists
            return Err(mocked_failure());
        }
        let id = self.log.next_id();
        self.log.push(Call::Construct {
            id,
            hparams: hparams.clone(),
            checkpoint: checkpoint.clone(),
        });
        Ok(FakeModel {
            id,
            fail_at: self.fail_at,
            log: self.log.clone(),
        })
    }
}

/// Fake two-step TimesFM 2.5 package
#[derive(Debug, Clone, Default)]
pub struct FakeV2p5Library {
    pub log: CallLog,
    pub fail_at: FailAt,
}

impl FakeV2p5Library {
    pub fn failing_at(fail_at: FailAt) -> Self {
        Self {
            log: CallLog::default(),
            fail_at,
        }
    }
}

impl TimesFmV2p5Library for FakeV2p5Library {
    type Model = FakeModel;

    fn create(&self) -> Result<FakeModel, BoxError> {
        if self.fail_at == FailAt::Construct {
            return Err(mocked_failure());
        }
        let id = self.log.next_id();
        self.log.push(Call::Create { id });
        Ok(FakeModel {
            id,
            fail_at: self.fail_at,
            log: self.log.clone(),
        })
    }
}

/// Probe with a fixed answer that records what it was asked
#[derive(Debug, Clone)]
pub struct StaticProbe {
    exists: bool,
    probed: Arc<Mutex<Vec<PathBuf>>>,
}

impl StaticProbe {
    pub fn new(exists: bool) -> Self {
        Self {
            exists,
            probed: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn probed(&self) -> Vec<PathBuf> {
        self.probed.lock().unwrap().clone()
    }
}

impl SourceProbe for StaticProbe {
    fn exists(&self, path: &Path) -> io::Result<bool> {
        self.probed.lock().unwrap().push(path.to_path_buf());
        Ok(self.exists)
    }
}

/// Probe whose existence check itself errors
#[derive(Debug, Clone, Copy, Default)]
pub struct BrokenProbe;

impl SourceProbe for BrokenProbe {
    fn exists(&self, _path: &Path) -> io::Result<bool> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"))
    }
}
