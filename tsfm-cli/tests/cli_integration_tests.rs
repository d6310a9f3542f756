use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Run the built CLI binary with the given arguments
fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tsfm-cli"))
        .args(args)
        .output()
        .expect("failed to run tsfm-cli")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn test_resolve_hub_repo_as_json() {
    let output = run_cli(&[
        "resolve",
        "--model",
        "google/timesfm-2.5-200m-pytorch",
        "--prediction-length",
        "12",
        "--json",
    ]);
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["family"], "timesfm-2.5");
    assert_eq!(report["source"]["kind"], "remote");
    assert_eq!(
        report["plan"]["checkpoint"]["hf_repo_id"],
        "google/timesfm-2.5-200m-pytorch"
    );
    assert_eq!(report["plan"]["forecast_config"]["max_horizon"], 12);
}

#[test]
fn test_resolve_local_directory() {
    let temp_dir = TempDir::new().unwrap();
    let model = temp_dir.path().to_string_lossy().to_string();

    let output = run_cli(&[
        "resolve",
        "--model",
        &model,
        "--family",
        "v2.5",
        "--prediction-length",
        "24",
    ]);
    assert!(output.status.success());

    let text = stdout(&output);
    let checkpoint = Path::new(&model).join("model.safetensors");
    assert!(text.contains(&format!("path = {}", checkpoint.display())));
    assert!(text.contains("max_horizon = 24"));
}

#[test]
fn test_resolve_v1_uses_single_constructor() {
    let output = run_cli(&[
        "resolve",
        "--model",
        "google/timesfm-2.0-500m-pytorch",
        "--prediction-length",
        "12",
        "--device",
        "gpu",
    ]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("checkpoint.huggingface_repo_id = google/timesfm-2.0-500m-pytorch"));
    assert!(text.contains("hparams.backend = gpu"));
    assert!(text.contains("hparams.num_layers = 50"));
}

#[test]
fn test_validation_error_exit_code() {
    let output = run_cli(&[
        "resolve",
        "--model",
        "google/fake-repo-id",
        "--prediction-length",
        "0",
    ]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Prediction length"));
}

#[test]
fn test_unknown_family_is_rejected() {
    let output = run_cli(&[
        "resolve",
        "--model",
        "google/fake-repo-id",
        "--family",
        "chronos",
        "--prediction-length",
        "12",
    ]);
    assert!(!output.status.success());
}

#[test]
fn test_defaults_prints_reference() {
    let output = run_cli(&["defaults", "--family", "v1"]);
    assert!(output.status.success());

    let reference: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(reference["repo_id"], "google/timesfm-1.0-200m-pytorch");
    assert_eq!(reference["context_length"], 2048);
    assert_eq!(reference["batch_size"], 64);
}

#[test]
fn test_defaults_debug_logs_to_stderr() {
    let output = run_cli(&["defaults", "--family", "v1", "--debug"]);
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Default reference for timesfm-1"));

    // Logs stay off stdout so the JSON remains parseable
    let reference: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(reference["repo_id"], "google/timesfm-1.0-200m-pytorch");

    let quiet = run_cli(&["defaults", "--family", "v1"]);
    assert!(!String::from_utf8_lossy(&quiet.stderr).contains("Default reference"));
}
