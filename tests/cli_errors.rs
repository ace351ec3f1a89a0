use std::process::{Command, Output};

fn shorescan(args: &[&str]) -> Output {
    let dir = tempfile::tempdir().unwrap();
    Command::new(env!("CARGO_BIN_EXE_shorescan"))
        .args(args)
        .current_dir(dir.path())
        .env_remove("RUST_LOG")
        .output()
        .expect("run shorescan")
}

#[test]
fn wizard_error_is_reported_once() {
    let out = shorescan(&["report"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert_eq!(stderr.matches("please complete this step").count(), 1, "{stderr}");
}

#[test]
fn config_error_before_logging_still_reaches_stderr() {
    let out = shorescan(&["--config", "/nonexistent/shorescan.toml", "stats"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert_eq!(stderr.matches("reading config").count(), 1, "{stderr}");
    assert!(stderr.starts_with("error: "));
}

#[test]
fn invalid_prediction_point_is_reported_once() {
    let out = shorescan(&[
        "predict",
        "--model",
        "linear",
        "point",
        "--year",
        "2060",
        "--month",
        "3",
        "--rainfall",
        "8",
        "--temperature",
        "26",
        "--tidal-range",
        "2.6",
    ]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert_eq!(stderr.matches("invalid Year").count(), 1, "{stderr}");
}
