use shorescan::{config::Config, error::PredictionError, prediction::ModelKind};

#[test]
fn parse_example_config() {
    let raw = include_str!("../shorescan.example.toml");
    let cfg: Config = toml::from_str(raw).expect("parse TOML");
    assert_eq!(cfg.wizard.geolocation_delay_ms, 1000);
    assert_eq!(cfg.wizard.submit_delay_ms, 1500);
    assert!(cfg.images.accepted_extensions.iter().any(|e| e == "jpg"));
    assert!(!cfg.logging.write_to_file);
    assert_eq!(cfg.prediction.model, ModelKind::RandomForest);
    assert_eq!(cfg.prediction.n_trees, 100);
    assert_eq!(cfg.prediction.seed, 42);
}

#[test]
fn missing_sections_fall_back_to_defaults() {
    let cfg: Config = toml::from_str("[logging]\nlevel = \"debug\"\njson = true\nwrite_to_file = false\nfile_path = \"\"\n")
        .expect("parse TOML");
    assert_eq!(cfg.logging.level, "debug");
    assert_eq!(cfg.wizard.simulated_coordinates, "34.0522° N, 118.2437° W");
    assert_eq!(cfg.images.max_bytes, 10 * 1024 * 1024);
}

#[test]
fn load_reports_missing_file() {
    let err = Config::load(std::path::Path::new("/nonexistent/shorescan.toml")).unwrap_err();
    assert!(format!("{err:#}").contains("reading config"));
}

#[test]
fn prediction_model_is_parsed_by_name() {
    let raw = "[prediction]\nmodel = \"ridge\"\nn_trees = 10\nboosting_stages = 5\nlearning_rate = 0.2\nmax_depth = 2\nseed = 1\ntest_fraction = 0.25\nsample_start_year = 2010\nsample_end_year = 2012\n";
    let cfg: Config = toml::from_str(raw).expect("parse TOML");
    assert_eq!(cfg.prediction.model, ModelKind::Ridge);
    assert_eq!(cfg.prediction.sample_end_year, 2012);

    let unknown = raw.replace("\"ridge\"", "\"xgboost\"");
    assert!(toml::from_str::<Config>(&unknown).is_err());
}

#[test]
fn prediction_settings_reject_degenerate_split() {
    let mut cfg = Config::default();
    cfg.prediction.test_fraction = 1.0;
    assert!(matches!(
        cfg.prediction.validate(),
        Err(PredictionError::InvalidInput { field: "test_fraction", .. })
    ));
}
