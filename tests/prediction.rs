use rand::{SeedableRng, rngs::StdRng};
use shorescan::{
    config::{Config, Prediction},
    error::PredictionError,
    prediction::{
        ClimateRecord, FEATURE_NAMES, ModelKind, features, generate_future_data, generate_sample_data,
        train,
    },
};

fn settings(model: ModelKind) -> Prediction {
    Prediction {
        model,
        n_trees: 10,
        boosting_stages: 20,
        ..Config::default().prediction
    }
}

fn history() -> Vec<shorescan::prediction::LabeledRecord> {
    generate_sample_data(2000, 2024, &mut StdRng::seed_from_u64(42)).unwrap()
}

fn month(year: i32, month: u32, rainfall: f64) -> ClimateRecord {
    ClimateRecord {
        year,
        month,
        rainfall,
        temperature: 28.0,
        tidal_range: 2.9,
        is_monsoon: None,
    }
}

#[test]
fn sample_history_covers_every_month_with_monsoon_rain() {
    let rows = history();
    assert_eq!(rows.len(), 25 * 12);
    assert_eq!((rows[0].climate.year, rows[0].climate.month), (2000, 1));
    assert_eq!((rows[299].climate.year, rows[299].climate.month), (2024, 12));

    for r in &rows {
        let c = &r.climate;
        assert_eq!(c.is_monsoon, Some(u8::from((6..=9).contains(&c.month))));
        assert!(c.rainfall >= 0.0);
        assert!(r.erosion_rate >= 0.0);
    }

    let avg = |monsoon: u8| {
        let picked: Vec<f64> = rows
            .iter()
            .filter(|r| r.climate.is_monsoon == Some(monsoon))
            .map(|r| r.climate.rainfall)
            .collect();
        picked.iter().sum::<f64>() / picked.len() as f64
    };
    assert!(avg(1) > avg(0) + 150.0);
}

#[test]
fn same_seed_same_history() {
    let a = generate_sample_data(2010, 2012, &mut StdRng::seed_from_u64(9)).unwrap();
    let b = generate_sample_data(2010, 2012, &mut StdRng::seed_from_u64(9)).unwrap();
    let c = generate_sample_data(2010, 2012, &mut StdRng::seed_from_u64(10)).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn reversed_years_are_refused() {
    let err = generate_sample_data(2024, 2000, &mut StdRng::seed_from_u64(1)).unwrap_err();
    assert_eq!(err, PredictionError::YearRange { start: 2024, end: 2000 });
}

#[test]
fn engineered_features_for_june() {
    let f = features(&month(2020, 6, 300.0));
    assert_eq!(FEATURE_NAMES[0], "TimeIndex");
    assert!((f[0] - 20.5).abs() < 1e-9);
    assert_eq!(f[1], 300.0);
    assert!(f[4].abs() < 1e-9);
    assert!((f[5] + 1.0).abs() < 1e-9);
    assert_eq!(f[6], 1.0);
}

#[test]
fn future_range_is_checked() {
    let mut rng = StdRng::seed_from_u64(3);
    assert!(matches!(
        generate_future_data(2024, 2030, &mut rng),
        Err(PredictionError::InvalidInput { field: "start_year", .. })
    ));
    assert!(matches!(
        generate_future_data(2030, 2051, &mut rng),
        Err(PredictionError::InvalidInput { field: "end_year", .. })
    ));
    assert_eq!(
        generate_future_data(2030, 2026, &mut rng),
        Err(PredictionError::YearRange { start: 2030, end: 2026 })
    );
}

#[test]
fn linear_model_reports_sane_metrics() {
    let (model, report) = train(&history(), &settings(ModelKind::Linear)).unwrap();
    assert_eq!(model.kind(), ModelKind::Linear);
    assert_eq!(report.test_rows, 60);
    assert_eq!(report.train_rows, 240);
    let m = report.metrics;
    assert!(m.mae.is_finite() && m.rmse.is_finite() && m.r2.is_finite());
    assert!(m.rmse >= m.mae);
    assert!((m.rmse * m.rmse - m.mse).abs() < 1e-9);
    // rainfall and the time trend explain most of the variance
    assert!(m.r2 > 0.2, "r2 = {}", m.r2);
}

#[test]
fn every_model_kind_trains_and_predicts() {
    let data = history();
    for kind in ModelKind::ALL {
        let (model, report) = train(&data, &settings(kind)).unwrap();
        assert_eq!(report.model, kind);
        let rate = model.predict(&month(2022, 7, 600.0)).unwrap();
        assert!(rate.is_finite(), "{kind}: {rate}");
    }
}

#[test]
fn monsoon_month_predicts_more_erosion_than_dry_month() {
    let (model, _) = train(&history(), &settings(ModelKind::Ridge)).unwrap();
    let wet = model.predict(&month(2022, 7, 650.0)).unwrap();
    let dry = model.predict(&month(2022, 2, 5.0)).unwrap();
    assert!(wet > dry, "wet {wet} dry {dry}");
}

#[test]
fn batch_keeps_order_and_rejects_bad_rows() {
    let (model, _) = train(&history(), &settings(ModelKind::Lasso)).unwrap();
    let rows = vec![month(2021, 1, 10.0), month(2021, 8, 500.0), month(2021, 12, 12.0)];
    let batch = model.predict_batch(&rows).unwrap();
    assert_eq!(batch.len(), 3);
    assert_eq!(batch[1], model.predict(&rows[1]).unwrap());
    assert!(model.predict_batch(&[]).unwrap().is_empty());

    let mut bad = rows.clone();
    bad[2].tidal_range = -0.5;
    assert!(matches!(
        model.predict_batch(&bad),
        Err(PredictionError::InvalidInput { field: "Tidal_Range", .. })
    ));
}

#[test]
fn out_of_range_points_are_rejected() {
    let (model, _) = train(&history(), &settings(ModelKind::Linear)).unwrap();
    for (record, field) in [
        (month(1999, 5, 10.0), "Year"),
        (month(2051, 5, 10.0), "Year"),
        (month(2020, 13, 10.0), "Month"),
        (month(2020, 5, -1.0), "Rainfall"),
        (
            ClimateRecord {
                temperature: -3.0,
                ..month(2020, 5, 10.0)
            },
            "Temperature",
        ),
        (
            ClimateRecord {
                is_monsoon: Some(2),
                ..month(2020, 5, 10.0)
            },
            "Is_Monsoon",
        ),
    ] {
        match model.predict(&record) {
            Err(PredictionError::InvalidInput { field: f, .. }) => assert_eq!(f, field),
            other => panic!("expected {field} to be rejected, got {other:?}"),
        }
    }
}

#[test]
fn forest_projects_every_future_month() {
    let (model, _) = train(&history(), &settings(ModelKind::RandomForest)).unwrap();
    let future = model
        .predict_future(2025, 2026, &mut StdRng::seed_from_u64(5))
        .unwrap();
    assert_eq!(future.len(), 24);
    assert_eq!(future[23].climate.year, 2026);
    assert_eq!(future[23].climate.month, 12);
    assert!(future.iter().all(|p| p.predicted_erosion.is_finite()));
}

#[test]
fn future_prediction_uses_dataset_column_names() {
    let (model, _) = train(&history(), &settings(ModelKind::Linear)).unwrap();
    let future = model
        .predict_future(2030, 2030, &mut StdRng::seed_from_u64(5))
        .unwrap();
    let json = serde_json::to_value(&future[0]).unwrap();
    for key in ["Year", "Month", "Rainfall", "Temperature", "Tidal_Range", "Is_Monsoon", "Predicted_Erosion"] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
}

#[test]
fn too_little_history_is_refused() {
    let data = history();
    let err = train(&data[..3], &settings(ModelKind::Linear)).err();
    assert_eq!(err, Some(PredictionError::NotEnoughData { needed: 5, got: 3 }));
}

#[test]
fn batch_records_parse_from_dataset_json() {
    let raw = r#"[{"Year": 2023, "Month": 7, "Rainfall": 540.0, "Temperature": 28.1, "Tidal_Range": 3.1}]"#;
    let records: Vec<ClimateRecord> = serde_json::from_str(raw).unwrap();
    assert_eq!(records[0].is_monsoon, None);
    assert_eq!(records[0].monsoon_flag(), 1);
}
