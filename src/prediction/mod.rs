//! Monthly shoreline erosion prediction for the Mumbai coast.
//!
//! A regressor is trained on synthetic climate history
//! ([`generate_sample_data`]) and then scores single records, batches, or
//! projected future climate ([`generate_future_data`]). Models live in memory
//! for the duration of one run.

mod data;
mod features;
mod model;

pub use data::{
    ClimateRecord, FUTURE_YEAR_MIN, LabeledRecord, YEAR_MAX, YEAR_MIN, generate_future_data,
    generate_sample_data, is_monsoon_month, validate_future_range,
};
pub use features::{FEATURE_COUNT, FEATURE_NAMES, FeatureRow, FeatureScaler, features, train_test_split};
pub use model::{Hyperparameters, Metrics, ModelKind};

use crate::{config, error::PredictionError};
use model::Regressor;
use rand::Rng;
use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::matrix::DenseMatrix;
use tracing::{debug, info};

/// Fewest labelled rows [`train`] accepts.
pub const MIN_TRAINING_ROWS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub model: ModelKind,
    pub train_rows: usize,
    pub test_rows: usize,
    pub metrics: Metrics,
}

/// A projected month with the model's erosion estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuturePrediction {
    #[serde(flatten)]
    pub climate: ClimateRecord,
    #[serde(rename = "Predicted_Erosion")]
    pub predicted_erosion: f64,
}

pub struct TrainedModel {
    kind: ModelKind,
    scaler: FeatureScaler,
    regressor: Regressor,
}

/// Splits `data`, fits the scaler and the configured regressor on the
/// training part, and scores it on the held-out part.
pub fn train(
    data: &[LabeledRecord],
    settings: &config::Prediction,
) -> Result<(TrainedModel, TrainingReport), PredictionError> {
    if data.len() < MIN_TRAINING_ROWS {
        return Err(PredictionError::NotEnoughData {
            needed: MIN_TRAINING_ROWS,
            got: data.len(),
        });
    }
    settings.validate()?;
    for row in data {
        row.climate.validate()?;
    }

    let (train_rows, test_rows) = train_test_split(data, settings.test_fraction, settings.seed);
    if train_rows.len() < 2 || test_rows.is_empty() {
        return Err(PredictionError::NotEnoughData {
            needed: MIN_TRAINING_ROWS,
            got: data.len(),
        });
    }

    let train_x: Vec<FeatureRow> = train_rows.iter().map(|r| features(&r.climate)).collect();
    let train_y: Vec<f64> = train_rows.iter().map(|r| r.erosion_rate).collect();
    let scaler = FeatureScaler::fit(&train_x);
    let x = scaled_matrix(&scaler, &train_x);

    debug!(
        model = %settings.model,
        rows = train_rows.len(),
        "fitting erosion model"
    );
    let regressor = Regressor::fit(settings.model, &x, &train_y, &settings.hyperparameters())?;
    let model = TrainedModel {
        kind: settings.model,
        scaler,
        regressor,
    };

    let test_x: Vec<FeatureRow> = test_rows.iter().map(|r| features(&r.climate)).collect();
    let test_y: Vec<f64> = test_rows.iter().map(|r| r.erosion_rate).collect();
    let predicted = model.predict_features(&test_x)?;
    let metrics = Metrics::score(&test_y, &predicted);
    info!(
        "trained {} on {} rows: mae {:.3} rmse {:.3} r2 {:.3}",
        settings.model,
        train_rows.len(),
        metrics.mae,
        metrics.rmse,
        metrics.r2
    );

    let report = TrainingReport {
        model: settings.model,
        train_rows: train_rows.len(),
        test_rows: test_rows.len(),
        metrics,
    };
    Ok((model, report))
}

impl TrainedModel {
    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn predict(&self, record: &ClimateRecord) -> Result<f64, PredictionError> {
        let rates = self.predict_batch(std::slice::from_ref(record))?;
        rates
            .into_iter()
            .next()
            .ok_or_else(|| PredictionError::Model("no prediction returned".into()))
    }

    /// Every record is validated before any is scored.
    pub fn predict_batch(&self, records: &[ClimateRecord]) -> Result<Vec<f64>, PredictionError> {
        for record in records {
            record.validate()?;
        }
        if records.is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<FeatureRow> = records.iter().map(features).collect();
        self.predict_features(&rows)
    }

    /// Projects climate for `start..=end` (2025 to 2050) and scores each month.
    pub fn predict_future<R: Rng + ?Sized>(
        &self,
        start: i32,
        end: i32,
        rng: &mut R,
    ) -> Result<Vec<FuturePrediction>, PredictionError> {
        let future = generate_future_data(start, end, rng)?;
        let rates = self.predict_batch(&future)?;
        Ok(future
            .into_iter()
            .zip(rates)
            .map(|(climate, predicted_erosion)| FuturePrediction {
                climate,
                predicted_erosion,
            })
            .collect())
    }

    fn predict_features(&self, rows: &[FeatureRow]) -> Result<Vec<f64>, PredictionError> {
        let x = scaled_matrix(&self.scaler, rows);
        self.regressor.predict(&x)
    }
}

fn scaled_matrix(scaler: &FeatureScaler, rows: &[FeatureRow]) -> DenseMatrix<f64> {
    let scaled: Vec<Vec<f64>> = rows.iter().map(|r| scaler.transform(r)).collect();
    DenseMatrix::from_2d_vec(&scaled)
}
