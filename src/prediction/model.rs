use crate::error::PredictionError;
use serde::{Deserialize, Serialize};
use smartcore::{
    ensemble::random_forest_regressor::{RandomForestRegressor, RandomForestRegressorParameters},
    linalg::basic::matrix::DenseMatrix,
    linear::{
        lasso::{Lasso, LassoParameters},
        linear_regression::{LinearRegression, LinearRegressionParameters},
        ridge_regression::{RidgeRegression, RidgeRegressionParameters},
    },
    tree::decision_tree_regressor::{DecisionTreeRegressor, DecisionTreeRegressorParameters},
};
use std::{fmt, str::FromStr};

type Matrix = DenseMatrix<f64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    RandomForest,
    GradientBoosting,
    Linear,
    Ridge,
    Lasso,
}

impl ModelKind {
    pub const ALL: [ModelKind; 5] = [
        ModelKind::RandomForest,
        ModelKind::GradientBoosting,
        ModelKind::Linear,
        ModelKind::Ridge,
        ModelKind::Lasso,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ModelKind::RandomForest => "random_forest",
            ModelKind::GradientBoosting => "gradient_boosting",
            ModelKind::Linear => "linear",
            ModelKind::Ridge => "ridge",
            ModelKind::Lasso => "lasso",
        }
    }
}

impl FromStr for ModelKind {
    type Err = PredictionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| PredictionError::UnknownModel(s.to_string()))
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Knobs for the tree ensembles. The linear models use fixed penalties
/// (ridge alpha 1.0, lasso alpha 0.1).
#[derive(Debug, Clone, Copy)]
pub struct Hyperparameters {
    pub n_trees: usize,
    pub boosting_stages: usize,
    pub learning_rate: f64,
    pub max_depth: u16,
    pub seed: u64,
}

pub(crate) enum Regressor {
    RandomForest(RandomForestRegressor<f64, f64, Matrix, Vec<f64>>),
    GradientBoosting(GradientBoosting),
    Linear(LinearRegression<f64, f64, Matrix, Vec<f64>>),
    Ridge(RidgeRegression<f64, f64, Matrix, Vec<f64>>),
    Lasso(Lasso<f64, f64, Matrix, Vec<f64>>),
}

impl Regressor {
    pub(crate) fn fit(
        kind: ModelKind,
        x: &Matrix,
        y: &Vec<f64>,
        params: &Hyperparameters,
    ) -> Result<Self, PredictionError> {
        let fitted = match kind {
            ModelKind::RandomForest => {
                let p = RandomForestRegressorParameters::default()
                    .with_n_trees(params.n_trees)
                    .with_seed(params.seed);
                Regressor::RandomForest(RandomForestRegressor::fit(x, y, p).map_err(model_err)?)
            }
            ModelKind::GradientBoosting => Regressor::GradientBoosting(GradientBoosting::fit(x, y, params)?),
            ModelKind::Linear => {
                let p = LinearRegressionParameters::default();
                Regressor::Linear(LinearRegression::fit(x, y, p).map_err(model_err)?)
            }
            ModelKind::Ridge => {
                let p = RidgeRegressionParameters::default().with_alpha(1.0);
                Regressor::Ridge(RidgeRegression::fit(x, y, p).map_err(model_err)?)
            }
            ModelKind::Lasso => {
                let p = LassoParameters::default().with_alpha(0.1);
                Regressor::Lasso(Lasso::fit(x, y, p).map_err(model_err)?)
            }
        };
        Ok(fitted)
    }

    pub(crate) fn predict(&self, x: &Matrix) -> Result<Vec<f64>, PredictionError> {
        match self {
            Regressor::RandomForest(m) => m.predict(x).map_err(model_err),
            Regressor::GradientBoosting(m) => m.predict(x),
            Regressor::Linear(m) => m.predict(x).map_err(model_err),
            Regressor::Ridge(m) => m.predict(x).map_err(model_err),
            Regressor::Lasso(m) => m.predict(x).map_err(model_err),
        }
    }
}

/// Least-squares boosting: starts from the mean target and fits each
/// shallow tree to the residuals left by the stages before it.
pub(crate) struct GradientBoosting {
    init: f64,
    learning_rate: f64,
    stages: Vec<DecisionTreeRegressor<f64, f64, Matrix, Vec<f64>>>,
}

impl GradientBoosting {
    fn fit(x: &Matrix, y: &[f64], params: &Hyperparameters) -> Result<Self, PredictionError> {
        let init = mean(y);
        let tree = DecisionTreeRegressorParameters::default().with_max_depth(params.max_depth);
        let mut fitted = vec![init; y.len()];
        let mut stages = Vec::with_capacity(params.boosting_stages);

        for _ in 0..params.boosting_stages {
            let residuals: Vec<f64> = y.iter().zip(&fitted).map(|(t, f)| t - f).collect();
            let stage = DecisionTreeRegressor::fit(x, &residuals, tree.clone()).map_err(model_err)?;
            let step = stage.predict(x).map_err(model_err)?;
            for (f, s) in fitted.iter_mut().zip(step) {
                *f += params.learning_rate * s;
            }
            stages.push(stage);
        }

        Ok(Self {
            init,
            learning_rate: params.learning_rate,
            stages,
        })
    }

    fn predict(&self, x: &Matrix) -> Result<Vec<f64>, PredictionError> {
        let mut out: Option<Vec<f64>> = None;
        for stage in &self.stages {
            let step = stage.predict(x).map_err(model_err)?;
            let acc = out.get_or_insert_with(|| vec![self.init; step.len()]);
            for (a, s) in acc.iter_mut().zip(step) {
                *a += self.learning_rate * s;
            }
        }
        out.ok_or_else(|| PredictionError::Model("gradient boosting has no stages".into()))
    }
}

/// Held-out error of a fitted model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub mae: f64,
    pub mse: f64,
    pub rmse: f64,
    pub r2: f64,
}

impl Metrics {
    /// `actual` and `predicted` must be the same, non-zero length.
    pub fn score(actual: &[f64], predicted: &[f64]) -> Self {
        let n = actual.len().max(1) as f64;
        let (abs, sq) = actual
            .iter()
            .zip(predicted)
            .fold((0.0, 0.0), |(abs, sq), (a, p)| {
                let e = a - p;
                (abs + e.abs(), sq + e * e)
            });
        let mae = abs / n;
        let mse = sq / n;

        let m = mean(actual);
        let total: f64 = actual.iter().map(|a| (a - m).powi(2)).sum();
        let r2 = if total > 0.0 {
            1.0 - sq / total
        } else if sq == 0.0 {
            1.0
        } else {
            0.0
        };

        Self {
            mae,
            mse,
            rmse: mse.sqrt(),
            r2,
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn model_err(e: smartcore::error::Failed) -> PredictionError {
    PredictionError::Model(e.to_string())
}
