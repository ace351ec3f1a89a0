use super::data::ClimateRecord;
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use std::f64::consts::PI;

pub const FEATURE_COUNT: usize = 7;

pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "TimeIndex",
    "Rainfall",
    "Temperature",
    "Tidal_Range",
    "Month_sin",
    "Month_cos",
    "Is_Monsoon",
];

pub type FeatureRow = [f64; FEATURE_COUNT];

/// Model inputs for one record, in [`FEATURE_NAMES`] order.
///
/// `TimeIndex` counts years since 2000 with the month as a twelfth.
pub fn features(record: &ClimateRecord) -> FeatureRow {
    let month = f64::from(record.month);
    let angle = 2.0 * PI * month / 12.0;
    [
        f64::from(record.year) + month / 12.0 - 2000.0,
        record.rainfall,
        record.temperature,
        record.tidal_range,
        angle.sin(),
        angle.cos(),
        f64::from(record.monsoon_flag()),
    ]
}

/// Standardizes each feature to zero mean and unit variance over the rows it was fit on.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureScaler {
    mean: FeatureRow,
    scale: FeatureRow,
}

impl FeatureScaler {
    pub fn fit(rows: &[FeatureRow]) -> Self {
        let n = rows.len().max(1) as f64;
        let mut mean = [0.0; FEATURE_COUNT];
        for row in rows {
            for (m, v) in mean.iter_mut().zip(row) {
                *m += v / n;
            }
        }

        let mut scale = [0.0; FEATURE_COUNT];
        for row in rows {
            for ((s, v), m) in scale.iter_mut().zip(row).zip(&mean) {
                *s += (v - m).powi(2) / n;
            }
        }
        for s in &mut scale {
            *s = s.sqrt();
            // constant column; leave it centred but unscaled
            if *s == 0.0 {
                *s = 1.0;
            }
        }
        Self { mean, scale }
    }

    pub fn transform(&self, row: &FeatureRow) -> Vec<f64> {
        row.iter()
            .zip(&self.mean)
            .zip(&self.scale)
            .map(|((v, m), s)| (v - m) / s)
            .collect()
    }

    pub fn mean(&self) -> &FeatureRow {
        &self.mean
    }

    pub fn scale(&self) -> &FeatureRow {
        &self.scale
    }
}

/// Shuffles `rows` with `seed` and holds out `ceil(len * test_fraction)` of them.
///
/// Returns `(train, test)`.
pub fn train_test_split<T: Clone>(rows: &[T], test_fraction: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let mut order: Vec<usize> = (0..rows.len()).collect();
    order.shuffle(&mut StdRng::seed_from_u64(seed));

    let test_len = ((rows.len() as f64) * test_fraction).ceil() as usize;
    let test_len = test_len.min(rows.len());
    let (test, train) = order.split_at(test_len);
    let pick = |idx: &[usize]| idx.iter().map(|&i| rows[i].clone()).collect::<Vec<_>>();
    (pick(train), pick(test))
}
