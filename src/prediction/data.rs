use crate::error::PredictionError;
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

pub const YEAR_MIN: i32 = 2000;
pub const YEAR_MAX: i32 = 2050;
/// First year of projected (future) climate.
pub const FUTURE_YEAR_MIN: i32 = 2025;
/// Last year of the historical baseline used for projections.
const BASELINE_YEAR: i32 = 2024;

const MONTHLY_RAINFALL_MM: [f64; 12] = [
    10.2, 5.6, 8.4, 12.1, 18.3, 320.5, 580.2, 520.4, 312.6, 85.3, 25.6, 12.3,
];
const MONTHLY_TEMPERATURE_C: [f64; 12] = [
    24.1, 24.8, 26.7, 28.6, 30.5, 29.8, 28.2, 27.9, 28.4, 28.9, 27.6, 25.8,
];
const MONTHLY_TIDAL_RANGE_M: [f64; 12] = [2.8, 2.7, 2.6, 2.5, 2.6, 2.9, 3.1, 3.2, 3.1, 3.0, 2.9, 2.8];

/// Monthly climate figures for one stretch of coast.
///
/// Field names on the wire follow the erosion dataset columns
/// (`Year`, `Month`, `Rainfall`, `Temperature`, `Tidal_Range`, `Is_Monsoon`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateRecord {
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Month")]
    pub month: u32,
    /// Millimetres.
    #[serde(rename = "Rainfall")]
    pub rainfall: f64,
    /// Degrees Celsius.
    #[serde(rename = "Temperature")]
    pub temperature: f64,
    /// Metres.
    #[serde(rename = "Tidal_Range")]
    pub tidal_range: f64,
    /// 0 or 1. Derived from the month when absent.
    #[serde(rename = "Is_Monsoon", default, skip_serializing_if = "Option::is_none")]
    pub is_monsoon: Option<u8>,
}

impl ClimateRecord {
    pub fn validate(&self) -> Result<(), PredictionError> {
        if !(YEAR_MIN..=YEAR_MAX).contains(&self.year) {
            return Err(invalid("Year", format!("{} is outside {YEAR_MIN}..={YEAR_MAX}", self.year)));
        }
        if !(1..=12).contains(&self.month) {
            return Err(invalid("Month", format!("{} is outside 1..=12", self.month)));
        }
        for (field, value) in [
            ("Rainfall", self.rainfall),
            ("Temperature", self.temperature),
            ("Tidal_Range", self.tidal_range),
        ] {
            // also rejects NaN
            if !(value >= 0.0) {
                return Err(invalid(field, format!("{value} is not a non-negative number")));
            }
        }
        if let Some(flag) = self.is_monsoon {
            if flag > 1 {
                return Err(invalid("Is_Monsoon", format!("{flag} is not 0 or 1")));
            }
        }
        Ok(())
    }

    pub fn monsoon_flag(&self) -> u8 {
        self.is_monsoon
            .unwrap_or_else(|| u8::from(is_monsoon_month(self.month)))
    }
}

/// A climate record with its observed erosion rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledRecord {
    #[serde(flatten)]
    pub climate: ClimateRecord,
    #[serde(rename = "Erosion_Rate")]
    pub erosion_rate: f64,
}

/// June through September.
pub fn is_monsoon_month(month: u32) -> bool {
    (6..=9).contains(&month)
}

/// Synthetic monthly history of the Mumbai coast for `start..=end`.
///
/// Rainfall is monsoon heavy, temperature and tidal range follow a yearly
/// sine, and erosion grows with rainfall, tide, temperature and time.
pub fn generate_sample_data<R: Rng + ?Sized>(
    start: i32,
    end: i32,
    rng: &mut R,
) -> Result<Vec<LabeledRecord>, PredictionError> {
    if start > end {
        return Err(PredictionError::YearRange { start, end });
    }

    let mut rows = Vec::with_capacity(12 * (end - start + 1) as usize);
    for year in start..=end {
        for month in 1..=12u32 {
            let monsoon = is_monsoon_month(month);
            let season = (2.0 * PI * f64::from(month - 1) / 12.0).sin();

            let mut rainfall = normal(rng, 50.0, 20.0);
            if monsoon {
                rainfall += normal(rng, 300.0, 100.0);
            }
            let rainfall = rainfall.max(0.0);
            let temperature = 24.0 + 5.0 * season + normal(rng, 0.0, 1.5);
            let tidal_range = 2.5 + 0.5 * season + normal(rng, 0.0, 0.3);

            let mut erosion = 0.5
                + 0.002 * rainfall
                + 0.3 * tidal_range
                + 0.05 * temperature
                + 0.05 * f64::from(year - start)
                + normal(rng, 0.0, 0.5);
            if year > start {
                erosion += (f64::from(year) * 0.4).sin() * 0.3;
            }

            rows.push(LabeledRecord {
                climate: ClimateRecord {
                    year,
                    month,
                    rainfall: round_to(rainfall, 1),
                    temperature: round_to(temperature, 1),
                    tidal_range: round_to(tidal_range, 2),
                    is_monsoon: Some(u8::from(monsoon)),
                },
                erosion_rate: round_to(erosion.max(0.0), 2),
            });
        }
    }
    Ok(rows)
}

/// Projected monthly climate for `start..=end` from the historical monthly
/// means, with rainfall up 1% a year and a slow rise in temperature and tide.
pub fn generate_future_data<R: Rng + ?Sized>(
    start: i32,
    end: i32,
    rng: &mut R,
) -> Result<Vec<ClimateRecord>, PredictionError> {
    validate_future_range(start, end)?;

    let mut rows = Vec::with_capacity(12 * (end - start + 1) as usize);
    for year in start..=end {
        let years_out = f64::from(year - BASELINE_YEAR);
        for month in 1..=12u32 {
            let i = (month - 1) as usize;
            let rain_mean = MONTHLY_RAINFALL_MM[i];

            let rainfall = rain_mean * (1.0 + years_out * 0.01) + normal(rng, 0.0, rain_mean * 0.1);
            let temperature = MONTHLY_TEMPERATURE_C[i] + years_out * 0.03 + normal(rng, 0.0, 0.5);
            let tidal_range = MONTHLY_TIDAL_RANGE_M[i] + years_out * 0.01 + normal(rng, 0.0, 0.05);

            rows.push(ClimateRecord {
                year,
                month,
                rainfall: round_to(rainfall.max(0.0), 1),
                temperature: round_to(temperature, 1),
                tidal_range: round_to(tidal_range, 2),
                is_monsoon: Some(u8::from(is_monsoon_month(month))),
            });
        }
    }
    Ok(rows)
}

pub fn validate_future_range(start: i32, end: i32) -> Result<(), PredictionError> {
    for (field, year) in [("start_year", start), ("end_year", end)] {
        if !(FUTURE_YEAR_MIN..=YEAR_MAX).contains(&year) {
            return Err(invalid(field, format!("{year} is outside {FUTURE_YEAR_MIN}..={YEAR_MAX}")));
        }
    }
    if start > end {
        return Err(PredictionError::YearRange { start, end });
    }
    Ok(())
}

fn normal<R: Rng + ?Sized>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    let z: f64 = rng.sample(StandardNormal);
    mean + std_dev * z
}

fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

fn invalid(field: &'static str, reason: String) -> PredictionError {
    PredictionError::InvalidInput { field, reason }
}
