use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErosionReading {
    pub year: u16,
    /// Cumulative shoreline retreat since the first reading, in metres.
    pub erosion_m: f64,
}

const fn reading(year: u16, erosion_m: f64) -> ErosionReading {
    ErosionReading { year, erosion_m }
}

/// Measured retreat of the Mumbai shoreline, 2017 to 2025.
pub const MUMBAI_SHORELINE: [ErosionReading; 9] = [
    reading(2017, 0.0),
    reading(2018, 1.2),
    reading(2019, 2.8),
    reading(2020, 4.5),
    reading(2021, 4.8),
    reading(2022, 5.9),
    reading(2023, 6.7),
    reading(2024, 7.3),
    reading(2025, 8.2),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErosionSummary {
    pub first_year: u16,
    pub last_year: u16,
    pub total_m: f64,
    /// Rounded to centimetres.
    pub average_annual_m: f64,
    pub latest_m: f64,
}

impl ErosionSummary {
    pub fn from_readings(readings: &[ErosionReading]) -> Option<Self> {
        let first = readings.first()?;
        let last = readings.last()?;
        let total = last.erosion_m - first.erosion_m;
        let intervals = readings.len() - 1;
        let average = if intervals == 0 {
            0.0
        } else {
            round_cm(total / intervals as f64)
        };

        Some(Self {
            first_year: first.year,
            last_year: last.year,
            total_m: total,
            average_annual_m: average,
            latest_m: last.erosion_m,
        })
    }
}

fn round_cm(metres: f64) -> f64 {
    (metres * 100.0).round() / 100.0
}
