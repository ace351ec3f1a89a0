pub mod simulated;

use crate::{
    error::{GeolocationError, SubmissionError},
    report::{ReportSubmission, SubmissionReceipt},
};
use time::OffsetDateTime;

pub use simulated::{SimulatedGeolocator, SimulatedSink};

#[async_trait::async_trait]
pub trait Geolocator: Send + Sync {
    async fn locate(&self) -> Result<String, GeolocationError>;
}

#[async_trait::async_trait]
pub trait ReportSink: Send + Sync {
    async fn submit(&self, report: ReportSubmission) -> Result<SubmissionReceipt, SubmissionError>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// Always reports the same instant.
pub struct FixedClock(pub OffsetDateTime);

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}
