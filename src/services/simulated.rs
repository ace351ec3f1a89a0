use super::{Clock, Geolocator, ReportSink};
use crate::{
    config::Config,
    error::{GeolocationError, SubmissionError},
    report::{ReportSubmission, SubmissionReceipt},
    util::{format_rfc3339, sha256_hex},
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

/// Stands in for the device location API: waits, then answers with fixed coordinates.
pub struct SimulatedGeolocator {
    delay: Duration,
    coordinates: String,
}

impl SimulatedGeolocator {
    pub fn new(cfg: &Config) -> Self {
        Self {
            delay: cfg.wizard.geolocation_delay(),
            coordinates: cfg.wizard.simulated_coordinates.clone(),
        }
    }
}

#[async_trait::async_trait]
impl Geolocator for SimulatedGeolocator {
    async fn locate(&self) -> Result<String, GeolocationError> {
        debug!("simulated geolocation, delay={:?}", self.delay);
        sleep(self.delay).await;
        Ok(self.coordinates.clone())
    }
}

/// Stands in for a report intake service: waits, logs the report, acknowledges it.
pub struct SimulatedSink {
    delay: Duration,
    clock: Arc<dyn Clock>,
}

impl SimulatedSink {
    pub fn new(cfg: &Config, clock: Arc<dyn Clock>) -> Self {
        Self {
            delay: cfg.wizard.submit_delay(),
            clock,
        }
    }
}

#[async_trait::async_trait]
impl ReportSink for SimulatedSink {
    async fn submit(&self, report: ReportSubmission) -> Result<SubmissionReceipt, SubmissionError> {
        let raw =
            serde_json::to_string(&report).map_err(|e| SubmissionError::Encode(e.to_string()))?;
        sleep(self.delay).await;

        let digest = sha256_hex(raw.as_bytes());
        let reference = format!("SS-{}", &digest[..12]);
        info!(reference = %reference, report = %raw, "report submitted");

        Ok(SubmissionReceipt {
            reference,
            issue_type: report.draft.issue_type,
            accepted_at: format_rfc3339(self.clock.now()),
        })
    }
}
