//! The four-step coastal issue report form.
//!
//! The wizard owns its draft and every piece of asynchronous work it starts
//! (photo reads, location lookups, the submission itself). That work runs on
//! tokio tasks held in a [`JoinSet`]; completions are applied only when the
//! caller drives [`ReportWizard::next_event`] or [`ReportWizard::settle`], so
//! the draft is never touched behind the caller's back. Dropping the wizard
//! aborts whatever is still pending.
//!
//! Operations that start work spawn onto the current tokio runtime and must be
//! called from within one.

mod draft;
mod step;

pub use draft::{IssueType, ReportDraft, Requirement, SummaryLine, TextField};
pub use step::Step;

use crate::{
    config::Config,
    error::{GeolocationError, ImageError, SubmissionError, WizardError},
    image::{self, ImageAttachment, ImageFile, LoadedImage},
    report::{ReportSubmission, SubmissionReceipt},
    services::{Clock, Geolocator, ReportSink, SimulatedGeolocator, SimulatedSink, SystemClock},
    util::format_rfc3339,
};
use std::sync::Arc;
use tokio::task::{AbortHandle, JoinSet};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStatus {
    Editing(Step),
    Submitting,
    Submitted,
}

/// Outcome of a piece of asynchronous work, after it has been applied.
#[derive(Debug)]
pub enum WizardEvent {
    ImageAttached(ImageAttachment),
    ImageFailed(ImageError),
    LocationResolved(String),
    LocationFailed(GeolocationError),
    Submitted(SubmissionReceipt),
    SubmissionFailed(SubmissionError),
}

enum Completion {
    Image {
        ticket: u64,
        result: Result<LoadedImage, ImageError>,
    },
    Location {
        ticket: u64,
        result: Result<String, GeolocationError>,
    },
    Submission {
        ticket: u64,
        result: Result<SubmissionReceipt, SubmissionError>,
    },
}

/// Tracks the latest task of one kind; anything older is stale.
#[derive(Default)]
struct Slot {
    ticket: u64,
    handle: Option<AbortHandle>,
}

impl Slot {
    fn supersede(&mut self) -> u64 {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        self.ticket += 1;
        self.ticket
    }

    fn arm(&mut self, handle: AbortHandle) {
        self.handle = Some(handle);
    }

    fn is_pending(&self) -> bool {
        self.handle.is_some()
    }

    /// Claims a completion if it belongs to the live task.
    fn claim(&mut self, ticket: u64) -> bool {
        if ticket == self.ticket && self.handle.is_some() {
            self.handle = None;
            true
        } else {
            false
        }
    }
}

pub struct ReportWizard {
    step: Step,
    draft: ReportDraft,
    submitting: bool,
    submitted: bool,
    receipt: Option<SubmissionReceipt>,
    cfg: Config,
    geolocator: Arc<dyn Geolocator>,
    sink: Arc<dyn ReportSink>,
    clock: Arc<dyn Clock>,
    tasks: JoinSet<Completion>,
    image_task: Slot,
    location_task: Slot,
    submit_task: Slot,
    coordinates_before_lookup: String,
}

impl ReportWizard {
    pub fn new(
        cfg: &Config,
        geolocator: Arc<dyn Geolocator>,
        sink: Arc<dyn ReportSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            step: Step::IssueType,
            draft: ReportDraft::default(),
            submitting: false,
            submitted: false,
            receipt: None,
            cfg: cfg.clone(),
            geolocator,
            sink,
            clock,
            tasks: JoinSet::new(),
            image_task: Slot::default(),
            location_task: Slot::default(),
            submit_task: Slot::default(),
            coordinates_before_lookup: String::new(),
        }
    }

    /// A wizard wired to the simulated location lookup and report intake.
    pub fn simulated(cfg: &Config) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let geolocator = Arc::new(SimulatedGeolocator::new(cfg));
        let sink = Arc::new(SimulatedSink::new(cfg, clock.clone()));
        Self::new(cfg, geolocator, sink, clock)
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn draft(&self) -> &ReportDraft {
        &self.draft
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn receipt(&self) -> Option<&SubmissionReceipt> {
        self.receipt.as_ref()
    }

    pub fn status(&self) -> WizardStatus {
        if self.submitted {
            WizardStatus::Submitted
        } else if self.submitting {
            WizardStatus::Submitting
        } else {
            WizardStatus::Editing(self.step)
        }
    }

    /// True while a photo read, location lookup or submission has not been applied yet.
    pub fn has_pending(&self) -> bool {
        self.image_task.is_pending() || self.location_task.is_pending() || self.submit_task.is_pending()
    }

    pub fn summary(&self) -> Vec<SummaryLine> {
        self.draft.summary()
    }

    pub fn select_issue_type(&mut self, issue_type: IssueType) -> Result<(), WizardError> {
        self.ensure_at("issue type", Step::IssueType)?;
        if self.draft.issue_type != Some(issue_type) {
            debug!("issue type {:?} -> {}", self.draft.issue_type, issue_type);
        }
        self.draft.issue_type = Some(issue_type);
        Ok(())
    }

    /// Starts reading `file`; the photo and its preview are set once the read completes.
    pub fn attach_image(&mut self, file: ImageFile) -> Result<(), WizardError> {
        self.ensure_at("photo", Step::Photo)?;
        let ticket = self.image_task.supersede();
        let limits = self.cfg.images.clone();
        info!("reading photo {}", file.name());
        let handle = self.tasks.spawn(async move {
            let result = image::read_preview(&file, &limits).await;
            Completion::Image { ticket, result }
        });
        self.image_task.arm(handle);
        Ok(())
    }

    pub fn clear_image(&mut self) -> Result<(), WizardError> {
        self.ensure_at("photo", Step::Photo)?;
        self.image_task.supersede();
        self.draft.image = None;
        self.draft.image_preview = None;
        Ok(())
    }

    pub fn set_field(&mut self, field: TextField, value: impl Into<String>) -> Result<(), WizardError> {
        self.ensure_at(field.name(), field.step())?;
        if field == TextField::Coordinates && self.location_task.is_pending() {
            debug!("coordinates edited; dropping pending location lookup");
            self.location_task.supersede();
        }
        *self.draft.field_mut(field) = value.into();
        Ok(())
    }

    /// Shows the placeholder in `coordinates` and starts a device location lookup.
    pub fn request_device_location(&mut self) -> Result<(), WizardError> {
        self.ensure_at(TextField::Coordinates.name(), Step::Location)?;
        if !self.location_task.is_pending() {
            self.coordinates_before_lookup = self.draft.coordinates.clone();
        }
        let ticket = self.location_task.supersede();
        self.draft.coordinates = self.cfg.wizard.locating_placeholder.clone();

        let geolocator = self.geolocator.clone();
        let handle = self.tasks.spawn(async move {
            let result = geolocator.locate().await;
            Completion::Location { ticket, result }
        });
        self.location_task.arm(handle);
        Ok(())
    }

    /// Moves to the next step if the current step's required field is present.
    pub fn advance(&mut self) -> Result<Step, WizardError> {
        self.ensure_open()?;
        let next = self.step.next().ok_or(WizardError::NoNextStep)?;
        if let Some(missing) = self.draft.missing_for(self.step) {
            warn!("step {} incomplete: {} is required", self.step, missing);
            return Err(WizardError::Incomplete(missing));
        }
        info!("step {} -> {}", self.step, next);
        self.step = next;
        Ok(next)
    }

    pub fn retreat(&mut self) -> Result<Step, WizardError> {
        self.ensure_open()?;
        let previous = self.step.previous().ok_or(WizardError::NoPreviousStep)?;
        info!("step {} -> {}", self.step, previous);
        self.step = previous;
        Ok(previous)
    }

    /// Hands the draft to the report sink. The outcome arrives as a [`WizardEvent`].
    pub fn submit(&mut self) -> Result<(), WizardError> {
        self.ensure_open()?;
        if self.step != Step::Details {
            return Err(WizardError::NotAtDetails(self.step));
        }
        if self.image_task.is_pending() {
            return Err(WizardError::Pending("photo read"));
        }
        if self.location_task.is_pending() {
            return Err(WizardError::Pending("location lookup"));
        }
        if let Some(missing) = Step::ALL.into_iter().find_map(|s| self.draft.missing_for(s)) {
            warn!("submit refused: {} is required", missing);
            return Err(WizardError::Incomplete(missing));
        }

        let submission = ReportSubmission {
            draft: self.draft.clone(),
            submitted_at: format_rfc3339(self.clock.now()),
        };
        let ticket = self.submit_task.supersede();
        let sink = self.sink.clone();
        info!("submitting report");
        let handle = self.tasks.spawn(async move {
            let result = sink.submit(submission).await;
            Completion::Submission { ticket, result }
        });
        self.submit_task.arm(handle);
        self.submitting = true;
        Ok(())
    }

    /// Back to an empty draft at step 1. Pending work is aborted.
    pub fn reset(&mut self) {
        self.tasks = JoinSet::new();
        self.image_task.supersede();
        self.location_task.supersede();
        self.submit_task.supersede();
        self.step = Step::IssueType;
        self.draft = ReportDraft::default();
        self.submitting = false;
        self.submitted = false;
        self.receipt = None;
        self.coordinates_before_lookup.clear();
        debug!("wizard reset");
    }

    /// Waits for the next pending completion and applies it.
    ///
    /// Returns `None` once nothing is left to wait for.
    pub async fn next_event(&mut self) -> Option<WizardEvent> {
        while let Some(joined) = self.tasks.join_next().await {
            let completion = match joined {
                Ok(c) => c,
                Err(e) if e.is_cancelled() => continue,
                Err(e) => std::panic::resume_unwind(e.into_panic()),
            };
            if let Some(event) = self.apply(completion) {
                return Some(event);
            }
        }
        None
    }

    /// Applies every pending completion.
    pub async fn settle(&mut self) -> Vec<WizardEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.next_event().await {
            events.push(event);
        }
        events
    }

    fn apply(&mut self, completion: Completion) -> Option<WizardEvent> {
        match completion {
            Completion::Image { ticket, result } => {
                if !self.image_task.claim(ticket) {
                    debug!("discarding stale photo read");
                    return None;
                }
                if self.is_locked() {
                    debug!("draft locked; dropping photo read");
                    return None;
                }
                match result {
                    Ok(loaded) => {
                        info!("photo {} attached", loaded.attachment.name);
                        self.draft.image = Some(loaded.attachment.clone());
                        self.draft.image_preview = Some(loaded.preview);
                        Some(WizardEvent::ImageAttached(loaded.attachment))
                    }
                    Err(e) => {
                        warn!("photo read failed: {e}");
                        Some(WizardEvent::ImageFailed(e))
                    }
                }
            }
            Completion::Location { ticket, result } => {
                if !self.location_task.claim(ticket) {
                    debug!("discarding stale location lookup");
                    return None;
                }
                if self.is_locked() {
                    debug!("draft locked; dropping location lookup");
                    return None;
                }
                match result {
                    Ok(coordinates) => {
                        info!("device location {}", coordinates);
                        self.draft.coordinates = coordinates.clone();
                        Some(WizardEvent::LocationResolved(coordinates))
                    }
                    Err(e) => {
                        warn!("location lookup failed: {e}");
                        self.draft.coordinates = std::mem::take(&mut self.coordinates_before_lookup);
                        Some(WizardEvent::LocationFailed(e))
                    }
                }
            }
            Completion::Submission { ticket, result } => {
                if !self.submit_task.claim(ticket) {
                    debug!("discarding stale submission");
                    return None;
                }
                self.submitting = false;
                match result {
                    Ok(receipt) => {
                        info!("report accepted as {}", receipt.reference);
                        self.submitted = true;
                        self.receipt = Some(receipt.clone());
                        Some(WizardEvent::Submitted(receipt))
                    }
                    Err(e) => {
                        warn!("submission failed: {e}");
                        Some(WizardEvent::SubmissionFailed(e))
                    }
                }
            }
        }
    }

    fn is_locked(&self) -> bool {
        self.submitting || self.submitted
    }

    fn ensure_open(&self) -> Result<(), WizardError> {
        if self.submitted {
            Err(WizardError::AlreadySubmitted)
        } else if self.submitting {
            Err(WizardError::SubmissionInFlight)
        } else {
            Ok(())
        }
    }

    fn ensure_at(&self, field: &'static str, owner: Step) -> Result<(), WizardError> {
        self.ensure_open()?;
        if self.step != owner {
            return Err(WizardError::NotEditable {
                field,
                step: self.step,
            });
        }
        Ok(())
    }
}
