use crate::wizard::{IssueType, ReportDraft};
use serde::{Deserialize, Serialize};

/// A completed draft as handed to the report intake.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSubmission {
    pub draft: ReportDraft,
    pub submitted_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub reference: String,
    pub issue_type: Option<IssueType>,
    pub accepted_at: String,
}
