use super::Step;
use crate::image::{ImageAttachment, ImagePreview};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueType {
    Pollution,
    Dumping,
    Wildlife,
    Erosion,
    Facilities,
    Other,
}

impl IssueType {
    pub const ALL: [IssueType; 6] = [
        IssueType::Pollution,
        IssueType::Dumping,
        IssueType::Wildlife,
        IssueType::Erosion,
        IssueType::Facilities,
        IssueType::Other,
    ];

    pub fn value(self) -> &'static str {
        match self {
            IssueType::Pollution => "pollution",
            IssueType::Dumping => "dumping",
            IssueType::Wildlife => "wildlife",
            IssueType::Erosion => "erosion",
            IssueType::Facilities => "facilities",
            IssueType::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            IssueType::Pollution => "Beach Pollution",
            IssueType::Dumping => "Illegal Dumping",
            IssueType::Wildlife => "Wildlife Hazard",
            IssueType::Erosion => "Coastal Erosion",
            IssueType::Facilities => "Damaged Facilities",
            IssueType::Other => "Other Issue",
        }
    }
}

impl FromStr for IssueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IssueType::ALL
            .into_iter()
            .find(|t| t.value() == s)
            .ok_or_else(|| format!("unknown issue type: {s}"))
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

/// Free-text fields of the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Description,
    Location,
    Coordinates,
    ContactEmail,
}

impl TextField {
    pub fn name(self) -> &'static str {
        match self {
            TextField::Description => "description",
            TextField::Location => "location",
            TextField::Coordinates => "coordinates",
            TextField::ContactEmail => "contact email",
        }
    }

    /// The step whose form shows this field.
    pub fn step(self) -> Step {
        match self {
            TextField::Location | TextField::Coordinates => Step::Location,
            TextField::Description | TextField::ContactEmail => Step::Details,
        }
    }
}

/// Field a validation gate found missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    IssueType,
    Photo,
    Location,
    Description,
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Requirement::IssueType => "an issue type",
            Requirement::Photo => "a photo",
            Requirement::Location => "a location",
            Requirement::Description => "a description",
        })
    }
}

/// The in-progress report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportDraft {
    pub issue_type: Option<IssueType>,
    pub description: String,
    pub location: String,
    pub coordinates: String,
    pub image: Option<ImageAttachment>,
    #[serde(skip)]
    pub image_preview: Option<ImagePreview>,
    pub contact_email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryLine {
    pub label: &'static str,
    pub value: String,
}

impl ReportDraft {
    pub fn field(&self, field: TextField) -> &str {
        match field {
            TextField::Description => &self.description,
            TextField::Location => &self.location,
            TextField::Coordinates => &self.coordinates,
            TextField::ContactEmail => &self.contact_email,
        }
    }

    pub(crate) fn field_mut(&mut self, field: TextField) -> &mut String {
        match field {
            TextField::Description => &mut self.description,
            TextField::Location => &mut self.location,
            TextField::Coordinates => &mut self.coordinates,
            TextField::ContactEmail => &mut self.contact_email,
        }
    }

    /// Required field of `step` that is still absent, if any.
    pub fn missing_for(&self, step: Step) -> Option<Requirement> {
        let missing = match step {
            Step::IssueType => self.issue_type.is_none(),
            Step::Photo => self.image_preview.is_none(),
            Step::Location => self.location.is_empty(),
            Step::Details => self.description.is_empty(),
        };
        missing.then_some(match step {
            Step::IssueType => Requirement::IssueType,
            Step::Photo => Requirement::Photo,
            Step::Location => Requirement::Location,
            Step::Details => Requirement::Description,
        })
    }

    /// Review lines shown before submitting.
    pub fn summary(&self) -> Vec<SummaryLine> {
        let mut lines = vec![
            SummaryLine {
                label: "Issue Type",
                value: self.issue_type.map(|t| t.label().to_string()).unwrap_or_default(),
            },
            SummaryLine {
                label: "Location",
                value: self.location.clone(),
            },
        ];
        if !self.coordinates.is_empty() {
            lines.push(SummaryLine {
                label: "Coordinates",
                value: self.coordinates.clone(),
            });
        }
        lines.push(SummaryLine {
            label: "Photo",
            value: self
                .image
                .as_ref()
                .map(|i| i.name.clone())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| "Uploaded".to_string()),
        });
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_type_parses_its_own_value() {
        for t in IssueType::ALL {
            assert_eq!(t.value().parse::<IssueType>(), Ok(t));
        }
        assert!("tsunami".parse::<IssueType>().is_err());
    }

    #[test]
    fn issue_type_serializes_lowercase() {
        let raw = serde_json::to_string(&IssueType::Facilities).unwrap();
        assert_eq!(raw, "\"facilities\"");
    }

    #[test]
    fn summary_skips_empty_coordinates() {
        let draft = ReportDraft {
            issue_type: Some(IssueType::Erosion),
            location: "Juhu Beach".into(),
            ..ReportDraft::default()
        };
        let labels: Vec<&str> = draft.summary().iter().map(|l| l.label).collect();
        assert_eq!(labels, vec!["Issue Type", "Location", "Photo"]);
        assert_eq!(draft.summary()[0].value, "Coastal Erosion");
        assert_eq!(draft.summary()[2].value, "Uploaded");
    }

    #[test]
    fn preview_is_left_out_of_serialized_draft() {
        let draft = ReportDraft {
            image_preview: Some(ImagePreview {
                data_url: "data:image/png;base64,AAAA".into(),
            }),
            ..ReportDraft::default()
        };
        let raw = serde_json::to_string(&draft).unwrap();
        assert!(!raw.contains("base64"));
    }
}
