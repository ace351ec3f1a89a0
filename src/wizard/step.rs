use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four ordered stages of the report form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Step {
    IssueType = 1,
    Photo = 2,
    Location = 3,
    Details = 4,
}

impl Step {
    pub const ALL: [Step; 4] = [Step::IssueType, Step::Photo, Step::Location, Step::Details];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Step::IssueType => "Issue Type",
            Step::Photo => "Photo",
            Step::Location => "Location",
            Step::Details => "Details",
        }
    }

    /// Width of the progress bar while this step is shown.
    pub fn progress_percent(self) -> u8 {
        self.number() * 25
    }

    pub fn next(self) -> Option<Step> {
        match self {
            Step::IssueType => Some(Step::Photo),
            Step::Photo => Some(Step::Location),
            Step::Location => Some(Step::Details),
            Step::Details => None,
        }
    }

    pub fn previous(self) -> Option<Step> {
        match self {
            Step::IssueType => None,
            Step::Photo => Some(Step::IssueType),
            Step::Location => Some(Step::Photo),
            Step::Details => Some(Step::Location),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.number(), self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_and_previous_stay_in_range() {
        for step in Step::ALL {
            if let Some(n) = step.next() {
                assert_eq!(n.number(), step.number() + 1);
                assert_eq!(n.previous(), Some(step));
            }
            assert!((1..=4).contains(&step.number()));
        }
        assert_eq!(Step::Details.next(), None);
        assert_eq!(Step::IssueType.previous(), None);
    }

    #[test]
    fn progress_fills_in_quarters() {
        let widths: Vec<u8> = Step::ALL.iter().map(|s| s.progress_percent()).collect();
        assert_eq!(widths, vec![25, 50, 75, 100]);
    }
}
