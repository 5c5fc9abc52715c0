use std::fmt::Display;

/// The final result of a submission.
///
/// Six labels are canonical and take part in ranking; anything else a user
/// typed is preserved verbatim as [`Outcome::Other`] and ranks with the
/// lowest tier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "String", into = "String")
)]
pub enum Outcome {
    /// An offer was received
    Offer,
    /// Still waiting on the employer
    Pending,
    /// Rejected at the resume screen
    RejectedAtResume,
    /// Rejected after the online assessment
    RejectedAtAssessment,
    /// Rejected after the written exam
    RejectedAtWrittenExam,
    /// Rejected after an interview round
    RejectedAtInterview,
    /// Free text outside the canonical vocabulary
    Other(String),
}

impl Outcome {
    /// The canonical rejection outcomes, in pipeline order.
    pub const REJECTIONS: [Outcome; 4] = [
        Outcome::RejectedAtResume,
        Outcome::RejectedAtAssessment,
        Outcome::RejectedAtWrittenExam,
        Outcome::RejectedAtInterview,
    ];

    /// Parse a stored or user-entered label. Never fails.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "OC" => Self::Offer,
            "PENDING" => Self::Pending,
            "简历挂" => Self::RejectedAtResume,
            "测评挂" => Self::RejectedAtAssessment,
            "笔试挂" => Self::RejectedAtWrittenExam,
            "面试挂" => Self::RejectedAtInterview,
            other => Self::Other(other.to_owned()),
        }
    }

    /// The label used in storage and spreadsheets.
    pub fn label(&self) -> &str {
        match self {
            Self::Offer => "OC",
            Self::Pending => "PENDING",
            Self::RejectedAtResume => "简历挂",
            Self::RejectedAtAssessment => "测评挂",
            Self::RejectedAtWrittenExam => "笔试挂",
            Self::RejectedAtInterview => "面试挂",
            Self::Other(text) => text,
        }
    }

    /// Whether this is one of the canonical rejection outcomes
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::RejectedAtResume
                | Self::RejectedAtAssessment
                | Self::RejectedAtWrittenExam
                | Self::RejectedAtInterview
        )
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for Outcome {
    fn from(value: String) -> Self {
        Self::from_label(&value)
    }
}

impl From<Outcome> for String {
    fn from(value: Outcome) -> Self {
        match value {
            Outcome::Other(text) => text,
            canonical => canonical.label().to_owned(),
        }
    }
}
