use super::DateTime;
use std::fmt::Display;

const ROUND_LABELS: [&str; 10] = [
    "一面", "二面", "三面", "四面", "五面", "六面", "七面", "八面", "九面", "十面",
];

/// Which interview in the pipeline an [`Interview`] records.
///
/// The canonical vocabulary is an AI screening interview followed by numbered
/// rounds one through ten. Other text is tolerated and preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "String", into = "String")
)]
pub enum InterviewStage {
    /// Automated / AI screening interview
    Ai,
    /// A numbered round, starting at 1
    Round(u8),
    /// A label outside the canonical vocabulary
    Other(String),
}

impl InterviewStage {
    /// Recognize a canonical stage label, returning `None` for anything else.
    pub fn canonical(label: &str) -> Option<Self> {
        let label = label.trim();
        if label == "AI面" {
            return Some(Self::Ai);
        }
        ROUND_LABELS
            .iter()
            .position(|round| *round == label)
            .map(|index| Self::Round(index as u8 + 1))
    }

    /// Parse any label, keeping unrecognized text as [`InterviewStage::Other`].
    pub fn from_label(label: &str) -> Self {
        Self::canonical(label).unwrap_or_else(|| Self::Other(label.trim().to_owned()))
    }

    /// The display label of this stage
    pub fn label(&self) -> &str {
        match self {
            Self::Ai => "AI面",
            Self::Round(n) => match ROUND_LABELS.get(usize::from(*n).wrapping_sub(1)) {
                Some(label) => label,
                None => "面试",
            },
            Self::Other(text) => text,
        }
    }
}

impl Display for InterviewStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for InterviewStage {
    fn from(value: String) -> Self {
        Self::from_label(&value)
    }
}

impl From<InterviewStage> for String {
    fn from(value: InterviewStage) -> Self {
        match value {
            InterviewStage::Other(text) => text,
            stage => stage.label().to_owned(),
        }
    }
}

/// One interview event of a submission.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interview {
    /// The interview stage
    pub stage: InterviewStage,
    /// When it took place, if known
    #[cfg_attr(feature = "serde", serde(default))]
    pub time: Option<DateTime>,
}

impl Interview {
    /// An interview at a known time
    pub fn at(stage: InterviewStage, time: DateTime) -> Self {
        Self {
            stage,
            time: Some(time),
        }
    }

    /// An interview whose time is not known (e.g. reconstructed from a timeline string)
    pub fn undated(stage: InterviewStage) -> Self {
        Self { stage, time: None }
    }
}

/// Order interviews chronologically, with undated interviews last.
///
/// The sort is stable, so undated interviews keep their relative order.
pub fn sort_interviews(interviews: &mut [Interview]) {
    interviews.sort_by_key(|interview| (interview.time.is_none(), interview.time));
}
