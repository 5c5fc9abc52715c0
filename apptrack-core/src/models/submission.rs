use super::{Compensation, DateTime, GroupKey, Interview, Outcome, OwnerKey, SubmissionId};

/// Every mutable field of a submission.
///
/// This is what a caller supplies on create and update, and what the
/// spreadsheet decoder produces. `apply_time` is optional here so that a
/// decoded row with an unreadable date can still be previewed; the engine
/// refuses to persist a submission without one.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SubmissionData {
    /// Employer name (required)
    pub employer: String,
    /// Position title (required)
    pub position: String,
    /// Work location
    pub location: Option<String>,
    /// A link to the posting or the employer's careers page
    pub url: Option<String>,
    /// When the application was sent (required for persistence)
    pub apply_time: Option<DateTime>,
    /// When the online assessment took place
    pub assessment_time: Option<DateTime>,
    /// When the written exam took place
    pub written_exam_time: Option<DateTime>,
    /// Free-form label for the current pipeline step (e.g. "已面试")
    pub current_status: Option<String>,
    /// When the current status was reached
    pub current_status_date: Option<DateTime>,
    /// Interview events
    pub interviews: Vec<Interview>,
    /// Final result
    pub outcome: Option<Outcome>,
    /// Expected compensation
    pub compensation: Option<Compensation>,
    /// Free-text remarks
    pub remarks: Option<String>,
}

impl SubmissionData {
    /// Convenience constructor for the three required fields.
    pub fn new(
        employer: impl Into<String>,
        position: impl Into<String>,
        apply_time: DateTime,
    ) -> Self {
        Self {
            employer: employer.into(),
            position: position.into(),
            apply_time: Some(apply_time),
            ..Default::default()
        }
    }

    /// The current status, treating blank text as absent.
    pub fn status(&self) -> Option<&str> {
        self.current_status
            .as_deref()
            .map(str::trim)
            .filter(|status| !status.is_empty())
    }
}

/// A stored submission.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Submission {
    /// Store-assigned identity
    pub id: SubmissionId,
    /// Who owns this record
    pub owner: OwnerKey,
    /// The company cluster; absent only for records that predate grouping
    pub group_key: Option<GroupKey>,
    /// Whether this is the group's primary position
    pub is_primary: bool,
    /// The submission's fields
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub data: SubmissionData,
    /// When the record was created
    pub created_at: DateTime,
    /// When the record was last modified
    pub updated_at: DateTime,
}

impl Submission {
    /// The persisted group key, or the deterministic fallback for legacy rows.
    pub fn effective_group_key(&self) -> GroupKey {
        self.group_key
            .clone()
            .unwrap_or_else(|| GroupKey::derived(&self.owner, &self.data.employer))
    }
}
