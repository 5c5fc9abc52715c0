use super::{GroupKey, OwnerKey, Submission, SubmissionData};

/// A stored submission together with its computed pool-days.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecordView {
    /// The submission
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub submission: Submission,
    /// Whole days since the latest known pipeline event, `None` if the
    /// submission carries no timestamps at all
    pub pool_days: Option<i64>,
}

/// All submissions of one owner to one employer.
///
/// This is derived on read and never persisted.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompanyGroup {
    /// The owner of every position in the group
    pub owner: OwnerKey,
    /// The employer name
    pub employer: String,
    /// The group key shared by every position
    pub group_key: GroupKey,
    /// The positions, ranked
    pub positions: Vec<RecordView>,
    /// Index into `positions` of the position that represents the group
    pub current: usize,
}

impl CompanyGroup {
    /// The position that represents the group.
    pub fn current_position(&self) -> Option<&RecordView> {
        self.positions.get(self.current)
    }
}

/// A row decoded from a spreadsheet, prior to persistence.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImportedRow {
    /// The decoded fields
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub data: SubmissionData,
    /// The pool-days figure found in the file; informational only
    pub pool_days: Option<i64>,
}
