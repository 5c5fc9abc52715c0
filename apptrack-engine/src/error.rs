use apptrack_core::models::{SubmissionData, sort_interviews};
use apptrack_sheet::SheetError;

/// A submission was rejected before reaching the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Blank employer name
    #[error("employer is required")]
    MissingEmployer,
    /// Blank position title
    #[error("position is required")]
    MissingPosition,
    /// No apply time
    #[error("apply time is required")]
    MissingApplyTime,
    /// A batch insert with nothing in it
    #[error("a batch must contain at least one submission")]
    EmptyBatch,
    /// A batch insert spanning several employers
    #[error("every submission in a batch must name the same employer")]
    MixedEmployers,
    /// The requested primary index does not exist in the batch
    #[error("primary index {index} is out of range for a batch of {len}")]
    PrimaryOutOfRange {
        /// The requested index
        index: usize,
        /// The batch size
        len: usize,
    },
}

impl ValidationError {
    /// Check the required fields of an entered submission, trimming the
    /// employer and position and putting interviews in chronological order.
    pub fn validate(data: SubmissionData) -> Result<SubmissionData, Self> {
        let data = Self::validate_imported(data)?;
        if data.apply_time.is_none() {
            return Err(Self::MissingApplyTime);
        }
        Ok(data)
    }

    /// As [`validate`](Self::validate), but an apply time is optional.
    ///
    /// Spreadsheet cells that fail to parse arrive as `None`; such records
    /// are kept and simply have no pool-days.
    pub fn validate_imported(mut data: SubmissionData) -> Result<SubmissionData, Self> {
        data.employer = data.employer.trim().to_owned();
        data.position = data.position.trim().to_owned();
        if data.employer.is_empty() {
            return Err(Self::MissingEmployer);
        }
        if data.position.is_empty() {
            return Err(Self::MissingPosition);
        }
        sort_interviews(&mut data.interviews);
        Ok(data)
    }
}

/// Why a single-record operation did not happen.
///
/// These are returned as the inner error of a nested result; the outer
/// error is reserved for persistence failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionFailure {
    /// The input was invalid
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The target does not exist, or belongs to another owner
    #[error("submission not found")]
    NotFoundOrForbidden,
}

/// A failure of a whole spreadsheet import or export.
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError<E: std::error::Error + 'static> {
    /// The spreadsheet could not be read or written
    #[error(transparent)]
    Sheet(#[from] SheetError),
    /// The record store failed
    #[error("record store failure: {0}")]
    Store(#[source] E),
}
