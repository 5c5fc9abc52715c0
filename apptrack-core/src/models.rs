mod compensation;
mod filter;
mod group;
mod ids;
mod interview;
mod outcome;
mod predicate;
mod submission;

pub use compensation::Compensation;
pub use filter::{OutcomeFilter, Scope, SearchFilter};
pub use group::{CompanyGroup, ImportedRow, RecordView};
pub use ids::{GroupKey, OwnerKey, SubmissionId};
pub use interview::{Interview, InterviewStage, sort_interviews};
pub use outcome::Outcome;
pub use predicate::{Field, Predicate, Value};
pub use submission::{Submission, SubmissionData};

/// Timestamps are wall-clock values without an offset, as entered by the user.
pub type DateTime = time::PrimitiveDateTime;

// Label vocabulary shared by the codec, the filter engine and the store.

/// The label of the "submitted" pipeline step.
pub const STEP_SUBMITTED: &str = "投递";
/// The label of the "online assessment" pipeline step.
pub const STEP_ASSESSMENT: &str = "测评";
/// The label of the "written exam" pipeline step.
pub const STEP_WRITTEN_EXAM: &str = "笔试";
/// The label appended to a timeline when the outcome is an offer.
pub const STEP_OFFER: &str = "Offer";
