//! Row types for mapping between tables and the core models.

use apptrack_core::models::{
    Compensation, DateTime, Interview, InterviewStage, Outcome, OwnerKey, Submission,
    SubmissionData,
};

/// The columns of `submission`, in the order [`SubmissionRow`] expects.
pub(crate) const SUBMISSION_COLUMNS: &str = "id, owner, group_key, is_primary, employer, \
    position, location, url, apply_time, assessment_time, written_exam_time, current_status, \
    current_status_date, outcome, compensation_kind, compensation_text, remarks, created_at, \
    updated_at";

#[derive(sqlx::FromRow)]
pub(crate) struct SubmissionRow {
    pub id: String,
    pub owner: String,
    pub group_key: Option<String>,
    pub is_primary: bool,
    pub employer: String,
    pub position: String,
    pub location: Option<String>,
    pub url: Option<String>,
    pub apply_time: Option<DateTime>,
    pub assessment_time: Option<DateTime>,
    pub written_exam_time: Option<DateTime>,
    pub current_status: Option<String>,
    pub current_status_date: Option<DateTime>,
    pub outcome: Option<String>,
    pub compensation_kind: Option<String>,
    pub compensation_text: Option<String>,
    pub remarks: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl SubmissionRow {
    pub fn into_submission(self, interviews: Vec<Interview>) -> Result<Submission, sqlx::Error> {
        let id = self
            .id
            .parse()
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let compensation = match self.compensation_kind {
            Some(kind) => Some(
                Compensation::from_parts(&kind, self.compensation_text).ok_or_else(|| {
                    sqlx::Error::Decode(format!("unknown compensation kind {kind:?}").into())
                })?,
            ),
            None => None,
        };

        Ok(Submission {
            id,
            owner: OwnerKey::from(self.owner),
            group_key: self.group_key.map(Into::into),
            is_primary: self.is_primary,
            data: SubmissionData {
                employer: self.employer,
                position: self.position,
                location: self.location,
                url: self.url,
                apply_time: self.apply_time,
                assessment_time: self.assessment_time,
                written_exam_time: self.written_exam_time,
                current_status: self.current_status,
                current_status_date: self.current_status_date,
                interviews,
                outcome: self.outcome.as_deref().map(Outcome::from_label),
                compensation,
                remarks: self.remarks,
            },
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct InterviewRow {
    pub submission_id: String,
    pub stage: String,
    pub time: Option<DateTime>,
}

impl From<InterviewRow> for Interview {
    fn from(row: InterviewRow) -> Self {
        Interview {
            stage: InterviewStage::from_label(&row.stage),
            time: row.time,
        }
    }
}
