use apptrack_core::models::{DateTime, RecordView, Submission, SubmissionData};

/// The latest known pipeline event of a submission: apply time, assessment,
/// written exam, current-status date, or any interview.
pub fn latest_event(data: &SubmissionData) -> Option<DateTime> {
    [
        data.apply_time,
        data.assessment_time,
        data.written_exam_time,
        data.current_status_date,
    ]
    .into_iter()
    .chain(data.interviews.iter().map(|interview| interview.time))
    .flatten()
    .max()
}

/// Whole days elapsed between the latest pipeline event and `now`.
///
/// Partial days are truncated. A future-dated event yields a negative count,
/// which is reported as is.
pub fn pool_days(data: &SubmissionData, now: DateTime) -> Option<i64> {
    latest_event(data).map(|latest| (now - latest).whole_days())
}

/// Pair a submission with its pool-days as of `now`.
pub fn view(submission: Submission, now: DateTime) -> RecordView {
    let pool_days = pool_days(&submission.data, now);
    RecordView {
        submission,
        pool_days,
    }
}
