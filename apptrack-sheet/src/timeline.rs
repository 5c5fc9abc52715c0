//! The human-readable progress column.

use apptrack_core::models::{
    Interview, InterviewStage, Outcome, STEP_ASSESSMENT, STEP_OFFER, STEP_SUBMITTED,
    STEP_WRITTEN_EXAM, SubmissionData,
};

/// Separator between timeline steps.
pub const ARROW: &str = " → ";

/// Describe the progress of a submission.
///
/// With a current status set, the timeline is just `投递 → <status>` (the
/// first step only when an apply time is known). Otherwise it lists each
/// dated step: submission, assessment, written exam, then every dated
/// interview chronologically, finishing with `Offer` on an offer.
pub fn render(data: &SubmissionData) -> String {
    if let Some(status) = data.status() {
        let submitted = if data.apply_time.is_some() {
            STEP_SUBMITTED
        } else {
            ""
        };
        return format!("{submitted}{ARROW}{status}");
    }

    let mut steps: Vec<&str> = Vec::new();
    if data.apply_time.is_some() {
        steps.push(STEP_SUBMITTED);
    }
    if data.assessment_time.is_some() {
        steps.push(STEP_ASSESSMENT);
    }
    if data.written_exam_time.is_some() {
        steps.push(STEP_WRITTEN_EXAM);
    }

    let mut dated: Vec<&Interview> = data
        .interviews
        .iter()
        .filter(|interview| interview.time.is_some())
        .collect();
    dated.sort_by_key(|interview| interview.time);
    steps.extend(dated.into_iter().map(|interview| interview.stage.label()));

    if data.outcome == Some(Outcome::Offer) {
        steps.push(STEP_OFFER);
    }
    steps.join(ARROW)
}

/// Recover interviews from a timeline string.
///
/// Only canonical stage names are recognized, and the result carries no
/// timestamps.
pub fn parse(text: &str) -> Vec<Interview> {
    text.split(ARROW)
        .filter_map(InterviewStage::canonical)
        .map(Interview::undated)
        .collect()
}
