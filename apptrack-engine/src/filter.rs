use crate::salary;
use apptrack_core::models::{
    Field, Outcome, OutcomeFilter, Predicate, Scope, SearchFilter, Submission, Value,
};

/// The fields a keyword is matched against.
const KEYWORD_FIELDS: [Field; 3] = [Field::Employer, Field::Position, Field::Location];

/// Build the storage-side predicate for a search. Everything but the
/// minimum-salary clause is expressed here.
pub fn storage_predicate(scope: &Scope, filter: &SearchFilter) -> Predicate {
    let mut predicate = match scope {
        Scope::Owner(owner) => Predicate::Eq(Field::Owner, owner.to_string().into()),
        Scope::All => Predicate::All,
    };

    if let Some(keywords) = keyword_predicate(&filter.terms()) {
        predicate = predicate.and(keywords);
    }
    if let Some(outcome) = &filter.outcome {
        predicate = predicate.and(outcome_predicate(outcome));
    }
    if let Some(status) = filter.status() {
        predicate = predicate.and(Predicate::Eq(Field::CurrentStatus, status.into()));
    }
    predicate
}

/// Any term matching any keyword field. `None` when there are no terms.
pub fn keyword_predicate(terms: &[&str]) -> Option<Predicate> {
    if terms.is_empty() {
        return None;
    }
    let clauses = terms
        .iter()
        .flat_map(|term| {
            KEYWORD_FIELDS
                .into_iter()
                .map(|field| Predicate::Contains(field, (*term).to_owned()))
        })
        .collect();
    Some(Predicate::Or(clauses))
}

/// The predicate for an outcome clause.
pub fn outcome_predicate(filter: &OutcomeFilter) -> Predicate {
    match filter {
        OutcomeFilter::AnyRejection => Predicate::In(
            Field::Outcome,
            Outcome::REJECTIONS
                .iter()
                .map(|outcome| Value::from(outcome.label()))
                .collect(),
        ),
        OutcomeFilter::Pending => Predicate::Eq(Field::Outcome, Outcome::Pending.label().into()),
        OutcomeFilter::Exact(outcome) => Predicate::Eq(Field::Outcome, outcome.label().into()),
    }
}

/// Apply the minimum-salary clause, if active.
pub fn retain_salary(mut records: Vec<Submission>, filter: &SearchFilter) -> Vec<Submission> {
    if let Some(threshold) = filter.salary_threshold() {
        records.retain(|record| salary::meets(record.data.compensation.as_ref(), threshold));
    }
    records
}

/// Evaluate the whole filter in memory.
pub fn matches(scope: &Scope, filter: &SearchFilter, record: &Submission) -> bool {
    storage_predicate(scope, filter).matches(record)
        && filter
            .salary_threshold()
            .is_none_or(|threshold| salary::meets(record.data.compensation.as_ref(), threshold))
}
