use super::{DateTime, Submission};
use std::cmp::Ordering;

/// A queryable column of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Field {
    /// The owner key
    Owner,
    /// The persisted group key (null for legacy rows)
    GroupKey,
    /// The primary flag
    IsPrimary,
    /// Employer name
    Employer,
    /// Position title
    Position,
    /// Work location
    Location,
    /// Current status label
    CurrentStatus,
    /// Outcome label
    Outcome,
    /// Apply time
    ApplyTime,
    /// Creation timestamp
    CreatedAt,
    /// Last modification timestamp
    UpdatedAt,
}

/// A literal to compare a [`Field`] against.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum Value {
    /// Boolean literal
    Bool(bool),
    /// Timestamp literal
    Time(DateTime),
    /// Text literal
    Text(String),
}

impl Value {
    fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Time(a), Value::Time(b)) => Some(a.cmp(b)),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<DateTime> for Value {
    fn from(value: DateTime) -> Self {
        Self::Time(value)
    }
}

/// A composable filter over submissions.
///
/// Stores translate this tree into their own query language; [`Predicate::matches`]
/// is the reference semantics they must agree with. A comparison against a
/// null field is false, except for [`Predicate::IsNull`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Predicate {
    /// Matches everything
    All,
    /// Field equals value
    Eq(Field, Value),
    /// Field equals any of the values
    In(Field, Vec<Value>),
    /// Text field contains the needle, ignoring ASCII case
    Contains(Field, String),
    /// Text field starts with the prefix, ignoring ASCII case
    StartsWith(Field, String),
    /// Field is greater than or equal to value
    Ge(Field, Value),
    /// Field is less than or equal to value
    Le(Field, Value),
    /// Field is strictly less than value
    Lt(Field, Value),
    /// Field is null
    IsNull(Field),
    /// Every child matches (an empty conjunction matches everything)
    And(Vec<Predicate>),
    /// Some child matches (an empty disjunction matches nothing)
    Or(Vec<Predicate>),
}

impl Predicate {
    /// Conjunction of `self` and `other`, flattening where possible.
    pub fn and(self, other: Predicate) -> Predicate {
        match (self, other) {
            (Predicate::All, p) | (p, Predicate::All) => p,
            (Predicate::And(mut lhs), Predicate::And(rhs)) => {
                lhs.extend(rhs);
                Predicate::And(lhs)
            }
            (Predicate::And(mut lhs), p) => {
                lhs.push(p);
                Predicate::And(lhs)
            }
            (p, q) => Predicate::And(vec![p, q]),
        }
    }

    /// Evaluate the predicate against a submission.
    pub fn matches(&self, record: &Submission) -> bool {
        match self {
            Predicate::All => true,
            Predicate::Eq(field, value) => {
                field_value(record, *field).is_some_and(|actual| actual == *value)
            }
            Predicate::In(field, values) => field_value(record, *field)
                .is_some_and(|actual| values.iter().any(|value| actual == *value)),
            Predicate::Contains(field, needle) => text_value(record, *field).is_some_and(|text| {
                text.to_ascii_lowercase()
                    .contains(&needle.to_ascii_lowercase())
            }),
            Predicate::StartsWith(field, prefix) => {
                text_value(record, *field).is_some_and(|text| {
                    text.to_ascii_lowercase()
                        .starts_with(&prefix.to_ascii_lowercase())
                })
            }
            Predicate::Ge(field, value) => {
                compare(record, *field, value).is_some_and(Ordering::is_ge)
            }
            Predicate::Le(field, value) => {
                compare(record, *field, value).is_some_and(Ordering::is_le)
            }
            Predicate::Lt(field, value) => {
                compare(record, *field, value).is_some_and(Ordering::is_lt)
            }
            Predicate::IsNull(field) => field_value(record, *field).is_none(),
            Predicate::And(children) => children.iter().all(|child| child.matches(record)),
            Predicate::Or(children) => children.iter().any(|child| child.matches(record)),
        }
    }
}

fn compare(record: &Submission, field: Field, value: &Value) -> Option<Ordering> {
    field_value(record, field)?.compare(value)
}

fn text_value(record: &Submission, field: Field) -> Option<String> {
    match field_value(record, field)? {
        Value::Text(text) => Some(text),
        _ => None,
    }
}

fn field_value(record: &Submission, field: Field) -> Option<Value> {
    let data = &record.data;
    match field {
        Field::Owner => Some(Value::Text(record.owner.to_string())),
        Field::GroupKey => record.group_key.as_ref().map(|key| key.to_string().into()),
        Field::IsPrimary => Some(Value::Bool(record.is_primary)),
        Field::Employer => Some(data.employer.clone().into()),
        Field::Position => Some(data.position.clone().into()),
        Field::Location => data.location.clone().map(Value::Text),
        Field::CurrentStatus => data.current_status.clone().map(Value::Text),
        Field::Outcome => data.outcome.as_ref().map(|o| o.label().into()),
        Field::ApplyTime => data.apply_time.map(Value::Time),
        Field::CreatedAt => Some(Value::Time(record.created_at)),
        Field::UpdatedAt => Some(Value::Time(record.updated_at)),
    }
}
