//! Compilation of [`Predicate`] trees into SQL `where` clauses.
//!
//! SQL comparisons against `null` are never true, which is exactly the
//! in-memory rule that a null field fails every test but `IsNull`. SQLite's
//! `like` folds ASCII case only, again matching `Predicate::matches`.

use apptrack_core::models::{Field, Predicate, Value};
use sqlx::{QueryBuilder, Sqlite};

pub(crate) fn column(field: Field) -> &'static str {
    match field {
        Field::Owner => "owner",
        Field::GroupKey => "group_key",
        Field::IsPrimary => "is_primary",
        Field::Employer => "employer",
        Field::Position => "position",
        Field::Location => "location",
        Field::CurrentStatus => "current_status",
        Field::Outcome => "outcome",
        Field::ApplyTime => "apply_time",
        Field::CreatedAt => "created_at",
        Field::UpdatedAt => "updated_at",
    }
}

/// Append `predicate` to `builder` as a parenthesized boolean expression.
pub(crate) fn push_predicate(builder: &mut QueryBuilder<'_, Sqlite>, predicate: &Predicate) {
    match predicate {
        Predicate::All => {
            builder.push("1");
        }
        Predicate::Eq(field, value) => compare(builder, *field, " = ", value),
        Predicate::Ge(field, value) => compare(builder, *field, " >= ", value),
        Predicate::Le(field, value) => compare(builder, *field, " <= ", value),
        Predicate::Lt(field, value) => compare(builder, *field, " < ", value),
        Predicate::In(_, values) if values.is_empty() => {
            builder.push("0");
        }
        Predicate::In(field, values) => {
            builder.push("(").push(column(*field)).push(" in (");
            for (i, value) in values.iter().enumerate() {
                if i > 0 {
                    builder.push(", ");
                }
                push_value(builder, value);
            }
            builder.push("))");
        }
        Predicate::Contains(field, needle) => {
            like(builder, *field, format!("%{}%", escape_like(needle)));
        }
        Predicate::StartsWith(field, prefix) => {
            like(builder, *field, format!("{}%", escape_like(prefix)));
        }
        Predicate::IsNull(field) => {
            builder.push("(").push(column(*field)).push(" is null)");
        }
        Predicate::And(children) => junction(builder, children, " and ", "1"),
        Predicate::Or(children) => junction(builder, children, " or ", "0"),
    }
}

fn compare(builder: &mut QueryBuilder<'_, Sqlite>, field: Field, op: &str, value: &Value) {
    builder.push("(").push(column(field)).push(op);
    push_value(builder, value);
    builder.push(")");
}

fn like(builder: &mut QueryBuilder<'_, Sqlite>, field: Field, pattern: String) {
    builder
        .push("(")
        .push(column(field))
        .push(" like ")
        .push_bind(pattern)
        .push(" escape '\\')");
}

fn junction(
    builder: &mut QueryBuilder<'_, Sqlite>,
    children: &[Predicate],
    separator: &str,
    empty: &str,
) {
    if children.is_empty() {
        builder.push(empty);
        return;
    }
    builder.push("(");
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            builder.push(separator);
        }
        push_predicate(builder, child);
    }
    builder.push(")");
}

fn push_value(builder: &mut QueryBuilder<'_, Sqlite>, value: &Value) {
    match value {
        Value::Bool(flag) => builder.push_bind(*flag),
        Value::Time(time) => builder.push_bind(*time),
        Value::Text(text) => builder.push_bind(text.clone()),
    };
}

fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
