use super::{Outcome, OwnerKey};

/// Which records an operation covers.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Scope {
    /// A single owner's records
    Owner(OwnerKey),
    /// Every owner's records
    All,
}

/// The outcome clause of a [`SearchFilter`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum OutcomeFilter {
    /// Any of the canonical rejection outcomes
    AnyRejection,
    /// The pending outcome
    Pending,
    /// Exactly this outcome
    Exact(Outcome),
}

impl OutcomeFilter {
    /// Interpret a user-supplied outcome filter.
    ///
    /// `已挂` selects every rejection and `待定` selects pending. Anything else
    /// is an exact match, and blank input disables the clause.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            "" => None,
            "已挂" => Some(Self::AnyRejection),
            "待定" => Some(Self::Pending),
            other => Some(Self::Exact(Outcome::from_label(other))),
        }
    }
}

/// Caller-supplied search criteria. Every clause is optional; present
/// clauses are combined conjunctively.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SearchFilter {
    /// Comma separated search terms (ASCII or full-width commas)
    pub keywords: Option<String>,
    /// Outcome clause
    pub outcome: Option<OutcomeFilter>,
    /// Exact current-status match
    pub status: Option<String>,
    /// Minimum annualized salary; ignored unless strictly positive
    pub min_salary: Option<f64>,
}

impl SearchFilter {
    /// The individual keyword terms, trimmed and without empties.
    pub fn terms(&self) -> Vec<&str> {
        self.keywords
            .as_deref()
            .map(|text| {
                text.split([',', '，'])
                    .map(str::trim)
                    .filter(|term| !term.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The salary threshold, when the clause is active.
    pub fn salary_threshold(&self) -> Option<f64> {
        self.min_salary.filter(|threshold| *threshold > 0.0)
    }

    /// The status clause, when non-blank.
    pub fn status(&self) -> Option<&str> {
        self.status
            .as_deref()
            .map(str::trim)
            .filter(|status| !status.is_empty())
    }
}
