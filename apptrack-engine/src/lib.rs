#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

mod clock;
mod error;
mod service;

/// Search clauses and their translation into store predicates.
pub mod filter;

/// Company grouping and current-position selection.
pub mod group;

/// Pool-days: time elapsed since the latest pipeline event.
pub mod pool;

/// Outcome-tier ranking of records and company groups.
pub mod rank;

/// Compensation normalization.
pub mod salary;

pub use clock::Clock;
pub use error::{ExchangeError, SubmissionFailure, ValidationError};
pub use rank::CompanyOrder;
pub use service::{ImportMode, ImportSummary, Tracker};

// Insertion-ordered maps keep grouping deterministic
pub(crate) type Map<K, V> = indexmap::IndexMap<K, V, rustc_hash::FxBuildHasher>;
