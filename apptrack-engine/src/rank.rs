use apptrack_core::models::{CompanyGroup, DateTime, GroupKey, Outcome, RecordView};
use std::cmp::{Ordering, Reverse};

/// The priority class of an outcome. Lower sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    /// An offer
    Offer,
    /// Waiting on the employer
    Pending,
    /// Rejected, unrecognized, or not yet known
    Closed,
}

impl Tier {
    /// Classify an outcome
    pub fn of(outcome: Option<&Outcome>) -> Self {
        match outcome {
            Some(Outcome::Offer) => Tier::Offer,
            Some(Outcome::Pending) => Tier::Pending,
            _ => Tier::Closed,
        }
    }
}

/// How company groups are ordered within an outcome tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum CompanyOrder {
    /// Fewest days in the pipeline first (offers keep their relative order)
    #[default]
    PoolDays,
    /// Most recently modified first
    UpdatedAt,
    /// Most recently applied first
    AppliedAt,
    /// Most recently created first
    CreatedAt,
}

fn tier(view: &RecordView) -> Tier {
    Tier::of(view.submission.data.outcome.as_ref())
}

/// The ranking key of a record: tier, then ascending pool-days for pending
/// and closed records, with unknown pool-days after known ones.
pub fn rank_key(view: &RecordView) -> (Tier, bool, i64) {
    match tier(view) {
        Tier::Offer => (Tier::Offer, false, 0),
        other => (
            other,
            view.pool_days.is_none(),
            view.pool_days.unwrap_or_default(),
        ),
    }
}

/// Sort records by [`rank_key`]. The sort is stable.
pub fn rank_records(records: &mut [RecordView]) {
    records.sort_by_key(rank_key);
}

// Four levels: rejections outrank free text, which outranks no outcome at all
fn flat_priority(outcome: Option<&Outcome>) -> u8 {
    match outcome {
        Some(Outcome::Offer) => 0,
        Some(Outcome::Pending) => 1,
        Some(outcome) if outcome.is_rejection() => 2,
        Some(_) => 3,
        None => 4,
    }
}

/// Order an ungrouped listing: a company's records are kept adjacent (by
/// group key), ordered by outcome within the company, most recently updated
/// first.
pub fn order_flat(records: &mut [RecordView]) {
    records.sort_by_cached_key(|view| -> (GroupKey, u8, Reverse<DateTime>) {
        let submission = &view.submission;
        (
            submission.effective_group_key(),
            flat_priority(submission.data.outcome.as_ref()),
            Reverse(submission.updated_at),
        )
    });
}

/// Order company groups by the tier of their current position, then by `order`.
pub fn rank_companies(groups: &mut [CompanyGroup], order: CompanyOrder) {
    groups.sort_by(|a, b| match (a.current_position(), b.current_position()) {
        (Some(a), Some(b)) => compare_current(a, b, order),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

fn compare_current(a: &RecordView, b: &RecordView, order: CompanyOrder) -> Ordering {
    let (a_sub, b_sub) = (&a.submission, &b.submission);
    match order {
        CompanyOrder::PoolDays => rank_key(a).cmp(&rank_key(b)),
        CompanyOrder::UpdatedAt => tier(a)
            .cmp(&tier(b))
            .then_with(|| b_sub.updated_at.cmp(&a_sub.updated_at)),
        CompanyOrder::AppliedAt => tier(a)
            .cmp(&tier(b))
            .then_with(|| b_sub.data.apply_time.cmp(&a_sub.data.apply_time)),
        CompanyOrder::CreatedAt => tier(a)
            .cmp(&tier(b))
            .then_with(|| b_sub.created_at.cmp(&a_sub.created_at)),
    }
}
