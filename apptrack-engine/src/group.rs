use crate::{Map, rank};
use apptrack_core::models::{
    CompanyGroup, DateTime, GroupKey, OwnerKey, RecordView, Submission, SubmissionId,
};
use time::Duration;

/// How a group key was obtained for a new or moved submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The key to use
    pub key: GroupKey,
    /// Peers that carry no key yet and should receive `key`
    pub backfill: Vec<SubmissionId>,
    /// Whether `key` was freshly minted
    pub minted: bool,
}

/// Choose the group key for a submission by `owner` to `employer`.
///
/// `peers` are the owner's existing submissions to the same employer. The
/// first persisted key among them is adopted; otherwise a new key is minted
/// from `now`. Either way, peers without a key are listed for backfill.
pub fn resolve(
    owner: &OwnerKey,
    employer: &str,
    peers: &[Submission],
    now: DateTime,
) -> Resolution {
    let backfill = peers
        .iter()
        .filter(|peer| peer.group_key.is_none())
        .map(|peer| peer.id)
        .collect();

    match peers.iter().find_map(|peer| peer.group_key.clone()) {
        Some(key) => Resolution {
            key,
            backfill,
            minted: false,
        },
        None => Resolution {
            key: GroupKey::minted(owner, employer, now.assume_utc().unix_timestamp_nanos()),
            backfill,
            minted: true,
        },
    }
}

/// The timestamp used to compare positions when none is marked primary:
/// the current-status date, else `now` less the pool-days.
fn recency(view: &RecordView, now: DateTime) -> Option<DateTime> {
    view.submission.data.current_status_date.or_else(|| {
        view.pool_days
            .and_then(|days| now.checked_sub(Duration::days(days)))
    })
}

/// Pick the position that represents a group.
///
/// The first position flagged primary wins. Otherwise the most recent by
/// [`recency`] wins, the earliest position winning a tie. Positions with
/// no timestamps at all lose to any dated position; if none is dated, the
/// first position is chosen.
pub fn select_current(positions: &[RecordView], now: DateTime) -> usize {
    if let Some(index) = positions.iter().position(|view| view.submission.is_primary) {
        return index;
    }

    positions
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, DateTime)>, (index, view)| {
            match (best, recency(view, now)) {
                (None, Some(at)) => Some((index, at)),
                (Some((_, best_at)), Some(at)) if at > best_at => Some((index, at)),
                (best, _) => best,
            }
        })
        .map_or(0, |(index, _)| index)
}

/// Cluster records into company groups.
///
/// Records cluster by (owner, group key), with legacy records falling back
/// to their derived key. Groups appear in order of first appearance; within
/// a group, positions are ranked and a current position is selected.
pub fn group_records(records: Vec<RecordView>, now: DateTime) -> Vec<CompanyGroup> {
    let mut clusters: Map<(OwnerKey, GroupKey), Vec<RecordView>> = Map::default();
    for view in records {
        let key = (
            view.submission.owner.clone(),
            view.submission.effective_group_key(),
        );
        clusters.entry(key).or_default().push(view);
    }

    clusters
        .into_iter()
        .map(|((owner, group_key), mut positions)| {
            rank::rank_records(&mut positions);
            let current = select_current(&positions, now);
            let employer = positions
                .first()
                .map(|view| view.submission.data.employer.clone())
                .unwrap_or_default();
            CompanyGroup {
                owner,
                employer,
                group_key,
                positions,
                current,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use apptrack_core::models::{Outcome, SubmissionData};
    use time::macros::datetime;

    const NOW: DateTime = datetime!(2024-04-01 12:00);

    fn submission(owner: &str, employer: &str, position: &str, key: Option<&str>) -> Submission {
        Submission {
            id: SubmissionId::random(),
            owner: OwnerKey::from(owner),
            group_key: key.map(GroupKey::from),
            is_primary: false,
            data: SubmissionData::new(employer, position, datetime!(2024-03-01 12:00)),
            created_at: datetime!(2024-03-01 12:00),
            updated_at: datetime!(2024-03-01 12:00),
        }
    }

    fn view(submission: Submission, pool_days: Option<i64>) -> RecordView {
        RecordView {
            submission,
            pool_days,
        }
    }

    #[test]
    fn adopts_existing_key_and_backfills() {
        let owner = OwnerKey::from("alice");
        let legacy = submission("alice", "Acme", "QA", None);
        let keyed = submission("alice", "Acme", "SWE", Some("group_alice_Acme_1"));
        let resolution = resolve(&owner, "Acme", &[legacy.clone(), keyed], NOW);
        assert_eq!(resolution.key.as_str(), "group_alice_Acme_1");
        assert_eq!(resolution.backfill, [legacy.id]);
        assert!(!resolution.minted);
    }

    #[test]
    fn mints_when_no_peer_has_a_key() {
        let owner = OwnerKey::from("alice");
        let resolution = resolve(&owner, "Acme", &[], NOW);
        assert!(resolution.minted);
        assert!(resolution.backfill.is_empty());
        assert!(resolution.key.as_str().starts_with("group_alice_Acme_"));
        assert_eq!(resolution, resolve(&owner, "Acme", &[], NOW));
    }

    #[test]
    fn primary_flag_wins() {
        let mut primary = submission("alice", "Acme", "QA", None);
        primary.is_primary = true;
        let positions = [
            view(submission("alice", "Acme", "SWE", None), Some(0)),
            view(primary, Some(40)),
        ];
        assert_eq!(select_current(&positions, NOW), 1);
    }

    #[test]
    fn most_recent_event_wins_without_primary() {
        let mut dated = submission("alice", "Acme", "Dated", None);
        dated.data.current_status_date = Some(datetime!(2024-03-29 09:00));
        let positions = [
            view(submission("alice", "Acme", "Stale", None), Some(10)),
            view(dated, Some(30)),
            view(submission("alice", "Acme", "Fresh", None), Some(1)),
            view(submission("alice", "Acme", "Tied", None), Some(1)),
        ];
        // "Fresh" is now - 1 day (03-31 12:00), later than the status date
        assert_eq!(select_current(&positions, NOW), 2);
    }

    #[test]
    fn undated_positions_fall_back_to_first() {
        let positions = [
            view(submission("alice", "Acme", "A", None), None),
            view(submission("alice", "Acme", "B", None), None),
        ];
        assert_eq!(select_current(&positions, NOW), 0);
    }

    #[test]
    fn clusters_by_owner_and_key() {
        let mut offer = submission("alice", "Acme", "SWE", Some("group_alice_Acme_1"));
        offer.data.outcome = Some(Outcome::Offer);
        let records = vec![
            view(submission("alice", "Acme", "QA", Some("group_alice_Acme_1")), Some(3)),
            view(submission("bob", "Acme", "PM", None), Some(2)),
            view(submission("alice", "Initech", "SRE", None), Some(1)),
            view(offer, Some(9)),
            view(submission("bob", "Acme", "Design", None), Some(5)),
        ];

        let groups = group_records(records.clone(), NOW);
        let summary: Vec<_> = groups
            .iter()
            .map(|group| {
                (
                    group.owner.as_str(),
                    group.employer.as_str(),
                    group.positions.len(),
                )
            })
            .collect();
        assert_eq!(
            summary,
            [("alice", "Acme", 2), ("bob", "Acme", 2), ("alice", "Initech", 1)]
        );
        // ranked within the group: the offer leads
        assert_eq!(groups[0].positions[0].submission.data.position, "SWE");
        assert_eq!(groups[1].group_key.as_str(), "group_bob_Acme");

        // grouping is idempotent
        assert_eq!(group_records(records, NOW), groups);
    }
}
