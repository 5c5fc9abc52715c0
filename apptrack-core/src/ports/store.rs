use crate::models::{
    DateTime, GroupKey, OwnerKey, Predicate, Submission, SubmissionData, SubmissionId,
};
use std::future::Future;

/// Persistence for submissions and their interviews.
///
/// Implementations are plain CRUD; ownership checks, grouping and ranking all
/// live in the engine. Every method that writes takes an `as_of` timestamp,
/// which becomes the record's `updated_at` (and `created_at` on create).
///
/// The engine does not serialize concurrent writers. Two calls creating the
/// first submission for the same (owner, employer) pair may each mint a
/// group key; a store that wants to close that race must do so itself.
pub trait RecordStore {
    /// The error type for underlying persistence failures
    type Error: std::error::Error + Send + Sync + 'static;

    /// Insert a new submission along with its interviews, returning the
    /// store-assigned id.
    fn create(
        &self,
        owner: OwnerKey,
        group_key: Option<GroupKey>,
        is_primary: bool,
        data: SubmissionData,
        as_of: DateTime,
    ) -> impl Future<Output = Result<SubmissionId, Self::Error>> + Send;

    /// Fetch a single submission, if it exists.
    fn get_by_id(
        &self,
        id: SubmissionId,
    ) -> impl Future<Output = Result<Option<Submission>, Self::Error>> + Send;

    /// Every submission belonging to `owner`, in insertion order.
    fn list_by_owner(
        &self,
        owner: &OwnerKey,
    ) -> impl Future<Output = Result<Vec<Submission>, Self::Error>> + Send;

    /// Every submission, in insertion order.
    fn list_all(&self) -> impl Future<Output = Result<Vec<Submission>, Self::Error>> + Send;

    /// Every submission matching `predicate`, in insertion order.
    fn query(
        &self,
        predicate: &Predicate,
    ) -> impl Future<Output = Result<Vec<Submission>, Self::Error>> + Send;

    /// The number of submissions matching `predicate`.
    fn count(
        &self,
        predicate: &Predicate,
    ) -> impl Future<Output = Result<u64, Self::Error>> + Send;

    /// Replace every mutable field (and the interview list) of a submission.
    ///
    /// Returns `false` if no such submission exists.
    fn update(
        &self,
        id: SubmissionId,
        data: SubmissionData,
        group_key: Option<GroupKey>,
        is_primary: bool,
        as_of: DateTime,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// Set the group key of each listed submission, returning how many were
    /// changed. Used to backfill legacy records.
    fn assign_group(
        &self,
        ids: &[SubmissionId],
        group_key: &GroupKey,
    ) -> impl Future<Output = Result<u64, Self::Error>> + Send;

    /// Set the primary flag of a submission, returning `false` if it does not exist.
    fn set_primary(
        &self,
        id: SubmissionId,
        is_primary: bool,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// Delete a submission and its interviews, returning `false` if it did not exist.
    fn delete_by_id(
        &self,
        id: SubmissionId,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send;
}
