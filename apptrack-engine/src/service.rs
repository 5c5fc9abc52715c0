use crate::{
    Clock, CompanyOrder, ExchangeError, SubmissionFailure, ValidationError, filter, group, pool,
    rank,
};
use apptrack_core::{
    models::{
        CompanyGroup, Field, GroupKey, ImportedRow, OwnerKey, Predicate, RecordView, Scope,
        SearchFilter, Submission, SubmissionData, SubmissionId,
    },
    ports::RecordStore,
};
use apptrack_sheet::SheetError;
use rustc_hash::FxHashSet;
use tracing::{Level, event};

/// How an import treats the target owner's existing records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum ImportMode {
    /// Keep existing records and skip rows whose (employer, position) pair
    /// is already present
    #[default]
    SkipDuplicates,
    /// Delete every existing record of the owner first
    ReplaceAll,
}

/// Counts reported by an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImportSummary {
    /// Rows attempted, including rows that failed to decode
    pub processed: usize,
    /// Rows persisted
    pub succeeded: usize,
    /// Rows skipped as duplicates
    pub skipped: usize,
}

/// The application-tracking service.
///
/// `Tracker` holds no state of its own beyond its store and clock: every
/// operation reads what it needs from the store, computes pool-days as of
/// "now", and writes back through the [`RecordStore`] port.
///
/// Single-record operations return `Result<Result<T, SubmissionFailure>, S::Error>`:
/// the outer error is a storage failure, the inner one a domain failure
/// (invalid input, or a target that is missing or owned by someone else).
pub struct Tracker<S> {
    store: S,
    clock: Clock,
}

impl<S: RecordStore> Tracker<S> {
    /// A tracker on the system clock
    pub fn new(store: S) -> Self {
        Self::with_clock(store, Clock::System)
    }

    /// A tracker on the given clock
    pub fn with_clock(store: S, clock: Clock) -> Self {
        Self { store, clock }
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The clock in use
    pub fn clock(&self) -> Clock {
        self.clock
    }

    fn views(&self, records: Vec<Submission>) -> Vec<RecordView> {
        let now = self.clock.now();
        records
            .into_iter()
            .map(|record| pool::view(record, now))
            .collect()
    }

    fn flat(&self, records: Vec<Submission>) -> Vec<RecordView> {
        let mut views = self.views(records);
        rank::order_flat(&mut views);
        views
    }

    fn grouped(&self, records: Vec<Submission>, order: CompanyOrder) -> Vec<CompanyGroup> {
        let mut groups = group::group_records(self.views(records), self.clock.now());
        rank::rank_companies(&mut groups, order);
        groups
    }

    async fn in_scope(&self, scope: &Scope) -> Result<Vec<Submission>, S::Error> {
        match scope {
            Scope::Owner(owner) => self.store.list_by_owner(owner).await,
            Scope::All => self.store.list_all().await,
        }
    }

    /// Fetch a submission only if it belongs to `owner`.
    async fn owned(
        &self,
        owner: &OwnerKey,
        id: SubmissionId,
    ) -> Result<Option<Submission>, S::Error> {
        Ok(self
            .store
            .get_by_id(id)
            .await?
            .filter(|record| record.owner == *owner))
    }

    async fn peers(&self, owner: &OwnerKey, employer: &str) -> Result<Vec<Submission>, S::Error> {
        let predicate = Predicate::And(vec![
            Predicate::Eq(Field::Owner, owner.to_string().into()),
            Predicate::Eq(Field::Employer, employer.into()),
        ]);
        self.store.query(&predicate).await
    }

    /// Every member of the group `record` belongs to, itself included.
    async fn members(&self, record: &Submission) -> Result<Vec<Submission>, S::Error> {
        let key = record.effective_group_key();
        let mut members = self.store.list_by_owner(&record.owner).await?;
        members.retain(|member| member.effective_group_key() == key);
        Ok(members)
    }

    /// Resolve the group key for `employer`, backfilling it onto keyless peers.
    async fn resolve_group(
        &self,
        owner: &OwnerKey,
        employer: &str,
        peers: &[Submission],
    ) -> Result<GroupKey, S::Error> {
        let resolution = group::resolve(owner, employer, peers, self.clock.now());
        if resolution.minted {
            event!(Level::DEBUG, %owner, employer, key = %resolution.key, "minted group key");
        }
        if !resolution.backfill.is_empty() {
            let updated = self
                .store
                .assign_group(&resolution.backfill, &resolution.key)
                .await?;
            event!(
                Level::INFO,
                %owner,
                employer,
                key = %resolution.key,
                updated,
                "backfilled group key"
            );
        }
        Ok(resolution.key)
    }

    /// Every submission of `owner`, company entries adjacent and ranked.
    pub async fn list_for_owner(&self, owner: &OwnerKey) -> Result<Vec<RecordView>, S::Error> {
        Ok(self.flat(self.store.list_by_owner(owner).await?))
    }

    /// Every submission of every owner, company entries adjacent and ranked.
    pub async fn list_all(&self) -> Result<Vec<RecordView>, S::Error> {
        Ok(self.flat(self.store.list_all().await?))
    }

    /// Company groups in scope, ranked by their current positions.
    pub async fn companies(
        &self,
        scope: &Scope,
        order: CompanyOrder,
    ) -> Result<Vec<CompanyGroup>, S::Error> {
        Ok(self.grouped(self.in_scope(scope).await?, order))
    }

    /// Record a new submission, joining (or founding) its company group.
    pub async fn add_one(
        &self,
        owner: &OwnerKey,
        data: SubmissionData,
    ) -> Result<Result<SubmissionId, SubmissionFailure>, S::Error> {
        let data = match ValidationError::validate(data) {
            Ok(data) => data,
            Err(error) => {
                event!(Level::DEBUG, %owner, %error, "rejected submission");
                return Ok(Err(error.into()));
            }
        };
        Ok(Ok(self.insert(owner, data).await?))
    }

    // Store validated data in its company group
    async fn insert(
        &self,
        owner: &OwnerKey,
        data: SubmissionData,
    ) -> Result<SubmissionId, S::Error> {
        let peers = self.peers(owner, &data.employer).await?;
        let key = self.resolve_group(owner, &data.employer, &peers).await?;
        self.store
            .create(owner.clone(), Some(key), false, data, self.clock.now())
            .await
    }

    /// Record several positions at one employer.
    ///
    /// The submission at `primary` (default: the first) becomes the group's
    /// primary position, and any previous primary is demoted.
    pub async fn add_batch(
        &self,
        owner: &OwnerKey,
        batch: Vec<SubmissionData>,
        primary: Option<usize>,
    ) -> Result<Result<Vec<SubmissionId>, SubmissionFailure>, S::Error> {
        let batch = match validate_batch(batch, primary) {
            Ok(batch) => batch,
            Err(error) => {
                event!(Level::DEBUG, %owner, %error, "rejected batch");
                return Ok(Err(error.into()));
            }
        };
        let primary = primary.unwrap_or(0);
        // validate_batch guarantees a non-empty batch
        let employer = batch[0].employer.clone();

        let peers = self.peers(owner, &employer).await?;
        let key = self.resolve_group(owner, &employer, &peers).await?;
        for peer in peers.iter().filter(|peer| peer.is_primary) {
            self.store.set_primary(peer.id, false).await?;
        }

        let now = self.clock.now();
        let mut ids = Vec::with_capacity(batch.len());
        for (index, data) in batch.into_iter().enumerate() {
            let id = self
                .store
                .create(owner.clone(), Some(key.clone()), index == primary, data, now)
                .await?;
            ids.push(id);
        }
        event!(
            Level::INFO,
            %owner,
            employer = employer.as_str(),
            count = ids.len(),
            "added batch"
        );
        Ok(Ok(ids))
    }

    /// Replace every mutable field of a submission.
    ///
    /// Changing the employer moves the submission to that employer's group
    /// and clears its primary flag.
    pub async fn update_one(
        &self,
        owner: &OwnerKey,
        id: SubmissionId,
        data: SubmissionData,
    ) -> Result<Result<(), SubmissionFailure>, S::Error> {
        let Some(existing) = self.owned(owner, id).await? else {
            return Ok(Err(SubmissionFailure::NotFoundOrForbidden));
        };
        let data = match ValidationError::validate(data) {
            Ok(data) => data,
            Err(error) => {
                event!(Level::DEBUG, %owner, %id, %error, "rejected update");
                return Ok(Err(error.into()));
            }
        };

        let same_employer = existing.data.employer == data.employer;
        let (group_key, is_primary) = match existing.group_key {
            Some(key) if same_employer => (key, existing.is_primary),
            _ => {
                let peers: Vec<Submission> = self
                    .peers(owner, &data.employer)
                    .await?
                    .into_iter()
                    .filter(|peer| peer.id != id)
                    .collect();
                let key = self.resolve_group(owner, &data.employer, &peers).await?;
                if !same_employer {
                    event!(
                        Level::INFO,
                        %id,
                        from = existing.data.employer.as_str(),
                        to = data.employer.as_str(),
                        "moved submission"
                    );
                }
                (key, same_employer && existing.is_primary)
            }
        };

        let updated = self
            .store
            .update(id, data, Some(group_key), is_primary, self.clock.now())
            .await?;
        Ok(if updated {
            Ok(())
        } else {
            Err(SubmissionFailure::NotFoundOrForbidden)
        })
    }

    /// Delete a submission. Other positions in its group are untouched.
    pub async fn delete_one(
        &self,
        owner: &OwnerKey,
        id: SubmissionId,
    ) -> Result<Result<(), SubmissionFailure>, S::Error> {
        if self.owned(owner, id).await?.is_none() {
            return Ok(Err(SubmissionFailure::NotFoundOrForbidden));
        }
        Ok(if self.store.delete_by_id(id).await? {
            Ok(())
        } else {
            Err(SubmissionFailure::NotFoundOrForbidden)
        })
    }

    /// Make a submission the primary position of its group, demoting the rest.
    pub async fn set_primary(
        &self,
        owner: &OwnerKey,
        id: SubmissionId,
    ) -> Result<Result<(), SubmissionFailure>, S::Error> {
        let Some(target) = self.owned(owner, id).await? else {
            return Ok(Err(SubmissionFailure::NotFoundOrForbidden));
        };
        for member in self.members(&target).await? {
            if member.id != id && member.is_primary {
                self.store.set_primary(member.id, false).await?;
            }
        }
        Ok(if self.store.set_primary(id, true).await? {
            Ok(())
        } else {
            Err(SubmissionFailure::NotFoundOrForbidden)
        })
    }

    /// The other positions in a submission's group, most recently updated first.
    pub async fn siblings(
        &self,
        owner: &OwnerKey,
        id: SubmissionId,
    ) -> Result<Result<Vec<RecordView>, SubmissionFailure>, S::Error> {
        let Some(target) = self.owned(owner, id).await? else {
            return Ok(Err(SubmissionFailure::NotFoundOrForbidden));
        };
        let mut members = self.members(&target).await?;
        members.retain(|member| member.id != id);
        members.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(Ok(self.views(members)))
    }

    async fn filtered(
        &self,
        scope: &Scope,
        search: &SearchFilter,
    ) -> Result<Vec<Submission>, S::Error> {
        let predicate = filter::storage_predicate(scope, search);
        let records = self.store.query(&predicate).await?;
        Ok(filter::retain_salary(records, search))
    }

    /// Submissions in scope matching `search`, company entries adjacent and ranked.
    pub async fn search(
        &self,
        scope: &Scope,
        search: &SearchFilter,
    ) -> Result<Vec<RecordView>, S::Error> {
        Ok(self.flat(self.filtered(scope, search).await?))
    }

    /// Company groups formed from the submissions matching `search`.
    pub async fn search_companies(
        &self,
        scope: &Scope,
        search: &SearchFilter,
        order: CompanyOrder,
    ) -> Result<Vec<CompanyGroup>, S::Error> {
        Ok(self.grouped(self.filtered(scope, search).await?, order))
    }

    /// Encode records as an `.xlsx` workbook.
    pub fn export_bytes(&self, records: &[RecordView]) -> Result<Vec<u8>, SheetError> {
        apptrack_sheet::write_records(records)
    }

    /// Encode company groups as an `.xlsx` workbook, one row per position.
    pub fn export_companies_bytes(&self, groups: &[CompanyGroup]) -> Result<Vec<u8>, SheetError> {
        apptrack_sheet::write_groups(groups)
    }

    /// Search, then encode the results as an `.xlsx` workbook.
    pub async fn export_search_bytes(
        &self,
        scope: &Scope,
        search: &SearchFilter,
    ) -> Result<Vec<u8>, ExchangeError<S::Error>> {
        let records = self.search(scope, search).await.map_err(ExchangeError::Store)?;
        Ok(self.export_bytes(&records)?)
    }

    /// Decode a spreadsheet without persisting anything.
    pub fn preview_import(
        &self,
        bytes: &[u8],
        filename: &str,
    ) -> Result<Vec<ImportedRow>, SheetError> {
        let decoded = apptrack_sheet::read(bytes, filename, self.clock.now().year())?;
        Ok(decoded.rows)
    }

    /// Decode a spreadsheet and add its rows to `owner`'s records.
    ///
    /// Rows that fail to decode or validate count as processed but not
    /// succeeded. A storage failure aborts the import.
    pub async fn import(
        &self,
        owner: &OwnerKey,
        bytes: &[u8],
        filename: &str,
        mode: ImportMode,
    ) -> Result<ImportSummary, ExchangeError<S::Error>> {
        let decoded = apptrack_sheet::read(bytes, filename, self.clock.now().year())?;
        let mut summary = ImportSummary {
            processed: decoded.attempted(),
            ..Default::default()
        };

        let existing = self
            .store
            .list_by_owner(owner)
            .await
            .map_err(ExchangeError::Store)?;
        let mut seen: FxHashSet<(String, String)> = FxHashSet::default();
        match mode {
            ImportMode::SkipDuplicates => {
                seen.extend(
                    existing
                        .into_iter()
                        .map(|record| (record.data.employer, record.data.position)),
                );
            }
            ImportMode::ReplaceAll => {
                for record in &existing {
                    self.store
                        .delete_by_id(record.id)
                        .await
                        .map_err(ExchangeError::Store)?;
                }
                event!(
                    Level::INFO,
                    %owner,
                    deleted = existing.len(),
                    "cleared records before import"
                );
            }
        }

        for (index, row) in decoded.rows.into_iter().enumerate() {
            let pair = (
                row.data.employer.trim().to_owned(),
                row.data.position.trim().to_owned(),
            );
            if mode == ImportMode::SkipDuplicates && seen.contains(&pair) {
                summary.skipped += 1;
                continue;
            }
            // Unparseable dates arrive as None and do not reject the row
            match ValidationError::validate_imported(row.data) {
                Ok(data) => {
                    self.insert(owner, data)
                        .await
                        .map_err(ExchangeError::Store)?;
                    summary.succeeded += 1;
                    seen.insert(pair);
                }
                Err(error) => {
                    event!(
                        Level::WARN,
                        %owner,
                        row = index + 1,
                        %error,
                        "import row rejected"
                    );
                }
            }
        }

        event!(
            Level::INFO,
            %owner,
            processed = summary.processed,
            succeeded = summary.succeeded,
            skipped = summary.skipped,
            "import finished"
        );
        Ok(summary)
    }
}

fn validate_batch(
    batch: Vec<SubmissionData>,
    primary: Option<usize>,
) -> Result<Vec<SubmissionData>, ValidationError> {
    if batch.is_empty() {
        return Err(ValidationError::EmptyBatch);
    }
    if let Some(index) = primary.filter(|index| *index >= batch.len()) {
        return Err(ValidationError::PrimaryOutOfRange {
            index,
            len: batch.len(),
        });
    }
    let batch = batch
        .into_iter()
        .map(ValidationError::validate)
        .collect::<Result<Vec<_>, _>>()?;
    let employer = &batch[0].employer;
    if batch.iter().any(|data| data.employer != *employer) {
        return Err(ValidationError::MixedEmployers);
    }
    Ok(batch)
}
