//! The [`RecordStore`] implementation.

use crate::{
    Db, sql,
    types::{InterviewRow, SUBMISSION_COLUMNS, SubmissionRow},
};
use apptrack_core::{
    models::{
        DateTime, Field, GroupKey, Interview, OwnerKey, Predicate, Submission, SubmissionData,
        SubmissionId,
    },
    ports::RecordStore,
};
use rustc_hash::FxHashMap;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, query_builder::Separated};

/// Which submissions a read selects.
enum Selection<'a> {
    Id(SubmissionId),
    Matching(&'a Predicate),
}

impl Selection<'_> {
    fn push(&self, builder: &mut QueryBuilder<'_, Sqlite>) {
        match self {
            Selection::Id(id) => {
                builder.push("id = ").push_bind(id.to_string());
            }
            Selection::Matching(predicate) => sql::push_predicate(builder, predicate),
        }
    }
}

impl Db {
    async fn fetch(&self, selection: Selection<'_>) -> Result<Vec<Submission>, sqlx::Error> {
        // One read transaction, so the interviews agree with the submissions
        let mut tx = self.reader.begin().await?;

        let mut builder = QueryBuilder::new(format!(
            "select {SUBMISSION_COLUMNS} from submission where "
        ));
        selection.push(&mut builder);
        builder.push(" order by seq");
        let rows: Vec<SubmissionRow> = builder.build_query_as().fetch_all(&mut *tx).await?;

        let mut builder = QueryBuilder::new(
            "select submission_id, stage, time from interview \
             where submission_id in (select id from submission where ",
        );
        selection.push(&mut builder);
        builder.push(") order by submission_id, ordinal");
        let interviews: Vec<InterviewRow> = builder.build_query_as().fetch_all(&mut *tx).await?;

        tx.commit().await?;

        let mut by_submission: FxHashMap<String, Vec<Interview>> = FxHashMap::default();
        for row in interviews {
            by_submission
                .entry(row.submission_id.clone())
                .or_default()
                .push(row.into());
        }

        rows.into_iter()
            .map(|row| {
                let interviews = by_submission.remove(&row.id).unwrap_or_default();
                row.into_submission(interviews)
            })
            .collect()
    }
}

async fn insert_interviews(
    conn: &mut SqliteConnection,
    id: SubmissionId,
    interviews: &[Interview],
) -> Result<(), sqlx::Error> {
    if interviews.is_empty() {
        return Ok(());
    }
    let id = id.to_string();
    let mut builder =
        QueryBuilder::new("insert into interview (submission_id, ordinal, stage, time) ");
    builder.push_values(interviews.iter().enumerate(), |mut b, (ordinal, interview)| {
        b.push_bind(id.clone())
            .push_bind(ordinal as i64)
            .push_bind(interview.stage.label().to_owned())
            .push_bind(interview.time);
    });
    builder.build().execute(conn).await?;
    Ok(())
}

// The data columns shared by insert and update, in `bind_data` order
const DATA_COLUMNS: [&str; 13] = [
    "employer",
    "position",
    "location",
    "url",
    "apply_time",
    "assessment_time",
    "written_exam_time",
    "current_status",
    "current_status_date",
    "outcome",
    "compensation_kind",
    "compensation_text",
    "remarks",
];

fn bind_data(separated: &mut Separated<'_, '_, Sqlite, &str>, data: &SubmissionData) {
    let compensation = data.compensation.as_ref();
    separated
        .push_bind(data.employer.clone())
        .push_bind(data.position.clone())
        .push_bind(data.location.clone())
        .push_bind(data.url.clone())
        .push_bind(data.apply_time)
        .push_bind(data.assessment_time)
        .push_bind(data.written_exam_time)
        .push_bind(data.current_status.clone())
        .push_bind(data.current_status_date)
        .push_bind(data.outcome.as_ref().map(|outcome| outcome.label().to_owned()))
        .push_bind(compensation.map(|value| value.kind()))
        .push_bind(compensation.and_then(|value| value.text()).map(str::to_owned))
        .push_bind(data.remarks.clone());
}

impl RecordStore for Db {
    type Error = sqlx::Error;

    async fn create(
        &self,
        owner: OwnerKey,
        group_key: Option<GroupKey>,
        is_primary: bool,
        data: SubmissionData,
        as_of: DateTime,
    ) -> Result<SubmissionId, Self::Error> {
        let id = SubmissionId::random();
        let mut tx = self.writer.begin().await?;

        let mut builder = QueryBuilder::new(format!(
            "insert into submission \
             (id, owner, group_key, is_primary, created_at, updated_at, {}) values (",
            DATA_COLUMNS.join(", ")
        ));
        let mut separated = builder.separated(", ");
        separated
            .push_bind(id.to_string())
            .push_bind(owner.to_string())
            .push_bind(group_key.map(|key| key.to_string()))
            .push_bind(is_primary)
            .push_bind(as_of)
            .push_bind(as_of);
        bind_data(&mut separated, &data);
        builder.push(")");
        builder.build().execute(&mut *tx).await?;

        insert_interviews(&mut *tx, id, &data.interviews).await?;
        tx.commit().await?;

        Ok(id)
    }

    async fn get_by_id(&self, id: SubmissionId) -> Result<Option<Submission>, Self::Error> {
        Ok(self.fetch(Selection::Id(id)).await?.pop())
    }

    async fn list_by_owner(&self, owner: &OwnerKey) -> Result<Vec<Submission>, Self::Error> {
        let predicate = Predicate::Eq(Field::Owner, owner.to_string().into());
        self.fetch(Selection::Matching(&predicate)).await
    }

    async fn list_all(&self) -> Result<Vec<Submission>, Self::Error> {
        self.fetch(Selection::Matching(&Predicate::All)).await
    }

    async fn query(&self, predicate: &Predicate) -> Result<Vec<Submission>, Self::Error> {
        self.fetch(Selection::Matching(predicate)).await
    }

    async fn count(&self, predicate: &Predicate) -> Result<u64, Self::Error> {
        let mut builder = QueryBuilder::new("select count(*) from submission where ");
        sql::push_predicate(&mut builder, predicate);
        let count: i64 = builder
            .build_query_scalar()
            .fetch_one(&self.reader)
            .await?;
        Ok(count as u64)
    }

    async fn update(
        &self,
        id: SubmissionId,
        data: SubmissionData,
        group_key: Option<GroupKey>,
        is_primary: bool,
        as_of: DateTime,
    ) -> Result<bool, Self::Error> {
        let mut tx = self.writer.begin().await?;

        let mut builder = QueryBuilder::new("update submission set ");
        builder
            .push("group_key = ")
            .push_bind(group_key.map(|key| key.to_string()))
            .push(", is_primary = ")
            .push_bind(is_primary)
            .push(", updated_at = ")
            .push_bind(as_of)
            .push(", (")
            .push(DATA_COLUMNS.join(", "))
            .push(") = (");
        bind_data(&mut builder.separated(", "), &data);
        builder.push(") where id = ").push_bind(id.to_string());

        let updated = builder.build().execute(&mut *tx).await?.rows_affected() > 0;
        if !updated {
            return Ok(false);
        }

        sqlx::query("delete from interview where submission_id = $1")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;
        insert_interviews(&mut *tx, id, &data.interviews).await?;
        tx.commit().await?;

        Ok(true)
    }

    async fn assign_group(
        &self,
        ids: &[SubmissionId],
        group_key: &GroupKey,
    ) -> Result<u64, Self::Error> {
        if ids.is_empty() {
            return Ok(0);
        }
        let mut builder = QueryBuilder::new("update submission set group_key = ");
        builder.push_bind(group_key.to_string()).push(" where id in (");
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(id.to_string());
        }
        builder.push(")");

        let result = builder.build().execute(&self.writer).await?;
        Ok(result.rows_affected())
    }

    async fn set_primary(&self, id: SubmissionId, is_primary: bool) -> Result<bool, Self::Error> {
        let result = sqlx::query("update submission set is_primary = $1 where id = $2")
            .bind(is_primary)
            .bind(id.to_string())
            .execute(&self.writer)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_id(&self, id: SubmissionId) -> Result<bool, Self::Error> {
        // interviews follow by cascade
        let result = sqlx::query("delete from submission where id = $1")
            .bind(id.to_string())
            .execute(&self.writer)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
