use apptrack_core::{
    models::{
        CompanyGroup, Compensation, DateTime, Interview, InterviewStage, Outcome, OutcomeFilter,
        OwnerKey, RecordView, Scope, SearchFilter, Submission, SubmissionData, SubmissionId,
    },
    ports::RecordStore,
};
use apptrack_engine::{
    Clock, CompanyOrder, ImportMode, ImportSummary, SubmissionFailure, Tracker, ValidationError,
};
use apptrack_sqlite::{Db, config::SqliteConfig};
use time::macros::datetime;

const NOW: DateTime = datetime!(2024-04-01 12:00);

async fn tracker() -> anyhow::Result<Tracker<Db>> {
    let db = Db::open(&SqliteConfig::default()).await?;
    Ok(Tracker::with_clock(db, Clock::Fixed(NOW)))
}

fn applied(employer: &str, position: &str, day: u8) -> SubmissionData {
    let apply_time = DateTime::new(
        time::Date::from_calendar_date(2024, time::Month::March, day).unwrap(),
        time::Time::from_hms(9, 0, 0).unwrap(),
    );
    SubmissionData::new(employer, position, apply_time)
}

fn positions(views: &[RecordView]) -> Vec<&str> {
    views
        .iter()
        .map(|view| view.submission.data.position.as_str())
        .collect()
}

#[tokio::test]
async fn submissions_to_one_employer_share_a_group() -> anyhow::Result<()> {
    let tracker = tracker().await?;
    let alice = OwnerKey::from("alice");

    let first = tracker.add_one(&alice, applied("Acme", "SWE", 1)).await??;
    let second = tracker.add_one(&alice, applied("Acme", "PM", 2)).await??;
    tracker.add_one(&alice, applied("Initech", "SRE", 3)).await??;
    tracker
        .add_one(&OwnerKey::from("bob"), applied("Acme", "SWE", 4))
        .await??;

    let store = tracker.store();
    let first = store.get_by_id(first).await?.expect("first exists");
    let second = store.get_by_id(second).await?.expect("second exists");
    assert!(first.group_key.is_some());
    assert_eq!(first.group_key, second.group_key);
    assert!(!first.is_primary && !second.is_primary);

    let companies = tracker
        .companies(&Scope::Owner(alice.clone()), CompanyOrder::PoolDays)
        .await?;
    assert_eq!(companies.len(), 2);
    let acme = companies
        .iter()
        .find(|group| group.employer == "Acme")
        .expect("an Acme group");
    assert_eq!(acme.positions.len(), 2);

    assert_eq!(tracker.companies(&Scope::All, CompanyOrder::PoolDays).await?.len(), 3);

    Ok(())
}

#[tokio::test]
async fn legacy_rows_are_backfilled_on_add() -> anyhow::Result<()> {
    let tracker = tracker().await?;
    let alice = OwnerKey::from("alice");
    let legacy = tracker
        .store()
        .create(alice.clone(), None, false, applied("Acme", "SWE", 1), NOW)
        .await?;

    let added = tracker.add_one(&alice, applied("Acme", "PM", 2)).await??;

    let store = tracker.store();
    let legacy = store.get_by_id(legacy).await?.expect("legacy exists");
    let added = store.get_by_id(added).await?.expect("added exists");
    assert!(legacy.group_key.is_some());
    assert_eq!(legacy.group_key, added.group_key);

    Ok(())
}

#[tokio::test]
async fn invalid_submissions_are_rejected() -> anyhow::Result<()> {
    let tracker = tracker().await?;
    let alice = OwnerKey::from("alice");

    let failure = tracker
        .add_one(&alice, applied("  ", "SWE", 1))
        .await?
        .unwrap_err();
    assert!(matches!(
        failure,
        SubmissionFailure::Validation(ValidationError::MissingEmployer)
    ));

    let mut undated = applied("Acme", "SWE", 1);
    undated.apply_time = None;
    let failure = tracker.add_one(&alice, undated).await?.unwrap_err();
    assert!(matches!(
        failure,
        SubmissionFailure::Validation(ValidationError::MissingApplyTime)
    ));

    let failure = tracker
        .add_batch(
            &alice,
            vec![applied("Acme", "SWE", 1), applied("Initech", "SRE", 1)],
            None,
        )
        .await?
        .unwrap_err();
    assert!(matches!(
        failure,
        SubmissionFailure::Validation(ValidationError::MixedEmployers)
    ));

    assert!(tracker.list_for_owner(&alice).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn batch_marks_one_primary() -> anyhow::Result<()> {
    let tracker = tracker().await?;
    let alice = OwnerKey::from("alice");

    let earlier = tracker
        .add_batch(&alice, vec![applied("Acme", "SWE", 1)], None)
        .await??;
    let ids = tracker
        .add_batch(
            &alice,
            vec![
                applied("Acme", "PM", 2),
                applied("Acme", "SRE", 2),
                applied("Acme", "QA", 2),
            ],
            Some(1),
        )
        .await??;
    assert_eq!(ids.len(), 3);

    let records = tracker.store().list_by_owner(&alice).await?;
    let primaries: Vec<SubmissionId> = records
        .iter()
        .filter(|record| record.is_primary)
        .map(|record| record.id)
        .collect();
    assert_eq!(primaries, [ids[1]]);
    assert!(records.iter().all(|record| record.group_key == records[0].group_key));
    assert!(!records.iter().any(|record| record.id == earlier[0] && record.is_primary));

    let companies = tracker
        .companies(&Scope::Owner(alice), CompanyOrder::PoolDays)
        .await?;
    let current = companies[0].current_position().expect("a current position");
    assert_eq!(current.submission.data.position, "SRE");

    Ok(())
}

#[tokio::test]
async fn updates_move_between_groups() -> anyhow::Result<()> {
    let tracker = tracker().await?;
    let alice = OwnerKey::from("alice");

    let ids = tracker
        .add_batch(
            &alice,
            vec![applied("Acme", "SWE", 1), applied("Acme", "PM", 1)],
            None,
        )
        .await??;
    let initech = tracker.add_one(&alice, applied("Initech", "SRE", 2)).await??;

    let mut moved = applied("Initech", "SWE", 1);
    moved.outcome = Some(Outcome::Pending);
    tracker.update_one(&alice, ids[0], moved).await??;

    let store = tracker.store();
    let moved = store.get_by_id(ids[0]).await?.expect("moved exists");
    let target = store.get_by_id(initech).await?.expect("target exists");
    assert_eq!(moved.group_key, target.group_key);
    assert!(!moved.is_primary);
    assert_eq!(moved.data.outcome, Some(Outcome::Pending));
    assert_eq!(moved.updated_at, NOW);

    let mut edited = applied("Acme", "Senior PM", 1);
    edited.remarks = Some("renamed".into());
    let before = store.get_by_id(ids[1]).await?.expect("pm exists");
    tracker.update_one(&alice, ids[1], edited).await??;
    let after = store.get_by_id(ids[1]).await?.expect("pm exists");
    assert_eq!(after.group_key, before.group_key);
    assert_eq!(after.data.position, "Senior PM");

    Ok(())
}

#[tokio::test]
async fn other_owners_cannot_touch_records() -> anyhow::Result<()> {
    let tracker = tracker().await?;
    let alice = OwnerKey::from("alice");
    let mallory = OwnerKey::from("mallory");
    let id = tracker.add_one(&alice, applied("Acme", "SWE", 1)).await??;

    assert!(matches!(
        tracker.update_one(&mallory, id, applied("Evil", "SWE", 1)).await?,
        Err(SubmissionFailure::NotFoundOrForbidden)
    ));
    assert!(matches!(
        tracker.delete_one(&mallory, id).await?,
        Err(SubmissionFailure::NotFoundOrForbidden)
    ));
    assert!(matches!(
        tracker.set_primary(&mallory, id).await?,
        Err(SubmissionFailure::NotFoundOrForbidden)
    ));
    assert!(matches!(
        tracker.siblings(&mallory, id).await?,
        Err(SubmissionFailure::NotFoundOrForbidden)
    ));
    assert!(matches!(
        tracker.delete_one(&alice, SubmissionId::random()).await?,
        Err(SubmissionFailure::NotFoundOrForbidden)
    ));

    let record = tracker.store().get_by_id(id).await?.expect("untouched");
    assert_eq!(record.data.employer, "Acme");

    tracker.delete_one(&alice, id).await??;
    assert!(tracker.store().get_by_id(id).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn primary_switching_and_siblings() -> anyhow::Result<()> {
    let tracker = tracker().await?;
    let alice = OwnerKey::from("alice");
    let ids = tracker
        .add_batch(
            &alice,
            vec![
                applied("Acme", "SWE", 1),
                applied("Acme", "PM", 2),
                applied("Acme", "SRE", 3),
            ],
            None,
        )
        .await??;

    tracker.set_primary(&alice, ids[2]).await??;
    let records = tracker.store().list_by_owner(&alice).await?;
    let flags: Vec<bool> = records.iter().map(|record| record.is_primary).collect();
    assert_eq!(flags, [false, false, true]);

    let siblings = tracker.siblings(&alice, ids[2]).await??;
    let mut names = positions(&siblings);
    names.sort_unstable();
    assert_eq!(names, ["PM", "SWE"]);
    assert!(siblings.iter().all(|view| view.pool_days.is_some()));

    let lonely = tracker.add_one(&alice, applied("Initech", "SRE", 1)).await??;
    assert!(tracker.siblings(&alice, lonely).await??.is_empty());

    Ok(())
}

#[tokio::test]
async fn listings_rank_by_outcome() -> anyhow::Result<()> {
    let tracker = tracker().await?;
    let alice = OwnerKey::from("alice");

    let with_outcome = |employer: &str, day: u8, outcome: Option<Outcome>| {
        let mut data = applied(employer, "SWE", day);
        data.outcome = outcome;
        data
    };
    tracker
        .add_one(&alice, with_outcome("Rejected", 1, Some(Outcome::RejectedAtResume)))
        .await??;
    tracker.add_one(&alice, with_outcome("Old", 2, Some(Outcome::Pending))).await??;
    tracker.add_one(&alice, with_outcome("Offer", 3, Some(Outcome::Offer))).await??;
    tracker.add_one(&alice, with_outcome("Fresh", 20, Some(Outcome::Pending))).await??;

    let companies = tracker
        .companies(&Scope::Owner(alice.clone()), CompanyOrder::PoolDays)
        .await?;
    let employers: Vec<&str> = companies.iter().map(|group| group.employer.as_str()).collect();
    assert_eq!(employers, ["Offer", "Fresh", "Old", "Rejected"]);

    let fresh = companies[1].current_position().expect("a current position");
    assert_eq!(fresh.pool_days, Some(12));

    let listing = tracker.list_for_owner(&alice).await?;
    assert_eq!(listing.len(), 4);
    Ok(())
}

#[tokio::test]
async fn search_combines_clauses() -> anyhow::Result<()> {
    let tracker = tracker().await?;
    let alice = OwnerKey::from("alice");

    let mut total = applied("Acme", "Backend", 1);
    total.compensation = Some(Compensation::TotalPackage("180000".into()));
    total.outcome = Some(Outcome::Pending);
    let mut monthly = applied("Initech", "Backend", 2);
    monthly.compensation = Some(Compensation::Monthly("20k×13".into()));
    monthly.outcome = Some(Outcome::RejectedAtWrittenExam);
    monthly.current_status = Some("已笔试".into());
    let mut negotiable = applied("Globex", "Frontend", 3);
    negotiable.compensation = Some(Compensation::Negotiable);
    negotiable.location = Some("Shenzhen".into());
    for data in [total, monthly, negotiable] {
        tracker.add_one(&alice, data).await??;
    }
    tracker
        .add_one(&OwnerKey::from("bob"), applied("Acme", "Backend", 1))
        .await??;

    let scope = Scope::Owner(alice);
    let search = |filter: SearchFilter| {
        let tracker = &tracker;
        let scope = &scope;
        async move {
            let views = tracker.search(scope, &filter).await?;
            let mut employers: Vec<String> = views
                .into_iter()
                .map(|view| view.submission.data.employer)
                .collect();
            employers.sort_unstable();
            anyhow::Ok(employers)
        }
    };

    assert_eq!(
        search(SearchFilter {
            min_salary: Some(200000.0),
            ..Default::default()
        })
        .await?,
        ["Initech"]
    );
    assert_eq!(
        search(SearchFilter {
            keywords: Some("backend，shenzhen".into()),
            ..Default::default()
        })
        .await?,
        ["Acme", "Globex", "Initech"]
    );
    assert_eq!(
        search(SearchFilter {
            keywords: Some("backend".into()),
            outcome: Some(OutcomeFilter::AnyRejection),
            ..Default::default()
        })
        .await?,
        ["Initech"]
    );
    assert_eq!(
        search(SearchFilter {
            outcome: Some(OutcomeFilter::Pending),
            ..Default::default()
        })
        .await?,
        ["Acme"]
    );
    assert_eq!(
        search(SearchFilter {
            status: Some("已笔试".into()),
            ..Default::default()
        })
        .await?,
        ["Initech"]
    );
    assert_eq!(
        search(SearchFilter::default()).await?,
        ["Acme", "Globex", "Initech"]
    );

    let everyone = tracker
        .search_companies(
            &Scope::All,
            &SearchFilter {
                keywords: Some("acme".into()),
                ..Default::default()
            },
            CompanyOrder::UpdatedAt,
        )
        .await?;
    assert_eq!(everyone.len(), 2);

    Ok(())
}

fn view(employer: &str, position: &str) -> RecordView {
    let mut data = applied(employer, position, 1);
    data.outcome = Some(Outcome::Pending);
    data.interviews = vec![Interview::at(
        InterviewStage::Round(1),
        datetime!(2024-03-05 10:00),
    )];
    RecordView {
        submission: Submission {
            id: SubmissionId::random(),
            owner: OwnerKey::from("someone"),
            group_key: None,
            is_primary: false,
            data,
            created_at: NOW,
            updated_at: NOW,
        },
        pool_days: Some(31),
    }
}

#[tokio::test]
async fn import_skips_existing_pairs() -> anyhow::Result<()> {
    let tracker = tracker().await?;
    let alice = OwnerKey::from("alice");
    tracker.add_one(&alice, applied("Acme", "SWE", 1)).await??;

    let bytes = tracker.export_bytes(&[view("Acme", "SWE"), view("Acme", "PM")])?;
    let summary = tracker
        .import(&alice, &bytes, "records.xlsx", ImportMode::SkipDuplicates)
        .await?;
    assert_eq!(
        summary,
        ImportSummary {
            processed: 2,
            succeeded: 1,
            skipped: 1,
        }
    );

    let records = tracker.store().list_by_owner(&alice).await?;
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|record| record.group_key == records[0].group_key));

    let imported = records
        .iter()
        .find(|record| record.data.position == "PM")
        .expect("imported row");
    assert_eq!(imported.data.outcome, Some(Outcome::Pending));
    assert_eq!(
        imported.data.interviews,
        [Interview::undated(InterviewStage::Round(1))]
    );

    Ok(())
}

#[tokio::test]
async fn import_keeps_rows_with_unreadable_dates() -> anyhow::Result<()> {
    let tracker = tracker().await?;
    let alice = OwnerKey::from("alice");

    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, title) in apptrack_sheet::HEADERS.iter().enumerate() {
        sheet.write_string(0, col as u16, *title)?;
    }
    sheet.write_string(1, 0, "Acme")?;
    sheet.write_string(1, 1, "SWE")?;
    sheet.write_string(1, 3, "13-40")?;
    sheet.write_string(1, 6, "PENDING")?;
    let bytes = workbook.save_to_buffer()?;

    let summary = tracker
        .import(&alice, &bytes, "records.xlsx", ImportMode::SkipDuplicates)
        .await?;
    assert_eq!(
        summary,
        ImportSummary {
            processed: 1,
            succeeded: 1,
            skipped: 0,
        }
    );

    let records = tracker.list_for_owner(&alice).await?;
    assert_eq!(positions(&records), ["SWE"]);
    assert_eq!(records[0].submission.data.apply_time, None);
    assert_eq!(records[0].pool_days, None);
    Ok(())
}

#[tokio::test]
async fn interviews_are_stored_chronologically() -> anyhow::Result<()> {
    let tracker = tracker().await?;
    let alice = OwnerKey::from("alice");

    let mut data = applied("Acme", "SWE", 1);
    data.interviews = vec![
        Interview::undated(InterviewStage::Round(3)),
        Interview::at(InterviewStage::Round(2), datetime!(2024-03-20 10:00)),
        Interview::at(InterviewStage::Round(1), datetime!(2024-03-10 10:00)),
    ];
    let id = tracker.add_one(&alice, data.clone()).await??;

    let stages = |record: &Submission| -> Vec<String> {
        record
            .data
            .interviews
            .iter()
            .map(|interview| interview.stage.label().to_owned())
            .collect()
    };
    let stored = tracker.store().get_by_id(id).await?.expect("stored record");
    assert_eq!(stages(&stored), ["一面", "二面", "三面"]);

    data.interviews.reverse();
    data.interviews
        .push(Interview::at(InterviewStage::Ai, datetime!(2024-03-05 10:00)));
    tracker.update_one(&alice, id, data).await??;
    let stored = tracker.store().get_by_id(id).await?.expect("stored record");
    assert_eq!(stages(&stored), ["AI面", "一面", "二面", "三面"]);
    Ok(())
}

#[tokio::test]
async fn import_can_replace_everything() -> anyhow::Result<()> {
    let tracker = tracker().await?;
    let alice = OwnerKey::from("alice");
    tracker.add_one(&alice, applied("Acme", "SWE", 1)).await??;
    tracker.add_one(&alice, applied("Gone", "SWE", 1)).await??;
    let bob = tracker
        .add_one(&OwnerKey::from("bob"), applied("Gone", "SWE", 1))
        .await??;

    let bytes = tracker.export_bytes(&[
        view("Acme", "SWE"),
        view("Acme", "SWE"),
        view("Initech", "SRE"),
    ])?;
    let summary = tracker
        .import(&alice, &bytes, "records.xlsx", ImportMode::ReplaceAll)
        .await?;
    assert_eq!(
        summary,
        ImportSummary {
            processed: 3,
            succeeded: 3,
            skipped: 0,
        }
    );

    let mut employers: Vec<String> = tracker
        .store()
        .list_by_owner(&alice)
        .await?
        .into_iter()
        .map(|record| record.data.employer)
        .collect();
    employers.sort_unstable();
    assert_eq!(employers, ["Acme", "Acme", "Initech"]);
    assert!(tracker.store().get_by_id(bob).await?.is_some());

    Ok(())
}

#[tokio::test]
async fn import_rejects_unknown_formats() -> anyhow::Result<()> {
    let tracker = tracker().await?;
    let result = tracker
        .import(
            &OwnerKey::from("alice"),
            b"employer,position",
            "records.csv",
            ImportMode::SkipDuplicates,
        )
        .await;
    assert!(matches!(
        result,
        Err(apptrack_engine::ExchangeError::Sheet(
            apptrack_sheet::SheetError::UnsupportedFormat(_)
        ))
    ));
    Ok(())
}

#[tokio::test]
async fn export_then_import_preserves_companies() -> anyhow::Result<()> {
    let tracker = tracker().await?;
    let alice = OwnerKey::from("alice");
    tracker
        .add_batch(
            &alice,
            vec![applied("Acme", "SWE", 1), applied("Acme", "PM", 1)],
            Some(1),
        )
        .await??;
    let mut offer = applied("Initech", "SRE", 5);
    offer.outcome = Some(Outcome::Offer);
    offer.compensation = Some(Compensation::Monthly("30k×15".into()));
    tracker.add_one(&alice, offer).await??;

    let companies = tracker
        .companies(&Scope::Owner(alice.clone()), CompanyOrder::PoolDays)
        .await?;
    let bytes = tracker.export_companies_bytes(&companies)?;

    let preview = tracker.preview_import(&bytes, "backup.xlsx")?;
    assert_eq!(preview.len(), 3);
    assert!(preview.iter().all(|row| row.pool_days.is_some()));
    assert_eq!(tracker.store().list_all().await?.len(), 3);

    let bob = OwnerKey::from("bob");
    let summary = tracker
        .import(&bob, &bytes, "backup.xlsx", ImportMode::SkipDuplicates)
        .await?;
    assert_eq!(summary.succeeded, 3);

    let restored = tracker
        .companies(&Scope::Owner(bob), CompanyOrder::PoolDays)
        .await?;
    let shape = |groups: &[CompanyGroup]| {
        let mut shape: Vec<(String, usize)> = groups
            .iter()
            .map(|group| (group.employer.clone(), group.positions.len()))
            .collect();
        shape.sort_unstable();
        shape
    };
    assert_eq!(shape(&restored), shape(&companies));
    assert_eq!(restored[0].employer, "Initech");
    assert_eq!(
        restored[0].positions[0].submission.data.compensation,
        Some(Compensation::Monthly("30k×15".into()))
    );

    Ok(())
}
