use apptrack::{AppConfig, Cli, run};
use apptrack_engine::Tracker;
use apptrack_sqlite::Db;
use clap::Parser;
use std::path::PathBuf;

struct Harness {
    tracker: Tracker<Db>,
    config: AppConfig,
}

impl Harness {
    async fn new() -> anyhow::Result<Self> {
        let config = AppConfig::default();
        let db = Db::open(&config.database).await?;
        Ok(Self {
            tracker: Tracker::new(db),
            config,
        })
    }

    async fn run(&self, args: &[&str]) -> anyhow::Result<serde_json::Value> {
        let cli = Cli::try_parse_from(std::iter::once("apptrack").chain(args.iter().copied()))?;
        let mut out = Vec::new();
        run(&self.tracker, &self.config, cli.command, &mut out).await?;
        Ok(serde_json::from_slice(&out)?)
    }
}

fn scratch(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "apptrack-{}-{name}",
        apptrack_core::models::SubmissionId::random()
    ))
}

#[tokio::test]
async fn add_list_and_search() -> anyhow::Result<()> {
    let harness = Harness::new().await?;

    let batch = scratch("batch.json");
    std::fs::write(
        &batch,
        r#"[
            {"employer": "Acme", "position": "SWE", "apply_time": "2024-03-01 09:30:00.0",
             "compensation": {"type": "monthly", "value": "20k×13"}},
            {"employer": "Acme", "position": "PM", "apply_time": "2024-03-02 09:30:00.0",
             "outcome": "PENDING"}
        ]"#,
    )?;
    let input = batch.to_str().unwrap_or_default();
    let ids = harness
        .run(&["add", "--owner", "alice", "--input", input, "--primary", "1"])
        .await;
    std::fs::remove_file(&batch)?;
    let ids = ids?;
    assert_eq!(ids.as_array().map(Vec::len), Some(2));

    let companies = harness
        .run(&["list", "--owner", "alice", "--companies"])
        .await?;
    assert_eq!(companies.as_array().map(Vec::len), Some(1));
    assert_eq!(companies[0]["employer"], "Acme");
    assert_eq!(companies[0]["positions"].as_array().map(Vec::len), Some(2));

    let rich = harness
        .run(&["search", "--owner", "alice", "--min-salary", "200000"])
        .await?;
    assert_eq!(rich.as_array().map(Vec::len), Some(1));
    assert_eq!(rich[0]["position"], "SWE");

    let nobody = harness.run(&["list", "--owner", "bob"]).await?;
    assert_eq!(nobody.as_array().map(Vec::len), Some(0));

    Ok(())
}

#[tokio::test]
async fn foreign_ids_fail() -> anyhow::Result<()> {
    let harness = Harness::new().await?;
    let id = apptrack_core::models::SubmissionId::random().to_string();
    assert!(
        harness
            .run(&["delete", "--owner", "alice", id.as_str()])
            .await
            .is_err()
    );
    Ok(())
}

#[tokio::test]
async fn export_then_import() -> anyhow::Result<()> {
    let harness = Harness::new().await?;

    let record = scratch("record.json");
    std::fs::write(
        &record,
        r#"{"employer": "Initech", "position": "SRE", "apply_time": "2024-03-01 09:30:00.0",
            "outcome": "OC"}"#,
    )?;
    let input = record.to_str().unwrap_or_default();
    let added = harness
        .run(&["add", "--owner", "alice", "--input", input])
        .await;
    std::fs::remove_file(&record)?;
    added?;

    let workbook = scratch("backup.xlsx");
    let path = workbook.to_str().unwrap_or_default();
    let outcome = async {
        harness
            .run(&["export", "--owner", "alice", "--output", path])
            .await?;
        let preview = harness.run(&["preview", path]).await?;
        let summary = harness.run(&["import", "--owner", "bob", path]).await?;
        anyhow::Ok((preview, summary))
    }
    .await;
    let _ = std::fs::remove_file(&workbook);
    let (preview, summary) = outcome?;

    assert_eq!(preview[0]["employer"], "Initech");
    assert_eq!(summary["processed"], 1);
    assert_eq!(summary["succeeded"], 1);

    let restored = harness.run(&["list", "--owner", "bob"]).await?;
    assert_eq!(restored[0]["outcome"], "OC");
    Ok(())
}
