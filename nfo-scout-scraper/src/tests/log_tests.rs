use super::*;
use crate::batch::{ItemError, Stage};
use nfo_scout_core::{MetadataRecord, extract};
use nfo_scout_lib::Duplicate;

fn report(name: &str, status: ItemStatus) -> ItemReport {
    let identifier = extract(name).unwrap();
    let mut record = MetadataRecord::new(identifier.clone(), "r18dev", "en");
    record.title = format!("Title of {}", identifier);
    ItemReport {
        identifier,
        path: Some(PathBuf::from("/videos").join(name)),
        status,
        source: Some("r18dev".to_string()),
        record: Some(record),
        descriptor: None,
        assets: Vec::new(),
        errors: Vec::new(),
    }
}

#[test]
fn summary_counts_every_kind() {
    let mut ok = report("ABP-001.mp4", ItemStatus::Success);
    ok.descriptor = Some(PathBuf::from("/videos/ABP-001.nfo"));
    ok.assets = vec![PathBuf::from("/videos/ABP-001-fanart.jpg")];

    let mut partial = report("ABP-002.mp4", ItemStatus::PartialFailure);
    partial.errors.push(ItemError::new(Stage::Translate, "title: timeout"));

    let mut failed = report("ABP-003.mp4", ItemStatus::Failure);
    failed.record = None;
    failed.errors.push(ItemError::new(Stage::Fetch, "not found"));

    let outcome = BatchOutcome {
        reports: vec![ok, partial, failed, report("ABP-004.mp4", ItemStatus::Skipped)],
        duplicates: vec![Duplicate {
            path: PathBuf::from("/videos/b/ABP-001.mkv"),
            identifier: extract("ABP-001").unwrap(),
            kept: PathBuf::from("/videos/ABP-001.mp4"),
        }],
    };
    let log = RunLog::from_outcome(&outcome, &[PathBuf::from("/videos/holiday.mp4")]);

    let summary = log.summary();
    assert_eq!(
        summary,
        LogSummary {
            succeeded: 1,
            partial: 1,
            failed: 1,
            skipped: 1,
            duplicates: 1,
            unmatched: 1,
            files_written: 2,
        }
    );
    assert!(summary.has_failures());
}

#[test]
fn entries_carry_labels_and_messages() {
    let mut failed = report("SSIS-123.mkv", ItemStatus::Failure);
    failed.errors.push(ItemError::new(Stage::Fetch, "no source"));
    let mut log = RunLog::new();
    log.add_report(&failed);

    assert_eq!(
        log.entries(),
        &[LogEntry::Failed {
            file: "SSIS-123.mkv".to_string(),
            identifier: "SSIS-123".to_string(),
            errors: vec!["fetch: no source".to_string()],
        }]
    );
}

#[test]
fn written_log_lists_details() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.log");
    let outcome = BatchOutcome {
        reports: vec![report("ABP-001.mp4", ItemStatus::Success)],
        duplicates: Vec::new(),
    };
    RunLog::from_outcome(&outcome, &[]).write_to_file(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("Successful: 1"));
    assert!(text.contains("[OK] ABP-001.mp4 -> ABP-001 \"Title of ABP-001\" (from r18dev)"));
}
