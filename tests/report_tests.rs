// tests/report_tests.rs
//! Task reports and the cross-task discard summary

use emg_synergy::report::{ReportWriter, Summarizer, TaskReport};

fn report(task: &str, discardable: &[&str]) -> TaskReport {
    TaskReport {
        task: task.to_string(),
        synergies: 3,
        vaf: 92.5,
        top_channels: vec!["Biceps".into(), "Triceps".into()],
        discardable_channels: discardable.iter().map(|c| c.to_string()).collect(),
        criterion_met: true,
    }
}

#[test]
fn test_summary_over_nested_sessions() {
    let root = tempfile::tempdir().unwrap();
    let sessions = [
        ("S02_drink", vec!["Pectoral", "Delt. Post."]),
        ("S01_reach", vec!["Pectoral", "Infraspinatus"]),
        ("S03_comb", vec!["Delt. Post.", "Pectoral"]),
    ];
    for (task, discardable) in &sessions {
        let out = root.path().join(task).join("synergy_results");
        ReportWriter::write(&out, &[report(task, discardable)]).unwrap();
    }
    // unrelated tables and broken reports are ignored
    std::fs::write(root.path().join("Ranking_S01_reach.csv"), "rank,channel\n").unwrap();
    std::fs::write(root.path().join("Report_broken.csv"), "garbage").unwrap();

    let summarizer = Summarizer::new(root.path());
    let summary = summarizer.summarize().unwrap().unwrap();

    let tasks: Vec<_> = summary.details.iter().map(|d| d.task.as_str()).collect();
    assert_eq!(tasks, vec!["S01_reach", "S02_drink", "S03_comb"]);
    assert_eq!(summary.details[0].discardable_channels, "Pectoral, Infraspinatus");

    assert_eq!(summary.ranking[0].channel, "Pectoral");
    assert_eq!(summary.ranking[0].times_discarded, 3);
    assert_eq!(summary.ranking[1].channel, "Delt. Post.");
    assert_eq!(summary.ranking[1].times_discarded, 2);
    assert_eq!(summary.ranking[2].channel, "Infraspinatus");

    let detail = std::fs::read_to_string(summarizer.detail_path()).unwrap();
    assert!(detail.starts_with("task,discardable_channels\n"));
    assert_eq!(detail.lines().count(), 4);

    let ranking = std::fs::read_to_string(summarizer.ranking_path()).unwrap();
    let lines: Vec<_> = ranking.lines().collect();
    assert_eq!(lines[0], "channel,times_discarded");
    assert_eq!(lines[1], "Pectoral,3");
}

#[test]
fn test_summary_without_discards() {
    let root = tempfile::tempdir().unwrap();
    ReportWriter::write(root.path(), &[report("S01", &[])]).unwrap();

    let summarizer = Summarizer::new(root.path());
    let summary = summarizer.summarize().unwrap().unwrap();

    assert_eq!(summary.details.len(), 1);
    assert!(summary.ranking.is_empty());
    let ranking = std::fs::read_to_string(summarizer.ranking_path()).unwrap();
    assert_eq!(ranking.trim_end(), "channel,times_discarded");
}

#[test]
fn test_report_round_trips_channel_lists() {
    let dir = tempfile::tempdir().unwrap();
    let written = report("S01_reach", &["Pectoral", "Delt. Med."]);
    let path = ReportWriter::write(dir.path(), std::slice::from_ref(&written)).unwrap();

    assert_eq!(ReportWriter::read(&path).unwrap(), vec![written]);
}
