use ref_batch::clients::{ItemStore, LocalLibrary};
use ref_batch::config::{Config, StoreConfig};
use ref_batch::error::StoreError;
use ref_batch::models::pattern::PatternSpec;
use ref_batch::services::{EventLevel, MemorySink, Stage};
use ref_batch::{App, Job};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

const SNAPSHOT: &str = r#"
[[collections]]
key = "SRC"
name = "SOURCE"

[[collections]]
key = "TGT"
name = "TARGET"

[[items]]
key = "I1"
title = "Datafication of Schools"
collections = ["SRC"]

[[items.creators]]
first_name = "Ben"
last_name = "Williamson"

[[items.notes]]
key = "N1"
html = "<p>Y-include</p>"

[[items.notes]]
key = "N2"
html = "<p>YES-agree, strong fit</p>"

[[items.attachments]]
key = "A1"
content_type = "application/pdf"
text_path = "fulltext/I1.txt"

[[items]]
key = "I2"
title = "Single Vote"
collections = ["SRC"]

[[items.notes]]
key = "N3"
html = "<p>Y-approve</p>"

[[items.attachments]]
key = "A2"
content_type = "text/html"
text = "<html><body><p>The university and children. Childhood matters.</p></body></html>"

[[items]]
key = "I3"
title = "No Text"
collections = ["SRC"]

[[items.notes]]
key = "N4"
html = "<p>NO-skip</p>"

[[items.notes]]
key = "N5"
html = "<p>Y-maybe</p>"

[[items.attachments]]
key = "A3"
content_type = "image/png"
text = "school school school"

[[items]]
key = "I4"
item_type = "note"
title = "Standalone note"
collections = ["SRC"]

[[items]]
key = "I5"
title = "Already Promoted"
collections = ["SRC", "TGT"]

[[items.notes]]
key = "N6"
html = "<p>yes-fine</p>"

[[items.notes]]
key = "N7"
html = "<div>Y-ok</div>"

[[items.attachments]]
key = "A5"
content_type = "application/pdf"
text = "A school and a school."
"#;

const I1_TEXT: &str = "Smith J.
1. Introduction
Schools collect data about children.

Figure 1: Data flows in schools
2.1 Methodology
We visited three schools.
12
References
Williamson B. 2017
";

/// 在临时目录中准备快照和全文缓存
fn setup_library(dir: &Path) -> std::path::PathBuf {
    let snapshot_path = dir.join("library.toml");
    std::fs::write(&snapshot_path, SNAPSHOT).unwrap();
    std::fs::create_dir_all(dir.join("fulltext")).unwrap();
    std::fs::write(dir.join("fulltext/I1.txt"), I1_TEXT).unwrap();
    snapshot_path
}

fn test_config(dir: &Path, snapshot_path: &Path) -> Config {
    Config {
        output_dir: dir.join("out").display().to_string(),
        patterns: vec![
            PatternSpec::new("school*", r"\bschool\w*\b"),
            PatternSpec::new("child*", r"\bchild\w*\b"),
        ],
        store: StoreConfig::Snapshot {
            path: snapshot_path.display().to_string(),
        },
        ..Config::default()
    }
}

fn test_app(config: Config) -> (App, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let app = App::initialize(config).unwrap().with_event_sink(sink.clone());
    (app, sink)
}

#[tokio::test]
async fn test_promote_adds_items_with_quorum() {
    let dir = TempDir::new().unwrap();
    let snapshot_path = setup_library(dir.path());
    let (app, sink) = test_app(test_config(dir.path(), &snapshot_path));

    let report = app.run(Job::Promote).await.unwrap();

    // I4 是独立笔记，不计入
    assert_eq!(report.total, 4);
    assert_eq!(report.processed, 4);
    // I5 已在目标分组中，不重复计数
    assert_eq!(report.promoted, 1);
    assert!(report.skipped.is_empty());

    // 落盘后重新打开快照验证
    let library = LocalLibrary::open(&snapshot_path).await.unwrap();
    let targets: Vec<String> = library
        .collection_items("TGT")
        .await
        .unwrap()
        .into_iter()
        .map(|item| item.key)
        .collect();
    assert_eq!(targets, vec!["I1", "I5"]);

    let i5 = library.item("I5").await.unwrap().unwrap();
    assert_eq!(i5.collections, vec!["SRC", "TGT"]);

    let promoted: Vec<_> = sink
        .events()
        .into_iter()
        .filter(|e| e.stage == Stage::Promote && e.item_key.is_some())
        .collect();
    assert_eq!(promoted.len(), 2);
}

#[tokio::test]
async fn test_promote_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let snapshot_path = setup_library(dir.path());
    let config = test_config(dir.path(), &snapshot_path);

    let (first, _) = test_app(config.clone());
    assert_eq!(first.run(Job::Promote).await.unwrap().promoted, 1);

    let (second, _) = test_app(config);
    let report = second.run(Job::Promote).await.unwrap();
    assert_eq!(report.promoted, 0);

    let library = LocalLibrary::open(&snapshot_path).await.unwrap();
    let i1 = library.item("I1").await.unwrap().unwrap();
    assert_eq!(i1.collections, vec!["SRC", "TGT"]);
}

#[tokio::test]
async fn test_missing_target_collection_is_fatal() {
    let dir = TempDir::new().unwrap();
    let snapshot_path = setup_library(dir.path());
    let config = Config {
        target_collection: "ELSEWHERE".to_string(),
        ..test_config(dir.path(), &snapshot_path)
    };
    let (app, sink) = test_app(config);

    let err = app.run(Job::Promote).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<StoreError>(),
        Some(StoreError::CollectionNotFound { name }) if name == "ELSEWHERE"
    ));

    // 任何条目都没有被处理
    assert!(sink.events().iter().all(|e| e.item_key.is_none()));
    let snapshot = std::fs::read_to_string(&snapshot_path).unwrap();
    assert_eq!(snapshot, SNAPSHOT);
}

#[tokio::test]
async fn test_missing_source_collection_is_fatal() {
    let dir = TempDir::new().unwrap();
    let snapshot_path = setup_library(dir.path());
    let config = Config {
        source_collection: "NOWHERE".to_string(),
        ..test_config(dir.path(), &snapshot_path)
    };
    let (app, _) = test_app(config);

    let err = app.run(Job::Stats).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<StoreError>(),
        Some(StoreError::CollectionNotFound { .. })
    ));
    assert!(!dir.path().join("out").join("stats.txt").exists());
}

#[tokio::test]
async fn test_extract_writes_articles_and_corpus() {
    let dir = TempDir::new().unwrap();
    let snapshot_path = setup_library(dir.path());
    let (app, sink) = test_app(test_config(dir.path(), &snapshot_path));

    let report = app.run(Job::Extract).await.unwrap();
    assert_eq!(report.total, 4);
    assert_eq!(report.processed, 3);
    assert_eq!(report.skipped.len(), 1);
    assert!(report.skipped.contains("I3"));

    let out = dir.path().join("out");
    let article =
        std::fs::read_to_string(out.join("I1-Datafication--of--Schools.txt")).unwrap();
    assert!(article.starts_with("# Datafication of Schools\n\n"));
    assert!(article.contains("### Introduction\n"));
    assert!(article.contains("#### Methodology\n"));
    assert!(article.contains("## References"));
    assert!(article.contains("Schools collect data about children.\n\n#### Methodology"));
    assert!(!article.contains("Smith J."));
    assert!(!article.contains("Figure 1:"));
    assert!(!article.contains("Williamson B. 2017"));
    assert!(!article.contains("\n12\n"));

    let html_article = std::fs::read_to_string(out.join("I2-Single--Vote.txt")).unwrap();
    assert_eq!(
        html_article,
        "# Single Vote\n\nThe university and children. Childhood matters."
    );
    assert!(!out.join("I3-No--Text.txt").exists());

    let corpus = std::fs::read_to_string(out.join("all_files.txt")).unwrap();
    assert_eq!(corpus.matches("---BEGIN ARTICLE---").count(), 3);
    assert_eq!(corpus.matches("---END ARTICLE---\n\n").count(), 3);
    assert!(corpus.starts_with(
        "---BEGIN ARTICLE---\n# Datafication of Schools\n## Authors: Ben Williamson\n### Introduction\n"
    ));
    assert!(corpus.contains(
        "---BEGIN ARTICLE---\n# Single Vote\nThe university and children. Childhood matters.\n---END ARTICLE---\n\n"
    ));

    // 3 篇文章 + 合集
    assert_eq!(report.outputs.len(), 4);

    let skip_warnings: Vec<_> = sink
        .events()
        .into_iter()
        .filter(|e| e.level == EventLevel::Warn && e.item_key.as_deref() == Some("I3"))
        .collect();
    assert_eq!(skip_warnings.len(), 1);
}

#[tokio::test]
async fn test_stats_report_format() {
    let dir = TempDir::new().unwrap();
    let snapshot_path = setup_library(dir.path());
    let (app, _) = test_app(test_config(dir.path(), &snapshot_path));

    let report = app.run(Job::Stats).await.unwrap();
    assert_eq!(report.processed, 3);
    assert!(report.skipped.contains("I3"));

    let stats = std::fs::read_to_string(dir.path().join("out").join("stats.txt")).unwrap();
    let expected = "\
Title: 'Datafication of Schools'
  - 'school*': 3
  - 'child*': 1
---
Title: 'Single Vote'
  - 'school*': 0
  - 'child*': 2
---
Title: 'Already Promoted'
  - 'school*': 2
  - 'child*': 0
---

Final Statistics
  - 'school*': Mean = 1.67, StdDev = 1.25
  - 'child*': Mean = 1.00, StdDev = 0.82
";
    assert_eq!(stats, expected);
}

#[tokio::test]
async fn test_stats_with_empty_source() {
    let dir = TempDir::new().unwrap();
    let snapshot_path = dir.path().join("library.toml");
    std::fs::write(
        &snapshot_path,
        "[[collections]]\nkey = \"SRC\"\nname = \"SOURCE\"\n",
    )
    .unwrap();
    let (app, _) = test_app(test_config(dir.path(), &snapshot_path));

    let report = app.run(Job::Stats).await.unwrap();
    assert_eq!(report.total, 0);

    let stats = std::fs::read_to_string(dir.path().join("out").join("stats.txt")).unwrap();
    assert_eq!(
        stats,
        "\nFinal Statistics\n  - 'school*': Mean = 0.00, StdDev = 0.00\n  - 'child*': Mean = 0.00, StdDev = 0.00\n"
    );
}

#[test]
fn test_invalid_pattern_rejected_before_io() {
    let config = Config {
        patterns: vec![PatternSpec::new("broken", r"(unclosed")],
        ..Config::default()
    };
    assert!(App::initialize(config).is_err());
}

#[tokio::test]
async fn test_html_without_visible_text_is_skipped() {
    let dir = TempDir::new().unwrap();
    let snapshot_path = dir.path().join("library.toml");
    std::fs::write(
        &snapshot_path,
        r#"
[[collections]]
key = "SRC"
name = "SOURCE"

[[items]]
key = "H1"
title = "Script Only"
collections = ["SRC"]

[[items.attachments]]
key = "HA"
content_type = "text/html"
text = "<html><head><script>var school = 1;</script></head><body>   </body></html>"

[[items]]
key = "P1"
title = "Plain"
collections = ["SRC"]

[[items.attachments]]
key = "PA"
content_type = "application/pdf"
text = "school school school school"
"#,
    )
    .unwrap();
    let (app, _) = test_app(test_config(dir.path(), &snapshot_path));

    let report = app.run(Job::Stats).await.unwrap();
    assert_eq!(report.processed, 1);
    assert!(report.skipped.contains("H1"));

    let stats = std::fs::read_to_string(dir.path().join("out").join("stats.txt")).unwrap();
    assert!(!stats.contains("Script Only"));
    assert!(stats.contains("'school*': Mean = 4.00, StdDev = 0.00"));

    let report = app.run(Job::Extract).await.unwrap();
    assert!(report.skipped.contains("H1"));
    assert!(!dir.path().join("out").join("H1-Script--Only.txt").exists());
}

#[tokio::test]
async fn test_article_write_failure_keeps_batch_going() {
    let dir = TempDir::new().unwrap();
    let snapshot_path = setup_library(dir.path());
    // 目标路径已是目录，写入必然失败
    let blocked = dir.path().join("out").join("I1-Datafication--of--Schools.txt");
    std::fs::create_dir_all(&blocked).unwrap();
    let (app, sink) = test_app(test_config(dir.path(), &snapshot_path));

    let report = app.run(Job::Extract).await.unwrap();
    assert_eq!(report.processed, 3);
    assert!(!report.outputs.contains(&blocked));
    // 2 篇文章 + 合集
    assert_eq!(report.outputs.len(), 3);

    let corpus = std::fs::read_to_string(dir.path().join("out").join("all_files.txt")).unwrap();
    assert!(corpus.contains("# Datafication of Schools\n"));
    assert!(dir.path().join("out").join("I2-Single--Vote.txt").is_file());

    let write_errors: Vec<_> = sink
        .events()
        .into_iter()
        .filter(|e| {
            e.level == EventLevel::Error
                && e.stage == Stage::Write
                && e.item_key.as_deref() == Some("I1")
        })
        .collect();
    assert_eq!(write_errors.len(), 1);
}

#[tokio::test]
async fn test_stats_report_write_failure_is_logged() {
    let dir = TempDir::new().unwrap();
    let snapshot_path = setup_library(dir.path());
    std::fs::create_dir_all(dir.path().join("out").join("stats.txt")).unwrap();
    let (app, sink) = test_app(test_config(dir.path(), &snapshot_path));

    let report = app.run(Job::Stats).await.unwrap();
    assert_eq!(report.processed, 3);
    assert!(report.outputs.is_empty());
    assert!(sink
        .events()
        .iter()
        .any(|e| e.level == EventLevel::Error && e.stage == Stage::Write));
}

#[tokio::test]
async fn test_failed_promotion_is_not_persisted_later() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("lib");
    std::fs::create_dir_all(&nested).unwrap();
    let snapshot_path = setup_library(&nested);
    let (app, _) = test_app(test_config(dir.path(), &snapshot_path));

    let library = LocalLibrary::open(&snapshot_path).await.unwrap();
    // 快照目录消失，I1 的写入失败
    std::fs::remove_dir_all(&nested).unwrap();

    let report = app.run_with(&library, Job::Promote).await.unwrap();
    assert_eq!(report.promoted, 0);
    assert!(report.skipped.contains("I1"));

    // 内存中的状态与未写入的文件保持一致
    let i1 = library.item("I1").await.unwrap().unwrap();
    assert!(!i1.in_collection("TGT"));

    // 恢复目录后重跑，I1 会被正常加入
    std::fs::create_dir_all(&nested).unwrap();
    let report = app.run_with(&library, Job::Promote).await.unwrap();
    assert_eq!(report.promoted, 1);
    let reopened = LocalLibrary::open(&snapshot_path).await.unwrap();
    assert!(reopened.item("I1").await.unwrap().unwrap().in_collection("TGT"));
}
