mod common;

use common::{jacoco_xml, write, MethodCounters};
use indoc::indoc;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tempfile::TempDir;
use testmap::config::CoverageConfig;
use testmap::core::CoverageStatus;
use testmap::coverage::CoverageNormalizer;
use testmap::errors::{CoverageError, ReportError};
use testmap::observability::MemorySink;

#[test]
fn test_single_method_report_round_trip() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("jacoco.xml");
    write(
        &path,
        indoc! {r#"
            <?xml version="1.0" encoding="UTF-8"?>
            <report name="hello">
              <package name="com/example">
                <class name="com/example/Hello" sourcefilename="Hello.java">
                  <method name="greet" desc="()V" line="7">
                    <counter type="BRANCH" missed="0" covered="2"/>
                  </method>
                </class>
              </package>
            </report>
        "#},
    );

    let records = CoverageNormalizer::default().normalize(&[path]).unwrap();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.full_key(), "com.example.Hello.greet");
    assert_eq!(record.short_key(), "Hello.greet");
    assert_eq!(record.source_file, "Hello.java");
    assert_eq!(record.line, Some(7));
    assert_eq!(record.branches.covered(), 2);
    assert_eq!(record.branches.total(), 2);
    assert_eq!(record.branch_coverage(), 100.0);
    assert_eq!(record.status(), CoverageStatus::Excellent);
}

#[test]
fn test_bad_reports_are_skipped_not_fatal() {
    let temp = TempDir::new().unwrap();
    let good = temp.path().join("jacoco.xml");
    let malformed = temp.path().join("malformed.xml");
    let empty = temp.path().join("empty.xml");
    let missing = temp.path().join("missing.xml");
    write(&good, &jacoco_xml(&[MethodCounters::new("com.example", "Util", "parse", 3, 1)]));
    write(&malformed, "<report><package name=\"x\"><class");
    write(&empty, "");

    let sink = Arc::new(MemorySink::new());
    let outcome = CoverageNormalizer::default()
        .with_sink(sink.clone())
        .normalize_detailed(&[good, malformed, empty, missing])
        .unwrap();

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.parsed_reports, 1);
    assert_eq!(outcome.failures.len(), 3);
    assert!(matches!(outcome.failures[0], ReportError::Malformed { .. }));
    assert!(matches!(outcome.failures[1], ReportError::Empty { .. }));
    assert!(matches!(outcome.failures[2], ReportError::NotFound { .. }));
    assert_eq!(sink.count("report-skipped"), 3);
}

#[test]
fn test_directories_only_is_a_call_error() {
    let temp = TempDir::new().unwrap();
    let err = CoverageNormalizer::default()
        .normalize(&[temp.path().to_path_buf()])
        .unwrap_err();
    assert!(matches!(err, CoverageError::NoReadableReports { count: 1, .. }));
}

#[test]
fn test_empty_input_gives_empty_output() {
    assert!(CoverageNormalizer::default().normalize(&[]).unwrap().is_empty());
}

#[test]
fn test_inner_classes_keep_their_suffix() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("jacoco.xml");
    write(
        &path,
        indoc! {r#"
            <report name="r">
              <package name="com/example">
                <class name="com/example/Outer$Inner" sourcefilename="Outer.java">
                  <method name="&lt;clinit&gt;"><counter type="LINE" missed="1" covered="1"/></method>
                </class>
              </package>
            </report>
        "#},
    );

    let records = CoverageNormalizer::default().normalize(&[path]).unwrap();
    assert_eq!(records[0].class_name, "Outer$Inner");
    assert_eq!(records[0].source_file, "Outer.java");
    assert_eq!(records[0].display_method_name(), "static {...}");
    assert!(!records[0].branches.is_measured());
    assert_eq!(records[0].status(), CoverageStatus::Poor);
}

#[test]
fn test_package_allow_list_and_internal_exclusion() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("jacoco.xml");
    write(
        &path,
        &jacoco_xml(&[
            MethodCounters::new("com.acme.billing", "Invoice", "total", 1, 1),
            MethodCounters::new("com.other", "Thing", "run", 1, 0),
            MethodCounters::new("com.testmap.core", "Own", "run", 1, 0),
        ]),
    );

    let config = CoverageConfig {
        allowed_packages: Some(vec!["com.acme".to_string(), "com.testmap".to_string()]),
        ..CoverageConfig::default()
    };
    let records = CoverageNormalizer::new(config).normalize(&[path]).unwrap();

    let keys: Vec<_> = records.iter().map(|r| r.full_key()).collect();
    assert_eq!(keys, vec!["com.acme.billing.Invoice.total".to_string()]);
}

#[test]
fn test_html_reports_are_benign() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("index.html");
    write(&path, "<html></html>");

    let outcome = CoverageNormalizer::default().normalize_detailed(&[path]).unwrap();
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.problems().count(), 0);
}
