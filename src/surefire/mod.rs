//! Recorded test outcomes from Maven Surefire reports.
//!
//! Reads the `TEST-*.xml` files an earlier `mvn test` left behind and attaches
//! each method's outcome to its [`TestMethodRecord`]. Nothing is executed.
//! Lookup is by `package.Class#method`, then by `Class#method` when that
//! short key is unambiguous. Inner-class suffixes (`Outer$Inner`) fold into
//! the outer class, matching how test sources are inventoried.

pub mod parser;

pub use parser::{base_method_name, parse_surefire_report, parse_surefire_str, CaseResult, SuiteReport};

use crate::core::{TestExecution, TestMethodRecord};
use crate::errors::ExecutionReportError;
use std::collections::HashMap;
use std::path::PathBuf;

/// Reports that parsed, and the ones that did not.
#[derive(Debug, Default)]
pub struct ParsedReports {
    pub suites: Vec<SuiteReport>,
    pub problems: Vec<ExecutionReportError>,
}

/// Parse every report; a bad file is kept as a problem and the rest still load.
pub fn parse_surefire_reports(paths: &[PathBuf], max_bytes: u64) -> ParsedReports {
    let mut parsed = ParsedReports::default();
    for path in paths {
        match parse_surefire_report(path, max_bytes) {
            Ok(suite) => {
                tracing::debug!(
                    "{}: {} tests, {:.1}% passed",
                    path.display(),
                    suite.tests,
                    suite.success_rate()
                );
                parsed.suites.push(suite);
            }
            Err(e) => {
                tracing::warn!("{}", e);
                parsed.problems.push(e);
            }
        }
    }
    parsed
}

/// Counts from one [`merge_executions`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionMerge {
    pub matched: usize,
    pub unmatched: usize,
}

/// Per-method outcomes keyed by class and method.
#[derive(Debug, Default)]
pub struct ExecutionIndex {
    by_full_key: HashMap<String, TestExecution>,
    /// `None` marks a short key claimed by two different classes.
    by_short_key: HashMap<String, Option<String>>,
}

impl ExecutionIndex {
    pub fn build(suites: &[SuiteReport]) -> Self {
        let mut index = Self::default();
        for case in suites.iter().flat_map(|s| s.cases.iter()) {
            let class = outer_class(&case.class_name);
            let full = format!("{class}#{}", case.method_name);
            index
                .by_full_key
                .entry(full.clone())
                .and_modify(|existing| existing.absorb(&case.execution))
                .or_insert_with(|| case.execution.clone());

            let short = format!("{}#{}", simple_class(class), case.method_name);
            index
                .by_short_key
                .entry(short)
                .and_modify(|owner| {
                    if owner.as_deref() != Some(full.as_str()) {
                        *owner = None;
                    }
                })
                .or_insert_with(|| Some(full.clone()));
        }
        index
    }

    pub fn len(&self) -> usize {
        self.by_full_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_full_key.is_empty()
    }

    pub fn lookup(&self, test: &TestMethodRecord) -> Option<&TestExecution> {
        let full = format!("{}#{}", test.qualified_class_name(), test.method_name);
        self.by_full_key.get(&full).or_else(|| {
            let short = format!("{}#{}", test.class_name, test.method_name);
            self.by_short_key
                .get(&short)
                .and_then(Option::as_deref)
                .and_then(|owner| self.by_full_key.get(owner))
        })
    }
}

/// Attach recorded outcomes to `tests`. Tests with no recorded outcome get `None`.
pub fn merge_executions(tests: &mut [TestMethodRecord], suites: &[SuiteReport]) -> ExecutionMerge {
    let index = ExecutionIndex::build(suites);
    let mut merge = ExecutionMerge::default();
    for test in tests.iter_mut() {
        test.execution = index.lookup(test).cloned();
        if test.execution.is_some() {
            merge.matched += 1;
        } else {
            merge.unmatched += 1;
        }
    }
    merge
}

fn outer_class(class_name: &str) -> &str {
    class_name.split('$').next().unwrap_or(class_name)
}

fn simple_class(class_name: &str) -> &str {
    class_name.rsplit('.').next().unwrap_or(class_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ExecutionStatus;
    use pretty_assertions::assert_eq;

    fn case(class: &str, method: &str, status: ExecutionStatus) -> CaseResult {
        CaseResult {
            class_name: class.to_string(),
            method_name: method.to_string(),
            execution: TestExecution::new(status, 0.1),
        }
    }

    fn suite(cases: Vec<CaseResult>) -> SuiteReport {
        SuiteReport {
            tests: cases.len() as u32,
            cases,
            ..Default::default()
        }
    }

    fn test(package: &str, class: &str, method: &str) -> TestMethodRecord {
        TestMethodRecord::new(package, class, method, format!("{class}.java"))
    }

    #[test]
    fn test_merge_by_qualified_class() {
        let suites = vec![suite(vec![
            case("com.example.CalculatorTest", "testAdd", ExecutionStatus::Passed),
            case("com.example.CalculatorTest", "testSubtract", ExecutionStatus::Failed),
        ])];
        let mut tests = vec![
            test("com.example", "CalculatorTest", "testAdd"),
            test("com.example", "CalculatorTest", "testSubtract"),
            test("com.example", "CalculatorTest", "testNeverRun"),
        ];

        let merge = merge_executions(&mut tests, &suites);

        assert_eq!(merge, ExecutionMerge { matched: 2, unmatched: 1 });
        assert_eq!(tests[0].execution.as_ref().unwrap().status, ExecutionStatus::Passed);
        assert_eq!(tests[1].execution.as_ref().unwrap().status, ExecutionStatus::Failed);
        assert!(tests[2].execution.is_none());
    }

    #[test]
    fn test_short_key_used_for_default_package_test() {
        let suites = vec![suite(vec![case("com.example.ParserTest", "parses", ExecutionStatus::Passed)])];
        let mut tests = vec![test("", "ParserTest", "parses")];
        assert_eq!(merge_executions(&mut tests, &suites).matched, 1);
    }

    #[test]
    fn test_ambiguous_short_key_is_not_used() {
        let suites = vec![suite(vec![
            case("a.UtilTest", "testParse", ExecutionStatus::Passed),
            case("b.UtilTest", "testParse", ExecutionStatus::Failed),
        ])];
        let mut tests = vec![test("", "UtilTest", "testParse"), test("b", "UtilTest", "testParse")];

        let merge = merge_executions(&mut tests, &suites);
        assert_eq!(merge, ExecutionMerge { matched: 1, unmatched: 1 });
        assert_eq!(tests[1].execution.as_ref().unwrap().status, ExecutionStatus::Failed);
    }

    #[test]
    fn test_invocations_and_inner_classes_fold_together() {
        let suites = vec![suite(vec![
            case("a.OuterTest", "testEach", ExecutionStatus::Passed),
            case("a.OuterTest", "testEach", ExecutionStatus::Error),
            case("a.OuterTest$Nested", "testInner", ExecutionStatus::Skipped),
        ])];
        let mut tests = vec![test("a", "OuterTest", "testEach"), test("a", "OuterTest", "testInner")];

        merge_executions(&mut tests, &suites);
        let each = tests[0].execution.as_ref().unwrap();
        assert_eq!(each.status, ExecutionStatus::Error);
        assert_eq!(each.invocations, 2);
        assert_eq!(tests[1].execution.as_ref().unwrap().status, ExecutionStatus::Skipped);
    }

    #[test]
    fn test_parse_reports_keeps_going_past_bad_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let good = dir.path().join("TEST-a.ATest.xml");
        let bad = dir.path().join("TEST-a.BTest.xml");
        std::fs::write(&good, r#"<testsuite name="a.ATest" tests="1"><testcase name="testA" classname="a.ATest"/></testsuite>"#).unwrap();
        std::fs::write(&bad, "<report/>").unwrap();

        let parsed = parse_surefire_reports(&[bad, good], 1 << 20);
        assert_eq!(parsed.suites.len(), 1);
        assert_eq!(parsed.problems.len(), 1);
        assert_eq!(ExecutionIndex::build(&parsed.suites).len(), 1);
    }
}
