//! Matching of test methods to implementation coverage.

use super::candidates::{class_candidates, last_segment, method_candidates};
use super::index::CoverageIndex;
use crate::config::CorrelationConfig;
use crate::core::{CoverageRecord, MatchInfo, MatchStrategy, TestMethodRecord};
use crate::observability::{default_sink, EventSink, PipelineEvent};
use serde::Serialize;
use std::sync::Arc;

/// Counts of how each test was (or was not) correlated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CorrelationReport {
    pub total: usize,
    pub full_key: usize,
    pub short_key: usize,
    pub method_only: usize,
    pub unmatched: usize,
}

impl CorrelationReport {
    pub fn matched(&self) -> usize {
        self.full_key + self.short_key + self.method_only
    }

    /// Share of tests correlated, in `[0, 100]`.
    pub fn match_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.matched() as f64 / self.total as f64 * 100.0
        }
    }

    fn count(&mut self, strategy: Option<MatchStrategy>) {
        self.total += 1;
        match strategy {
            Some(MatchStrategy::FullKey) => self.full_key += 1,
            Some(MatchStrategy::ShortKey) => self.short_key += 1,
            Some(MatchStrategy::MethodOnly) => self.method_only += 1,
            None => self.unmatched += 1,
        }
    }
}

/// Find the best coverage record for one test.
///
/// Strategies are tried in fixed order and the first hit wins:
/// full key over every (class × method) candidate pair, then short key over
/// the same pairs, then, when `method_only` is set, the method candidates
/// alone.
pub fn find_match<'a>(
    test: &TestMethodRecord,
    index: &CoverageIndex<'a>,
    method_only: bool,
) -> Option<(&'a CoverageRecord, MatchInfo)> {
    let class_list = class_candidates(&test.qualified_class_name());
    let method_list = method_candidates(&test.method_name);
    let (classes, methods) = (&class_list, &method_list);

    let pairs = move || {
        classes
            .iter()
            .flat_map(move |class| methods.iter().map(move |method| (class, method)))
    };

    pairs()
        .find_map(|(class, method)| {
            let key = format!("{class}.{method}");
            index
                .lookup_full(&key)
                .map(|r| hit(MatchStrategy::FullKey, key, r))
        })
        .or_else(|| {
            pairs().find_map(|(class, method)| {
                let key = format!("{}.{}", last_segment(class), method);
                index
                    .lookup_short(&key)
                    .map(|r| hit(MatchStrategy::ShortKey, key, r))
            })
        })
        .or_else(|| {
            if !method_only {
                return None;
            }
            methods.iter().find_map(|method| {
                index
                    .lookup_method(method)
                    .map(|r| hit(MatchStrategy::MethodOnly, method.clone(), r))
            })
        })
}

fn hit(strategy: MatchStrategy, key: String, record: &CoverageRecord) -> (&CoverageRecord, MatchInfo) {
    (record, MatchInfo { strategy, key })
}

/// Attaches implementation coverage to test records.
///
/// Correlation never fails: a test without a match keeps 0% and `Unknown`.
pub struct CorrelationEngine {
    method_only_fallback: bool,
    sink: Arc<dyn EventSink>,
}

impl CorrelationEngine {
    pub fn new(config: &CorrelationConfig) -> Self {
        Self {
            method_only_fallback: config.method_only_fallback,
            sink: default_sink(),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn correlate(
        &self,
        tests: &mut [TestMethodRecord],
        coverage: &[CoverageRecord],
    ) -> CorrelationReport {
        let index = CoverageIndex::from_records(coverage);
        tracing::debug!(
            "coverage index: {} records, {} full keys, built in {:?}",
            index.stats().total_records,
            index.stats().full_keys,
            index.stats().index_build_time
        );
        self.correlate_with_index(tests, &index)
    }

    /// Correlate against a prebuilt index. Earlier results on `tests` are
    /// discarded first, so repeated runs give identical output.
    pub fn correlate_with_index(
        &self,
        tests: &mut [TestMethodRecord],
        index: &CoverageIndex<'_>,
    ) -> CorrelationReport {
        let mut report = CorrelationReport::default();

        for test in tests.iter_mut() {
            test.reset_correlation();
            match find_match(test, index, self.method_only_fallback) {
                Some((record, info)) => {
                    self.sink.record(&PipelineEvent::MatchFound {
                        test: test.display_name(),
                        strategy: info.strategy,
                        key: info.key.clone(),
                    });
                    report.count(Some(info.strategy));
                    test.apply_match(record, info);
                }
                None => {
                    self.sink.record(&PipelineEvent::MatchFailed {
                        test: test.display_name(),
                    });
                    report.count(None);
                }
            }
        }

        report
    }
}

impl Default for CorrelationEngine {
    fn default() -> Self {
        Self::new(&CorrelationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CoverageCounter, CoverageStatus};
    use crate::observability::MemorySink;

    fn coverage(package: &str, class: &str, method: &str, covered: u32, total: u32) -> CoverageRecord {
        let mut r = CoverageRecord::new(package, class, method, format!("{class}.java"));
        r.branches = CoverageCounter::new(covered, total);
        r
    }

    fn test(package: &str, class: &str, method: &str) -> TestMethodRecord {
        TestMethodRecord::new(package, class, method, format!("{class}.java"))
    }

    #[test]
    fn test_full_key_match() {
        let records = vec![coverage("com.example", "HelloService", "hello", 2, 2)];
        let index = CoverageIndex::from_records(&records);
        let (record, info) =
            find_match(&test("com.example", "HelloServiceTest", "testHello"), &index, true).unwrap();
        assert_eq!(record.method_name, "hello");
        assert_eq!(info.strategy, MatchStrategy::FullKey);
        assert_eq!(info.key, "com.example.HelloService.hello");
    }

    #[test]
    fn test_short_key_tolerates_package_drift() {
        let records = vec![coverage("com.example.core", "Parser", "parse", 1, 2)];
        let index = CoverageIndex::from_records(&records);
        let (_, info) =
            find_match(&test("com.example.tests", "ParserTest", "testParse"), &index, true).unwrap();
        assert_eq!(info.strategy, MatchStrategy::ShortKey);
        assert_eq!(info.key, "Parser.parse");
    }

    #[test]
    fn test_method_only_is_last_resort() {
        let records = vec![coverage("org.other", "Unrelated", "compute", 1, 4)];
        let index = CoverageIndex::from_records(&records);
        let (_, info) =
            find_match(&test("com.example", "CalculatorTest", "testCompute"), &index, true).unwrap();
        assert_eq!(info.strategy, MatchStrategy::MethodOnly);
        assert_eq!(info.key, "compute");

        assert!(find_match(&test("com.example", "CalculatorTest", "testCompute"), &index, false).is_none());
    }

    #[test]
    fn test_class_candidates_take_priority_over_method_candidates() {
        let records = vec![
            coverage("p", "Service", "testRun", 1, 2),
            coverage("p", "ServiceTest", "run", 2, 2),
        ];
        let index = CoverageIndex::from_records(&records);
        let (record, _) = find_match(&test("p", "ServiceTest", "testRun"), &index, true).unwrap();
        assert_eq!(record.class_name, "ServiceTest");
    }

    #[test]
    fn test_correlate_report_and_events() {
        let records = vec![coverage("com.example", "HelloService", "hello", 1, 2)];
        let mut tests = vec![
            test("com.example", "HelloServiceTest", "testHello"),
            test("com.example", "HelloServiceTest", "testNothingRelated"),
        ];
        let sink = Arc::new(MemorySink::new());
        let engine = CorrelationEngine::default().with_sink(sink.clone());

        let report = engine.correlate(&mut tests, &records);

        assert_eq!(report.total, 2);
        assert_eq!(report.full_key, 1);
        assert_eq!(report.unmatched, 1);
        assert_eq!(report.match_rate(), 50.0);
        assert_eq!(tests[0].coverage_percent, 50.0);
        assert_eq!(tests[0].coverage_status, CoverageStatus::Poor);
        assert_eq!(tests[1].coverage_status, CoverageStatus::Unknown);
        assert_eq!(sink.count("match-found"), 1);
        assert_eq!(sink.count("match-failed"), 1);
    }

    #[test]
    fn test_correlate_clears_stale_results() {
        let records = vec![coverage("a", "B", "c", 1, 1)];
        let mut tests = vec![test("a", "BTest", "testC")];
        let engine = CorrelationEngine::default();
        engine.correlate(&mut tests, &records);
        assert!(tests[0].is_correlated());

        engine.correlate(&mut tests, &[]);
        assert!(!tests[0].is_correlated());
        assert_eq!(tests[0].coverage_percent, 0.0);
    }

    #[test]
    fn test_correlate_empty_inputs() {
        let report = CorrelationEngine::default().correlate(&mut [], &[]);
        assert_eq!(report, CorrelationReport::default());
        assert_eq!(report.match_rate(), 0.0);
    }
}
