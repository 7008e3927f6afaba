//! Cross-module combined view.

use crate::core::{CoverageRecord, ModuleResult, TestMethodRecord};
use serde::Serialize;

/// A record tagged with the module it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleScoped<T> {
    pub module: String,
    pub record: T,
}

impl ModuleScoped<TestMethodRecord> {
    /// `module::package.Class.method`
    pub fn key(&self) -> String {
        format!(
            "{}::{}.{}",
            self.module,
            self.record.qualified_class_name(),
            self.record.method_name
        )
    }
}

impl ModuleScoped<CoverageRecord> {
    /// `module::package.Class.method`
    pub fn key(&self) -> String {
        format!("{}::{}", self.module, self.record.full_key())
    }
}

/// Tests and coverage from every module that produced data, namespaced by
/// module. Per-module results stay available unprefixed on each
/// [`ModuleResult`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct AggregateView {
    pub tests: Vec<ModuleScoped<TestMethodRecord>>,
    pub coverage: Vec<ModuleScoped<CoverageRecord>>,
}

impl AggregateView {
    pub fn from_results(results: &[ModuleResult]) -> Self {
        let mut view = Self::default();
        for result in results.iter().filter(|r| r.status().has_data()) {
            let module = result.name();
            view.tests.extend(result.tests().iter().map(|t| ModuleScoped {
                module: module.to_string(),
                record: t.clone(),
            }));
            view.coverage.extend(result.coverage().iter().map(|c| ModuleScoped {
                module: module.to_string(),
                record: c.clone(),
            }));
        }
        view
    }

    pub fn correlated_tests(&self) -> usize {
        self.tests.iter().filter(|t| t.record.is_correlated()).count()
    }
}
