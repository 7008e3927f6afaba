use crate::core::CoverageRecord;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Lookup tables over one module's coverage records.
///
/// # Performance Characteristics
///
/// - **Build Time**: O(n) where n = coverage records
/// - **Lookup Time**: O(1) per key
///
/// Built once per module unit and only read afterwards. When several records
/// share a key the first one inserted wins, so lookups are deterministic for a
/// given record order.
#[derive(Debug, Clone)]
pub struct CoverageIndex<'a> {
    /// `package.Class.method`
    by_full_key: HashMap<String, &'a CoverageRecord>,
    /// `Class.method`
    by_short_key: HashMap<String, &'a CoverageRecord>,
    /// `method`
    by_method: HashMap<String, &'a CoverageRecord>,
    stats: CoverageIndexStats,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoverageIndexStats {
    pub total_records: usize,
    pub full_keys: usize,
    pub short_keys: usize,
    pub method_keys: usize,
    pub index_build_time: Duration,
}

impl<'a> CoverageIndex<'a> {
    pub fn empty() -> Self {
        Self {
            by_full_key: HashMap::new(),
            by_short_key: HashMap::new(),
            by_method: HashMap::new(),
            stats: CoverageIndexStats::default(),
        }
    }

    pub fn from_records(records: &'a [CoverageRecord]) -> Self {
        let start = Instant::now();
        let mut index = Self::empty();

        for record in records {
            index.by_full_key.entry(record.full_key()).or_insert(record);
            index.by_short_key.entry(record.short_key()).or_insert(record);
            index
                .by_method
                .entry(record.method_name.clone())
                .or_insert(record);
        }

        index.stats = CoverageIndexStats {
            total_records: records.len(),
            full_keys: index.by_full_key.len(),
            short_keys: index.by_short_key.len(),
            method_keys: index.by_method.len(),
            index_build_time: start.elapsed(),
        };
        index
    }

    pub fn lookup_full(&self, key: &str) -> Option<&'a CoverageRecord> {
        self.by_full_key.get(key).copied()
    }

    pub fn lookup_short(&self, key: &str) -> Option<&'a CoverageRecord> {
        self.by_short_key.get(key).copied()
    }

    pub fn lookup_method(&self, method: &str) -> Option<&'a CoverageRecord> {
        self.by_method.get(method).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.total_records == 0
    }

    pub fn stats(&self) -> &CoverageIndexStats {
        &self.stats
    }
}
