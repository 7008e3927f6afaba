use super::handlers::normalize_package;
use crate::config::CoverageConfig;
use crate::core::CoverageRecord;

/// Package allow-list plus the always-excluded internal packages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageFilter {
    allowed: Option<Vec<String>>,
    internal: Vec<String>,
}

impl PackageFilter {
    pub fn new(allowed: Option<Vec<String>>, internal: Vec<String>) -> Self {
        let normalize_all = |list: Vec<String>| -> Vec<String> {
            list.iter()
                .map(|p| normalize_package(p))
                .filter(|p| !p.is_empty())
                .collect()
        };
        Self {
            allowed: allowed.map(normalize_all),
            internal: normalize_all(internal),
        }
    }

    pub fn from_config(config: &CoverageConfig) -> Self {
        Self::new(config.allowed_packages.clone(), config.internal_packages.clone())
    }

    pub fn retains(&self, record: &CoverageRecord) -> bool {
        let package = record.package_name.as_str();
        if self.internal.iter().any(|p| in_package(package, p)) {
            return false;
        }
        match &self.allowed {
            Some(prefixes) => prefixes.iter().any(|p| package.starts_with(p.as_str())),
            None => true,
        }
    }

    pub fn apply(&self, records: Vec<CoverageRecord>) -> Vec<CoverageRecord> {
        records.into_iter().filter(|r| self.retains(r)).collect()
    }
}

/// `package` is `root` or one of its sub-packages.
fn in_package(package: &str, root: &str) -> bool {
    package == root
        || package
            .strip_prefix(root)
            .is_some_and(|rest| rest.starts_with('.'))
}
