// Shared fixtures for testmap integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use testmap::core::{CoverageCounter, CoverageRecord, TestMethodRecord};

pub fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// One `<method>` entry for [`jacoco_xml`].
pub struct MethodCounters {
    pub package: &'static str,
    pub class: &'static str,
    pub method: &'static str,
    pub branch_covered: u32,
    pub branch_missed: u32,
}

impl MethodCounters {
    pub fn new(package: &'static str, class: &'static str, method: &'static str, covered: u32, missed: u32) -> Self {
        Self {
            package,
            class,
            method,
            branch_covered: covered,
            branch_missed: missed,
        }
    }
}

/// A JaCoCo XML report, one `<package>`/`<class>` per entry.
pub fn jacoco_xml(methods: &[MethodCounters]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<report name=\"fixture\">\n");
    for m in methods {
        let package = m.package.replace('.', "/");
        xml.push_str(&format!(
            concat!(
                "  <package name=\"{pkg}\">\n",
                "    <class name=\"{pkg}/{class}\" sourcefilename=\"{class}.java\">\n",
                "      <method name=\"{method}\" desc=\"()V\" line=\"10\">\n",
                "        <counter type=\"INSTRUCTION\" missed=\"0\" covered=\"12\"/>\n",
                "        <counter type=\"BRANCH\" missed=\"{missed}\" covered=\"{covered}\"/>\n",
                "        <counter type=\"LINE\" missed=\"0\" covered=\"4\"/>\n",
                "      </method>\n",
                "    </class>\n",
                "  </package>\n"
            ),
            pkg = package,
            class = m.class,
            method = m.method,
            missed = m.branch_missed,
            covered = m.branch_covered,
        ));
    }
    xml.push_str("</report>\n");
    xml
}

pub fn coverage_record(package: &str, class: &str, method: &str, covered: u32, total: u32) -> CoverageRecord {
    let mut record = CoverageRecord::new(package, class, method, format!("{class}.java"));
    record.branches = CoverageCounter::new(covered, total);
    record
}

pub fn test_record(package: &str, class: &str, method: &str) -> TestMethodRecord {
    TestMethodRecord::new(package, class, method, format!("{class}.java"))
}

/// A Maven project on disk: a parent pom listing modules, each with its own
/// pom, test sources and optional coverage report.
pub struct MavenProject {
    pub dir: TempDir,
    modules: Vec<String>,
}

impl MavenProject {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
            modules: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn module_root(&self, name: &str) -> PathBuf {
        self.root().join(name)
    }

    /// Registers a module with a pom and an empty test source directory.
    pub fn module(mut self, name: &str) -> Self {
        write(
            &self.module_root(name).join("pom.xml"),
            &format!("<project><artifactId>{name}</artifactId></project>"),
        );
        fs::create_dir_all(self.module_root(name).join("src/test/java")).unwrap();
        self.modules.push(name.to_string());
        self
    }

    /// Registers a module with a pom but no test source directory.
    pub fn module_without_tests(mut self, name: &str) -> Self {
        write(
            &self.module_root(name).join("pom.xml"),
            &format!("<project><artifactId>{name}</artifactId></project>"),
        );
        self.modules.push(name.to_string());
        self
    }

    /// Registers a module in the parent pom without creating anything.
    pub fn missing_module(mut self, name: &str) -> Self {
        self.modules.push(name.to_string());
        self
    }

    pub fn test_source(self, module: &str, relative: &str, source: &str) -> Self {
        write(&self.module_root(module).join("src/test/java").join(relative), source);
        self
    }

    pub fn coverage(self, module: &str, xml: &str) -> Self {
        write(
            &self.module_root(module).join("target/site/jacoco/jacoco.xml"),
            xml,
        );
        self
    }

    /// Writes `target/surefire-reports/TEST-<suite>.xml`.
    pub fn surefire(self, module: &str, suite: &str, xml: &str) -> Self {
        write(
            &self
                .module_root(module)
                .join("target/surefire-reports")
                .join(format!("TEST-{suite}.xml")),
            xml,
        );
        self
    }

    /// Writes the parent pom. Call last.
    pub fn finish(self) -> Self {
        let modules: String = self
            .modules
            .iter()
            .map(|m| format!("    <module>{m}</module>\n"))
            .collect();
        write(
            &self.root().join("pom.xml"),
            &format!("<project>\n  <modules>\n{modules}  </modules>\n</project>\n"),
        );
        self
    }
}
