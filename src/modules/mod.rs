//! Maven module discovery and pre-validation.
//!
//! The root `pom.xml` lists modules under `project > modules > module`. A
//! project without that list is treated as a single module rooted at the
//! project directory. Validation failures do not stop discovery; they are
//! recorded on the descriptor so the orchestrator can report the module as
//! skipped.

use crate::config::ScanConfig;
use crate::core::module::DEFAULT_MANIFEST;
use crate::core::ModuleDescriptor;
use crate::errors::DiscoveryError;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Enumerate and validate the modules of the project at `project_root`.
pub fn discover_modules(project_root: &Path, scan: &ScanConfig) -> Result<Vec<ModuleDescriptor>, DiscoveryError> {
    let manifest = project_root.join(DEFAULT_MANIFEST);
    if !manifest.is_file() {
        return Err(DiscoveryError::ManifestMissing { path: manifest });
    }
    let contents = fs::read_to_string(&manifest).map_err(|source| DiscoveryError::Io {
        path: manifest.clone(),
        source,
    })?;
    let module_paths = parse_module_list(&contents).map_err(|message| DiscoveryError::Manifest {
        path: manifest.clone(),
        message,
    })?;

    if module_paths.is_empty() {
        tracing::info!("No <modules> in {}, treating project as one module", manifest.display());
        return Ok(vec![describe_module(
            &project_name(project_root),
            project_root.to_path_buf(),
            scan,
        )]);
    }

    let mut taken = HashSet::new();
    let descriptors = module_paths
        .iter()
        .map(|relative| {
            let root = project_root.join(relative);
            let name = unique_name(module_name(relative), &mut taken);
            describe_module(&name, root, scan)
        })
        .collect::<Vec<_>>();

    tracing::info!(
        "Discovered {} modules ({} valid)",
        descriptors.len(),
        descriptors.iter().filter(|d| d.is_valid()).count()
    );
    Ok(descriptors)
}

/// Module paths listed directly under `<project><modules>`.
///
/// Modules declared inside profiles are not included.
pub fn parse_module_list(pom: &str) -> Result<Vec<String>, String> {
    let mut reader = Reader::from_str(pom);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut modules = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => stack.push(e.local_name().as_ref().to_vec()),
            Ok(Event::End(_)) => {
                stack.pop();
            }
            Ok(Event::Text(text)) if is_module_path(&stack) => {
                let value = text.unescape().map_err(|e| e.to_string())?;
                let value = value.trim();
                if !value.is_empty() {
                    modules.push(value.to_string());
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(format!("at byte {}: {}", reader.error_position(), e));
            }
        }
    }

    Ok(modules)
}

fn is_module_path(stack: &[Vec<u8>]) -> bool {
    matches!(stack, [project, modules, module]
        if project == b"project" && modules == b"modules" && module == b"module")
}

/// Module path as declared, with `/` separators: `services\\billing/` → `services/billing`.
///
/// Two modules may share a last segment (`libs/core`, `apps/core`), so the
/// whole relative path is the name.
pub fn module_name(module_path: &str) -> String {
    let segments: Vec<&str> = module_path
        .split(['/', '\\'])
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();
    if segments.is_empty() {
        module_path.to_string()
    } else {
        segments.join("/")
    }
}

/// `name`, or `name~N` for the first free N when `name` is already taken.
fn unique_name(name: String, taken: &mut HashSet<String>) -> String {
    if taken.insert(name.clone()) {
        return name;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{name}~{n}");
        if taken.insert(candidate.clone()) {
            tracing::warn!("Module name {} is declared twice, using {}", name, candidate);
            return candidate;
        }
        n += 1;
    }
}

fn project_name(root: &Path) -> String {
    root.canonicalize()
        .ok()
        .as_deref()
        .unwrap_or(root)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| ".".to_string())
}

/// Descriptor for a module at `root`, laid out per `scan`, with validation applied.
pub fn describe_module(name: &str, root: PathBuf, scan: &ScanConfig) -> ModuleDescriptor {
    let mut descriptor = ModuleDescriptor::new(name, root)
        .with_test_dir(&scan.test_source_dir)
        .with_coverage_dir(&scan.coverage_dir)
        .with_execution_dir(&scan.execution_dir);
    descriptor.validation_error = validate_descriptor(&descriptor);
    descriptor
}

/// First failing rule, if any:
/// the module directory exists, its manifest exists and is non-empty, and
/// its test directory exists and is a directory.
pub fn validate_descriptor(descriptor: &ModuleDescriptor) -> Option<String> {
    if !descriptor.root.is_dir() {
        return Some(format!(
            "Module directory does not exist: {}",
            descriptor.root.display()
        ));
    }
    match fs::metadata(&descriptor.manifest) {
        Ok(meta) if !meta.is_file() => {
            return Some(format!("Manifest is not a file: {}", descriptor.manifest.display()))
        }
        Ok(meta) if meta.len() == 0 => {
            return Some(format!("Manifest is empty: {}", descriptor.manifest.display()))
        }
        Ok(_) => {}
        Err(_) => {
            return Some(format!("Manifest not found: {}", descriptor.manifest.display()))
        }
    }
    if !descriptor.test_dir.exists() {
        return Some(format!(
            "Test directory does not exist: {}",
            descriptor.test_dir.display()
        ));
    }
    if !descriptor.test_dir.is_dir() {
        return Some(format!(
            "Test path is not a directory: {}",
            descriptor.test_dir.display()
        ));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const PARENT_POM: &str = indoc! {r#"
        <?xml version="1.0" encoding="UTF-8"?>
        <project xmlns="http://maven.apache.org/POM/4.0.0">
          <modelVersion>4.0.0</modelVersion>
          <modules>
            <module>core</module>
            <module> services/billing </module>
          </modules>
          <profiles>
            <profile>
              <modules><module>extra</module></modules>
            </profile>
          </profiles>
        </project>
    "#};

    fn write(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_parse_module_list() {
        assert_eq!(
            parse_module_list(PARENT_POM).unwrap(),
            vec!["core".to_string(), "services/billing".to_string()]
        );
    }

    #[test]
    fn test_parse_module_list_without_modules() {
        assert!(parse_module_list("<project><artifactId>x</artifactId></project>")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_parse_module_list_malformed() {
        assert!(parse_module_list("<project><modules></project>").is_err());
    }

    #[test]
    fn test_module_name() {
        assert_eq!(module_name("services/billing"), "services/billing");
        assert_eq!(module_name("services\\billing\\"), "services/billing");
        assert_eq!(module_name("./core/"), "core");
        assert_eq!(module_name("core"), "core");
    }

    #[test]
    fn test_modules_sharing_a_last_segment_keep_distinct_names() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(
            &root.join("pom.xml"),
            indoc! {r#"
                <project>
                  <modules>
                    <module>libs/core</module>
                    <module>apps/core</module>
                    <module>libs/core/</module>
                  </modules>
                </project>
            "#},
        );

        let names: Vec<String> = discover_modules(root, &ScanConfig::default())
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["libs/core", "apps/core", "libs/core~2"]);
    }

    #[test]
    fn test_discover_modules_with_validation() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(&root.join("pom.xml"), PARENT_POM);
        write(&root.join("core/pom.xml"), "<project/>");
        fs::create_dir_all(root.join("core/src/test/java")).unwrap();
        write(&root.join("services/billing/pom.xml"), "<project/>");

        let modules = discover_modules(root, &ScanConfig::default()).unwrap();
        assert_eq!(modules.len(), 2);
        assert_eq!(modules[0].name, "core");
        assert!(modules[0].is_valid());
        assert_eq!(modules[1].name, "services/billing");
        assert!(modules[1]
            .validation_error
            .as_deref()
            .unwrap()
            .starts_with("Test directory does not exist"));
    }

    #[test]
    fn test_discover_single_module_project() {
        let temp = TempDir::new().unwrap();
        write(&temp.path().join("pom.xml"), "<project><artifactId>solo</artifactId></project>");
        fs::create_dir_all(temp.path().join("src/test/java")).unwrap();

        let modules = discover_modules(temp.path(), &ScanConfig::default()).unwrap();
        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].root, temp.path());
        assert!(modules[0].is_valid());
    }

    #[test]
    fn test_discover_requires_root_manifest() {
        let temp = TempDir::new().unwrap();
        let err = discover_modules(temp.path(), &ScanConfig::default()).unwrap_err();
        assert!(matches!(err, DiscoveryError::ManifestMissing { .. }));
    }

    #[test]
    fn test_validate_descriptor_rules() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("m");

        let missing = ModuleDescriptor::new("m", &root);
        assert!(validate_descriptor(&missing).unwrap().starts_with("Module directory"));

        fs::create_dir_all(&root).unwrap();
        assert!(validate_descriptor(&missing).unwrap().starts_with("Manifest not found"));

        write(&root.join("pom.xml"), "");
        assert!(validate_descriptor(&missing).unwrap().starts_with("Manifest is empty"));

        write(&root.join("pom.xml"), "<project/>");
        write(&root.join("src/test/java"), "not a directory");
        assert!(validate_descriptor(&missing).unwrap().starts_with("Test path is not a directory"));

        fs::remove_file(root.join("src/test/java")).unwrap();
        fs::create_dir_all(root.join("src/test/java")).unwrap();
        assert_eq!(validate_descriptor(&missing), None);
    }
}
