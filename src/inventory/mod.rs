//! Test method extraction from Java test sources.
//!
//! A light-weight scan, not a Java parser: the package declaration, the first
//! class declaration, and every method annotated `@Test` or
//! `@ParameterizedTest`. Custom javadoc tags on the class and on each test
//! method (`@TestModule greeting`) become free-text annotations on the record.
//! Declarations inside comments are ignored.

mod comments;
mod doc_tags;

pub use comments::mask_comments;

pub use doc_tags::{parse_doc_tags, STANDARD_JAVADOC_TAGS};

use crate::core::TestMethodRecord;
use crate::errors::InventoryError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

static PACKAGE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*package\s+([\w.]+)\s*;").expect("valid package regex"));

static CLASS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*(?:(?:public|protected|private|final|abstract|static)\s+)*class\s+(\w+)")
        .expect("valid class regex")
});

static TEST_METHOD_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)@(?:Test|ParameterizedTest)\b.*?(?:public\s+)?void\s+(\w+)\s*\(")
        .expect("valid test method regex")
});

static DOC_COMMENT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)/\*\*(.*?)\*/").expect("valid doc comment regex"));

/// Text allowed between a doc comment and the declaration it documents.
static ANNOTATIONS_ONLY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\s|@\w+(?:\([^)]*\))?)*$").expect("valid annotation gap regex")
});

/// Read one test source and extract its test methods.
pub fn extract_tests(path: &Path) -> Result<Vec<TestMethodRecord>, InventoryError> {
    let bytes = fs::read(path).map_err(|source| InventoryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    extract_from_source(&String::from_utf8_lossy(&bytes), path)
}

/// Extract test methods from source text. `path` is recorded on each test.
pub fn extract_from_source(source: &str, path: &Path) -> Result<Vec<TestMethodRecord>, InventoryError> {
    // Offsets in `code` line up with `source`; doc comments are read from `source`.
    let code = mask_comments(source);
    let class = CLASS_PATTERN
        .captures(&code)
        .and_then(|c| c.get(1).map(|m| (c.get(0).map_or(0, |all| all.start()), m.as_str())))
        .ok_or_else(|| InventoryError::NoClass {
            path: path.to_path_buf(),
        })?;
    let (class_start, class_name) = class;

    let package = PACKAGE_PATTERN
        .captures(&code)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    let docs: Vec<(usize, &str)> = DOC_COMMENT_PATTERN
        .captures_iter(source)
        .filter_map(|c| {
            let whole = c.get(0)?;
            Some((whole.end(), c.get(1)?.as_str()))
        })
        .collect();

    let class_tags = doc_before(&code, &docs, class_start)
        .map(parse_doc_tags)
        .unwrap_or_default();

    let tests = TEST_METHOD_PATTERN
        .captures_iter(&code)
        .filter_map(|c| {
            let start = c.get(0)?.start();
            let name = c.get(1)?.as_str();
            let mut annotations: BTreeMap<String, String> = class_tags.clone();
            if let Some(doc) = doc_before(&code, &docs, start) {
                annotations.extend(parse_doc_tags(doc));
            }
            let mut record = TestMethodRecord::new(package.as_str(), class_name, name, path);
            record.annotations = annotations;
            Some(record)
        })
        .collect();

    Ok(tests)
}

/// The doc comment directly above `position`, with only annotations between.
/// `code` is the comment-masked source.
fn doc_before<'a>(code: &str, docs: &[(usize, &'a str)], position: usize) -> Option<&'a str> {
    docs.iter()
        .rev()
        .find(|(end, _)| *end <= position)
        .filter(|(end, _)| ANNOTATIONS_ONLY.is_match(&code[*end..position]))
        .map(|(_, body)| *body)
}
