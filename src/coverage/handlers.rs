//! Pure element handlers for JaCoCo XML.
//!
//! The parser walks the document and calls one handler per element it cares
//! about. Handlers only touch [`ReportParserState`]; they do no I/O and can be
//! exercised without a document.
//!
//! | Element | Handler |
//! |---|---|
//! | `<package name>` | [`handle_package_start`] / [`handle_package_end`] |
//! | `<class name sourcefilename>` | [`handle_class_start`] / [`handle_class_end`] |
//! | `<method name line>` | [`handle_method_start`] / [`handle_method_end`] |
//! | `<counter type missed covered>` | [`handle_counter`] |

use super::types::CounterKind;
use crate::core::{CoverageCounter, CoverageRecord};

pub const UNKNOWN_CLASS: &str = "UnknownClass";
pub const UNKNOWN_METHOD: &str = "unknownMethod";

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ClassContext {
    pub name: String,
    pub source_file: String,
}

/// State accumulated while walking one report.
#[derive(Debug)]
pub(crate) struct ReportParserState {
    pub records: Vec<CoverageRecord>,
    pub current_package: Option<String>,
    pub current_class: Option<ClassContext>,
    pub current_method: Option<CoverageRecord>,
    pub saw_report_root: bool,
    source_extension: String,
}

impl ReportParserState {
    pub fn new(source_extension: &str) -> Self {
        Self {
            records: Vec::new(),
            current_package: None,
            current_class: None,
            current_method: None,
            saw_report_root: false,
            source_extension: source_extension.to_string(),
        }
    }
}

/// Parse a counter attribute. Anything that is not a non-negative integer is 0.
pub fn parse_count(raw: &str) -> u32 {
    raw.trim().parse::<u32>().unwrap_or(0)
}

/// `com/example/Hello$Inner` becomes `Hello$Inner`; inner-class suffixes stay.
pub fn simple_class_name(raw: &str) -> &str {
    raw.rsplit('/').next().unwrap_or(raw)
}

/// `com/example` becomes `com.example`.
pub fn normalize_package(raw: &str) -> String {
    raw.trim().replace('/', ".")
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub(crate) fn handle_report_start(state: &mut ReportParserState) {
    state.saw_report_root = true;
}

pub(crate) fn handle_package_start(state: &mut ReportParserState, name: Option<&str>) {
    state.current_package = Some(name.map(normalize_package).unwrap_or_default());
}

pub(crate) fn handle_package_end(state: &mut ReportParserState) {
    state.current_package = None;
    state.current_class = None;
}

pub(crate) fn handle_class_start(
    state: &mut ReportParserState,
    name: Option<&str>,
    source_file: Option<&str>,
) {
    let class_name = non_empty(name)
        .map(simple_class_name)
        .filter(|n| !n.is_empty())
        .unwrap_or(UNKNOWN_CLASS)
        .to_string();
    let source_file = non_empty(source_file)
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}.{}", class_name, state.source_extension));

    state.current_class = Some(ClassContext {
        name: class_name,
        source_file,
    });
}

pub(crate) fn handle_class_end(state: &mut ReportParserState) {
    state.current_class = None;
}

/// Open a method record inside the current class.
///
/// A method outside any class still produces a record under [`UNKNOWN_CLASS`].
pub(crate) fn handle_method_start(
    state: &mut ReportParserState,
    name: Option<&str>,
    line: Option<&str>,
) {
    let class = state.current_class.clone().unwrap_or_else(|| ClassContext {
        name: UNKNOWN_CLASS.to_string(),
        source_file: format!("{}.{}", UNKNOWN_CLASS, state.source_extension),
    });
    let package = state.current_package.clone().unwrap_or_default();
    let method_name = non_empty(name).unwrap_or(UNKNOWN_METHOD);

    let mut record = CoverageRecord::new(package, class.name, method_name, class.source_file);
    record.line = line.and_then(|l| l.trim().parse::<u32>().ok());
    state.current_method = Some(record);
}

/// Apply a counter to the open method. Counters outside a method are class or
/// package totals and are not recorded.
pub(crate) fn handle_counter(
    state: &mut ReportParserState,
    kind: Option<CounterKind>,
    missed: u32,
    covered: u32,
) {
    let (Some(record), Some(kind)) = (state.current_method.as_mut(), kind) else {
        return;
    };
    let counter = CoverageCounter::from_missed(covered, missed);
    match kind {
        CounterKind::Instruction => record.instructions = counter,
        CounterKind::Branch => record.branches = counter,
        CounterKind::Line => record.lines = counter,
        CounterKind::Method => record.methods = counter,
    }
}

pub(crate) fn handle_method_end(state: &mut ReportParserState) {
    if let Some(record) = state.current_method.take() {
        state.records.push(record);
    }
}
