//! JaCoCo report reader, the I/O side of the normalizer.
//!
//! Opens and size-checks one report, then walks its XML events and hands each
//! element to the pure handlers in [`super::handlers`].

use super::handlers::{
    handle_class_end, handle_class_start, handle_counter, handle_method_end, handle_method_start,
    handle_package_end, handle_package_start, handle_report_start, parse_count, ReportParserState,
};
use super::types::{CounterKind, ReportFormat};
use crate::config::CoverageConfig;
use crate::core::CoverageRecord;
use crate::errors::ReportError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Parse one coverage report file into per-method records.
///
/// # Errors
///
/// Every problem with the file is reported as a [`ReportError`]; the caller
/// decides whether to skip it.
pub fn parse_report(path: &Path, config: &CoverageConfig) -> Result<Vec<CoverageRecord>, ReportError> {
    let metadata = fs::metadata(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => ReportError::NotFound {
            path: path.to_path_buf(),
        },
        _ => ReportError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    if !metadata.is_file() {
        return Err(ReportError::NotAFile {
            path: path.to_path_buf(),
        });
    }

    match ReportFormat::from_path(path) {
        ReportFormat::Xml => {}
        ReportFormat::Html => {
            return Err(ReportError::Html {
                path: path.to_path_buf(),
            })
        }
        ReportFormat::Unsupported => {
            return Err(ReportError::Unsupported {
                path: path.to_path_buf(),
            })
        }
    }

    if metadata.len() == 0 {
        return Err(ReportError::Empty {
            path: path.to_path_buf(),
        });
    }
    if metadata.len() > config.max_report_bytes {
        return Err(ReportError::TooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            limit: config.max_report_bytes,
        });
    }

    let bytes = fs::read(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let contents = String::from_utf8_lossy(&bytes);
    parse_report_str(&contents, path, &config.source_extension)
}

/// Parse JaCoCo XML held in memory. `path` is only used for error messages.
pub fn parse_report_str(
    xml: &str,
    path: &Path,
    source_extension: &str,
) -> Result<Vec<CoverageRecord>, ReportError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut state = ReportParserState::new(source_extension);
    let mut depth: usize = 0;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                return Err(malformed(path, reader.error_position() as u64, e.to_string()));
            }
        };

        match event {
            Event::Start(element) => {
                depth += 1;
                dispatch_start(&mut state, &element)
                    .map_err(|m| malformed(path, reader.buffer_position() as u64, m))?;
            }
            Event::Empty(element) => {
                dispatch_start(&mut state, &element)
                    .map_err(|m| malformed(path, reader.buffer_position() as u64, m))?;
                dispatch_end(&mut state, element.local_name().as_ref());
            }
            Event::End(element) => {
                depth = depth.saturating_sub(1);
                dispatch_end(&mut state, element.local_name().as_ref());
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth != 0 {
        return Err(malformed(
            path,
            reader.buffer_position() as u64,
            "unexpected end of document",
        ));
    }
    if !state.saw_report_root {
        return Err(malformed(path, 0, "missing <report> root element"));
    }

    Ok(state.records)
}

fn malformed(path: &Path, position: u64, message: impl Into<String>) -> ReportError {
    ReportError::Malformed {
        path: path.to_path_buf(),
        position,
        message: message.into(),
    }
}

fn dispatch_start(state: &mut ReportParserState, element: &BytesStart<'_>) -> Result<(), String> {
    match element.local_name().as_ref() {
        b"report" => handle_report_start(state),
        b"package" => {
            let attrs = read_attributes(element)?;
            handle_package_start(state, attrs.get("name").map(String::as_str));
        }
        b"class" => {
            let attrs = read_attributes(element)?;
            handle_class_start(
                state,
                attrs.get("name").map(String::as_str),
                attrs.get("sourcefilename").map(String::as_str),
            );
        }
        b"method" => {
            let attrs = read_attributes(element)?;
            handle_method_start(
                state,
                attrs.get("name").map(String::as_str),
                attrs.get("line").map(String::as_str),
            );
        }
        b"counter" => {
            let attrs = read_attributes(element)?;
            let kind = attrs.get("type").and_then(|t| CounterKind::parse(t));
            let missed = attrs.get("missed").map(|v| parse_count(v)).unwrap_or(0);
            let covered = attrs.get("covered").map(|v| parse_count(v)).unwrap_or(0);
            handle_counter(state, kind, missed, covered);
        }
        _ => {}
    }
    Ok(())
}

fn dispatch_end(state: &mut ReportParserState, name: &[u8]) {
    match name {
        b"package" => handle_package_end(state),
        b"class" => handle_class_end(state),
        b"method" => handle_method_end(state),
        _ => {}
    }
}

pub(crate) fn read_attributes(element: &BytesStart<'_>) -> Result<HashMap<String, String>, String> {
    let mut attrs = HashMap::new();
    for attr in element.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        let value = attr.unescape_value().map_err(|e| e.to_string())?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        attrs.insert(key, value.into_owned());
    }
    Ok(attrs)
}
