//! Trace file loading and filename labels
//!
//! Two on-disk shapes are supported:
//!
//! - **Interval traces**: a single line of integers separated by `", "`
//!   (`"0, 0, 1, 2, 0"`).
//! - **Regression traces**: integers separated by any mix of whitespace and
//!   commas, spread over any number of lines.
//!
//! Labels come from the filename: `size<N>rep<M>.<ext>`, where `N` is the
//! task-size label and `M` the repetition index.

use super::Trace;
use crate::dataset::LabeledTraces;
use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Labels carried by a `size<N>rep<M>.<ext>` filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LabelFilename {
    /// Task-size label (`N`)
    pub size: u32,
    /// Repetition index (`M`)
    pub rep: u32,
}

impl LabelFilename {
    /// Parse the labels from a path's file name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLabelFilename`] unless the file name is exactly
    /// `size`, digits, `rep`, digits, then a single extension.
    pub fn parse<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let invalid = || Error::InvalidLabelFilename(path.display().to_string());

        let name = path.file_name().and_then(|n| n.to_str()).ok_or_else(invalid)?;
        let (stem, ext) = name.split_once('.').ok_or_else(invalid)?;
        if ext.is_empty() || ext.contains('.') {
            return Err(invalid());
        }

        let rest = stem.strip_prefix("size").ok_or_else(invalid)?;
        let (size, rep) = rest.split_once("rep").ok_or_else(invalid)?;

        Ok(Self {
            size: parse_digits(size).ok_or_else(invalid)?,
            rep: parse_digits(rep).ok_or_else(invalid)?,
        })
    }
}

fn parse_digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Parse interval-trace text (`", "`-separated integers on one line).
///
/// # Errors
///
/// Returns [`Error::MalformedTraceFile`] if the content is empty or any token
/// is not a non-negative integer.
pub fn parse_interval_trace(text: &str, path: &Path) -> Result<Trace> {
    let line = text.trim_end_matches(['\n', '\r']);
    if line.trim().is_empty() {
        return Err(malformed(path, "trace is empty"));
    }

    line.split(", ")
        .enumerate()
        .map(|(i, token)| {
            token
                .parse::<u32>()
                .map_err(|e| malformed(path, &format!("token {i} ({token:?}): {e}")))
        })
        .collect::<Result<Vec<u32>>>()
        .map(Trace::new)
}

/// Parse regression-trace text (integers split on whitespace and commas).
///
/// # Errors
///
/// Returns [`Error::MalformedTraceFile`] if no integers are present or any
/// token is not a non-negative integer.
pub fn parse_regression_trace(text: &str, path: &Path) -> Result<Trace> {
    let steps = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .enumerate()
        .map(|(i, token)| {
            token
                .parse::<u32>()
                .map_err(|e| malformed(path, &format!("token {i} ({token:?}): {e}")))
        })
        .collect::<Result<Vec<u32>>>()?;

    if steps.is_empty() {
        return Err(malformed(path, "trace is empty"));
    }
    Ok(Trace::new(steps))
}

/// Read and parse an interval trace file.
///
/// # Errors
///
/// Returns an IO error if the file cannot be read, or
/// [`Error::MalformedTraceFile`] if its content does not parse.
pub fn read_interval_trace<P: AsRef<Path>>(path: P) -> Result<Trace> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let trace = parse_interval_trace(&text, path)?;
    tracing::debug!(path = %path.display(), steps = trace.len(), "loaded interval trace");
    Ok(trace)
}

/// Read and parse a regression trace file.
///
/// # Errors
///
/// Returns an IO error if the file cannot be read, or
/// [`Error::MalformedTraceFile`] if its content does not parse.
pub fn read_regression_trace<P: AsRef<Path>>(path: P) -> Result<Trace> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let trace = parse_regression_trace(&text, path)?;
    tracing::debug!(path = %path.display(), steps = trace.len(), "loaded regression trace");
    Ok(trace)
}

/// List regular files in `dir`, optionally filtered by extension, sorted by name.
///
/// # Errors
///
/// Returns an IO error if the directory cannot be read.
pub fn list_trace_files<P: AsRef<Path>>(dir: P, extension: Option<&str>) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir.as_ref())? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if let Some(ext) = extension {
            if path.extension().and_then(|e| e.to_str()) != Some(ext) {
                continue;
            }
        }
        files.push(path);
    }
    files.sort();
    Ok(files)
}

/// Load every interval trace in `dir`, grouped by the size label in its name.
///
/// Files are visited in name order, so label groups appear in the order their
/// first file sorts.
///
/// # Errors
///
/// Fails on the first unreadable file, malformed trace, or filename that does
/// not carry a `size<N>rep<M>` label.
pub fn load_labeled_dir<P: AsRef<Path>>(dir: P) -> Result<LabeledTraces> {
    let mut data = LabeledTraces::new();
    for path in list_trace_files(dir.as_ref(), None)? {
        let labels = LabelFilename::parse(&path)?;
        let trace = read_interval_trace(&path)?;
        data.insert(labels.size, trace);
    }
    tracing::info!(
        dir = %dir.as_ref().display(),
        labels = data.label_count(),
        traces = data.trace_count(),
        "loaded labeled traces"
    );
    Ok(data)
}

fn malformed(path: &Path, reason: &str) -> Error {
    Error::MalformedTraceFile {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}
