//! Grove Indexer - loads a Java source tree into a graph store
//!
//! Walks a directory, parses every `.java` file it finds and feeds the
//! results to [`ingest`]. Files that fail to parse are reported, not fatal.
//!
//! ```no_run
//! use grove_graph::GraphStore;
//! use grove_indexer::{index_directory, IndexOptions};
//! use std::path::Path;
//!
//! let store = GraphStore::new();
//! let report = index_directory(Path::new("."), &IndexOptions::default(), &store).unwrap();
//! println!("{} files, {} types", report.files_indexed, report.ingest.types_stored);
//! ```

mod ingest;
mod walker;

pub use ingest::{ingest, IngestReport, SkipCounts};
pub use walker::collect_sources;

use grove_core::{JavaParser, ParseError};
use grove_graph::GraphStore;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that stop an indexing run before any file is read.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error(transparent)]
    Parser(#[from] ParseError),
}

/// Directory names skipped unless configured otherwise.
pub const DEFAULT_IGNORE: &[&str] = &["target", "build", "out", ".git", "node_modules"];

/// How a directory is indexed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexOptions {
    /// Directory names pruned from the walk.
    pub ignore: Vec<String>,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            ignore: DEFAULT_IGNORE.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Result of indexing a directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexReport {
    pub files_indexed: usize,
    pub files_failed: usize,
    /// `(path, message)` for each file that failed to parse.
    pub errors: Vec<(String, String)>,
    pub ingest: IngestReport,
    pub duration_ms: u64,
}

/// Parses every Java file under `root` and ingests the results.
pub fn index_directory(
    root: &Path,
    options: &IndexOptions,
    store: &GraphStore,
) -> Result<IndexReport, IndexError> {
    if !root.is_dir() {
        return Err(IndexError::NotADirectory(root.to_path_buf()));
    }

    let start = Instant::now();
    let mut parser = JavaParser::new()?;
    let mut report = IndexReport::default();
    let mut parsed = Vec::new();

    for path in collect_sources(root, &options.ignore) {
        match parser.parse_file(&path) {
            Ok(file) => {
                report.files_indexed += 1;
                parsed.push(file);
            }
            Err(e) => {
                debug!("Failed to parse {}: {}", path.display(), e);
                report.files_failed += 1;
                report
                    .errors
                    .push((path.display().to_string(), e.to_string()));
            }
        }
    }

    report.ingest = ingest(store, &parsed);
    report.duration_ms = start.elapsed().as_millis() as u64;

    info!(
        "Indexed {} files ({} failed) in {}ms",
        report.files_indexed, report.files_failed, report.duration_ms
    );

    Ok(report)
}
