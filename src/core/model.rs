// LogStitch - core/model.rs
//
// Core data model types. Pure data definitions with no I/O.
// These types are the shared vocabulary across all layers.

use std::path::PathBuf;
use std::time::Duration;

// =============================================================================
// Category
// =============================================================================

/// The log categories recognised from filenames, in match-priority order.
///
/// A filename that contains more than one category token (e.g.
/// "access_ssl.log") is classified as the first variant whose token it
/// contains, so the declaration order here IS the priority order:
/// access before error before ssl.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Access,
    Error,
    Ssl,
}

impl Category {
    /// Returns all variants in match-priority order.
    pub fn all() -> &'static [Category] {
        &[Category::Access, Category::Error, Category::Ssl]
    }

    /// The lower-case token searched for in (lower-cased) filenames.
    pub fn token(&self) -> &'static str {
        match self {
            Category::Access => "access",
            Category::Error => "error",
            Category::Ssl => "ssl",
        }
    }

    /// Filename of this category's combined artifact within an output folder.
    pub fn artifact_file_name(&self) -> &'static str {
        match self {
            Category::Access => "combined-access.log",
            Category::Error => "combined-error.log",
            Category::Ssl => "combined-ssl.log",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

// =============================================================================
// Candidate File (output of classification)
// =============================================================================

/// An input file that passed the reserved-prefix, category, and extension
/// filters, paired with its inferred category. Lives only for the duration
/// of one folder-combination task.
#[derive(Debug, Clone)]
pub struct CandidateFile {
    /// Full path to the file.
    pub path: PathBuf,

    /// Category inferred from the file name.
    pub category: Category,
}

// =============================================================================
// Folder Report
// =============================================================================

/// Per-folder accounting produced by every folder-combination task,
/// successful or not. Folded into the `RunSummary` by the run driver.
#[derive(Debug, Clone)]
pub struct FolderReport {
    /// The source folder this report describes.
    pub folder: PathBuf,

    /// Files that passed all candidate filters.
    pub candidates: usize,

    /// Candidates successfully decoded and merged into a bucket.
    pub files_merged: usize,

    /// Candidates that could not be read (non-fatal, logged).
    pub files_failed: usize,

    /// Combined artifacts written.
    pub artifacts_written: usize,

    /// Combined artifacts that were due but could not be written.
    pub artifacts_failed: usize,

    /// True when the folder task itself failed unexpectedly (panic caught
    /// at the task boundary). Sibling folders are unaffected.
    pub folder_failed: bool,
}

impl FolderReport {
    /// A zeroed report for a folder that has produced no work yet.
    pub fn empty(folder: PathBuf) -> Self {
        Self {
            folder,
            candidates: 0,
            files_merged: 0,
            files_failed: 0,
            artifacts_written: 0,
            artifacts_failed: 0,
            folder_failed: false,
        }
    }

    /// A report for a folder whose task failed at the boundary.
    pub fn failed(folder: PathBuf) -> Self {
        Self {
            folder_failed: true,
            ..Self::empty(folder)
        }
    }
}

// =============================================================================
// Run Summary
// =============================================================================

/// Summary statistics for a completed merge run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Directories visited by the walker (eligible or not).
    pub folders_visited: usize,

    /// Directories with at least one qualifying candidate file.
    pub folders_eligible: usize,

    /// Folder tasks that failed unexpectedly at the task boundary.
    pub folders_failed: usize,

    /// Files successfully decoded and merged, across all folders.
    pub files_merged: usize,

    /// Files that could not be read, across all folders.
    pub files_failed: usize,

    /// Combined artifacts written, across all folders.
    pub artifacts_written: usize,

    /// Combined artifacts that were due but could not be written.
    pub artifacts_failed: usize,

    /// Non-fatal traversal warnings (capped at `constants::MAX_WARNINGS`).
    pub warnings: Vec<String>,

    /// Wall-clock run duration.
    pub duration: Duration,
}

impl RunSummary {
    /// Fold one folder's report into the running totals.
    pub fn absorb(&mut self, report: &FolderReport) {
        if report.folder_failed {
            self.folders_failed += 1;
        }
        self.files_merged += report.files_merged;
        self.files_failed += report.files_failed;
        self.artifacts_written += report.artifacts_written;
        self.artifacts_failed += report.artifacts_failed;
    }

    /// True when every file was read and every due artifact was written.
    pub fn is_clean(&self) -> bool {
        self.folders_failed == 0 && self.files_failed == 0 && self.artifacts_failed == 0
    }
}

// =============================================================================
// Tests
// =============================================================================
