// LogStitch - core/discovery.rs
//
// Recursive directory traversal: find every folder under the root that
// contains at least one qualifying log file and hand the folder plus its
// file listing to the caller. Reads only directory listings, never file
// contents -- that boundary belongs to core::decode.
//
// Rule 11 compliance:
//   - Per-entry I/O errors are non-fatal and collected as capped warnings.
//   - Symbolic links are never followed, so cyclic trees terminate.

use crate::core::classify;
use crate::util::constants;
use crate::util::error::WalkError;
use std::path::{Path, PathBuf};

// =============================================================================
// Work units
// =============================================================================

/// One eligible folder and its file listing, handed to a folder task.
///
/// The listing is the snapshot taken during the walk; the combiner works from
/// these names rather than re-listing, so one run sees one consistent view of
/// each folder even while the tree is being written to.
#[derive(Debug, Clone)]
pub struct FolderWork {
    pub folder: PathBuf,
    pub file_names: Vec<String>,
}

/// Traversal totals and non-fatal warnings, returned once the walk finishes.
#[derive(Debug, Default)]
pub struct WalkOutcome {
    pub folders_visited: usize,
    pub folders_eligible: usize,
    pub warnings: Vec<String>,
}

// =============================================================================
// Traversal
// =============================================================================

/// Validate that `root` exists and is a directory.
///
/// Uses `fs::metadata()` rather than `Path::exists()` / `Path::is_dir()`
/// because those helpers map ALL errors -- including PermissionDenied -- to
/// `false`, making it impossible to distinguish an access-denied root from a
/// path that genuinely does not exist.
pub fn validate_root(root: &Path) -> Result<(), WalkError> {
    match std::fs::metadata(root) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(WalkError::NotADirectory {
            path: root.to_path_buf(),
        }),
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(WalkError::PermissionDenied {
                path: root.to_path_buf(),
                source: e,
            })
        }
        Err(_) => Err(WalkError::RootNotFound {
            path: root.to_path_buf(),
        }),
    }
}

/// Walk the tree under `root`, invoking `on_eligible` once per folder that
/// contains at least one qualifying log file. The root folder itself is
/// tested like any other.
///
/// The callback runs on the walker's thread and should be cheap (the run
/// driver uses it to spawn a folder task). Inaccessible entries are recorded
/// as warnings and skipped; the walk itself never fails once the root has
/// been validated.
pub fn walk_eligible<F>(root: &Path, mut on_eligible: F) -> WalkOutcome
where
    F: FnMut(FolderWork),
{
    tracing::debug!(root = %root.display(), "Walk starting");

    let mut outcome = WalkOutcome::default();

    for entry_result in walkdir::WalkDir::new(root).follow_links(false) {
        let entry = match entry_result {
            Ok(e) => e,
            Err(e) => {
                let path_str = e
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "<unknown>".to_string());
                push_warning(
                    &mut outcome.warnings,
                    format!("Cannot access '{path_str}': {e}"),
                );
                continue;
            }
        };

        // Files are reached through their parent's listing below. With
        // follow_links off, a symlinked directory reports as a symlink here
        // and is never descended into.
        if !entry.file_type().is_dir() {
            continue;
        }

        outcome.folders_visited += 1;

        let folder = entry.path();
        let file_names = list_file_names(folder, &mut outcome.warnings);

        let eligible = file_names
            .iter()
            .any(|name| classify::candidate(name).is_some());
        if !eligible {
            continue;
        }

        outcome.folders_eligible += 1;
        on_eligible(FolderWork {
            folder: folder.to_path_buf(),
            file_names,
        });
    }

    tracing::debug!(
        folders_visited = outcome.folders_visited,
        folders_eligible = outcome.folders_eligible,
        warnings = outcome.warnings.len(),
        "Walk complete"
    );

    outcome
}

/// List the file names directly inside `folder` (no recursion).
///
/// Directories are omitted. Symlinked files are listed; reading them later
/// follows the link, which is what rotated-log symlink farms need. Non-UTF-8
/// names cannot be classified and are skipped with a warning.
fn list_file_names(folder: &Path, warnings: &mut Vec<String>) -> Vec<String> {
    let entries = match std::fs::read_dir(folder) {
        Ok(entries) => entries,
        Err(e) => {
            push_warning(warnings, format!("Cannot list '{}': {e}", folder.display()));
            return Vec::new();
        }
    };

    let mut names = Vec::new();
    for entry_result in entries {
        let entry = match entry_result {
            Ok(e) => e,
            Err(e) => {
                push_warning(
                    warnings,
                    format!("Cannot read an entry of '{}': {e}", folder.display()),
                );
                continue;
            }
        };

        match entry.file_type() {
            Ok(ft) if ft.is_dir() => continue,
            Ok(_) => {}
            Err(e) => {
                push_warning(
                    warnings,
                    format!("Cannot stat '{}': {e}", entry.path().display()),
                );
                continue;
            }
        }

        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(_) => {
                push_warning(
                    warnings,
                    format!("Skipping '{}': non-UTF-8 filename", entry.path().display()),
                );
            }
        }
    }

    names
}

/// Record a non-fatal walk warning, bounded by `constants::MAX_WARNINGS` so a
/// tree full of unreadable entries cannot grow the summary without limit.
/// Every warning is still logged at debug level.
fn push_warning(warnings: &mut Vec<String>, msg: String) {
    tracing::debug!(warning = %msg, "Walk warning");
    if warnings.len() < constants::MAX_WARNINGS {
        warnings.push(msg);
    } else if warnings.len() == constants::MAX_WARNINGS {
        warnings.push(format!(
            "Further warnings suppressed after the first {}",
            constants::MAX_WARNINGS
        ));
    }
}

// =============================================================================
// Tests
// =============================================================================
