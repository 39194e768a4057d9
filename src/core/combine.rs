// LogStitch - core/combine.rs
//
// Per-folder aggregation: decode every qualifying file in one folder on the
// shared file pool, bucket the decoded text by category, and write one
// combined artifact per non-empty bucket under the mirrored output folder.
//
// Failure containment:
//   - An unreadable file is logged and skipped; its category still combines.
//   - A failed artifact write is logged and counted; other buckets still write.
//   - Nothing here aborts the run; only the `FolderReport` leaves this module.

use crate::core::classify;
use crate::core::decode;
use crate::core::model::{CandidateFile, Category, FolderReport};
use crate::util::error::CombineError;
use std::collections::BTreeMap;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::mpsc;

/// Combine one folder's qualifying log files into per-category artifacts.
///
/// `file_names` is the folder's listing as seen by the walker; candidate
/// filtering is re-applied here so the walker and the aggregator can never
/// disagree about what qualifies. Candidates are decoded concurrently on
/// `file_pool` (shared across all folder tasks), so the order in which two
/// files of the same category land in an artifact follows decode completion
/// and may differ between runs. Artifacts are truncated on create: rerunning
/// over the same tree replaces previous output rather than appending to it.
///
/// The output folder mirrors `folder`'s position relative to `root` and is
/// created as soon as the folder has candidates, even if every decode
/// subsequently fails.
pub fn combine_folder(
    folder: &Path,
    file_names: &[String],
    root: &Path,
    output_root: &Path,
    file_pool: &rayon::ThreadPool,
) -> FolderReport {
    let candidates: Vec<CandidateFile> = file_names
        .iter()
        .filter_map(|name| {
            classify::candidate(name).map(|category| CandidateFile {
                path: folder.join(name),
                category,
            })
        })
        .collect();

    let mut report = FolderReport::empty(folder.to_path_buf());
    report.candidates = candidates.len();

    if candidates.is_empty() {
        tracing::debug!(folder = %folder.display(), "No qualifying log files");
        return report;
    }

    tracing::debug!(
        folder = %folder.display(),
        candidates = candidates.len(),
        "Combining folder"
    );

    // Decode candidates on the shared pool. Successes come back over the
    // channel; failures are logged in-task and never arrive, so the bucket
    // totals below double as the success count.
    let (tx, rx) = mpsc::channel();
    file_pool.scope(|scope| {
        for candidate in &candidates {
            let tx = tx.clone();
            scope.spawn(move |_| match decode::decode_file(&candidate.path) {
                Ok(text) => {
                    // The receiver outlives the scope; a send failure is
                    // unreachable but must not panic a worker.
                    let _ = tx.send((candidate.category, text));
                }
                Err(e) => {
                    tracing::warn!(
                        file = %candidate.path.display(),
                        error = %e,
                        "Skipping unreadable log file"
                    );
                }
            });
        }
    });
    drop(tx);

    // Bucket in completion order. The scope above has already joined every
    // decode task, so this drains without blocking.
    let mut buckets: BTreeMap<Category, Vec<String>> = BTreeMap::new();
    for (category, text) in rx {
        buckets.entry(category).or_default().push(text);
    }

    report.files_merged = buckets.values().map(Vec::len).sum();
    report.files_failed = report.candidates - report.files_merged;

    // Mirror the folder's position under the output root.
    let relative = match folder.strip_prefix(root) {
        Ok(rel) => rel,
        Err(_) => {
            let e = CombineError::OutsideRoot {
                folder: folder.to_path_buf(),
                root: root.to_path_buf(),
            };
            tracing::warn!(error = %e, "Cannot mirror folder");
            report.artifacts_failed = buckets.len();
            return report;
        }
    };

    let out_dir = output_root.join(relative);
    if let Err(source) = std::fs::create_dir_all(&out_dir) {
        let e = CombineError::CreateOutputDir {
            path: out_dir.clone(),
            source,
        };
        tracing::warn!(error = %e, "Cannot create output folder");
        report.artifacts_failed = buckets.len();
        return report;
    }

    for (category, texts) in &buckets {
        let artifact = out_dir.join(category.artifact_file_name());
        match write_artifact(&artifact, texts) {
            Ok(bytes) => {
                report.artifacts_written += 1;
                tracing::info!(
                    artifact = %artifact.display(),
                    files = texts.len(),
                    bytes,
                    "Created combined log"
                );
            }
            Err(e) => {
                report.artifacts_failed += 1;
                tracing::warn!(error = %e, "Cannot write combined log");
            }
        }
    }

    report
}

/// Write one combined artifact: the decoded file contents joined by a single
/// newline, with no trailing separator. Returns the bytes written.
fn write_artifact(path: &Path, contents: &[String]) -> Result<u64, CombineError> {
    let file = std::fs::File::create(path).map_err(|source| CombineError::WriteArtifact {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);

    let mut bytes: u64 = 0;
    for (idx, text) in contents.iter().enumerate() {
        if idx > 0 {
            writer
                .write_all(b"\n")
                .map_err(|source| CombineError::WriteArtifact {
                    path: path.to_path_buf(),
                    source,
                })?;
            bytes += 1;
        }
        writer
            .write_all(text.as_bytes())
            .map_err(|source| CombineError::WriteArtifact {
                path: path.to_path_buf(),
                source,
            })?;
        bytes += text.len() as u64;
    }

    writer.flush().map_err(|source| CombineError::WriteArtifact {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(bytes)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn make_pool() -> rayon::ThreadPool {
        rayon::ThreadPoolBuilder::new()
            .num_threads(2)
            .build()
            .unwrap()
    }

    fn write_xz(path: &Path, content: &str) {
        let file = std::fs::File::create(path).unwrap();
        let mut encoder = xz2::write::XzEncoder::new(file, 6);
        encoder.write_all(content.as_bytes()).unwrap();
        encoder.finish().unwrap();
    }

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_combines_files_by_category() {
        let root = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("access1.log"), "alpha").unwrap();
        std::fs::write(root.path().join("access2.log"), "beta").unwrap();
        write_xz(&root.path().join("error.log.xz"), "gamma");

        let report = combine_folder(
            root.path(),
            &names(&["access1.log", "access2.log", "error.log.xz"]),
            root.path(),
            out.path(),
            &make_pool(),
        );

        assert_eq!(report.candidates, 3);
        assert_eq!(report.files_merged, 3);
        assert_eq!(report.files_failed, 0);
        assert_eq!(report.artifacts_written, 2);
        assert_eq!(report.artifacts_failed, 0);

        // Within-category order follows decode completion, so accept either.
        let access = std::fs::read_to_string(out.path().join("combined-access.log")).unwrap();
        assert!(access == "alpha\nbeta" || access == "beta\nalpha", "{access:?}");

        let error = std::fs::read_to_string(out.path().join("combined-error.log")).unwrap();
        assert_eq!(error, "gamma");
    }

    #[test]
    fn test_no_candidates_creates_no_output() {
        let root = tempfile::tempdir().unwrap();
        let out_parent = tempfile::tempdir().unwrap();
        let out = out_parent.path().join("combined");
        std::fs::write(root.path().join("notes.txt"), "not a log").unwrap();
        std::fs::write(root.path().join("app.log"), "wrong name").unwrap();

        let report = combine_folder(
            root.path(),
            &names(&["notes.txt", "app.log"]),
            root.path(),
            &out,
            &make_pool(),
        );

        assert_eq!(report.candidates, 0);
        assert!(!out.exists());
    }

    #[test]
    fn test_rerun_truncates_previous_artifact() {
        let root = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("ssl.log"), "fresh").unwrap();
        std::fs::write(
            out.path().join("combined-ssl.log"),
            "stale content from an earlier, much longer run",
        )
        .unwrap();

        combine_folder(
            root.path(),
            &names(&["ssl.log"]),
            root.path(),
            out.path(),
            &make_pool(),
        );

        let artifact = std::fs::read_to_string(out.path().join("combined-ssl.log")).unwrap();
        assert_eq!(artifact, "fresh");
    }

    #[test]
    fn test_prior_artifacts_excluded_when_output_is_root() {
        // Combining in place must not feed an earlier run's artifact back in.
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("access.log"), "current").unwrap();
        std::fs::write(root.path().join("combined-access.log"), "previous run").unwrap();

        let report = combine_folder(
            root.path(),
            &names(&["access.log", "combined-access.log"]),
            root.path(),
            root.path(),
            &make_pool(),
        );

        assert_eq!(report.candidates, 1);
        let artifact = std::fs::read_to_string(root.path().join("combined-access.log")).unwrap();
        assert_eq!(artifact, "current");
    }

    #[test]
    fn test_unreadable_file_does_not_block_siblings() {
        let root = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("access.log"), "good").unwrap();
        // Not an xz stream at all; the decoder will reject it.
        std::fs::write(root.path().join("error.log.xz"), "corrupt").unwrap();

        let report = combine_folder(
            root.path(),
            &names(&["access.log", "error.log.xz"]),
            root.path(),
            out.path(),
            &make_pool(),
        );

        assert_eq!(report.candidates, 2);
        assert_eq!(report.files_merged, 1);
        assert_eq!(report.files_failed, 1);
        assert_eq!(report.artifacts_written, 1);

        let access = std::fs::read_to_string(out.path().join("combined-access.log")).unwrap();
        assert_eq!(access, "good");
        assert!(!out.path().join("combined-error.log").exists());
    }

    #[test]
    fn test_output_dir_created_even_when_every_decode_fails() {
        let root = tempfile::tempdir().unwrap();
        let out_parent = tempfile::tempdir().unwrap();
        let out = out_parent.path().join("combined");
        std::fs::write(root.path().join("ssl.log.xz"), "not xz").unwrap();

        let report = combine_folder(
            root.path(),
            &names(&["ssl.log.xz"]),
            root.path(),
            &out,
            &make_pool(),
        );

        assert_eq!(report.candidates, 1);
        assert_eq!(report.files_failed, 1);
        assert_eq!(report.artifacts_written, 0);
        assert!(out.exists());
    }

    #[test]
    fn test_nested_folder_mirrors_relative_path() {
        let root = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let nested = root.path().join("site1").join("2024");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("ssl_access.log"), "nested").unwrap();

        let report = combine_folder(
            &nested,
            &names(&["ssl_access.log"]),
            root.path(),
            out.path(),
            &make_pool(),
        );

        assert_eq!(report.artifacts_written, 1);
        // "ssl_access" contains both tokens; access wins on priority.
        let artifact = out
            .path()
            .join("site1")
            .join("2024")
            .join("combined-access.log");
        assert_eq!(std::fs::read_to_string(artifact).unwrap(), "nested");
    }

    #[test]
    fn test_folder_outside_root_fails_artifacts_only() {
        let root = tempfile::tempdir().unwrap();
        let elsewhere = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        std::fs::write(elsewhere.path().join("error.log"), "stranded").unwrap();

        let report = combine_folder(
            elsewhere.path(),
            &names(&["error.log"]),
            root.path(),
            out.path(),
            &make_pool(),
        );

        assert_eq!(report.files_merged, 1);
        assert_eq!(report.artifacts_written, 0);
        assert_eq!(report.artifacts_failed, 1);
        assert!(!report.folder_failed);
    }
}
