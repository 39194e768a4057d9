// LogStitch - app/merge.rs
//
// Run orchestration: the tree walk runs on the calling thread while each
// eligible folder fans out onto a bounded folder pool, and every folder task
// decodes its files on a second, shared file pool.
//
// Architecture:
//   - Two fixed-size rayon pools separate folder-level from file-level work,
//     so a folder full of large archives cannot monopolise folder slots.
//   - `in_place_scope` joins every folder task before the summary is folded,
//     and lets tasks borrow the run's paths instead of cloning them.
//   - Each folder task is wrapped in `catch_unwind`: a panic marks that one
//     folder as failed and the remaining folders carry on.
//   - All per-folder results flow back as `FolderReport` channel messages.

use crate::core::combine;
use crate::core::discovery;
use crate::core::model::{FolderReport, RunSummary};
use crate::util::constants;
use crate::util::error::{MergeError, Result};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::mpsc;
use std::time::Instant;

/// Combine every eligible folder under `root`, mirroring results beneath
/// `output_root`.
///
/// Fatal errors are limited to an invalid root and worker-pool construction;
/// everything after that point is contained per folder or per file and
/// reported through the returned [`RunSummary`].
pub fn run_merge(root: &Path, output_root: &Path) -> Result<RunSummary> {
    discovery::validate_root(root)?;

    let folder_pool = rayon::ThreadPoolBuilder::new()
        .num_threads(constants::FOLDER_WORKER_THREADS)
        .thread_name(|i| format!("folder-{i}"))
        .build()
        .map_err(|source| MergeError::PoolBuild {
            what: "folder pool",
            source,
        })?;

    let file_pool = rayon::ThreadPoolBuilder::new()
        .num_threads(constants::FILE_WORKER_THREADS)
        .thread_name(|i| format!("file-{i}"))
        .build()
        .map_err(|source| MergeError::PoolBuild {
            what: "file pool",
            source,
        })?;
    let file_pool = &file_pool;

    tracing::info!(
        root = %root.display(),
        output = %output_root.display(),
        folder_threads = constants::FOLDER_WORKER_THREADS,
        file_threads = constants::FILE_WORKER_THREADS,
        "Merge starting"
    );

    let start = Instant::now();
    let (tx, rx) = mpsc::channel::<FolderReport>();

    // The walk itself stays on this thread; eligible folders are spawned as
    // scope tasks immediately, so combination overlaps with the walk.
    let walk_outcome = folder_pool.in_place_scope(|scope| {
        discovery::walk_eligible(root, |work| {
            let tx = tx.clone();
            scope.spawn(move |_| {
                let result = panic::catch_unwind(AssertUnwindSafe(|| {
                    combine::combine_folder(
                        &work.folder,
                        &work.file_names,
                        root,
                        output_root,
                        file_pool,
                    )
                }));

                let report = match result {
                    Ok(report) => report,
                    Err(_) => {
                        tracing::error!(
                            folder = %work.folder.display(),
                            "Folder task panicked; remaining folders continue"
                        );
                        FolderReport::failed(work.folder)
                    }
                };

                // The receiver is drained after the scope joins; a send can
                // only fail if the run is already being torn down.
                let _ = tx.send(report);
            });
        })
    });
    drop(tx);

    let mut summary = RunSummary::default();
    for report in rx {
        summary.absorb(&report);
    }

    summary.folders_visited = walk_outcome.folders_visited;
    summary.folders_eligible = walk_outcome.folders_eligible;
    summary.warnings = walk_outcome.warnings;
    summary.duration = start.elapsed();

    tracing::info!(
        folders = summary.folders_eligible,
        files = summary.files_merged,
        artifacts = summary.artifacts_written,
        failures = summary.files_failed + summary.artifacts_failed + summary.folders_failed,
        duration_ms = summary.duration.as_millis() as u64,
        "Merge complete"
    );

    Ok(summary)
}
