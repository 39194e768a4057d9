// LogStitch - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.
// Referenced by DevWorkflow Part A Rule 11 (explicit named-constant limits).

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "LogStitch";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Input selection
// =============================================================================

/// Reserved filename prefix for combined output artifacts. Any input file
/// whose name starts with this prefix is excluded from processing, so a run
/// whose output tree overlaps its input tree never re-ingests its own output.
///
/// The check is byte-literal (not case-folded): the artifacts this tool
/// writes are always lower-case.
pub const COMBINED_PREFIX: &str = "combined-";

/// Suffix of plain-text log files accepted as input.
pub const PLAIN_LOG_SUFFIX: &str = ".log";

/// Suffix of xz-compressed log files accepted as input (decompressed
/// transparently during reading).
pub const XZ_SUFFIX: &str = ".xz";

// =============================================================================
// Worker pools
// =============================================================================
//
// Two independent bounded pools: an outer pool running one task per eligible
// directory, and an inner pool (shared across the whole run) running one task
// per candidate file. Keeping the pools separate means a directory full of
// slow files can saturate the file pool without starving other directories'
// folder tasks. Sizes are fixed constants — the tool takes no configuration
// beyond the two directory paths.

/// Number of worker threads in the folder-level pool.
pub const FOLDER_WORKER_THREADS: usize = 4;

/// Number of worker threads in the file-level pool.
pub const FILE_WORKER_THREADS: usize = 8;

// =============================================================================
// Reading limits
// =============================================================================

/// File size (bytes) at or above which a plain log file is read through a
/// memory map instead of a heap buffer.
pub const LARGE_FILE_THRESHOLD: u64 = 100 * 1024 * 1024; // 100 MB

/// Maximum number of non-fatal traversal warnings recorded for a single run.
/// Prevents the warnings Vec from growing without bound when a large tree
/// contains many inaccessible entries; warnings beyond the cap are still
/// logged at debug level but not stored.
pub const MAX_WARNINGS: usize = 1_000;

// =============================================================================
// Logging
// =============================================================================

/// Default log level when neither RUST_LOG nor --debug is supplied.
pub const DEFAULT_LOG_LEVEL: &str = "info";
