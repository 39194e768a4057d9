// LogStitch - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation (DevWorkflow Part A Rule 2).
// All errors preserve the causal chain for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all LogStitch operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum LogStitchError {
    /// Tree walking failed (startup precondition).
    Walk(WalkError),

    /// A single log file could not be decoded.
    Decode(DecodeError),

    /// Folder combination failed.
    Combine(CombineError),

    /// Merge-run setup failed.
    Merge(MergeError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for LogStitchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Walk(e) => write!(f, "Walk error: {e}"),
            Self::Decode(e) => write!(f, "Decode error: {e}"),
            Self::Combine(e) => write!(f, "Combine error: {e}"),
            Self::Merge(e) => write!(f, "Merge error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for LogStitchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Walk(e) => Some(e),
            Self::Decode(e) => Some(e),
            Self::Combine(e) => Some(e),
            Self::Merge(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Walk errors
// ---------------------------------------------------------------------------

/// Errors related to directory-tree traversal. These are the only fatal
/// failures in the pipeline: they abort the run before any processing.
#[derive(Debug)]
pub enum WalkError {
    /// The root path does not exist or is not accessible.
    RootNotFound { path: PathBuf },

    /// The root path is not a directory.
    NotADirectory { path: PathBuf },

    /// Permission denied accessing the root path.
    PermissionDenied { path: PathBuf, source: io::Error },
}

impl fmt::Display for WalkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RootNotFound { path } => {
                write!(f, "Directory '{}' does not exist", path.display())
            }
            Self::NotADirectory { path } => {
                write!(f, "Path '{}' is not a directory", path.display())
            }
            Self::PermissionDenied { path, source } => {
                write!(
                    f,
                    "Permission denied accessing '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for WalkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::PermissionDenied { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<WalkError> for LogStitchError {
    fn from(e: WalkError) -> Self {
        Self::Walk(e)
    }
}

// ---------------------------------------------------------------------------
// Decode errors
// ---------------------------------------------------------------------------

/// Errors reading a single log file. Always non-fatal: the file contributes
/// nothing to its category and the rest of the folder carries on.
#[derive(Debug)]
pub enum DecodeError {
    /// The file could not be opened.
    Open { path: PathBuf, source: io::Error },

    /// The file could not be read to completion. For `.xz` inputs this
    /// includes corrupt or truncated compressed streams, which liblzma
    /// surfaces as I/O errors.
    Read { path: PathBuf, source: io::Error },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { path, source } => {
                write!(f, "Cannot open '{}': {source}", path.display())
            }
            Self::Read { path, source } => {
                write!(f, "Cannot read '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source),
            Self::Read { source, .. } => Some(source),
        }
    }
}

impl From<DecodeError> for LogStitchError {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}

// ---------------------------------------------------------------------------
// Combine errors
// ---------------------------------------------------------------------------

/// Errors producing a folder's combined artifacts. Non-fatal at the run
/// level: the affected artifact (or folder) is skipped and reported.
#[derive(Debug)]
pub enum CombineError {
    /// The mirrored output directory could not be created.
    CreateOutputDir { path: PathBuf, source: io::Error },

    /// A combined artifact could not be written.
    WriteArtifact { path: PathBuf, source: io::Error },

    /// The source folder is not inside the scan root, so no mirrored output
    /// path can be derived. Indicates a caller bug rather than an I/O fault.
    OutsideRoot { folder: PathBuf, root: PathBuf },
}

impl fmt::Display for CombineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateOutputDir { path, source } => {
                write!(
                    f,
                    "Cannot create output directory '{}': {source}",
                    path.display()
                )
            }
            Self::WriteArtifact { path, source } => {
                write!(f, "Cannot write '{}': {source}", path.display())
            }
            Self::OutsideRoot { folder, root } => {
                write!(
                    f,
                    "Folder '{}' is outside the scan root '{}'",
                    folder.display(),
                    root.display()
                )
            }
        }
    }
}

impl std::error::Error for CombineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::CreateOutputDir { source, .. } => Some(source),
            Self::WriteArtifact { source, .. } => Some(source),
            Self::OutsideRoot { .. } => None,
        }
    }
}

impl From<CombineError> for LogStitchError {
    fn from(e: CombineError) -> Self {
        Self::Combine(e)
    }
}

// ---------------------------------------------------------------------------
// Merge errors
// ---------------------------------------------------------------------------

/// Errors setting up the merge run itself.
#[derive(Debug)]
pub enum MergeError {
    /// A worker pool could not be constructed (thread spawn failure).
    PoolBuild {
        what: &'static str,
        source: rayon::ThreadPoolBuildError,
    },
}

impl fmt::Display for MergeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PoolBuild { what, source } => {
                write!(f, "Cannot build {what}: {source}")
            }
        }
    }
}

impl std::error::Error for MergeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::PoolBuild { source, .. } => Some(source),
        }
    }
}

impl From<MergeError> for LogStitchError {
    fn from(e: MergeError) -> Self {
        Self::Merge(e)
    }
}

/// Convenience type alias for LogStitch results.
pub type Result<T> = std::result::Result<T, LogStitchError>;
