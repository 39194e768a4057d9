// LogStitch - core/decode.rs
//
// Transparent log-file decoding: plain files are read directly, `.xz` files
// are decompressed in memory. Either way the caller receives the file's full
// text with invalid UTF-8 replaced, so a stray byte never costs a whole file.
//
// Rule 11 compliance:
//   - Transient I/O errors on plain reads are retried with capped backoff.
//   - Plain files past LARGE_FILE_THRESHOLD are memory-mapped rather than
//     buffered twice.
//   - All failures are typed `DecodeError`s; callers log them and skip the
//     file, they never abort the folder.

use crate::util::constants;
use crate::util::error::DecodeError;
use std::io::{self, Read};
use std::path::Path;
use std::time::Duration;

// =============================================================================
// Constants (Rule 11: named bounds)
// =============================================================================

/// Retry limits for transient I/O errors.
const MAX_RETRIES: u32 = 3;
const RETRY_DELAYS_MS: [u64; 3] = [50, 100, 200];

// =============================================================================
// Decoding
// =============================================================================

/// Decode a log file into text.
///
/// Files whose name ends in `.xz` are decompressed via liblzma; everything
/// else is read as-is. Invalid UTF-8 sequences are replaced with U+FFFD
/// rather than failing the file: these are logs, and one bad byte should not
/// discard thousands of good lines.
pub fn decode_file(path: &Path) -> Result<String, DecodeError> {
    let is_xz = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| name.ends_with(constants::XZ_SUFFIX));

    if is_xz {
        decompress_xz(path)
    } else {
        read_plain(path)
    }
}

/// Decompress an `.xz` file fully into memory.
///
/// Corrupt or truncated streams surface from liblzma as I/O errors on
/// `read_to_end` and are reported as `DecodeError::Read`.
fn decompress_xz(path: &Path) -> Result<String, DecodeError> {
    let file = std::fs::File::open(path).map_err(|source| DecodeError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut decoder = xz2::read::XzDecoder::new(file);
    let mut bytes = Vec::new();
    decoder
        .read_to_end(&mut bytes)
        .map_err(|source| DecodeError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Read a plain log file, memory-mapping past the large-file threshold and
/// retrying transient errors below it.
fn read_plain(path: &Path) -> Result<String, DecodeError> {
    let metadata = std::fs::metadata(path).map_err(|source| DecodeError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    if metadata.len() >= constants::LARGE_FILE_THRESHOLD {
        read_large_file(path)
    } else {
        read_small_file_with_retry(path)
    }
}

/// Read using `memmap2` for large files (avoids allocating the full buffer
/// before the UTF-8 pass).
fn read_large_file(path: &Path) -> Result<String, DecodeError> {
    let file = std::fs::File::open(path).map_err(|source| DecodeError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    // SAFETY: the file is read-only and we do not mutate the map.
    // We accept the documented risk that external modification of the file
    // during the map's lifetime could produce undefined behaviour, which is
    // acceptable for a combiner reading already-rotated log files.
    let mmap = unsafe { memmap2::Mmap::map(&file) }.map_err(|source| DecodeError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(String::from_utf8_lossy(&mmap).into_owned())
}

/// Read a small file with transient-error retries.
fn read_small_file_with_retry(path: &Path) -> Result<String, DecodeError> {
    let mut last_err: Option<io::Error> = None;

    for attempt in 0..MAX_RETRIES {
        match std::fs::read(path) {
            Ok(bytes) => return Ok(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) if is_transient_error(&e) => {
                tracing::debug!(
                    file = %path.display(),
                    attempt = attempt + 1,
                    error = %e,
                    "Transient I/O error, retrying"
                );
                std::thread::sleep(Duration::from_millis(RETRY_DELAYS_MS[attempt as usize]));
                last_err = Some(e);
            }
            Err(e) => {
                // Permanent error; do not retry.
                return Err(DecodeError::Read {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        }
    }

    Err(DecodeError::Read {
        path: path.to_path_buf(),
        source: last_err.unwrap_or_else(|| io::Error::other("Unknown read error")),
    })
}

/// Returns true for transient I/O errors that are worth retrying.
fn is_transient_error(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted | io::ErrorKind::TimedOut
    )
}

// =============================================================================
// Tests
// =============================================================================
