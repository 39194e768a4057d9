// LogStitch - core/classify.rs
//
// Filename classification: which category a log file belongs to, and
// whether it qualifies as input at all. Pure string logic, no I/O.
//
// A file becomes a candidate only when BOTH checks pass:
//   1. `classify` — not a prior output artifact, and the (lower-cased) name
//      contains a category token.
//   2. `has_input_extension` — the name ends in the plain or compressed
//      log suffix.
// `candidate` combines the two and is what the walker pre-filter and the
// folder aggregator both use, so eligibility and candidate construction can
// never disagree.

use crate::core::model::Category;
use crate::util::constants;

/// Classify a file name into a log category.
///
/// Returns `None` for prior output artifacts (reserved `combined-` prefix)
/// and for names containing no category token. Matching is case-insensitive
/// and tests tokens in priority order, so a name containing several tokens
/// (e.g. "access_ssl.log") classifies as the first match.
///
/// Note: this deliberately does NOT check the extension — callers apply
/// `has_input_extension` as a separate, explicit filter.
pub fn classify(file_name: &str) -> Option<Category> {
    if file_name.starts_with(constants::COMBINED_PREFIX) {
        return None;
    }

    let lower = file_name.to_lowercase();
    Category::all()
        .iter()
        .copied()
        .find(|category| lower.contains(category.token()))
}

/// True when the file name carries a recognised input suffix: plain `.log`
/// or compressed `.xz`. The match is exact (not case-folded), consistent
/// with the lower-case artifact names this tool writes; `ACCESS.LOG` is not
/// an input.
pub fn has_input_extension(file_name: &str) -> bool {
    file_name.ends_with(constants::PLAIN_LOG_SUFFIX) || file_name.ends_with(constants::XZ_SUFFIX)
}

/// Both candidate filters combined: returns the category only when the name
/// also carries a recognised input suffix.
pub fn candidate(file_name: &str) -> Option<Category> {
    if !has_input_extension(file_name) {
        return None;
    }
    classify(file_name)
}

// =============================================================================
// Tests
// =============================================================================
