//! Stored-name hygiene: sanitisation and collision disambiguation.
//!
//! Names are compared case-sensitively; on a case-insensitive filesystem
//! the caller additionally probes the directory, and the disambiguation
//! loop is bounded either way.

use super::AttachmentError;

/// Longest stored name the manager will produce, leaving headroom under the
/// common 255-byte filesystem limit for path components.
pub const MAX_STORED_NAME_LEN: usize = 200;

/// Name substituted when sanitisation leaves nothing usable.
pub const FALLBACK_NAME: &str = "unnamed_file";

/// Upper bound on collision counters before the manager gives up.
const MAX_COLLISION_SUFFIX: u32 = 10_000;

/// Characters not allowed in stored names on any supported filesystem.
const INVALID_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Normalises a raw file name into a storable one.
///
/// Invalid characters become underscores, surrounding spaces and dots are
/// trimmed, overlong names are truncated preserving the extension, and an
/// empty result falls back to [`FALLBACK_NAME`].
#[must_use]
pub fn sanitize_file_name(raw: &str) -> String {
    let replaced: String = raw
        .chars()
        .map(|ch| if INVALID_CHARS.contains(&ch) { '_' } else { ch })
        .collect();
    let trimmed = replaced.trim_matches(|ch| ch == ' ' || ch == '.');
    if trimmed.is_empty() {
        return FALLBACK_NAME.to_owned();
    }
    if trimmed.len() <= MAX_STORED_NAME_LEN {
        return trimmed.to_owned();
    }

    let (stem, extension) = split_extension(trimmed);
    let budget = MAX_STORED_NAME_LEN.saturating_sub(extension.len());
    let mut truncated: String = String::with_capacity(budget);
    for ch in stem.chars() {
        if truncated.len() + ch.len_utf8() > budget {
            break;
        }
        truncated.push(ch);
    }
    truncated.push_str(extension);
    if truncated.is_empty() {
        FALLBACK_NAME.to_owned()
    } else {
        truncated
    }
}

/// Splits a name into stem and extension, the extension including its dot.
///
/// A leading dot does not start an extension, so `.gitignore` is all stem.
#[must_use]
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(index) if index > 0 => name.split_at(index),
        _ => (name, ""),
    }
}

/// Renders the numbered form of a name, e.g. `report (2).pdf`.
#[must_use]
pub fn numbered(name: &str, n: u32) -> String {
    let (stem, extension) = split_extension(name);
    format!("{stem} ({n}){extension}")
}

/// Finds the first variant of `desired` for which `is_taken` is false.
///
/// The desired name itself is tried first, then `" (n)"` suffixes with n
/// counting from 2. The loop is bounded; exhausting it reports a capacity
/// condition rather than spinning forever.
///
/// # Errors
///
/// Returns [`AttachmentError::CapacityExceeded`] when every variant up to
/// the bound is taken.
pub fn disambiguate(
    desired: &str,
    is_taken: impl Fn(&str) -> bool,
) -> Result<String, AttachmentError> {
    if !is_taken(desired) {
        return Ok(desired.to_owned());
    }
    for n in 2..=MAX_COLLISION_SUFFIX {
        let candidate = numbered(desired, n);
        if !is_taken(&candidate) {
            return Ok(candidate);
        }
    }
    Err(AttachmentError::CapacityExceeded(format!(
        "too many files named {desired}"
    )))
}
