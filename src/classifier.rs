//! Recognizes direct catalog references in free-form user input.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::ResourceRef;

/// `spotify:track:<id>`, plus the legacy `spotify:user:<name>:playlist:<id>` form
#[allow(clippy::expect_used)]
static URI_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^spotify:(?:user:[^:\s]+:)?(track|album|playlist|episode|show|artist):([0-9A-Za-z]+)$",
    )
    .expect("URI regex is valid") // Static pattern, safe to panic
});

/// `https://open.spotify.com/track/<id>?si=...`, with optional scheme, locale segment
/// (`intl-de/`) and legacy `user/<name>/` prefix
#[allow(clippy::expect_used)]
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:https?://)?open\.spotify\.com/(?:intl-[A-Za-z]{2}(?:[-_][A-Za-z]{2})?/)?(?:user/[^/\s?#]+/)?(track|album|playlist|episode|show|artist)/([0-9A-Za-z]+)/?(?:[?#]\S*)?$",
    )
    .expect("URL regex is valid") // Static pattern, safe to panic
});

/// Classifies `input` as a reference to one catalog object.
///
/// Returns `None` when the input is not a recognized URI or URL; callers treat it as
/// search text. Never fails, whatever the input.
#[tracing::instrument(level = "trace", skip(input), fields(input_len = input.len()))]
#[must_use]
pub fn classify(input: &str) -> Option<ResourceRef> {
    let input = input.trim();
    let captures = URI_PATTERN
        .captures(input)
        .or_else(|| URL_PATTERN.captures(input))?;

    let reference = ResourceRef::from_kind(&captures[1], &captures[2]);
    if let Some(reference) = &reference {
        tracing::debug!(%reference, "Input classified as direct reference");
    }
    reference
}
