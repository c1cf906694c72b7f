use crate::error::{CoreError, Result};
use url::Url;

const DEFAULT_SCHEME_PREFIX: &str = "https://";

/// Normalizes a user-supplied URL into the canonical form used as the
/// idempotence and storage key.
///
/// The input is trimmed and must not contain control characters. A missing
/// `http://`/`https://` prefix is replaced by `https://`, and any other explicit
/// scheme is rejected. The result must parse as a URL with a non-empty host.
///
/// The returned string is the prefixed input, not the re-serialized [`Url`],
/// so `example.com` normalizes to `https://example.com` without a trailing slash.
pub fn normalize_url(input: &str) -> Result<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidUrl("URL cannot be empty".to_string()));
    }
    // Url::parse silently strips tabs and newlines, so reject them up front.
    if trimmed.chars().any(char::is_control) {
        return Err(CoreError::InvalidUrl(
            "URL must not contain control characters".to_string(),
        ));
    }

    let candidate = match explicit_scheme(trimmed) {
        Some(scheme)
            if scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https") =>
        {
            trimmed.to_string()
        }
        Some(scheme) => {
            return Err(CoreError::InvalidUrl(format!(
                "unsupported URL scheme '{}', expected http or https",
                scheme
            )));
        }
        None => format!("{}{}", DEFAULT_SCHEME_PREFIX, trimmed),
    };

    let parsed = Url::parse(&candidate)
        .map_err(|e| CoreError::InvalidUrl(format!("'{}' is not a valid URL: {}", trimmed, e)))?;

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(CoreError::InvalidUrl(format!(
            "URL must have a scheme and a host: '{}'",
            trimmed
        )));
    }

    Ok(candidate)
}

/// Returns the scheme of `input` if it starts with `<scheme>://`.
///
/// Something like `example.com/?next=https://other` has no explicit scheme,
/// because the text before `://` is not a valid scheme name.
fn explicit_scheme(input: &str) -> Option<&str> {
    let (scheme, _) = input.split_once("://")?;
    let mut chars = scheme.chars();
    let first = chars.next()?;

    let valid = first.is_ascii_alphabetic()
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some(scheme)
}
