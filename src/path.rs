//! Helpers for the locale segment of site paths.

use crate::i18n::{Locale, LocaleRegistry};
use regex::Regex;
use std::sync::OnceLock;

// API routes, framework assets and anything that looks like a file
static EXCLUDED_PATH_REGEX: OnceLock<Regex> = OnceLock::new();

/// Check whether a request path bypasses locale routing entirely.
pub fn is_excluded(path: &str) -> bool {
    let regex = EXCLUDED_PATH_REGEX
        .get_or_init(|| Regex::new(r"^/(?:api|_next)(?:/|$)|\.[^/]*$").unwrap());
    regex.is_match(path)
}

/// The locale named by the first path segment, if it is a supported code.
pub fn locale_of(registry: &LocaleRegistry, path: &str) -> Option<Locale> {
    let first = path.strip_prefix('/')?.split(['/', '?']).next()?;
    registry.parse(first)
}

/// Replace (or insert) the locale segment of a path, keeping any query string.
///
/// `/en/papers?q=1` with `zh` becomes `/zh/papers?q=1`; `/papers` becomes
/// `/zh/papers`.
pub fn with_locale(registry: &LocaleRegistry, path: &str, locale: Locale) -> String {
    let (path, query) = match path.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (path, None),
    };

    let rest = match locale_of(registry, path) {
        Some(current) => &path[current.code().len() + 1..],
        None => path,
    };

    let mut target = locale.prefix_path(rest);
    if let Some(query) = query {
        target.push('?');
        target.push_str(query);
    }
    target
}
