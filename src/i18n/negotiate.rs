//! Browser language negotiation.
//!
//! Maps a raw `Accept-Language` header onto exactly one supported locale.
//! Entries are tried in descending quality order (header order breaks ties),
//! first as an exact variant match, then by primary subtag. Nothing here can
//! fail: unparseable entries are skipped and the default locale is the floor.

use crate::i18n::{Locale, LocaleRegistry};
use tracing::trace;

/// One entry of a client-declared language preference list.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguagePreference {
    /// Lower-cased language tag (e.g., "zh-tw")
    pub tag: String,
    /// Quality weight in `[0, 1]`, 1.0 when unspecified
    pub quality: f32,
}

/// Parse an `Accept-Language` value into preferences sorted by quality.
///
/// The sort is stable, so entries with equal weight keep header order.
/// Empty entries and entries with an unparseable weight are dropped.
pub fn parse_accept_language(header: &str) -> Vec<LanguagePreference> {
    let mut preferences: Vec<LanguagePreference> = header
        .split(',')
        .filter_map(|entry| {
            let mut parts = entry.split(';').map(str::trim);
            let tag = parts.next()?.to_lowercase();
            if tag.is_empty() {
                return None;
            }

            // Parameter names are case-insensitive (`q=` or `Q=`)
            let weight = parts.find_map(|param| {
                let (name, value) = param.split_once('=')?;
                name.trim().eq_ignore_ascii_case("q").then_some(value)
            });

            let quality = match weight {
                Some(raw) => match raw.trim().parse::<f32>() {
                    Ok(q) if q.is_finite() => q.clamp(0.0, 1.0),
                    _ => {
                        trace!("Skipping language tag '{}' with bad weight '{}'", tag, raw);
                        return None;
                    }
                },
                None => 1.0,
            };

            Some(LanguagePreference { tag, quality })
        })
        .collect();

    preferences.sort_by(|a, b| b.quality.total_cmp(&a.quality));
    preferences
}

/// Pick the supported locale for a client-declared language header.
///
/// Absent or empty headers, and headers with no mappable tag, yield the
/// registry default.
pub fn negotiate_locale(registry: &LocaleRegistry, header: Option<&str>) -> Locale {
    let Some(header) = header.map(str::trim).filter(|h| !h.is_empty()) else {
        return registry.default_locale();
    };

    parse_accept_language(header)
        .iter()
        .find_map(|preference| match_tag(registry, &preference.tag))
        .unwrap_or_else(|| registry.default_locale())
}

fn match_tag(registry: &LocaleRegistry, tag: &str) -> Option<Locale> {
    registry.match_variant(tag).or_else(|| {
        let primary = tag.split('-').next()?;
        registry.match_variant(primary)
    })
}
