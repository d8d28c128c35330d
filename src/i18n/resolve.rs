//! Locale resolution precedence.
//!
//! Resolution order (highest to lowest priority):
//! 1. Durable client store preference (if valid)
//! 2. Locale cookie (if valid)
//! 3. Browser-declared language header
//! 4. Registry default
//!
//! Invalid values at any tier are treated as absent.

use crate::i18n::{negotiate_locale, Locale, LocaleRegistry};

/// Which tier produced a resolved locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocaleSource {
    DurableStore,
    Cookie,
    /// Header negotiation, including its fallback to the default
    Header,
}

/// The three optional inputs to resolution.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocaleInputs<'a> {
    pub durable: Option<&'a str>,
    pub cookie: Option<&'a str>,
    pub accept_language: Option<&'a str>,
}

/// Resolve one definite locale from the available inputs.
///
/// # Example
///
/// ```
/// use locale_router::i18n::{resolve_locale, LocaleInputs, LocaleRegistry, LocaleSource};
///
/// let registry = LocaleRegistry::standard("en").unwrap();
/// let (locale, source) = resolve_locale(
///     &registry,
///     LocaleInputs {
///         durable: Some("bogus"),
///         cookie: Some("ja"),
///         accept_language: Some("ko"),
///     },
/// );
/// assert_eq!(locale.code(), "ja");
/// assert_eq!(source, LocaleSource::Cookie);
/// ```
pub fn resolve_locale(registry: &LocaleRegistry, inputs: LocaleInputs<'_>) -> (Locale, LocaleSource) {
    if let Some(locale) = inputs.durable.and_then(|code| registry.parse(code)) {
        return (locale, LocaleSource::DurableStore);
    }

    if let Some(locale) = inputs.cookie.and_then(|code| registry.parse(code)) {
        return (locale, LocaleSource::Cookie);
    }

    (
        negotiate_locale(registry, inputs.accept_language),
        LocaleSource::Header,
    )
}
