//! Locale type: a locale code that has been validated against a registry.

use serde::Serialize;
use std::fmt;

/// A supported locale.
///
/// Values are only handed out by [`LocaleRegistry`](crate::i18n::LocaleRegistry),
/// so holding a `Locale` means the code belongs to the supported set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Locale {
    code: &'static str,
}

impl Locale {
    pub(crate) fn new(code: &'static str) -> Self {
        Self { code }
    }

    /// Get the locale code (e.g., "en", "zh").
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Prefix a site path with this locale's segment.
    ///
    /// The root path maps to `/{code}` without a trailing slash.
    pub fn prefix_path(&self, path: &str) -> String {
        match path {
            "" | "/" => format!("/{}", self.code),
            p if p.starts_with('/') => format!("/{}{}", self.code, p),
            p => format!("/{}/{}", self.code, p),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}
