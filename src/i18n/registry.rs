//! Locale registry: single source of truth for all supported site locales.
//!
//! The registry is an explicitly constructed value. It is built once at
//! startup (see [`LocaleRegistry::standard`]) and handed to every component
//! that needs to validate or negotiate a locale, instead of being reached
//! through a global.

use crate::i18n::Locale;
use std::collections::HashMap;
use thiserror::Error;

/// Configuration for a supported locale.
#[derive(Debug, Clone)]
pub struct LocaleConfig {
    /// Locale code used in URLs, cookies and storage (e.g., "en", "zh")
    pub code: &'static str,

    /// English name of the locale (e.g., "English", "Chinese")
    pub name: &'static str,

    /// Native name of the locale (e.g., "English", "中文")
    pub native_name: &'static str,

    /// Lower-cased language tags that map onto this locale.
    ///
    /// Matched exactly against client-declared tags before falling back to
    /// the primary subtag.
    pub variants: &'static [&'static str],
}

/// Errors raised when building a registry or validating a locale code.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LocaleError {
    #[error("locale registry must contain at least one locale")]
    Empty,

    #[error("duplicate locale code: '{0}'")]
    DuplicateCode(&'static str),

    #[error("language tag '{tag}' is mapped to both '{first}' and '{second}'")]
    ConflictingVariant {
        tag: &'static str,
        first: &'static str,
        second: &'static str,
    },

    #[error("language tag '{0}' must be lower-case")]
    NotLowercase(&'static str),

    #[error("default locale '{0}' is not a supported locale")]
    UnknownDefault(String),

    #[error("unsupported locale code: '{0}'")]
    Unsupported(String),
}

/// The closed set of locales the site is served in.
#[derive(Debug, Clone)]
pub struct LocaleRegistry {
    locales: Vec<LocaleConfig>,
    default_index: usize,
    /// Lower-cased language tag -> index into `locales`
    variants: HashMap<&'static str, usize>,
}

impl LocaleRegistry {
    /// Build a registry from a list of locales and the code of the default one.
    ///
    /// Fails if the list is empty, a code appears twice, a code or variant tag
    /// is not lower-case, a variant tag is claimed by two locales, or the
    /// default is not in the list.
    pub fn new(locales: Vec<LocaleConfig>, default_code: &str) -> Result<Self, LocaleError> {
        if locales.is_empty() {
            return Err(LocaleError::Empty);
        }

        let mut variants: HashMap<&'static str, usize> = HashMap::new();
        for (index, config) in locales.iter().enumerate() {
            if locales[..index].iter().any(|other| other.code == config.code) {
                return Err(LocaleError::DuplicateCode(config.code));
            }

            // The code itself always maps onto its own locale
            for &tag in std::iter::once(&config.code).chain(config.variants.iter()) {
                // Header tags are lower-cased before lookup
                if tag.chars().any(|c| c.is_ascii_uppercase()) {
                    return Err(LocaleError::NotLowercase(tag));
                }

                match variants.get(tag) {
                    Some(&existing) if existing != index => {
                        return Err(LocaleError::ConflictingVariant {
                            tag,
                            first: locales[existing].code,
                            second: config.code,
                        });
                    }
                    _ => {
                        variants.insert(tag, index);
                    }
                }
            }
        }

        let default_index = locales
            .iter()
            .position(|config| config.code == default_code)
            .ok_or_else(|| LocaleError::UnknownDefault(default_code.to_string()))?;

        Ok(Self {
            locales,
            default_index,
            variants,
        })
    }

    /// The site's four locales with the given default.
    pub fn standard(default_code: &str) -> Result<Self, LocaleError> {
        Self::new(standard_locales(), default_code)
    }

    /// Parse a code into a [`Locale`], returning `None` for anything unsupported.
    ///
    /// Matching is exact: codes are stored lower-case and URL segments,
    /// cookies and storage values must carry them verbatim.
    pub fn parse(&self, code: &str) -> Option<Locale> {
        self.locales
            .iter()
            .find(|config| config.code == code)
            .map(|config| Locale::new(config.code))
    }

    /// Like [`parse`](Self::parse), but reports why the code was rejected.
    pub fn require(&self, code: &str) -> Result<Locale, LocaleError> {
        self.parse(code)
            .ok_or_else(|| LocaleError::Unsupported(code.to_string()))
    }

    /// Check if a code belongs to the supported set.
    pub fn is_supported(&self, code: &str) -> bool {
        self.parse(code).is_some()
    }

    /// The default locale.
    pub fn default_locale(&self) -> Locale {
        Locale::new(self.locales[self.default_index].code)
    }

    /// Look up the locale a lower-cased language tag maps onto.
    pub fn match_variant(&self, tag: &str) -> Option<Locale> {
        self.variants
            .get(tag)
            .map(|&index| Locale::new(self.locales[index].code))
    }

    /// Get the configuration of a supported locale.
    pub fn config(&self, locale: Locale) -> Option<&LocaleConfig> {
        self.locales.iter().find(|config| config.code == locale.code())
    }

    /// All supported locales in registry order.
    pub fn list(&self) -> &[LocaleConfig] {
        &self.locales
    }
}

/// Locales the site ships with.
fn standard_locales() -> Vec<LocaleConfig> {
    vec![
        LocaleConfig {
            code: "en",
            name: "English",
            native_name: "English",
            variants: &[
                "en-us", "en-gb", "en-au", "en-ca", "en-nz", "en-ie", "en-in",
            ],
        },
        LocaleConfig {
            code: "zh",
            name: "Chinese",
            native_name: "中文",
            variants: &[
                "zh-cn", "zh-tw", "zh-hk", "zh-mo", "zh-sg", "zh-hans", "zh-hant",
            ],
        },
        LocaleConfig {
            code: "ja",
            name: "Japanese",
            native_name: "日本語",
            variants: &["ja-jp"],
        },
        LocaleConfig {
            code: "ko",
            name: "Korean",
            native_name: "한국어",
            variants: &["ko-kr", "ko-kp"],
        },
    ]
}
