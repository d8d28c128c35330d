//! Internationalization (i18n) module: which locales exist and how a request
//! is matched to one of them.
//!
//! # Architecture
//!
//! - `registry`: the closed set of supported locales and their tag variants
//! - `locale`: validated `Locale` type handed out by the registry
//! - `negotiate`: `Accept-Language` parsing and mapping
//! - `resolve`: precedence between stored preference, cookie and header
//! - `metrics`: counters for routing decisions
//!
//! # Example
//!
//! ```rust
//! use locale_router::i18n::{negotiate_locale, LocaleRegistry};
//!
//! let registry = LocaleRegistry::standard("en").unwrap();
//! let locale = negotiate_locale(&registry, Some("zh-TW,en;q=0.5"));
//! assert_eq!(locale.code(), "zh");
//! ```

mod locale;
mod metrics;
mod negotiate;
mod registry;
mod resolve;

pub use locale::Locale;
pub use metrics::{MetricsReport, RoutingMetrics};
pub use negotiate::{negotiate_locale, parse_accept_language, LanguagePreference};
pub use registry::{LocaleConfig, LocaleError, LocaleRegistry};
pub use resolve::{resolve_locale, LocaleInputs, LocaleSource};
