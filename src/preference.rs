//! Persisted locale preference.
//!
//! The user's chosen locale is kept in two places: the browser's durable
//! key-value store (`preferredLanguage`) and the `NEXT_LOCALE` cookie. Either
//! may be missing or stale. When both hold valid values the durable store
//! wins. Failed reads and unsupported values are treated as absent.

use crate::i18n::{Locale, LocaleRegistry};
use axum_extra::extract::cookie::{Cookie, SameSite};
use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;
use tracing::debug;

/// Cookie holding the persisted locale, read by the server router.
pub const LOCALE_COOKIE: &str = "NEXT_LOCALE";

/// Durable client store key holding the persisted locale.
pub const DURABLE_STORE_KEY: &str = "preferredLanguage";

/// One year.
pub const LOCALE_COOKIE_MAX_AGE_SECS: i64 = 31_536_000;

/// Build the locale cookie with its fixed attributes.
///
/// Used by the server on redirects and by client writers, so both sides emit
/// `NEXT_LOCALE=<code>; Path=/; Max-Age=31536000; SameSite=Lax`.
pub fn locale_cookie(locale: Locale) -> Cookie<'static> {
    Cookie::build((LOCALE_COOKIE, locale.code()))
        .path("/")
        .max_age(time::Duration::seconds(LOCALE_COOKIE_MAX_AGE_SECS))
        .same_site(SameSite::Lax)
        .build()
}

/// Where a preference is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceSlot {
    /// Durable client store under [`DURABLE_STORE_KEY`]
    Durable,
    /// The [`LOCALE_COOKIE`] cookie
    Cookie,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{0:?} store is unavailable: {1}")]
    Unavailable(PreferenceSlot, String),

    #[error("failed to write {0:?} store: {1}")]
    WriteFailed(PreferenceSlot, String),
}

/// Raw access to the two preference slots.
///
/// Implementations return what is stored without validation; see
/// [`PersistedPreference`] for the validating view.
pub trait PreferenceStore {
    fn read(&self, slot: PreferenceSlot) -> Result<Option<String>, StoreError>;

    fn write(&self, slot: PreferenceSlot, locale: Locale) -> Result<(), StoreError>;
}

/// Validating view over a [`PreferenceStore`].
pub struct PersistedPreference<'a, S: PreferenceStore + ?Sized> {
    registry: &'a LocaleRegistry,
    store: &'a S,
}

impl<'a, S: PreferenceStore + ?Sized> PersistedPreference<'a, S> {
    pub fn new(registry: &'a LocaleRegistry, store: &'a S) -> Self {
        Self { registry, store }
    }

    /// The durable store preference, if present and supported.
    pub fn durable(&self) -> Option<Locale> {
        self.read_valid(PreferenceSlot::Durable)
    }

    /// The cookie preference, if present and supported.
    pub fn cookie(&self) -> Option<Locale> {
        self.read_valid(PreferenceSlot::Cookie)
    }

    /// The effective preference: durable store first, then cookie.
    pub fn preferred(&self) -> Option<Locale> {
        self.durable().or_else(|| self.cookie())
    }

    /// Write the cookie slot. Failures are logged and swallowed.
    pub fn sync_cookie(&self, locale: Locale) {
        self.write_logged(PreferenceSlot::Cookie, locale);
    }

    /// Persist an explicit choice to both slots.
    pub fn remember(&self, locale: Locale) {
        self.write_logged(PreferenceSlot::Durable, locale);
        self.write_logged(PreferenceSlot::Cookie, locale);
    }

    fn read_valid(&self, slot: PreferenceSlot) -> Option<Locale> {
        let raw = match self.store.read(slot) {
            Ok(raw) => raw?,
            Err(e) => {
                debug!("Treating preference as absent: {}", e);
                return None;
            }
        };

        let locale = self.registry.parse(&raw);
        if locale.is_none() {
            debug!("Ignoring unsupported {:?} preference '{}'", slot, raw);
        }
        locale
    }

    fn write_logged(&self, slot: PreferenceSlot, locale: Locale) {
        if let Err(e) = self.store.write(slot, locale) {
            debug!("Could not persist locale '{}': {}", locale, e);
        }
    }
}

/// In-memory [`PreferenceStore`].
///
/// Stores raw strings so invalid values can be seeded, and keeps every
/// cookie string written so attributes can be inspected.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<HashMap<PreferenceSlot, String>>,
    cookie_writes: Mutex<Vec<String>>,
    durable_unavailable: bool,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose durable slot fails every read and write, as when the
    /// browser denies storage access.
    pub fn without_durable_store() -> Self {
        Self {
            durable_unavailable: true,
            ..Self::default()
        }
    }

    /// Seed a slot with an arbitrary raw value.
    pub fn with_raw(self, slot: PreferenceSlot, value: &str) -> Self {
        if let Ok(mut values) = self.values.lock() {
            values.insert(slot, value.to_string());
        }
        self
    }

    /// Raw value currently held in a slot.
    pub fn raw(&self, slot: PreferenceSlot) -> Option<String> {
        self.values.lock().ok()?.get(&slot).cloned()
    }

    /// Every `Set-Cookie`-style string written so far, oldest first.
    pub fn cookie_writes(&self) -> Vec<String> {
        self.cookie_writes
            .lock()
            .map(|writes| writes.clone())
            .unwrap_or_default()
    }

    fn check_available(&self, slot: PreferenceSlot) -> Result<(), StoreError> {
        if slot == PreferenceSlot::Durable && self.durable_unavailable {
            return Err(StoreError::Unavailable(slot, "access denied".to_string()));
        }
        Ok(())
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn read(&self, slot: PreferenceSlot) -> Result<Option<String>, StoreError> {
        self.check_available(slot)?;
        let values = self
            .values
            .lock()
            .map_err(|e| StoreError::Unavailable(slot, e.to_string()))?;
        Ok(values.get(&slot).cloned())
    }

    fn write(&self, slot: PreferenceSlot, locale: Locale) -> Result<(), StoreError> {
        self.check_available(slot)?;
        self.values
            .lock()
            .map_err(|e| StoreError::WriteFailed(slot, e.to_string()))?
            .insert(slot, locale.code().to_string());

        if slot == PreferenceSlot::Cookie {
            self.cookie_writes
                .lock()
                .map_err(|e| StoreError::WriteFailed(slot, e.to_string()))?
                .push(locale_cookie(locale).to_string());
        }
        Ok(())
    }
}
