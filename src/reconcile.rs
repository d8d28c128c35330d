//! Client-side locale reconciliation.
//!
//! The server router cannot see the durable client store, so after a page
//! mounts one of two agents compares the persisted preference with what was
//! rendered and corrects it with a history-replacing navigation:
//!
//! - [`RootRedirect`] runs only on the unprefixed root page.
//! - [`LocaleSync`] runs on every localized page and carries a one-shot
//!   latch so a single mount navigates at most once.
//!
//! Both are driven explicitly by the host's mount hook. Cross-tab writes are
//! not coordinated; the stores converge on the next reload.

use crate::i18n::{Locale, LocaleRegistry};
use crate::path;
use crate::preference::{PersistedPreference, PreferenceSlot, PreferenceStore};
use std::sync::Mutex;
use tracing::{debug, info};

/// Client navigation used by the agents.
pub trait Navigator {
    /// Current path, including any query string.
    fn current_path(&self) -> String;

    /// Navigate to `path`, replacing the current history entry.
    fn replace(&self, path: &str);
}

/// What a reconciliation pass did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Navigated to `to`, using the preference read from `source`
    Navigated { to: String, source: PreferenceSlot },
    /// No valid persisted preference; the server's choice stands
    NoPreference,
    /// The rendered page already matches the preference
    AlreadyCurrent,
    /// This instance already navigated once
    AlreadyReconciled,
}

/// Everything an agent needs from its host page.
#[derive(Clone, Copy)]
pub struct ClientContext<'a> {
    pub registry: &'a LocaleRegistry,
    pub store: &'a dyn PreferenceStore,
    pub navigator: &'a dyn Navigator,
}

impl<'a> ClientContext<'a> {
    fn preference(&self) -> PersistedPreference<'a, dyn PreferenceStore + 'a> {
        PersistedPreference::new(self.registry, self.store)
    }

    fn navigate(&self, locale: Locale, source: PreferenceSlot) -> ReconcileOutcome {
        let current = self.navigator.current_path();
        let target = path::with_locale(self.registry, &current, locale);
        if target == current {
            return ReconcileOutcome::AlreadyCurrent;
        }

        info!("Reconciling locale: {} -> {}", current, target);
        self.navigator.replace(&target);
        ReconcileOutcome::Navigated { to: target, source }
    }
}

/// Agent mounted on the unprefixed root page.
#[derive(Debug, Default)]
pub struct RootRedirect;

impl RootRedirect {
    pub fn new() -> Self {
        Self
    }

    /// Navigate to the persisted locale, durable store first, then cookie.
    ///
    /// A durable preference is copied into the cookie before navigating so
    /// the server agrees on the next request.
    pub fn on_mount(&self, ctx: ClientContext<'_>) -> ReconcileOutcome {
        let prefs = ctx.preference();

        if let Some(locale) = prefs.durable() {
            prefs.sync_cookie(locale);
            return ctx.navigate(locale, PreferenceSlot::Durable);
        }

        if let Some(locale) = prefs.cookie() {
            return ctx.navigate(locale, PreferenceSlot::Cookie);
        }

        debug!("No persisted locale on root page, keeping server default");
        ReconcileOutcome::NoPreference
    }
}

/// Agent mounted on every localized page.
#[derive(Debug)]
pub struct LocaleSync {
    rendered: Locale,
    navigated: bool,
}

impl LocaleSync {
    /// Create the agent for a page rendered in `rendered`.
    pub fn new(rendered: Locale) -> Self {
        Self {
            rendered,
            navigated: false,
        }
    }

    pub fn rendered(&self) -> Locale {
        self.rendered
    }

    /// Move the page to the durable store's locale if it differs from the
    /// rendered one. Navigates at most once per instance.
    pub fn on_mount(&mut self, ctx: ClientContext<'_>) -> ReconcileOutcome {
        if self.navigated {
            return ReconcileOutcome::AlreadyReconciled;
        }

        let prefs = ctx.preference();
        let Some(preferred) = prefs.durable() else {
            return ReconcileOutcome::NoPreference;
        };

        if preferred == self.rendered {
            return ReconcileOutcome::AlreadyCurrent;
        }

        prefs.sync_cookie(preferred);
        let outcome = ctx.navigate(preferred, PreferenceSlot::Durable);
        if matches!(outcome, ReconcileOutcome::Navigated { .. }) {
            self.navigated = true;
        }
        outcome
    }
}

/// Explicit locale selection from a language switcher.
///
/// Persists the choice to both stores and moves the current page to the
/// chosen locale.
pub fn switch_locale(ctx: ClientContext<'_>, locale: Locale) -> ReconcileOutcome {
    ctx.preference().remember(locale);
    ctx.navigate(locale, PreferenceSlot::Durable)
}

/// In-memory [`Navigator`] recording every navigation.
#[derive(Debug)]
pub struct MemoryNavigator {
    current: Mutex<String>,
    history: Mutex<Vec<String>>,
}

impl MemoryNavigator {
    pub fn at(path: &str) -> Self {
        Self {
            current: Mutex::new(path.to_string()),
            history: Mutex::new(Vec::new()),
        }
    }

    /// Paths navigated to, oldest first.
    pub fn navigations(&self) -> Vec<String> {
        self.history
            .lock()
            .map(|history| history.clone())
            .unwrap_or_default()
    }
}

impl Navigator for MemoryNavigator {
    fn current_path(&self) -> String {
        self.current
            .lock()
            .map(|current| current.clone())
            .unwrap_or_default()
    }

    fn replace(&self, path: &str) {
        if let Ok(mut current) = self.current.lock() {
            *current = path.to_string();
        }
        if let Ok(mut history) = self.history.lock() {
            history.push(path.to_string());
        }
    }
}
