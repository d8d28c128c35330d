//! Routing metrics.
//!
//! Counts the decisions taken by the locale router. An instance lives in the
//! application state and is shared by every request.

use crate::i18n::LocaleSource;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct RoutingMetrics {
    /// Requests that already carried a locale segment
    passthroughs: AtomicUsize,

    /// Redirects decided from the locale cookie
    cookie_redirects: AtomicUsize,

    /// Redirects decided from the language header (or the default)
    header_redirects: AtomicUsize,

    /// Cookies present but holding an unsupported value
    invalid_cookies: AtomicUsize,
}

impl RoutingMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a request served under its existing locale segment.
    pub fn record_passthrough(&self) {
        self.passthroughs.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a redirect, attributed to the tier that decided it.
    pub fn record_redirect(&self, source: LocaleSource) {
        let counter = match source {
            LocaleSource::Cookie => &self.cookie_redirects,
            // The server never sees the durable store; count it with headers
            LocaleSource::DurableStore | LocaleSource::Header => &self.header_redirects,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a locale cookie that was ignored.
    pub fn record_invalid_cookie(&self) {
        self.invalid_cookies.fetch_add(1, Ordering::Relaxed);
    }

    pub fn passthroughs(&self) -> usize {
        self.passthroughs.load(Ordering::Relaxed)
    }

    pub fn cookie_redirects(&self) -> usize {
        self.cookie_redirects.load(Ordering::Relaxed)
    }

    pub fn header_redirects(&self) -> usize {
        self.header_redirects.load(Ordering::Relaxed)
    }

    pub fn invalid_cookies(&self) -> usize {
        self.invalid_cookies.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let passthroughs = self.passthroughs();
        let cookie_redirects = self.cookie_redirects();
        let header_redirects = self.header_redirects();
        let redirects = cookie_redirects + header_redirects;
        let total = passthroughs + redirects;

        let redirect_rate = if total > 0 {
            (redirects as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            passthroughs,
            cookie_redirects,
            header_redirects,
            invalid_cookies: self.invalid_cookies(),
            redirect_rate,
        }
    }
}

/// Snapshot of the routing counters.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub passthroughs: usize,
    pub cookie_redirects: usize,
    pub header_redirects: usize,
    pub invalid_cookies: usize,

    /// Share of routed requests that were redirected, as a percentage (0-100)
    pub redirect_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_empty() {
        let report = RoutingMetrics::new().report();
        assert_eq!(report.passthroughs, 0);
        assert_eq!(report.cookie_redirects, 0);
        assert_eq!(report.header_redirects, 0);
        assert_eq!(report.invalid_cookies, 0);
        assert_eq!(report.redirect_rate, 0.0);
    }

    #[test]
    fn test_redirects_attributed_by_source() {
        let metrics = RoutingMetrics::new();
        metrics.record_redirect(LocaleSource::Cookie);
        metrics.record_redirect(LocaleSource::Header);
        metrics.record_redirect(LocaleSource::Header);

        assert_eq!(metrics.cookie_redirects(), 1);
        assert_eq!(metrics.header_redirects(), 2);
    }

    #[test]
    fn test_report_redirect_rate() {
        let metrics = RoutingMetrics::new();

        // 3 passthroughs, 1 redirect = 25% redirect rate
        metrics.record_passthrough();
        metrics.record_passthrough();
        metrics.record_passthrough();
        metrics.record_redirect(LocaleSource::Cookie);
        metrics.record_invalid_cookie();

        let report = metrics.report();
        assert_eq!(report.passthroughs, 3);
        assert_eq!(report.invalid_cookies, 1);
        assert_eq!(report.redirect_rate, 25.0);
    }

    #[test]
    fn test_report_serializes() {
        let metrics = RoutingMetrics::new();
        metrics.record_passthrough();
        let json = serde_json::to_value(metrics.report()).unwrap();
        assert_eq!(json["passthroughs"], 1);
        assert_eq!(json["redirect_rate"], 0.0);
    }
}
