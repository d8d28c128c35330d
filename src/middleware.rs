//! Locale routing middleware.
//!
//! Runs before page rendering on every routed request. Paths that already
//! start with a supported locale segment are served as-is; everything else is
//! redirected once to a locale-prefixed path chosen from the cookie, then the
//! language header, then the default. A prefixed path never redirects, so the
//! router cannot loop.

use crate::i18n::{resolve_locale, Locale, LocaleInputs, LocaleRegistry, LocaleSource};
use crate::path;
use crate::preference::{locale_cookie, LOCALE_COOKIE};
use crate::server::AppState;
use axum::{
    extract::{Request, State},
    http::header::ACCEPT_LANGUAGE,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, info};

/// The locale a request is being served in.
///
/// Inserted as a request extension for every request that passes the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestLocale(pub Locale);

/// What the router does with one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Not a page route (API, framework asset, file)
    Bypass,
    /// Already localized; render in this locale
    Serve(Locale),
    /// Redirect to a locale-prefixed location and persist the locale
    Redirect {
        location: String,
        locale: Locale,
        source: LocaleSource,
    },
}

/// Decide how to route a request.
///
/// `cookie` is the `NEXT_LOCALE` value with any surrounding quotes removed.
/// Unsupported values fall through to header negotiation.
pub fn decide(
    registry: &LocaleRegistry,
    path: &str,
    query: Option<&str>,
    cookie: Option<&str>,
    accept_language: Option<&str>,
) -> RouteDecision {
    if path::is_excluded(path) {
        return RouteDecision::Bypass;
    }

    if let Some(locale) = path::locale_of(registry, path) {
        return RouteDecision::Serve(locale);
    }

    let (locale, source) = resolve_locale(
        registry,
        LocaleInputs {
            durable: None,
            cookie,
            accept_language,
        },
    );

    let mut location = locale.prefix_path(path);
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        location.push('?');
        location.push_str(query);
    }

    RouteDecision::Redirect {
        location,
        locale,
        source,
    }
}

/// Axum middleware applying [`decide`] to each request.
pub async fn route_locale(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let cookie = jar.get(LOCALE_COOKIE).map(|c| c.value_trimmed().to_string());
    let accept_language = request
        .headers()
        .get(ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok());

    let decision = decide(
        &state.registry,
        request.uri().path(),
        request.uri().query(),
        cookie.as_deref(),
        accept_language,
    );

    match decision {
        RouteDecision::Bypass => next.run(request).await,
        RouteDecision::Serve(locale) => {
            debug!("Serving {} in '{}'", request.uri().path(), locale);
            state.metrics.record_passthrough();
            request.extensions_mut().insert(RequestLocale(locale));
            next.run(request).await
        }
        RouteDecision::Redirect {
            location,
            locale,
            source,
        } => {
            if let Some(raw) = cookie.as_deref().filter(|raw| !state.registry.is_supported(raw)) {
                debug!("Ignoring unsupported {} cookie '{}'", LOCALE_COOKIE, raw);
                state.metrics.record_invalid_cookie();
            }

            info!(
                "Redirecting {} -> {} (locale '{}' from {:?})",
                request.uri(),
                location,
                locale,
                source
            );
            state.metrics.record_redirect(source);

            (jar.add(locale_cookie(locale)), Redirect::temporary(&location)).into_response()
        }
    }
}
