//! Locale resolution for a multi-locale web site.
//!
//! The server side is an axum middleware that redirects unlocalized requests
//! to a locale-prefixed path (see [`middleware`]). The client side is a pair
//! of reconciliation agents that align the rendered locale with the user's
//! persisted preference after mount (see [`reconcile`]).

pub mod config;
pub mod i18n;
pub mod middleware;
pub mod path;
pub mod preference;
pub mod reconcile;
pub mod server;
