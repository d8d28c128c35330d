//! Integration tests for the locale router
//!
//! These drive the full axum application (middleware, handlers, cookies) and
//! pair it with the client agents to check that server and client decisions
//! converge.

use axum::{
    body::{to_bytes, Body},
    http::{
        header::{ACCEPT_LANGUAGE, CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
        Request, Response, StatusCode,
    },
    Router,
};
use tower::ServiceExt;

use locale_router::i18n::LocaleRegistry;
use locale_router::preference::{MemoryPreferenceStore, PreferenceSlot};
use locale_router::reconcile::{ClientContext, LocaleSync, MemoryNavigator, ReconcileOutcome, RootRedirect};
use locale_router::server::{build_app, AppState};

// ==================== Test Helpers ====================

fn app() -> Router {
    build_app(AppState::new(LocaleRegistry::standard("en").unwrap()))
}

async fn get(app: Router, uri: &str, headers: &[(&str, &str)]) -> Response<Body> {
    let mut builder = Request::get(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap()
}

fn location(response: &Response<Body>) -> &str {
    response.headers().get(LOCATION).unwrap().to_str().unwrap()
}

fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

async fn body_string(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// ==================== Router Tests ====================

#[tokio::test]
async fn test_cookie_redirect_for_every_locale() {
    for code in ["en", "zh", "ja", "ko"] {
        let cookie = format!("NEXT_LOCALE={}", code);
        let response = get(app(), "/papers/42", &[(COOKIE.as_str(), cookie.as_str())]).await;

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&response), format!("/{}/papers/42", code));

        let cookies = set_cookies(&response);
        assert_eq!(cookies.len(), 1);
        assert!(cookies[0].starts_with(&format!("NEXT_LOCALE={}", code)));
        assert!(cookies[0].contains("Max-Age=31536000"));
    }
}

#[tokio::test]
async fn test_header_redirect_sets_cookie_attributes() {
    let response = get(app(), "/", &[(ACCEPT_LANGUAGE.as_str(), "fr;q=0.9,zh-TW;q=0.8")]).await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/zh");

    let cookies = set_cookies(&response);
    assert_eq!(cookies.len(), 1);
    let cookie = &cookies[0];
    assert!(cookie.starts_with("NEXT_LOCALE=zh"));
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Max-Age=31536000"));
}

#[tokio::test]
async fn test_no_header_no_cookie_redirects_to_default() {
    let response = get(app(), "/search?q=llm", &[]).await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/en/search?q=llm");
}

#[tokio::test]
async fn test_garbage_cookie_falls_back_to_header() {
    let response = get(
        app(),
        "/",
        &[
            (COOKIE.as_str(), "NEXT_LOCALE=klingon"),
            (ACCEPT_LANGUAGE.as_str(), "ko-KR,ko;q=0.9"),
        ],
    )
    .await;

    assert_eq!(location(&response), "/ko");
    assert!(set_cookies(&response)[0].starts_with("NEXT_LOCALE=ko"));
}

#[tokio::test]
async fn test_quoted_cookie_value_is_honored() {
    let response = get(
        app(),
        "/x",
        &[
            (COOKIE.as_str(), "NEXT_LOCALE=\"zh\""),
            (ACCEPT_LANGUAGE.as_str(), "ja"),
        ],
    )
    .await;

    assert_eq!(location(&response), "/zh/x");
    assert!(set_cookies(&response)[0].starts_with("NEXT_LOCALE=zh"));
}

#[tokio::test]
async fn test_localized_path_served_without_redirect_or_cookie() {
    let app = app();
    for _ in 0..2 {
        let response = get(
            app.clone(),
            "/ja/papers/1",
            &[(COOKIE.as_str(), "NEXT_LOCALE=ko"), (ACCEPT_LANGUAGE.as_str(), "zh")],
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(set_cookies(&response).is_empty());
        assert!(body_string(response).await.contains("<html lang=\"ja\">"));
    }
}

#[tokio::test]
async fn test_following_redirect_lands_on_served_page() {
    let app = app();
    let first = get(app.clone(), "/about", &[(ACCEPT_LANGUAGE.as_str(), "ja-JP")]).await;
    let target = location(&first).to_string();

    let second = get(app, &target, &[(ACCEPT_LANGUAGE.as_str(), "ja-JP")]).await;
    assert_eq!(second.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_excluded_paths_bypass_router() {
    let response = get(app(), "/api/health", &[]).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookies(&response).is_empty());

    let response = get(app(), "/favicon.ico", &[]).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.headers().get(LOCATION).is_none());
}

// ==================== API Tests ====================

#[tokio::test]
async fn test_list_locales() {
    let response = get(app(), "/api/locales", &[]).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    let locales = json.as_array().unwrap();
    assert_eq!(locales.len(), 4);
    assert_eq!(locales[0]["code"], "en");
    assert_eq!(locales[0]["is_default"], true);
    assert_eq!(locales[1]["native_name"], "中文");
    assert_eq!(locales[1]["is_default"], false);
}

#[tokio::test]
async fn test_select_locale_sets_cookie() {
    let request = Request::post("/api/locale")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"locale":"ja"}"#))
        .unwrap();
    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(set_cookies(&response)[0].starts_with("NEXT_LOCALE=ja"));
}

#[tokio::test]
async fn test_select_unsupported_locale_rejected() {
    let request = Request::post("/api/locale")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"locale":"fr"}"#))
        .unwrap();
    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(set_cookies(&response).is_empty());

    let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(json["error"], "unsupported_locale");
}

#[tokio::test]
async fn test_metrics_count_decisions() {
    let app = app();
    get(app.clone(), "/zh", &[]).await;
    get(app.clone(), "/", &[(COOKIE.as_str(), "NEXT_LOCALE=ko")]).await;
    get(app.clone(), "/", &[(COOKIE.as_str(), "NEXT_LOCALE=bad")]).await;

    let response = get(app, "/api/locale/metrics", &[]).await;
    let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();

    assert_eq!(json["passthroughs"], 1);
    assert_eq!(json["cookie_redirects"], 1);
    assert_eq!(json["header_redirects"], 1);
    assert_eq!(json["invalid_cookies"], 1);
}

// ==================== Server/Client Convergence Tests ====================

#[tokio::test]
async fn test_root_agent_round_trip_with_locale_sync() {
    let registry = LocaleRegistry::standard("en").unwrap();
    let store = MemoryPreferenceStore::new().with_raw(PreferenceSlot::Cookie, "zh");
    let navigator = MemoryNavigator::at("/");
    let ctx = ClientContext {
        registry: &registry,
        store: &store,
        navigator: &navigator,
    };

    let outcome = RootRedirect::new().on_mount(ctx);
    assert!(matches!(outcome, ReconcileOutcome::Navigated { ref to, .. } if to == "/zh"));

    // The server serves the navigated path as-is
    let response = get(app(), "/zh", &[(COOKIE.as_str(), "NEXT_LOCALE=zh")]).await;
    assert_eq!(response.status(), StatusCode::OK);

    // And the localized page's agent has nothing left to do
    let mut sync = LocaleSync::new(registry.parse("zh").unwrap());
    assert_eq!(sync.on_mount(ctx), ReconcileOutcome::NoPreference);
    assert_eq!(navigator.navigations(), vec!["/zh"]);
}

#[tokio::test]
async fn test_durable_preference_overrides_stale_cookie_decision() {
    // Server decided from a stale cookie
    let response = get(app(), "/papers", &[(COOKIE.as_str(), "NEXT_LOCALE=ja")]).await;
    let served = location(&response).to_string();
    assert_eq!(served, "/ja/papers");

    // The client has since chosen Korean
    let registry = LocaleRegistry::standard("en").unwrap();
    let store = MemoryPreferenceStore::new()
        .with_raw(PreferenceSlot::Durable, "ko")
        .with_raw(PreferenceSlot::Cookie, "ja");
    let navigator = MemoryNavigator::at(&served);
    let ctx = ClientContext {
        registry: &registry,
        store: &store,
        navigator: &navigator,
    };

    let mut sync = LocaleSync::new(registry.parse("ja").unwrap());
    sync.on_mount(ctx);
    assert_eq!(navigator.navigations(), vec!["/ko/papers"]);

    // The cookie now agrees, so the server would pick Korean next time
    let cookie = format!("NEXT_LOCALE={}", store.raw(PreferenceSlot::Cookie).unwrap());
    let response = get(app(), "/papers", &[(COOKIE.as_str(), cookie.as_str())]).await;
    assert_eq!(location(&response), "/ko/papers");
}
