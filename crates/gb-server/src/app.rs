//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;
use crate::static_files;

/// Create the application router.
///
/// # Arguments
///
/// * `state` - Shared application state
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    let page_routes = Router::new()
        .route("/", get(handlers::home::home))
        .route(
            "/login",
            get(handlers::login::login_form).post(handlers::login::login_submit),
        )
        .route("/guides", get(handlers::guides::list))
        .route("/guides/{guide_slug}", get(handlers::guides::guide))
        .route("/guides/{guide_slug}/{part_slug}", get(handlers::guides::part));

    Router::new()
        .merge(page_routes)
        .merge(static_files::static_router(&state.static_dir))
        .fallback(handlers::fallback)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::new())
                .layer(security::csp_layer())
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer()),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use axum::body::{Body, to_bytes};
    use axum::http::{HeaderMap, Request, StatusCode, header};
    use axum::response::Response;
    use gb_site::{MockStorage, Site};
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    use super::*;
    use crate::session::{CookieSettings, SessionData, SessionKey, decode, encode};

    const SECRET: &str = "test-secret-test-secret";

    const RUST: &str = r#"
title = "Rust Basics"
slug = "rust"
description = "Learn Rust."

[[chapters]]
title = "Start"
slug = "start"

[[chapter_parts]]
title = "Install"
slug = "install"
chapter = "Start"

[[chapter_parts]]
title = "Hello"
slug = "hello"
chapter = "Start"
"#;

    fn storage() -> MockStorage {
        MockStorage::new()
            .with_guide("rust", RUST)
            .with_guide("empty", "title = \"Empty\"")
            .with_guide("broken", "title = ")
            .with_markdown("rust", "install", "# Install\n\n## Linux\n\nRun `rustup`.")
            .with_html("rust", "hello", "<p>Hello, <em>world</em></p>")
            .with_not_found("# Lost\n\nNothing here.")
    }

    fn router_with(storage: MockStorage, static_dir: PathBuf) -> Router {
        let cookies = CookieSettings {
            key: SessionKey::new(SECRET),
            name: "session".to_owned(),
            secure: false,
        };
        let state = AppState::new(Site::new(Arc::new(storage)), cookies, static_dir).unwrap();
        create_router(Arc::new(state))
    }

    fn router() -> Router {
        router_with(storage(), PathBuf::from("/nonexistent"))
    }

    fn session_cookie(data: &SessionData) -> String {
        format!("session={}", encode(data, &SessionKey::new(SECRET)).unwrap())
    }

    async fn get(router: Router, uri: &str, cookie: Option<&str>) -> Response {
        let mut request = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        router
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn post_login(router: Router, body: &str, cookie: Option<&str>) -> Response {
        let mut request = Request::builder()
            .method("POST")
            .uri("/login")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        router
            .oneshot(request.body(Body::from(body.to_owned())).unwrap())
            .await
            .unwrap()
    }

    /// Response body, with escaped slashes decoded so assertions read naturally.
    async fn body(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec())
            .unwrap()
            .replace("&#x2f;", "/")
    }

    fn location(headers: &HeaderMap) -> &str {
        headers.get(header::LOCATION).unwrap().to_str().unwrap()
    }

    /// Decoded session from the response's `Set-Cookie`, if any.
    fn set_session(headers: &HeaderMap) -> Option<SessionData> {
        let cookie = headers.get(header::SET_COOKIE)?.to_str().ok()?;
        let value = cookie.strip_prefix("session=")?.split(';').next()?;
        decode(value, &SessionKey::new(SECRET))
    }

    #[tokio::test]
    async fn test_home() {
        let response = get(router(), "/", None).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        assert_eq!(
            response.headers().get("x-frame-options").unwrap(),
            "DENY"
        );
        assert!(body(response).await.contains("Welcome to Guidebook"));
    }

    #[tokio::test]
    async fn test_home_consumes_flashes() {
        let data = SessionData {
            authenticated: true,
            flashes: vec!["You have been logged in successfully.".to_owned()],
            csrf: None,
        };
        let response = get(router(), "/", Some(&session_cookie(&data))).await;

        let session = set_session(response.headers()).unwrap();
        assert!(session.authenticated);
        assert!(session.flashes.is_empty());

        let html = body(response).await;
        assert!(html.contains(r#"<div class="flash">You have been logged in successfully.</div>"#));
    }

    #[tokio::test]
    async fn test_login_form_sets_csrf() {
        let response = get(router(), "/login", None).await;

        assert_eq!(response.status(), StatusCode::OK);
        let token = set_session(response.headers()).unwrap().csrf.unwrap();
        let html = body(response).await;
        assert!(html.contains(&format!(r#"name="CSRF" value="{token}""#)));
    }

    #[tokio::test]
    async fn test_login_form_redirects_when_authenticated() {
        let data = SessionData {
            authenticated: true,
            ..SessionData::default()
        };
        let response = get(router(), "/login", Some(&session_cookie(&data))).await;

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(response.headers()), "/");
    }

    #[tokio::test]
    async fn test_login_submit() {
        let data = SessionData {
            csrf: Some("tok".to_owned()),
            ..SessionData::default()
        };
        let response = post_login(
            router(),
            "email=a%40example.com&password=pw&CSRF=tok",
            Some(&session_cookie(&data)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(response.headers()), "/");

        let cookie = response.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));

        let session = set_session(response.headers()).unwrap();
        assert!(session.authenticated);
        assert_eq!(session.flashes, vec!["You have been logged in successfully."]);
        assert_eq!(session.csrf, None);
    }

    #[tokio::test]
    async fn test_login_submit_validation_errors() {
        let data = SessionData {
            csrf: Some("tok".to_owned()),
            ..SessionData::default()
        };
        let response = post_login(
            router(),
            "email=a%40example.com&password=&CSRF=tok",
            Some(&session_cookie(&data)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = body(response).await;
        assert!(html.contains("Please enter a password."));
        assert!(!html.contains("Please enter an email."));
        assert!(html.contains(r#"value="a@example.com""#));
    }

    #[tokio::test]
    async fn test_login_submit_rejects_bad_csrf() {
        let data = SessionData {
            csrf: Some("tok".to_owned()),
            ..SessionData::default()
        };
        let cookie = session_cookie(&data);

        let response = post_login(router(), "email=a&password=b&CSRF=other", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = post_login(router(), "email=a&password=b", None).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_tampered_cookie_is_a_fresh_session() {
        let response = get(router(), "/login", Some("session=forged.value")).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_guides_list() {
        let response = get(router(), "/guides", None).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = body(response).await;
        assert!(html.contains(r#"<a href="/guides/rust">Rust Basics</a>"#));
        assert!(html.contains("Learn Rust."));
        assert!(html.contains("2 guides"));
    }

    #[tokio::test]
    async fn test_guide_redirects_to_first_part() {
        let response = get(router(), "/guides/rust", None).await;

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(response.headers()), "/guides/rust/install");
    }

    #[tokio::test]
    async fn test_guide_without_parts_or_unknown() {
        let response = get(router(), "/guides/empty", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body(response).await.contains("Lost"));

        let response = get(router(), "/guides/missing", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_broken_guide_is_server_error() {
        let response = get(router(), "/guides/broken/intro", None).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_guide_part() {
        let response = get(router(), "/guides/rust/install", None).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = body(response).await;
        assert!(html.contains(r#"<h2 id="linux">Linux</h2>"#));
        assert!(html.contains(r##"<a href="#linux">Linux</a>"##));
        assert!(html.contains(r#"<a href="/guides/rust/install" class="active" aria-current="page">Install</a>"#));
        assert!(html.contains(r#"<a class="next" href="/guides/rust/hello">"#));
        assert!(!html.contains(r#"class="prev""#));
    }

    #[tokio::test]
    async fn test_guide_html_part() {
        let response = get(router(), "/guides/rust/hello", None).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = body(response).await;
        assert!(html.contains("<p>Hello, <em>world</em></p>"));
        assert!(html.contains(r#"<a class="prev" href="/guides/rust/install">"#));
    }

    #[tokio::test]
    async fn test_guide_unknown_part() {
        let response = get(router(), "/guides/rust/missing", None).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let html = body(response).await;
        assert!(html.contains("<h2>Not Found</h2>"));
        assert!(html.contains("Lost"));
        assert!(html.contains(r#"<a href="/guides/rust/install">Install</a>"#));
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let response = get(router(), "/nope", None).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body(response).await.contains("Nothing here."));
    }

    fn static_fixture() -> (tempfile::TempDir, Router) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("css")).unwrap();
        std::fs::write(dir.path().join("css/style.css"), "body {}").unwrap();
        let router = router_with(storage(), dir.path().to_path_buf());
        (dir, router)
    }

    #[tokio::test]
    async fn test_static_files() {
        let (_dir, router) = static_fixture();

        let response = get(router.clone(), "/static/css/style.css", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(header::CONTENT_TYPE).unwrap(), "text/css");
        assert!(response.headers().get(header::LAST_MODIFIED).is_some());
        assert_eq!(
            response.headers().get("x-content-type-options").unwrap(),
            "nosniff"
        );
        assert_eq!(body(response).await, "body {}");

        let response = get(router.clone(), "/static/css/missing.css", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = get(router, "/static/../Cargo.toml", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_static_files_range() {
        let (_dir, router) = static_fixture();

        let request = Request::builder()
            .uri("/static/css/style.css")
            .header(header::RANGE, "bytes=0-3")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(
            response.headers().get(header::CONTENT_RANGE).unwrap(),
            "bytes 0-3/7"
        );
        assert_eq!(body(response).await, "body");
    }
}
