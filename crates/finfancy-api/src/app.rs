// Router assembly: health, auth and budget routes, Swagger UI, CORS and tracing
// Decision: /health is served both unprefixed (probes) and under API_V1_STR

use axum::http::{header, HeaderValue, Method};
use axum::{extract::State, routing::get, Json, Router};
use finfancy_core::{Authenticator, UserStore};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{self, ErrorResponse, MessageResponse};
use crate::auth::{self, AuthState};
use crate::config::Settings;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// State for the root endpoint
#[derive(Clone)]
struct RootState {
    name: String,
    env: String,
}

#[derive(Serialize)]
struct RootResponse {
    name: String,
    env: String,
}

async fn root(State(state): State<RootState>) -> Json<RootResponse> {
    Json(RootResponse {
        name: state.name,
        env: state.env,
    })
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::routes::register,
        auth::routes::login,
        auth::routes::logout,
        auth::routes::get_current_user,
        api::budget::get_budget_limit,
        api::budget::update_budget_limit,
    ),
    components(
        schemas(
            ErrorResponse,
            MessageResponse,
            auth::routes::RegisterRequest,
            auth::routes::LoginRequest,
            auth::routes::UserInfoResponse,
            api::budget::BudgetLimit,
        )
    ),
    tags(
        (name = "auth", description = "Registration, login and session endpoints"),
        (name = "budget", description = "Budget limit endpoints")
    ),
    info(
        title = "FinFancy API",
        version = "0.1.0",
        description = "Personal finance backend: accounts, sessions and budget limits",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
pub struct ApiDoc;

/// OpenAPI document with every path mounted under `api_prefix`
pub fn openapi_doc(api_prefix: &str) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    if !api_prefix.is_empty() {
        doc.paths.paths = std::mem::take(&mut doc.paths.paths)
            .into_iter()
            .map(|(path, item)| (format!("{}{}", api_prefix, path), item))
            .collect();
    }
    doc
}

/// Build the complete application router
pub fn build_app(
    settings: &Settings,
    authenticator: Arc<Authenticator>,
    users: Arc<dyn UserStore>,
) -> Router {
    let auth_state = AuthState::new(settings.auth.clone(), authenticator);
    let budget_state = api::budget::BudgetState {
        users,
        auth: auth_state.clone(),
    };
    let root_state = RootState {
        name: settings.app_name.clone(),
        env: settings.auth.environment.as_str().to_string(),
    };

    let mut api_routes = Router::new()
        .merge(auth::routes::routes(auth_state))
        .merge(api::budget::routes(budget_state));
    if !settings.api_prefix.is_empty() {
        api_routes = api_routes.route("/health", get(health));
    }

    let app = Router::new()
        .route("/", get(root).with_state(root_state))
        .route("/health", get(health))
        .merge(build_router_with_prefix(api_routes, &settings.api_prefix))
        .merge(SwaggerUi::new("/swagger-ui").url(
            "/api-doc/openapi.json",
            openapi_doc(&settings.api_prefix),
        ));

    // Example: ALLOWED_ORIGINS="https://app.example.com,https://admin.example.com"
    let cors_origins: Vec<HeaderValue> = settings
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let app = if cors_origins.is_empty() {
        tracing::info!("CORS not configured (same-origin requests only)");
        app
    } else {
        tracing::info!(origins = ?cors_origins, "CORS origins configured");
        app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(cors_origins))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN])
                .allow_credentials(true),
        )
    };

    app.layer(TraceLayer::new_for_http())
}

/// Build router with optional API prefix
fn build_router_with_prefix<S: Clone + Send + Sync + 'static>(
    api_routes: Router<S>,
    api_prefix: &str,
) -> Router<S> {
    if api_prefix.is_empty() {
        api_routes
    } else {
        Router::new().nest(api_prefix, api_routes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, Response, StatusCode},
    };
    use chrono::{Duration, Utc};
    use finfancy_core::{
        InMemorySessionStore, InMemoryUserStore, Session, SessionStore, SessionToken,
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct TestApp {
        router: Router,
        users: InMemoryUserStore,
        sessions: InMemorySessionStore,
    }

    fn test_app_with(settings: Settings) -> TestApp {
        let users = InMemoryUserStore::new();
        let sessions = InMemorySessionStore::new();
        let authenticator = Arc::new(Authenticator::new(
            Arc::new(users.clone()),
            Arc::new(sessions.clone()),
            settings.auth.session_lifetime,
        ));
        let router = build_app(&settings, authenticator, Arc::new(users.clone()));
        TestApp {
            router,
            users,
            sessions,
        }
    }

    fn test_app() -> TestApp {
        test_app_with(Settings::default())
    }

    fn json_request(method: &str, uri: &str, body: Value, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn empty_request(method: &str, uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_json(response: Response<Body>) -> Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    fn set_cookie(response: &Response<Body>) -> String {
        response
            .headers()
            .get(header::SET_COOKIE)
            .expect("missing set-cookie")
            .to_str()
            .unwrap()
            .to_string()
    }

    /// "session_id=abc; HttpOnly; ..." -> "session_id=abc"
    fn cookie_pair(set_cookie: &str) -> String {
        set_cookie.split(';').next().unwrap().trim().to_string()
    }

    async fn register(app: &TestApp, email: &str, password: &str) -> Response<Body> {
        app.router
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/auth/register",
                json!({
                    "email": email,
                    "password": password,
                    "first_name": "Ada",
                    "last_name": "Lovelace"
                }),
                None,
            ))
            .await
            .unwrap()
    }

    async fn login(app: &TestApp, email: &str, password: &str) -> Response<Body> {
        app.router
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/auth/login",
                json!({ "email": email, "password": password }),
                None,
            ))
            .await
            .unwrap()
    }

    /// Register and log in, returning the cookie pair to send back
    async fn logged_in(app: &TestApp, email: &str) -> String {
        assert_eq!(
            register(app, email, "password123").await.status(),
            StatusCode::CREATED
        );
        let response = login(app, email, "password123").await;
        assert_eq!(response.status(), StatusCode::OK);
        cookie_pair(&set_cookie(&response))
    }

    async fn get(app: &TestApp, uri: &str, cookie: Option<&str>) -> Response<Body> {
        app.router
            .clone()
            .oneshot(empty_request("GET", uri, cookie))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_prefixed_and_unprefixed() {
        let app = test_app();

        for uri in ["/health", "/api/v1/health"] {
            let response = get(&app, uri, None).await;
            assert_eq!(response.status(), StatusCode::OK, "uri {}", uri);
            let body = body_json(response).await;
            assert_eq!(body["status"], "ok");
            assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        }
    }

    #[tokio::test]
    async fn test_health_without_prefix() {
        let settings = Settings {
            api_prefix: String::new(),
            ..Settings::default()
        };
        let app = test_app_with(settings);

        let response = get(&app, "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = get(&app, "/auth/me", None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_root_reports_name_and_env() {
        let app = test_app();
        let body = body_json(get(&app, "/", None).await).await;
        assert_eq!(body["name"], "FinFancy API");
        assert_eq!(body["env"], "local");
    }

    #[tokio::test]
    async fn test_register_responses() {
        let app = test_app();

        let response = register(&app, "a@x.com", "password123").await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            body_json(response).await,
            json!({ "message": "User registered successfully" })
        );
        assert_eq!(app.users.len().await, 1);

        // Same email in another case
        let response = register(&app, "A@X.COM", "password123").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Email already registered" })
        );

        let response = register(&app, "b@x.com", "short").await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let response = register(&app, "not-an-email", "password123").await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(app.users.len().await, 1);
    }

    #[tokio::test]
    async fn test_login_sets_session_cookie() {
        let app = test_app();
        register(&app, "a@x.com", "password123").await;

        let response = login(&app, "a@x.com", "password123").await;
        assert_eq!(response.status(), StatusCode::OK);

        let cookie = set_cookie(&response);
        assert!(cookie.starts_with("session_id="));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=86400"));
        assert!(!cookie.contains("Secure"));

        assert_eq!(
            body_json(response).await,
            json!({ "message": "Login successful" })
        );
        assert_eq!(app.sessions.len().await, 1);
    }

    #[tokio::test]
    async fn test_deployed_login_cookie_is_secure() {
        let mut settings = Settings::default();
        settings.auth.environment = auth::Environment::Deployed("production".to_string());
        let app = test_app_with(settings);
        register(&app, "a@x.com", "password123").await;

        let response = login(&app, "a@x.com", "password123").await;
        assert!(set_cookie(&response).contains("Secure"));
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let app = test_app();
        register(&app, "a@x.com", "password123").await;

        let wrong_password = login(&app, "a@x.com", "password124").await;
        let unknown_email = login(&app, "nobody@x.com", "password123").await;

        assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
        assert!(wrong_password.headers().get(header::SET_COOKIE).is_none());

        let expected = json!({ "error": "Invalid email or password" });
        assert_eq!(body_json(wrong_password).await, expected);
        assert_eq!(body_json(unknown_email).await, expected);
    }

    #[tokio::test]
    async fn test_me_logout_flow() {
        let app = test_app();
        let cookie = logged_in(&app, "a@x.com").await;

        let response = get(&app, "/api/v1/auth/me", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["email"], "a@x.com");
        assert_eq!(body["first_name"], "Ada");
        assert_eq!(body["last_name"], "Lovelace");
        assert_eq!(body["budget_limit"], 3000);

        let response = app
            .router
            .clone()
            .oneshot(empty_request("POST", "/api/v1/auth/logout", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let removal = set_cookie(&response);
        assert!(removal.starts_with("session_id="));
        assert!(removal.contains("Max-Age=0"));
        assert_eq!(
            body_json(response).await,
            json!({ "message": "Logged out successfully" })
        );
        assert!(app.sessions.is_empty().await);

        let response = get(&app, "/api/v1/auth/me", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_logout_without_cookie_succeeds() {
        let app = test_app();
        let response = app
            .router
            .clone()
            .oneshot(empty_request("POST", "/api/v1/auth/logout", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_every_gate_failure_renders_the_same() {
        let app = test_app();
        let cookie = logged_in(&app, "a@x.com").await;
        let user = app
            .users
            .find_user_by_email("a@x.com")
            .await
            .unwrap()
            .unwrap();

        // Expired session
        let now = Utc::now();
        let expired = Session {
            token: SessionToken::generate(),
            user_id: user.id,
            created_at: now - Duration::hours(2),
            expires_at: now - Duration::minutes(1),
        };
        let expired_cookie = format!("session_id={}", expired.token.as_str());
        app.sessions.insert_session(expired).await.unwrap();

        // Session whose owner does not exist
        let orphan = Session::issue(uuid::Uuid::now_v7(), now, Duration::minutes(30)).unwrap();
        let orphan_cookie = format!("session_id={}", orphan.token.as_str());
        app.sessions.insert_session(orphan).await.unwrap();

        let cases = [
            None,
            Some("session_id=deadbeef".to_string()),
            Some(expired_cookie),
            Some(orphan_cookie),
        ];

        for cookie in cases {
            let response = get(&app, "/api/v1/auth/me", cookie.as_deref()).await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(
                body_json(response).await,
                json!({ "error": "Not authenticated" })
            );
        }

        // The expired session was removed on resolution, the live one survives
        let response = get(&app, "/api/v1/auth/me", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let remaining = app.sessions.sessions_for_user(user.id).await;
        assert_eq!(remaining.len(), 1);
    }

    #[tokio::test]
    async fn test_budget_limit_roundtrip() {
        let app = test_app();
        let cookie = logged_in(&app, "a@x.com").await;

        let body = body_json(get(&app, "/api/v1/budget/limit", Some(&cookie)).await).await;
        assert_eq!(body, json!({ "limit": 3000 }));

        let response = app
            .router
            .clone()
            .oneshot(json_request(
                "PUT",
                "/api/v1/budget/limit",
                json!({ "limit": 4200 }),
                Some(&cookie),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "limit": 4200 }));

        let body = body_json(get(&app, "/api/v1/auth/me", Some(&cookie)).await).await;
        assert_eq!(body["budget_limit"], 4200);
    }

    #[tokio::test]
    async fn test_budget_limit_validation_and_auth() {
        let app = test_app();
        let cookie = logged_in(&app, "a@x.com").await;

        let response = app
            .router
            .clone()
            .oneshot(json_request(
                "PUT",
                "/api/v1/budget/limit",
                json!({ "limit": -1 }),
                Some(&cookie),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let response = app
            .router
            .clone()
            .oneshot(json_request(
                "PUT",
                "/api/v1/budget/limit",
                json!({ "limit": 100 }),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = get(&app, "/api/v1/budget/limit", None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let app = test_app();
        let response = get(&app, "/api-doc/openapi.json", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["paths"]["/api/v1/auth/login"].is_object());
        assert!(body["paths"]["/api/v1/budget/limit"]["put"].is_object());
    }

    #[tokio::test]
    async fn test_openapi_paths_follow_api_prefix() {
        let settings = Settings {
            api_prefix: "/v2".to_string(),
            ..Settings::default()
        };
        let app = test_app_with(settings);

        let body = body_json(get(&app, "/api-doc/openapi.json", None).await).await;
        assert!(body["paths"]["/v2/auth/login"].is_object());
        assert!(body["paths"]["/v2/budget/limit"].is_object());
        assert!(body["paths"].get("/api/v1/auth/login").is_none());

        // Documented path is the one actually served
        let response = get(&app, "/v2/auth/me", None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_openapi_paths_without_prefix() {
        let doc = openapi_doc("");
        assert!(doc.paths.paths.contains_key("/auth/register"));
        assert!(doc.paths.paths.contains_key("/auth/me"));
        assert!(!doc.paths.paths.keys().any(|p| p.starts_with("/api/v1")));
    }

    #[tokio::test]
    async fn test_api_prefix_set() {
        let routes = Router::new().route("/v1/test", axum::routing::get(|| async { "ok" }));
        let app = build_router_with_prefix(routes, "/api");

        let response = app
            .clone()
            .oneshot(empty_request("GET", "/api/v1/test", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(empty_request("GET", "/v1/test", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
