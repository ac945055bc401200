//! Router-level tests.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use super::create_router;
use crate::config::{Config, SCRIPT_ARDUINO, SCRIPT_EYETRACKING, SCRIPT_HEADAWAY};
use crate::state::AppState;

struct TestApp {
    _dir: TempDir,
    router: Router,
}

impl TestApp {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            base_dir: dir.path().to_path_buf(),
            interpreter: "/bin/sh".into(),
            ..Config::default()
        };
        config.ensure_directories().unwrap();

        let templates = config.templates_dir();
        for page in ["landing.html", "login_register.html", "index.html", "doctor_dashboard.html"] {
            std::fs::write(templates.join(page), format!("<h1>{}</h1>", page)).unwrap();
        }
        std::fs::write(config.static_dir().join("js/script.js"), "console.log(1);").unwrap();

        // The arduino script is left missing on purpose.
        std::fs::write(dir.path().join(SCRIPT_HEADAWAY), "exit 0\n").unwrap();
        std::fs::write(
            dir.path().join(SCRIPT_EYETRACKING),
            "echo \"no camera ($1)\" >&2\nexit 1\n",
        )
        .unwrap();

        let state = AppState::new(config).unwrap();
        let router = create_router(state).unwrap();
        Self { _dir: dir, router }
    }

    async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn get(&self, uri: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    async fn post(&self, uri: &str, body: Value, cookie: Option<&str>) -> Response {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    /// Log in and return the `name=value` cookie pair.
    async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .post(
                "/api/login",
                json!({ "email": email, "password": password }),
                None,
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        session_cookie(&response)
    }
}

fn session_cookie(response: &Response) -> String {
    let value = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    value.split(';').next().unwrap().to_string()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn text_body(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.get("/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_login_validation() {
    let app = TestApp::new();

    let response = app
        .post("/api/login", json!({ "email": "doctor@example.com" }), None)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await,
        json!({ "success": false, "error": "Email and password required" })
    );

    let response = app
        .post(
            "/api/login",
            json!({ "email": "doctor@example.com", "password": "nope" }),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_login_and_check_auth() {
    let app = TestApp::new();

    let response = app.get("/api/check-auth", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await, json!({ "authenticated": false }));

    let response = app
        .post(
            "/api/login",
            json!({ "email": "doctor@example.com", "password": "doctor123" }),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response);
    assert!(cookie.starts_with("gazeaid_session="));
    let body = json_body(response).await;
    assert_eq!(body["role"], "doctor");
    assert_eq!(body["name"], "Dr. Jane Smith");

    let response = app.get("/api/check-auth", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({ "authenticated": true, "name": "Dr. Jane Smith", "role": "doctor" })
    );
}

#[tokio::test]
async fn test_stale_cookie_is_cleared() {
    let app = TestApp::new();
    let response = app
        .get("/api/check-auth", Some("gazeaid_session=stale"))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let set_cookie = response.headers().get(header::SET_COOKIE).unwrap();
    assert!(set_cookie.to_str().unwrap().contains("Max-Age=0"));
}

#[tokio::test]
async fn test_register_then_login() {
    let app = TestApp::new();

    let response = app
        .post(
            "/api/register",
            json!({
                "email": "new@example.com",
                "password": "abc",
                "name": "New",
                "role": "patient"
            }),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["error"],
        "Password must be at least 6 characters long"
    );

    let response = app
        .post(
            "/api/register",
            json!({
                "email": "new@example.com",
                "password": "abcdef",
                "name": "New",
                "role": "patient"
            }),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({ "success": true, "message": "Registration successful. Please log in." })
    );

    app.login("new@example.com", "abcdef").await;
}

#[tokio::test]
async fn test_logout_ends_session() {
    let app = TestApp::new();
    let cookie = app.login("patient@example.com", "patient123").await;

    let response = app.post("/api/logout", json!({}), Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.get("/api/check-auth", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Logging out again requires a session.
    let response = app.post("/api/logout", json!({}), Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_page_redirects() {
    let app = TestApp::new();

    let response = app.get("/", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(text_body(response).await, "<h1>landing.html</h1>");

    let response = app.get("/home", None).await;
    assert_eq!(location(&response), "/");

    let doctor = app.login("doctor@example.com", "doctor123").await;
    let patient = app.login("patient@example.com", "patient123").await;

    assert_eq!(location(&app.get("/", Some(&doctor)).await), "/doctor/dashboard");
    assert_eq!(location(&app.get("/", Some(&patient)).await), "/home");
    assert_eq!(location(&app.get("/auth?role=doctor", Some(&doctor)).await), "/doctor/dashboard");
    assert_eq!(location(&app.get("/home", Some(&doctor)).await), "/");
    assert_eq!(location(&app.get("/doctor/dashboard", Some(&patient)).await), "/");

    let response = app.get("/doctor/dashboard", Some(&doctor)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(text_body(response).await, "<h1>doctor_dashboard.html</h1>");

    let response = app.get("/home", Some(&patient)).await;
    assert_eq!(text_body(response).await, "<h1>index.html</h1>");

    let response = app.get("/auth", None).await;
    assert_eq!(text_body(response).await, "<h1>login_register.html</h1>");
}

#[tokio::test]
async fn test_auth_page_role_is_normalized() {
    let app = TestApp::new();

    let response = app.get("/auth?role=doctor", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(text_body(response).await, "<h1>login_register.html</h1>");

    let response = app.get("/auth?role=nurse", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/auth?role=patient");

    let response = app.get("/auth?role=DOCTOR", None).await;
    assert_eq!(location(&response), "/auth?role=doctor");
}

#[tokio::test]
async fn test_static_files() {
    let app = TestApp::new();
    let response = app.get("/static/js/script.js", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(text_body(response).await, "console.log(1);");
}

#[tokio::test]
async fn test_run_script_requires_login() {
    let app = TestApp::new();
    let response = app
        .post("/api/run-script", json!({ "script": SCRIPT_HEADAWAY }), None)
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_run_script_validation() {
    let app = TestApp::new();
    let cookie = app.login("patient@example.com", "patient123").await;

    let response = app.post("/api/run-script", json!({}), Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "No script specified");

    let response = app
        .post("/api/run-script", json!({ "script": "../server.py" }), Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "Invalid script name");

    let response = app
        .post("/api/run-script", json!({ "script": SCRIPT_ARDUINO }), Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        json_body(response).await["error"],
        "Script 'arduino_control.py' not found on server."
    );
}

#[cfg(unix)]
#[tokio::test]
async fn test_run_script_outcomes() {
    let app = TestApp::new();
    let cookie = app.login("patient@example.com", "patient123").await;

    let response = app
        .post("/api/run-script", json!({ "script": SCRIPT_HEADAWAY }), Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["already_running"], false);
    assert!(body["pid"].as_u64().is_some());
    assert_eq!(
        body["message"],
        "headaway.py started (and finished almost immediately)."
    );

    let response = app
        .post("/api/run-script", json!({ "script": SCRIPT_EYETRACKING }), Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "eyetracking.py failed to start properly.");
    assert_eq!(body["details"], "no camera (--headless)");
}
