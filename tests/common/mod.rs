// Shared fixtures: an in-memory snapshot and a router over a temporary data directory

use axum::{
    body::Body,
    http::{header, Method, Request, Response, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tower::ServiceExt;

use hashem_trainer::api::{create_routes, AppState};
use hashem_trainer::config::{seed_admin, AppConfig};
use hashem_trainer::storage::{Snapshot, StorageError};

pub const ADMIN_IDENTIFIER: &str = "admin@hashem.local";
pub const ADMIN_PASSWORD: &str = "admin";
pub const TEST_HASH_COST: u32 = 4;

/// Snapshot kept in memory; clones share contents and the write counter
#[derive(Clone, Default)]
pub struct MemorySnapshot {
    contents: Arc<Mutex<Option<Vec<u8>>>>,
    writes: Arc<AtomicUsize>,
}

impl MemorySnapshot {
    pub fn with_contents(contents: &str) -> Self {
        let snapshot = Self::default();
        *snapshot.contents.lock().unwrap() = Some(contents.as_bytes().to_vec());
        snapshot
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn json(&self) -> Value {
        let contents = self.contents.lock().unwrap();
        serde_json::from_slice(contents.as_deref().unwrap_or(b"null".as_slice())).unwrap()
    }
}

impl Snapshot for MemorySnapshot {
    fn read(&self) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.contents.lock().unwrap().clone())
    }

    fn write(&self, contents: &[u8]) -> Result<(), StorageError> {
        *self.contents.lock().unwrap() = Some(contents.to_vec());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// The full router over a throwaway data directory with the admin seeded
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub config: AppConfig,
    _data_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let data_dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::from_lookup(|_| None).unwrap();
        config.data_dir = data_dir.path().to_path_buf();
        config.bcrypt_cost = TEST_HASH_COST;

        let state = AppState::from_config(&config).unwrap();
        seed_admin(&state.accounts, &config).await.unwrap();

        Self {
            router: create_routes(state.clone()),
            state,
            config,
            _data_dir: data_dir,
        }
    }

    pub async fn get(&self, uri: &str, cookies: &[String]) -> Response<Body> {
        let mut request = Request::builder().method(Method::GET).uri(uri);
        if !cookies.is_empty() {
            request = request.header(header::COOKIE, cookies.join("; "));
        }
        self.send(request.body(Body::empty()).unwrap()).await
    }

    pub async fn post_form(&self, uri: &str, form: &str, cookies: &[String]) -> Response<Body> {
        let mut request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if !cookies.is_empty() {
            request = request.header(header::COOKIE, cookies.join("; "));
        }
        self.send(request.body(Body::from(form.to_string())).unwrap())
            .await
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn register(&self, identifier: &str, password: &str, role: &str) {
        let form = format!(
            "identifier={}&name=Test+User&password={}&role={}",
            urlencoding::encode(identifier),
            urlencoding::encode(password),
            role
        );
        let response = self.post_form("/register", &form, &[]).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login", "registration of {} failed", identifier);
    }

    /// Log in and return the session cookie pair to send back
    pub async fn login(&self, identifier: &str, password: &str) -> String {
        let form = format!(
            "identifier={}&password={}",
            urlencoding::encode(identifier),
            urlencoding::encode(password)
        );
        let response = self.post_form("/login", &form, &[]).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        cookie(&response, "session").expect("login sets a session cookie")
    }
}

pub fn location<B>(response: &Response<B>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

/// `name=value` of a cookie the response sets (removals are ignored)
pub fn cookie<B>(response: &Response<B>, name: &str) -> Option<String> {
    let prefix = format!("{}=", name);
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .find(|pair| pair.starts_with(&prefix) && pair.len() > prefix.len())
        .map(str::to_string)
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Follow a redirect and return the flash message the next view shows
pub async fn flash_after(app: &TestApp, response: &Response<Body>, cookies: &[String]) -> Option<String> {
    let mut cookies = cookies.to_vec();
    cookies.push(cookie(response, "flash")?);

    let page = json_body(app.get(location(response), &cookies).await).await;
    page["flash"]["message"].as_str().map(str::to_string)
}
