//! Test harness: fake Drive and Gemini servers plus a gateway wired to them.

#![allow(dead_code)]

use axum::{
    body::{Body, Bytes},
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use drive_gallery::config::{
    DriveConfig, DriveCredentials, GalleryConfig, GoogleConfig, ModelConfig, PromptConfig,
};
use drive_gallery::startup::Application;
use serde_json::{json, Value};
use service_core::config::Config as CoreConfig;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

pub const TEST_TOKEN: &str = "test-token";
pub const TEST_API_KEY: &str = "test-api-key";
pub const ROOT_FOLDER: &str = "ROOT";

#[derive(Clone)]
struct FakeFile {
    id: &'static str,
    name: &'static str,
    mime_type: &'static str,
    thumbnail: bool,
    chunks: Vec<&'static [u8]>,
    /// Abort the body after the chunks instead of finishing cleanly.
    broken: bool,
}

impl FakeFile {
    fn json(&self) -> Value {
        let mut value = json!({
            "id": self.id,
            "name": self.name,
            "mimeType": self.mime_type,
        });
        if self.thumbnail {
            value["thumbnailLink"] = json!(format!("https://thumbs.example/{}", self.id));
        }
        value
    }
}

#[derive(Default)]
struct DriveState {
    folders: HashMap<&'static str, Vec<FakeFile>>,
    files: HashMap<&'static str, FakeFile>,
    queries: Vec<String>,
    media_requests: Vec<String>,
}

/// Fixture: F1 = [a (png, thumb), b (pdf), c (jpeg, no thumb)].
fn drive_fixture() -> DriveState {
    let a = FakeFile {
        id: "a",
        name: "a.png",
        mime_type: "image/png",
        thumbnail: true,
        chunks: vec![&b"b1"[..], &b"b2"[..], &b"b3"[..]],
        broken: false,
    };
    let b = FakeFile {
        id: "b",
        name: "b.pdf",
        mime_type: "application/pdf",
        thumbnail: true,
        chunks: vec![&b"%PDF-1.7"[..]],
        broken: false,
    };
    let c = FakeFile {
        id: "c",
        name: "c.jpg",
        mime_type: "image/jpeg",
        thumbnail: false,
        chunks: vec![&b"jpeg"[..]],
        broken: false,
    };
    let broken = FakeFile {
        id: "broken",
        name: "broken.png",
        mime_type: "image/png",
        thumbnail: true,
        chunks: vec![&b"partial"[..]],
        broken: true,
    };
    let rejected = FakeFile {
        id: "rejected",
        name: "rejected.png",
        mime_type: "image/png",
        thumbnail: true,
        chunks: vec![&b"FAIL"[..]],
        broken: false,
    };

    let mut state = DriveState::default();
    state
        .folders
        .insert("F1", vec![a.clone(), b.clone(), c.clone()]);
    state.folders.insert(ROOT_FOLDER, vec![a.clone(), b.clone()]);
    for file in [a, b, c, broken, rejected] {
        state.files.insert(file.id, file);
    }
    state
}

type SharedDrive = Arc<Mutex<DriveState>>;

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", TEST_TOKEN))
        .unwrap_or(false)
}

/// Pull the folder id out of `'<id>' in parents ...`.
fn folder_from_query(q: &str) -> Option<String> {
    let start = q.find('\'')? + 1;
    let end = start + q[start..].find('\'')?;
    Some(q[start..end].to_string())
}

async fn drive_list(
    State(drive): State<SharedDrive>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let q = params.get("q").cloned().unwrap_or_default();
    let mut drive = drive.lock().unwrap();
    drive.queries.push(q.clone());

    let Some(folder) = folder_from_query(&q) else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    if folder == "quota" {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"error": {"message": "User rate limit exceeded"}})),
        )
            .into_response();
    }

    // Deliberately ignores the mimeType clause so local filtering is tested.
    let files: Vec<Value> = drive
        .folders
        .get(folder.as_str())
        .map(|files| files.iter().map(FakeFile::json).collect())
        .unwrap_or_default();
    Json(json!({ "files": files })).into_response()
}

async fn drive_file(
    State(drive): State<SharedDrive>,
    headers: HeaderMap,
    Path(file_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let mut drive = drive.lock().unwrap();
    let Some(file) = drive.files.get(file_id.as_str()).cloned() else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"error": {"message": "File not found"}})),
        )
            .into_response();
    };

    if params.get("alt").map(String::as_str) != Some("media") {
        return Json(file.json()).into_response();
    }

    drive.media_requests.push(file_id);
    let mut items: Vec<Result<Bytes, std::io::Error>> = file
        .chunks
        .iter()
        .map(|chunk| Ok(Bytes::from_static(*chunk)))
        .collect();
    if file.broken {
        items.push(Err(std::io::Error::other("connection reset")));
    }
    Body::from_stream(futures::stream::iter(items)).into_response()
}

pub struct FakeDrive {
    pub base_url: String,
    state: SharedDrive,
}

impl FakeDrive {
    pub async fn spawn() -> Self {
        let state: SharedDrive = Arc::new(Mutex::new(drive_fixture()));
        let router = Router::new()
            .route("/files", get(drive_list))
            .route("/files/:file_id", get(drive_file))
            .with_state(state.clone());
        let base_url = serve(router).await;
        Self { base_url, state }
    }

    pub fn queries(&self) -> Vec<String> {
        self.state.lock().unwrap().queries.clone()
    }

    pub fn media_requests(&self) -> Vec<String> {
        self.state.lock().unwrap().media_requests.clone()
    }
}

#[derive(Debug, Clone)]
pub struct GeminiCall {
    pub model_call: String,
    pub api_key: Option<String>,
    pub query: Option<String>,
    pub body: Value,
}

impl GeminiCall {
    pub fn prompt(&self) -> &str {
        self.body["contents"][0]["parts"][0]["text"]
            .as_str()
            .unwrap_or_default()
    }

    pub fn mime_type(&self) -> &str {
        self.body["contents"][0]["parts"][1]["inlineData"]["mimeType"]
            .as_str()
            .unwrap_or_default()
    }

    pub fn image_bytes(&self) -> Vec<u8> {
        let data = self.body["contents"][0]["parts"][1]["inlineData"]["data"]
            .as_str()
            .unwrap_or_default();
        STANDARD.decode(data).unwrap()
    }
}

type SharedGemini = Arc<Mutex<Vec<GeminiCall>>>;

async fn gemini_generate(
    State(calls): State<SharedGemini>,
    Path(model_call): Path<String>,
    headers: HeaderMap,
    uri: Uri,
    Json(body): Json<Value>,
) -> Response {
    let call = GeminiCall {
        model_call,
        api_key: headers
            .get("x-goog-api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        query: uri.query().map(str::to_string),
        body,
    };
    let image = call.image_bytes();
    calls.lock().unwrap().push(call);

    if image == b"FAIL" {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": {"message": "backend exploded"}})),
        )
            .into_response();
    }

    Json(json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{"text": format!("transcribed {} bytes", image.len())}]
            },
            "finishReason": "STOP"
        }]
    }))
    .into_response()
}

pub struct FakeGemini {
    pub base_url: String,
    calls: SharedGemini,
}

impl FakeGemini {
    pub async fn spawn() -> Self {
        let calls: SharedGemini = Arc::new(Mutex::new(Vec::new()));
        let router = Router::new()
            .route("/models/:model_call", post(gemini_generate))
            .with_state(calls.clone());
        let base_url = serve(router).await;
        Self { base_url, calls }
    }

    pub fn calls(&self) -> Vec<GeminiCall> {
        self.calls.lock().unwrap().clone()
    }
}

async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake server");
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });
    format!("http://127.0.0.1:{}", port)
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub drive: FakeDrive,
    pub gemini: FakeGemini,
}

pub fn test_config(drive: &FakeDrive, gemini: &FakeGemini) -> GalleryConfig {
    GalleryConfig {
        common: CoreConfig {
            port: 0,
            ..CoreConfig::default()
        },
        drive: DriveConfig {
            api_base: drive.base_url.clone(),
            root_folder_id: ROOT_FOLDER.to_string(),
            credentials: DriveCredentials::AccessToken(TEST_TOKEN.to_string()),
        },
        google: GoogleConfig {
            api_key: TEST_API_KEY.to_string(),
            api_base: gemini.base_url.clone(),
        },
        models: ModelConfig {
            transcription_model: "gemini-2.0-flash".to_string(),
        },
        prompt: PromptConfig {
            path: "prompt.txt".to_string(),
        },
        static_dir: "static".to_string(),
    }
}

impl TestApp {
    /// Spawn the gateway on a random port against fresh fake providers.
    pub async fn spawn() -> Self {
        let drive = FakeDrive::spawn().await;
        let gemini = FakeGemini::spawn().await;

        let app = Application::build(test_config(&drive, &gemini))
            .await
            .expect("Failed to build application");
        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(20)).await;
        }

        TestApp {
            address,
            port,
            drive,
            gemini,
        }
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        reqwest::Client::new()
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }
}
