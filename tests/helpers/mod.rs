//! テスト用の偽API・描画・保存先

#![allow(dead_code)]

use async_trait::async_trait;
use gmb_sanitizer::client::{GeocodeResult, SanitizerApi};
use gmb_sanitizer::error::{Result, SanitizerError};
use gmb_sanitizer::orchestrator::{ArtifactSink, Renderer};
use gmb_sanitizer_common::{
    Artifact, CityDirectory, FileHandle, FormData, FormSnapshot, SanitizeResponse, SessionView,
};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 偽APIの応答と呼び出し記録
#[derive(Default)]
pub struct FakeState {
    pub sanitize_response: Option<SanitizeResponse>,
    pub sanitize_delay: Option<Duration>,
    pub cities: Option<CityDirectory>,
    pub verify_response: Option<serde_json::Value>,
    pub sanitize_calls: AtomicUsize,
    pub city_calls: AtomicUsize,
    pub verify_calls: AtomicUsize,
    pub sent_forms: Mutex<Vec<FormData>>,
    pub sent_files: Mutex<Vec<Vec<String>>>,
}

/// 応答を差し替えられる偽API（クローンは同じ記録を共有する）
#[derive(Clone, Default)]
pub struct FakeApi(pub Arc<FakeState>);

impl FakeApi {
    pub fn new(state: FakeState) -> Self {
        Self(Arc::new(state))
    }

    pub fn responding(response: SanitizeResponse) -> Self {
        Self::new(FakeState {
            sanitize_response: Some(response),
            ..Default::default()
        })
    }

    pub fn sanitize_calls(&self) -> usize {
        self.0.sanitize_calls.load(Ordering::SeqCst)
    }

    pub fn city_calls(&self) -> usize {
        self.0.city_calls.load(Ordering::SeqCst)
    }

    pub fn verify_calls(&self) -> usize {
        self.0.verify_calls.load(Ordering::SeqCst)
    }

    pub fn sent_forms(&self) -> Vec<FormData> {
        self.0.sent_forms.lock().unwrap().clone()
    }

    pub fn sent_files(&self) -> Vec<Vec<String>> {
        self.0.sent_files.lock().unwrap().clone()
    }
}

fn transport_error(what: &str) -> SanitizerError {
    SanitizerError::Io(std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        format!("{} unreachable", what),
    ))
}

#[async_trait]
impl SanitizerApi for FakeApi {
    async fn fetch_cities(&self) -> Result<CityDirectory> {
        self.0.city_calls.fetch_add(1, Ordering::SeqCst);
        self.0.cities.clone().ok_or_else(|| transport_error("cities"))
    }

    async fn sanitize(&self, snapshot: &FormSnapshot) -> Result<SanitizeResponse> {
        self.0.sanitize_calls.fetch_add(1, Ordering::SeqCst);
        self.0.sent_forms.lock().unwrap().push(snapshot.form_data());
        self.0
            .sent_files
            .lock()
            .unwrap()
            .push(snapshot.files().iter().map(|f| f.name.clone()).collect());
        if let Some(delay) = self.0.sanitize_delay {
            tokio::time::sleep(delay).await;
        }
        self.0.sanitize_response.clone().ok_or_else(|| transport_error("sanitize"))
    }

    async fn verify(&self, _file: &FileHandle) -> Result<serde_json::Value> {
        self.0.verify_calls.fetch_add(1, Ordering::SeqCst);
        self.0.verify_response.clone().ok_or_else(|| transport_error("verify"))
    }

    async fn geocode(&self, _address: &str, _city: &str) -> Result<GeocodeResult> {
        Err(transport_error("geocode"))
    }
}

/// 描画されたビューをすべて記録する
#[derive(Clone, Default)]
pub struct RecordingRenderer {
    pub views: Arc<Mutex<Vec<SessionView>>>,
    pub saved_paths: Arc<Mutex<Vec<PathBuf>>>,
}

impl RecordingRenderer {
    pub fn views(&self) -> Vec<SessionView> {
        self.views.lock().unwrap().clone()
    }

    pub fn saved_paths(&self) -> Vec<PathBuf> {
        self.saved_paths.lock().unwrap().clone()
    }
}

impl Renderer for RecordingRenderer {
    fn render(&self, view: &SessionView) {
        self.views.lock().unwrap().push(view.clone());
    }

    fn artifact_saved(&self, path: &Path) {
        self.saved_paths.lock().unwrap().push(path.to_path_buf());
    }
}

/// メモリ上に保存する（fail = true なら常に失敗）
#[derive(Clone, Default)]
pub struct MemorySink {
    pub saved: Arc<Mutex<Vec<Artifact>>>,
    pub fail: bool,
}

impl ArtifactSink for MemorySink {
    fn save(&self, artifact: &Artifact) -> Result<PathBuf> {
        if self.fail {
            return Err(SanitizerError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only directory",
            )));
        }
        self.saved.lock().unwrap().push(artifact.clone());
        Ok(PathBuf::from(&artifact.file_name))
    }
}

pub fn photos(n: usize) -> Vec<FileHandle> {
    (0..n)
        .map(|i| FileHandle::new(format!("IMG_{:04}.jpg", i + 1), format!("jpeg-{}", i).into_bytes()))
        .collect()
}

pub fn archive_response(processed: &str, total: &str, errors: &str) -> SanitizeResponse {
    SanitizeResponse {
        status: 200,
        content_disposition: Some(r#"attachment; filename="gmb_sanitized_20240501_101500.zip""#.into()),
        processed: Some(processed.into()),
        total: Some(total.into()),
        errors: Some(errors.into()),
        body: b"PK\x03\x04archive".to_vec(),
    }
}

pub fn bogota_directory() -> CityDirectory {
    serde_json::from_value(serde_json::json!({
        "Bogotá": {"department": "Cundinamarca", "lat": 4.711, "lon": -74.0721, "altitude": 2640},
        "Medellín": {"department": "Antioquia", "lat": 6.2442, "lon": -75.5812, "altitude": 1495}
    }))
    .unwrap()
}
