//! サニタイズサービスのAPI
//!
//! - `GET  /api/cities`   都市一覧（プレビュー用、失敗しても致命的ではない）
//! - `POST /api/sanitize` 写真の一括サニタイズ（ZIP + 件数ヘッダー）
//! - `POST /api/verify`   1枚のEXIF確認
//! - `POST /api/geocode`  住所・都市から座標を取得

mod http;

pub use http::HttpClient;

use crate::error::Result;
use async_trait::async_trait;
use gmb_sanitizer_common::{CityDirectory, FileHandle, FormSnapshot, SanitizeResponse};
use serde::{Deserialize, Serialize};

/// `/api/geocode` の応答
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub altitude: f64,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub source: String,
}

/// サービスとの通信
///
/// `sanitize` はHTTPステータスに関わらず応答を返す。Err は通信エラーのみ。
#[async_trait]
pub trait SanitizerApi: Send + Sync {
    async fn fetch_cities(&self) -> Result<CityDirectory>;

    async fn sanitize(&self, snapshot: &FormSnapshot) -> Result<SanitizeResponse>;

    async fn verify(&self, file: &FileHandle) -> Result<serde_json::Value>;

    async fn geocode(&self, address: &str, city: &str) -> Result<GeocodeResult>;
}
