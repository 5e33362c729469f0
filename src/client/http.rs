use super::{GeocodeResult, SanitizerApi};
use crate::config::Config;
use crate::error::{Result, SanitizerError};
use async_trait::async_trait;
use gmb_sanitizer_common::outcome::{
    service_error_message, HEADER_ERRORS, HEADER_PROCESSED, HEADER_TOTAL,
};
use gmb_sanitizer_common::{CityDirectory, FileHandle, FormSnapshot, SanitizeResponse};
use reqwest::header::{HeaderMap, CONTENT_DISPOSITION};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use std::time::Duration;

/// reqwest によるHTTPクライアント
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// タイムアウト未指定ならreqwestのデフォルトに任せる
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.base_url,
            config.timeout_seconds.map(Duration::from_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// ヘッダー値を Latin-1 として読む
///
/// サーバーは非ASCII（`vacío` など）を Latin-1 で送るため `to_str()` は使えない。
fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .map(|v| v.as_bytes().iter().map(|&b| b as char).collect())
}

/// 非2xxを detail 付きのエラーに変換
async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.bytes().await?;
    Err(SanitizerError::Service {
        status: status.as_u16(),
        detail: service_error_message(&body),
    })
}

#[async_trait]
impl SanitizerApi for HttpClient {
    async fn fetch_cities(&self) -> Result<CityDirectory> {
        let response = self.client.get(self.build_url("/api/cities")).send().await?;
        let response = ensure_success(response).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn sanitize(&self, snapshot: &FormSnapshot) -> Result<SanitizeResponse> {
        let mut form = Form::new();
        for file in snapshot.files().iter() {
            let part = Part::bytes(file.content().to_vec()).file_name(file.name.clone());
            form = form.part("files", part);
        }
        for (name, value) in snapshot.form_data().iter() {
            form = form.text(name.to_string(), value.to_string());
        }

        tracing::debug!(files = snapshot.file_count(), url = %self.build_url("/api/sanitize"), "sending batch");
        let response = self
            .client
            .post(self.build_url("/api/sanitize"))
            .multipart(form)
            .send()
            .await?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();
        tracing::debug!(status, bytes = body.len(), "sanitize response received");

        Ok(SanitizeResponse {
            status,
            content_disposition: header_value(&headers, CONTENT_DISPOSITION.as_str()),
            processed: header_value(&headers, HEADER_PROCESSED),
            total: header_value(&headers, HEADER_TOTAL),
            errors: header_value(&headers, HEADER_ERRORS),
            body,
        })
    }

    async fn verify(&self, file: &FileHandle) -> Result<serde_json::Value> {
        let part = Part::bytes(file.content().to_vec()).file_name(file.name.clone());
        let form = Form::new().part("file", part);

        // ステータスに関わらずJSONとして読む
        let response = self
            .client
            .post(self.build_url("/api/verify"))
            .multipart(form)
            .send()
            .await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn geocode(&self, address: &str, city: &str) -> Result<GeocodeResult> {
        let form = Form::new()
            .text("address", address.to_string())
            .text("city", city.to_string());

        let response = self
            .client
            .post(self.build_url("/api/geocode"))
            .multipart(form)
            .send()
            .await?;
        let response = ensure_success(response).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_header_value_decodes_latin1() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-gmb-errors",
            HeaderValue::from_bytes(b"b.jpg: Archivo vac\xEDo (0 bytes)").unwrap(),
        );
        headers.insert(
            CONTENT_DISPOSITION,
            HeaderValue::from_bytes(b"attachment; filename=\"fotos_a\xF1o.zip\"").unwrap(),
        );

        assert_eq!(
            header_value(&headers, HEADER_ERRORS).as_deref(),
            Some("b.jpg: Archivo vacío (0 bytes)")
        );
        assert_eq!(
            header_value(&headers, CONTENT_DISPOSITION.as_str()).as_deref(),
            Some("attachment; filename=\"fotos_año.zip\"")
        );
        assert_eq!(header_value(&headers, HEADER_TOTAL), None);
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = HttpClient::new("http://localhost:8000/", None).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.build_url("/api/cities"), "http://localhost:8000/api/cities");
    }
}
