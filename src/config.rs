use crate::error::{Result, SanitizerError};
use gmb_sanitizer_common::FormFields;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 接続先を上書きする環境変数
pub const BASE_URL_ENV: &str = "GMB_SANITIZER_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    /// None の場合はHTTPクライアントのデフォルト
    pub timeout_seconds: Option<u64>,
    /// ZIPの保存先（None ならカレントディレクトリ）
    pub output_dir: Option<PathBuf>,
    pub device_id: String,
    pub intensity: String,
    pub jitter_radius: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".into(),
            timeout_seconds: None,
            output_dir: None,
            device_id: "random".into(),
            intensity: "medium".into(),
            jitter_radius: "30".into(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            serde_json::from_str(&content)?
        } else {
            Self::default()
        };

        // 環境変数を優先
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                config.base_url = url;
            }
        }

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| SanitizerError::Config("No se encontró el directorio personal".into()))?;
        Ok(home.join(".config").join("gmb-sanitizer").join("config.json"))
    }

    pub fn set_base_url(&mut self, url: String) -> Result<()> {
        let url = url.trim().trim_end_matches('/').to_string();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(SanitizerError::Config(format!("URL inválida: {}", url)));
        }
        self.base_url = url;
        self.save()
    }

    /// 設定値を反映したフォーム初期値
    pub fn form_defaults(&self) -> FormFields {
        FormFields {
            device_id: self.device_id.clone(),
            intensity: self.intensity.clone(),
            jitter_radius: self.jitter_radius.clone(),
            ..FormFields::default()
        }
    }
}
