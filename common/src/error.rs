//! エラー型定義

use thiserror::Error;

/// 送信前の入力検証エラー
///
/// メッセージはそのままユーザーに表示される。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("⚠️ Selecciona al menos una foto antes de continuar.")]
    NoFiles,

    #[error("⚠️ Selecciona una ciudad o ingresa coordenadas manuales.")]
    NoLocation,
}

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
