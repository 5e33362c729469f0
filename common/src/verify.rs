//! `/api/verify` の表示状態

use serde_json::Value;

/// 読み込み中のプレースホルダー
pub const READING_PLACEHOLDER: &str = "Leyendo EXIF...";

/// 検証パネルの状態
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum VerifyState {
    #[default]
    Idle,
    Reading,
    /// 整形済みのメタデータJSON
    Metadata(String),
    /// 応答に含まれていた `error` の値
    Warning(String),
    /// 通信エラー
    Failed(String),
}

impl VerifyState {
    /// メタデータを取得できた場合のみ true
    pub fn is_success(&self) -> bool {
        matches!(self, VerifyState::Metadata(_))
    }

    /// パネルに表示するテキスト（Idleは非表示）
    pub fn text(&self) -> Option<String> {
        match self {
            VerifyState::Idle => None,
            VerifyState::Reading => Some(READING_PLACEHOLDER.to_string()),
            VerifyState::Metadata(json) => Some(json.clone()),
            VerifyState::Warning(error) => Some(format!("⚠️ {}", error)),
            VerifyState::Failed(message) => Some(format!("Error: {}", message)),
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// 応答JSONから表示状態を決める
pub fn interpret_verify(data: &Value) -> VerifyState {
    match data.get("error").filter(|e| is_truthy(e)) {
        Some(Value::String(s)) => VerifyState::Warning(s.clone()),
        Some(other) => VerifyState::Warning(other.to_string()),
        None => VerifyState::Metadata(
            serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string()),
        ),
    }
}
