//! `/api/sanitize` 応答の解釈
//!
//! 成功時はボディがZIP、処理件数はカスタムヘッダーで返る:
//! - `X-GMB-Processed`: 処理できた枚数
//! - `X-GMB-Total`: 送信枚数
//! - `X-GMB-Errors`: 失敗の概要（最大3件、`; ` 区切り）
//!
//! ヘッダーの値をそのまま正とし、アーカイブの中身とは照合しない。

use crate::status::StatusMessage;
use crate::types::{Artifact, OutcomeReport};
use lazy_static::lazy_static;
use regex::Regex;

pub const HEADER_PROCESSED: &str = "X-GMB-Processed";
pub const HEADER_TOTAL: &str = "X-GMB-Total";
pub const HEADER_ERRORS: &str = "X-GMB-Errors";

/// Content-Disposition がない場合の保存名
pub const DEFAULT_ARCHIVE_NAME: &str = "gmb_sanitized.zip";

/// エラーボディが読めない場合のメッセージ
pub const GENERIC_SERVER_ERROR: &str = "Error del servidor";

lazy_static! {
    static ref FILENAME_RE: Regex = Regex::new(r#"filename="?(.+?)"?$"#).unwrap();
}

/// トランスポートに依存しない応答
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanitizeResponse {
    pub status: u16,
    pub content_disposition: Option<String>,
    pub processed: Option<String>,
    pub total: Option<String>,
    pub errors: Option<String>,
    pub body: Vec<u8>,
}

impl SanitizeResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// 件数による分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeClass {
    Success,
    PartialFailure,
    TotalFailure,
}

/// 処理件数から結果を分類
pub fn classify(processed: u32, total: u32) -> OutcomeClass {
    if processed == total {
        OutcomeClass::Success
    } else if processed > 0 {
        OutcomeClass::PartialFailure
    } else {
        OutcomeClass::TotalFailure
    }
}

/// 送信1回分の最終結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Success(OutcomeReport),
    PartialFailure(OutcomeReport),
    TotalFailure(OutcomeReport),
    /// サービスエラーまたは通信エラー
    Failed(String),
}

impl SubmissionOutcome {
    pub fn report(&self) -> Option<&OutcomeReport> {
        match self {
            SubmissionOutcome::Success(r)
            | SubmissionOutcome::PartialFailure(r)
            | SubmissionOutcome::TotalFailure(r) => Some(r),
            SubmissionOutcome::Failed(_) => None,
        }
    }

    pub fn artifact(&self) -> Option<&Artifact> {
        self.report().and_then(|r| r.artifact.as_ref())
    }

    /// 表示用メッセージ
    pub fn status(&self) -> StatusMessage {
        match self {
            SubmissionOutcome::Success(r) => StatusMessage::success(format!(
                "✅ ¡Listo! Se procesaron {}/{} foto(s). El archivo ZIP se descargó automáticamente.",
                r.processed, r.total
            )),
            SubmissionOutcome::PartialFailure(r) => StatusMessage::warning(format!(
                "⚠️ Se procesaron {}/{} foto(s). Algunas fallaron: {}",
                r.processed, r.total, r.errors
            )),
            SubmissionOutcome::TotalFailure(r) => StatusMessage::error(format!(
                "❌ No se pudo procesar ninguna foto (0/{}). Errores: {}",
                r.total, r.errors
            )),
            SubmissionOutcome::Failed(message) => {
                StatusMessage::error(format!("❌ Error: {}", message))
            }
        }
    }
}

/// Content-Disposition から保存名を取り出す
pub fn extract_filename(content_disposition: Option<&str>) -> String {
    content_disposition
        .and_then(|value| FILENAME_RE.captures(value))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| DEFAULT_ARCHIVE_NAME.to_string())
}

/// ヘッダーの整数値を先頭の数字だけ読む（`"3 OK"` → 3）
pub fn parse_count(value: &str) -> Option<u32> {
    let s = value.trim_start();
    let s = s.strip_prefix('+').unwrap_or(s);
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s[..end].parse().ok()
}

/// エラーボディから `detail` を取り出す
pub fn service_error_message(body: &[u8]) -> String {
    let detail = serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|json| json.get("detail").cloned());

    match detail {
        Some(serde_json::Value::String(s)) if !s.is_empty() => s,
        Some(serde_json::Value::Null) | Some(serde_json::Value::String(_)) | None => {
            GENERIC_SERVER_ERROR.to_string()
        }
        Some(other) => other.to_string(),
    }
}

/// 応答を解釈して結果を返す
///
/// `local_count` は送信した枚数。`X-GMB-Total` が無い・数値でない場合に使う。
pub fn interpret(response: SanitizeResponse, local_count: usize) -> SubmissionOutcome {
    if !response.is_success() {
        tracing::debug!(status = response.status, "sanitize request rejected by service");
        return SubmissionOutcome::Failed(service_error_message(&response.body));
    }

    let file_name = extract_filename(response.content_disposition.as_deref());

    let processed = parse_count(response.processed.as_deref().unwrap_or("0")).unwrap_or(0);
    let total = response
        .total
        .as_deref()
        .and_then(parse_count)
        .unwrap_or(local_count as u32);
    let errors = response.errors.unwrap_or_default();

    let report = OutcomeReport {
        processed,
        total,
        errors,
        artifact: Some(Artifact {
            file_name,
            bytes: response.body,
        }),
    };

    match classify(processed, total) {
        OutcomeClass::Success => SubmissionOutcome::Success(report),
        OutcomeClass::PartialFailure => SubmissionOutcome::PartialFailure(report),
        OutcomeClass::TotalFailure => SubmissionOutcome::TotalFailure(report),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::StatusKind;

    fn ok_response(processed: Option<&str>, total: Option<&str>, errors: Option<&str>) -> SanitizeResponse {
        SanitizeResponse {
            status: 200,
            content_disposition: Some(r#"attachment; filename="gmb_sanitized_20240101_120000.zip""#.into()),
            processed: processed.map(String::from),
            total: total.map(String::from),
            errors: errors.map(String::from),
            body: b"PK\x03\x04".to_vec(),
        }
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(3, 3), OutcomeClass::Success);
        assert_eq!(classify(1, 3), OutcomeClass::PartialFailure);
        assert_eq!(classify(0, 3), OutcomeClass::TotalFailure);
    }

    #[test]
    fn test_extract_filename() {
        assert_eq!(
            extract_filename(Some(r#"attachment; filename="fotos.zip""#)),
            "fotos.zip"
        );
        assert_eq!(extract_filename(Some("attachment; filename=fotos.zip")), "fotos.zip");
        assert_eq!(extract_filename(Some("attachment")), DEFAULT_ARCHIVE_NAME);
        assert_eq!(extract_filename(None), DEFAULT_ARCHIVE_NAME);
    }

    #[test]
    fn test_parse_count_lenient() {
        assert_eq!(parse_count("3"), Some(3));
        assert_eq!(parse_count(" 12 OK"), Some(12));
        assert_eq!(parse_count("+4"), Some(4));
        assert_eq!(parse_count("abc"), None);
        assert_eq!(parse_count(""), None);
        assert_eq!(parse_count("-1"), None);
    }

    #[test]
    fn test_interpret_success() {
        let outcome = interpret(ok_response(Some("3"), Some("3"), Some("")), 3);
        assert!(matches!(outcome, SubmissionOutcome::Success(_)));
        let artifact = outcome.artifact().unwrap();
        assert_eq!(artifact.file_name, "gmb_sanitized_20240101_120000.zip");
        assert_eq!(artifact.bytes, b"PK\x03\x04");

        let status = outcome.status();
        assert_eq!(status.kind, StatusKind::Success);
        assert!(status.text.contains("3/3"));
    }

    #[test]
    fn test_interpret_partial_failure_includes_errors() {
        let outcome = interpret(
            ok_response(Some("1"), Some("3"), Some("b.jpg: cannot identify image file")),
            3,
        );
        assert!(matches!(outcome, SubmissionOutcome::PartialFailure(_)));
        let status = outcome.status();
        assert_eq!(status.kind, StatusKind::Warning);
        assert!(status.text.contains("1/3"));
        assert!(status.text.contains("b.jpg: cannot identify image file"));
    }

    #[test]
    fn test_interpret_total_failure() {
        let outcome = interpret(ok_response(Some("0"), Some("3"), Some("a.jpg: vacío")), 3);
        assert!(matches!(outcome, SubmissionOutcome::TotalFailure(_)));
        assert!(outcome.status().text.contains("(0/3)"));

        // X-GMB-Processed が無い場合は "0"
        let outcome = interpret(ok_response(None, Some("3"), None), 3);
        match outcome {
            SubmissionOutcome::TotalFailure(report) => {
                assert_eq!(report.processed, 0);
                assert_eq!(report.errors, "");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_interpret_missing_total_uses_local_count() {
        let outcome = interpret(ok_response(Some("2"), None, None), 2);
        assert!(matches!(outcome, SubmissionOutcome::Success(_)));

        let outcome = interpret(ok_response(Some("2"), Some("n/a"), None), 4);
        match outcome {
            SubmissionOutcome::PartialFailure(report) => assert_eq!(report.total, 4),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_interpret_service_error_detail() {
        let response = SanitizeResponse {
            status: 400,
            body: br#"{"detail": "Ciudad 'Lima' no encontrada."}"#.to_vec(),
            ..Default::default()
        };
        let outcome = interpret(response, 1);
        assert_eq!(
            outcome,
            SubmissionOutcome::Failed("Ciudad 'Lima' no encontrada.".into())
        );
        assert_eq!(outcome.status().text, "❌ Error: Ciudad 'Lima' no encontrada.");
        assert!(outcome.artifact().is_none());
    }

    #[test]
    fn test_interpret_service_error_unparsable_body() {
        let response = SanitizeResponse {
            status: 502,
            body: b"<html>Bad Gateway</html>".to_vec(),
            ..Default::default()
        };
        assert_eq!(
            interpret(response, 1),
            SubmissionOutcome::Failed(GENERIC_SERVER_ERROR.into())
        );
    }

    #[test]
    fn test_service_error_message_variants() {
        assert_eq!(service_error_message(br#"{"detail": ""}"#), GENERIC_SERVER_ERROR);
        assert_eq!(service_error_message(br#"{"other": 1}"#), GENERIC_SERVER_ERROR);
        assert_eq!(
            service_error_message(br#"{"detail": [{"msg": "field required"}]}"#),
            r#"[{"msg":"field required"}]"#
        );
    }
}
