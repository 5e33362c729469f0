//! `sanitize` コマンドの入力をセッションイベントに変換して実行する

use crate::cli::SanitizeArgs;
use crate::client::SanitizerApi;
use crate::error::{Result, SanitizerError};
use crate::orchestrator::Orchestrator;
use dialoguer::Select;
use gmb_sanitizer_common::types::parse_date_field;
use gmb_sanitizer_common::{FileHandle, FormField, SessionEvent, SessionView};

/// 引数からフォーム編集イベントを作る（都市・キーワードは除く）
pub fn form_events(args: &SanitizeArgs) -> Result<Vec<SessionEvent>> {
    for date in [&args.date_from, &args.date_to].into_iter().flatten() {
        parse_date_field(date)?;
    }

    let fields = [
        (FormField::ManualLat, &args.lat),
        (FormField::ManualLon, &args.lon),
        (FormField::ManualAlt, &args.alt),
        (FormField::Address, &args.address),
        (FormField::PostalCode, &args.postal_code),
        (FormField::DateFrom, &args.date_from),
        (FormField::DateTo, &args.date_to),
        (FormField::DeviceId, &args.device_id),
        (FormField::Intensity, &args.intensity),
        (FormField::JitterRadius, &args.jitter_radius),
    ];

    let mut events: Vec<SessionEvent> = fields
        .into_iter()
        .filter_map(|(field, value)| {
            value
                .as_ref()
                .map(|v| SessionEvent::FieldEdited(field, v.clone()))
        })
        .collect();

    if args.no_random_per_photo {
        events.push(SessionEvent::RandomPerPhotoToggled(false));
    }

    Ok(events)
}

/// 都市一覧から対話的に選ぶ
pub async fn pick_city<A: SanitizerApi>(api: &A) -> Result<String> {
    let directory = api.fetch_cities().await?;
    let names = directory.names();
    if names.is_empty() {
        return Err(SanitizerError::Config("La lista de ciudades está vacía".into()));
    }

    let index = Select::new()
        .with_prompt("Ciudad")
        .items(&names)
        .default(0)
        .interact()
        .map_err(|e| SanitizerError::Prompt(e.to_string()))?;

    Ok(names[index].to_string())
}

/// ファイル選択 → フォーム入力 → 送信 を順に実行し、最終状態を返す
pub async fn run<A: SanitizerApi>(
    orchestrator: &Orchestrator<A>,
    files: Vec<FileHandle>,
    city: Option<String>,
    args: &SanitizeArgs,
) -> Result<SessionView> {
    let events = form_events(args)?;

    orchestrator.select_files(files).await;
    for event in events {
        orchestrator.dispatch(event).await;
    }
    if let Some(keyword) = &args.keyword {
        orchestrator
            .dispatch(SessionEvent::KeywordChanged(keyword.clone()))
            .await;
    }
    if city.is_some() {
        orchestrator.change_city(city).await;
    }

    Ok(orchestrator.submit().await)
}
