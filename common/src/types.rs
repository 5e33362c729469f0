//! 入力・送信・結果の型定義
//!
//! - FileHandle / FileSelection: 選択された写真
//! - FormFields / FormSnapshot: フォーム値と送信時点のスナップショット
//! - CityDirectory / CityRecord: `/api/cities` の都市情報
//! - OutcomeReport: 一括送信の結果

use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// 日付フィールドの形式
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// デフォルトの撮影日範囲（日数）
pub const DEFAULT_DATE_RANGE_DAYS: i64 = 30;

/// 選択された1ファイル
///
/// 中身は共有参照なので、スナップショットへのコピーは安価。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub name: String,
    pub size: u64,
    content: Arc<[u8]>,
}

impl FileHandle {
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            size: content.len() as u64,
            content: content.into(),
        }
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// MB単位のサイズ（bytes / 1024 / 1024）
    pub fn size_mb(&self) -> f64 {
        self.size as f64 / 1024.0 / 1024.0
    }

    /// 一覧表示用タグ: `"name (1.5 MB)"`
    pub fn tag(&self) -> String {
        format!("{} ({:.1} MB)", self.name, self.size_mb())
    }
}

/// 選択中のファイル一覧（選択・ドロップ順）
///
/// 選択イベントごとに丸ごと置き換える。部分編集はしない。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSelection {
    files: Vec<FileHandle>,
}

impl FileSelection {
    pub fn new(files: Vec<FileHandle>) -> Self {
        Self { files }
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FileHandle> {
        self.files.iter()
    }

    pub fn tags(&self) -> Vec<String> {
        self.files.iter().map(FileHandle::tag).collect()
    }
}

/// 位置情報の指定方法
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationChoice {
    /// 都市IDを選択
    NamedCity(String),
    /// 手動座標（緯度・経度のどちらか一方でも可）
    ManualCoordinates { lat: Option<String>, lon: Option<String> },
    /// 未指定
    Unset,
}

impl LocationChoice {
    /// フォーム値から判定（前後の空白は無視）
    pub fn from_form(form: &FormFields) -> Self {
        let non_blank = |s: &str| {
            let t = s.trim();
            (!t.is_empty()).then(|| t.to_string())
        };

        if let Some(city) = non_blank(&form.city) {
            return LocationChoice::NamedCity(city);
        }

        let lat = non_blank(&form.manual_lat);
        let lon = non_blank(&form.manual_lon);
        if lat.is_some() || lon.is_some() {
            LocationChoice::ManualCoordinates { lat, lon }
        } else {
            LocationChoice::Unset
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, LocationChoice::Unset)
    }
}

/// `/api/cities` の1エントリ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityEntry {
    pub department: String,
    pub lat: f64,
    pub lon: f64,
    pub altitude: f64,
}

/// 都市情報（IDは都市名）
#[derive(Debug, Clone, PartialEq)]
pub struct CityRecord {
    pub name: String,
    pub department: String,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

/// 都市ID → 都市情報のマップ
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CityDirectory(BTreeMap<String, CityEntry>);

impl CityDirectory {
    pub fn new(entries: BTreeMap<String, CityEntry>) -> Self {
        Self(entries)
    }

    pub fn lookup(&self, id: &str) -> Option<CityRecord> {
        self.0.get(id).map(|entry| CityRecord {
            name: id.to_string(),
            department: entry.department.clone(),
            latitude: entry.lat,
            longitude: entry.lon,
            altitude: entry.altitude,
        })
    }

    /// 都市名の一覧（昇順）
    pub fn names(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }

    pub fn records(&self) -> Vec<CityRecord> {
        self.0.keys().filter_map(|id| self.lookup(id)).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// 編集可能なテキストフィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Address,
    ManualLat,
    ManualLon,
    ManualAlt,
    PostalCode,
    DeviceId,
    Intensity,
    JitterRadius,
    DateFrom,
    DateTo,
}

/// サニタイズフォームの全フィールド
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormFields {
    pub city: String,
    pub address: String,
    pub manual_lat: String,
    pub manual_lon: String,
    pub manual_alt: String,
    pub postal_code: String,
    pub device_id: String,
    pub intensity: String,
    pub jitter_radius: String,
    pub date_from: String,
    pub date_to: String,
    /// 「写真ごとに端末情報をランダム化」チェックボックス
    pub random_device_per_photo: bool,
    pub keyword: String,
}

impl FormFields {
    /// 指定日を基準にしたデフォルト値（date_to = 当日、date_from = 30日前）
    pub fn for_date(today: NaiveDate) -> Self {
        let month_ago = today - chrono::Duration::days(DEFAULT_DATE_RANGE_DAYS);
        Self {
            city: String::new(),
            address: String::new(),
            manual_lat: String::new(),
            manual_lon: String::new(),
            manual_alt: String::new(),
            postal_code: String::new(),
            device_id: "random".into(),
            intensity: "medium".into(),
            jitter_radius: "30".into(),
            date_from: month_ago.format(DATE_FORMAT).to_string(),
            date_to: today.format(DATE_FORMAT).to_string(),
            random_device_per_photo: true,
            keyword: String::new(),
        }
    }

    pub fn set(&mut self, field: FormField, value: String) {
        let slot = match field {
            FormField::Address => &mut self.address,
            FormField::ManualLat => &mut self.manual_lat,
            FormField::ManualLon => &mut self.manual_lon,
            FormField::ManualAlt => &mut self.manual_alt,
            FormField::PostalCode => &mut self.postal_code,
            FormField::DeviceId => &mut self.device_id,
            FormField::Intensity => &mut self.intensity,
            FormField::JitterRadius => &mut self.jitter_radius,
            FormField::DateFrom => &mut self.date_from,
            FormField::DateTo => &mut self.date_to,
        };
        *slot = value;
    }

    /// 選択中の都市（空白のみは未選択扱い）
    pub fn selected_city(&self) -> Option<&str> {
        let city = self.city.trim();
        (!city.is_empty()).then_some(city)
    }

    /// フォームのネイティブ直列化
    ///
    /// チェックされていないチェックボックスは含まれない。
    fn native_form_data(&self) -> FormData {
        let mut data = FormData::default();
        data.append("city", &self.city);
        data.append("address", &self.address);
        data.append("manual_lat", &self.manual_lat);
        data.append("manual_lon", &self.manual_lon);
        data.append("manual_alt", &self.manual_alt);
        data.append("postal_code", &self.postal_code);
        data.append("device_id", &self.device_id);
        data.append("intensity", &self.intensity);
        data.append("jitter_radius", &self.jitter_radius);
        data.append("date_from", &self.date_from);
        data.append("date_to", &self.date_to);
        if self.random_device_per_photo {
            data.append("random_device_per_photo", "true");
        }
        data.append("keyword", &self.keyword);
        data
    }
}

impl Default for FormFields {
    fn default() -> Self {
        Self::for_date(chrono::Utc::now().date_naive())
    }
}

/// `YYYY-MM-DD` 形式の日付を検証
pub fn parse_date_field(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|e| Error::Config(format!("fecha inválida '{}': {}", value, e)))
}

/// 名前付きテキストフィールドの順序付きリスト
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    entries: Vec<(String, String)>,
}

impl FormData {
    pub fn append(&mut self, name: &str, value: &str) {
        self.entries.push((name.to_string(), value.to_string()));
    }

    /// 同名の値をすべて置き換える（最初の位置を維持、なければ末尾に追加）
    pub fn set(&mut self, name: &str, value: &str) {
        match self.entries.iter().position(|(n, _)| n == name) {
            Some(first) => {
                self.entries[first].1 = value.to_string();
                let mut index = 0;
                self.entries.retain(|(n, _)| {
                    let keep = n != name || index == first;
                    index += 1;
                    keep
                });
            }
            None => self.append(name, value),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 送信時点のフォームとファイルの不変コピー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSnapshot {
    form: FormFields,
    files: FileSelection,
}

impl FormSnapshot {
    pub fn capture(form: &FormFields, files: &FileSelection) -> Self {
        Self {
            form: form.clone(),
            files: files.clone(),
        }
    }

    pub fn form(&self) -> &FormFields {
        &self.form
    }

    pub fn files(&self) -> &FileSelection {
        &self.files
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// 送信するテキストフィールド
    ///
    /// チェックボックスが外れている場合、`random_device_per_photo` は
    /// 必ず `"false"` になる。
    pub fn form_data(&self) -> FormData {
        let mut data = self.form.native_form_data();
        if !self.form.random_device_per_photo {
            data.set("random_device_per_photo", "false");
        }
        data
    }
}

/// ダウンロード対象のアーカイブ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// 一括送信の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeReport {
    pub processed: u32,
    pub total: u32,
    /// `X-GMB-Errors` の内容（空の場合あり）
    pub errors: String,
    pub artifact: Option<Artifact>,
}
