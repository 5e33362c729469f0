//! プレビュー生成（位置情報・出力ファイル名）
//!
//! どちらも表示用の目安であり、送信内容には影響しない。
//! ファイル名はサーバー側の命名規則 `{keyword}-{city}-{n}.jpg` を模したもの。

use crate::slug::slugify;
use crate::types::CityRecord;

/// 位置情報プレビュー
///
/// 例: `"Bogotá, Cundinamarca — 4.7110°, -74.0721° — Alt: 2640m"`
pub fn location_preview(city: &CityRecord) -> String {
    format!(
        "{}, {} — {:.4}°, {:.4}° — Alt: {}m",
        city.name, city.department, city.latitude, city.longitude, city.altitude
    )
}

/// 出力ファイル名の例（1枚目）
///
/// キーワードが空なら None。
pub fn filename_preview(keyword: &str, city: Option<&str>) -> Option<String> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return None;
    }

    let slug = slugify(keyword);
    let example = match city.filter(|c| !c.trim().is_empty()) {
        Some(city) => format!("{}-{}-1.jpg", slug, slugify(city)),
        None => format!("{}-1.jpg", slug),
    };
    Some(example)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_preview_with_city() {
        assert_eq!(
            filename_preview("Playa Roja", Some("Madrid")).as_deref(),
            Some("playa-roja-madrid-1.jpg")
        );
        assert_eq!(
            filename_preview("Café", Some("Bogotá")).as_deref(),
            Some("cafe-bogota-1.jpg")
        );
    }

    #[test]
    fn test_filename_preview_without_city() {
        assert_eq!(
            filename_preview("Playa Roja", None).as_deref(),
            Some("playa-roja-1.jpg")
        );
        assert_eq!(
            filename_preview("Playa Roja", Some("  ")).as_deref(),
            Some("playa-roja-1.jpg")
        );
    }

    #[test]
    fn test_filename_preview_blank_keyword() {
        assert_eq!(filename_preview("", Some("Madrid")), None);
        assert_eq!(filename_preview("   ", None), None);
        // 記号だけのキーワードはフォールバック
        assert_eq!(filename_preview("!!!", None).as_deref(), Some("foto-1.jpg"));
    }

    #[test]
    fn test_location_preview_format() {
        let city = CityRecord {
            name: "Bogotá".into(),
            department: "Cundinamarca".into(),
            latitude: 4.711,
            longitude: -74.0721,
            altitude: 2640.0,
        };
        assert_eq!(
            location_preview(&city),
            "Bogotá, Cundinamarca — 4.7110°, -74.0721° — Alt: 2640m"
        );
    }
}
