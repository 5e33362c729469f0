//! ファイル名用スラッグ生成
//!
//! キーワードや都市名からファイル名プレビュー用のトークンを作る。
//! アクセントを除去し、小文字・ハイフン区切りにそろえる。

use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// 結果が空になった場合のフォールバック
pub const FALLBACK_SLUG: &str = "foto";

lazy_static! {
    static ref SEPARATOR_RE: Regex = Regex::new(r"[\s_-]+").unwrap();
}

/// 結合文字（U+0300〜U+036F）か判定
fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

/// テキストをスラッグに変換
///
/// 例: `"Café José"` → `"cafe-jose"`、`"!!!"` → `"foto"`
pub fn slugify(text: &str) -> String {
    let stripped: String = text.nfd().filter(|&c| !is_combining_mark(c)).collect();
    let lowered = stripped.to_lowercase();

    // [a-z0-9\s-] 以外を除去
    let kept: String = lowered
        .trim()
        .chars()
        .filter(|&c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || c == '-')
        .collect();

    let collapsed = SEPARATOR_RE.replace_all(&kept, "-");
    let slug = collapsed.trim_matches('-');

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_accents() {
        assert_eq!(slugify("Café José"), "cafe-jose");
        assert_eq!(slugify("Bogotá D.C."), "bogota-dc");
        assert_eq!(slugify("Medellín"), "medellin");
    }

    #[test]
    fn test_slugify_fallback() {
        assert_eq!(slugify(""), "foto");
        assert_eq!(slugify("   "), "foto");
        assert_eq!(slugify("!!!"), "foto");
        assert_eq!(slugify("---"), "foto");
    }

    #[test]
    fn test_slugify_collapses_separators() {
        assert_eq!(slugify("Playa   Roja"), "playa-roja");
        assert_eq!(slugify("  playa - roja  "), "playa-roja");
        assert_eq!(slugify("-Playa--Roja-"), "playa-roja");
        assert_eq!(slugify("Santa\tMarta\n2024"), "santa-marta-2024");
    }

    #[test]
    fn test_slugify_drops_underscore_and_symbols() {
        // 記号除去の後に区切り文字が畳まれる
        assert_eq!(slugify("foo_bar"), "foobar");
        assert_eq!(slugify("Hotel & Spa #1"), "hotel-spa-1");
        assert_eq!(slugify("Ñandú"), "nandu");
    }

    #[test]
    fn test_slugify_idempotent() {
        let inputs = [
            "",
            "Café José",
            "  ¡Hola, Mundo!  ",
            "Cartagena de Indias",
            "a__b--c  d",
            "東京 tower",
            "Über-Straße 12",
        ];
        for input in inputs {
            let once = slugify(input);
            assert_eq!(slugify(&once), once, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_slugify_output_charset() {
        let slug = slugify("Ça va? Très bien — 100%");
        assert!(slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        assert!(!slug.starts_with('-'));
        assert!(!slug.ends_with('-'));
    }
}
