//! 送信可否の判定

use crate::error::ValidationError;
use crate::types::{FileSelection, LocationChoice};

/// 送信可能か判定
///
/// ファイルが1枚以上あり、かつ位置情報が指定されている場合のみ true。
pub fn can_submit(selection: &FileSelection, location: &LocationChoice) -> bool {
    validate(selection, location).is_ok()
}

/// 送信前の検証（ファイル → 位置情報の順にチェック）
pub fn validate(
    selection: &FileSelection,
    location: &LocationChoice,
) -> Result<(), ValidationError> {
    if selection.is_empty() {
        return Err(ValidationError::NoFiles);
    }
    if location.is_unset() {
        return Err(ValidationError::NoLocation);
    }
    Ok(())
}
