//! 送信する写真の収集
//!
//! 引数の順序を保つ。フォルダは直下の画像のみをファイル名順で追加する。

use crate::error::{Result, SanitizerError};
use gmb_sanitizer_common::FileHandle;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

fn is_image_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// フォルダ直下の画像パスを列挙
pub fn scan_folder(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(SanitizerError::FolderNotFound(folder.display().to_string()));
    }

    let mut images: Vec<PathBuf> = WalkDir::new(folder)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && is_image_path(p))
        .collect();

    // ファイル名でソート
    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(images)
}

/// 1ファイルを読み込む
pub fn load_file(path: &Path) -> Result<FileHandle> {
    if !path.is_file() {
        return Err(SanitizerError::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "photo.jpg".to_string());
    Ok(FileHandle::new(name, content))
}

/// 引数のファイル・フォルダから送信対象を集める
pub fn collect_files(paths: &[PathBuf]) -> Result<Vec<FileHandle>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            let images = scan_folder(path)?;
            tracing::debug!(folder = %path.display(), count = images.len(), "scanned folder");
            for image in images {
                files.push(load_file(&image)?);
            }
        } else {
            files.push(load_file(path)?);
        }
    }

    Ok(files)
}
