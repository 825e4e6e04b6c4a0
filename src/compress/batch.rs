//! フォルダ一括圧縮（CLI用）

use super::{compress_image, CompressOptions, CompressedImage};
use crate::error::Result;
use crate::scanner::{self, ImageInfo};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// 1ファイル分の結果
#[derive(Debug)]
pub struct BatchEntry {
    pub source: PathBuf,
    pub result: Result<PathBuf>,
}

/// 1ファイルを圧縮して出力フォルダへ書き出す
pub fn compress_file(info: &ImageInfo, output_dir: &Path, options: &CompressOptions) -> Result<PathBuf> {
    let bytes = std::fs::read(&info.path)?;
    let compressed = compress_image(&bytes, &info.mime_type, options)?;
    let output_path = output_path_for(&info.path, output_dir, &compressed);
    std::fs::write(&output_path, &compressed.bytes)?;
    Ok(output_path)
}

fn output_path_for(source: &Path, output_dir: &Path, compressed: &CompressedImage) -> PathBuf {
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    output_dir.join(format!("{}.{}", stem, compressed.format.extension()))
}

/// フォルダ内の画像を並列に圧縮する
///
/// 個々の失敗は `BatchEntry::result` に残し、バッチ全体は止めない。
pub fn compress_folder(folder: &Path, output_dir: &Path, options: &CompressOptions) -> Result<Vec<BatchEntry>> {
    let images = scanner::scan_folder(folder)?;
    std::fs::create_dir_all(output_dir)?;

    let entries = images
        .par_iter()
        .map(|info| BatchEntry {
            source: info.path.clone(),
            result: compress_file(info, output_dir, options),
        })
        .collect();

    Ok(entries)
}
