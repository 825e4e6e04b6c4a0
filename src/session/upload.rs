//! アップロード待ち行列
//!
//! ファイル内容のSHA-256をキーにして、同じファイルの二重アップロードを防ぐ。

use crate::compress::{compress_image, CompressOptions};
use crate::error::{BackOnTruckError, Result};
use crate::scanner;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha256};
use std::collections::{HashSet, VecDeque};
use std::path::Path;

/// ファイル選択イベントの1ファイル
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let info = scanner::image_info(path)?;
        let bytes = std::fs::read(&info.path)?;
        Ok(Self::new(info.file_name, info.mime_type, bytes))
    }

    pub fn content_key(&self) -> String {
        hex::encode(Sha256::digest(&self.bytes))
    }
}

/// アップロード手続きに渡す形
#[derive(Debug, Clone)]
pub struct PreparedUpload {
    pub file_name: String,
    pub file_type: String,
    pub base64_data: String,
}

/// 圧縮してbase64化する
pub fn prepare_upload(file: &SelectedFile, options: &CompressOptions) -> Result<PreparedUpload> {
    let compressed = compress_image(&file.bytes, &file.mime_type, options)?;
    log::debug!(
        "{}: {} bytes -> {} bytes",
        file.file_name,
        file.bytes.len(),
        compressed.bytes.len()
    );

    Ok(PreparedUpload {
        file_name: file.file_name.clone(),
        file_type: compressed.mime_type().to_string(),
        base64_data: STANDARD.encode(&compressed.bytes),
    })
}

#[derive(Debug, Default)]
pub(crate) struct UploadQueue {
    pending: VecDeque<(String, SelectedFile)>,
    /// 待機中とアップロード済みのキー
    keys: HashSet<String>,
}

impl UploadQueue {
    pub(crate) fn push(&mut self, file: SelectedFile) -> Result<()> {
        let key = file.content_key();
        if !self.keys.insert(key.clone()) {
            return Err(BackOnTruckError::DuplicateFile(file.file_name));
        }
        self.pending.push_back((key, file));
        Ok(())
    }

    pub(crate) fn pop(&mut self) -> Option<(String, SelectedFile)> {
        self.pending.pop_front()
    }

    /// 失敗したファイルを再選択できるようにする
    pub(crate) fn release(&mut self, key: &str) {
        self.keys.remove(key);
    }

    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }
}
