//! セッションで扱う型の定義
//!
//! - Notification: ホストのトースト表示へ渡す通知
//! - LocationSample: 端末から取得した緯度経度
//! - UploadedFileRef: アップロード手続きが返すファイルID

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 通知の重要度（トーストのvariant）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Success,
    Error,
    Warning,
    Info,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Success => write!(f, "success"),
            Variant::Error => write!(f, "error"),
            Variant::Warning => write!(f, "warning"),
            Variant::Info => write!(f, "info"),
        }
    }
}

/// トースト通知 {title, message, variant}
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub variant: Variant,
}

impl Notification {
    pub fn new(title: impl Into<String>, message: impl Into<String>, variant: Variant) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            variant,
        }
    }

    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(title, message, Variant::Success)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(title, message, Variant::Error)
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(title, message, Variant::Warning)
    }

    pub fn is_error(&self) -> bool {
        self.variant == Variant::Error
    }
}

/// 緯度経度のペア
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationSample {
    pub latitude: f64,
    pub longitude: f64,
}

impl LocationSample {
    /// 範囲外（緯度±90、経度±180）や非数値は拒否する
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        if !valid {
            return Err(Error::InvalidCoordinates { latitude, longitude });
        }
        Ok(Self { latitude, longitude })
    }

    /// `{lat}` / `{lon}` を置換して地図URLを作る（URLとしての検証はしない）
    pub fn map_url(&self, template: &str) -> String {
        template
            .replace("{lat}", &self.latitude.to_string())
            .replace("{lon}", &self.longitude.to_string())
    }
}

/// アップロード手続きが返す不透明なファイルID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UploadedFileRef(pub String);

impl UploadedFileRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UploadedFileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for UploadedFileRef {
    fn from(id: String) -> Self {
        Self(id)
    }
}
