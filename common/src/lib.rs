//! Back-on-truck Common Library
//!
//! セッション本体とホスト連携アダプタで共有される型とユーティリティ

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{LocationSample, Notification, UploadedFileRef, Variant};
