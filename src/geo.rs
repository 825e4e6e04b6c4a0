//! 端末位置の取得

use crate::scanner;
use back_on_truck_common::LocationSample;
use std::fmt;
use std::path::PathBuf;

pub const UNSUPPORTED_MESSAGE: &str = "Geolocation is not supported by this browser.";

/// 位置取得の失敗理由
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    PermissionDenied,
    Unsupported,
    Timeout,
    Unavailable(String),
}

impl fmt::Display for LocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationError::PermissionDenied => write!(f, "User denied Geolocation"),
            LocationError::Unsupported => write!(f, "{}", UNSUPPORTED_MESSAGE),
            LocationError::Timeout => write!(f, "Timeout expired"),
            LocationError::Unavailable(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for LocationError {}

#[allow(async_fn_in_trait)]
pub trait Geolocator {
    async fn current_position(&self) -> Result<LocationSample, LocationError>;
}

/// 固定座標を返す
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub LocationSample);

impl Geolocator for FixedLocation {
    async fn current_position(&self) -> Result<LocationSample, LocationError> {
        Ok(self.0)
    }
}

/// 位置情報が使えない環境
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeolocation;

impl Geolocator for NoGeolocation {
    async fn current_position(&self) -> Result<LocationSample, LocationError> {
        Err(LocationError::Unsupported)
    }
}

/// 写真のEXIF GPSを端末位置の代わりに使う
#[derive(Debug, Clone)]
pub struct ExifLocation {
    pub photo: PathBuf,
}

impl ExifLocation {
    pub fn new(photo: impl Into<PathBuf>) -> Self {
        Self { photo: photo.into() }
    }
}

impl Geolocator for ExifLocation {
    async fn current_position(&self) -> Result<LocationSample, LocationError> {
        scanner::extract_location(&self.photo)
            .map_err(|e| LocationError::Unavailable(format!("{}: {}", self.photo.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_location() {
        let sample = LocationSample::new(12.95, 80.24).unwrap();
        let located = FixedLocation(sample).current_position().await.unwrap();
        assert_eq!(located, sample);
    }

    #[tokio::test]
    async fn test_no_geolocation_is_unsupported() {
        let err = NoGeolocation.current_position().await.unwrap_err();
        assert_eq!(err, LocationError::Unsupported);
        assert_eq!(err.to_string(), UNSUPPORTED_MESSAGE);
    }

    #[tokio::test]
    async fn test_exif_location_missing_file() {
        let err = ExifLocation::new("/nonexistent/photo.jpg")
            .current_position()
            .await
            .unwrap_err();
        assert!(matches!(err, LocationError::Unavailable(_)));
    }
}
