//! 画像圧縮パイプライン
//!
//! アップロード前に画像を固定幅へリサイズして再エンコードする。
//! - 幅は常に `max_width`、高さはアスペクト比を保って四捨五入
//! - 元画像が `max_width` より狭い場合も同じ式で拡大される
//! - PNG入力はPNGのまま、それ以外はJPEG（品質0.7）
//! - 出力の画素数が `max_pixels` を超える場合はエンコード失敗として扱う

pub mod batch;

use crate::error::{BackOnTruckError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::DynamicImage;

pub const DEFAULT_MAX_WIDTH: u32 = 800;
pub const DEFAULT_JPEG_QUALITY: f32 = 0.7;
/// 出力画素数の上限 (16384 x 16384)
pub const DEFAULT_MAX_PIXELS: u64 = 268_435_456;

pub const MIME_PNG: &str = "image/png";
pub const MIME_JPEG: &str = "image/jpeg";

/// 圧縮パラメータ
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressOptions {
    pub max_width: u32,
    /// 0.0〜1.0
    pub jpeg_quality: f32,
    /// リサイズ後の幅x高さの上限
    pub max_pixels: u64,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_WIDTH,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            max_pixels: DEFAULT_MAX_PIXELS,
        }
    }
}

impl CompressOptions {
    /// JPEGエンコーダ用の品質 (1-100)
    pub fn jpeg_quality_percent(&self) -> u8 {
        (self.jpeg_quality * 100.0).round().clamp(1.0, 100.0) as u8
    }
}

/// 出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg,
}

impl OutputFormat {
    /// 申告MIMEから出力形式を決める（PNGのみ維持）
    pub fn for_mime(mime_type: &str) -> Self {
        if mime_type.trim().eq_ignore_ascii_case(MIME_PNG) {
            OutputFormat::Png
        } else {
            OutputFormat::Jpeg
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Png => MIME_PNG,
            OutputFormat::Jpeg => MIME_JPEG,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
        }
    }
}

/// 圧縮結果
#[derive(Debug, Clone)]
pub struct CompressedImage {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
}

impl CompressedImage {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// リサイズ後の寸法を計算
///
/// `scale = max_width / source_width` をそのまま適用する（拡大も行う）。
pub fn target_dimensions(source_width: u32, source_height: u32, max_width: u32) -> (u32, u32) {
    let scale = max_width as f64 / source_width as f64;
    let height = (source_height as f64 * scale).round().max(1.0) as u32;
    (max_width, height)
}

/// 画像を圧縮する
pub fn compress_image(
    bytes: &[u8],
    mime_type: &str,
    options: &CompressOptions,
) -> Result<CompressedImage> {
    let source = image::load_from_memory(bytes)
        .map_err(|e| BackOnTruckError::ImageDecode(e.to_string()))?;

    let (width, height) = target_dimensions(source.width(), source.height(), options.max_width);
    log::debug!(
        "resize {}x{} -> {}x{} ({})",
        source.width(),
        source.height(),
        width,
        height,
        mime_type
    );

    // 縦長の画像は拡大でバッファが巨大になる
    let pixels = width as u64 * height as u64;
    if pixels > options.max_pixels {
        return Err(BackOnTruckError::ImageEncode(format!(
            "出力サイズが大きすぎます: {}x{} ({}画素, 上限{})",
            width, height, pixels, options.max_pixels
        )));
    }

    let resized = source.resize_exact(width, height, FilterType::Triangle);
    let format = OutputFormat::for_mime(mime_type);
    let bytes = encode(&resized, format, options)?;

    if bytes.is_empty() {
        return Err(BackOnTruckError::ImageEncode("出力が空です".into()));
    }

    Ok(CompressedImage {
        bytes,
        format,
        width,
        height,
    })
}

fn encode(image: &DynamicImage, format: OutputFormat, options: &CompressOptions) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();

    match format {
        OutputFormat::Png => {
            let encoder = PngEncoder::new(&mut buffer);
            image
                .write_with_encoder(encoder)
                .map_err(|e| BackOnTruckError::ImageEncode(e.to_string()))?;
        }
        OutputFormat::Jpeg => {
            // JPEGはアルファを持てない
            let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
            let encoder = JpegEncoder::new_with_quality(&mut buffer, options.jpeg_quality_percent());
            rgb.write_with_encoder(encoder)
                .map_err(|e| BackOnTruckError::ImageEncode(e.to_string()))?;
        }
    }

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([200, 40, 40, 255]));
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_target_dimensions_downscale() {
        assert_eq!(target_dimensions(1600, 1200, 800), (800, 600));
        assert_eq!(target_dimensions(3000, 1000, 800), (800, 267));
    }

    #[test]
    fn test_target_dimensions_upscale_small_source() {
        assert_eq!(target_dimensions(400, 300, 800), (800, 600));
    }

    #[test]
    fn test_target_dimensions_minimum_height() {
        assert_eq!(target_dimensions(10_000, 1, 800), (800, 1));
    }

    #[test]
    fn test_output_format_for_mime() {
        assert_eq!(OutputFormat::for_mime("image/png"), OutputFormat::Png);
        assert_eq!(OutputFormat::for_mime("IMAGE/PNG"), OutputFormat::Png);
        assert_eq!(OutputFormat::for_mime("image/jpeg"), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::for_mime("image/webp"), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::for_mime(""), OutputFormat::Jpeg);
    }

    #[test]
    fn test_quality_percent() {
        assert_eq!(CompressOptions::default().jpeg_quality_percent(), 70);
        let opts = CompressOptions { jpeg_quality: 0.0, ..Default::default() };
        assert_eq!(opts.jpeg_quality_percent(), 1);
    }

    #[test]
    fn test_png_stays_png() {
        let out = compress_image(&png_bytes(1000, 500), "image/png", &CompressOptions::default())
            .unwrap();
        assert_eq!(out.format, OutputFormat::Png);
        assert_eq!((out.width, out.height), (800, 400));
        assert_eq!(image::guess_format(&out.bytes).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn test_declared_jpeg_becomes_jpeg_even_if_bytes_are_png() {
        let out = compress_image(&png_bytes(1000, 500), "image/jpeg", &CompressOptions::default())
            .unwrap();
        assert_eq!(out.mime_type(), "image/jpeg");
        assert_eq!(image::guess_format(&out.bytes).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_oversized_target_is_encode_error() {
        // 1x100000 → 800x80000000
        let err = compress_image(&png_bytes(1, 100_000), "image/jpeg", &CompressOptions::default())
            .unwrap_err();
        assert!(matches!(err, BackOnTruckError::ImageEncode(_)));
    }

    #[test]
    fn test_pixel_limit_is_inclusive() {
        let opts = CompressOptions { max_pixels: 800 * 400, ..Default::default() };
        let out = compress_image(&png_bytes(1000, 500), "image/png", &opts).unwrap();
        assert_eq!((out.width, out.height), (800, 400));

        let opts = CompressOptions { max_pixels: 800 * 400 - 1, ..Default::default() };
        let err = compress_image(&png_bytes(1000, 500), "image/png", &opts).unwrap_err();
        assert!(matches!(err, BackOnTruckError::ImageEncode(_)));
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let err = compress_image(b"not an image", "image/jpeg", &CompressOptions::default())
            .unwrap_err();
        assert!(matches!(err, BackOnTruckError::ImageDecode(_)));
    }
}
