//! # 编码与落盘模块
//!
//! ## 设计思路
//!
//! 先把画布完整编码到内存，再写入同目录的临时文件并原子重命名到目标路径。
//! 任一步失败时临时文件随 `NamedTempFile` 析构被删除，目标路径不会出现半截文件。
//!
//! ## 编码策略
//!
//! - GIF：`gif` 编码器内置的 NeuQuant 量化生成调色板，速度由 `gif_speed` 控制
//! - JPEG：质量 `jpeg_quality`（默认 100）
//! - PNG：最高压缩 + 自适应滤波

use std::io::Write;
use std::path::Path;

use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, RgbImage};

use super::source::ComposedImage;
use super::{ConvertConfig, ConvertError, ImageConverter, ImageFormat};

impl ImageConverter {
    /// 按目标格式把画布编码为字节。
    pub(super) fn encode_canvas(
        &self,
        composed: &ComposedImage,
        format: ImageFormat,
        config: &ConvertConfig,
    ) -> Result<Vec<u8>, ConvertError> {
        let canvas = &composed.canvas;
        let result = match format {
            ImageFormat::Gif => Self::encode_gif(canvas, config.gif_speed),
            ImageFormat::Jpeg => Self::encode_jpeg(canvas, config.jpeg_quality),
            ImageFormat::Png => Self::encode_png(canvas),
        };

        let bytes = result.map_err(|e| {
            ConvertError::EncodeFailed(format!(
                "{} 编码失败（{}x{}）：{}",
                format,
                canvas.width(),
                canvas.height(),
                e
            ))
        })?;

        log::debug!(
            "🗜️ 编码完成 - 格式: {} 大小: {}KB",
            format.mime_type(),
            bytes.len() / 1024
        );
        Ok(bytes)
    }

    fn encode_gif(canvas: &RgbImage, speed: i32) -> image::ImageResult<Vec<u8>> {
        let mut buffer = Vec::new();
        {
            // 析构时写入 GIF trailer。
            let mut encoder = GifEncoder::new_with_speed(&mut buffer, speed);
            encoder.encode(
                canvas.as_raw(),
                canvas.width(),
                canvas.height(),
                ExtendedColorType::Rgb8,
            )?;
        }
        Ok(buffer)
    }

    fn encode_jpeg(canvas: &RgbImage, quality: u8) -> image::ImageResult<Vec<u8>> {
        let mut buffer = Vec::new();
        JpegEncoder::new_with_quality(&mut buffer, quality).write_image(
            canvas.as_raw(),
            canvas.width(),
            canvas.height(),
            ExtendedColorType::Rgb8,
        )?;
        Ok(buffer)
    }

    fn encode_png(canvas: &RgbImage) -> image::ImageResult<Vec<u8>> {
        let mut buffer = Vec::new();
        PngEncoder::new_with_quality(&mut buffer, CompressionType::Best, FilterType::Adaptive)
            .write_image(
                canvas.as_raw(),
                canvas.width(),
                canvas.height(),
                ExtendedColorType::Rgb8,
            )?;
        Ok(buffer)
    }

    /// 临时文件 + 原子重命名写入目标路径，已存在的目标会被覆盖。
    pub(super) fn write_atomically(
        &self,
        destination: &Path,
        bytes: &[u8],
        config: &ConvertConfig,
    ) -> Result<(), ConvertError> {
        let dir = match destination.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };

        let mut builder = tempfile::Builder::new();
        builder.prefix(".image-converter-").suffix(".tmp");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(std::fs::Permissions::from_mode(config.file_mode));
        }
        #[cfg(not(unix))]
        let _ = config;

        let mut temp = builder.tempfile_in(dir).map_err(|e| {
            ConvertError::WriteFailed(format!("无法在 {} 创建临时文件：{}", dir.display(), e))
        })?;

        temp.write_all(bytes)
            .and_then(|_| temp.as_file().sync_all())
            .map_err(|e| {
                ConvertError::WriteFailed(format!(
                    "写入临时文件失败：{}（{}）",
                    temp.path().display(),
                    e
                ))
            })?;

        temp.persist(destination).map_err(|e| {
            ConvertError::WriteFailed(format!(
                "无法写入目标文件：{}（{}）",
                destination.display(),
                e.error
            ))
        })?;

        Ok(())
    }
}
