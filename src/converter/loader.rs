//! # 读取与校验模块
//!
//! ## 设计思路
//!
//! 在“尽可能早”的阶段执行源文件校验，尽快失败：
//! 存在性 → metadata 体积限制（可选） → 读取 → 文件签名 → 头信息尺寸。
//! 源格式完全依据内容识别，与文件扩展名无关。

use std::io::Cursor;
use std::path::Path;

use super::source::SourceImage;
use super::{ConvertError, ConvertConfig, ImageConverter};

impl ImageConverter {
    /// 读取并校验源文件。
    pub(super) fn load_source(
        &self,
        path: &Path,
        config: &ConvertConfig,
    ) -> Result<SourceImage, ConvertError> {
        log::debug!("📁 开始读取源图片 - 路径: {}", path.display());

        let metadata = std::fs::metadata(path).map_err(|e| {
            ConvertError::InvalidImage(format!("无法读取文件信息：{}（{}）", path.display(), e))
        })?;

        if !metadata.is_file() {
            return Err(ConvertError::InvalidImage(format!(
                "源路径不是文件：{}",
                path.display()
            )));
        }

        if let Some(limit) = config.max_file_size.filter(|limit| metadata.len() > *limit) {
            return Err(ConvertError::InvalidImage(format!(
                "文件过大：{}，{:.2} MB（限制：{:.2} MB）",
                path.display(),
                metadata.len() as f64 / 1024.0 / 1024.0,
                limit as f64 / 1024.0 / 1024.0
            )));
        }

        let bytes = std::fs::read(path).map_err(|e| {
            ConvertError::InvalidImage(format!("无法读取图片文件：{}（{}）", path.display(), e))
        })?;

        Self::validate_image_signature(path, &bytes)?;
        let (detected, width, height) = Self::inspect_header(path, &bytes)?;

        log::debug!(
            "🔍 源图片识别完成 - 格式: {:?} 尺寸: {}x{}",
            detected,
            width,
            height
        );

        Ok(SourceImage {
            bytes,
            detected,
            width,
            height,
        })
    }

    /// 校验文件签名是否为图片类型。
    fn validate_image_signature(path: &Path, bytes: &[u8]) -> Result<(), ConvertError> {
        if bytes.is_empty() {
            return Err(ConvertError::InvalidImage(format!(
                "图片内容为空：{}",
                path.display()
            )));
        }

        let kind = infer::get(bytes).ok_or_else(|| {
            ConvertError::InvalidImage(format!("无法识别图片类型：{}", path.display()))
        })?;

        if kind.matcher_type() != infer::MatcherType::Image {
            return Err(ConvertError::InvalidImage(format!(
                "文件签名不是图片类型：{}（{}）",
                path.display(),
                kind.mime_type()
            )));
        }

        Ok(())
    }

    /// 仅通过图片头信息读取格式与宽高，不做完整解码。
    fn inspect_header(
        path: &Path,
        bytes: &[u8],
    ) -> Result<(image::ImageFormat, u32, u32), ConvertError> {
        let reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| {
                ConvertError::InvalidImage(format!("无法识别图片格式：{}（{}）", path.display(), e))
            })?;

        let detected = reader.format().ok_or_else(|| {
            ConvertError::InvalidImage(format!("无法识别图片格式：{}", path.display()))
        })?;

        let (width, height) = reader.into_dimensions().map_err(|e| {
            ConvertError::InvalidImage(format!("无法读取图片尺寸：{}（{}）", path.display(), e))
        })?;

        Ok((detected, width, height))
    }
}
