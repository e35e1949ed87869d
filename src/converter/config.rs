//! # 配置模块
//!
//! ## 设计思路
//!
//! 将所有“可调策略”集中到 `ConvertConfig`，保证转换行为可观测、可调整、可测试。
//! 默认值即生产行为：JPEG 质量 100、PNG 最高压缩、目录权限 0700。
//!
//! ## 实现思路
//!
//! - `Default` 即生产默认值（最高保真）。
//! - `#[serde(default)]` 允许配置文件只写部分字段。
//! - `validate` 在构造 `ImageConverter` 时统一做范围校验。
//! - 资源上限默认关闭（`None`）：任何可解码的 GIF/JPEG/PNG 都应能转换，
//!   内存真正不足时由画布的可失败分配报告 `CanvasAllocationFailed`。
//!   嵌入到受限环境时再按需开启。

use fast_image_resize as fr;
use serde::{Deserialize, Serialize};

use super::ConvertError;

/// 开启内存上限时允许的最小值。
const MIN_DECODED_BYTES: u64 = 8 * 1024 * 1024;

/// 图片转换配置。
///
/// 字段覆盖了读取、解码、重采样、编码与落盘五个阶段。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// 源文件允许的最大体积（字节），`None` 表示不限制。
    pub max_file_size: Option<u64>,
    /// 像素上限（`width * height`），`None` 表示不限制。
    pub max_decoded_pixels: Option<u64>,
    /// 解码 + 合成阶段的峰值内存上限（字节），`None` 表示不限制。
    ///
    /// 估算方式见 `ImageConverter::peak_memory_estimate`。
    pub max_decoded_bytes: Option<u64>,
    /// 1:1 重采样使用的卷积滤镜。
    pub resample_filter: ResampleFilter,
    /// JPEG 编码质量（1~100）。
    pub jpeg_quality: u8,
    /// GIF 调色板量化速度（1~30，越小质量越高）。
    pub gif_speed: i32,
    /// 新建目标目录的权限位（仅 unix 生效）。
    pub dir_mode: u32,
    /// 输出文件的权限位（仅 unix 生效）。
    pub file_mode: u32,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            max_file_size: None,
            max_decoded_pixels: None,
            max_decoded_bytes: None,
            resample_filter: ResampleFilter::CatmullRom,
            jpeg_quality: 100,
            gif_speed: 10,
            dir_mode: 0o700,
            file_mode: 0o644,
        }
    }
}

/// 重采样滤镜。
///
/// 只提供插值型滤镜，不提供最近邻。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResampleFilter {
    Box,
    Bilinear,
    CatmullRom,
    Mitchell,
    Lanczos3,
}

impl ResampleFilter {
    pub(crate) fn to_fast_filter(self) -> fr::FilterType {
        match self {
            Self::Box => fr::FilterType::Box,
            Self::Bilinear => fr::FilterType::Bilinear,
            Self::CatmullRom => fr::FilterType::CatmullRom,
            Self::Mitchell => fr::FilterType::Mitchell,
            Self::Lanczos3 => fr::FilterType::Lanczos3,
        }
    }
}

impl ConvertConfig {
    /// 校验各字段范围。
    ///
    /// # 示例
    /// ```rust
    /// use image_converter::converter::ConvertConfig;
    ///
    /// let mut config = ConvertConfig::default();
    /// config.jpeg_quality = 0;
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ConvertError> {
        if self.max_file_size == Some(0) {
            return Err(ConvertError::InvalidConfig("max_file_size 不能为 0".to_string()));
        }
        if self.max_decoded_pixels == Some(0) {
            return Err(ConvertError::InvalidConfig("max_decoded_pixels 不能为 0".to_string()));
        }
        if self.max_decoded_bytes.is_some_and(|bytes| bytes < MIN_DECODED_BYTES) {
            return Err(ConvertError::InvalidConfig("max_decoded_bytes 不能小于 8MB".to_string()));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ConvertError::InvalidConfig("jpeg_quality 必须在 1~100 之间".to_string()));
        }
        if !(1..=30).contains(&self.gif_speed) {
            return Err(ConvertError::InvalidConfig("gif_speed 必须在 1~30 之间".to_string()));
        }
        if self.dir_mode > 0o777 {
            return Err(ConvertError::InvalidConfig(format!(
                "dir_mode 超出范围：{:o}",
                self.dir_mode
            )));
        }
        if self.file_mode > 0o777 {
            return Err(ConvertError::InvalidConfig(format!(
                "file_mode 超出范围：{:o}",
                self.file_mode
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ConvertConfig::default();
        config.validate().expect("default config should be valid");
        assert_eq!(config.jpeg_quality, 100);
        assert_eq!(config.dir_mode, 0o700);
    }

    #[test]
    fn resource_limits_are_off_by_default() {
        let config = ConvertConfig::default();
        assert_eq!(config.max_file_size, None);
        assert_eq!(config.max_decoded_pixels, None);
        assert_eq!(config.max_decoded_bytes, None);
    }

    #[test]
    fn resource_limits_can_be_enabled_from_json() {
        let config: ConvertConfig = serde_json::from_str(
            r#"{ "max_decoded_pixels": 40000000, "max_decoded_bytes": 167772160 }"#,
        )
        .expect("limit config should parse");

        assert_eq!(config.max_decoded_pixels, Some(40_000_000));
        assert_eq!(config.max_decoded_bytes, Some(160 * 1024 * 1024));
        assert_eq!(config.max_file_size, None);
        config.validate().expect("enabled limits should be valid");
    }

    #[test]
    fn rejects_out_of_range_values() {
        let cases: [fn(&mut ConvertConfig); 7] = [
            |c| c.max_file_size = Some(0),
            |c| c.max_decoded_pixels = Some(0),
            |c| c.max_decoded_bytes = Some(1024),
            |c| c.jpeg_quality = 0,
            |c| c.gif_speed = 31,
            |c| c.dir_mode = 0o1777,
            |c| c.file_mode = 0o7777,
        ];

        for mutate in cases {
            let mut config = ConvertConfig::default();
            mutate(&mut config);
            assert!(matches!(config.validate(), Err(ConvertError::InvalidConfig(_))));
        }
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: ConvertConfig =
            serde_json::from_str(r#"{ "jpeg_quality": 85, "resample_filter": "lanczos3" }"#)
                .expect("partial config should parse");

        assert_eq!(config.jpeg_quality, 85);
        assert_eq!(config.resample_filter, ResampleFilter::Lanczos3);
        assert_eq!(config.gif_speed, ConvertConfig::default().gif_speed);
    }
}
