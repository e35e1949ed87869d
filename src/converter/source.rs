//! # 请求与中间模型
//!
//! ## 设计思路
//!
//! 将“外部输入语义”和“流水线中间结果”解耦：
//! - `Target` / `ConversionRequest` 表示调用方的意图
//! - `SourceImage` 表示已读取、已校验但未解码的源文件
//! - `ComposedImage` 表示已铺底色、可直接编码的真彩画布

use std::path::{Path, PathBuf};

use image::RgbImage;

use super::{BackgroundColor, ImageFormat};

/// 转换目标。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// 裸格式名：同目录、同文件名，仅替换扩展名。
    Format(ImageFormat),
    /// 显式目标路径：格式由扩展名决定。
    Path(PathBuf),
}

impl Target {
    /// 解析目标写法。
    ///
    /// 只有 `gif` / `jpeg` / `png` 三个字面量被当作格式名，其余一律视为路径。
    ///
    /// # 示例
    /// ```rust
    /// use image_converter::converter::{ImageFormat, Target};
    ///
    /// assert_eq!(Target::parse("gif"), Target::Format(ImageFormat::Gif));
    /// assert_eq!(Target::parse("out/a.gif"), Target::Path("out/a.gif".into()));
    /// ```
    pub fn parse(target: &str) -> Self {
        match ImageFormat::from_name(target) {
            Some(format) => Self::Format(format),
            None => Self::Path(PathBuf::from(target)),
        }
    }
}

impl From<ImageFormat> for Target {
    fn from(format: ImageFormat) -> Self {
        Self::Format(format)
    }
}

impl From<&str> for Target {
    fn from(target: &str) -> Self {
        Self::parse(target)
    }
}

/// 一次转换请求。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub source: PathBuf,
    pub target: Target,
    pub background: BackgroundColor,
}

impl ConversionRequest {
    pub fn new(source: impl AsRef<Path>, target: impl Into<Target>) -> Self {
        Self {
            source: source.as_ref().to_path_buf(),
            target: target.into(),
            background: BackgroundColor::default(),
        }
    }

    pub fn with_background(mut self, background: impl Into<BackgroundColor>) -> Self {
        self.background = background.into();
        self
    }
}

/// 读取阶段输出：源文件字节与头信息。
pub(crate) struct SourceImage {
    /// 原始文件字节。
    pub(crate) bytes: Vec<u8>,
    /// 从内容识别出的格式（可能不在支持集合内，解码阶段再判定）。
    pub(crate) detected: image::ImageFormat,
    /// 头信息中的宽度。
    pub(crate) width: u32,
    /// 头信息中的高度。
    pub(crate) height: u32,
}

/// 合成阶段输出：与源图同尺寸的不透明真彩画布。
pub(crate) struct ComposedImage {
    pub(crate) canvas: RgbImage,
}
