//! # 格式模型
//!
//! 支持的栅格格式是一个封闭集合（GIF / JPEG / PNG），
//! 解码与编码都按 `ImageFormat` 做 `match` 分派，不引入动态分派。
//!
//! 注意两种识别方式的不对称：
//! - 源格式从文件内容识别（见 `from_image_format`）；
//! - 目标格式只看名字或扩展名（见 `from_name` / `from_extension`）。

use std::fmt;
use std::path::Path;

use super::ConvertError;

/// 支持的栅格格式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Gif,
    Jpeg,
    Png,
}

impl ImageFormat {
    pub const ALL: [ImageFormat; 3] = [Self::Gif, Self::Jpeg, Self::Png];

    /// 匹配“裸格式名”目标写法，区分大小写，只接受 `gif` / `jpeg` / `png`。
    ///
    /// # 示例
    /// ```rust
    /// use image_converter::converter::ImageFormat;
    ///
    /// assert_eq!(ImageFormat::from_name("png"), Some(ImageFormat::Png));
    /// assert_eq!(ImageFormat::from_name("jpg"), None);
    /// assert_eq!(ImageFormat::from_name("PNG"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "gif" => Some(Self::Gif),
            "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    /// 从扩展名解析目标格式（不区分大小写，`jpg` 视同 `jpeg`）。
    pub fn from_extension(extension: &str) -> Result<Self, ConvertError> {
        match extension.to_ascii_lowercase().as_str() {
            "gif" => Ok(Self::Gif),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            other => Err(ConvertError::UnsupportedFormat(format!(
                "未知目标扩展名：{}（可选：gif / jpeg / jpg / png）",
                other
            ))),
        }
    }

    /// 从目标路径的扩展名解析格式。
    pub fn from_path(path: &Path) -> Result<Self, ConvertError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                ConvertError::UnsupportedFormat(format!(
                    "目标路径缺少扩展名：{}",
                    path.display()
                ))
            })?;

        Self::from_extension(extension).map_err(|_| {
            ConvertError::UnsupportedFormat(format!(
                "目标路径扩展名不受支持：{}",
                path.display()
            ))
        })
    }

    /// 将内容识别出的格式映射到受支持集合。
    pub fn from_image_format(format: image::ImageFormat) -> Result<Self, ConvertError> {
        match format {
            image::ImageFormat::Gif => Ok(Self::Gif),
            image::ImageFormat::Jpeg => Ok(Self::Jpeg),
            image::ImageFormat::Png => Ok(Self::Png),
            other => Err(ConvertError::UnsupportedFormat(format!(
                "检测到的源格式不受支持：{:?}",
                other
            ))),
        }
    }

    pub fn to_image_format(self) -> image::ImageFormat {
        match self {
            Self::Gif => image::ImageFormat::Gif,
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Png => image::ImageFormat::Png,
        }
    }

    /// 规范扩展名，用于“原地转换”时拼接新文件名。
    pub fn extension(self) -> &'static str {
        match self {
            Self::Gif => "gif",
            Self::Jpeg => "jpeg",
            Self::Png => "png",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Gif => "image/gif",
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_names_are_case_sensitive() {
        assert_eq!(ImageFormat::from_name("gif"), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::from_name("jpeg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_name("Jpeg"), None);
        assert_eq!(ImageFormat::from_name("jpg"), None);
        assert_eq!(ImageFormat::from_name(""), None);
    }

    #[test]
    fn extension_lookup_accepts_jpg_and_mixed_case() {
        assert_eq!(ImageFormat::from_extension("JPG").ok(), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension("Png").ok(), Some(ImageFormat::Png));
        assert!(matches!(
            ImageFormat::from_extension("bmp"),
            Err(ConvertError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn path_without_extension_is_unsupported() {
        let result = ImageFormat::from_path(Path::new("/tmp/out/noext"));
        assert!(matches!(result, Err(ConvertError::UnsupportedFormat(_))));
    }

    #[test]
    fn detected_formats_outside_the_set_are_rejected() {
        assert_eq!(
            ImageFormat::from_image_format(image::ImageFormat::Png).ok(),
            Some(ImageFormat::Png)
        );
        assert!(matches!(
            ImageFormat::from_image_format(image::ImageFormat::Bmp),
            Err(ConvertError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            ImageFormat::from_image_format(image::ImageFormat::WebP),
            Err(ConvertError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn image_format_mapping_is_consistent() {
        for format in ImageFormat::ALL {
            let mapped = ImageFormat::from_image_format(format.to_image_format()).ok();
            assert_eq!(mapped, Some(format));
            assert_eq!(ImageFormat::from_name(format.extension()), Some(format));
        }
    }
}
