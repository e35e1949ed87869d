//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `ImageConverter` 只负责流程编排与配置持有，本身无可变状态，可跨线程共享。
//! 处理链路固定为：
//! 1. 读取并校验源文件
//! 2. 解析目标路径与格式，确保目录存在
//! 3. 解码
//! 4. 分配画布、铺底色、重采样合成
//! 5. 编码并原子写入
//!
//! ## 实现思路
//!
//! - 每一步都用 `?` 直接上抛，不做重试。
//! - 记录 `load/decode/compose/encode/write/total` 阶段耗时，便于性能诊断。

use std::path::{Path, PathBuf};
use std::time::Instant;

use super::{BackgroundColor, ConversionRequest, ConvertConfig, ConvertError, Target};

/// 图片转换器。
pub struct ImageConverter {
    config: ConvertConfig,
}

impl ImageConverter {
    /// 根据配置创建转换器，配置非法时返回 `InvalidConfig`。
    ///
    /// # 示例
    /// ```rust
    /// use image_converter::converter::{ConvertConfig, ImageConverter};
    ///
    /// let converter = ImageConverter::new(ConvertConfig::default())?;
    /// assert_eq!(converter.config().jpeg_quality, 100);
    /// # Ok::<(), image_converter::converter::ConvertError>(())
    /// ```
    pub fn new(config: ConvertConfig) -> Result<Self, ConvertError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// 处理主入口：执行一次完整转换，返回实际写入的目标路径。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use image_converter::converter::{BackgroundColor, ConversionRequest, ConvertConfig, ImageConverter};
    ///
    /// let converter = ImageConverter::new(ConvertConfig::default())?;
    /// let request = ConversionRequest::new("/home/gs/my_png.png", "jpeg")
    ///     .with_background(BackgroundColor::BLACK);
    /// let written = converter.convert(&request)?;
    /// println!("{}", written.display());
    /// # Ok::<(), image_converter::converter::ConvertError>(())
    /// ```
    pub fn convert(&self, request: &ConversionRequest) -> Result<PathBuf, ConvertError> {
        let config = &self.config;
        let total_start = Instant::now();

        let load_start = Instant::now();
        let source = self.load_source(&request.source, config)?;
        let load_elapsed = load_start.elapsed();

        let (destination, format) = Self::resolve_destination(&request.source, &request.target)?;
        Self::ensure_destination_dir(&destination, config)?;

        let decode_start = Instant::now();
        let decoded = self.decode_source(&source, config)?;
        drop(source);
        let decode_elapsed = decode_start.elapsed();

        let compose_start = Instant::now();
        let composed = self.compose_onto_background(decoded, request.background, config)?;
        let compose_elapsed = compose_start.elapsed();

        let encode_start = Instant::now();
        let bytes = self.encode_canvas(&composed, format, config)?;
        drop(composed);
        let encode_elapsed = encode_start.elapsed();

        let write_start = Instant::now();
        self.write_atomically(&destination, &bytes, config)?;
        let write_elapsed = write_start.elapsed();

        log::info!(
            "✅ 图片转换完成 - {} -> {}（{}，背景 {}）load={}ms decode={}ms compose={}ms encode={}ms write={}ms total={}ms",
            request.source.display(),
            destination.display(),
            format,
            request.background,
            load_elapsed.as_millis(),
            decode_elapsed.as_millis(),
            compose_elapsed.as_millis(),
            encode_elapsed.as_millis(),
            write_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );

        Ok(destination)
    }
}

/// 使用默认配置执行一次转换。
///
/// `target` 为 `gif` / `jpeg` / `png` 时原地换扩展名，否则视为目标文件路径；
/// `background` 为 `None` 时使用白色。
///
/// # 示例
/// ```rust,no_run
/// use image_converter::converter::convert;
///
/// convert("/home/gs/my_png.png", "jpeg", None)?;
/// convert("/home/gs/my_png.png", "/home/gs/new/my_new_file.jpeg", Some([0, 0, 0].into()))?;
/// # Ok::<(), image_converter::converter::ConvertError>(())
/// ```
pub fn convert(
    source: impl AsRef<Path>,
    target: &str,
    background: Option<BackgroundColor>,
) -> Result<PathBuf, ConvertError> {
    let converter = ImageConverter::new(ConvertConfig::default())?;
    let request = ConversionRequest::new(source, Target::parse(target))
        .with_background(background.unwrap_or_default());
    converter.convert(&request)
}
