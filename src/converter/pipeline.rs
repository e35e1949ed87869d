//! # 解码与合成流水线模块
//!
//! ## 设计思路
//!
//! 将“字节 → 图像 → 真彩画布”的过程集中管理。
//! 资源上限默认关闭；开启时在解码器读完头信息后、完整解码前按峰值内存估算检查。
//! 真正的内存不足由画布的可失败分配报告。
//!
//! ## 实现思路
//!
//! 1. 按内容识别的格式分派解码器
//! 2. 按源图尺寸分配 RGB8 画布（可失败分配）
//! 3. 整张画布铺背景色
//! 4. `fast_image_resize` 1:1 卷积重采样
//! 5. 按 alpha 合成到画布，透明像素落到背景色上

use std::io::Cursor;

use fast_image_resize as fr;
use image::codecs::{gif::GifDecoder, jpeg::JpegDecoder, png::PngDecoder};
use image::{ColorType, DynamicImage, GenericImageView, ImageDecoder, Rgb, RgbImage};

use super::source::{ComposedImage, SourceImage};
use super::{BackgroundColor, ConvertConfig, ConvertError, ImageConverter, ImageFormat};

impl ImageConverter {
    /// 按识别出的源格式解码为内存图像。
    pub(super) fn decode_source(
        &self,
        source: &SourceImage,
        config: &ConvertConfig,
    ) -> Result<DynamicImage, ConvertError> {
        let format = ImageFormat::from_image_format(source.detected)?;

        let cursor = Cursor::new(source.bytes.as_slice());
        let decoded = match format {
            ImageFormat::Gif => Self::decode_within_budget(GifDecoder::new(cursor), format, config),
            ImageFormat::Jpeg => Self::decode_within_budget(JpegDecoder::new(cursor), format, config),
            ImageFormat::Png => Self::decode_within_budget(PngDecoder::new(cursor), format, config),
        }?;

        log::debug!(
            "🖼️ 解码完成 - 格式: {} 尺寸: {}x{} 颜色: {:?}",
            format,
            decoded.width(),
            decoded.height(),
            decoded.color()
        );

        Ok(decoded)
    }

    /// 解码器读完头信息后先核对资源预算，再做完整解码。
    ///
    /// 颜色类型只有解码器知道（16 位 PNG 每像素 8 字节），预算因此放在这里而不是读取阶段。
    fn decode_within_budget<D: ImageDecoder>(
        decoder: image::ImageResult<D>,
        format: ImageFormat,
        config: &ConvertConfig,
    ) -> Result<DynamicImage, ConvertError> {
        let decoder = decoder.map_err(|e| Self::decode_failed(format, e))?;

        let (width, height) = decoder.dimensions();
        Self::check_decode_budget(config, width, height, decoder.color_type())?;

        DynamicImage::from_decoder(decoder).map_err(|e| Self::decode_failed(format, e))
    }

    fn decode_failed(format: ImageFormat, e: image::ImageError) -> ConvertError {
        ConvertError::InvalidImage(format!("{} 解码失败：{}", format, e))
    }

    /// 铺底色并把源图 1:1 合成到真彩画布上。
    pub(super) fn compose_onto_background(
        &self,
        decoded: DynamicImage,
        background: BackgroundColor,
        config: &ConvertConfig,
    ) -> Result<ComposedImage, ConvertError> {
        let (width, height) = decoded.dimensions();

        let mut canvas = Self::allocate_canvas(width, height)?;
        Self::paint_background(&mut canvas, background);

        let resampled = Self::resample_rgba(decoded, config)?;
        Self::composite_over(&mut canvas, &resampled)?;

        Ok(ComposedImage { canvas })
    }

    /// 分配与源图同尺寸的 RGB8 画布。
    ///
    /// 使用 `try_reserve_exact`，内存不足时返回错误而不是中止进程。
    fn allocate_canvas(width: u32, height: u32) -> Result<RgbImage, ConvertError> {
        if width == 0 || height == 0 {
            return Err(ConvertError::CanvasAllocationFailed(format!(
                "画布尺寸无效：{}x{}",
                width, height
            )));
        }

        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(3))
            .ok_or_else(|| {
                ConvertError::CanvasAllocationFailed(format!(
                    "画布尺寸导致内存溢出：{}x{}",
                    width, height
                ))
            })?;

        let mut raw: Vec<u8> = Vec::new();
        raw.try_reserve_exact(len).map_err(|e| {
            ConvertError::CanvasAllocationFailed(format!(
                "无法分配 {}x{} 画布：{}",
                width, height, e
            ))
        })?;
        raw.resize(len, 0);

        RgbImage::from_raw(width, height, raw).ok_or_else(|| {
            ConvertError::CanvasAllocationFailed("画布缓冲长度异常".to_string())
        })
    }

    fn paint_background(canvas: &mut RgbImage, background: BackgroundColor) {
        let fill = Rgb(background.rgb());
        for pixel in canvas.pixels_mut() {
            *pixel = fill;
        }
    }

    /// 使用 `fast_image_resize` 做同尺寸卷积重采样。
    ///
    /// U8x4 输入由 resizer 自行处理预乘 alpha。
    fn resample_rgba(
        decoded: DynamicImage,
        config: &ConvertConfig,
    ) -> Result<image::RgbaImage, ConvertError> {
        let src = decoded.into_rgba8();
        let (width, height) = src.dimensions();

        let src_image = fr::images::Image::from_vec_u8(
            width,
            height,
            src.into_raw(),
            fr::PixelType::U8x4,
        )
        .map_err(|e| ConvertError::CompositeFailed(format!("构建源图像缓冲失败：{}", e)))?;

        let mut dst_image = fr::images::Image::new(width, height, fr::PixelType::U8x4);

        let mut resizer = fr::Resizer::new();
        let options = fr::ResizeOptions::new().resize_alg(fr::ResizeAlg::Convolution(
            config.resample_filter.to_fast_filter(),
        ));

        resizer
            .resize(&src_image, &mut dst_image, Some(&options))
            .map_err(|e| ConvertError::CompositeFailed(format!("重采样执行失败：{}", e)))?;

        image::RgbaImage::from_raw(width, height, dst_image.into_vec()).ok_or_else(|| {
            ConvertError::CompositeFailed("重采样输出缓冲长度异常".to_string())
        })
    }

    /// `out = (src * a + bg * (255 - a)) / 255`，四舍五入。
    fn composite_over(
        canvas: &mut RgbImage,
        layer: &image::RgbaImage,
    ) -> Result<(), ConvertError> {
        if canvas.dimensions() != layer.dimensions() {
            return Err(ConvertError::CompositeFailed(format!(
                "画布与源图尺寸不一致：{:?} vs {:?}",
                canvas.dimensions(),
                layer.dimensions()
            )));
        }

        for (dst, src) in canvas.pixels_mut().zip(layer.pixels()) {
            let alpha = src[3] as u32;
            if alpha == 255 {
                *dst = Rgb([src[0], src[1], src[2]]);
                continue;
            }
            if alpha == 0 {
                continue;
            }

            for channel in 0..3 {
                let blended = src[channel] as u32 * alpha + dst[channel] as u32 * (255 - alpha);
                dst[channel] = ((blended + 127) / 255) as u8;
            }
        }

        Ok(())
    }

    /// 按配置中开启的上限核对像素数与峰值内存，均未开启时直接通过。
    fn check_decode_budget(
        config: &ConvertConfig,
        width: u32,
        height: u32,
        color: ColorType,
    ) -> Result<(), ConvertError> {
        let pixels = width as u64 * height as u64;

        if let Some(limit) = config.max_decoded_pixels.filter(|limit| pixels > *limit) {
            return Err(ConvertError::CanvasAllocationFailed(format!(
                "{}x{} 共 {} 像素，超过配置上限 {} 像素",
                width, height, pixels, limit
            )));
        }

        let Some(limit) = config.max_decoded_bytes else {
            return Ok(());
        };

        let peak = Self::peak_memory_estimate(width, height, color.bytes_per_pixel()).ok_or_else(
            || ConvertError::CanvasAllocationFailed(format!("{}x{} 内存估算溢出", width, height)),
        )?;

        if peak > limit {
            return Err(ConvertError::CanvasAllocationFailed(format!(
                "{}x{}（{:?}）预计峰值内存 {:.2} MB，超过配置上限 {:.2} MB",
                width,
                height,
                color,
                peak as f64 / 1024.0 / 1024.0,
                limit as f64 / 1024.0 / 1024.0
            )));
        }

        Ok(())
    }

    /// 解码到合成结束之间同时存活的像素缓冲总量（字节）。
    ///
    /// - 画布 RGB8：3 B/px，在 `into_rgba8` 之前分配
    /// - `into_rgba8`：解码结果 `bytes_per_pixel` 与 RGBA8 副本 4 B/px 同时存活
    /// - 重采样：RGBA8 源 4 B/px + RGBA8 目标 4 B/px
    ///
    /// 峰值为 `3 + max(bytes_per_pixel + 4, 8)`。编码后的源字节在解码后即释放，不计入。
    pub(super) fn peak_memory_estimate(width: u32, height: u32, bytes_per_pixel: u8) -> Option<u64> {
        let per_pixel = 3 + (bytes_per_pixel as u64 + 4).max(8);
        (width as u64)
            .checked_mul(height as u64)?
            .checked_mul(per_pixel)
    }
}
