//! # 图片格式转换模块（converter）
//!
//! ## 设计思路
//!
//! 该模块将“源文件校验 → 目标解析 → 解码 → 铺底色合成 → 编码落盘”
//! 按职责拆分为多个子模块，避免单文件膨胀与耦合。
//!
//! - `handler`：编排整条处理流水线，提供 `convert` 入口
//! - `loader`：源文件读取、体积与签名校验、头信息尺寸
//! - `destination`：目标路径与格式解析、目录创建
//! - `pipeline`：解码、画布分配、背景色、重采样合成
//! - `writer`：按格式编码、临时文件 + 原子重命名
//! - `config/error/format/color/source`：配置、错误、格式、背景色、中间数据模型
//!
//! ## 新同事快速上手
//!
//! ```text
//! convert / ImageConverter::convert
//!    ↓
//! handler.rs（统一编排 + 阶段耗时日志）
//!    ├─ loader.rs（读取 + 签名/尺寸校验）
//!    ├─ destination.rs（目标路径 + 建目录）
//!    ├─ pipeline.rs（解码 + 画布 + 合成）
//!    └─ writer.rs（编码 + 原子写入）
//!    ↓
//! 返回 ConvertError 给调用方
//! ```
//!
//! ## 分层职责建议
//!
//! - 目标写法规则变更优先改 `source.rs` 与 `destination.rs`
//! - 编码参数变更优先改 `config.rs`
//! - 单阶段行为优化分别改 `loader/pipeline/writer`

mod color;
mod config;
mod destination;
mod error;
mod format;
mod handler;
mod loader;
mod pipeline;
mod source;
mod writer;

pub use color::BackgroundColor;
pub use config::{ConvertConfig, ResampleFilter};
pub use error::ConvertError;
pub use format::ImageFormat;
pub use handler::{ImageConverter, convert};
pub use source::{ConversionRequest, Target};
