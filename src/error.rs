//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 命令行外壳的统一错误类型 `AppError`，
//! 库内部的 `ConvertError` 通过 `From` 自动上转，无需手动 map。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 配置文件读取与解析失败单独成支，便于与转换错误区分。

use crate::converter::ConvertError;

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 图片转换流水线错误
    #[error("{0}")]
    Convert(#[from] ConvertError),

    /// 文件系统 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),

    /// 配置文件不可用
    #[error("配置文件错误: {0}")]
    Settings(String),
}
