//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 转换链路的每个阶段对应一个错误分支，调用侧可以按分支匹配，
//! 错误消息本身带上失败的路径与操作，便于直接展示给用户。

/// 图片转换统一错误类型。
///
/// 在命令行层会被上转为 `AppError`。
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("无效图片：{0}")]
    InvalidImage(String),

    #[error("不支持的格式：{0}")]
    UnsupportedFormat(String),

    #[error("画布分配失败：{0}")]
    CanvasAllocationFailed(String),

    #[error("合成失败：{0}")]
    CompositeFailed(String),

    #[error("编码失败：{0}")]
    EncodeFailed(String),

    #[error("写入失败：{0}")]
    WriteFailed(String),

    #[error("配置错误：{0}")]
    InvalidConfig(String),
}
