//! # 图片格式转换工具 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │               命令行 (main.rs, clap + env_logger)         │
//! └───────┼──────────────────────────────────────────────────┘
//!         ↕ Result<PathBuf, AppError>
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↕            库 (Rust)                              │
//! │                                                          │
//! │  ┌─ error ────── AppError (统一错误类型)                  │
//! │  │                                                       │
//! │  ├─ settings ─── JSON 配置加载 / 保存                     │
//! │  │                                                       │
//! │  └─ converter ── GIF / JPEG / PNG 互转                    │
//! │      ├─ loader       源文件校验                           │
//! │      ├─ pipeline     解码 · 画布 · 合成                   │
//! │      └─ writer       编码 · 原子写入                      │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError`，命令行层的返回类型 |
//! | [`settings`] | 从 JSON 文件加载 / 保存 `ConvertConfig` |
//! | [`converter`] | 图片格式转换与透明区域背景色展平 |

pub mod converter;
pub mod error;
pub mod settings;

pub use converter::convert;
