//! # 图片格式转换工具 — 命令行入口
//!
//! 本文件仅负责日志初始化、参数解析与错误输出。
//! 业务逻辑见 `converter` 模块。

use std::path::PathBuf;
use std::process;

use clap::Parser;
use image_converter::converter::{BackgroundColor, ConversionRequest, ConvertConfig, ImageConverter, Target};
use image_converter::error::AppError;
use image_converter::settings;

#[derive(Parser)]
#[command(name = "image-converter")]
#[command(about = "在 GIF / JPEG / PNG 之间转换图片", long_about = None)]
struct Cli {
    /// 源图片路径（格式按文件内容识别）
    #[arg(value_name = "SOURCE")]
    source: PathBuf,

    /// `gif` / `jpeg` / `png` 表示原地转换，否则视为目标文件路径
    #[arg(value_name = "TARGET")]
    target: String,

    /// 透明像素的背景色：#rrggbb、#rgb 或 r,g,b
    #[arg(short, long, value_name = "COLOR", default_value = "#ffffff")]
    background: BackgroundColor,

    /// 覆盖默认转换参数的 JSON 配置文件
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn run(cli: Cli) -> Result<PathBuf, AppError> {
    let config = match cli.config.as_deref() {
        Some(path) => settings::load_config(path)?,
        None => ConvertConfig::default(),
    };

    let converter = ImageConverter::new(config)?;
    let request = ConversionRequest::new(&cli.source, Target::parse(&cli.target))
        .with_background(cli.background);

    Ok(converter.convert(&request)?)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(written) => println!("{}", written.display()),
        Err(err) => {
            eprintln!("💥 转换失败: {err}");
            process::exit(1);
        }
    }
}
