use std::fs;
use std::path::Path;

use crate::converter::ConvertConfig;
use crate::error::AppError;

/// 从 JSON 文件加载转换配置，缺省字段使用默认值，加载后立即校验。
pub fn load_config(path: &Path) -> Result<ConvertConfig, AppError> {
    let content = fs::read_to_string(path)?;
    let config = serde_json::from_str::<ConvertConfig>(&content).map_err(|e| {
        AppError::Settings(format!("解析配置文件 '{}' 失败: {}", path.display(), e))
    })?;

    config.validate()?;
    Ok(config)
}

/// 将配置写回 JSON 文件（格式化输出）。
pub fn save_config(path: &Path, config: &ConvertConfig) -> Result<(), AppError> {
    let content = serde_json::to_string_pretty(config)
        .map_err(|e| AppError::Settings(format!("序列化配置失败: {}", e)))?;

    fs::write(path, content)?;
    Ok(())
}
