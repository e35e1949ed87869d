//! # 目标路径解析
//!
//! - 裸格式名：`<源目录>/<源文件名去掉最后一个扩展名>.<格式名>`（`dir/.png` → `dir/.jpeg`）
//! - 显式路径：原样使用，格式取自扩展名
//!
//! 目录在格式确认之后才创建，未知扩展名不会留下空目录。

use std::ffi::{OsStr, OsString};
use std::fs::DirBuilder;
use std::path::{Path, PathBuf};

use super::{ConvertError, ConvertConfig, ImageConverter, ImageFormat, Target};

impl ImageConverter {
    /// 计算目标路径与目标格式，不触碰文件系统。
    ///
    /// # 示例
    /// ```rust
    /// use std::path::{Path, PathBuf};
    /// use image_converter::converter::{ImageConverter, ImageFormat, Target};
    ///
    /// let (path, format) =
    ///     ImageConverter::resolve_destination(Path::new("/home/gs/my.png"), &Target::parse("jpeg"))?;
    /// assert_eq!(path, PathBuf::from("/home/gs/my.jpeg"));
    /// assert_eq!(format, ImageFormat::Jpeg);
    /// # Ok::<(), image_converter::converter::ConvertError>(())
    /// ```
    pub fn resolve_destination(
        source: &Path,
        target: &Target,
    ) -> Result<(PathBuf, ImageFormat), ConvertError> {
        match target {
            Target::Format(format) => {
                let source_name = source.file_name().ok_or_else(|| {
                    ConvertError::InvalidImage(format!("源路径缺少文件名：{}", source.display()))
                })?;

                let mut file_name = Self::strip_last_extension(source_name);
                file_name.push(".");
                file_name.push(format.extension());

                let dir = source.parent().unwrap_or_else(|| Path::new(""));
                Ok((dir.join(file_name), *format))
            }
            Target::Path(path) => {
                let format = ImageFormat::from_path(path)?;
                Ok((path.clone(), format))
            }
        }
    }

    /// 去掉最后一个 `.` 及其后的部分。
    ///
    /// 与 `Path::file_stem` 不同，`.png` 这类以点开头的文件名整体视为扩展名，得到空主名。
    fn strip_last_extension(file_name: &OsStr) -> OsString {
        match file_name.to_str() {
            Some(name) => name.rfind('.').map_or(name, |dot| &name[..dot]).into(),
            None => Path::new(file_name)
                .file_stem()
                .unwrap_or(file_name)
                .to_os_string(),
        }
    }

    /// 确保目标目录存在，缺失时递归创建（unix 下使用 `dir_mode` 权限）。
    pub(super) fn ensure_destination_dir(
        destination: &Path,
        config: &ConvertConfig,
    ) -> Result<(), ConvertError> {
        let dir = match destination.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => return Ok(()),
        };

        if dir.is_dir() {
            return Ok(());
        }

        let mut builder = DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(config.dir_mode);
        }
        #[cfg(not(unix))]
        let _ = config;

        builder.create(dir).map_err(|e| {
            ConvertError::WriteFailed(format!("创建目标目录失败：{}（{}）", dir.display(), e))
        })?;

        log::debug!("📂 已创建目标目录：{}", dir.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_format_keeps_directory_and_stem() {
        let (path, format) = ImageConverter::resolve_destination(
            Path::new("/home/gs/my_png.png"),
            &Target::Format(ImageFormat::Gif),
        )
        .expect("resolve should succeed");

        assert_eq!(path, PathBuf::from("/home/gs/my_png.gif"));
        assert_eq!(format, ImageFormat::Gif);
    }

    #[test]
    fn bare_format_strips_only_last_extension() {
        let (path, _) = ImageConverter::resolve_destination(
            Path::new("photos/holiday.final.jpeg"),
            &Target::Format(ImageFormat::Png),
        )
        .expect("resolve should succeed");

        assert_eq!(path, PathBuf::from("photos/holiday.final.png"));
    }

    #[test]
    fn bare_format_for_dot_files_replaces_whole_name() {
        let cases = [
            ("dir/.png", "dir/.jpeg"),
            ("dir/.hidden.png", "dir/.hidden.jpeg"),
            ("dir/noext", "dir/noext.jpeg"),
        ];

        for (source, expected) in cases {
            let (path, _) = ImageConverter::resolve_destination(
                Path::new(source),
                &Target::Format(ImageFormat::Jpeg),
            )
            .expect("resolve should succeed");
            assert_eq!(path, PathBuf::from(expected), "source {source}");
        }
    }

    #[test]
    fn bare_format_for_relative_file_name() {
        let (path, _) = ImageConverter::resolve_destination(
            Path::new("logo.gif"),
            &Target::Format(ImageFormat::Jpeg),
        )
        .expect("resolve should succeed");

        assert_eq!(path, PathBuf::from("logo.jpeg"));
    }

    #[test]
    fn explicit_path_is_used_verbatim() {
        let (path, format) = ImageConverter::resolve_destination(
            Path::new("/home/gs/my_png.png"),
            &Target::parse("/home/gs/new/my_new_file.JPG"),
        )
        .expect("resolve should succeed");

        assert_eq!(path, PathBuf::from("/home/gs/new/my_new_file.JPG"));
        assert_eq!(format, ImageFormat::Jpeg);
    }

    #[test]
    fn explicit_path_with_unknown_extension_fails() {
        for target in ["/tmp/out.bmp", "/tmp/out", "jpg", "PNG"] {
            let result =
                ImageConverter::resolve_destination(Path::new("/tmp/in.png"), &Target::parse(target));
            assert!(
                matches!(result, Err(ConvertError::UnsupportedFormat(_))),
                "target {target:?} should be unsupported"
            );
        }
    }

    #[test]
    fn creates_missing_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let destination = dir.path().join("a/b/c/out.png");

        ImageConverter::ensure_destination_dir(&destination, &ConvertConfig::default())
            .expect("dir creation should succeed");

        assert!(dir.path().join("a/b/c").is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn created_directories_are_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let destination = dir.path().join("private/out.png");

        ImageConverter::ensure_destination_dir(&destination, &ConvertConfig::default())
            .expect("dir creation should succeed");

        let mode = std::fs::metadata(dir.path().join("private"))
            .expect("metadata")
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o700);
    }
}
