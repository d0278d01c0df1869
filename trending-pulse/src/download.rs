//! Saving generated images to the local filesystem.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use crate::error::Result;
use crate::media::InlineImage;

/// 以 `{prefix}-{unix_millis}.{ext}` 为名写入目录，目录不存在时创建。
///
/// 同名文件已存在时追加序号（`-1`、`-2`…），不会覆盖已有文件。
///
/// # Errors
/// 当目录无法创建或文件无法写入时返回错误。
pub async fn save_image(dir: impl AsRef<Path>, prefix: &str, image: &InlineImage) -> Result<PathBuf> {
    save_image_at(dir.as_ref(), prefix, crate::unix_millis(), image).await
}

async fn save_image_at(dir: &Path, prefix: &str, millis: u128, image: &InlineImage) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let mut attempt = 0;
    loop {
        let path = dir.join(file_name(prefix, millis, attempt, image.extension()));
        match OpenOptions::new().write(true).create_new(true).open(&path).await {
            Ok(mut file) => {
                file.write_all(image.data()).await?;
                file.flush().await?;
                tracing::debug!(path = %path.display(), bytes = image.data().len(), "saved image");
                return Ok(path);
            }
            Err(err) if err.kind() == ErrorKind::AlreadyExists => attempt += 1,
            Err(err) => return Err(err.into()),
        }
    }
}

fn file_name(prefix: &str, millis: u128, attempt: u32, extension: &str) -> String {
    if attempt == 0 {
        format!("{prefix}-{millis}.{extension}")
    } else {
        format!("{prefix}-{millis}-{attempt}.{extension}")
    }
}
