//! 图片文件存储

use async_trait::async_trait;
use std::io;
use std::path::Path;
use tracing::info;
use uuid::Uuid;

/// 把上传的字节写入目录，返回生成的文件名
#[async_trait]
pub trait FileStorage: Send + Sync {
    async fn store(
        &self,
        base_dir: &Path,
        original_name: Option<&str>,
        bytes: &[u8],
    ) -> io::Result<String>;

    /// 删除之前写入的文件
    async fn remove(&self, base_dir: &Path, file_name: &str) -> io::Result<()>;
}

/// 本地磁盘存储
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileStorage;

/// 随机文件名，保留原文件的扩展名
fn generated_file_name(original_name: Option<&str>) -> String {
    let stem = Uuid::new_v4().to_string();
    let extension = original_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()));

    match extension {
        Some(ext) => format!("{}.{}", stem, ext.to_ascii_lowercase()),
        None => stem,
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn store(
        &self,
        base_dir: &Path,
        original_name: Option<&str>,
        bytes: &[u8],
    ) -> io::Result<String> {
        tokio::fs::create_dir_all(base_dir).await?;

        let file_name = generated_file_name(original_name);
        tokio::fs::write(base_dir.join(&file_name), bytes).await?;

        info!(file_name = %file_name, size = bytes.len(), "stored image");
        Ok(file_name)
    }

    async fn remove(&self, base_dir: &Path, file_name: &str) -> io::Result<()> {
        tokio::fs::remove_file(base_dir.join(file_name)).await?;
        info!(file_name = %file_name, "removed image");
        Ok(())
    }
}
