//!
//! # 单文件下载模块
//! 一次 GET 请求，按固定大小分块把响应体写入磁盘
//!

use std::io;
use std::path::Path;

use futures_util::TryStreamExt;
use reqwest::{Client, Response, StatusCode};
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_util::io::StreamReader;

use crate::download::error::DownloadError;
use crate::download::progress_bar::ProgressBar;
use crate::download::util::content_length;

const PROGRESS_MAX_WIDTH: usize = 120;

pub struct Fetcher {
    // Client 内部自带连接池，所有任务复用同一个
    client: Client,
    chunk_size: usize,
}

impl Fetcher {
    pub fn new(client: Client, chunk_size: usize) -> Self {
        Self {
            client,
            chunk_size: chunk_size.max(1),
        }
    }

    /// 下载 `url` 到 `directory/filename`，返回写入的字节数。
    ///
    /// 只有 200 响应才会创建（或清空已有的）目标文件；文件创建之后出错时，
    /// 已经写入的部分保留在磁盘上。
    pub async fn download(&self, url: &str, filename: &str, directory: &Path) -> Result<u64, DownloadError> {
        let response = self.client
            .get(url)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(DownloadError::UnexpectedStatus(response.status().as_u16()));
        }

        let total_len = content_length(response.headers());
        let mut file = File::create(directory.join(filename)).await?;
        let mut progress = ProgressBar::new(format!("Downloading {filename}"), total_len, PROGRESS_MAX_WIDTH);

        let copied = self.write_body(response, &mut file, &mut progress).await;
        let flushed = file.flush().await;
        progress.finish();

        let downloaded_len = copied?;
        flushed?;

        Ok(downloaded_len)
    }

    async fn write_body(&self, response: Response, file: &mut File, progress: &mut ProgressBar) -> Result<u64, DownloadError> {
        let stream = response
            .bytes_stream()
            .map_err(io::Error::other);
        let reader = StreamReader::new(stream);
        tokio::pin!(reader);

        let mut buf = vec![0u8; self.chunk_size];
        loop {
            let len = reader.read(&mut buf).await?;
            if len == 0 {
                break;
            }

            file.write_all(&buf[..len]).await?;
            progress.inc(len as u64);
        }

        Ok(progress.downloaded_len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::build_client;
    use crate::download::test_server::{file_content, spawn_server, CHUNKED_LEN};

    fn fetcher() -> Fetcher {
        Fetcher::new(build_client().unwrap(), 1024)
    }

    #[tokio::test]
    async fn should_be_download() {
        let base_url = spawn_server().await;
        let dir = tempfile::tempdir().unwrap();

        let len = fetcher()
            .download(&format!("{base_url}/files/video.mkv"), "video.mkv", dir.path())
            .await
            .unwrap();

        let expected = file_content("video.mkv");
        assert_eq!(len, expected.len() as u64);
        assert_eq!(std::fs::read(dir.path().join("video.mkv")).unwrap(), expected);
    }

    #[tokio::test]
    async fn should_download_without_content_length() {
        let base_url = spawn_server().await;
        let dir = tempfile::tempdir().unwrap();

        let len = fetcher()
            .download(&format!("{base_url}/chunked"), "stream.bin", dir.path())
            .await
            .unwrap();

        assert_eq!(len, CHUNKED_LEN as u64);
        assert_eq!(std::fs::metadata(dir.path().join("stream.bin")).unwrap().len(), CHUNKED_LEN as u64);
    }

    #[tokio::test]
    async fn not_found_creates_no_file() {
        let base_url = spawn_server().await;
        let dir = tempfile::tempdir().unwrap();

        let err = fetcher()
            .download(&format!("{base_url}/missing"), "missing.bin", dir.path())
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "Status 404");
        assert!(!dir.path().join("missing.bin").exists());
    }

    #[tokio::test]
    async fn not_found_keeps_existing_file() {
        let base_url = spawn_server().await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keep.bin");
        std::fs::write(&path, b"previous").unwrap();

        let result = fetcher()
            .download(&format!("{base_url}/missing"), "keep.bin", dir.path())
            .await;

        assert!(result.is_err());
        assert_eq!(std::fs::read(&path).unwrap(), b"previous");
    }

    #[tokio::test]
    async fn should_overwrite_existing_file() {
        let base_url = spawn_server().await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.bin");
        std::fs::write(&path, vec![0xFF; 64 * 1024]).unwrap();

        fetcher()
            .download(&format!("{base_url}/files/a.bin"), "a.bin", dir.path())
            .await
            .unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), file_content("a.bin"));
    }

    #[tokio::test]
    async fn dropped_connection_leaves_partial_file() {
        let base_url = spawn_server().await;
        let dir = tempfile::tempdir().unwrap();

        let err = fetcher()
            .download(&format!("{base_url}/truncated"), "partial.bin", dir.path())
            .await
            .unwrap_err();

        assert!(err.status().is_none());
        let path = dir.path().join("partial.bin");
        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() < 64 * 1024);
    }

    #[tokio::test]
    async fn unreachable_host_is_error() {
        let dir = tempfile::tempdir().unwrap();

        // 端口 9 (discard) 上不会有 http 服务
        let err = fetcher()
            .download("http://127.0.0.1:9/file.bin", "file.bin", dir.path())
            .await
            .unwrap_err();

        assert!(matches!(err, DownloadError::HttpRequestFailed(_)));
        assert!(!dir.path().join("file.bin").exists());
    }

    #[tokio::test]
    async fn invalid_url_is_error() {
        let dir = tempfile::tempdir().unwrap();

        let err = fetcher()
            .download("not a url", "file.bin", dir.path())
            .await
            .unwrap_err();

        assert!(matches!(err, DownloadError::HttpRequestFailed(_)));
    }
}
