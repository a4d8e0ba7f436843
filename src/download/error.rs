use thiserror::Error;
use tokio::io;

/// 单个下载任务失败的原因
#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("Status {0}")]
    UnexpectedStatus(u16),

    #[error("{0}")]
    HttpRequestFailed(#[from] reqwest::Error),

    #[error("{0}")]
    IOError(#[from] io::Error),
}

impl DownloadError {
    pub fn status(&self) -> Option<u16> {
        match self {
            DownloadError::UnexpectedStatus(code) => Some(*code),
            _ => None,
        }
    }
}
