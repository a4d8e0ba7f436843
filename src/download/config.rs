//!
//! 配置模块
//!

use std::path::PathBuf;

/// 默认下载列表文件，相对于当前工作目录
pub const DEFAULT_REGISTRY_PATH: &str = "files.json";

/// 默认保存目录
pub const DEFAULT_SAVE_DIR: &str = "downloads";

/// 每次从响应体读取并写入的字节数
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub registry_path: PathBuf,
    pub save_dir: PathBuf,
    pub chunk_size: usize,
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// 默认配置，但路径都放到 `root` 下，测试时指向临时目录
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            registry_path: root.join(DEFAULT_REGISTRY_PATH),
            save_dir: root.join(DEFAULT_SAVE_DIR),
            ..Self::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry_path: PathBuf::from(DEFAULT_REGISTRY_PATH),
            save_dir: PathBuf::from(DEFAULT_SAVE_DIR),
            chunk_size: DEFAULT_CHUNK_SIZE,
            log_file: None,
        }
    }
}
