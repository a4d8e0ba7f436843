//!
//! # 下载列表模块
//! 把待下载的文件列表持久化到 json 文件中
//!

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;

use crate::download::util::filename_from_url;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Task {
    pub filename: String,
    pub url: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Registry {
    pub files: Vec<Task>,
}

impl Registry {
    /// 文件不存在时返回空列表，内容损坏时返回错误
    pub fn load_from_file(file_path: &Path) -> Result<Self> {
        let data = match fs::read_to_string(file_path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Registry::default()),
            Err(err) => {
                return Err(err).with_context(|| format!("Read registry failed: {}", file_path.display()));
            }
        };

        let registry: Registry = serde_json::from_str(&data)
            .with_context(|| format!("Parse registry failed: {}", file_path.display()))?;

        Ok(registry)
    }

    /// 整个文件覆盖写入，4 空格缩进
    pub fn save_to_file(&self, file_path: &Path) -> Result<()> {
        let mut data = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut data, PrettyFormatter::with_indent(b"    "));
        self.serialize(&mut serializer)?;

        fs::write(file_path, data)
            .with_context(|| format!("Write registry failed: {}", file_path.display()))?;

        Ok(())
    }

    /// 为 `url` 追加一个任务，空白输入不追加
    pub fn append(&mut self, url: &str) -> Option<Task> {
        if url.trim().is_empty() {
            return None;
        }

        let task = Task {
            filename: filename_from_url(url),
            url: url.to_string(),
        };
        self.files.push(task.clone());

        Some(task)
    }
}
