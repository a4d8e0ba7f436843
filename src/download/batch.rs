//!
//! # 批量下载模块
//! 读取下载列表，追加新的 url，然后依次下载每个文件
//!

use anyhow::{Context, Result};
use log::{error, info};

use crate::download::build_client;
use crate::download::config::Config;
use crate::download::error::DownloadError;
use crate::download::fetcher::Fetcher;
use crate::download::registry::{Registry, Task};

const SKIPPED_MESSAGE: &str = "No URL entered. Skipping...";

fn added_message(task: &Task) -> String {
    format!("Added {} to the download list.", task.filename)
}

fn starting_message(task: &Task) -> String {
    format!("Starting download: {} from {}", task.filename, task.url)
}

/// 单个任务的下载结果
#[derive(Debug)]
pub struct TaskReport {
    pub task: Task,
    pub result: Result<u64, DownloadError>,
}

impl TaskReport {
    /// 下载结束后输出到控制台的那一行
    pub fn message(&self) -> String {
        match &self.result {
            Ok(_) => format!("Completed: {}", self.task.filename),
            Err(err) => match err.status() {
                Some(code) => format!("Failed to download {}: Status {}", self.task.filename, code),
                None => format!("Error downloading {}: {}", self.task.filename, err),
            },
        }
    }
}

pub struct BatchDownloader {
    config: Config,
    registry: Registry,
    fetcher: Fetcher,
}

impl BatchDownloader {
    /// 读取配置中的下载列表，列表内容损坏时返回错误
    pub fn open(config: Config) -> Result<Self> {
        let registry = Registry::load_from_file(&config.registry_path)?;
        let client = build_client().context("Build http client failed")?;
        let fetcher = Fetcher::new(client, config.chunk_size);

        Ok(Self {
            config,
            registry,
            fetcher,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// 追加一个 url 并立即写回下载列表，空输入直接跳过
    pub fn add_url(&mut self, input: &str) -> Result<Option<Task>> {
        let Some(task) = self.registry.append(input) else {
            info!("{}", SKIPPED_MESSAGE);
            return Ok(None);
        };

        self.registry.save_to_file(&self.config.registry_path)?;
        info!("{}", added_message(&task));

        Ok(Some(task))
    }

    /// 按顺序下载列表中的所有文件，单个任务失败不影响后续任务
    pub async fn run(&self) -> Result<Vec<TaskReport>> {
        let save_dir = &self.config.save_dir;
        tokio::fs::create_dir_all(save_dir)
            .await
            .with_context(|| format!("Create save directory failed: {}", save_dir.display()))?;

        let mut reports = Vec::with_capacity(self.registry.files.len());
        for task in &self.registry.files {
            info!("{}", starting_message(task));
            let result = self.fetcher.download(&task.url, &task.filename, save_dir).await;

            let report = TaskReport {
                task: task.clone(),
                result,
            };
            if report.result.is_ok() {
                info!("{}", report.message());
            } else {
                error!("{}", report.message());
            }

            reports.push(report);
        }

        Ok(reports)
    }
}
