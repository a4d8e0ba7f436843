//! 日志模块

use std::path::Path;
use anyhow::{Context, Result};

pub fn setup_logger(log_file: Option<&Path>) -> Result<()> {
    let mut base_config = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}",
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S"),
                record.level(),
                message
            ))
        })
        .level(log::LevelFilter::Info)
        .chain(std::io::stdout());

    if let Some(file) = log_file {
        let file = fern::log_file(file)
            .with_context(|| format!("Open log file failed: {}", file.display()))?;
        base_config = base_config.chain(file);
    }

    base_config.apply()?;

    Ok(())
}
