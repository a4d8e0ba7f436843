use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use batch_downloader::download::batch::BatchDownloader;
use batch_downloader::download::config::Config;
use batch_downloader::download::logger::setup_logger;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = Config::default();
    setup_logger(config.log_file.as_deref())?;

    let mut downloader = BatchDownloader::open(config)?;

    let url = prompt("Enter the file URL to download: ").await?;
    downloader.add_url(&url)?;

    downloader.run().await?;

    Ok(())
}

/// 读取一行输入，EOF 视为空行
async fn prompt(message: &str) -> Result<String> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(message.as_bytes()).await?;
    stdout.flush().await?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;

    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
