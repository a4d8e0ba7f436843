use reqwest::Client;

pub mod batch;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod logger;
pub mod progress_bar;
pub mod registry;
pub mod util;

#[cfg(test)]
mod test_server;

/// 所有下载任务共用的 http client
pub fn build_client() -> reqwest::Result<Client> {
    Client::builder()
        .default_headers(util::default_headers())
        .build()
}
