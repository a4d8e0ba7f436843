//! 下载测试用的本地 http 服务

use std::io;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use futures_util::stream;
use tokio::net::TcpListener;

pub const FILE_LEN: usize = 10 * 1024 + 7;
pub const CHUNKED_LEN: usize = 5 * 3000;
pub const TRUNCATED_LEN: usize = 64 * 1024;

/// `/files/{name}` 返回的固定内容
pub fn file_content(name: &str) -> Vec<u8> {
    let seed = name.bytes().fold(0u8, |acc, b| acc.wrapping_add(b));
    (0..FILE_LEN).map(|i| (i % 251) as u8 ^ seed).collect()
}

async fn serve_file(Path(name): Path<String>) -> impl IntoResponse {
    let content = file_content(&name);
    (
        StatusCode::OK,
        [(header::CONTENT_LENGTH, content.len().to_string())],
        content,
    )
}

async fn serve_chunked() -> impl IntoResponse {
    let chunks = (0..5).map(|_| Ok::<_, io::Error>(Bytes::from(vec![b'x'; CHUNKED_LEN / 5])));
    Body::from_stream(stream::iter(chunks))
}

/// 只发送一部分声明长度的内容，然后断开连接
async fn serve_truncated() -> impl IntoResponse {
    let body = stream::unfold(0u8, |state| async move {
        match state {
            0 => Some((Ok(Bytes::from(vec![7u8; 4096])), 1)),
            1 => {
                tokio::time::sleep(Duration::from_millis(100)).await;
                Some((Err(io::Error::other("connection dropped")), 2))
            }
            _ => None,
        }
    });

    (
        StatusCode::OK,
        [(header::CONTENT_LENGTH, TRUNCATED_LEN.to_string())],
        Body::from_stream(body),
    )
}

/// 在空闲端口启动服务，返回 base url
pub async fn spawn_server() -> String {
    let app = Router::new()
        .route("/files/:name", get(serve_file))
        .route("/chunked", get(serve_chunked))
        .route("/truncated", get(serve_truncated))
        .route("/missing", get(|| async { StatusCode::NOT_FOUND }));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    format!("http://127.0.0.1:{port}")
}
