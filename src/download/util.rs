use headers::HeaderMapExt;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};

/// url 路径没有最后一段时使用的文件名
pub const FALLBACK_FILE_NAME: &str = "downloaded_file";

/// 从用户输入的原始路径中取最后一段作为文件名，不做百分号编码或路径规范化
pub fn filename_from_url(url: &str) -> String {
    let path = raw_path(url);
    // `;` 之后是最后一段的参数，不属于文件名
    let last_segment = path.rsplit('/').next().unwrap_or_default();
    let name = last_segment.split(';').next().unwrap_or_default();

    if name.is_empty() {
        FALLBACK_FILE_NAME.to_string()
    } else {
        name.to_string()
    }
}

/// 去掉 scheme、authority、query 和 fragment 后剩下的原始路径
fn raw_path(url: &str) -> &str {
    let mut rest = url;

    if let Some(colon) = rest.find(':') {
        let scheme = &rest[..colon];
        let is_scheme = scheme.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
            && scheme.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        if is_scheme {
            rest = &rest[colon + 1..];
        }
    }

    if let Some(after_slashes) = rest.strip_prefix("//") {
        let authority_end = after_slashes.find(['/', '?', '#']).unwrap_or(after_slashes.len());
        rest = &after_slashes[authority_end..];
    }

    let path_end = rest.find(['?', '#']).unwrap_or(rest.len());
    &rest[..path_end]
}

/// 每个下载请求都带上的请求头
pub fn default_headers() -> HeaderMap {
    let mut header_map = HeaderMap::new();
    header_map.insert(ACCEPT, HeaderValue::from_static("*/*"));
    header_map.typed_insert(headers::Connection::keep_alive());

    header_map
}

/// 响应的 `Content-Length`，缺失或为 0 时返回 None
pub fn content_length(header_map: &HeaderMap) -> Option<u64> {
    header_map
        .typed_get::<headers::ContentLength>()
        .map(|len| len.0)
        .filter(|len| *len > 0)
}
