use axum::http::{header, HeaderMap};

/// 解析布尔型环境变量（"1" / "true" / "yes" 为真，"0" / "false" / "no" 为假）
///
/// 未设置或无法识别时返回 `default`
pub fn env_flag(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(v) => parse_flag(&v).unwrap_or(default),
        Err(_) => default,
    }
}

pub fn parse_flag(value: &str) -> Option<bool> {
    let value = value.trim();
    if value == "1" || value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("yes") {
        Some(true)
    } else if value == "0" || value.eq_ignore_ascii_case("false") || value.eq_ignore_ascii_case("no") {
        Some(false)
    } else {
        None
    }
}

/// 是否禁用 TLS 验证（用于调试 mitmproxy 等场景）
pub fn should_disable_tls_verify() -> bool {
    env_flag("ESSAY_GRADER_DISABLE_TLS_VERIFY", false)
}

/// 请求的 Content-Type 是否为 JSON
///
/// 只比较 media type 本身，忽略 `; charset=utf-8` 之类的参数
#[inline]
pub fn is_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
        .unwrap_or(false)
}
