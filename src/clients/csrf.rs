//! 防伪令牌提取
//!
//! 页面中的令牌有两种嵌入方式：
//! - 表单隐藏字段 `<input name="csrfmiddlewaretoken" value="...">`
//! - JSON 脚本块 `<script id="csrfToken" type="application/json">"..."</script>`

use regex::Regex;
use std::sync::OnceLock;

fn input_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<input[^>]*name=["']csrfmiddlewaretoken["'][^>]*value=["']([^"']+)["']"#)
            .expect("valid csrf input regex")
    })
}

fn input_pattern_value_first() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<input[^>]*value=["']([^"']+)["'][^>]*name=["']csrfmiddlewaretoken["']"#)
            .expect("valid csrf input regex")
    })
}

fn script_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?s)<script[^>]*id=["']csrfToken["'][^>]*>\s*"([^"]+)"\s*</script>"#)
            .expect("valid csrf script regex")
    })
}

/// 从页面 HTML 中提取防伪令牌
pub fn extract_csrf_token(html: &str) -> Option<String> {
    [input_pattern(), input_pattern_value_first(), script_pattern()]
        .iter()
        .find_map(|re| re.captures(html))
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
}
