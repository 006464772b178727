//! 从生成服务的原始输出中提取JSON对象
//!
//! 先尝试整体解析；失败时截取从第一个 `{` 到最后一个 `}` 的子串再解析一次。
//! 这种兜底是尽力而为的，对夹杂多个对象或多余花括号的文本可能得到错误结果。

use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::LazyLock;

static BRACED_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)(\{.*\})").expect("static regex is valid"));

/// 解析 `raw` 为 `T`，两种方式都失败时返回 `None`
pub fn parse_with_fallback<T: DeserializeOwned>(raw: &str) -> Option<T> {
    if let Ok(parsed) = serde_json::from_str::<T>(raw) {
        return Some(parsed);
    }

    let candidate = BRACED_OBJECT.captures(raw)?.get(1)?.as_str();
    serde_json::from_str::<T>(candidate).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        name: String,
    }

    #[test]
    fn test_direct_parse() {
        let parsed: Option<Sample> = parse_with_fallback(r#"{"name":"x"}"#);
        assert_eq!(parsed, Some(Sample { name: "x".into() }));
    }

    #[test]
    fn test_fallback_strips_surrounding_noise() {
        let raw = "Sure! Here is the JSON:\n```json\n{\n  \"name\": \"y\"\n}\n```\nHope it helps.";
        let parsed: Option<Sample> = parse_with_fallback(raw);
        assert_eq!(parsed, Some(Sample { name: "y".into() }));
    }

    #[test]
    fn test_no_braces_gives_none() {
        let parsed: Option<Sample> = parse_with_fallback("no json at all");
        assert!(parsed.is_none());
    }

    #[test]
    fn test_malformed_inside_braces_gives_none() {
        let parsed: Option<Sample> = parse_with_fallback("noise {name: y} noise");
        assert!(parsed.is_none());
    }
}
