use regex::{Regex, RegexBuilder};

use crate::generator::types::StepKind;

/// 判断一个查询是找图片还是找事实
pub trait QueryClassifier: Send + Sync {
    fn classify(&self, query: &str) -> StepKind;
}

/// 默认的图片关键词，按子串匹配，不区分大小写
pub const DEFAULT_IMAGE_KEYWORDS: [&str; 4] = ["photo", "image", "фото", "изображени"];

/// 关键词分类器：命中任一关键词即视为图片查询。
/// 只是固定的子串列表，其他语言或表述方式可能误判。
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    pattern: Option<Regex>,
}

impl KeywordClassifier {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let alternatives: Vec<String> = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_string())
            .filter(|k| !k.is_empty())
            .map(|k| regex::escape(&k))
            .collect();

        // 关键词全部转义过，构建失败只可能是空列表
        let pattern = if alternatives.is_empty() {
            None
        } else {
            RegexBuilder::new(&alternatives.join("|"))
                .case_insensitive(true)
                .build()
                .ok()
        };

        Self { pattern }
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_KEYWORDS)
    }
}

impl QueryClassifier for KeywordClassifier {
    fn classify(&self, query: &str) -> StepKind {
        match &self.pattern {
            Some(pattern) if pattern.is_match(query) => StepKind::Image,
            _ => StepKind::Text,
        }
    }
}
