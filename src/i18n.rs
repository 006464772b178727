use serde::{Deserialize, Serialize};

/// 目标语言类型
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Default)]
pub enum TargetLanguage {
    #[serde(rename = "en")]
    #[default]
    English,
    #[serde(rename = "ru")]
    Russian,
}

impl std::fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetLanguage::English => write!(f, "en"),
            TargetLanguage::Russian => write!(f, "ru"),
        }
    }
}

impl std::str::FromStr for TargetLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" | "english" => Ok(TargetLanguage::English),
            "ru" | "russian" | "русский" => Ok(TargetLanguage::Russian),
            _ => Err(format!("Unknown target language: {}", s)),
        }
    }
}

impl TargetLanguage {
    /// 获取语言的描述性名称
    pub fn display_name(&self) -> &'static str {
        match self {
            TargetLanguage::English => "English",
            TargetLanguage::Russian => "Русский",
        }
    }

    /// 获取语言的提示词指令
    pub fn prompt_instruction(&self) -> &'static str {
        match self {
            TargetLanguage::English => "Write all text values in English.",
            TargetLanguage::Russian => "Пиши все текстовые значения на русском языке.",
        }
    }

    /// 图片页的二级标题
    pub fn image_heading(&self) -> &'static str {
        match self {
            TargetLanguage::English => "Image",
            TargetLanguage::Russian => "Изображение",
        }
    }

    /// 没有可用图片时插入的提示
    pub fn image_not_found(&self) -> &'static str {
        match self {
            TargetLanguage::English => "Image not found.",
            TargetLanguage::Russian => "Изображение не найдено.",
        }
    }

    /// 图片下载或解码失败时插入的文字
    pub fn image_unavailable(&self, url: &str) -> String {
        match self {
            TargetLanguage::English => format!("Could not load the image. Link: {}", url),
            TargetLanguage::Russian => format!("Не удалось загрузить изображение. Ссылка: {}", url),
        }
    }

    /// 文章标题缺失时的默认值
    pub fn default_article_title(&self) -> &'static str {
        match self {
            TargetLanguage::English => "Article",
            TargetLanguage::Russian => "Статья",
        }
    }

    /// 替身模式下的文章标题
    pub fn stand_in_title(&self, topic: &str) -> String {
        match self {
            TargetLanguage::English => format!("Article: {}", topic),
            TargetLanguage::Russian => format!("Статья: {}", topic),
        }
    }

    /// 替身模式下的研究查询，最后一条是找图片的
    pub fn stand_in_queries(&self, topic: &str) -> [String; 4] {
        match self {
            TargetLanguage::English => [
                format!("Full name and biography of {}", topic),
                format!("Key achievements and reforms of {} since 2019", topic),
                format!("International initiatives related to {}", topic),
                format!("Official photo of {}", topic),
            ],
            TargetLanguage::Russian => [
                format!("Полное имя и биография {}", topic),
                format!("Ключевые достижения и реформы {} с 2019 года", topic),
                format!("Международные инициативы, связанные с {}", topic),
                format!("Официальная фотография {}", topic),
            ],
        }
    }

    /// 替身模式文章的各节标题：引言、事实、结论
    pub fn stand_in_headings(&self) -> [&'static str; 3] {
        match self {
            TargetLanguage::English => ["Introduction", "Key facts", "Conclusion"],
            TargetLanguage::Russian => ["Введение", "Основные факты", "Вывод"],
        }
    }

    pub fn stand_in_introduction(&self, topic: &str) -> String {
        match self {
            TargetLanguage::English => format!("A short introduction to the topic: {}.", topic),
            TargetLanguage::Russian => format!("Краткое введение по теме: {}.", topic),
        }
    }

    pub fn stand_in_facts_lead(&self) -> &'static str {
        match self {
            TargetLanguage::English => "Collected facts:",
            TargetLanguage::Russian => "Собранные факты:",
        }
    }

    pub fn stand_in_conclusion(&self) -> &'static str {
        match self {
            TargetLanguage::English => "A short conclusion.",
            TargetLanguage::Russian => "Короткий вывод.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_and_display() {
        assert_eq!("en".parse::<TargetLanguage>().unwrap(), TargetLanguage::English);
        assert_eq!("Russian".parse::<TargetLanguage>().unwrap(), TargetLanguage::Russian);
        assert_eq!("русский".parse::<TargetLanguage>().unwrap(), TargetLanguage::Russian);
        assert!("fr".parse::<TargetLanguage>().is_err());
        assert_eq!(TargetLanguage::Russian.to_string(), "ru");
    }

    #[test]
    fn test_image_unavailable_carries_url() {
        let text = TargetLanguage::English.image_unavailable("https://x.test/a.png");
        assert!(text.ends_with("https://x.test/a.png"));
    }

    #[test]
    fn test_display_name() {
        assert_eq!(TargetLanguage::English.display_name(), "English");
        assert_eq!(TargetLanguage::Russian.display_name(), "Русский");
    }
}
