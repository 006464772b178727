use std::path::{Path, PathBuf};

pub mod docx;
pub mod image_fetch;

pub use docx::{Block, DocxRenderer, ImageBlock};
pub use image_fetch::{HttpImageFetcher, ImageFetcher, StandInImageFetcher};

/// 把文章标题转换为安全的文件名主体：只保留字母数字、空格、下划线和连字符
pub fn sanitize_file_stem(title: &str, fallback: &str) -> String {
    let stem: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '_' | '-'))
        .collect();
    let stem = stem.trim();

    if stem.is_empty() {
        fallback.to_string()
    } else {
        stem.to_string()
    }
}

/// `<dir>/<stem>.docx`
pub fn output_path(dir: &Path, title: &str, fallback: &str) -> PathBuf {
    dir.join(format!("{}.docx", sanitize_file_stem(title, fallback)))
}
