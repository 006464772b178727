//! 把文章渲染为 .docx 文件
//!
//! 渲染分两步：先把文章和配图整理成 [`Block`] 序列，再交给 docx-rs 打包。
//! 解码后的图片只保存在内存缓冲区中，嵌入完成或失败后随作用域释放。

use docx_rs::{
    AlignmentType, BreakType, Docx, LineSpacing, Paragraph, Pic, Run, RunFonts, Style, StyleType,
};
use image::ImageFormat;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::DocumentConfig;
use crate::error::{DocsmithError, Result};
use crate::generator::outlet::image_fetch::ImageFetcher;
use crate::generator::types::Article;
use crate::i18n::TargetLanguage;

const EMU_PER_INCH: f64 = 914_400.0;

/// 文档中的一个渲染单元
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// 居中的一级标题
    Title(String),
    /// 二级标题
    Heading(String),
    Paragraph(String),
    PageBreak,
    Image(EmbeddedImage),
    /// 不带行距设置的提示行
    Notice(String),
}

/// 已重新编码为 PNG 的图片
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedImage {
    pub png: Vec<u8>,
    pub width_px: u32,
    pub height_px: u32,
}

/// 配图的最终状态
#[derive(Debug, Clone, PartialEq)]
pub enum ImageBlock {
    Embedded(EmbeddedImage),
    /// 下载或解码失败，保留原始链接
    Unavailable(String),
    NotFound,
}

/// 解码任意支持格式的图片字节，统一转为 PNG
pub fn decode_to_png(bytes: &[u8]) -> Result<EmbeddedImage> {
    let decoded = image::load_from_memory(bytes)?;
    let mut png = Vec::new();
    decoded.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

    Ok(EmbeddedImage {
        png,
        width_px: decoded.width(),
        height_px: decoded.height(),
    })
}

/// 按文章结构排布渲染单元，图片占位节整体跳过
pub fn layout(article: &Article, image: ImageBlock, language: TargetLanguage) -> Vec<Block> {
    let mut blocks = vec![Block::Title(article.title.clone())];

    for section in article
        .sections
        .iter()
        .filter(|s| !s.is_image_placeholder())
    {
        let heading = section.heading.trim();
        if !heading.is_empty() {
            blocks.push(Block::Heading(heading.to_string()));
        }
        blocks.extend(
            section
                .paragraphs()
                .into_iter()
                .map(|p| Block::Paragraph(p.to_string())),
        );
    }

    match image {
        ImageBlock::Embedded(embedded) => {
            blocks.push(Block::PageBreak);
            blocks.push(Block::Heading(language.image_heading().to_string()));
            blocks.push(Block::Image(embedded));
        }
        ImageBlock::Unavailable(url) => blocks.push(Block::Notice(language.image_unavailable(&url))),
        ImageBlock::NotFound => blocks.push(Block::Notice(language.image_not_found().to_string())),
    }

    blocks
}

pub struct DocxRenderer {
    fetcher: Arc<dyn ImageFetcher>,
    document: DocumentConfig,
    language: TargetLanguage,
}

impl DocxRenderer {
    pub fn new(
        fetcher: Arc<dyn ImageFetcher>,
        document: DocumentConfig,
        language: TargetLanguage,
    ) -> Self {
        Self {
            fetcher,
            document,
            language,
        }
    }

    /// 渲染文章并写入 `path`，返回写入的路径。
    /// 配图失败只会降级为一行带链接的文字。
    pub async fn render(
        &self,
        article: &Article,
        image_url: Option<&str>,
        path: &Path,
    ) -> Result<PathBuf> {
        let image = self.resolve_image(image_url).await;
        let blocks = layout(article, image, self.language);
        let bytes = self.pack(&blocks)?;

        tokio::fs::write(path, &bytes)
            .await
            .map_err(|e| DocsmithError::filesystem(path, e))?;

        tracing::info!(path = %path.display(), bytes = bytes.len(), "document written");
        Ok(path.to_path_buf())
    }

    async fn resolve_image(&self, image_url: Option<&str>) -> ImageBlock {
        let Some(url) = image_url.map(str::trim).filter(|u| !u.is_empty()) else {
            return ImageBlock::NotFound;
        };

        let embedded = match self.fetcher.fetch(url).await {
            Ok(bytes) => decode_to_png(&bytes),
            Err(e) => Err(e),
        };

        match embedded {
            Ok(embedded) => ImageBlock::Embedded(embedded),
            Err(e) => {
                tracing::warn!(url, error = %e, "image could not be embedded, inserting link instead");
                ImageBlock::Unavailable(url.to_string())
            }
        }
    }

    fn body_run(&self, text: &str) -> Run {
        let family = self.document.font_family.as_str();
        Run::new()
            .add_text(text)
            .size(self.document.font_size_pt as usize * 2)
            .fonts(
                RunFonts::new()
                    .ascii(family)
                    .hi_ansi(family)
                    .east_asia(family)
                    .cs(family),
            )
    }

    fn line_spacing(&self) -> LineSpacing {
        // 单倍行距为 240
        LineSpacing::new().line((self.document.line_spacing * 240.0).round() as i32)
    }

    fn image_size_emu(&self, image: &EmbeddedImage) -> (u32, u32) {
        let width = self.document.image_width_inches * EMU_PER_INCH;
        let ratio = image.height_px as f64 / image.width_px.max(1) as f64;
        (width.round() as u32, (width * ratio).round() as u32)
    }

    /// 打包为 docx 字节
    pub fn pack(&self, blocks: &[Block]) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        self.build_document(blocks)
            .build()
            .pack(&mut buffer)
            .map_err(|e| DocsmithError::Document(e.to_string()))?;
        Ok(buffer.into_inner())
    }

    fn build_document(&self, blocks: &[Block]) -> Docx {
        let mut docx = Docx::new()
            .add_style(Style::new("Heading1", StyleType::Paragraph).name("Heading 1"))
            .add_style(Style::new("Heading2", StyleType::Paragraph).name("Heading 2"));

        for block in blocks {
            let paragraph = match block {
                Block::Title(text) => Paragraph::new()
                    .style("Heading1")
                    .align(AlignmentType::Center)
                    .add_run(self.body_run(text).size(36).bold()),
                Block::Heading(text) => Paragraph::new()
                    .style("Heading2")
                    .add_run(self.body_run(text).size(30).bold()),
                Block::Paragraph(text) => Paragraph::new()
                    .line_spacing(self.line_spacing())
                    .add_run(self.body_run(text)),
                Block::PageBreak => Paragraph::new().add_run(Run::new().add_break(BreakType::Page)),
                Block::Image(image) => {
                    let (width, height) = self.image_size_emu(image);
                    let pic = Pic::new_with_dimensions(image.png.clone(), image.width_px, image.height_px)
                        .size(width, height);
                    Paragraph::new()
                        .align(AlignmentType::Center)
                        .add_run(Run::new().add_image(pic))
                }
                Block::Notice(text) => Paragraph::new().add_run(self.body_run(text)),
            };
            docx = docx.add_paragraph(paragraph);
        }
        docx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::outlet::image_fetch::StandInImageFetcher;
    use crate::generator::types::Section;
    use async_trait::async_trait;

    struct BrokenFetcher;

    #[async_trait]
    impl ImageFetcher for BrokenFetcher {
        async fn fetch(&self, _url: &str) -> Result<Vec<u8>> {
            Ok(b"definitely not an image".to_vec())
        }
    }

    fn article() -> Article {
        Article {
            title: "Article: Example".into(),
            sections: vec![
                Section {
                    heading: "Introduction".into(),
                    body: "First paragraph.\n\n  \n\nSecond paragraph.".into(),
                },
                Section {
                    heading: "".into(),
                    body: "Headless body".into(),
                },
                Section {
                    heading: " Image Placeholder ".into(),
                    body: "https://img/x.png".into(),
                },
            ],
        }
    }

    fn renderer(fetcher: Arc<dyn ImageFetcher>) -> DocxRenderer {
        DocxRenderer::new(fetcher, DocumentConfig::default(), TargetLanguage::English)
    }

    #[test]
    fn test_layout_skips_placeholder_and_adds_notice() {
        let blocks = layout(&article(), ImageBlock::NotFound, TargetLanguage::English);
        assert_eq!(
            blocks,
            vec![
                Block::Title("Article: Example".into()),
                Block::Heading("Introduction".into()),
                Block::Paragraph("First paragraph.".into()),
                Block::Paragraph("Second paragraph.".into()),
                Block::Paragraph("Headless body".into()),
                Block::Notice("Image not found.".into()),
            ]
        );
    }

    #[test]
    fn test_layout_puts_image_on_new_page() {
        let image = EmbeddedImage {
            png: vec![1],
            width_px: 2,
            height_px: 1,
        };
        let blocks = layout(&article(), ImageBlock::Embedded(image.clone()), TargetLanguage::Russian);
        let tail = &blocks[blocks.len() - 3..];
        assert_eq!(
            tail,
            &[
                Block::PageBreak,
                Block::Heading("Изображение".into()),
                Block::Image(image),
            ]
        );
    }

    #[tokio::test]
    async fn test_undecodable_image_degrades_to_link() {
        let renderer = renderer(Arc::new(BrokenFetcher));
        let image = renderer.resolve_image(Some("https://img/x.png")).await;
        assert_eq!(image, ImageBlock::Unavailable("https://img/x.png".into()));

        let blocks = layout(&article(), image, TargetLanguage::English);
        assert!(matches!(
            blocks.last(),
            Some(Block::Notice(text)) if text.contains("https://img/x.png")
        ));
    }

    #[tokio::test]
    async fn test_blank_url_counts_as_missing() {
        let renderer = renderer(Arc::new(BrokenFetcher));
        assert_eq!(renderer.resolve_image(Some("  ")).await, ImageBlock::NotFound);
        assert_eq!(renderer.resolve_image(None).await, ImageBlock::NotFound);
    }

    #[test]
    fn test_document_xml_carries_base_font_and_spacing() {
        let renderer = renderer(Arc::new(BrokenFetcher));
        let blocks = layout(&article(), ImageBlock::NotFound, TargetLanguage::English);
        let xml = String::from_utf8(renderer.build_document(&blocks).build().document).unwrap();

        assert!(xml.contains(r#"w:line="360""#));
        assert!(xml.contains(r#"w:sz w:val="28""#));
        assert!(xml.contains(r#"w:ascii="Times New Roman""#));
        assert!(xml.contains(r#"w:jc w:val="center""#));
        assert!(xml.contains("Article: Example"));
        assert!(xml.contains("Second paragraph."));
        assert!(!xml.contains("https://img/x.png"));
        assert!(!xml.contains("Image Placeholder"));
    }

    #[test]
    fn test_image_width_keeps_aspect_ratio() {
        let renderer = renderer(Arc::new(BrokenFetcher));
        let image = EmbeddedImage {
            png: vec![],
            width_px: 400,
            height_px: 200,
        };
        assert_eq!(renderer.image_size_emu(&image), (5_486_400, 2_743_200));
    }

    #[tokio::test]
    async fn test_render_writes_zip_container_with_image() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.docx");
        let renderer = renderer(Arc::new(StandInImageFetcher::default()));

        let written = renderer
            .render(&article(), Some("https://img/x.png"), &path)
            .await
            .unwrap();

        assert_eq!(written, path);
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[tokio::test]
    async fn test_render_into_missing_directory_is_filesystem_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.docx");
        let renderer = renderer(Arc::new(StandInImageFetcher::default()));

        let err = renderer.render(&article(), None, &path).await.unwrap_err();
        assert!(matches!(err, DocsmithError::Filesystem { .. }));
    }
}
