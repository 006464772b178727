//! 文章配图的获取

use async_trait::async_trait;
use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::time::Duration;

use crate::config::DocumentConfig;
use crate::error::{DocsmithError, Result};

/// 按 URL 取回图片的原始字节
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

pub struct HttpImageFetcher {
    http: reqwest::Client,
    timeout: Duration,
}

impl HttpImageFetcher {
    pub fn new(config: &DocumentConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            timeout: Duration::from_secs(config.image_timeout_secs),
        }
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!(url, "downloading image");
        let response = self.http.get(url).timeout(self.timeout).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DocsmithError::HttpStatus {
                service: "image",
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

/// 替身模式：不访问网络，生成一张固定的渐变 PNG
#[derive(Debug, Clone)]
pub struct StandInImageFetcher {
    width: u32,
    height: u32,
}

impl Default for StandInImageFetcher {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
        }
    }
}

#[async_trait]
impl ImageFetcher for StandInImageFetcher {
    async fn fetch(&self, _url: &str) -> Result<Vec<u8>> {
        let (width, height) = (self.width.max(1), self.height.max(1));
        let canvas = RgbImage::from_fn(width, height, |x, y| {
            Rgb([
                (x * 255 / width) as u8,
                (y * 255 / height) as u8,
                160,
            ])
        });

        let mut bytes = Vec::new();
        canvas.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }
}
