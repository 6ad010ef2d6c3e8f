use super::ImageError;
use crate::{conf::Conf, Result};
use reqwest::{header::CONTENT_TYPE, Client};
use std::future::Future;
use url::Url;

pub struct FetchedImage {
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Where report images come from. The HTTP source is the only production one;
/// tests plug in canned responses.
pub trait ImageSource {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchedImage, ImageError>> + Send;
}

#[derive(Clone)]
pub struct HttpImageSource {
    client: Client,
    max_bytes: usize,
}

impl HttpImageSource {
    pub fn new(conf: &Conf) -> Result<HttpImageSource> {
        let client = Client::builder()
            .timeout(conf.fetch_timeout)
            .user_agent(conf.user_agent.clone())
            .build()?;
        Ok(HttpImageSource::with_client(client, conf.max_image_bytes))
    }

    pub fn with_client(client: Client, max_bytes: usize) -> HttpImageSource {
        HttpImageSource { client, max_bytes }
    }
}

impl ImageSource for HttpImageSource {
    async fn fetch(&self, url: &str) -> Result<FetchedImage, ImageError> {
        let url = parse_url(url)?;
        let mut response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ImageError::Fetch(format!("Failed to fetch image: {url} ({e})")))?;
        if !response.status().is_success() {
            return Err(ImageError::Fetch(format!(
                "Failed to fetch image: {url} ({})",
                response.status()
            )));
        }
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|it| it.to_str().ok())
            .map(str::to_string);
        let too_large = || {
            ImageError::Fetch(format!(
                "Image is too large: {url} (over {} bytes)",
                self.max_bytes
            ))
        };
        if response.content_length().unwrap_or(0) > self.max_bytes as u64 {
            return Err(too_large());
        }
        // content-length may be absent or wrong, so count what actually arrives
        let mut bytes = vec![];
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| ImageError::Fetch(format!("Failed to read image: {url} ({e})")))?
        {
            if bytes.len() + chunk.len() > self.max_bytes {
                return Err(too_large());
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(FetchedImage {
            content_type,
            bytes,
        })
    }
}

fn parse_url(url: &str) -> Result<Url, ImageError> {
    match Url::parse(url.trim()) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Ok(url),
        _ => Err(ImageError::Fetch(format!("Invalid image URL: {url}"))),
    }
}
