use super::deck::Rect;
use std::fmt;
use strum::Display;

/// Why a single image could not be placed on its slide.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageError {
    Fetch(String),
    Encoding(String),
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::Fetch(err) => write!(f, "{}", err),
            ImageError::Encoding(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ImageError {}

/// Formats a presentation package can embed. Display gives the file extension.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum PictureFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
}

impl PictureFormat {
    pub const ALL: [PictureFormat; 4] = [
        PictureFormat::Png,
        PictureFormat::Jpeg,
        PictureFormat::Gif,
        PictureFormat::Bmp,
    ];

    pub fn sniff(bytes: &[u8]) -> Option<PictureFormat> {
        if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
            Some(PictureFormat::Png)
        } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(PictureFormat::Jpeg)
        } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            Some(PictureFormat::Gif)
        } else if bytes.starts_with(b"BM") && bytes.len() > 26 {
            Some(PictureFormat::Bmp)
        } else {
            None
        }
    }

    pub fn mime_type(&self) -> String {
        format!("image/{self}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Picture {
    pub format: PictureFormat,
    pub bytes: Vec<u8>,
    /// Width and height in pixels, when the header could be read.
    pub pixel_size: Option<(u32, u32)>,
}

impl Picture {
    pub fn decode(bytes: Vec<u8>) -> Result<Picture, ImageError> {
        if bytes.is_empty() {
            return Err(ImageError::Encoding("Image is empty".into()));
        }
        let format = PictureFormat::sniff(&bytes)
            .ok_or_else(|| ImageError::Encoding("Unsupported image encoding".into()))?;
        let pixel_size = pixel_size(format, &bytes).filter(|(w, h)| *w > 0 && *h > 0);
        Ok(Picture {
            format,
            bytes,
            pixel_size,
        })
    }

    /// Largest rectangle with the picture's aspect ratio that fits `region`, centred in it.
    pub fn contain(&self, region: Rect) -> Rect {
        let Some((width, height)) = self.pixel_size else {
            return region;
        };
        let (width, height) = (width as f64, height as f64);
        let scale = (region.w / width).min(region.h / height);
        let w = width * scale;
        let h = height * scale;
        Rect {
            x: region.x + (region.w - w) / 2.0,
            y: region.y + (region.h - h) / 2.0,
            w,
            h,
        }
    }
}

fn pixel_size(format: PictureFormat, bytes: &[u8]) -> Option<(u32, u32)> {
    match format {
        PictureFormat::Png => {
            // IHDR is always the first chunk
            if bytes.get(12..16)? != b"IHDR" {
                return None;
            }
            Some((be_u32(bytes, 16)?, be_u32(bytes, 20)?))
        }
        PictureFormat::Gif => Some((le_u16(bytes, 6)? as u32, le_u16(bytes, 8)? as u32)),
        PictureFormat::Bmp => {
            let width = le_u32(bytes, 18)? as i32;
            let height = le_u32(bytes, 22)? as i32;
            Some((width.unsigned_abs(), height.unsigned_abs()))
        }
        PictureFormat::Jpeg => jpeg_size(bytes),
    }
}

fn jpeg_size(bytes: &[u8]) -> Option<(u32, u32)> {
    let mut pos = 2;
    loop {
        while *bytes.get(pos)? != 0xFF {
            pos += 1;
        }
        while *bytes.get(pos)? == 0xFF {
            pos += 1;
        }
        let marker = *bytes.get(pos)?;
        pos += 1;
        match marker {
            // standalone markers carry no length
            0x01 | 0xD0..=0xD7 => continue,
            0xD9 | 0xDA => return None,
            0xC0..=0xCF if marker != 0xC4 && marker != 0xC8 && marker != 0xCC => {
                let height = be_u16(bytes, pos + 3)?;
                let width = be_u16(bytes, pos + 5)?;
                return Some((width as u32, height as u32));
            }
            _ => {
                let len = be_u16(bytes, pos)? as usize;
                if len < 2 {
                    return None;
                }
                pos += len;
            }
        }
    }
}

fn be_u16(bytes: &[u8], at: usize) -> Option<u16> {
    Some(u16::from_be_bytes(bytes.get(at..at + 2)?.try_into().ok()?))
}

fn be_u32(bytes: &[u8], at: usize) -> Option<u32> {
    Some(u32::from_be_bytes(bytes.get(at..at + 4)?.try_into().ok()?))
}

fn le_u16(bytes: &[u8], at: usize) -> Option<u16> {
    Some(u16::from_le_bytes(bytes.get(at..at + 2)?.try_into().ok()?))
}

fn le_u32(bytes: &[u8], at: usize) -> Option<u32> {
    Some(u32::from_le_bytes(bytes.get(at..at + 4)?.try_into().ok()?))
}
