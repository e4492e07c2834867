use base64::Engine;

use crate::error::{Error, Result};

/// Uploads larger than this are rejected at the input boundary.
pub const MAX_PHOTO_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    DeviceRGB,
    DeviceGray,
}

impl ColorSpace {
    pub fn pdf_name(&self) -> &'static str {
        match self {
            ColorSpace::DeviceRGB => "DeviceRGB",
            ColorSpace::DeviceGray => "DeviceGray",
        }
    }
}

/// An image ready to embed: JPEG bytes are kept as-is (DCTDecode),
/// PNG is decoded to raw 8-bit samples with alpha split out.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
    pub color_space: ColorSpace,
    pub data: Vec<u8>,
    pub alpha: Option<Vec<u8>>,
}

pub fn detect_format(data: &[u8]) -> Option<ImageFormat> {
    match data {
        [0xFF, 0xD8, ..] => Some(ImageFormat::Jpeg),
        [0x89, b'P', b'N', b'G', ..] => Some(ImageFormat::Png),
        _ => None,
    }
}

pub fn decode_image(data: &[u8]) -> Result<DecodedImage> {
    match detect_format(data) {
        Some(ImageFormat::Jpeg) => decode_jpeg(data),
        Some(ImageFormat::Png) => decode_png(data),
        None => Err(Error::Image(
            "unsupported image format (expected JPEG or PNG)".to_string(),
        )),
    }
}

/// Decode a `data:image/...;base64,` URL into raw bytes.
pub fn decode_data_url(url: &str) -> Result<Vec<u8>> {
    let (header, payload) = url
        .split_once(',')
        .ok_or_else(|| Error::DataUrl("missing ',' separator".to_string()))?;
    if !header.starts_with("data:") {
        return Err(Error::DataUrl("missing 'data:' scheme".to_string()));
    }
    if !header.ends_with(";base64") {
        return Err(Error::DataUrl("only base64 payloads are supported".to_string()));
    }
    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| Error::DataUrl(format!("base64 decode error: {}", e)))
}

fn decode_jpeg(data: &[u8]) -> Result<DecodedImage> {
    let (width, height, components) = jpeg_frame(data)?;
    let color_space = match components {
        1 => ColorSpace::DeviceGray,
        3 => ColorSpace::DeviceRGB,
        n => {
            return Err(Error::Image(format!(
                "unsupported JPEG component count {}",
                n
            )))
        }
    };
    Ok(DecodedImage {
        width,
        height,
        format: ImageFormat::Jpeg,
        color_space,
        data: data.to_vec(),
        alpha: None,
    })
}

/// Walk the JPEG marker segments until a start-of-frame and return
/// width, height and component count. Every SOFn shares one header
/// layout; C4 (DHT), C8 (JPG) and CC (DAC) are ordinary segments.
fn jpeg_frame(data: &[u8]) -> Result<(u32, u32, u8)> {
    let mut i = 2;
    while i + 3 < data.len() {
        if data[i] != 0xFF {
            i += 1;
            continue;
        }
        let marker = data[i + 1];
        match marker {
            0xFF => i += 1,
            0x01 | 0xD0..=0xD7 => i += 2,
            0xC0..=0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF => {
                let frame = data
                    .get(i + 5..i + 10)
                    .ok_or_else(|| Error::Image("truncated JPEG frame header".to_string()))?;
                let height = u16::from_be_bytes([frame[0], frame[1]]) as u32;
                let width = u16::from_be_bytes([frame[2], frame[3]]) as u32;
                return Ok((width, height, frame[4]));
            }
            _ => {
                let len = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
                i += 2 + len;
            }
        }
    }
    Err(Error::Image("no frame header found in JPEG".to_string()))
}

fn decode_png(data: &[u8]) -> Result<DecodedImage> {
    let mut decoder = png::Decoder::new(data);
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder
        .read_info()
        .map_err(|e| Error::Image(format!("PNG decode error: {}", e)))?;
    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| Error::Image(format!("PNG frame error: {}", e)))?;
    buf.truncate(info.buffer_size());

    let (color_space, channels) = match info.color_type {
        png::ColorType::Rgb => (ColorSpace::DeviceRGB, 3),
        png::ColorType::Rgba => (ColorSpace::DeviceRGB, 4),
        png::ColorType::Grayscale => (ColorSpace::DeviceGray, 1),
        png::ColorType::GrayscaleAlpha => (ColorSpace::DeviceGray, 2),
        other => {
            return Err(Error::Image(format!(
                "unsupported PNG color type {:?}",
                other
            )))
        }
    };

    let (samples, alpha) = if channels == 2 || channels == 4 {
        split_alpha(&buf, channels)
    } else {
        (buf, None)
    };

    Ok(DecodedImage {
        width: info.width,
        height: info.height,
        format: ImageFormat::Png,
        color_space,
        data: samples,
        alpha,
    })
}

fn split_alpha(buf: &[u8], channels: usize) -> (Vec<u8>, Option<Vec<u8>>) {
    let pixels = buf.len() / channels;
    let mut color = Vec::with_capacity(pixels * (channels - 1));
    let mut alpha = Vec::with_capacity(pixels);
    for px in buf.chunks_exact(channels) {
        color.extend_from_slice(&px[..channels - 1]);
        alpha.push(px[channels - 1]);
    }
    (color, Some(alpha))
}
