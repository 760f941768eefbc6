//! Encoded image bytes <-> [`PixelBuffer`].
//!
//! Decoding goes through the `image` crate (PNG and JPEG). PNG output is
//! written with the `png` crate directly; JPEG output uses `image`'s encoder.

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use mosaic_core::{Channels, PixelBuffer};
use std::io::Cursor;
use std::path::Path;

use crate::error::CodecError;

/// Default JPEG quality for file output when none is given.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Output encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    /// Quality in `0..=100`.
    Jpeg { quality: u8 },
}

impl ImageFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg { .. } => "image/jpeg",
        }
    }

    /// Pick a format from a file extension, defaulting to PNG.
    pub fn from_path(path: &Path, quality: Option<u8>) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("jpg") | Some("jpeg") => ImageFormat::Jpeg {
                quality: quality.unwrap_or(DEFAULT_JPEG_QUALITY),
            },
            _ => ImageFormat::Png,
        }
    }
}

/// Decode PNG or JPEG bytes.
///
/// Images carrying alpha decode to RGBA, everything else (including
/// greyscale) to RGB, so callers always see 3 or 4 channels.
pub fn decode(bytes: &[u8]) -> Result<PixelBuffer, CodecError> {
    let img = image::load_from_memory(bytes).map_err(|e| CodecError::Decode(e.to_string()))?;
    let (width, height) = (img.width(), img.height());

    let buffer = if img.color().has_alpha() {
        PixelBuffer::new(width, height, Channels::Rgba, img.into_rgba8().into_raw())
    } else {
        PixelBuffer::new(width, height, Channels::Rgb, img.into_rgb8().into_raw())
    };
    buffer.map_err(|e| CodecError::Decode(e.to_string()))
}

/// Encode `buffer` in the requested format.
pub fn encode(buffer: &PixelBuffer, format: ImageFormat) -> Result<Vec<u8>, CodecError> {
    match format {
        ImageFormat::Png => encode_png(buffer),
        ImageFormat::Jpeg { quality } => encode_jpeg(buffer, quality),
    }
}

fn encode_png(buffer: &PixelBuffer) -> Result<Vec<u8>, CodecError> {
    let color_type = match buffer.channels() {
        Channels::Rgb => png::ColorType::Rgb,
        Channels::Rgba => png::ColorType::Rgba,
    };

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, buffer.width(), buffer.height());
        encoder.set_color(color_type);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .map_err(|e| CodecError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(buffer.as_bytes())
            .map_err(|e| CodecError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}

fn encode_jpeg(buffer: &PixelBuffer, quality: u8) -> Result<Vec<u8>, CodecError> {
    if quality > 100 {
        return Err(CodecError::InvalidQuality(quality));
    }

    // JPEG has no alpha channel
    let rgb: Vec<u8> = match buffer.channels() {
        Channels::Rgb => buffer.as_bytes().to_vec(),
        Channels::Rgba => buffer
            .as_bytes()
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect(),
    };

    let mut out = Vec::new();
    // The encoder's scale starts at 1
    JpegEncoder::new_with_quality(&mut out, quality.max(1))
        .encode(&rgb, buffer.width(), buffer.height(), ExtendedColorType::Rgb8)
        .map_err(|e| CodecError::JpegEncode(e.to_string()))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

    #[test]
    fn test_png_keeps_pixels_and_alpha() {
        let mut buffer = PixelBuffer::filled(3, 2, [10, 20, 30, 255]).unwrap();
        buffer.put_pixel(2, 1, [0, 0, 0, 0]);

        let bytes = encode(&buffer, ImageFormat::Png).unwrap();
        assert_eq!(&bytes[..8], PNG_SIGNATURE);

        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded, buffer);
    }

    #[test]
    fn test_rgb_png_decodes_to_three_channels() {
        let buffer = PixelBuffer::new(2, 2, Channels::Rgb, vec![5; 12]).unwrap();
        let bytes = encode(&buffer, ImageFormat::Png).unwrap();
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.channels(), Channels::Rgb);
    }

    #[test]
    fn test_jpeg_output_drops_alpha() {
        let buffer = PixelBuffer::filled(8, 8, [200, 100, 50, 128]).unwrap();
        let bytes = encode(&buffer, ImageFormat::Jpeg { quality: 80 }).unwrap();
        // SOI marker
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);

        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.channels(), Channels::Rgb);
        assert_eq!((decoded.width(), decoded.height()), (8, 8));
    }

    #[test]
    fn test_jpeg_quality_zero_is_accepted() {
        let buffer = PixelBuffer::filled(4, 4, [1, 2, 3, 255]).unwrap();
        assert!(encode(&buffer, ImageFormat::Jpeg { quality: 0 }).is_ok());
    }

    #[test]
    fn test_jpeg_quality_above_100_rejected() {
        let buffer = PixelBuffer::filled(4, 4, [1, 2, 3, 255]).unwrap();
        let err = encode(&buffer, ImageFormat::Jpeg { quality: 101 }).unwrap_err();
        assert!(matches!(err, CodecError::InvalidQuality(101)));
    }

    #[test]
    fn test_decode_garbage_fails() {
        let err = decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, CodecError::Decode(_)));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            ImageFormat::from_path(Path::new("out.JPG"), Some(70)),
            ImageFormat::Jpeg { quality: 70 }
        );
        assert_eq!(
            ImageFormat::from_path(Path::new("out.jpeg"), None),
            ImageFormat::Jpeg {
                quality: DEFAULT_JPEG_QUALITY
            }
        );
        assert_eq!(
            ImageFormat::from_path(Path::new("out.png"), Some(70)),
            ImageFormat::Png
        );
        assert_eq!(ImageFormat::from_path(Path::new("out"), None), ImageFormat::Png);
    }
}
