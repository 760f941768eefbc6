//! Test fixtures: encoded images and multipart bodies.

use mosaic_core::{Channels, PixelBuffer};
use photomosaic::codec::{encode, ImageFormat};

pub const BOUNDARY: &str = "photomosaic-test-boundary";

pub mod colors {
    pub const RED: [u8; 4] = [255, 0, 0, 255];
    pub const GREEN: [u8; 4] = [0, 255, 0, 255];
    pub const BLUE: [u8; 4] = [0, 0, 255, 255];
    pub const CLEAR: [u8; 4] = [0, 0, 0, 0];
}

/// PNG bytes of a solid RGBA image
pub fn solid_png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    encode(&PixelBuffer::filled(width, height, rgba).unwrap(), ImageFormat::Png).unwrap()
}

/// PNG bytes of a solid RGB (no alpha) image
pub fn solid_rgb_png(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    let data = rgb.repeat((width * height) as usize);
    let buffer = PixelBuffer::new(width, height, Channels::Rgb, data).unwrap();
    encode(&buffer, ImageFormat::Png).unwrap()
}

/// PNG whose left half is `left` and right half is `right`
pub fn split_png(width: u32, height: u32, left: [u8; 4], right: [u8; 4]) -> Vec<u8> {
    let mut buffer = PixelBuffer::filled(width, height, left).unwrap();
    for y in 0..height {
        for x in width / 2..width {
            buffer.put_pixel(x, y, right);
        }
    }
    encode(&buffer, ImageFormat::Png).unwrap()
}

enum Part {
    Text(String, String),
    File(String, String, Vec<u8>),
}

/// Hand-built `multipart/form-data` body
#[derive(Default)]
pub struct MultipartBody {
    parts: Vec<Part>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: impl ToString) -> Self {
        self.parts
            .push(Part::Text(name.to_string(), value.to_string()));
        self
    }

    pub fn file(mut self, name: &str, filename: &str, bytes: Vec<u8>) -> Self {
        self.parts
            .push(Part::File(name.to_string(), filename.to_string(), bytes));
        self
    }

    /// Base image plus the given tiles as repeated `imageList` parts
    pub fn compose(base: Vec<u8>, tiles: Vec<Vec<u8>>, size: u32, presence: f32) -> Self {
        let mut form = Self::new()
            .file("baseImage", "base.png", base)
            .text("imagesSize", size)
            .text("basePresence", presence);
        for (i, tile) in tiles.into_iter().enumerate() {
            form = form.file("imageList", &format!("tile{i}.png"), tile);
        }
        form
    }

    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={BOUNDARY}")
    }

    pub fn build(self) -> Vec<u8> {
        let mut body = Vec::new();
        for part in self.parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n")
                            .as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
                Part::File(name, filename, bytes) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                             Content-Type: application/octet-stream\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(&bytes);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }
}
