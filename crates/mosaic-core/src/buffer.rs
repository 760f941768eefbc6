//! Raw interleaved pixel storage.
//!
//! [`PixelBuffer`] is the only image type the crate understands. It owns a
//! row-major `Vec<u8>` with either 3 (RGB) or 4 (RGBA) interleaved channels.
//! Every stage of the pipeline returns a new buffer; nothing mutates a buffer
//! it did not allocate itself.

use crate::error::{MosaicError, Result};

/// Number of interleaved channels in a [`PixelBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channels {
    /// Red, green, blue.
    Rgb,
    /// Red, green, blue, alpha.
    Rgba,
}

impl Channels {
    /// Bytes per pixel.
    #[inline]
    pub fn count(self) -> usize {
        match self {
            Channels::Rgb => 3,
            Channels::Rgba => 4,
        }
    }

    /// Map a raw channel count to a layout.
    ///
    /// # Errors
    ///
    /// Returns [`MosaicError::UnsupportedChannels`] for anything but 3 or 4.
    pub fn from_count(count: usize) -> Result<Self> {
        match count {
            3 => Ok(Channels::Rgb),
            4 => Ok(Channels::Rgba),
            other => Err(MosaicError::UnsupportedChannels(other)),
        }
    }
}

/// A 2D grid of 8-bit pixels, row-major, channels interleaved.
///
/// # Example
///
/// ```
/// use mosaic_core::{Channels, PixelBuffer};
///
/// let buffer = PixelBuffer::filled(2, 2, [255, 0, 0, 255]).unwrap();
/// assert_eq!(buffer.channels(), Channels::Rgba);
/// assert_eq!(buffer.pixel(1, 1), [255, 0, 0, 255]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    channels: Channels,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw pixel bytes, validating the geometry.
    ///
    /// # Errors
    ///
    /// - [`MosaicError::ZeroDimension`] if either dimension is zero.
    /// - [`MosaicError::MalformedBuffer`] if `data.len()` is not
    ///   `width * height * channels`.
    pub fn new(width: u32, height: u32, channels: Channels, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(MosaicError::ZeroDimension { width, height });
        }
        let expected = width as usize * height as usize * channels.count();
        if data.len() != expected {
            return Err(MosaicError::MalformedBuffer {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Geometry already known to be consistent (derived from a valid buffer).
    pub(crate) fn from_parts(width: u32, height: u32, channels: Channels, data: Vec<u8>) -> Self {
        debug_assert_eq!(
            data.len(),
            width as usize * height as usize * channels.count()
        );
        Self {
            width,
            height,
            channels,
            data,
        }
    }

    /// Like [`PixelBuffer::new`] but takes an untyped channel count, as
    /// produced by decoders.
    pub fn from_raw(width: u32, height: u32, channel_count: usize, data: Vec<u8>) -> Result<Self> {
        Self::new(width, height, Channels::from_count(channel_count)?, data)
    }

    /// RGBA buffer with every channel of every pixel set to 0.
    ///
    /// # Errors
    ///
    /// [`MosaicError::ZeroDimension`] if either dimension is zero.
    pub fn transparent(width: u32, height: u32) -> Result<Self> {
        Self::filled(width, height, [0; 4])
    }

    /// RGBA buffer with every pixel set to `color`.
    ///
    /// # Errors
    ///
    /// [`MosaicError::ZeroDimension`] if either dimension is zero.
    pub fn filled(width: u32, height: u32, color: [u8; 4]) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(MosaicError::ZeroDimension { width, height });
        }
        let pixels = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixels * 4);
        for _ in 0..pixels {
            data.extend_from_slice(&color);
        }
        Ok(Self::from_parts(width, height, Channels::Rgba, data))
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn channels(&self) -> Channels {
        self.channels
    }

    /// Raw interleaved bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the buffer and return its bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * self.channels.count()
    }

    /// Pixel at `(x, y)` as RGBA. RGB buffers report alpha 255.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        match self.channels {
            Channels::Rgb => [self.data[i], self.data[i + 1], self.data[i + 2], 255],
            Channels::Rgba => [
                self.data[i],
                self.data[i + 1],
                self.data[i + 2],
                self.data[i + 3],
            ],
        }
    }

    /// Overwrite the pixel at `(x, y)`. Alpha is dropped for RGB buffers.
    #[inline]
    pub fn put_pixel(&mut self, x: u32, y: u32, px: [u8; 4]) {
        let i = self.offset(x, y);
        let n = self.channels.count();
        self.data[i..i + n].copy_from_slice(&px[..n]);
    }

    /// Copy the `width x height` rectangle starting at `(x, y)`.
    ///
    /// # Errors
    ///
    /// [`MosaicError::ZeroDimension`] for an empty rectangle; rectangles
    /// reaching past the buffer edge are clipped to it.
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> Result<Self> {
        let width = width.min(self.width.saturating_sub(x));
        let height = height.min(self.height.saturating_sub(y));
        if width == 0 || height == 0 {
            return Err(MosaicError::ZeroDimension { width, height });
        }
        if x == 0 && y == 0 && width == self.width && height == self.height {
            return Ok(self.clone());
        }

        let n = self.channels.count();
        let row_len = width as usize * n;
        let mut data = Vec::with_capacity(row_len * height as usize);
        for row in y..y + height {
            let start = self.offset(x, row);
            data.extend_from_slice(&self.data[start..start + row_len]);
        }
        Ok(Self {
            width,
            height,
            channels: self.channels,
            data,
        })
    }

    /// Copy an RGBA `block` into this RGBA buffer with its top-left at
    /// `(x, y)`. Parts falling outside the buffer are dropped.
    pub(crate) fn blit(&mut self, block: &PixelBuffer, x: u32, y: u32) {
        debug_assert_eq!(self.channels, Channels::Rgba);
        debug_assert_eq!(block.channels, Channels::Rgba);
        let width = block.width.min(self.width.saturating_sub(x));
        let row_len = width as usize * 4;
        for row in 0..block.height {
            let dst_y = y + row;
            if dst_y >= self.height {
                break;
            }
            let src = block.offset(0, row);
            let dst = self.offset(x, dst_y);
            self.data[dst..dst + row_len].copy_from_slice(&block.data[src..src + row_len]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_wrong_length() {
        let err = PixelBuffer::new(2, 2, Channels::Rgba, vec![0; 15]).unwrap_err();
        assert_eq!(
            err,
            MosaicError::MalformedBuffer {
                expected: 16,
                actual: 15
            }
        );
    }

    #[test]
    fn test_new_rejects_zero_dimension() {
        let err = PixelBuffer::new(0, 2, Channels::Rgb, vec![]).unwrap_err();
        assert!(err.is_invalid_dimension());
    }

    #[test]
    fn test_constructors_reject_zero_dimension() {
        assert_eq!(
            PixelBuffer::filled(0, 0, [1, 2, 3, 255]).unwrap_err(),
            MosaicError::ZeroDimension {
                width: 0,
                height: 0
            }
        );
        assert_eq!(
            PixelBuffer::transparent(0, 3).unwrap_err(),
            MosaicError::ZeroDimension {
                width: 0,
                height: 3
            }
        );
        assert!(PixelBuffer::filled(5, 0, [0; 4]).is_err());
    }

    #[test]
    fn test_from_raw_rejects_two_channels() {
        let err = PixelBuffer::from_raw(1, 1, 2, vec![0, 0]).unwrap_err();
        assert_eq!(err, MosaicError::UnsupportedChannels(2));
    }

    #[test]
    fn test_rgb_pixel_reports_opaque_alpha() {
        let buffer = PixelBuffer::new(1, 1, Channels::Rgb, vec![1, 2, 3]).unwrap();
        assert_eq!(buffer.pixel(0, 0), [1, 2, 3, 255]);
    }

    #[test]
    fn test_crop_copies_rectangle() {
        // 3x2 buffer where red channel encodes x + 10 * y
        let mut buffer = PixelBuffer::transparent(3, 2).unwrap();
        for y in 0..2 {
            for x in 0..3 {
                buffer.put_pixel(x, y, [(x + 10 * y) as u8, 0, 0, 255]);
            }
        }

        let cropped = buffer.crop(1, 0, 2, 2).unwrap();
        assert_eq!(cropped.width(), 2);
        assert_eq!(cropped.height(), 2);
        assert_eq!(cropped.pixel(0, 0)[0], 1);
        assert_eq!(cropped.pixel(1, 1)[0], 12);
    }

    #[test]
    fn test_crop_clips_to_edges() {
        let buffer = PixelBuffer::filled(4, 4, [9, 9, 9, 255]).unwrap();
        let cropped = buffer.crop(2, 2, 10, 10).unwrap();
        assert_eq!((cropped.width(), cropped.height()), (2, 2));
        assert!(buffer.crop(4, 0, 1, 1).is_err());
    }

    #[test]
    fn test_blit_places_block() {
        let mut canvas = PixelBuffer::transparent(4, 4).unwrap();
        let block = PixelBuffer::filled(2, 2, [7, 7, 7, 255]).unwrap();
        canvas.blit(&block, 2, 2);

        assert_eq!(canvas.pixel(1, 1), [0, 0, 0, 0]);
        assert_eq!(canvas.pixel(2, 2), [7, 7, 7, 255]);
        assert_eq!(canvas.pixel(3, 3), [7, 7, 7, 255]);
    }
}
