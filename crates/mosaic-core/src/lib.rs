//! mosaic-core: photomosaic compositing on raw pixel buffers
//!
//! Replaces every region of a base image with the candidate tile whose color
//! best matches it, optionally blending the original color back in. The crate
//! works purely on in-memory [`PixelBuffer`]s; decoding, encoding and any
//! transport are the caller's business.
//!
//! # Quick Start
//!
//! ```
//! use mosaic_core::{compose_mosaic, PixelBuffer};
//!
//! let base = PixelBuffer::filled(4, 4, [255, 0, 0, 255]).unwrap();
//! let tiles = vec![
//!     PixelBuffer::filled(2, 2, [0, 0, 255, 255]).unwrap(),
//!     PixelBuffer::filled(2, 2, [255, 0, 0, 255]).unwrap(),
//! ];
//!
//! let mosaic = compose_mosaic(&base, &tiles, 2, 0.0).unwrap();
//! assert_eq!(mosaic, base);
//! ```
//!
//! # Strategies
//!
//! - **Grid** ([`compose_mosaic`], [`MosaicBuilder`]): the base is cropped to
//!   a multiple of the block size and every `size x size` block is replaced
//!   by the pool tile with the nearest average color (Euclidean over RGBA).
//!   Mostly transparent blocks stay transparent.
//! - **Random placement** ([`scatter_mosaic`]): tiles are stamped centered on
//!   random visible base pixels, chosen by per-pixel footprint distance, and
//!   may overlap.
//!
//! # Pipeline
//!
//! ```text
//! base, tiles
//!     |
//!     v
//! normalize_alpha        (RGB -> RGBA, zero-alpha pixels -> 0,0,0,0)
//!     |
//!     v
//! resize_buffer          (tiles -> size x size; area when shrinking, cubic otherwise)
//!     |
//!     v
//! average_color          (once per tile, once per block)
//!     |
//!     v
//! TilePool::best_match   (linear scan, first minimum wins)
//!     |
//!     v
//! blend                  ((1 - p) * tile + p * base)
//! ```
//!
//! Everything is synchronous and single-threaded. The only buffer mutated in
//! place is the output of the running composition.

pub mod buffer;
pub mod color;
pub mod compose;
pub mod error;
pub mod matcher;
pub mod normalize;
pub mod resize;
pub mod scatter;


pub use buffer::{Channels, PixelBuffer};
pub use color::{average_color, average_region, AverageColor};
pub use compose::{blend, compose_mosaic, MosaicBuilder, TRANSPARENCY_THRESHOLD};
pub use error::{MosaicError, Result};
pub use matcher::{Tile, TilePool};
pub use normalize::normalize_alpha;
pub use resize::{resize_buffer, ResizeFilter};
pub use scatter::{scatter_mosaic, scatter_mosaic_with_rng, ScatterOptions};
