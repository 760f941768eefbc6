//! Photomosaic - compose images from tiles over HTTP or the command line.
//!
//! The mosaic algorithms live in the `mosaic-core` crate; this crate adds
//! image codecs, the HTTP API, configuration and tile loading.
//! This library exposes modules for integration testing.

pub mod api;
pub mod codec;
pub mod error;
pub mod models;
pub mod server;
pub mod services;
