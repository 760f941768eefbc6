//! Multipart form collection and the checks shared by every endpoint.

use axum::{
    body::Bytes,
    extract::Multipart,
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
};
use mosaic_core::PixelBuffer;
use std::collections::HashMap;
use std::str::FromStr;

use crate::codec::{self, ImageFormat};
use crate::error::ApiError;

const MIB: f64 = 1024.0 * 1024.0;

/// All parts of a multipart request, split into text fields and files.
///
/// A part counts as a file when it carries a file name or a content type.
/// Repeated file fields (`imageList`) keep their submission order.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, Vec<Bytes>>,
}

impl MultipartForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            let is_file = field.file_name().is_some() || field.content_type().is_some();
            if is_file {
                let data = field.bytes().await?;
                form.files.entry(name).or_default().push(data);
            } else {
                let text = field.text().await?;
                form.fields.insert(name, text);
            }
        }
        Ok(form)
    }

    /// Text field, treating an empty value as absent.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    pub fn parse<T>(&self, name: &'static str) -> Result<T, ApiError>
    where
        T: FromStr,
    {
        let raw = self.text(name).ok_or(ApiError::MissingField(name))?;
        parse_value(name, raw)
    }

    pub fn parse_optional<T>(&self, name: &'static str) -> Result<Option<T>, ApiError>
    where
        T: FromStr,
    {
        self.text(name).map(|raw| parse_value(name, raw)).transpose()
    }

    /// First file submitted under `name`.
    pub fn take_file(&mut self, name: &'static str) -> Result<Bytes, ApiError> {
        self.files
            .get_mut(name)
            .filter(|files| !files.is_empty())
            .map(|files| files.remove(0))
            .ok_or(ApiError::MissingField(name))
    }

    /// Every file submitted under `name`, possibly none.
    pub fn take_files(&mut self, name: &str) -> Vec<Bytes> {
        self.files.remove(name).unwrap_or_default()
    }
}

fn parse_value<T: FromStr>(name: &'static str, raw: &str) -> Result<T, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::invalid(name, format!("could not parse {raw:?}")))
}

/// Reject requests whose declared `Content-Length` is over `max_bytes`.
///
/// Bodies without the header are still capped by the router's body limit
/// while the multipart stream is read.
pub fn check_content_length(headers: &HeaderMap, max_bytes: usize) -> Result<(), ApiError> {
    let length = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());

    match length {
        Some(len) if len > max_bytes as u64 => Err(ApiError::exceeded(
            "Request content",
            format!("{:.1}MB", len as f64 / MIB),
            format!("{:.0}MB", max_bytes as f64 / MIB),
        )),
        _ => Ok(()),
    }
}

/// Decode an uploaded image and enforce the longest-side ceiling.
pub fn decode_upload(bytes: &[u8], max_side: u32) -> Result<PixelBuffer, ApiError> {
    let buffer = codec::decode(bytes)?;
    check_side(buffer.width().max(buffer.height()), max_side, "Image dimensions")?;
    Ok(buffer)
}

pub fn check_side(side: u32, max_side: u32, what: &'static str) -> Result<(), ApiError> {
    if side > max_side {
        return Err(ApiError::exceeded(what, side, max_side));
    }
    Ok(())
}

/// Run CPU-bound work off the async runtime.
pub async fn run_blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::Internal(format!("worker task failed: {e}")))?
}

pub fn image_response(bytes: Vec<u8>, format: ImageFormat) -> Response {
    ([(header::CONTENT_TYPE, format.content_type())], bytes).into_response()
}
