use axum::{
    body::Bytes,
    extract::{Multipart, State},
    http::HeaderMap,
    response::Response,
};
use mosaic_core::resize::aspect_height;
use mosaic_core::resize_buffer;
use std::time::Instant;
use utoipa::ToSchema;

use super::form::{check_content_length, check_side, decode_upload, image_response, run_blocking, MultipartForm};
use crate::codec::{self, ImageFormat};
use crate::error::ApiError;
use crate::models::Limits;
use crate::server::AppState;

/// Form fields accepted by `POST /resize`
#[derive(Debug, ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct ResizeForm {
    /// Image to resize (PNG or JPEG)
    #[schema(value_type = String, format = Binary)]
    pub base_image: Bytes,
    /// Target width in pixels
    pub image_width: u32,
    /// Target height; empty or 0 keeps the aspect ratio
    pub image_height: Option<u32>,
}

impl ResizeForm {
    fn from_form(mut form: MultipartForm) -> Result<Self, ApiError> {
        Ok(Self {
            image_width: form.parse("imageWidth")?,
            image_height: form.parse_optional("imageHeight")?,
            base_image: form.take_file("baseImage")?,
        })
    }

    fn run(self, limits: &Limits) -> Result<Vec<u8>, ApiError> {
        let max = limits.max_image_size;
        check_side(self.image_width, max, "Requested dimensions")?;
        check_side(self.image_height.unwrap_or(0), max, "Requested dimensions")?;

        let base = decode_upload(&self.base_image, max)?;
        let height = match self.image_height {
            Some(h) if h > 0 => h,
            _ => aspect_height(base.width(), base.height(), self.image_width),
        };
        // Derived heights can exceed the ceiling for very tall images
        check_side(height, max, "Requested dimensions")?;

        let resized = resize_buffer(&base, self.image_width, Some(height))?;
        Ok(codec::encode(&resized, ImageFormat::Png)?)
    }
}

/// Resize an image
///
/// Shrinking uses area averaging, enlarging uses bicubic interpolation.
/// Returns the result as PNG.
#[utoipa::path(
    post,
    path = "/resize",
    request_body(content = ResizeForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Resized image", content_type = "image/png"),
        (status = 400, description = "Missing or invalid field, or undecodable image"),
        (status = 413, description = "Request or image exceeds a configured limit"),
    ),
    tag = "Images"
)]
pub async fn handle_resize(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let limits = state.config.limits.clone();
    check_content_length(&headers, limits.request_bytes())?;

    let request = ResizeForm::from_form(MultipartForm::read(multipart).await?)?;
    let (width, height) = (request.image_width, request.image_height);

    let started = Instant::now();
    let png = run_blocking(move || request.run(&limits)).await?;

    tracing::info!(
        width,
        height = ?height,
        bytes = png.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Resized image"
    );
    Ok(image_response(png, ImageFormat::Png))
}
