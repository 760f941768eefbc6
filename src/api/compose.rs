use axum::{
    body::Bytes,
    extract::{Multipart, State},
    http::HeaderMap,
    response::Response,
};
use mosaic_core::{MosaicBuilder, MosaicError};
use std::time::Instant;
use utoipa::ToSchema;

use super::form::{check_content_length, decode_upload, image_response, run_blocking, MultipartForm};
use crate::codec::{self, ImageFormat};
use crate::error::ApiError;
use crate::models::Limits;
use crate::server::AppState;

/// Form fields accepted by `POST /compose`
#[derive(Debug, ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct ComposeForm {
    /// Image the mosaic approximates (PNG or JPEG)
    #[schema(value_type = String, format = Binary)]
    pub base_image: Bytes,
    /// Tile images; repeat the field once per tile
    #[schema(value_type = Vec<String>)]
    pub image_list: Vec<Bytes>,
    /// Side length of each square block, in pixels
    pub images_size: u32,
    /// Weight of the base image in each blended block, 0 - 1
    pub base_presence: f32,
}

impl ComposeForm {
    fn from_form(mut form: MultipartForm) -> Result<Self, ApiError> {
        Ok(Self {
            images_size: form.parse("imagesSize")?,
            base_presence: form.parse("basePresence")?,
            base_image: form.take_file("baseImage")?,
            image_list: form.take_files("imageList"),
        })
    }

    fn run(self, limits: &Limits) -> Result<Vec<u8>, ApiError> {
        if self.image_list.len() > limits.max_tile_count {
            return Err(ApiError::exceeded(
                "Block image list",
                self.image_list.len(),
                limits.max_tile_count,
            ));
        }

        let base = decode_upload(&self.base_image, limits.max_image_size)?;
        let size = self.images_size;
        if size == 0 {
            return Err(MosaicError::ZeroBlockSize.into());
        }

        let ratio = (base.width() as f64 * base.height() as f64).sqrt() / size as f64;
        if ratio > limits.max_base_to_block_ratio {
            return Err(ApiError::exceeded(
                "Base image to block size ratio",
                format!("{ratio:.1}"),
                limits.max_base_to_block_ratio,
            ));
        }

        let tiles = self
            .image_list
            .iter()
            .map(|bytes| decode_upload(bytes, limits.max_image_size))
            .collect::<Result<Vec<_>, _>>()?;

        let mosaic = MosaicBuilder::new(size)
            .base_presence(self.base_presence)
            .compose(&base, &tiles)?;
        Ok(codec::encode(&mosaic, ImageFormat::Png)?)
    }
}

/// Compose a photomosaic
///
/// The base image is cropped to a whole number of `imagesSize` blocks; each
/// visible block is replaced by the tile with the closest average color,
/// blended with the base by `basePresence`. Returns the mosaic as PNG.
#[utoipa::path(
    post,
    path = "/compose",
    request_body(content = ComposeForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Composed mosaic", content_type = "image/png"),
        (status = 400, description = "Missing or invalid field, bad block size, or undecodable image"),
        (status = 413, description = "Request, image, ratio or tile count exceeds a configured limit"),
    ),
    tag = "Images"
)]
pub async fn handle_compose(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let limits = state.config.limits.clone();
    check_content_length(&headers, limits.compose_request_bytes())?;

    let request = ComposeForm::from_form(MultipartForm::read(multipart).await?)?;
    let (size, presence, tile_count) = (
        request.images_size,
        request.base_presence,
        request.image_list.len(),
    );
    tracing::debug!(size, presence, tile_count, "Compose request received");

    let started = Instant::now();
    let png = run_blocking(move || request.run(&limits)).await?;

    tracing::info!(
        size,
        tile_count,
        bytes = png.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Composed mosaic"
    );
    Ok(image_response(png, ImageFormat::Png))
}
