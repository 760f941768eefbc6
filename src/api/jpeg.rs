use axum::{
    body::Bytes,
    extract::{Multipart, State},
    http::HeaderMap,
    response::Response,
};
use utoipa::ToSchema;

use super::form::{check_content_length, decode_upload, image_response, run_blocking, MultipartForm};
use crate::codec::{self, ImageFormat};
use crate::error::ApiError;
use crate::server::AppState;

/// Form fields accepted by `POST /jpeg`
#[derive(Debug, ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct JpegForm {
    /// Image to convert (PNG or JPEG)
    #[schema(value_type = String, format = Binary)]
    pub base_image: Bytes,
    /// JPEG quality, 0 - 100
    pub quality: u8,
}

impl JpegForm {
    fn from_form(mut form: MultipartForm) -> Result<Self, ApiError> {
        // Parsed wide so out-of-range values get a range message, not a parse error
        let quality: i64 = form.parse("quality")?;
        let quality = u8::try_from(quality)
            .ok()
            .filter(|q| *q <= 100)
            .ok_or_else(|| ApiError::invalid("quality", format!("{quality} is outside 0 - 100")))?;

        Ok(Self {
            quality,
            base_image: form.take_file("baseImage")?,
        })
    }
}

/// Re-encode an image as JPEG
///
/// Any alpha channel is dropped.
#[utoipa::path(
    post,
    path = "/jpeg",
    request_body(content = JpegForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "JPEG encoded image", content_type = "image/jpeg"),
        (status = 400, description = "Missing or invalid field, or undecodable image"),
        (status = 413, description = "Request or image exceeds a configured limit"),
    ),
    tag = "Images"
)]
pub async fn handle_jpeg(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let limits = state.config.limits.clone();
    check_content_length(&headers, limits.request_bytes())?;

    let request = JpegForm::from_form(MultipartForm::read(multipart).await?)?;
    let quality = request.quality;
    let format = ImageFormat::Jpeg { quality };

    let jpeg = run_blocking(move || {
        let image = decode_upload(&request.base_image, limits.max_image_size)?;
        Ok(codec::encode(&image, format)?)
    })
    .await?;

    tracing::info!(quality, bytes = jpeg.len(), "Encoded JPEG");
    Ok(image_response(jpeg, format))
}
