//! Test application factory for integration tests.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use photomosaic::models::ServerConfig;
use photomosaic::server::{build_router, create_app_state};
use mosaic_core::PixelBuffer;

use super::fixtures::MultipartBody;

/// Test application wrapping the production router
pub struct TestApp {
    router: axum::Router,
}

impl TestApp {
    /// Create a new test application with default limits
    pub fn new() -> Self {
        Self::with_config(ServerConfig::default())
    }

    /// Create a test application with custom configuration
    pub fn with_config(config: ServerConfig) -> Self {
        let state = create_app_state(config);
        Self {
            router: build_router(state),
        }
    }

    /// Make a GET request to the given path
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Request::get(path).body(Body::empty()).unwrap())
            .await
    }

    /// Make a GET request with custom headers
    pub async fn get_with_headers(&self, path: &str, headers: &[(&str, &str)]) -> TestResponse {
        let mut builder = Request::get(path);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        self.request(builder.body(Body::empty()).unwrap()).await
    }

    /// POST a multipart form, declaring its Content-Length
    pub async fn post_multipart(&self, path: &str, form: MultipartBody) -> TestResponse {
        let content_type = form.content_type();
        let body = form.build();
        let request = Request::post(path)
            .header("Content-Type", content_type)
            .header("Content-Length", body.len())
            .body(Body::from(body))
            .unwrap();
        self.request(request).await
    }

    /// POST a multipart form without a Content-Length header
    pub async fn post_multipart_streamed(&self, path: &str, form: MultipartBody) -> TestResponse {
        let content_type = form.content_type();
        let request = Request::post(path)
            .header("Content-Type", content_type)
            .body(Body::from(form.build()))
            .unwrap();
        self.request(request).await
    }

    /// POST an arbitrary body
    pub async fn post_raw(&self, path: &str, content_type: &str, body: Vec<u8>) -> TestResponse {
        let request = Request::post(path)
            .header("Content-Type", content_type)
            .body(Body::from(body))
            .unwrap();
        self.request(request).await
    }

    /// Send a request to the router
    async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Test response with convenience methods
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parse body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Get body as string
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Get raw body bytes
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// Check if response is a PNG image
    pub fn is_png(&self) -> bool {
        self.body.len() >= 8 && &self.body[0..8] == b"\x89PNG\r\n\x1a\n"
    }

    /// Check if response starts with the JPEG SOI marker
    pub fn is_jpeg(&self) -> bool {
        self.body.len() >= 2 && self.body[0..2] == [0xFF, 0xD8]
    }

    /// Decode the body as an image
    pub fn image(&self) -> PixelBuffer {
        photomosaic::codec::decode(&self.body).expect("Failed to decode response image")
    }

    /// The `error` message of a JSON error body
    pub fn error_message(&self) -> String {
        let json: serde_json::Value = self.json();
        json["error"].as_str().unwrap_or_default().to_string()
    }
}
