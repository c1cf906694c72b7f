use std::sync::Arc;

use axum::http::{header, HeaderMap};
use burrow_core::Shortener;

use crate::error::{AppError, Result};
use crate::qr::QrOptions;

#[derive(Clone)]
pub struct AppState {
    shortener: Arc<dyn Shortener>,
    base_url: Option<String>,
    qr: QrOptions,
}

impl AppState {
    pub fn new(shortener: Arc<dyn Shortener>) -> Self {
        Self {
            shortener,
            base_url: None,
            qr: QrOptions::default(),
        }
    }

    /// Uses a fixed base for short URLs instead of the request's `Host` header.
    pub fn with_public_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_qr_options(mut self, qr: QrOptions) -> Self {
        self.qr = qr;
        self
    }

    pub fn shortener(&self) -> &dyn Shortener {
        self.shortener.as_ref()
    }

    pub fn qr_options(&self) -> &QrOptions {
        &self.qr
    }

    /// Base that short codes are appended to.
    ///
    /// Falls back to `http://<Host>` when no public base URL is configured.
    pub fn public_base_url(&self, headers: &HeaderMap) -> Result<String> {
        if let Some(base_url) = &self.base_url {
            return Ok(base_url.clone());
        }

        let host = headers
            .get(header::HOST)
            .and_then(|value| value.to_str().ok())
            .filter(|host| !host.is_empty())
            .ok_or_else(|| {
                AppError::BadRequest("cannot build short URL: missing Host header".to_string())
            })?;

        Ok(format!("http://{}", host))
    }
}
