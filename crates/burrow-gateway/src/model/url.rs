use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ShortenRequest {
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub original_url: String,
    pub short_url: String,
    /// `data:image/png;base64,...`, or `null` when the QR code could not be rendered.
    pub qr_code: Option<String>,
}
