//! HTTP client for the discount API.
//!
//! Wraps `reqwest` with the coupon collection endpoint and typed response
//! deserialization. The API is a single read-only root endpoint; there is no
//! envelope to unwrap, the body is the coupon array itself.

use std::time::Duration;

use reqwest::{Client, Url};

use cupom_core::Coupon;

use crate::error::CouponApiError;

/// Client for the discount API.
///
/// Manages the HTTP client and base URL. Use [`CouponClient::new`] for
/// production or point `base_url` at a mock server in tests.
pub struct CouponClient {
    client: Client,
    base_url: Url,
}

impl CouponClient {
    /// Creates a new client for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns [`CouponApiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`CouponApiError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, CouponApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("cupom/0.1 (coupon-storefront)")
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so the
        // collection GET targets the root path rather than a parent segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url =
            Url::parse(&normalised).map_err(|e| CouponApiError::InvalidBaseUrl {
                url: base_url.to_owned(),
                reason: e.to_string(),
            })?;

        Ok(Self { client, base_url })
    }

    /// Fetches the full coupon collection.
    ///
    /// Issues `GET <base-url>` and parses the body as an ordered array of
    /// [`Coupon`]. Order is preserved exactly as served.
    ///
    /// # Errors
    ///
    /// - [`CouponApiError::Http`] on network failure or a non-2xx status.
    /// - [`CouponApiError::Deserialize`] if the body is not a valid coupon
    ///   array (including malformed `expire_at` timestamps).
    pub async fn fetch_coupons(&self) -> Result<Vec<Coupon>, CouponApiError> {
        tracing::debug!(url = %self.base_url, "requesting coupon collection");

        let response = self.client.get(self.base_url.clone()).send().await?;
        let response = response.error_for_status()?;
        let status = response.status();
        let body = response.text().await?;

        let coupons: Vec<Coupon> =
            serde_json::from_str(&body).map_err(|e| CouponApiError::Deserialize {
                context: self.base_url.to_string(),
                source: e,
            })?;

        tracing::debug!(%status, count = coupons.len(), "coupon collection received");
        Ok(coupons)
    }

    /// Base URL this client targets.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}
