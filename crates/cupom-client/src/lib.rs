//! Typed HTTP client for the discount API.
//!
//! The API exposes a single read-only endpoint: `GET <base-url>` returning
//! the full coupon collection as a JSON array. All transport and decoding
//! failures are wrapped into [`CouponApiError`] at this boundary so callers
//! see a stable error taxonomy regardless of `reqwest` internals.

mod client;
mod error;

pub use client::CouponClient;
pub use error::CouponApiError;
