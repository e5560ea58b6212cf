//! State containers for the coupon storefront.
//!
//! Each store is an explicit owned value rather than an ambient global: all
//! mutation goes through `&mut self`, so there is a single writer by
//! construction. [`CouponStore`] owns the authoritative coupon collection
//! and its filtered view; [`AuthStore`] and [`HistoryStore`] cover the mocked
//! authentication session and the coupon viewing history, persisting through
//! the [`KeyValueStore`] collaborator.

mod auth;
mod coupon_store;
mod history;
mod kv;

pub use auth::{
    AuthError, AuthService, AuthStatus, AuthStore, AuthTokens, Credentials, MockAuthService, User,
};
pub use coupon_store::{CouponStore, FetchTicket, FETCH_ERROR_MESSAGE};
pub use history::{CouponHistoryItem, HistoryStore, HISTORY_STORAGE_KEY};
pub use kv::{FileKv, KeyValueStore, MemoryKv, StorageError};
