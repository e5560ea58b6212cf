//! The coupon collection store.
//!
//! Single authoritative in-memory cache of the coupon collection plus the
//! derived filtered view. Fetches are tagged with a monotonic generation; a
//! completion whose generation is no longer current is discarded, so an
//! overlapping re-fetch can never be overwritten by a stale response.

use chrono::{DateTime, Duration, Utc};

use cupom_client::{CouponApiError, CouponClient};
use cupom_core::{Coupon, FilterDays};

/// Fixed user-facing message for any fetch failure. Underlying detail goes
/// to the log only, never to the user.
pub const FETCH_ERROR_MESSAGE: &str = "Erro ao carregar cupons. Tente novamente.";

/// Handle for an in-flight fetch, issued by [`CouponStore::begin_fetch`].
///
/// Not `Clone`: each fetch produces exactly one completion.
#[derive(Debug)]
pub struct FetchTicket {
    generation: u64,
}

/// Owns the coupon collection, the filtered view derived from it, and the
/// loading/error status.
///
/// `filtered_coupons` is always re-derivable from `coupons` and
/// `filter_days`; it is never mutated independently. A failed fetch leaves
/// the collection untouched.
#[derive(Debug, Default)]
pub struct CouponStore {
    coupons: Vec<Coupon>,
    filtered_coupons: Vec<Coupon>,
    is_loading: bool,
    error: Option<String>,
    filter_days: Option<FilterDays>,
    generation: u64,
}

impl CouponStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last successful fetch result, in server order.
    #[must_use]
    pub fn coupons(&self) -> &[Coupon] {
        &self.coupons
    }

    /// The collection under the current filter; equals [`Self::coupons`]
    /// when no filter is active.
    #[must_use]
    pub fn filtered_coupons(&self) -> &[Coupon] {
        &self.filtered_coupons
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn filter_days(&self) -> Option<FilterDays> {
        self.filter_days
    }

    /// Fetches the coupon collection and applies the result to the store.
    ///
    /// Composes [`Self::begin_fetch`] and [`Self::complete_fetch`] around the
    /// HTTP call. No automatic retry; callers re-invoke on demand.
    pub async fn fetch_coupons(&mut self, client: &CouponClient) {
        let ticket = self.begin_fetch();
        let result = client.fetch_coupons().await;
        self.complete_fetch(ticket, result);
    }

    /// Enters the loading state and starts a new fetch generation.
    ///
    /// Starting a new fetch invalidates every ticket issued before it.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.is_loading = true;
        self.error = None;
        tracing::debug!(generation = self.generation, "coupon fetch started");
        FetchTicket {
            generation: self.generation,
        }
    }

    /// Applies a fetch outcome, evaluating the filter against `Utc::now()`.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Coupon>, CouponApiError>,
    ) {
        self.complete_fetch_at(ticket, result, Utc::now());
    }

    /// Applies a fetch outcome with an explicit clock, for deterministic tests.
    ///
    /// A ticket from a superseded generation is discarded without touching
    /// any state. On success the collection is replaced wholesale and the
    /// active filter, if any, is re-applied to the fresh data. On failure the
    /// collection keeps its prior value and [`FETCH_ERROR_MESSAGE`] is set.
    pub fn complete_fetch_at(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Coupon>, CouponApiError>,
        now: DateTime<Utc>,
    ) {
        if ticket.generation != self.generation {
            tracing::debug!(
                stale = ticket.generation,
                current = self.generation,
                "discarding stale fetch completion"
            );
            return;
        }

        match result {
            Ok(coupons) => {
                tracing::info!(count = coupons.len(), "coupon collection replaced");
                self.coupons = coupons;
                self.is_loading = false;
                self.error = None;
                self.apply_filter(now);
            }
            Err(err) => {
                tracing::warn!(error = %err, "coupon fetch failed");
                self.is_loading = false;
                self.error = Some(FETCH_ERROR_MESSAGE.to_owned());
            }
        }
    }

    /// Sets the filter window and recomputes the filtered view against
    /// `Utc::now()`. Synchronous, no failure mode; never touches the
    /// loading/error status.
    pub fn set_filter_days(&mut self, days: Option<FilterDays>) {
        self.set_filter_days_at(days, Utc::now());
    }

    /// [`Self::set_filter_days`] with an explicit clock, for deterministic
    /// tests.
    pub fn set_filter_days_at(&mut self, days: Option<FilterDays>, now: DateTime<Utc>) {
        tracing::debug!(days = ?days.map(FilterDays::days), "filter window changed");
        self.filter_days = days;
        self.apply_filter(now);
    }

    /// Recomputes `filtered_coupons` from `coupons` and `filter_days`.
    ///
    /// The window is an upper bound on `expire_at` only: coupons already
    /// expired at `now` are still included when they fall before the cutoff.
    fn apply_filter(&mut self, now: DateTime<Utc>) {
        match self.filter_days {
            None => self.filtered_coupons = self.coupons.clone(),
            Some(days) => {
                let cutoff = now + Duration::days(days.days());
                self.filtered_coupons = self
                    .coupons
                    .iter()
                    .filter(|c| c.expire_at <= cutoff)
                    .cloned()
                    .collect();
                tracing::debug!(
                    kept = self.filtered_coupons.len(),
                    total = self.coupons.len(),
                    %cutoff,
                    "filter applied"
                );
            }
        }
    }
}
