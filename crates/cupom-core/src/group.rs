//! Month grouping for sectioned coupon display.

use chrono::{Datelike, NaiveDate};

use crate::Coupon;

/// Coupons sharing the same calendar month of expiration.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthBucket {
    /// First day of the expiration month, e.g. `2025-06-01`.
    pub month: NaiveDate,
    pub coupons: Vec<Coupon>,
}

impl MonthBucket {
    /// Section header label, e.g. `"06/2025"`.
    #[must_use]
    pub fn label(&self) -> String {
        self.month.format("%m/%Y").to_string()
    }
}

/// Partitions coupons into buckets keyed by the first day of their
/// expiration month, ordered most recent month first.
///
/// Within a bucket, coupons keep their relative order from the input; the
/// partition is stable, never re-sorted. Empty input yields no buckets.
#[must_use]
pub fn group_by_month(coupons: &[Coupon]) -> Vec<MonthBucket> {
    let mut buckets: Vec<MonthBucket> = Vec::new();

    for coupon in coupons {
        let month = first_of_month(coupon);
        match buckets.iter_mut().find(|b| b.month == month) {
            Some(bucket) => bucket.coupons.push(coupon.clone()),
            None => buckets.push(MonthBucket {
                month,
                coupons: vec![coupon.clone()],
            }),
        }
    }

    // Stable sort keeps insertion order within a bucket untouched.
    buckets.sort_by(|a, b| b.month.cmp(&a.month));
    buckets
}

fn first_of_month(coupon: &Coupon) -> NaiveDate {
    let date = coupon.expire_at.date_naive();
    // Day 1 exists in every month.
    date.with_day(1).unwrap_or(date)
}
