use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A discount coupon as served by the discount API.
///
/// Field names match the JSON wire format exactly. `is_active` and
/// `expire_at` are independent signals: a coupon can be flagged inactive
/// before it expires, or stay flagged active after. No combined "usable"
/// predicate is defined here; presentation combines the raw fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coupon {
    /// Unique coupon code, used as the list key.
    pub code: String,
    /// Discount discriminator: `"percentage"`, `"fixed"`, or anything else
    /// the API decides to send. Unknown values are kept verbatim.
    #[serde(rename = "type")]
    pub coupon_type: String,
    /// Discount magnitude: percent when the type is percentage, a currency
    /// amount otherwise.
    pub value: f64,
    pub expire_at: DateTime<Utc>,
    pub is_active: bool,
    pub max_use: u32,
    /// Times redeemed so far. The API may send `used > max_use`; the client
    /// does not enforce the bound.
    pub used: u32,
    /// Secondary deadline, distinct from `expire_at`.
    pub max_apply_date: Option<DateTime<Utc>>,
}

/// Classification of [`Coupon::coupon_type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CouponKind {
    Percentage,
    Fixed,
    /// Any discriminator the client does not recognize; displayed verbatim.
    Other,
}

impl Coupon {
    #[must_use]
    pub fn kind(&self) -> CouponKind {
        match self.coupon_type.as_str() {
            "percentage" => CouponKind::Percentage,
            "fixed" => CouponKind::Fixed,
            _ => CouponKind::Other,
        }
    }

    /// Whether `expire_at` lies in the past relative to `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expire_at < now
    }

    /// Whole days until expiry; negative once the coupon has expired.
    #[must_use]
    pub fn days_until_expiry(&self, now: DateTime<Utc>) -> i64 {
        (self.expire_at - now).num_days()
    }

    /// User-facing discount label: `"10%"` for percentage coupons,
    /// `"R$ 10.00"` for fixed (and unrecognized) types.
    #[must_use]
    pub fn discount_label(&self) -> String {
        match self.kind() {
            CouponKind::Percentage => format!("{}%", self.value),
            CouponKind::Fixed | CouponKind::Other => format!("R$ {:.2}", self.value),
        }
    }
}

/// Client-side time window limiting displayed coupons to those expiring
/// within N days. Used as `Option<FilterDays>`; `None` means no filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDays {
    Seven,
    Fifteen,
    Thirty,
    Ninety,
}

impl FilterDays {
    pub const ALL: [FilterDays; 4] = [
        FilterDays::Seven,
        FilterDays::Fifteen,
        FilterDays::Thirty,
        FilterDays::Ninety,
    ];

    #[must_use]
    pub fn days(self) -> i64 {
        match self {
            FilterDays::Seven => 7,
            FilterDays::Fifteen => 15,
            FilterDays::Thirty => 30,
            FilterDays::Ninety => 90,
        }
    }

    /// Label shown on the filter bar.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            FilterDays::Seven => "07 dias",
            FilterDays::Fifteen => "15 dias",
            FilterDays::Thirty => "30 dias",
            FilterDays::Ninety => "90 dias",
        }
    }
}

impl std::fmt::Display for FilterDays {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.days())
    }
}

impl std::str::FromStr for FilterDays {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "7" | "07" => Ok(FilterDays::Seven),
            "15" => Ok(FilterDays::Fifteen),
            "30" => Ok(FilterDays::Thirty),
            "90" => Ok(FilterDays::Ninety),
            other => Err(format!(
                "invalid filter window '{other}'; expected 7, 15, 30 or 90"
            )),
        }
    }
}
