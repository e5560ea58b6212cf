//! Coupon viewing history.
//!
//! Tracks which coupons the user opened and the redemption entries derived
//! from them, persisted through the key-value collaborator so the history
//! survives across sessions.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cupom_core::Coupon;

use crate::kv::{KeyValueStore, StorageError};

/// Key the serialized history lives under in the key-value store.
pub const HISTORY_STORAGE_KEY: &str = "coupon_history";

const LOAD_ERROR_MESSAGE: &str = "Erro ao carregar histórico";

/// One recorded coupon use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouponHistoryItem {
    pub coupon: Coupon,
    pub used_at: DateTime<Utc>,
    pub order_id: String,
    pub discount_value: f64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedHistory {
    history: Vec<CouponHistoryItem>,
    viewed_coupons: Vec<Coupon>,
}

/// Store for the viewing history and its persisted form.
///
/// `history` keeps every entry, most recent first. `viewed_coupons` is the
/// deduplicated list of distinct coupons seen, also most recent first; a
/// coupon viewed twice stays at its original position.
pub struct HistoryStore {
    storage: Arc<dyn KeyValueStore>,
    history: Vec<CouponHistoryItem>,
    viewed_coupons: Vec<Coupon>,
    error: Option<String>,
}

impl HistoryStore {
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            storage,
            history: Vec::new(),
            viewed_coupons: Vec::new(),
            error: None,
        }
    }

    #[must_use]
    pub fn history(&self) -> &[CouponHistoryItem] {
        &self.history
    }

    #[must_use]
    pub fn viewed_coupons(&self) -> &[Coupon] {
        &self.viewed_coupons
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Restores the history from storage.
    ///
    /// A missing key is an empty history. A read or parse failure surfaces as
    /// the store-level error message; the in-memory state is left untouched.
    pub fn load(&mut self) {
        let restored = self
            .storage
            .get(HISTORY_STORAGE_KEY)
            .and_then(|raw| match raw {
                Some(raw) => Ok(serde_json::from_str::<PersistedHistory>(&raw)?),
                None => Ok(PersistedHistory::default()),
            });

        match restored {
            Ok(persisted) => {
                self.history = persisted.history;
                self.viewed_coupons = persisted.viewed_coupons;
                self.error = None;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to load coupon history");
                self.error = Some(LOAD_ERROR_MESSAGE.to_owned());
            }
        }
    }

    /// Records a coupon view, stamping the entry with `Utc::now()`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the updated history cannot be persisted;
    /// the in-memory state is updated regardless.
    pub fn add_to_history(&mut self, coupon: Coupon) -> Result<(), StorageError> {
        self.add_to_history_at(coupon, Utc::now())
    }

    /// [`Self::add_to_history`] with an explicit clock, for deterministic
    /// tests.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the updated history cannot be persisted.
    pub fn add_to_history_at(
        &mut self,
        coupon: Coupon,
        now: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let item = CouponHistoryItem {
            coupon: coupon.clone(),
            used_at: now,
            // Placeholder until order integration lands.
            order_id: "12345".to_owned(),
            discount_value: coupon.value,
        };
        self.history.insert(0, item);

        let already_viewed = self.viewed_coupons.iter().any(|c| c.code == coupon.code);
        if !already_viewed {
            self.viewed_coupons.insert(0, coupon);
        }

        self.persist()
    }

    /// Wipes the history in memory and in storage.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the storage key cannot be removed.
    pub fn clear_history(&mut self) -> Result<(), StorageError> {
        self.history.clear();
        self.viewed_coupons.clear();
        self.storage.remove(HISTORY_STORAGE_KEY)
    }

    fn persist(&self) -> Result<(), StorageError> {
        let persisted = PersistedHistory {
            history: self.history.clone(),
            viewed_coupons: self.viewed_coupons.clone(),
        };
        let raw = serde_json::to_string(&persisted)?;
        self.storage.set(HISTORY_STORAGE_KEY, &raw)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use crate::kv::MemoryKv;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn coupon(code: &str, value: f64) -> Coupon {
        Coupon {
            code: code.to_owned(),
            coupon_type: "fixed".to_owned(),
            value,
            expire_at: now(),
            is_active: true,
            max_use: 10,
            used: 1,
            max_apply_date: None,
        }
    }

    #[test]
    fn add_to_history_prepends_and_records_the_discount() {
        let mut store = HistoryStore::new(Arc::new(MemoryKv::new()));
        store.add_to_history_at(coupon("A", 10.0), now()).unwrap();
        store.add_to_history_at(coupon("B", 25.0), now()).unwrap();

        assert_eq!(store.history().len(), 2);
        assert_eq!(store.history()[0].coupon.code, "B");
        assert_eq!(store.history()[0].discount_value, 25.0);
        assert_eq!(store.history()[1].coupon.code, "A");
    }

    #[test]
    fn viewed_coupons_are_deduplicated_by_code() {
        let mut store = HistoryStore::new(Arc::new(MemoryKv::new()));
        store.add_to_history_at(coupon("A", 10.0), now()).unwrap();
        store.add_to_history_at(coupon("B", 25.0), now()).unwrap();
        store.add_to_history_at(coupon("A", 10.0), now()).unwrap();

        // Every view lands in history, but A keeps one slot in viewed.
        assert_eq!(store.history().len(), 3);
        let viewed: Vec<&str> = store.viewed_coupons().iter().map(|c| c.code.as_str()).collect();
        assert_eq!(viewed, ["B", "A"]);
    }

    #[test]
    fn history_round_trips_through_storage() {
        let storage = Arc::new(MemoryKv::new());

        let mut store = HistoryStore::new(Arc::clone(&storage) as Arc<dyn KeyValueStore>);
        store.add_to_history_at(coupon("A", 10.0), now()).unwrap();

        let mut restored = HistoryStore::new(storage);
        restored.load();
        assert!(restored.error().is_none());
        assert_eq!(restored.history().len(), 1);
        assert_eq!(restored.history()[0].coupon.code, "A");
        assert_eq!(restored.viewed_coupons().len(), 1);
    }

    #[test]
    fn load_with_no_stored_history_yields_an_empty_store() {
        let mut store = HistoryStore::new(Arc::new(MemoryKv::new()));
        store.load();
        assert!(store.error().is_none());
        assert!(store.history().is_empty());
        assert!(store.viewed_coupons().is_empty());
    }

    #[test]
    fn load_surfaces_a_parse_failure_as_the_store_error() {
        let storage = Arc::new(MemoryKv::new());
        storage.set(HISTORY_STORAGE_KEY, "not json").unwrap();

        let mut store = HistoryStore::new(storage);
        store.load();
        assert_eq!(store.error(), Some(LOAD_ERROR_MESSAGE));
        assert!(store.history().is_empty());
    }

    #[test]
    fn clear_history_wipes_memory_and_storage() {
        let storage = Arc::new(MemoryKv::new());
        let mut store = HistoryStore::new(Arc::clone(&storage) as Arc<dyn KeyValueStore>);
        store.add_to_history_at(coupon("A", 10.0), now()).unwrap();
        store.clear_history().unwrap();

        assert!(store.history().is_empty());
        assert!(store.viewed_coupons().is_empty());
        assert!(storage.get(HISTORY_STORAGE_KEY).unwrap().is_none());
    }
}
