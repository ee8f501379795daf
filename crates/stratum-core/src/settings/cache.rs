//! Cache of stored setting rows, one entry per scope

use lru::LruCache;
use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::sync::Arc;

use stratum_types::setting_store::SettingRecord;

use crate::prelude::*;

/// Raw stored values of one scope, keyed by setting name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeSettings {
	values: BTreeMap<Box<str>, String>,
}

impl ScopeSettings {
	pub fn get(&self, name: &str) -> Option<&str> {
		self.values.get(name).map(String::as_str)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.values.iter().map(|(name, value)| (name.as_ref(), value.as_str()))
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}
}

impl FromIterator<SettingRecord> for ScopeSettings {
	fn from_iter<I: IntoIterator<Item = SettingRecord>>(iter: I) -> Self {
		Self { values: iter.into_iter().map(|record| (record.name, record.value)).collect() }
	}
}

/// Cache-aside storage for scope rows.
///
/// Entries are never updated in place: writers remove the entry of the scope
/// they changed and the next read repopulates it from the store.
pub trait SettingCache: Send + Sync {
	fn get(&self, key: &ScopeKey) -> Option<Arc<ScopeSettings>>;
	fn put(&self, key: ScopeKey, settings: Arc<ScopeSettings>);
	fn remove(&self, key: &ScopeKey);
	fn clear(&self);
}

/// LRU cache for scope rows
pub struct LruSettingCache {
	cache: parking_lot::RwLock<LruCache<ScopeKey, Arc<ScopeSettings>>>,
}

impl LruSettingCache {
	pub fn new(capacity: usize) -> Self {
		let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
		Self { cache: parking_lot::RwLock::new(LruCache::new(capacity)) }
	}

	pub fn len(&self) -> usize {
		self.cache.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.cache.read().is_empty()
	}
}

impl SettingCache for LruSettingCache {
	fn get(&self, key: &ScopeKey) -> Option<Arc<ScopeSettings>> {
		let mut cache = self.cache.write();
		cache.get(key).cloned()
	}

	fn put(&self, key: ScopeKey, settings: Arc<ScopeSettings>) {
		let mut cache = self.cache.write();
		cache.put(key, settings);
	}

	fn remove(&self, key: &ScopeKey) {
		let mut cache = self.cache.write();
		cache.pop(key);
	}

	fn clear(&self) {
		let mut cache = self.cache.write();
		cache.clear();
	}
}

impl std::fmt::Debug for LruSettingCache {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let cache = self.cache.read();
		f.debug_struct("LruSettingCache")
			.field("len", &cache.len())
			.field("cap", &cache.cap())
			.finish()
	}
}


// vim: ts=4
