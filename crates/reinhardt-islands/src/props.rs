//! Per-page prop storage.
//!
//! Prop values stay opaque in-memory objects here; serializing them for the
//! client is left to the hydration pass.

use crate::ids::PropId;
use crate::session::{BuildSession, PageKey};
use std::any::{Any, type_name};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

/// Opaque, cheaply clonable prop value.
#[derive(Clone)]
pub struct PropValue {
	inner: Arc<dyn Any + Send + Sync>,
	type_name: &'static str,
}

impl PropValue {
	/// Wraps any value.
	pub fn new<T: Any + Send + Sync>(value: T) -> Self {
		Self {
			inner: Arc::new(value),
			type_name: type_name::<T>(),
		}
	}

	/// Returns the value if it is a `T`.
	pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
		self.inner.downcast_ref::<T>()
	}

	/// Checks whether the value is a `T`.
	pub fn is<T: Any>(&self) -> bool {
		self.inner.is::<T>()
	}

	/// Name of the wrapped type, for diagnostics.
	pub fn type_name(&self) -> &'static str {
		self.type_name
	}
}

impl fmt::Debug for PropValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PropValue")
			.field("type", &self.type_name)
			.finish_non_exhaustive()
	}
}

/// A single `prop` declaration.
#[derive(Debug, Clone)]
pub struct PropRecord {
	pub id: PropId,
	pub name: String,
	pub value: PropValue,
}

/// Props declared on one page, plus the ids the client needs.
///
/// `client_prop_ids` is not required to be a subset of the record keys.
#[derive(Debug, Clone, Default)]
pub struct PropStore {
	records: HashMap<PropId, PropRecord>,
	client_prop_ids: BTreeSet<PropId>,
}

impl PropStore {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Stores a record, replacing any record with the same id.
	pub fn insert(&mut self, record: PropRecord) {
		self.records.insert(record.id.clone(), record);
	}

	/// Gets a record by id.
	pub fn get(&self, id: &PropId) -> Option<&PropRecord> {
		self.records.get(id)
	}

	/// Iterates over all records in unspecified order.
	pub fn records(&self) -> impl Iterator<Item = &PropRecord> {
		self.records.values()
	}

	/// Returns every record declared under `name`.
	pub fn records_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a PropRecord> + 'a {
		self.records.values().filter(move |record| record.name == name)
	}

	/// Marks `ids` as required on the client.
	pub fn mark_used_on_client<'a>(&mut self, ids: impl IntoIterator<Item = &'a PropId>) {
		self.client_prop_ids.extend(ids.into_iter().cloned());
	}

	/// Ids marked as required on the client.
	pub fn client_prop_ids(&self) -> &BTreeSet<PropId> {
		&self.client_prop_ids
	}

	/// Checks whether `id` is required on the client.
	pub fn is_used_on_client(&self, id: &PropId) -> bool {
		self.client_prop_ids.contains(id)
	}

	/// Records that must be shipped to the client, ordered by id.
	///
	/// Client ids without a matching record are skipped.
	pub fn client_records(&self) -> impl Iterator<Item = &PropRecord> {
		self.client_prop_ids
			.iter()
			.filter_map(|id| self.records.get(id))
	}

	/// Returns the number of records.
	pub fn len(&self) -> usize {
		self.records.len()
	}

	/// Checks if no prop was declared.
	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}
}

impl BuildSession {
	/// Declares a prop on `page` and returns its record.
	///
	/// Names are not unique: declaring the same name twice yields two records.
	pub fn add_prop(&self, page: &PageKey, name: impl Into<String>, value: PropValue) -> PropRecord {
		let record = PropRecord {
			id: self.ids.next_prop_id(),
			name: name.into(),
			value,
		};
		tracing::debug!(
			page = %page,
			prop_id = %record.id,
			name = %record.name,
			value_type = record.value.type_name(),
			"Declared prop"
		);
		self.props
			.write()
			.entry(page.clone())
			.or_default()
			.insert(record.clone());
		record
	}

	/// Marks `prop_ids` as required on the client for `page`.
	///
	/// Only applies when `page` already has a prop store; otherwise the call is
	/// dropped. Pages must declare props before the islands that use them.
	pub fn mark_used_on_client(&self, page: &PageKey, prop_ids: &BTreeSet<PropId>) {
		if prop_ids.is_empty() {
			return;
		}
		match self.props.write().get_mut(page) {
			Some(store) => store.mark_used_on_client(prop_ids),
			None => tracing::warn!(
				page = %page,
				dropped = prop_ids.len(),
				"No props declared on page yet, client prop marking skipped"
			),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};

	#[fixture]
	fn session() -> BuildSession {
		BuildSession::default()
	}

	#[fixture]
	fn page() -> PageKey {
		PageKey::new("src/index.md")
	}

	#[rstest]
	fn test_prop_value_downcast() {
		let value = PropValue::new(vec![1u32, 2, 3]);
		assert!(value.is::<Vec<u32>>());
		assert_eq!(value.downcast_ref::<Vec<u32>>(), Some(&vec![1, 2, 3]));
		assert!(value.downcast_ref::<String>().is_none());
		assert!(format!("{:?}", value).contains("Vec<u32>"));
	}

	#[rstest]
	fn test_add_prop_creates_store(session: BuildSession, page: PageKey) {
		assert!(session.prop_store(&page).is_none());
		let record = session.add_prop(&page, "count", PropValue::new(3i64));

		let store = session.prop_store(&page).unwrap();
		assert_eq!(store.len(), 1);
		let stored = store.get(&record.id).unwrap();
		assert_eq!(stored.name, "count");
		assert_eq!(stored.value.downcast_ref::<i64>(), Some(&3));
	}

	#[rstest]
	fn test_duplicate_names_are_distinct_records(session: BuildSession, page: PageKey) {
		let first = session.add_prop(&page, "item", PropValue::new("a"));
		let second = session.add_prop(&page, "item", PropValue::new("b"));
		assert_ne!(first.id, second.id);

		let store = session.prop_store(&page).unwrap();
		assert_eq!(store.records_named("item").count(), 2);
	}

	#[rstest]
	fn test_mark_used_on_client_with_store(session: BuildSession, page: PageKey) {
		let p1 = session.add_prop(&page, "a", PropValue::new(1)).id;
		let p2 = session.add_prop(&page, "b", PropValue::new(2)).id;
		session.mark_used_on_client(&page, &BTreeSet::from([p1.clone()]));

		let store = session.prop_store(&page).unwrap();
		assert!(store.is_used_on_client(&p1));
		assert!(!store.is_used_on_client(&p2));
		assert_eq!(store.client_records().count(), 1);
	}

	#[rstest]
	fn test_mark_used_on_client_without_store_is_noop(session: BuildSession, page: PageKey) {
		session.mark_used_on_client(&page, &BTreeSet::from([PropId::new("p1")]));
		assert!(session.prop_store(&page).is_none());
	}

	#[rstest]
	fn test_client_ids_may_reference_unknown_records() {
		let mut store = PropStore::new();
		let unknown = PropId::new("elsewhere");
		store.mark_used_on_client([&unknown]);
		assert!(store.is_used_on_client(&unknown));
		assert!(store.is_empty());
		assert_eq!(store.client_records().count(), 0);
	}
}
