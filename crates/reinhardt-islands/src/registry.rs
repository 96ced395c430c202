//! Island registration.
//!
//! Three kinds of islands can be registered while a page renders:
//!
//! | Kind | Stored record | Props marked for client | Returned |
//! |---|---|---|---|
//! | server-only | yes | no | island marker |
//! | hydrated | yes | yes | [`IslandRoot`] |
//! | client-only | no | yes | [`IslandRoot`] |
//!
//! Client-only islands render nothing on the server, so their inner content
//! is only scanned for prop references and then discarded.

use crate::error::IslandResult;
use crate::ids::{IslandId, PropId};
use crate::markers::{encode_island_marker, extract_prop_markers};
use crate::resolver::IslandPath;
use crate::root::{IslandRoot, IslandRootParams, build_island_root};
use crate::session::{BuildSession, PageKey};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

/// Name of the slot holding an island's inner markup.
pub const DEFAULT_SLOT: &str = "default";

/// How an island participates in hydration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IslandKind {
	/// Rendered on the server only; ships nothing to the client.
	ServerOnly,
	/// Rendered on the server and hydrated on the client.
	Hydrated,
	/// Rendered on the client only.
	ClientOnly,
}

impl IslandKind {
	/// Whether the island's props must be available on the client.
	pub fn is_used_on_client(self) -> bool {
		!matches!(self, Self::ServerOnly)
	}
}

/// Hydration mode of a stored island.
///
/// Client-only islands are never stored, so they have no variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoredIslandKind {
	ServerOnly,
	Hydrated,
}

impl From<StoredIslandKind> for IslandKind {
	fn from(kind: StoredIslandKind) -> Self {
		match kind {
			StoredIslandKind::ServerOnly => Self::ServerOnly,
			StoredIslandKind::Hydrated => Self::Hydrated,
		}
	}
}

/// An island registered for server rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IslandRecord {
	pub island_path: IslandPath,
	pub prop_ids: BTreeSet<PropId>,
	pub kind: StoredIslandKind,
	pub slots: BTreeMap<String, String>,
}

impl IslandRecord {
	fn new(
		kind: StoredIslandKind,
		island_path: IslandPath,
		prop_ids: BTreeSet<PropId>,
		content: String,
	) -> Self {
		Self {
			island_path,
			prop_ids,
			kind,
			slots: BTreeMap::from([(DEFAULT_SLOT.to_string(), content)]),
		}
	}

	/// Whether the island is hydrated on the client.
	pub fn is_used_on_client(&self) -> bool {
		IslandKind::from(self.kind).is_used_on_client()
	}

	/// Inner markup with prop markers removed.
	pub fn default_slot(&self) -> &str {
		self.slots.get(DEFAULT_SLOT).map(String::as_str).unwrap_or_default()
	}
}

/// Islands registered on one page.
#[derive(Debug, Clone, Default)]
pub struct IslandSet {
	islands: HashMap<IslandId, IslandRecord>,
}

impl IslandSet {
	/// Creates an empty set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a record. Other islands are kept.
	pub fn insert(&mut self, id: IslandId, record: IslandRecord) {
		self.islands.insert(id, record);
	}

	/// Gets an island by id.
	pub fn get(&self, id: &IslandId) -> Option<&IslandRecord> {
		self.islands.get(id)
	}

	/// Iterates over all islands in unspecified order.
	pub fn iter(&self) -> impl Iterator<Item = (&IslandId, &IslandRecord)> {
		self.islands.iter()
	}

	/// Returns the number of islands.
	pub fn len(&self) -> usize {
		self.islands.len()
	}

	/// Checks if no island was registered.
	pub fn is_empty(&self) -> bool {
		self.islands.is_empty()
	}
}

/// Per-kind registration request used by [`BuildSession::register_island`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IslandRequest {
	ServerOnly,
	Hydrated { load_conditions: Vec<String> },
	ClientOnly { load_conditions: Vec<String> },
}

impl IslandRequest {
	/// Kind of island this request registers.
	pub fn kind(&self) -> IslandKind {
		match self {
			Self::ServerOnly => IslandKind::ServerOnly,
			Self::Hydrated { .. } => IslandKind::Hydrated,
			Self::ClientOnly { .. } => IslandKind::ClientOnly,
		}
	}
}

/// What a registration hands back to the template engine.
#[derive(Debug, Clone)]
pub enum IslandOutput {
	/// Placeholder resolved by the server rendering pass.
	Marker(String),
	/// Mount point consumed by the hydration pass.
	Root(IslandRoot),
}

impl IslandOutput {
	/// Text to splice into the page.
	pub fn into_html(self, host_element: &str) -> String {
		match self {
			Self::Marker(marker) => marker,
			Self::Root(root) => root.to_html(host_element),
		}
	}

	/// Returns the marker of a server-only island.
	pub fn as_marker(&self) -> Option<&str> {
		match self {
			Self::Marker(marker) => Some(marker),
			Self::Root(_) => None,
		}
	}

	/// Returns the root of a hydrated or client-only island.
	pub fn as_root(&self) -> Option<&IslandRoot> {
		match self {
			Self::Marker(_) => None,
			Self::Root(root) => Some(root),
		}
	}
}

impl BuildSession {
	/// Registers an island of any kind.
	pub fn register_island(
		&self,
		page: &PageKey,
		inner_html: &str,
		unresolved_path: &str,
		request: IslandRequest,
	) -> IslandResult<IslandOutput> {
		match request {
			IslandRequest::ServerOnly => self
				.register_server_only_island(page, inner_html, unresolved_path)
				.map(IslandOutput::Marker),
			IslandRequest::Hydrated { load_conditions } => self
				.register_hydrated_island(page, inner_html, unresolved_path, load_conditions)
				.map(IslandOutput::Root),
			IslandRequest::ClientOnly { load_conditions } => self
				.register_client_only_island(page, inner_html, unresolved_path, load_conditions)
				.map(IslandOutput::Root),
		}
	}

	/// Registers an island rendered only on the server and returns its marker.
	///
	/// The page's client prop ids are left untouched.
	pub fn register_server_only_island(
		&self,
		page: &PageKey,
		inner_html: &str,
		unresolved_path: &str,
	) -> IslandResult<String> {
		let island_path = self.resolve(unresolved_path)?;
		let (clean_html, prop_ids) = extract_prop_markers(inner_html);
		let island_id = self.ids.next_island_id();

		self.store_island(
			page,
			island_id.clone(),
			IslandRecord::new(StoredIslandKind::ServerOnly, island_path, prop_ids, clean_html),
		);
		Ok(encode_island_marker(&island_id))
	}

	/// Registers an island rendered on the server and hydrated on the client.
	pub fn register_hydrated_island<I, S>(
		&self,
		page: &PageKey,
		inner_html: &str,
		unresolved_path: &str,
		load_conditions: I,
	) -> IslandResult<IslandRoot>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let island_path = self.resolve(unresolved_path)?;
		let (clean_html, prop_ids) = extract_prop_markers(inner_html);
		let island_id = self.ids.next_island_id();

		self.store_island(
			page,
			island_id.clone(),
			IslandRecord::new(
				StoredIslandKind::Hydrated,
				island_path.clone(),
				prop_ids.clone(),
				clean_html,
			),
		);
		self.mark_used_on_client(page, &prop_ids);

		Ok(self.island_root(page, island_id, island_path, load_conditions, prop_ids, false))
	}

	/// Registers an island rendered only on the client.
	///
	/// No record is stored; the inner content is scanned for prop references
	/// and discarded.
	pub fn register_client_only_island<I, S>(
		&self,
		page: &PageKey,
		inner_html: &str,
		unresolved_path: &str,
		load_conditions: I,
	) -> IslandResult<IslandRoot>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let island_path = self.resolve(unresolved_path)?;
		let (_, prop_ids) = extract_prop_markers(inner_html);
		let island_id = self.ids.next_island_id();

		tracing::debug!(
			page = %page,
			island_id = %island_id,
			island_path = %island_path,
			props = prop_ids.len(),
			"Registered client-only island"
		);
		self.mark_used_on_client(page, &prop_ids);

		Ok(self.island_root(page, island_id, island_path, load_conditions, prop_ids, true))
	}

	fn store_island(&self, page: &PageKey, island_id: IslandId, record: IslandRecord) {
		tracing::debug!(
			page = %page,
			island_id = %island_id,
			island_path = %record.island_path,
			kind = ?record.kind,
			props = record.prop_ids.len(),
			"Registered island"
		);
		self.islands
			.write()
			.entry(page.clone())
			.or_default()
			.insert(island_id, record);
	}

	fn island_root<I, S>(
		&self,
		page: &PageKey,
		island_id: IslandId,
		island_path: IslandPath,
		load_conditions: I,
		prop_ids: BTreeSet<PropId>,
		is_client_only: bool,
	) -> IslandRoot
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let renderer = self.renderers.get(island_path.extension()).map(Arc::clone);
		if renderer.is_none() {
			tracing::warn!(
				page = %page,
				island_path = %island_path,
				extension = island_path.extension(),
				"No renderer registered for island extension"
			);
		}

		build_island_root(IslandRootParams {
			island_id,
			island_path,
			load_conditions: load_conditions.into_iter().map(Into::into).collect(),
			page_key: page.clone(),
			prop_ids: prop_ids.into_iter().collect(),
			is_client_only,
			renderer,
		})
	}
}
