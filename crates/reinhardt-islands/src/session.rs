//! Build-session context owning the page-keyed island and prop registries.
//!
//! One [`BuildSession`] is created per build and shared (usually as
//! `Arc<BuildSession>`) with every page render. Registries are partitioned by
//! [`PageKey`]; the locks only guard the outer maps and are never held across
//! calls into user code.

use crate::config::IslandsConfig;
use crate::error::{IslandError, IslandResult};
use crate::ids::IdGenerator;
use crate::props::PropStore;
use crate::registry::IslandSet;
use crate::renderer::RendererRegistry;
use crate::resolver::{IslandPath, resolve_island_path};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::path::Path;

/// Identifies a page by its source input path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PageKey(String);

impl PageKey {
	/// Creates a key from a page's input path.
	pub fn new(input_path: impl Into<String>) -> Self {
		Self(input_path.into())
	}

	/// Returns the input path.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for PageKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for PageKey {
	fn from(input_path: &str) -> Self {
		Self(input_path.to_string())
	}
}

impl From<String> for PageKey {
	fn from(input_path: String) -> Self {
		Self(input_path)
	}
}

impl From<&Path> for PageKey {
	fn from(input_path: &Path) -> Self {
		Self(input_path.to_string_lossy().into_owned())
	}
}

/// Both registries of a single page, as handed to the rendering pass.
#[derive(Debug, Clone, Default)]
pub struct PageIslands {
	pub islands: Option<IslandSet>,
	pub props: Option<PropStore>,
}

/// State shared by all page renders of one build.
#[derive(Debug)]
pub struct BuildSession {
	pub(crate) config: IslandsConfig,
	pub(crate) renderers: RendererRegistry,
	pub(crate) ids: IdGenerator,
	pub(crate) islands: RwLock<HashMap<PageKey, IslandSet>>,
	pub(crate) props: RwLock<HashMap<PageKey, PropStore>>,
}

impl BuildSession {
	/// Creates a session with a randomly salted id generator.
	pub fn new(config: IslandsConfig, renderers: RendererRegistry) -> Self {
		Self::with_id_generator(config, renderers, IdGenerator::new())
	}

	/// Creates a session with an explicit id generator.
	pub fn with_id_generator(
		config: IslandsConfig,
		renderers: RendererRegistry,
		ids: IdGenerator,
	) -> Self {
		tracing::debug!(
			islands_root = %config.islands_root.display(),
			renderers = renderers.len(),
			salt = ids.salt(),
			"Created island build session"
		);
		Self {
			config,
			renderers,
			ids,
			islands: RwLock::new(HashMap::new()),
			props: RwLock::new(HashMap::new()),
		}
	}

	/// Returns the session settings.
	pub fn config(&self) -> &IslandsConfig {
		&self.config
	}

	/// Returns the renderer registry.
	pub fn renderers(&self) -> &RendererRegistry {
		&self.renderers
	}

	/// Returns the id generator.
	pub fn ids(&self) -> &IdGenerator {
		&self.ids
	}

	/// Returns a snapshot of the islands registered for `page`.
	pub fn island_set(&self, page: &PageKey) -> Option<IslandSet> {
		self.islands.read().get(page).cloned()
	}

	/// Returns a snapshot of the props declared for `page`.
	pub fn prop_store(&self, page: &PageKey) -> Option<PropStore> {
		self.props.read().get(page).cloned()
	}

	/// Returns every page with registered islands or props, sorted.
	pub fn page_keys(&self) -> Vec<PageKey> {
		let mut keys: BTreeSet<PageKey> = self.islands.read().keys().cloned().collect();
		keys.extend(self.props.read().keys().cloned());
		keys.into_iter().collect()
	}

	/// Removes and returns both registries of `page`.
	pub fn take_page(&self, page: &PageKey) -> PageIslands {
		let islands = self.islands.write().remove(page);
		let props = self.props.write().remove(page);
		PageIslands { islands, props }
	}

	/// Drops both registries of `page`.
	pub fn clear_page(&self, page: &PageKey) {
		self.take_page(page);
	}

	/// Drops every registry, e.g. before an incremental rebuild.
	pub fn clear(&self) {
		self.islands.write().clear();
		self.props.write().clear();
		tracing::debug!("Cleared island build session");
	}

	pub(crate) fn resolve(&self, unresolved_path: &str) -> IslandResult<IslandPath> {
		let root = self.config.islands_root();
		let path = resolve_island_path(unresolved_path, root);
		if self.config.strict_paths && !path.is_within(root) {
			return Err(IslandError::OutsideRoot {
				path: path.to_string(),
				root: root.display().to_string(),
			});
		}
		Ok(path)
	}
}

impl Default for BuildSession {
	fn default() -> Self {
		Self::new(IslandsConfig::default(), RendererRegistry::default())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::props::PropValue;
	use rstest::{fixture, rstest};

	#[fixture]
	fn session() -> BuildSession {
		BuildSession::new(IslandsConfig::new("components"), RendererRegistry::new())
	}

	#[rstest]
	fn test_page_key_conversions() {
		assert_eq!(PageKey::from("a.md"), PageKey::new("a.md"));
		assert_eq!(PageKey::from(Path::new("src/b.md")).as_str(), "src/b.md");
		assert_eq!(PageKey::from("c.md".to_string()).to_string(), "c.md");
	}

	#[rstest]
	fn test_resolve_permissive(session: BuildSession) {
		let path = session.resolve("../outside/Nav.jsx").unwrap();
		assert_eq!(path.as_str(), "outside/Nav.jsx");
	}

	#[rstest]
	fn test_resolve_strict_rejects_escape() {
		let session = BuildSession::new(
			IslandsConfig::new("components").strict_paths(true),
			RendererRegistry::new(),
		);
		assert!(session.resolve("Counter.jsx").is_ok());
		let err = session.resolve("../Counter.jsx").unwrap_err();
		assert!(matches!(err, IslandError::OutsideRoot { .. }));
	}

	#[rstest]
	fn test_lifecycle(session: BuildSession) {
		let a = PageKey::new("a.md");
		let b = PageKey::new("b.md");
		session.add_prop(&a, "title", PropValue::new("Hello"));
		session.register_server_only_island(&b, "", "Card.jsx").unwrap();

		assert_eq!(session.page_keys(), vec![a.clone(), b.clone()]);

		let taken = session.take_page(&a);
		assert!(taken.props.is_some());
		assert!(taken.islands.is_none());
		assert!(session.prop_store(&a).is_none());

		session.clear();
		assert!(session.page_keys().is_empty());
	}
}
