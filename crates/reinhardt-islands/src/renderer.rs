//! Renderer adapters selected by island file extension.

use crate::error::{IslandError, IslandResult};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A component framework integration able to server-render and/or hydrate islands.
///
/// The island protocol never calls into an adapter; it only records which
/// adapter an island will need so the rendering and hydration passes can use it.
pub trait RendererAdapter: fmt::Debug + Send + Sync {
	/// Name of the renderer, embedded in island root descriptors.
	fn name(&self) -> &str;

	/// File extensions (without leading dot) handled by this renderer.
	fn extensions(&self) -> &[&str];
}

/// Mapping from file extension to renderer adapter.
#[derive(Debug, Clone, Default)]
pub struct RendererRegistry {
	by_extension: HashMap<String, Arc<dyn RendererAdapter>>,
}

impl RendererRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `adapter` for every extension it declares.
	///
	/// A later registration for the same extension replaces the earlier one.
	pub fn register(&mut self, adapter: Arc<dyn RendererAdapter>) -> &mut Self {
		for extension in adapter.extensions() {
			self.insert(extension, Arc::clone(&adapter));
		}
		self
	}

	/// Registers `adapter` for a single extension.
	pub fn insert(&mut self, extension: &str, adapter: Arc<dyn RendererAdapter>) -> &mut Self {
		let key = extension.trim_start_matches('.').to_string();
		if let Some(previous) = self.by_extension.insert(key, adapter) {
			tracing::debug!(
				extension,
				replaced = previous.name(),
				"Replaced renderer registration"
			);
		}
		self
	}

	/// Looks up the adapter for `extension`.
	pub fn get(&self, extension: &str) -> Option<&Arc<dyn RendererAdapter>> {
		self.by_extension.get(extension.trim_start_matches('.'))
	}

	/// Looks up the adapter for `extension`, failing if none is registered.
	pub fn require(&self, extension: &str) -> IslandResult<&Arc<dyn RendererAdapter>> {
		self.get(extension).ok_or_else(|| IslandError::UnknownRenderer {
			extension: extension.to_string(),
		})
	}

	/// Returns the registered extensions, sorted.
	pub fn extensions(&self) -> Vec<&str> {
		let mut extensions: Vec<&str> = self.by_extension.keys().map(String::as_str).collect();
		extensions.sort_unstable();
		extensions
	}

	/// Returns the number of registered extensions.
	pub fn len(&self) -> usize {
		self.by_extension.len()
	}

	/// Checks if no renderer is registered.
	pub fn is_empty(&self) -> bool {
		self.by_extension.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[derive(Debug)]
	struct Named(&'static str, &'static [&'static str]);

	impl RendererAdapter for Named {
		fn name(&self) -> &str {
			self.0
		}

		fn extensions(&self) -> &[&str] {
			self.1
		}
	}

	#[rstest]
	fn test_register_all_extensions() {
		let mut registry = RendererRegistry::new();
		registry.register(Arc::new(Named("react", &["jsx", "tsx"])));
		assert_eq!(registry.extensions(), vec!["jsx", "tsx"]);
		assert_eq!(registry.get("tsx").map(|r| r.name()), Some("react"));
	}

	#[rstest]
	fn test_leading_dot_is_ignored() {
		let mut registry = RendererRegistry::new();
		registry.insert(".vue", Arc::new(Named("vue", &[])));
		assert!(registry.get("vue").is_some());
		assert!(registry.get(".vue").is_some());
	}

	#[rstest]
	fn test_later_registration_wins() {
		let mut registry = RendererRegistry::new();
		registry
			.register(Arc::new(Named("preact", &["jsx"])))
			.register(Arc::new(Named("react", &["jsx"])));
		assert_eq!(registry.len(), 1);
		assert_eq!(registry.get("jsx").map(|r| r.name()), Some("react"));
	}

	#[rstest]
	fn test_require_unknown_extension() {
		let registry = RendererRegistry::new();
		assert!(registry.is_empty());
		let err = registry.require("svelte").unwrap_err();
		assert!(matches!(err, IslandError::UnknownRenderer { ref extension } if extension == "svelte"));
	}
}
