//! Island settings.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default directory island references are resolved against.
pub const DEFAULT_ISLANDS_ROOT: &str = "_islands";

/// Default custom element used as the island mount point.
pub const DEFAULT_HOST_ELEMENT: &str = "reinhardt-island";

/// Settings consumed by the island registry.
///
/// All fields have defaults, so the struct can be embedded in a larger
/// settings document and only partially specified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IslandsConfig {
	/// Directory island references are resolved against.
	pub islands_root: PathBuf,
	/// Reject island references that resolve outside `islands_root`.
	pub strict_paths: bool,
	/// Element name used for island mount points.
	pub host_element: String,
}

impl Default for IslandsConfig {
	fn default() -> Self {
		Self {
			islands_root: PathBuf::from(DEFAULT_ISLANDS_ROOT),
			strict_paths: false,
			host_element: DEFAULT_HOST_ELEMENT.to_string(),
		}
	}
}

impl IslandsConfig {
	/// Creates settings with the given islands root.
	pub fn new(islands_root: impl Into<PathBuf>) -> Self {
		Self {
			islands_root: islands_root.into(),
			..Self::default()
		}
	}

	/// Enables or disables rejection of paths outside the islands root.
	pub fn strict_paths(mut self, strict: bool) -> Self {
		self.strict_paths = strict;
		self
	}

	/// Sets the mount point element name.
	pub fn host_element(mut self, name: impl Into<String>) -> Self {
		self.host_element = name.into();
		self
	}

	/// Returns the islands root.
	pub fn islands_root(&self) -> &Path {
		&self.islands_root
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_defaults() {
		let config = IslandsConfig::default();
		assert_eq!(config.islands_root(), Path::new("_islands"));
		assert!(!config.strict_paths);
		assert_eq!(config.host_element, "reinhardt-island");
	}

	#[rstest]
	fn test_builder() {
		let config = IslandsConfig::new("components")
			.strict_paths(true)
			.host_element("is-land");
		assert_eq!(config.islands_root(), Path::new("components"));
		assert!(config.strict_paths);
		assert_eq!(config.host_element, "is-land");
	}

	#[rstest]
	fn test_partial_deserialize() {
		let config: IslandsConfig =
			serde_json::from_str(r#"{"islands_root": "src/islands"}"#).unwrap();
		assert_eq!(config.islands_root(), Path::new("src/islands"));
		assert_eq!(config.host_element, DEFAULT_HOST_ELEMENT);
	}
}
