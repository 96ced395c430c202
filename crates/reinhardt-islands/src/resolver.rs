//! Island path resolution.
//!
//! Resolution is purely lexical: paths are joined and normalized as strings
//! with `/` separators, and the filesystem is never consulted. Whether the
//! referenced component exists is a concern of the rendering pass.

use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Canonical island path used both as the registry key and for renderer lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct IslandPath(String);

impl IslandPath {
	/// Returns the normalized path.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Returns the renderer lookup key for this path.
	pub fn extension(&self) -> &str {
		extension_of(&self.0)
	}

	/// Checks whether this path lies inside `root` (after normalizing `root`).
	pub fn is_within(&self, root: &Path) -> bool {
		let root = normalize(&root.to_string_lossy());
		if root == "." {
			return !is_absolute(&self.0) && self.0 != ".." && !self.0.starts_with("../");
		}
		let prefix = if root.ends_with('/') {
			root.clone()
		} else {
			format!("{}/", root)
		};
		self.0 == root || self.0.starts_with(&prefix)
	}
}

impl fmt::Display for IslandPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl AsRef<str> for IslandPath {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

/// Resolves a user-supplied island reference against the islands root.
///
/// Absolute references are kept as-is (normalized); relative references are
/// joined onto `islands_root`. `.` segments are dropped and `..` segments
/// consume their parent where one exists.
///
/// # Examples
///
/// ```
/// use reinhardt_islands::resolver::resolve_island_path;
/// use std::path::Path;
///
/// let path = resolve_island_path("./Counter.jsx", Path::new("components"));
/// assert_eq!(path.as_str(), "components/Counter.jsx");
/// ```
pub fn resolve_island_path(unresolved_path: &str, islands_root: &Path) -> IslandPath {
	let unresolved = unresolved_path.replace('\\', "/");
	if is_absolute(&unresolved) {
		return IslandPath(normalize(&unresolved));
	}

	let root = islands_root.to_string_lossy().replace('\\', "/");
	let joined = if root.is_empty() {
		unresolved
	} else {
		format!("{}/{}", root, unresolved)
	};
	IslandPath(normalize(&joined))
}

/// Returns the extension of `path` without its leading dot.
///
/// Dotfiles (`.env`) and paths without an extension yield an empty string.
pub fn extension_of(path: &str) -> &str {
	let file_name = path.rsplit('/').next().unwrap_or(path);
	match file_name.rfind('.') {
		Some(0) | None => "",
		Some(idx) => &file_name[idx + 1..],
	}
}

fn is_absolute(path: &str) -> bool {
	path.starts_with('/') || Path::new(path).is_absolute()
}

fn normalize(path: &str) -> String {
	let path = path.replace('\\', "/");
	let absolute = path.starts_with('/');
	let mut segments: Vec<&str> = Vec::new();

	for segment in path.split('/') {
		match segment {
			"" | "." => {}
			".." => match segments.last() {
				Some(&last) if last != ".." => {
					segments.pop();
				}
				// `/..` is `/`
				_ if absolute => {}
				_ => segments.push(".."),
			},
			other => segments.push(other),
		}
	}

	let body = segments.join("/");
	match (absolute, body.is_empty()) {
		(true, _) => format!("/{}", body),
		(false, true) => ".".to_string(),
		(false, false) => body,
	}
}
