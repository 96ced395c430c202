//! Error types for island registration.
//!
//! Registration is permissive: with the default [`IslandsConfig`](crate::IslandsConfig)
//! none of the registration operations fail. The variants below only surface when a
//! caller opts into stricter behavior or asks for a renderer explicitly.

/// Errors produced by the island protocol.
#[derive(Debug, thiserror::Error)]
pub enum IslandError {
	/// A resolved island path escapes the configured islands root.
	///
	/// Only raised when `strict_paths` is enabled.
	#[error("Island path '{path}' resolves outside the islands root '{root}'")]
	OutsideRoot { path: String, root: String },
	/// No renderer adapter is registered for an island's extension.
	#[error("No renderer registered for extension '{extension}'")]
	UnknownRenderer { extension: String },
	/// A template hook was invoked with missing or malformed arguments.
	#[error("Invalid template arguments: {0}")]
	Template(String),
}

/// Result alias used across the crate.
pub type IslandResult<T> = Result<T, IslandError>;

impl From<IslandError> for tera::Error {
	fn from(err: IslandError) -> Self {
		tera::Error::msg(err)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_outside_root_message() {
		let err = IslandError::OutsideRoot {
			path: "../secret.jsx".to_string(),
			root: "_islands".to_string(),
		};
		assert_eq!(
			err.to_string(),
			"Island path '../secret.jsx' resolves outside the islands root '_islands'"
		);
	}

	#[rstest]
	fn test_into_tera_error_keeps_message() {
		let err: tera::Error = IslandError::Template("`path` is required".to_string()).into();
		assert!(err.to_string().contains("`path` is required"));
	}
}
