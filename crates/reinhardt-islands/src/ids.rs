//! Identifier generation for islands and props.
//!
//! Pages may be rendered concurrently, so ids come from a single atomic
//! counter owned by the build session rather than from a per-page sequence.
//! Each session also carries a random salt so that ids minted by two
//! different sessions (for example an incremental rebuild running next to a
//! stale cache) collide with probability 2^-32.

use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

macro_rules! token_id {
	($(#[$meta:meta])* $name:ident) => {
		$(#[$meta])*
		#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
		#[serde(transparent)]
		pub struct $name(String);

		impl $name {
			/// Wraps an existing token.
			pub fn new(id: impl Into<String>) -> Self {
				Self(id.into())
			}

			/// Returns the token as a string slice.
			pub fn as_str(&self) -> &str {
				&self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.write_str(&self.0)
			}
		}

		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}

		impl From<&str> for $name {
			fn from(id: &str) -> Self {
				Self(id.to_string())
			}
		}

		impl From<String> for $name {
			fn from(id: String) -> Self {
				Self(id)
			}
		}
	};
}

token_id! {
	/// Unique token identifying one island site.
	IslandId
}

token_id! {
	/// Unique token identifying one `prop` declaration.
	PropId
}

/// Session-salted generator for island and prop ids.
///
/// Generated tokens look like `i3fa91c02-1a` / `p3fa91c02-1b` and always
/// satisfy the marker id grammar.
#[derive(Debug)]
pub struct IdGenerator {
	salt: String,
	counter: AtomicU64,
}

impl IdGenerator {
	/// Creates a generator with a random 8-hex-digit salt.
	pub fn new() -> Self {
		let mut salt = Uuid::new_v4().simple().to_string();
		salt.truncate(8);
		Self::with_salt(salt)
	}

	/// Creates a generator with a fixed salt.
	///
	/// Characters outside `[A-Za-z0-9_]` are replaced with `_` so that
	/// generated ids stay valid marker ids.
	pub fn with_salt(salt: impl Into<String>) -> Self {
		let raw = salt.into();
		let salt: String = raw
			.chars()
			.map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
			.collect();
		if salt != raw {
			tracing::debug!(raw = %raw, salt = %salt, "Sanitized id salt");
		}
		Self {
			salt,
			counter: AtomicU64::new(0),
		}
	}

	/// Returns the session salt.
	pub fn salt(&self) -> &str {
		&self.salt
	}

	/// Allocates a fresh island id.
	pub fn next_island_id(&self) -> IslandId {
		IslandId(self.next_token('i'))
	}

	/// Allocates a fresh prop id.
	pub fn next_prop_id(&self) -> PropId {
		PropId(self.next_token('p'))
	}

	fn next_token(&self, prefix: char) -> String {
		let n = self.counter.fetch_add(1, Ordering::Relaxed);
		format!("{}{}-{:x}", prefix, self.salt, n)
	}
}

impl Default for IdGenerator {
	fn default() -> Self {
		Self::new()
	}
}
