//! Inline markers exchanged across the template engine's string boundary.
//!
//! Template evaluation is bottom-up: a nested block is rendered to a plain
//! string before the enclosing shortcode sees it. The markers in this module
//! are the only way metadata (which props a block uses, where an island
//! mounts) can travel through that string. A later rendering pass resolves
//! them into real content.
//!
//! ## Grammar (version 1)
//!
//! ```text
//! island-marker = "<!--island:" id "-->"
//! prop-marker   = "<!--prop:" id "-->"
//! id            = word *( "-" word )
//! word          = 1*( ALPHA / DIGIT / "_" )
//! ```
//!
//! Markers are HTML comments, so they are inert in the surrounding markup and
//! survive arbitrary concatenation. Anything that does not match the grammar
//! exactly (empty ids, whitespace, other comments) is foreign and left alone.

use crate::ids::{IslandId, PropId};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Version of the marker grammar produced and recognized by this module.
pub const MARKER_GRAMMAR_VERSION: u32 = 1;

/// Opening token of an island marker.
pub const ISLAND_MARKER_PREFIX: &str = "<!--island:";

/// Opening token of a prop marker.
pub const PROP_MARKER_PREFIX: &str = "<!--prop:";

/// Closing token shared by both marker kinds.
pub const MARKER_SUFFIX: &str = "-->";

const ID_PATTERN: &str = r"[A-Za-z0-9_]+(?:-[A-Za-z0-9_]+)*";

static PROP_MARKER_RE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(&format!(r"<!--prop:({})-->", ID_PATTERN)).unwrap());

static ISLAND_MARKER_RE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(&format!(r"<!--island:({})-->", ID_PATTERN)).unwrap());

static ID_RE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(&format!(r"^{}$", ID_PATTERN)).unwrap());

/// Returns `true` if `id` can be carried by a marker.
pub fn is_valid_marker_id(id: &str) -> bool {
	ID_RE.is_match(id)
}

/// Encodes the placeholder spliced into the page where an island renders.
pub fn encode_island_marker(island_id: &IslandId) -> String {
	format!("{}{}{}", ISLAND_MARKER_PREFIX, island_id, MARKER_SUFFIX)
}

/// Encodes the reference returned by a `prop` declaration.
pub fn encode_prop_marker(prop_id: &PropId) -> String {
	format!("{}{}{}", PROP_MARKER_PREFIX, prop_id, MARKER_SUFFIX)
}

/// Removes every prop marker from `html` and collects the referenced ids.
///
/// The returned text differs from the input only by the removed markers.
/// Extraction repeats until no marker is left, because removing one marker
/// can join its neighbours into a new one; running it again on the cleaned
/// text therefore always yields the same text and an empty set.
///
/// # Examples
///
/// ```
/// use reinhardt_islands::markers::extract_prop_markers;
///
/// let (html, ids) = extract_prop_markers("<!--prop:p1--> hello");
/// assert_eq!(html, " hello");
/// assert_eq!(ids.len(), 1);
/// ```
pub fn extract_prop_markers(html: &str) -> (String, BTreeSet<PropId>) {
	let mut prop_ids = BTreeSet::new();
	let mut cleaned = html.to_string();

	while PROP_MARKER_RE.is_match(&cleaned) {
		for caps in PROP_MARKER_RE.captures_iter(&cleaned) {
			prop_ids.insert(PropId::new(&caps[1]));
		}
		cleaned = PROP_MARKER_RE.replace_all(&cleaned, "").into_owned();
	}

	tracing::trace!(
		prop_markers = prop_ids.len(),
		"Extracted prop markers from island content"
	);
	(cleaned, prop_ids)
}

/// Lists the island markers in `html` in document order.
///
/// Used by the rendering pass to locate server-only islands; the text is not
/// modified.
pub fn find_island_markers(html: &str) -> Vec<IslandId> {
	ISLAND_MARKER_RE
		.captures_iter(html)
		.map(|caps| IslandId::new(&caps[1]))
		.collect()
}

/// Replaces every island marker in `html` with the output of `render`.
///
/// Markers for which `render` returns `None` are kept as-is.
pub fn replace_island_markers<F>(html: &str, mut render: F) -> String
where
	F: FnMut(&IslandId) -> Option<String>,
{
	ISLAND_MARKER_RE
		.replace_all(html, |caps: &regex::Captures<'_>| {
			let id = IslandId::new(&caps[1]);
			render(&id).unwrap_or_else(|| caps[0].to_string())
		})
		.into_owned()
}
