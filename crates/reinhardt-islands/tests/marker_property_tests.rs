//! Property-based tests for the marker codec and id generation
//!
//! Uses proptest to verify properties that should hold for all inputs.

use proptest::prelude::*;
use proptest::proptest;
use reinhardt_islands::markers::{encode_prop_marker, extract_prop_markers, is_valid_marker_id};
use reinhardt_islands::{IdGenerator, PropId};
use std::collections::{BTreeSet, HashSet};

/// Text fragments that never contain a complete marker on their own.
fn fragment() -> impl Strategy<Value = String> {
	prop_oneof![
		r"[a-zA-Z0-9 <>/=\x22.\-]{0,20}",
		Just("<!--".to_string()),
		Just("-->".to_string()),
		Just("<!--prop:".to_string()),
		Just("<!-- comment -->".to_string()),
	]
}

proptest! {
	/// Property: k distinct markers yield k ids and a cleaned string without markers
	#[test]
	fn prop_extract_collects_every_marker(
		ids in prop::collection::btree_set(r"[a-z][a-z0-9_]{0,6}", 0..8),
		filler in r"[a-zA-Z <>/]{0,12}",
	) {
		let mut html = String::new();
		for id in &ids {
			html.push_str(&filler);
			html.push_str(&encode_prop_marker(&PropId::new(id.as_str())));
		}
		html.push_str(&filler);

		let (cleaned, found) = extract_prop_markers(&html);
		let expected: BTreeSet<PropId> = ids.iter().map(|id| PropId::new(id.as_str())).collect();
		prop_assert_eq!(found, expected);
		prop_assert!(!cleaned.contains("<!--prop:"));
		prop_assert_eq!(cleaned, filler.repeat(ids.len() + 1));
	}

	/// Property: extraction is idempotent on arbitrary text
	#[test]
	fn prop_extract_is_idempotent(
		parts in prop::collection::vec(
			prop_oneof![
				fragment(),
				r"[a-z]{1,5}(-[a-z0-9]{1,3})?".prop_map(|id| encode_prop_marker(&PropId::new(id))),
			],
			0..12,
		)
	) {
		let html: String = parts.concat();
		let (cleaned, _) = extract_prop_markers(&html);
		let (again, ids) = extract_prop_markers(&cleaned);
		prop_assert_eq!(again, cleaned);
		prop_assert!(ids.is_empty());
	}

	/// Property: text without prop markers is returned unchanged
	#[test]
	fn prop_marker_free_text_is_untouched(html in r"[a-zA-Z0-9 <>!/:\-]{0,80}") {
		prop_assume!(!html.contains("<!--prop:"));
		let (cleaned, ids) = extract_prop_markers(&html);
		prop_assert_eq!(cleaned, html);
		prop_assert!(ids.is_empty());
	}

	/// Property: generated ids are distinct and valid marker ids
	#[test]
	fn prop_generated_ids_are_unique(count in 1usize..500, salt in r"[a-z0-9 _.\-]{0,8}") {
		let ids = IdGenerator::with_salt(salt);
		let generated: Vec<PropId> = (0..count).map(|_| ids.next_prop_id()).collect();
		let distinct: HashSet<&PropId> = generated.iter().collect();
		prop_assert_eq!(distinct.len(), count);
		prop_assert!(generated.iter().all(|id| is_valid_marker_id(id.as_str())));
	}
}
