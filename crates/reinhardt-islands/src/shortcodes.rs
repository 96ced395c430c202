//! Tera hooks for declaring props and islands inside page templates.
//!
//! ```text
//! {{ prop(name="count", value=3) }}
//!
//! {% filter hydrated_island(path="Counter.jsx", load=["visible", "idle"]) %}
//!   <button>{{ prop(name="label", value="Add") }}</button>
//! {% endfilter %}
//! ```
//!
//! Filter sections receive their body fully rendered, which is what lets the
//! prop markers produced inside the body reach the island hook.

use crate::error::IslandError;
use crate::markers::encode_prop_marker;
use crate::props::PropValue;
use crate::registry::{IslandKind, IslandRequest};
use crate::session::{BuildSession, PageKey};
use std::collections::HashMap;
use std::sync::Arc;
use tera::{Tera, Value};

/// Name of the prop declaration function.
pub const PROP_FUNCTION: &str = "prop";

/// Name of the server-only island filter.
pub const ISLAND_FILTER: &str = "island";

/// Name of the hydrated island filter.
pub const HYDRATED_ISLAND_FILTER: &str = "hydrated_island";

/// Name of the client-only island filter.
pub const CLIENT_ONLY_ISLAND_FILTER: &str = "client_only_island";

/// Template hooks bound to one page of a build session.
#[derive(Debug, Clone)]
pub struct PageShortcodes {
	session: Arc<BuildSession>,
	page: PageKey,
}

impl PageShortcodes {
	/// Binds the hooks to `page`.
	pub fn new(session: Arc<BuildSession>, page: PageKey) -> Self {
		Self { session, page }
	}

	/// Returns the page the hooks write to.
	pub fn page(&self) -> &PageKey {
		&self.page
	}

	/// Registers the prop function and the three island filters on `tera`.
	///
	/// Registering again for another page replaces the previous bindings.
	pub fn register(&self, tera: &mut Tera) {
		tera.register_function(PROP_FUNCTION, PropFunction(self.clone()));
		for (name, kind) in [
			(ISLAND_FILTER, IslandKind::ServerOnly),
			(HYDRATED_ISLAND_FILTER, IslandKind::Hydrated),
			(CLIENT_ONLY_ISLAND_FILTER, IslandKind::ClientOnly),
		] {
			tera.register_filter(
				name,
				IslandFilter {
					hooks: self.clone(),
					kind,
				},
			);
		}
	}
}

struct PropFunction(PageShortcodes);

impl tera::Function for PropFunction {
	fn call(&self, args: &HashMap<String, Value>) -> tera::Result<Value> {
		let name = args
			.get("name")
			.and_then(Value::as_str)
			.ok_or_else(|| IslandError::Template("`prop` requires a string `name` argument".to_string()))?;
		let value = args.get("value").cloned().unwrap_or(Value::Null);

		let record = self
			.0
			.session
			.add_prop(&self.0.page, name, PropValue::new(value));
		Ok(Value::String(encode_prop_marker(&record.id)))
	}

	fn is_safe(&self) -> bool {
		true
	}
}

struct IslandFilter {
	hooks: PageShortcodes,
	kind: IslandKind,
}

impl tera::Filter for IslandFilter {
	fn filter(&self, value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
		let inner_html = match value {
			Value::String(html) => html.clone(),
			Value::Null => String::new(),
			other => other.to_string(),
		};
		let path = args
			.get("path")
			.and_then(Value::as_str)
			.ok_or_else(|| IslandError::Template("island filters require a string `path` argument".to_string()))?;

		let request = match self.kind {
			IslandKind::ServerOnly => IslandRequest::ServerOnly,
			IslandKind::Hydrated => IslandRequest::Hydrated {
				load_conditions: load_conditions(args)?,
			},
			IslandKind::ClientOnly => IslandRequest::ClientOnly {
				load_conditions: load_conditions(args)?,
			},
		};

		let session = &self.hooks.session;
		let output = session.register_island(&self.hooks.page, &inner_html, path, request)?;
		Ok(Value::String(output.into_html(&session.config().host_element)))
	}

	fn is_safe(&self) -> bool {
		true
	}
}

/// Reads `load` as either a whitespace-separated string or an array of strings.
fn load_conditions(args: &HashMap<String, Value>) -> Result<Vec<String>, IslandError> {
	match args.get("load") {
		None | Some(Value::Null) => Ok(Vec::new()),
		Some(Value::String(tokens)) => Ok(tokens.split_whitespace().map(str::to_string).collect()),
		Some(Value::Array(items)) => items
			.iter()
			.map(|item| {
				item.as_str().map(str::to_string).ok_or_else(|| {
					IslandError::Template(format!("load conditions must be strings, got {}", item))
				})
			})
			.collect(),
		Some(other) => Err(IslandError::Template(format!(
			"`load` must be a string or an array of strings, got {}",
			other
		))),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	fn args(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
		pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.clone()))
			.collect()
	}

	#[rstest]
	#[case(json!("visible  idle"), vec!["visible", "idle"])]
	#[case(json!(["media:(max-width: 600px)", "idle"]), vec!["media:(max-width: 600px)", "idle"])]
	#[case(Value::Null, vec![])]
	fn test_load_conditions(#[case] load: Value, #[case] expected: Vec<&str>) {
		assert_eq!(load_conditions(&args(&[("load", load)])).unwrap(), expected);
	}

	#[rstest]
	#[case(json!(3))]
	#[case(json!(["visible", 1]))]
	fn test_invalid_load_conditions(#[case] load: Value) {
		assert!(load_conditions(&args(&[("load", load)])).is_err());
	}

	#[rstest]
	fn test_missing_load_is_empty() {
		assert!(load_conditions(&HashMap::new()).unwrap().is_empty());
	}
}
